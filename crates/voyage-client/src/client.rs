use std::sync::Arc;

use voyage_core::{ClientConfig, Dispatcher, Transport, VoyageError};
use voyage_embed::{
    Element, EmbeddingApi, EmbeddingOptions, EmbeddingRequest, EmbeddingResponse,
    MultimodalInput, MultimodalOptions, MultimodalRequest, OutputDtype,
};
use voyage_rerank::{RerankApi, RerankOptions, RerankRequest, RerankResponse};

/// A client for the Voyage AI API.
///
/// Calls block the current thread until the request succeeds, fails fatally,
/// or runs out of attempts. The client is cheap to clone and safe to share.
#[derive(Debug, Clone)]
pub struct VoyageClient {
    dispatcher: Dispatcher,
}

impl VoyageClient {
    pub fn new(config: ClientConfig) -> Result<Self, VoyageError> {
        Ok(Self {
            dispatcher: Dispatcher::new(config)?,
        })
    }

    /// Default configuration with the key taken from `VOYAGE_API_KEY`.
    pub fn from_env() -> Result<Self, VoyageError> {
        Self::new(ClientConfig::default())
    }

    pub fn with_transport(config: ClientConfig, transport: Arc<dyn Transport>) -> Self {
        Self {
            dispatcher: Dispatcher::with_transport(config, transport),
        }
    }

    pub const fn config(&self) -> &ClientConfig {
        self.dispatcher.config()
    }

    /// Embeds `texts` with `model`, e.g. `voyage-3-large`, `voyage-3-lite`,
    /// `voyage-code-3`.
    pub fn embed<I, S>(
        &self,
        texts: I,
        model: &str,
        options: EmbeddingOptions,
    ) -> Result<EmbeddingResponse<f32>, VoyageError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.embed_as(texts, model, options)
    }

    /// Like [`embed`](Self::embed) but decodes signed bytes. `output_dtype`
    /// defaults to `int8` unless the caller set one.
    pub fn embed_int8<I, S>(
        &self,
        texts: I,
        model: &str,
        mut options: EmbeddingOptions,
    ) -> Result<EmbeddingResponse<i8>, VoyageError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        options.output_dtype = options.output_dtype.or(Some(OutputDtype::Int8));
        self.embed_as(texts, model, options)
    }

    /// Like [`embed`](Self::embed) but decodes unsigned bytes. `output_dtype`
    /// defaults to `uint8` unless the caller set one.
    pub fn embed_uint8<I, S>(
        &self,
        texts: I,
        model: &str,
        mut options: EmbeddingOptions,
    ) -> Result<EmbeddingResponse<u8>, VoyageError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        options.output_dtype = options.output_dtype.or(Some(OutputDtype::Uint8));
        self.embed_as(texts, model, options)
    }

    fn embed_as<T, I, S>(
        &self,
        texts: I,
        model: &str,
        options: EmbeddingOptions,
    ) -> Result<EmbeddingResponse<T>, VoyageError>
    where
        T: Element,
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let request = EmbeddingRequest::new(texts, model).with_options(options);
        self.dispatcher.embed(&request)
    }

    /// Embeds interleaved text and images, e.g. with `voyage-multimodal-3`.
    pub fn multimodal_embed(
        &self,
        inputs: Vec<MultimodalInput>,
        model: &str,
        options: MultimodalOptions,
    ) -> Result<EmbeddingResponse<f32>, VoyageError> {
        let request = MultimodalRequest::new(inputs, model).with_options(options);
        self.dispatcher.multimodal_embed(&request)
    }

    /// Scores `documents` against `query`, e.g. with `rerank-2` or
    /// `rerank-2-lite`.
    pub fn rerank<I, S>(
        &self,
        query: &str,
        documents: I,
        model: &str,
        options: RerankOptions,
    ) -> Result<RerankResponse, VoyageError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let request = RerankRequest::new(query, documents, model).with_options(options);
        self.dispatcher.rerank(&request)
    }
}
