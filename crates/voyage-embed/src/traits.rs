use tracing::debug;
use voyage_core::{Dispatcher, VoyageError};

use crate::decode::Element;
use crate::multimodal::MultimodalRequest;
use crate::types::{EmbeddingRequest, EmbeddingResponse, WireEmbeddingResponse};

pub const EMBEDDINGS_PATH: &str = "/embeddings";
pub const MULTIMODAL_EMBEDDINGS_PATH: &str = "/multimodalembeddings";

pub trait EmbeddingApi {
    /// Embeds text, decoding vectors as `T`. `T` must match the requested
    /// `output_dtype` (`f32` for none or `float`, `i8` for `int8` or `binary`,
    /// `u8` for `uint8` or `ubinary`); any other pairing fails before sending.
    fn embed<T: Element>(
        &self,
        request: &EmbeddingRequest,
    ) -> Result<EmbeddingResponse<T>, VoyageError>;

    fn multimodal_embed(
        &self,
        request: &MultimodalRequest,
    ) -> Result<EmbeddingResponse<f32>, VoyageError>;
}

impl EmbeddingApi for Dispatcher {
    fn embed<T: Element>(
        &self,
        request: &EmbeddingRequest,
    ) -> Result<EmbeddingResponse<T>, VoyageError> {
        if request.input.is_empty() {
            return Err(VoyageError::Config("embedding input is empty".to_string()));
        }
        let wire_kind = request.options.element_kind();
        if wire_kind != T::KIND {
            return Err(VoyageError::Config(format!(
                "output_dtype {:?} yields {wire_kind:?} elements, cannot decode as {:?}",
                request.options.output_dtype,
                T::KIND
            )));
        }

        debug!(
            model = %request.model,
            inputs = request.input.len(),
            element = ?T::KIND,
            "embedding texts"
        );
        let wire: WireEmbeddingResponse<T> = self.execute(EMBEDDINGS_PATH, request)?;
        Ok(wire.decode(request.options.expected_len())?)
    }

    fn multimodal_embed(
        &self,
        request: &MultimodalRequest,
    ) -> Result<EmbeddingResponse<f32>, VoyageError> {
        if request.inputs.is_empty() {
            return Err(VoyageError::Config("multimodal input is empty".to_string()));
        }

        debug!(
            model = %request.model,
            inputs = request.inputs.len(),
            "embedding multimodal inputs"
        );
        let wire: WireEmbeddingResponse<f32> =
            self.execute(MULTIMODAL_EMBEDDINGS_PATH, request)?;
        Ok(wire.decode(None)?)
    }
}
