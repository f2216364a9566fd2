pub mod client;

pub use client::VoyageClient;
pub use voyage_core::{
    API_KEY_ENV, ApiError, ClientConfig, DEFAULT_BASE_URL, DecodeError, Dispatcher,
    HttpTransport, RawResponse, Transport, Usage, VoyageError,
};
pub use voyage_embed::{
    ContentPart, Element, ElementKind, Embedding, EmbeddingApi, EmbeddingOptions,
    EmbeddingRequest, EmbeddingResponse, EmbeddingValue, EncodingFormat, InputType,
    MultimodalInput, MultimodalOptions, MultimodalRequest, OutputDtype, OutputEncoding,
    decode_base64, encode_base64,
};
pub use voyage_rerank::{RerankApi, RerankOptions, RerankRequest, RerankResponse, RerankResult};
