pub mod decode;
pub mod multimodal;
pub mod traits;
pub mod types;

pub use decode::{Element, ElementKind, EmbeddingValue, decode_base64, encode_base64};
pub use multimodal::*;
pub use traits::*;
pub use types::{
    Embedding, EmbeddingOptions, EmbeddingRequest, EmbeddingResponse, EncodingFormat, InputType,
    OutputDtype,
};
