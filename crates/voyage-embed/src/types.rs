use serde::{Deserialize, Serialize};
use voyage_core::{DecodeError, Usage};

use crate::decode::{Element, ElementKind, EmbeddingValue};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InputType {
    Query,
    Document,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputDtype {
    Float,
    Int8,
    Uint8,
    Binary,
    Ubinary,
}

impl OutputDtype {
    /// Bit-packed dtypes carry eight dimensions per byte.
    pub const fn is_bit_packed(self) -> bool {
        matches!(self, Self::Binary | Self::Ubinary)
    }

    /// Element type the server packs this dtype into.
    pub const fn element_kind(self) -> ElementKind {
        match self {
            Self::Float => ElementKind::Float32,
            Self::Int8 | Self::Binary => ElementKind::Int8,
            Self::Uint8 | Self::Ubinary => ElementKind::Uint8,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EncodingFormat {
    Base64,
}

/// Optional settings for `/embeddings`. `None` fields are left off the wire so
/// the server applies its own default; `Some(false)` and `Some(0)` are sent.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct EmbeddingOptions {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub input_type: Option<InputType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub truncation: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output_dimension: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output_dtype: Option<OutputDtype>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub encoding_format: Option<EncodingFormat>,
}

impl EmbeddingOptions {
    #[must_use]
    pub const fn with_input_type(mut self, input_type: InputType) -> Self {
        self.input_type = Some(input_type);
        self
    }

    #[must_use]
    pub const fn with_truncation(mut self, truncation: bool) -> Self {
        self.truncation = Some(truncation);
        self
    }

    #[must_use]
    pub const fn with_output_dimension(mut self, dimension: usize) -> Self {
        self.output_dimension = Some(dimension);
        self
    }

    #[must_use]
    pub const fn with_output_dtype(mut self, dtype: OutputDtype) -> Self {
        self.output_dtype = Some(dtype);
        self
    }

    #[must_use]
    pub const fn with_encoding_format(mut self, format: EncodingFormat) -> Self {
        self.encoding_format = Some(format);
        self
    }

    /// Element type the response will carry; `float` when no dtype is set.
    pub fn element_kind(&self) -> ElementKind {
        self.output_dtype
            .map_or(ElementKind::Float32, OutputDtype::element_kind)
    }

    /// Vector length each returned embedding must have, when it is known
    /// up front.
    pub fn expected_len(&self) -> Option<usize> {
        let dim = self.output_dimension?;
        match self.output_dtype {
            Some(dtype) if dtype.is_bit_packed() => Some(dim.div_ceil(8)),
            _ => Some(dim),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EmbeddingRequest {
    pub input: Vec<String>,
    pub model: String,
    #[serde(flatten)]
    pub options: EmbeddingOptions,
}

impl EmbeddingRequest {
    pub fn new<I, S>(input: I, model: impl Into<String>) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            input: input.into_iter().map(Into::into).collect(),
            model: model.into(),
            options: EmbeddingOptions::default(),
        }
    }

    #[must_use]
    pub fn with_options(mut self, options: EmbeddingOptions) -> Self {
        self.options = options;
        self
    }
}

/// One decoded embedding, positioned by `index` in the request input.
#[derive(Debug, Clone, PartialEq)]
pub struct Embedding<T> {
    pub object: String,
    pub index: usize,
    pub embedding: Vec<T>,
}

/// A decoded embeddings result. `data` is ordered by `index`.
#[derive(Debug, Clone, PartialEq)]
pub struct EmbeddingResponse<T> {
    pub object: String,
    pub data: Vec<Embedding<T>>,
    pub model: String,
    pub usage: Usage,
}

impl<T> EmbeddingResponse<T> {
    pub fn vectors(&self) -> impl Iterator<Item = &[T]> {
        self.data.iter().map(|e| e.embedding.as_slice())
    }

    pub fn into_vectors(self) -> Vec<Vec<T>> {
        self.data.into_iter().map(|e| e.embedding).collect()
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct WireEmbeddingResponse<T> {
    #[serde(default)]
    object: String,
    data: Vec<WireEmbedding<T>>,
    #[serde(default)]
    model: String,
    #[serde(default)]
    usage: Usage,
}

#[derive(Debug, Deserialize)]
struct WireEmbedding<T> {
    #[serde(default)]
    object: String,
    embedding: EmbeddingValue<T>,
    index: usize,
}

impl<T: Element> WireEmbeddingResponse<T> {
    pub(crate) fn decode(
        self,
        expected_len: Option<usize>,
    ) -> Result<EmbeddingResponse<T>, DecodeError> {
        let mut data = self
            .data
            .into_iter()
            .map(|item| {
                Ok(Embedding {
                    object: item.object,
                    index: item.index,
                    embedding: item.embedding.decode_with_dimension(expected_len)?,
                })
            })
            .collect::<Result<Vec<_>, DecodeError>>()?;
        data.sort_by_key(|e| e.index);

        Ok(EmbeddingResponse {
            object: self.object,
            data,
            model: self.model,
            usage: self.usage,
        })
    }
}
