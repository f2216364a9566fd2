use std::fmt;
use std::marker::PhantomData;

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use serde::de::{self, DeserializeOwned, SeqAccess, Visitor};
use serde::{Deserialize, Deserializer, Serialize};
use voyage_core::DecodeError;

/// Numeric element types an embedding can be decoded into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ElementKind {
    Float32,
    Int8,
    Uint8,
}

impl ElementKind {
    /// Bytes per element in the packed little-endian form.
    pub const fn width(self) -> usize {
        match self {
            Self::Float32 => 4,
            Self::Int8 | Self::Uint8 => 1,
        }
    }
}

mod sealed {
    pub trait Sealed {}
    impl Sealed for f32 {}
    impl Sealed for i8 {}
    impl Sealed for u8 {}
}

/// An embedding element. Implemented for `f32`, `i8` and `u8` only.
pub trait Element:
    sealed::Sealed + Copy + DeserializeOwned + Serialize + Send + Sync + 'static
{
    const KIND: ElementKind;

    /// Reads one element from exactly `KIND.width()` little-endian bytes.
    fn from_le_chunk(chunk: &[u8]) -> Option<Self>;

    fn write_le(self, out: &mut Vec<u8>);
}

impl Element for f32 {
    const KIND: ElementKind = ElementKind::Float32;

    fn from_le_chunk(chunk: &[u8]) -> Option<Self> {
        chunk.try_into().ok().map(Self::from_le_bytes)
    }

    fn write_le(self, out: &mut Vec<u8>) {
        out.extend_from_slice(&self.to_le_bytes());
    }
}

impl Element for i8 {
    const KIND: ElementKind = ElementKind::Int8;

    fn from_le_chunk(chunk: &[u8]) -> Option<Self> {
        chunk.try_into().ok().map(Self::from_le_bytes)
    }

    fn write_le(self, out: &mut Vec<u8>) {
        out.extend_from_slice(&self.to_le_bytes());
    }
}

impl Element for u8 {
    const KIND: ElementKind = ElementKind::Uint8;

    fn from_le_chunk(chunk: &[u8]) -> Option<Self> {
        match chunk {
            [b] => Some(*b),
            _ => None,
        }
    }

    fn write_le(self, out: &mut Vec<u8>) {
        out.push(self);
    }
}

/// Splits `bytes` into `width`-sized little-endian chunks and converts each.
///
/// Shared by every element type; the byte length must be an exact multiple
/// of `width`.
pub fn unpack_le<T>(
    bytes: &[u8],
    width: usize,
    convert: impl Fn(&[u8]) -> Option<T>,
) -> Result<Vec<T>, DecodeError> {
    let misaligned = || DecodeError::Misaligned {
        len: bytes.len(),
        width,
    };
    if bytes.len().checked_rem(width) != Some(0) {
        return Err(misaligned());
    }
    bytes
        .chunks_exact(width)
        .map(|chunk| convert(chunk).ok_or_else(misaligned))
        .collect()
}

/// Decodes standard base64 holding packed little-endian `T` values.
pub fn decode_base64<T: Element>(encoded: &str) -> Result<Vec<T>, DecodeError> {
    let bytes = STANDARD
        .decode(encoded.trim())
        .map_err(|err| DecodeError::Base64(err.to_string()))?;
    unpack_le(&bytes, T::KIND.width(), T::from_le_chunk)
}

/// Packs `values` little-endian and base64-encodes them, the inverse of
/// [`decode_base64`].
pub fn encode_base64<T: Element>(values: &[T]) -> String {
    let mut bytes = Vec::with_capacity(values.len() * T::KIND.width());
    for &v in values {
        v.write_le(&mut bytes);
    }
    STANDARD.encode(bytes)
}

/// An embedding as it appears on the wire: either a JSON number array or a
/// base64 string of packed little-endian values.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum EmbeddingValue<T> {
    Inline(Vec<T>),
    Packed(String),
}

struct EmbeddingValueVisitor<T>(PhantomData<T>);

impl<'de, T: Deserialize<'de>> Visitor<'de> for EmbeddingValueVisitor<T> {
    type Value = EmbeddingValue<T>;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "an array of {} or a base64 string",
            std::any::type_name::<T>()
        )
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<Self::Value, E> {
        Ok(EmbeddingValue::Packed(v.to_string()))
    }

    fn visit_string<E: de::Error>(self, v: String) -> Result<Self::Value, E> {
        Ok(EmbeddingValue::Packed(v))
    }

    // Element errors (e.g. 200 for an i8) surface as-is.
    fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> Result<Self::Value, A::Error> {
        let mut values = Vec::with_capacity(seq.size_hint().unwrap_or(0));
        while let Some(value) = seq.next_element()? {
            values.push(value);
        }
        Ok(EmbeddingValue::Inline(values))
    }
}

impl<'de, T: Deserialize<'de>> Deserialize<'de> for EmbeddingValue<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(EmbeddingValueVisitor(PhantomData))
    }
}

impl<T: Element> EmbeddingValue<T> {
    pub fn decode(&self) -> Result<Vec<T>, DecodeError> {
        match self {
            Self::Inline(values) => Ok(values.clone()),
            Self::Packed(encoded) => decode_base64(encoded),
        }
    }

    /// Decodes and, when `expected` is set, checks the vector length.
    pub fn decode_with_dimension(&self, expected: Option<usize>) -> Result<Vec<T>, DecodeError> {
        let values = self.decode()?;
        match expected {
            Some(expected) if expected != values.len() => Err(DecodeError::DimensionMismatch {
                expected,
                actual: values.len(),
            }),
            _ => Ok(values),
        }
    }

    pub const fn is_packed(&self) -> bool {
        matches!(self, Self::Packed(_))
    }
}
