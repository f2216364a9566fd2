use std::io::Read;

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use serde::{Deserialize, Serialize};

use crate::types::InputType;

/// One piece of an interleaved text/image input.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ContentPart {
    Text { text: String },
    ImageBase64 { image_base64: String },
    ImageUrl { image_url: String },
}

impl ContentPart {
    pub fn text(text: impl Into<String>) -> Self {
        Self::Text { text: text.into() }
    }

    pub fn image_url(url: impl Into<String>) -> Self {
        Self::ImageUrl {
            image_url: url.into(),
        }
    }

    /// Wraps raw image bytes as a `data:<mime>;base64,...` URL.
    pub fn image_base64_from_bytes(mime: &str, bytes: &[u8]) -> Self {
        Self::ImageBase64 {
            image_base64: format!("data:{mime};base64,{}", STANDARD.encode(bytes)),
        }
    }

    pub fn image_base64_from_reader<R: Read>(mime: &str, mut reader: R) -> std::io::Result<Self> {
        let mut bytes = Vec::new();
        reader.read_to_end(&mut bytes)?;
        Ok(Self::image_base64_from_bytes(mime, &bytes))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MultimodalInput {
    pub content: Vec<ContentPart>,
}

impl MultimodalInput {
    pub fn new(content: impl IntoIterator<Item = ContentPart>) -> Self {
        Self {
            content: content.into_iter().collect(),
        }
    }

    #[must_use]
    pub fn push(mut self, part: ContentPart) -> Self {
        self.content.push(part);
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputEncoding {
    Base64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct MultimodalOptions {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub input_type: Option<InputType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub truncation: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output_encoding: Option<OutputEncoding>,
}

impl MultimodalOptions {
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
    pub const fn with_output_encoding(mut self, encoding: OutputEncoding) -> Self {
        self.output_encoding = Some(encoding);
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MultimodalRequest {
    pub inputs: Vec<MultimodalInput>,
    pub model: String,
    #[serde(flatten)]
    pub options: MultimodalOptions,
}

impl MultimodalRequest {
    pub fn new(inputs: Vec<MultimodalInput>, model: impl Into<String>) -> Self {
        Self {
            inputs,
            model: model.into(),
            options: MultimodalOptions::default(),
        }
    }

    #[must_use]
    pub fn with_options(mut self, options: MultimodalOptions) -> Self {
        self.options = options;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn content_parts_serialize_with_type_tag() {
        let input = MultimodalInput::new([
            ContentPart::text("a gopher"),
            ContentPart::image_url("https://example.com/g.png"),
        ])
        .push(ContentPart::image_base64_from_bytes("image/png", &[0x89, 0x50]));
        let json = serde_json::to_value(&input).expect("serialize");
        assert_eq!(
            json,
            serde_json::json!({"content": [
                {"type": "text", "text": "a gopher"},
                {"type": "image_url", "image_url": "https://example.com/g.png"},
                {"type": "image_base64", "image_base64": "data:image/png;base64,iVA="}
            ]})
        );
    }

    #[test]
    fn reader_helper_matches_bytes_helper() {
        let bytes = b"\x89PNG\r\n\x1a\n".to_vec();
        let from_reader =
            ContentPart::image_base64_from_reader("image/png", bytes.as_slice()).expect("read");
        assert_eq!(from_reader, ContentPart::image_base64_from_bytes("image/png", &bytes));
    }

    #[test]
    fn request_omits_absent_options() {
        let req = MultimodalRequest::new(
            vec![MultimodalInput::new([ContentPart::text("hi")])],
            "voyage-multimodal-3",
        );
        let json = serde_json::to_value(&req).expect("serialize");
        assert_eq!(json.as_object().map(|o| o.len()), Some(2));

        let req = req.with_options(
            MultimodalOptions::default()
                .with_truncation(false)
                .with_output_encoding(OutputEncoding::Base64),
        );
        let json = serde_json::to_value(&req).expect("serialize");
        assert_eq!(json["truncation"], serde_json::json!(false));
        assert_eq!(json["output_encoding"], "base64");
        assert!(json.get("input_type").is_none());
    }
}
