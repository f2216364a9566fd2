use serde::{Deserialize, Serialize};
use voyage_core::Usage;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct RerankOptions {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub top_k: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub return_documents: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub truncation: Option<bool>,
}

impl RerankOptions {
    #[must_use]
    pub const fn with_top_k(mut self, top_k: usize) -> Self {
        self.top_k = Some(top_k);
        self
    }

    #[must_use]
    pub const fn with_return_documents(mut self, return_documents: bool) -> Self {
        self.return_documents = Some(return_documents);
        self
    }

    #[must_use]
    pub const fn with_truncation(mut self, truncation: bool) -> Self {
        self.truncation = Some(truncation);
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RerankRequest {
    pub query: String,
    pub documents: Vec<String>,
    pub model: String,
    #[serde(flatten)]
    pub options: RerankOptions,
}

impl RerankRequest {
    pub fn new<I, S>(query: impl Into<String>, documents: I, model: impl Into<String>) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            query: query.into(),
            documents: documents.into_iter().map(Into::into).collect(),
            model: model.into(),
            options: RerankOptions::default(),
        }
    }

    #[must_use]
    pub fn with_options(mut self, options: RerankOptions) -> Self {
        self.options = options;
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RerankResult {
    pub index: usize,
    pub relevance_score: f32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub document: Option<String>,
}

/// Results in the order the server ranked them, most relevant first.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RerankResponse {
    #[serde(default)]
    pub object: String,
    pub data: Vec<RerankResult>,
    #[serde(default)]
    pub model: String,
    #[serde(default)]
    pub usage: Usage,
}

impl RerankResponse {
    pub fn top(&self) -> Option<&RerankResult> {
        self.data.first()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_omits_absent_options() {
        let req = RerankRequest::new("q", ["a", "b"], "rerank-2-lite");
        assert_eq!(
            serde_json::to_value(&req).expect("serialize"),
            serde_json::json!({"query": "q", "documents": ["a", "b"], "model": "rerank-2-lite"})
        );

        let req = req.with_options(
            RerankOptions::default()
                .with_top_k(1)
                .with_return_documents(false)
                .with_truncation(true),
        );
        let json = serde_json::to_value(&req).expect("serialize");
        assert_eq!(json["top_k"], 1);
        assert_eq!(json["return_documents"], false);
        assert_eq!(json["truncation"], true);
    }

    #[test]
    fn response_parses_with_and_without_documents() {
        let body = r#"{
            "object": "list",
            "data": [
                {"relevance_score": 0.91, "index": 1, "document": "cats"},
                {"relevance_score": 0.12, "index": 0}
            ],
            "model": "rerank-2",
            "usage": {"total_tokens": 26}
        }"#;
        let res: RerankResponse = serde_json::from_str(body).expect("parse");
        let top = res.top().expect("top");
        assert_eq!(top.index, 1);
        assert!((top.relevance_score - 0.91).abs() < 1e-6);
        assert_eq!(top.document.as_deref(), Some("cats"));
        assert_eq!(res.data[1].document, None);
        assert_eq!(res.usage.total_tokens, 26);
    }
}
