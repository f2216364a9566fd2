use tracing::debug;
use voyage_core::{Dispatcher, VoyageError};

use crate::types::{RerankRequest, RerankResponse};

pub const RERANK_PATH: &str = "/rerank";

pub trait RerankApi {
    fn rerank(&self, request: &RerankRequest) -> Result<RerankResponse, VoyageError>;
}

impl RerankApi for Dispatcher {
    fn rerank(&self, request: &RerankRequest) -> Result<RerankResponse, VoyageError> {
        if request.documents.is_empty() {
            return Err(VoyageError::Config("rerank documents is empty".to_string()));
        }

        debug!(
            model = %request.model,
            documents = request.documents.len(),
            top_k = ?request.options.top_k,
            "reranking documents"
        );
        self.execute(RERANK_PATH, request)
    }
}
