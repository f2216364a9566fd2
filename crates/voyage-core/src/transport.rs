use reqwest::blocking::Client;
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE, HeaderMap, HeaderValue};

use crate::config::ClientConfig;
use crate::error::VoyageError;

/// Status and body of one completed HTTP exchange.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawResponse {
    pub status: u16,
    pub body: Vec<u8>,
}

impl RawResponse {
    pub const fn is_success(&self) -> bool {
        self.status < 400
    }
}

/// Sends one POST with a JSON body. Implementations must not retry.
pub trait Transport: Send + Sync {
    fn post(&self, url: &str, body: Vec<u8>) -> Result<RawResponse, VoyageError>;
}

#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: Client,
}

impl HttpTransport {
    pub fn new(config: &ClientConfig) -> Result<Self, VoyageError> {
        let mut auth = HeaderValue::from_str(&format!("BEARER {}", config.resolve_api_key()))
            .map_err(|err| VoyageError::Config(format!("invalid api key header: {err}")))?;
        auth.set_sensitive(true);

        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, auth);
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        // The blocking client defaults to 30s; passing `None` keeps it unbounded.
        let client = Client::builder()
            .default_headers(headers)
            .timeout(config.timeout)
            .build()?;
        Ok(Self { client })
    }
}

impl Transport for HttpTransport {
    fn post(&self, url: &str, body: Vec<u8>) -> Result<RawResponse, VoyageError> {
        let res = self.client.post(url).body(body).send()?;
        let status = res.status().as_u16();
        let body = res.bytes()?.to_vec();
        Ok(RawResponse { status, body })
    }
}
