use std::sync::Arc;

use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use crate::classify::classify;
use crate::config::ClientConfig;
use crate::error::{ApiError, VoyageError};
use crate::transport::{HttpTransport, Transport};

/// Owns the request lifecycle: encode once, send, classify, retry with a fixed
/// attempt budget, decode the success body.
///
/// Holds no per-call state, so one dispatcher can serve concurrent callers.
#[derive(Clone)]
pub struct Dispatcher {
    transport: Arc<dyn Transport>,
    config: ClientConfig,
    attempts: usize,
}

impl Dispatcher {
    pub fn new(config: ClientConfig) -> Result<Self, VoyageError> {
        let transport = HttpTransport::new(&config)?;
        Ok(Self::with_transport(config, Arc::new(transport)))
    }

    pub fn with_transport(config: ClientConfig, transport: Arc<dyn Transport>) -> Self {
        let attempts = config.attempt_budget();
        Self {
            transport,
            config,
            attempts,
        }
    }

    pub const fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub const fn attempts(&self) -> usize {
        self.attempts
    }

    /// POSTs `payload` to `path` under the configured base URL.
    ///
    /// Transport failures and fatal API errors end the call at once. Rate
    /// limits and server errors consume one attempt and resend the same bytes
    /// with no delay. Running out of attempts yields
    /// [`VoyageError::RetriesExhausted`].
    pub fn execute<Req, Res>(&self, path: &str, payload: &Req) -> Result<Res, VoyageError>
    where
        Req: Serialize + ?Sized,
        Res: DeserializeOwned,
    {
        let url = self.config.endpoint(path);
        let body = serde_json::to_vec(payload)?;

        let mut last: Option<ApiError> = None;
        for attempt in 1..=self.attempts {
            debug!(%url, attempt, max = self.attempts, "sending voyage request");
            let res = self.transport.post(&url, body.clone())?;

            if res.is_success() {
                debug!(%url, status = res.status, attempt, "voyage request succeeded");
                return Ok(serde_json::from_slice(&res.body)?);
            }

            let err = classify(res.status, &res.body)?;
            if !err.is_recoverable() {
                return Err(VoyageError::Api(err));
            }
            warn!(%url, attempt, status = res.status, error = %err, "recoverable voyage error");
            last = Some(err);
        }

        match last {
            Some(last) => Err(VoyageError::RetriesExhausted {
                attempts: self.attempts,
                last,
            }),
            None => Err(VoyageError::Config("attempt budget is empty".to_string())),
        }
    }
}

impl std::fmt::Debug for Dispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Dispatcher")
            .field("base_url", &self.config.base_url)
            .field("attempts", &self.attempts)
            .field("timeout", &self.config.timeout)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use std::collections::VecDeque;
    use std::sync::Mutex;

    use serde::Deserialize;

    use super::*;
    use crate::transport::RawResponse;

    /// Replays canned outcomes and records every request it receives.
    struct Scripted {
        outcomes: Mutex<VecDeque<Result<RawResponse, VoyageError>>>,
        seen: Mutex<Vec<(String, Vec<u8>)>>,
    }

    impl Scripted {
        fn new(outcomes: Vec<Result<RawResponse, VoyageError>>) -> Arc<Self> {
            Arc::new(Self {
                outcomes: Mutex::new(outcomes.into()),
                seen: Mutex::new(Vec::new()),
            })
        }

        fn calls(&self) -> usize {
            self.seen.lock().expect("lock").len()
        }
    }

    impl Transport for Scripted {
        fn post(&self, url: &str, body: Vec<u8>) -> Result<RawResponse, VoyageError> {
            self.seen.lock().expect("lock").push((url.to_string(), body));
            self.outcomes
                .lock()
                .expect("lock")
                .pop_front()
                .unwrap_or_else(|| Ok(reply(500, "{}")))
        }
    }

    fn reply(status: u16, body: &str) -> RawResponse {
        RawResponse {
            status,
            body: body.as_bytes().to_vec(),
        }
    }

    #[derive(Debug, Deserialize, PartialEq)]
    struct Echo {
        ok: bool,
    }

    fn dispatcher(max_retries: usize, transport: Arc<Scripted>) -> Dispatcher {
        let cfg = ClientConfig::new("test-key")
            .with_base_url("http://voyage.test/v1")
            .with_max_retries(max_retries);
        Dispatcher::with_transport(cfg, transport)
    }

    #[test]
    fn success_returns_on_first_attempt() {
        let transport = Scripted::new(vec![Ok(reply(200, r#"{"ok":true}"#))]);
        let out: Echo = dispatcher(3, transport.clone())
            .execute("/embeddings", &serde_json::json!({"input": ["a"]}))
            .expect("success");
        assert_eq!(out, Echo { ok: true });
        assert_eq!(transport.calls(), 1);

        let seen = transport.seen.lock().expect("lock");
        assert_eq!(seen[0].0, "http://voyage.test/v1/embeddings");
        assert_eq!(seen[0].1, br#"{"input":["a"]}"#.to_vec());
    }

    #[test]
    fn fatal_statuses_abort_after_one_attempt() {
        for status in [400_u16, 401, 422] {
            let transport = Scripted::new(vec![Ok(reply(status, r#"{"detail":"nope"}"#))]);
            let err = dispatcher(5, transport.clone())
                .execute::<_, Echo>("/rerank", &serde_json::json!({}))
                .expect_err("fatal");
            let api = err.api_error().expect("api error");
            assert_eq!(api.status(), status);
            assert_eq!(api.detail(), Some("nope"));
            assert!(matches!(err, VoyageError::Api(_)));
            assert_eq!(transport.calls(), 1, "status {status}");
        }
    }

    #[test]
    fn recoverable_errors_exhaust_the_budget() {
        let transport = Scripted::new(vec![
            Ok(reply(429, r#"{"detail":"slow"}"#)),
            Ok(reply(429, r#"{"detail":"slow"}"#)),
            Ok(reply(429, r#"{"detail":"slow"}"#)),
        ]);
        let err = dispatcher(3, transport.clone())
            .execute::<_, Echo>("/embeddings", &serde_json::json!({}))
            .expect_err("exhausted");
        match err {
            VoyageError::RetriesExhausted { attempts, last } => {
                assert_eq!(attempts, 3);
                assert_eq!(
                    last,
                    ApiError::RateLimited {
                        detail: "slow".into()
                    }
                );
            }
            other => panic!("unexpected error: {other}"),
        }
        assert_eq!(transport.calls(), 3);
    }

    #[test]
    fn rate_limit_without_detail_is_still_retried() {
        let transport = Scripted::new(vec![
            Ok(reply(429, r#"{"message":"x"}"#)),
            Ok(reply(200, r#"{"ok":true}"#)),
        ]);
        let out: Echo = dispatcher(2, transport.clone())
            .execute("/embeddings", &serde_json::json!({}))
            .expect("retried after proxy 429");
        assert!(out.ok);
        assert_eq!(transport.calls(), 2);
    }

    #[test]
    fn retry_resends_identical_body_then_succeeds() {
        let transport = Scripted::new(vec![
            Ok(reply(503, "gateway")),
            Ok(reply(200, r#"{"ok":true}"#)),
        ]);
        let out: Echo = dispatcher(2, transport.clone())
            .execute("/embeddings", &serde_json::json!({"model": "voyage-3"}))
            .expect("second attempt succeeds");
        assert!(out.ok);

        let seen = transport.seen.lock().expect("lock");
        assert_eq!(seen.len(), 2);
        assert_eq!(seen[0].1, seen[1].1);
    }

    #[test]
    fn zero_budget_behaves_like_single_attempt() {
        let transport = Scripted::new(vec![Ok(reply(500, "{}"))]);
        let d = dispatcher(0, transport.clone());
        assert_eq!(d.attempts(), 1);
        let err = d
            .execute::<_, Echo>("/embeddings", &serde_json::json!({}))
            .expect_err("server error");
        assert!(matches!(err, VoyageError::RetriesExhausted { attempts: 1, .. }));
        assert_eq!(transport.calls(), 1);
    }

    #[test]
    fn transport_failure_is_never_retried() {
        let transport = Scripted::new(vec![
            Err(VoyageError::Config("connection refused".into())),
            Ok(reply(200, r#"{"ok":true}"#)),
        ]);
        let err = dispatcher(3, transport.clone())
            .execute::<_, Echo>("/embeddings", &serde_json::json!({}))
            .expect_err("transport failure");
        assert!(matches!(err, VoyageError::Config(_)));
        assert_eq!(transport.calls(), 1);
    }

    #[test]
    fn malformed_success_body_is_serialization_error() {
        let transport = Scripted::new(vec![Ok(reply(200, "not json"))]);
        let err = dispatcher(3, transport.clone())
            .execute::<_, Echo>("/embeddings", &serde_json::json!({}))
            .expect_err("bad body");
        assert!(matches!(err, VoyageError::Serialization(_)));
        assert_eq!(transport.calls(), 1);
    }
}
