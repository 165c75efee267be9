use std::sync::{
    atomic::{AtomicUsize, Ordering},
    Arc,
};
use std::time::Duration;

use flow_logging::flow_debug;
use futures_util::StreamExt;
use reqwest::header::CONTENT_TYPE;

use crate::types::map_reqwest_error;
use crate::{FailureKind, FetchMetadata, FetchedImage, FlowId, ResultSlot, TransferError};

#[derive(Debug, Clone)]
pub struct FetchSettings {
    pub connect_timeout: Duration,
    pub request_timeout: Duration,
    pub redirect_limit: usize,
    pub max_bytes: u64,
}

impl Default for FetchSettings {
    fn default() -> Self {
        Self {
            connect_timeout: Duration::from_secs(10),
            request_timeout: Duration::from_secs(30),
            redirect_limit: 5,
            max_bytes: 20 * 1024 * 1024,
        }
    }
}

#[async_trait::async_trait]
pub trait ResultFetcher: Send + Sync {
    async fn fetch(&self, flow_id: FlowId, slot: ResultSlot)
        -> Result<FetchedImage, TransferError>;
}

#[derive(Debug, Clone)]
pub struct ReqwestFetcher {
    base_url: String,
    settings: FetchSettings,
}

impl ReqwestFetcher {
    pub fn new(base_url: impl Into<String>, settings: FetchSettings) -> Self {
        Self {
            base_url: base_url.into(),
            settings,
        }
    }

    fn build_client(
        &self,
        redirect_counter: Arc<AtomicUsize>,
    ) -> Result<reqwest::Client, TransferError> {
        let redirect_limit = self.settings.redirect_limit;
        let policy = reqwest::redirect::Policy::custom(move |attempt| {
            let count = attempt.previous().len();
            redirect_counter.store(count, Ordering::Relaxed);
            if count >= redirect_limit {
                attempt.error("redirect limit exceeded")
            } else {
                attempt.follow()
            }
        });

        reqwest::Client::builder()
            .connect_timeout(self.settings.connect_timeout)
            .timeout(self.settings.request_timeout)
            .redirect(policy)
            .build()
            .map_err(|err| TransferError::new(FailureKind::Network, err.to_string()))
    }
}

#[async_trait::async_trait]
impl ResultFetcher for ReqwestFetcher {
    async fn fetch(
        &self,
        flow_id: FlowId,
        slot: ResultSlot,
    ) -> Result<FetchedImage, TransferError> {
        // The endpoint path is fetched verbatim, with no cache-busting
        // query parameter; an intermediary cache may serve stale bytes.
        let endpoint = slot.endpoint_path();
        let parsed = reqwest::Url::parse(&format!("{}{}", self.base_url, endpoint))
            .map_err(|err| TransferError::new(FailureKind::InvalidUrl, err.to_string()))?;
        let redirect_counter = Arc::new(AtomicUsize::new(0));
        let client = self.build_client(redirect_counter.clone())?;

        flow_debug!("flow {} fetching {:?} from {}", flow_id, slot, endpoint);
        let response = client
            .get(parsed)
            .send()
            .await
            .map_err(map_reqwest_error)?;

        let status = response.status();
        if !status.is_success() {
            return Err(TransferError::new(
                FailureKind::HttpStatus(status.as_u16()),
                status.to_string(),
            ));
        }

        if let Some(content_len) = response.content_length() {
            if content_len > self.settings.max_bytes {
                return Err(TransferError::new(
                    FailureKind::TooLarge {
                        max_bytes: self.settings.max_bytes,
                        actual: Some(content_len),
                    },
                    "response too large",
                ));
            }
        }

        let final_url = response.url().to_string();
        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .map(|value| value.to_string());

        let mut bytes = Vec::new();
        let mut stream = response.bytes_stream();
        while let Some(chunk) = stream.next().await {
            let chunk = chunk.map_err(map_reqwest_error)?;
            let next_len = bytes.len() as u64 + chunk.len() as u64;
            if next_len > self.settings.max_bytes {
                return Err(TransferError::new(
                    FailureKind::TooLarge {
                        max_bytes: self.settings.max_bytes,
                        actual: Some(next_len),
                    },
                    "response too large",
                ));
            }
            bytes.extend_from_slice(&chunk);
        }

        let metadata = FetchMetadata {
            endpoint: endpoint.to_string(),
            final_url,
            redirect_count: redirect_counter.load(Ordering::Relaxed),
            content_type,
            byte_len: bytes.len() as u64,
        };

        Ok(FetchedImage { bytes, metadata })
    }
}
