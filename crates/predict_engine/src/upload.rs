use std::path::Path;
use std::time::Duration;

use flow_logging::flow_debug;
use reqwest::multipart::{Form, Part};

use crate::types::map_reqwest_error;
use crate::{FailureKind, FlowId, TransferError, UploadReceipt, UPLOAD_FIELD, UPLOAD_PATH};

#[derive(Debug, Clone)]
pub struct UploadSettings {
    pub connect_timeout: Duration,
    /// Upper bound for the whole request, including server-side inference.
    pub request_timeout: Duration,
}

impl Default for UploadSettings {
    fn default() -> Self {
        Self {
            connect_timeout: Duration::from_secs(10),
            request_timeout: Duration::from_secs(120),
        }
    }
}

#[async_trait::async_trait]
pub trait Uploader: Send + Sync {
    async fn upload(&self, flow_id: FlowId, file: &Path) -> Result<UploadReceipt, TransferError>;
}

#[derive(Debug, Clone)]
pub struct ReqwestUploader {
    base_url: String,
    settings: UploadSettings,
}

impl ReqwestUploader {
    pub fn new(base_url: impl Into<String>, settings: UploadSettings) -> Self {
        Self {
            base_url: base_url.into(),
            settings,
        }
    }

    fn build_client(&self) -> Result<reqwest::Client, TransferError> {
        reqwest::Client::builder()
            .connect_timeout(self.settings.connect_timeout)
            .timeout(self.settings.request_timeout)
            .build()
            .map_err(|err| TransferError::new(FailureKind::Network, err.to_string()))
    }
}

#[async_trait::async_trait]
impl Uploader for ReqwestUploader {
    async fn upload(&self, flow_id: FlowId, file: &Path) -> Result<UploadReceipt, TransferError> {
        let url = reqwest::Url::parse(&format!("{}{}", self.base_url, UPLOAD_PATH))
            .map_err(|err| TransferError::new(FailureKind::InvalidUrl, err.to_string()))?;

        let bytes = tokio::fs::read(file)
            .await
            .map_err(|err| TransferError::new(FailureKind::FileRead, err.to_string()))?;
        let file_name = file
            .file_name()
            .and_then(|name| name.to_str())
            .unwrap_or("upload")
            .to_string();
        flow_debug!(
            "flow {} uploading {} ({} bytes)",
            flow_id,
            file_name,
            bytes.len()
        );

        // The file goes over the wire untouched: raw bytes under the fixed
        // field name, no MIME type attached to the part.
        let part = Part::bytes(bytes).file_name(file_name);
        let form = Form::new().part(UPLOAD_FIELD, part);

        let client = self.build_client()?;
        let response = client
            .post(url)
            .multipart(form)
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

        // The body is only a success signal; drain it and keep the length.
        let body = response.bytes().await.map_err(map_reqwest_error)?;
        Ok(UploadReceipt {
            status: status.as_u16(),
            response_len: body.len() as u64,
        })
    }
}
