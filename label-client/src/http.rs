//! HTTP client for the DYMO Connect printing endpoints

use std::error::Error as _;
use std::time::Duration;

use async_trait::async_trait;
use label_printer::{PrintJob, PrinterServiceClient, ServiceResponse, TransportError};
use reqwest::Client;
use reqwest::header::CONTENT_TYPE;
use tracing::{debug, instrument};

use crate::form::{FORM_CONTENT_TYPE, encode_form};
use crate::{ClientConfig, ClientError, ClientResult};

const STATUS_ENDPOINT: &str = "StatusConnected";
const PRINTERS_ENDPOINT: &str = "GetPrinters";
const PRINT_ENDPOINT: &str = "PrintLabel";

/// Network client for a DYMO Connect service
#[derive(Debug, Clone)]
pub struct DymoClient {
    client: Client,
    base_url: String,
    timeout: Duration,
    status_timeout: Duration,
}

impl DymoClient {
    /// Create a new client from configuration
    pub fn new(config: &ClientConfig) -> ClientResult<Self> {
        if config.base_url.trim().is_empty() {
            return Err(ClientError::InvalidConfig("empty base URL".into()));
        }

        let client = Client::builder()
            .timeout(config.timeout())
            .danger_accept_invalid_certs(config.accept_invalid_certs)
            .build()?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            timeout: config.timeout(),
            status_timeout: config.status_timeout(),
        })
    }

    /// Get the base URL
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, endpoint: &str) -> String {
        format!("{}/{}", self.base_url, endpoint)
    }

    #[instrument(skip(self), fields(base_url = %self.base_url))]
    async fn get_text(
        &self,
        endpoint: &str,
        timeout: Duration,
    ) -> Result<ServiceResponse, TransportError> {
        let response = self
            .client
            .get(self.url(endpoint))
            .timeout(timeout)
            .send()
            .await
            .map_err(transport_error)?;

        read_response(response).await
    }

    #[instrument(skip(self, body), fields(base_url = %self.base_url, body_len = body.len()))]
    async fn post_form(
        &self,
        endpoint: &str,
        body: String,
    ) -> Result<ServiceResponse, TransportError> {
        let response = self
            .client
            .post(self.url(endpoint))
            .header(CONTENT_TYPE, FORM_CONTENT_TYPE)
            .timeout(self.timeout)
            .body(body)
            .send()
            .await
            .map_err(transport_error)?;

        read_response(response).await
    }
}

#[async_trait]
impl PrinterServiceClient for DymoClient {
    async fn check_status(&self) -> Result<ServiceResponse, TransportError> {
        self.get_text(STATUS_ENDPOINT, self.status_timeout).await
    }

    async fn list_printers(&self) -> Result<ServiceResponse, TransportError> {
        self.get_text(PRINTERS_ENDPOINT, self.timeout).await
    }

    async fn submit_job(&self, job: &PrintJob) -> Result<ServiceResponse, TransportError> {
        let body = encode_form(job.fields());
        let printer = if job.printer_name.is_empty() {
            "default"
        } else {
            job.printer_name.as_str()
        };
        debug!(printer, "Sending print request");
        self.post_form(PRINT_ENDPOINT, body).await
    }
}

async fn read_response(response: reqwest::Response) -> Result<ServiceResponse, TransportError> {
    let status = response.status().as_u16();
    let body = response.text().await.map_err(transport_error)?;
    debug!(status, body_len = body.len(), "Response received");
    Ok(ServiceResponse::new(status, body))
}

/// Flatten the reqwest error chain into one message
fn transport_error(e: reqwest::Error) -> TransportError {
    let mut message = e.to_string();
    let mut source = e.source();
    while let Some(cause) = source {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        source = cause.source();
    }
    TransportError::new(message)
}
