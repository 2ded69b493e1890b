//! Printer service seam
//!
//! The workflow talks to DYMO Connect only through [`PrinterServiceClient`],
//! so it can run against the real HTTP client or a test double.

use async_trait::async_trait;

use crate::error::TransportError;

/// Raw answer from one service endpoint
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceResponse {
    /// HTTP status code
    pub status: u16,
    /// Response body as text
    pub body: String,
}

impl ServiceResponse {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    /// 200 with the given body
    pub fn ok(body: impl Into<String>) -> Self {
        Self::new(200, body)
    }

    /// Any 2xx status
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Body equals `true` once whitespace is trimmed
    pub fn is_true(&self) -> bool {
        self.body.trim() == "true"
    }
}

/// One `PrintLabel` submission
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PrintJob {
    /// Target printer, empty for the service default
    pub printer_name: String,
    /// Print parameters document (unused, always empty)
    pub print_params_xml: String,
    /// Rendered label document
    pub label_xml: String,
    /// Label set document (unused, always empty)
    pub label_set_xml: String,
}

impl PrintJob {
    pub fn new(printer_name: impl Into<String>, label_xml: impl Into<String>) -> Self {
        Self {
            printer_name: printer_name.into(),
            label_xml: label_xml.into(),
            ..Default::default()
        }
    }

    /// Form fields in wire order
    pub fn fields(&self) -> [(&'static str, &str); 4] {
        [
            ("printerName", self.printer_name.as_str()),
            ("printParamsXml", self.print_params_xml.as_str()),
            ("labelXml", self.label_xml.as_str()),
            ("labelSetXml", self.label_set_xml.as_str()),
        ]
    }
}

/// Client for the DYMO Connect printing endpoints
///
/// Implementations return the raw status and body; classifying them is the
/// workflow's job. A [`TransportError`] means no response was received.
#[async_trait]
pub trait PrinterServiceClient: Send + Sync {
    /// `GET StatusConnected`
    async fn check_status(&self) -> Result<ServiceResponse, TransportError>;

    /// `GET GetPrinters`
    async fn list_printers(&self) -> Result<ServiceResponse, TransportError>;

    /// `POST PrintLabel`
    async fn submit_job(&self, job: &PrintJob) -> Result<ServiceResponse, TransportError>;
}
