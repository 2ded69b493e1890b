//! Error types for the label printer library

use thiserror::Error;

pub(crate) const NO_PRINTERS_HELP: &str = "No DYMO printers detected. Please check:\n\n\
1. Power cycle your printer (unplug for 20 seconds)\n\
2. Make sure printer is connected directly to computer (not via USB hub)\n\
3. Check that printer appears in your system printer list\n\
4. Try restarting DYMO Connect\n\
5. Test printing from DYMO Connect app first\n\n\
If your printer works in DYMO Connect app but not here, try printing without specifying a printer name.";

pub(crate) const INVALID_XML_HELP: &str = "XML formatting error. Please check:\n\
1. Make sure your label template is valid\n\
2. Try restarting DYMO Connect\n\
3. Test printing from DYMO Connect app first";

pub(crate) const SUBMISSION_HELP: &str = "Troubleshooting steps:\n\
1. Power cycle your printer\n\
2. Check printer connection\n\
3. Try printing from DYMO Connect app first\n\
4. Restart DYMO Connect service";

/// Network-level failure talking to the printer service
///
/// Raised by [`PrinterServiceClient`](crate::PrinterServiceClient)
/// implementations when no HTTP response was obtained at all
/// (connection refused, TLS failure, timeout).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{0}")]
pub struct TransportError(pub String);

impl TransportError {
    pub fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }
}

/// Input rejected before any network activity
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// Category is blank or the "add new" selector entry
    #[error("Please select a label type")]
    NoCategory,

    /// SKU is blank after trimming
    #[error("Please enter a SKU")]
    NoSku,

    /// Copies outside the accepted range
    #[error("Please enter a quantity between 1 and {max}")]
    Copies { requested: u32, max: u8 },
}

/// Print workflow error types
///
/// Each variant's message is user facing and already carries the
/// remediation text where one applies.
#[derive(Debug, Error)]
pub enum PrintError {
    /// Missing or invalid user input, no network call was made
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// Status endpoint unreachable or answered with a non-success status
    #[error("DYMO Connect is not running or not accessible: {0}")]
    ServiceUnavailable(String),

    /// Status endpoint reachable but reports not ready
    #[error("DYMO Connect is not ready")]
    ServiceNotReady,

    /// Printer listing call failed
    #[error("Failed to get printers ({0})")]
    EnumerationError(String),

    /// Printer listing succeeded but is empty
    #[error("{}", NO_PRINTERS_HELP)]
    NoPrintersFound,

    /// Submission rejected because of malformed label markup
    #[error("{}", INVALID_XML_HELP)]
    InvalidLabelXml,

    /// Submission rejected for another reason
    #[error("{body}\n\n{}", SUBMISSION_HELP)]
    SubmissionError { body: String },

    /// Submission answered with something other than `true`
    #[error("Unexpected response: {0}")]
    UnexpectedResponse(String),

    /// A multi-copy run stopped part way
    #[error("Only {printed} of {requested} labels printed successfully: {source}")]
    Incomplete {
        printed: u8,
        requested: u8,
        #[source]
        source: Box<PrintError>,
    },

    /// Another print is still in flight
    #[error("A print is already in progress")]
    Busy,
}

impl PrintError {
    /// Input problems are reported before any network activity
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }

    /// Short machine-friendly kind name, used in logs
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Validation(_) => "validation",
            Self::ServiceUnavailable(_) => "service_unavailable",
            Self::ServiceNotReady => "service_not_ready",
            Self::EnumerationError(_) => "enumeration_error",
            Self::NoPrintersFound => "no_printers_found",
            Self::InvalidLabelXml => "invalid_label_xml",
            Self::SubmissionError { .. } => "submission_error",
            Self::UnexpectedResponse(_) => "unexpected_response",
            Self::Incomplete { .. } => "incomplete",
            Self::Busy => "busy",
        }
    }
}

/// Result type for print operations
pub type PrintResult<T> = Result<T, PrintError>;
