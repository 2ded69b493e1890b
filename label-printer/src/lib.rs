//! # label-printer
//!
//! SKU barcode labels through the DYMO Connect web service.
//!
//! ## Scope
//!
//! This crate handles WHAT is printed and the print protocol:
//! - Label document templating (category + SKU)
//! - Printer discovery from the service's printer listing
//! - The status → printers → print workflow and its error classification
//!
//! Talking HTTP is left to a [`PrinterServiceClient`] implementation
//! (see the `label-client` crate).
//!
//! ## Example
//!
//! ```ignore
//! use label_printer::PrintWorkflow;
//! use std::sync::Arc;
//!
//! let workflow = PrintWorkflow::new(Arc::new(client));
//! let outcome = workflow.print_label("CPU", "SKU-12345").await?;
//! println!("{}", outcome.message());
//! ```

mod discovery;
mod error;
mod service;
mod template;
mod workflow;

// Re-exports
pub use discovery::{
    Discovery, EMPTY_PRINTERS_MARKER, EMPTY_PRINTERS_XML, PRINTER_TAGS, PrinterTarget, discover,
};
pub use error::{PrintError, PrintResult, TransportError, ValidationError};
pub use service::{PrintJob, PrinterServiceClient, ServiceResponse};
pub use template::{
    BASE_LABEL_XML, LABEL_TYPE_PLACEHOLDER, LabelTemplate, SKU_PLACEHOLDER, ValueEscaping,
    escape_xml, render,
};
pub use workflow::{
    DEFAULT_COPY_DELAY, MAX_COPIES, PrintOutcome, PrintProgress, PrintRequest, PrintWorkflow,
};
