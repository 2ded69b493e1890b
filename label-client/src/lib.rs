//! Label Client - HTTP client for DYMO Connect
//!
//! Implements [`label_printer::PrinterServiceClient`] over the local DYMO
//! Connect web service (`StatusConnected`, `GetPrinters`, `PrintLabel`).

pub mod config;
pub mod error;
pub mod form;
pub mod http;

pub use config::{ClientConfig, DEFAULT_BASE_URL};
pub use error::{ClientError, ClientResult};
pub use http::DymoClient;
