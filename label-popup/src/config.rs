// label-popup/src/config.rs
// Command line and environment configuration

use std::path::PathBuf;
use std::time::Duration;

use clap::{Parser, Subcommand};
use label_client::{ClientConfig, DEFAULT_BASE_URL};
use label_printer::{LabelTemplate, ValueEscaping};

use crate::store::JsonFileStore;

/// Print SKU barcode labels through DYMO Connect
///
/// Every option can also be set through the environment (or a `.env` file).
#[derive(Debug, Clone, Parser)]
#[command(name = "label-popup", version, about)]
pub struct Cli {
    /// DYMO Connect printing service base URL
    #[arg(long, env = "DYMO_BASE_URL", default_value = DEFAULT_BASE_URL)]
    pub base_url: String,

    /// Request timeout in seconds
    #[arg(long, env = "DYMO_TIMEOUT_SECS", default_value_t = 10)]
    pub timeout: u64,

    /// Status check timeout in seconds
    #[arg(long, env = "DYMO_STATUS_TIMEOUT_SECS", default_value_t = 5)]
    pub status_timeout: u64,

    /// Reject the self-signed certificate DYMO Connect serves
    #[arg(long, env = "DYMO_STRICT_TLS")]
    pub strict_tls: bool,

    /// Category store file (defaults to ~/.dymo_label_printer.json)
    #[arg(long, env = "LABEL_STORE_PATH")]
    pub store_path: Option<PathBuf>,

    /// XML-escape the category and SKU before inserting them into the label
    #[arg(long, env = "LABEL_ESCAPE_XML")]
    pub escape_xml: bool,

    /// Pause between copies in milliseconds
    #[arg(long, env = "LABEL_COPY_DELAY_MS", default_value_t = 500)]
    pub copy_delay_ms: u64,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, env = "LOG_LEVEL", default_value = "info")]
    pub log_level: String,

    /// Also write logs to daily files in this directory
    #[arg(long, env = "LOG_DIR")]
    pub log_dir: Option<String>,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Open the interactive popup (default)
    Popup,

    /// Print a label without opening the popup
    Print {
        /// Label type printed above the barcode
        #[arg(long, short)]
        category: String,

        /// SKU encoded in the barcode
        #[arg(long, short)]
        sku: String,

        /// Number of copies (1-99)
        #[arg(long, short = 'n', default_value_t = 1)]
        copies: u32,
    },

    /// List the stored label types
    Categories,

    /// Add a label type to the store
    AddCategory { name: String },
}

impl Cli {
    /// Load `.env` (if any) and parse the command line
    pub fn load() -> Self {
        dotenvy::dotenv().ok();
        Self::parse()
    }

    pub fn command(&self) -> Command {
        self.command.clone().unwrap_or(Command::Popup)
    }

    pub fn client_config(&self) -> ClientConfig {
        let config = ClientConfig::new(self.base_url.clone())
            .with_timeout(self.timeout)
            .with_status_timeout(self.status_timeout);
        if self.strict_tls {
            config.with_strict_tls()
        } else {
            config
        }
    }

    pub fn template(&self) -> LabelTemplate {
        if self.escape_xml {
            LabelTemplate::new(ValueEscaping::Xml)
        } else {
            LabelTemplate::default()
        }
    }

    pub fn copy_delay(&self) -> Duration {
        Duration::from_millis(self.copy_delay_ms)
    }

    pub fn store(&self) -> JsonFileStore {
        let path = self
            .store_path
            .clone()
            .unwrap_or_else(JsonFileStore::default_path);
        JsonFileStore::new(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let cli = Cli::try_parse_from(["label-popup"]).unwrap();
        assert_eq!(cli.base_url, DEFAULT_BASE_URL);
        assert_eq!(cli.copy_delay(), Duration::from_millis(500));
        assert!(matches!(cli.command(), Command::Popup));
        assert_eq!(cli.template().escaping(), ValueEscaping::Literal);

        let config = cli.client_config();
        assert!(config.accept_invalid_certs);
        assert_eq!(config.timeout, 10);
        assert_eq!(config.status_timeout, 5);
    }

    #[test]
    fn test_print_command() {
        let cli = Cli::try_parse_from([
            "label-popup",
            "--strict-tls",
            "--escape-xml",
            "--store-path",
            "/tmp/labels.json",
            "print",
            "--category",
            "cpu",
            "--sku",
            "12345",
            "-n",
            "3",
        ])
        .unwrap();

        assert!(!cli.client_config().accept_invalid_certs);
        assert_eq!(cli.template().escaping(), ValueEscaping::Xml);
        assert_eq!(cli.store().path(), std::path::Path::new("/tmp/labels.json"));
        match cli.command() {
            Command::Print {
                category,
                sku,
                copies,
            } => {
                assert_eq!(category, "cpu");
                assert_eq!(sku, "12345");
                assert_eq!(copies, 3);
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }
}
