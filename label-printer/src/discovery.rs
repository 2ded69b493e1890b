//! Printer discovery
//!
//! Interprets the `GetPrinters` document. DYMO Connect has used several
//! schemas over its versions, so printer elements are looked up through an
//! ordered list of tag matchers; the first matcher with a hit wins.

use tracing::{debug, warn};

/// Empty collection document returned when no printer is attached
pub const EMPTY_PRINTERS_XML: &str = "<?xml version=\"1.0\" encoding=\"utf-8\"?>\n<Printers/>";

/// Marker that identifies an empty collection anywhere in the body
pub const EMPTY_PRINTERS_MARKER: &str = "<Printers/>";

/// Printer element tag names, in order of preference
pub const PRINTER_TAGS: [&str; 3] = ["LabelWriterPrinter", "Printer", "DYMOPrinter"];

/// Attributes that may carry the printer name, in order of preference
const NAME_ATTRIBUTES: [&str; 2] = ["Name", "name"];

/// Where a print job should be sent
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PrinterTarget {
    /// A printer found in the listing
    Named(String),
    /// Let the service pick its default printer
    Default,
}

impl PrinterTarget {
    /// Value of the `printerName` form field; empty means default
    pub fn printer_name(&self) -> &str {
        match self {
            Self::Named(name) => name,
            Self::Default => "",
        }
    }
}

impl std::fmt::Display for PrinterTarget {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Named(name) => write!(f, "{}", name),
            Self::Default => write!(f, "default printer"),
        }
    }
}

/// Result of reading a printer listing
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Discovery {
    /// Listing is empty or the explicit empty collection
    NoPrinters,
    /// At least one printer element found
    Found(PrinterTarget),
}

/// Interpret a `GetPrinters` response body.
pub fn discover(body: &str) -> Discovery {
    if is_empty_listing(body) {
        return Discovery::NoPrinters;
    }

    let doc = match roxmltree::Document::parse(body) {
        Ok(doc) => doc,
        Err(e) => {
            warn!(error = %e, "Printer listing is not a valid document, using default printer");
            return Discovery::Found(PrinterTarget::Default);
        }
    };

    for tag in PRINTER_TAGS {
        let mut matches = doc
            .descendants()
            .filter(|node| node.is_element() && node.tag_name().name() == tag);

        if let Some(first) = matches.next() {
            let count = 1 + matches.count();
            debug!(tag, count, "Found printer elements");
            return Discovery::Found(PrinterTarget::Named(printer_name(first)));
        }
    }

    debug!("No known printer element, using default printer");
    Discovery::Found(PrinterTarget::Default)
}

/// Empty body, the empty collection document, or any body holding the marker
pub fn is_empty_listing(body: &str) -> bool {
    let trimmed = body.trim();
    trimmed.is_empty() || trimmed == EMPTY_PRINTERS_XML || body.contains(EMPTY_PRINTERS_MARKER)
}

/// Name from the `Name`/`name` attribute, else a `<Name>` child, else the text content.
/// Empty values count as missing.
fn printer_name(node: roxmltree::Node<'_, '_>) -> String {
    for attr in NAME_ATTRIBUTES {
        if let Some(name) = node.attribute(attr).filter(|name| !name.is_empty()) {
            return name.to_string();
        }
    }

    let name_child = node
        .children()
        .find(|child| child.is_element() && child.tag_name().name() == "Name");
    if let Some(child) = name_child {
        let name = text_content(child).trim().to_string();
        if !name.is_empty() {
            return name;
        }
    }

    text_content(node).trim().to_string()
}

fn text_content(node: roxmltree::Node<'_, '_>) -> String {
    node.descendants()
        .filter(|n| n.is_text())
        .filter_map(|n| n.text())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_listings() {
        assert_eq!(discover(""), Discovery::NoPrinters);
        assert_eq!(discover("  \n "), Discovery::NoPrinters);
        assert_eq!(discover(EMPTY_PRINTERS_XML), Discovery::NoPrinters);
        assert_eq!(
            discover("<Envelope><Printers/></Envelope>"),
            Discovery::NoPrinters
        );
    }

    #[test]
    fn test_printer_name_attribute() {
        let body = r#"<Printers><Printer Name="DYMO LabelWriter 450"/></Printers>"#;
        assert_eq!(
            discover(body),
            Discovery::Found(PrinterTarget::Named("DYMO LabelWriter 450".into()))
        );
    }

    #[test]
    fn test_lowercase_name_attribute() {
        let body = r#"<Printers><DYMOPrinter name="Desk Printer"/></Printers>"#;
        assert_eq!(
            discover(body),
            Discovery::Found(PrinterTarget::Named("Desk Printer".into()))
        );
    }

    #[test]
    fn test_text_content_fallback() {
        let body = "<Printers><Printer>DYMO LabelWriter 450</Printer></Printers>";
        assert_eq!(
            discover(body),
            Discovery::Found(PrinterTarget::Named("DYMO LabelWriter 450".into()))
        );
    }

    #[test]
    fn test_empty_attribute_falls_through() {
        let body = r#"<Printers><Printer Name="" name="Desk"/></Printers>"#;
        assert_eq!(
            discover(body),
            Discovery::Found(PrinterTarget::Named("Desk".into()))
        );

        let body = r#"<Printers><Printer Name="">DYMO LabelWriter 450</Printer></Printers>"#;
        assert_eq!(
            discover(body),
            Discovery::Found(PrinterTarget::Named("DYMO LabelWriter 450".into()))
        );
    }

    #[test]
    fn test_name_child_element() {
        let body = r#"<?xml version="1.0" encoding="utf-8"?>
<Printers>
  <LabelWriterPrinter>
    <Name>DYMO LabelWriter 550</Name>
    <ModelName>DYMO LabelWriter 550</ModelName>
    <IsConnected>True</IsConnected>
  </LabelWriterPrinter>
</Printers>"#;
        assert_eq!(
            discover(body),
            Discovery::Found(PrinterTarget::Named("DYMO LabelWriter 550".into()))
        );
    }

    #[test]
    fn test_tag_preference_order() {
        let body = r#"<Printers>
  <Printer Name="generic"/>
  <LabelWriterPrinter Name="labelwriter"/>
</Printers>"#;
        assert_eq!(
            discover(body),
            Discovery::Found(PrinterTarget::Named("labelwriter".into()))
        );
    }

    #[test]
    fn test_first_element_wins() {
        let body = r#"<Printers><Printer Name="one"/><Printer Name="two"/></Printers>"#;
        assert_eq!(
            discover(body),
            Discovery::Found(PrinterTarget::Named("one".into()))
        );
    }

    #[test]
    fn test_unknown_schema_falls_back_to_default() {
        let body = r#"<Devices><Device Name="x"/></Devices>"#;
        assert_eq!(discover(body), Discovery::Found(PrinterTarget::Default));
        assert_eq!(PrinterTarget::Default.printer_name(), "");
    }

    #[test]
    fn test_unparseable_falls_back_to_default() {
        assert_eq!(
            discover("not a document <"),
            Discovery::Found(PrinterTarget::Default)
        );
    }
}
