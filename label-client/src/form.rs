//! `application/x-www-form-urlencoded` body building
//!
//! Each value is percent-encoded on its own and the pairs are joined by hand,
//! so an already-encoded document is never encoded a second time.

use urlencoding::encode;

/// Content type sent with form bodies
pub const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";

/// Join `name=value` pairs, encoding each value independently.
pub fn encode_form<'a, I>(fields: I) -> String
where
    I: IntoIterator<Item = (&'a str, &'a str)>,
{
    fields
        .into_iter()
        .map(|(name, value)| format!("{}={}", name, encode(value)))
        .collect::<Vec<_>>()
        .join("&")
}

#[cfg(test)]
mod tests {
    use super::*;
    use label_printer::PrintJob;

    #[test]
    fn test_empty_values_keep_their_keys() {
        let job = PrintJob::new("", "");
        assert_eq!(
            encode_form(job.fields()),
            "printerName=&printParamsXml=&labelXml=&labelSetXml="
        );
    }

    #[test]
    fn test_values_are_percent_encoded() {
        let job = PrintJob::new("DYMO LabelWriter 450", r#"<a b="1">x&y+z</a>"#);
        let body = encode_form(job.fields());
        assert!(body.starts_with("printerName=DYMO%20LabelWriter%20450&"));
        assert!(body.contains("labelXml=%3Ca%20b%3D%221%22%3Ex%26y%2Bz%3C%2Fa%3E&"));
        assert!(body.ends_with("&labelSetXml="));
    }

    #[test]
    fn test_percent_sign_is_encoded_once() {
        let body = encode_form([("labelXml", "100%")]);
        assert_eq!(body, "labelXml=100%25");
    }
}
