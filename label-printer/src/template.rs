//! Label document template
//!
//! One fixed DYMO `DieCutLabel` document (30252 Address, landscape) holding a
//! Code128A barcode with the SKU and a text object with the category.

/// Placeholder replaced by the category text
pub const LABEL_TYPE_PLACEHOLDER: &str = "{{LABEL_TYPE}}";

/// Placeholder replaced by the barcode value
pub const SKU_PLACEHOLDER: &str = "{{SKU}}";

/// Base label document
pub const BASE_LABEL_XML: &str = r#"<?xml version="1.0" encoding="utf-8"?>
<DieCutLabel Version="8.0" Units="twips" MediaType="Default">
  <PaperOrientation>Landscape</PaperOrientation>
  <Id>Address</Id>
  <PaperName>30252 Address</PaperName>
  <DrawCommands>
    <RoundRectangle X="0" Y="0" Width="1581" Height="5040" Rx="270" Ry="270"/>
  </DrawCommands>
  <ObjectInfo>
    <BarcodeObject>
      <Name>Barcode</Name>
      <ForeColor Alpha="255" Red="0" Green="0" Blue="0"/>
      <BackColor Alpha="0" Red="255" Green="255" Blue="255"/>
      <LinkedObjectName></LinkedObjectName>
      <Rotation>Rotation0</Rotation>
      <IsMirrored>False</IsMirrored>
      <IsVariable>True</IsVariable>
      <Text>{{SKU}}</Text>
      <Type>Code128A</Type>
      <Size>Small</Size>
      <TextPosition>Bottom</TextPosition>
      <TextFont Family="Arial" Size="9" Bold="False" Italic="False" Underline="False" Strikeout="False"/>
      <CheckSumFont Family="Arial" Size="7.3125" Bold="False" Italic="False" Underline="False" Strikeout="False"/>
      <TextEmbedding>None</TextEmbedding>
      <ECLevel>0</ECLevel>
      <HorizontalAlignment>Center</HorizontalAlignment>
      <QuietZonesPadding Left="0" Right="0" Top="0" Bottom="0"/>
    </BarcodeObject>
    <Bounds X="331.2" Y="680.3149" Width="4440.473" Height="765.7087"/>
  </ObjectInfo>
  <ObjectInfo>
    <TextObject>
      <Name>Text</Name>
      <ForeColor Alpha="255" Red="0" Green="0" Blue="0"/>
      <BackColor Alpha="0" Red="255" Green="255" Blue="255"/>
      <LinkedObjectName></LinkedObjectName>
      <Rotation>Rotation0</Rotation>
      <IsMirrored>False</IsMirrored>
      <IsVariable>True</IsVariable>
      <HorizontalAlignment>Center</HorizontalAlignment>
      <VerticalAlignment>Top</VerticalAlignment>
      <TextFitMode>ShrinkToFit</TextFitMode>
      <UseFullFontHeight>True</UseFullFontHeight>
      <Verticalized>False</Verticalized>
      <StyledText>
        <Element>
          <String>{{LABEL_TYPE}}</String>
          <Attributes>
            <Font Family="Arial" Size="12" Bold="False" Italic="False" Underline="False" Strikeout="False"/>
            <ForeColor Alpha="255" Red="0" Green="0" Blue="0"/>
          </Attributes>
        </Element>
      </StyledText>
    </TextObject>
    <Bounds X="331" Y="163" Width="4442" Height="341.5669"/>
  </ObjectInfo>
</DieCutLabel>"#;

/// How substituted values are written into the document
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ValueEscaping {
    /// Insert values verbatim. Reserved markup characters in a value
    /// will corrupt the rendered document.
    #[default]
    Literal,
    /// Escape `& < > " '` before insertion
    Xml,
}

/// Label template renderer
#[derive(Debug, Clone, Default)]
pub struct LabelTemplate {
    escaping: ValueEscaping,
}

impl LabelTemplate {
    pub fn new(escaping: ValueEscaping) -> Self {
        Self { escaping }
    }

    pub fn escaping(&self) -> ValueEscaping {
        self.escaping
    }

    /// Render the label for one category/SKU pair.
    ///
    /// Only the first occurrence of each placeholder is replaced; the base
    /// document holds exactly one of each.
    pub fn render(&self, category: &str, sku: &str) -> String {
        let category = self.prepare(category);
        let sku = self.prepare(sku);

        // SKU first so a category containing "{{SKU}}" is never re-substituted
        let xml = BASE_LABEL_XML.replacen(SKU_PLACEHOLDER, &sku, 1);
        replace_from(&xml, LABEL_TYPE_PLACEHOLDER, &category, sku_offset(&sku))
    }

    fn prepare(&self, value: &str) -> String {
        match self.escaping {
            ValueEscaping::Literal => value.to_string(),
            ValueEscaping::Xml => escape_xml(value),
        }
    }
}

/// Render with the default (literal) template.
pub fn render(category: &str, sku: &str) -> String {
    LabelTemplate::default().render(category, sku)
}

/// Escape the five XML special characters.
pub fn escape_xml(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for ch in value.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            _ => out.push(ch),
        }
    }
    out
}

/// Byte offset just past the substituted SKU in the rendered document.
fn sku_offset(sku: &str) -> usize {
    // The barcode object precedes the text object in the base document
    BASE_LABEL_XML
        .find(SKU_PLACEHOLDER)
        .map(|pos| pos + sku.len())
        .unwrap_or(0)
}

/// Replace the first `from` found at or after `start`.
fn replace_from(haystack: &str, from: &str, to: &str, start: usize) -> String {
    match haystack.get(start..).and_then(|tail| tail.find(from)) {
        Some(pos) => {
            let pos = start + pos;
            let mut out = String::with_capacity(haystack.len() + to.len());
            out.push_str(&haystack[..pos]);
            out.push_str(to);
            out.push_str(&haystack[pos + from.len()..]);
            out
        }
        None => haystack.to_string(),
    }
}
