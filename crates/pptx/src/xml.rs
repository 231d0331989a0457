//! Thin wrapper over the quick-xml writer used for every package part.

use deck_core::{Error, Result};
use quick_xml::escape::escape;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;

pub(crate) const NS_A: &str = "http://schemas.openxmlformats.org/drawingml/2006/main";
pub(crate) const NS_R: &str = "http://schemas.openxmlformats.org/officeDocument/2006/relationships";
pub(crate) const NS_P: &str = "http://schemas.openxmlformats.org/presentationml/2006/main";

/// Namespace declarations for PresentationML part roots.
pub(crate) const PML_NAMESPACES: [(&str, &str); 3] =
    [("xmlns:a", NS_A), ("xmlns:r", NS_R), ("xmlns:p", NS_P)];

pub(crate) struct XmlWriter {
    inner: Writer<Vec<u8>>,
}

impl XmlWriter {
    /// Start a document with the standalone UTF-8 declaration.
    pub fn new() -> Result<Self> {
        let mut writer = Self {
            inner: Writer::new(Vec::new()),
        };
        writer.write(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), Some("yes"))))?;
        Ok(writer)
    }

    fn write(&mut self, event: Event<'_>) -> Result<()> {
        self.inner
            .write_event(event)
            .map_err(|e| Error::XmlError(format!("Failed to write XML: {}", e)))
    }

    pub fn start(&mut self, name: &str, attrs: &[(&str, &str)]) -> Result<()> {
        let element = element(name, attrs)?;
        self.write(Event::Start(element))
    }

    pub fn empty(&mut self, name: &str, attrs: &[(&str, &str)]) -> Result<()> {
        let element = element(name, attrs)?;
        self.write(Event::Empty(element))
    }

    pub fn end(&mut self, name: &str) -> Result<()> {
        self.write(Event::End(BytesEnd::new(name)))
    }

    /// Escaped character data. Characters XML 1.0 cannot carry are an error.
    /// Carriage returns are written as `&#13;` so parsers do not fold them
    /// into line feeds.
    pub fn text(&mut self, text: &str) -> Result<()> {
        check_chars(text)?;
        let escaped = escape(text);
        let escaped = if escaped.contains('\r') {
            escaped.replace('\r', "&#13;").into()
        } else {
            escaped
        };
        self.write(Event::Text(BytesText::from_escaped(escaped)))
    }

    /// `<name attrs>text</name>`
    pub fn leaf(&mut self, name: &str, attrs: &[(&str, &str)], text: &str) -> Result<()> {
        self.start(name, attrs)?;
        self.text(text)?;
        self.end(name)
    }

    /// `<a:srgbClr val="RRGGBB"/>`, with an alpha child below full opacity.
    pub fn srgb(&mut self, hex: &str, opacity: u8) -> Result<()> {
        if opacity >= 100 {
            return self.empty("a:srgbClr", &[("val", hex)]);
        }
        let alpha = (u32::from(opacity) * 1000).to_string();
        self.start("a:srgbClr", &[("val", hex)])?;
        self.empty("a:alpha", &[("val", alpha.as_str())])?;
        self.end("a:srgbClr")
    }

    /// `<a:solidFill>` around a single color.
    pub fn solid_fill(&mut self, hex: &str, opacity: u8) -> Result<()> {
        self.start("a:solidFill", &[])?;
        self.srgb(hex, opacity)?;
        self.end("a:solidFill")
    }

    pub fn finish(self) -> Vec<u8> {
        self.inner.into_inner()
    }
}

fn element<'a>(name: &'a str, attrs: &[(&'a str, &'a str)]) -> Result<BytesStart<'a>> {
    for (_, value) in attrs {
        check_chars(value)?;
    }
    Ok(BytesStart::new(name).with_attributes(attrs.iter().copied()))
}

fn check_chars(text: &str) -> Result<()> {
    match text.chars().find(|&c| !is_xml_char(c)) {
        Some(c) => Err(Error::Serialization(format!(
            "Character U+{:04X} cannot be stored in XML",
            c as u32
        ))),
        None => Ok(()),
    }
}

/// The XML 1.0 `Char` production.
pub(crate) fn is_xml_char(c: char) -> bool {
    matches!(c, '\t' | '\n' | '\r')
        || ('\u{20}'..='\u{D7FF}').contains(&c)
        || ('\u{E000}'..='\u{FFFD}').contains(&c)
        || c >= '\u{10000}'
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_is_escaped() {
        let mut writer = XmlWriter::new().unwrap();
        writer.leaf("a:t", &[], "Fish & <chips>").unwrap();
        let xml = String::from_utf8(writer.finish()).unwrap();
        assert!(xml.starts_with("<?xml version=\"1.0\" encoding=\"UTF-8\" standalone=\"yes\"?>"));
        assert!(xml.contains("<a:t>Fish &amp; &lt;chips&gt;</a:t>"));
    }

    #[test]
    fn test_control_characters_rejected() {
        let mut writer = XmlWriter::new().unwrap();
        let err = writer.text("bell\u{7}").unwrap_err();
        assert!(matches!(err, Error::Serialization(_)));
        assert!(writer.text("tab\tnewline\n").is_ok());
    }

    #[test]
    fn test_control_characters_rejected_in_attributes() {
        let mut writer = XmlWriter::new().unwrap();
        let err = writer.empty("p:cNvPr", &[("descr", "bad\u{1}id")]).unwrap_err();
        assert!(matches!(err, Error::Serialization(_)));
        assert!(writer.start("a:p", &[("descr", "fine")]).is_ok());
    }

    #[test]
    fn test_carriage_return_is_a_reference() {
        let mut writer = XmlWriter::new().unwrap();
        writer.leaf("a:t", &[], "one\r & two").unwrap();
        let xml = String::from_utf8(writer.finish()).unwrap();
        assert!(xml.contains("<a:t>one&#13; &amp; two</a:t>"));
        assert!(!xml.contains('\r'));
    }

    #[test]
    fn test_translucent_color() {
        let mut writer = XmlWriter::new().unwrap();
        writer.solid_fill("0D0D14", 50).unwrap();
        let xml = String::from_utf8(writer.finish()).unwrap();
        assert!(xml.contains(r#"<a:srgbClr val="0D0D14"><a:alpha val="50000"/></a:srgbClr>"#));
    }
}
