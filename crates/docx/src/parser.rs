//! DOCX file parser implementation.

use quick_xml::events::Event;
use quick_xml::Reader;
use rsvp_core::{Error, Result};
use std::io::{Read, Seek};
use zip::ZipArchive;

/// Archive path of the document body.
const DOCUMENT_PATH: &str = "word/document.xml";

/// Parser for DOCX (Office Open XML) files.
pub struct DocxParser;

impl DocxParser {
    /// Create a new DOCX parser.
    pub fn new() -> Self {
        Self
    }

    /// Extract the running text of a DOCX package.
    ///
    /// Walks `word/document.xml`, concatenating the text runs of each
    /// paragraph; paragraphs are joined with blank lines. Tables, images,
    /// headers, and all formatting are ignored.
    pub fn parse<R: Read + Seek>(&self, reader: R) -> Result<String> {
        let mut archive = ZipArchive::new(reader)
            .map_err(|e| Error::Zip(format!("Failed to open ZIP: {}", e)))?;

        let content = self.read_file_from_archive(&mut archive, DOCUMENT_PATH)?;
        let paragraphs = self.extract_paragraphs_from_xml(&content)?;

        Ok(paragraphs.join("\n\n"))
    }

    /// Extract paragraph texts from the document XML.
    ///
    /// Text is collected only inside `t` elements, so the reader's own
    /// inter-tag whitespace never leaks in. Leading/trailing run spaces are
    /// kept as written (`xml:space="preserve"` runs matter in prose).
    fn extract_paragraphs_from_xml(&self, xml_content: &str) -> Result<Vec<String>> {
        let mut paragraphs = Vec::new();
        let mut reader = Reader::from_str(xml_content);

        let mut in_text_run = false;
        let mut current = String::new();

        loop {
            match reader.read_event() {
                Ok(Event::Start(ref e)) => {
                    if local_name(e.name().as_ref()) == b"t" {
                        in_text_run = true;
                    }
                }
                Ok(Event::Empty(ref e)) => match local_name(e.name().as_ref()) {
                    b"br" => current.push('\n'),
                    b"tab" => current.push('\t'),
                    _ => {}
                },
                Ok(Event::Text(ref e)) => {
                    if in_text_run {
                        let text = e.unescape().unwrap_or_default();
                        current.push_str(&text);
                    }
                }
                Ok(Event::End(ref e)) => match local_name(e.name().as_ref()) {
                    b"t" => in_text_run = false,
                    b"p" => {
                        let paragraph = current.trim().to_string();
                        if !paragraph.is_empty() {
                            paragraphs.push(paragraph);
                        }
                        current.clear();
                    }
                    _ => {}
                },
                Ok(Event::Eof) => break,
                Err(e) => {
                    return Err(Error::Xml(format!("Error parsing document XML: {}", e)));
                }
                _ => {}
            }
        }

        log::debug!("docx: extracted {} paragraphs", paragraphs.len());
        Ok(paragraphs)
    }

    /// Read a file from the ZIP archive.
    fn read_file_from_archive<R: Read + Seek>(
        &self,
        archive: &mut ZipArchive<R>,
        path: &str,
    ) -> Result<String> {
        let mut file = archive.by_name(path).map_err(|e| {
            Error::DocxParse(format!("Missing '{}' part in package: {}", path, e))
        })?;

        let mut content = String::new();
        file.read_to_string(&mut content)?;

        Ok(content)
    }
}

impl Default for DocxParser {
    fn default() -> Self {
        Self::new()
    }
}

/// Extract the local name from a potentially namespaced XML element name.
fn local_name(name: &[u8]) -> &[u8] {
    if let Some(pos) = name.iter().position(|&b| b == b':') {
        &name[pos + 1..]
    } else {
        name
    }
}
