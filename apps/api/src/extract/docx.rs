//! DOCX text extraction — walks the paragraph events of `word/document.xml`.

use std::io::{Cursor, Read};

use anyhow::Result;
use quick_xml::events::Event;
use quick_xml::Reader;

const DOCUMENT_PART: &str = "word/document.xml";

/// Pulls paragraph text out of a DOCX archive, one line per `w:p` element.
/// Explicit line breaks (`w:br`) inside a paragraph become spaces so runs
/// split across breaks stay readable.
pub fn extract_docx_text(data: &[u8]) -> Result<String> {
    let mut archive = zip::ZipArchive::new(Cursor::new(data))?;

    let mut xml = String::new();
    archive
        .by_name(DOCUMENT_PART)?
        .read_to_string(&mut xml)?;

    let mut reader = Reader::from_str(&xml);
    reader.config_mut().trim_text(true);

    let mut buf = Vec::new();
    let mut paragraph = String::new();
    let mut paragraphs: Vec<String> = Vec::new();
    let mut in_paragraph = false;

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(e)) if e.name().as_ref() == b"w:p" => {
                in_paragraph = true;
                paragraph.clear();
            }
            Ok(Event::End(e)) if e.name().as_ref() == b"w:p" => {
                if !paragraph.trim().is_empty() {
                    paragraphs.push(paragraph.trim().to_string());
                }
                paragraph.clear();
                in_paragraph = false;
            }
            Ok(Event::Empty(e)) if in_paragraph && e.name().as_ref() == b"w:br" => {
                paragraph.push(' ');
            }
            Ok(Event::Text(e)) if in_paragraph => {
                paragraph.push_str(&e.xml_content()?);
            }
            Ok(Event::Eof) => break,
            Err(err) => return Err(err.into()),
            Ok(_) => {}
        }

        buf.clear();
    }

    Ok(paragraphs.join("\n"))
}
