// DOCX container access. A .docx is a zip archive; the document body lives in
// word/document.xml. The reader builds the block model from that part, the
// writer re-emits the archive with a rewritten body and leaves every other
// part byte-for-byte intact.

pub mod reader;
pub mod writer;

use crate::config::FormatConfig;
use crate::types::Document;
use anyhow::{Context, Result};
use std::fs;
use std::io::{Cursor, Read};
use std::path::Path;
use zip::ZipArchive;

const DOCUMENT_PART: &str = "word/document.xml";

/// An opened .docx file, held in memory so the writer can copy
/// untouched parts from it
pub struct DocxPackage {
    bytes: Vec<u8>,
}

impl DocxPackage {
    /// Read and validate the container. Fails when the file is not a zip
    /// archive or has no document body part.
    pub fn open(path: &Path) -> Result<Self> {
        let bytes = fs::read(path)
            .with_context(|| format!("cannot read file: {}", path.display()))?;
        let mut archive = ZipArchive::new(Cursor::new(bytes.as_slice()))
            .with_context(|| format!("not a DOCX (zip) container: {}", path.display()))?;
        archive
            .by_name(DOCUMENT_PART)
            .map(|_| ())
            .with_context(|| format!("no {} part in {}", DOCUMENT_PART, path.display()))?;
        Ok(Self { bytes })
    }

    pub(crate) fn document_xml(&self) -> Result<String> {
        let mut archive = ZipArchive::new(Cursor::new(self.bytes.as_slice()))?;
        let mut part = archive.by_name(DOCUMENT_PART)?;
        let mut xml = String::with_capacity(part.size() as usize);
        part.read_to_string(&mut xml)
            .context("document body is not valid UTF-8")?;
        Ok(xml)
    }

    /// Parse the document body into the block model
    pub fn parse(&self) -> Result<Document> {
        reader::parse_document_xml(&self.document_xml()?)
    }

    /// Write a new .docx with the formatted body, copying all other
    /// archive parts unchanged
    pub fn write_formatted(
        &self,
        document: &Document,
        config: &FormatConfig,
        output: &Path,
    ) -> Result<()> {
        writer::write_package(&self.bytes, document, config, output)
    }
}
