use crate::config::{BaselineStyle, FormatConfig, PageMargins};
use crate::types::{Document, TextBlock};
use anyhow::{bail, Context, Result};
use quick_xml::events::{BytesEnd, BytesStart, BytesText, Event};
use quick_xml::{Reader, Writer};
use std::collections::HashMap;
use std::fs::File;
use std::io::{BufWriter, Cursor, Write as IoWrite};
use std::path::Path;
use zip::write::FileOptions;
use zip::{ZipArchive, ZipWriter};

// Word measures margins and line spacing in twips (1/20 pt); 1 cm = 567 twips,
// single line spacing = 240 twips
fn cm_to_twips(cm: f32) -> u32 {
    (cm * 567.0).round() as u32
}

fn spacing_to_twips(multiple: f32) -> u32 {
    (multiple * 240.0).round() as u32
}

/// Produce the output archive: every part except word/document.xml is copied
/// raw from the source, the body is re-serialized from the block model
pub fn write_package(
    source: &[u8],
    document: &Document,
    config: &FormatConfig,
    output: &Path,
) -> Result<()> {
    let blocks: HashMap<usize, &TextBlock> = document
        .iter_blocks()
        .map(|b| (b.xml_index, b))
        .collect();

    let mut archive = ZipArchive::new(Cursor::new(source))?;
    let document_xml = {
        use std::io::Read;
        let mut part = archive.by_name(super::DOCUMENT_PART)?;
        let mut xml = String::with_capacity(part.size() as usize);
        part.read_to_string(&mut xml)?;
        xml
    };
    let rewritten = rewrite_document_xml(&document_xml, &blocks, config)?;

    let file = File::create(output)
        .with_context(|| format!("cannot create output file: {}", output.display()))?;
    let mut out = ZipWriter::new(BufWriter::new(file));
    for i in 0..archive.len() {
        let entry = archive.by_index_raw(i)?;
        if entry.name() == super::DOCUMENT_PART {
            continue;
        }
        out.raw_copy_file(entry)?;
    }
    out.start_file(super::DOCUMENT_PART, FileOptions::default())?;
    out.write_all(rewritten.as_bytes())?;
    out.finish()?;
    Ok(())
}

/// Walk the body XML; each w:p keeps its start tag and attributes but gets
/// fresh children: uniform paragraph properties plus runs from the block
/// with the matching stream position
fn rewrite_document_xml(
    xml: &str,
    blocks: &HashMap<usize, &TextBlock>,
    config: &FormatConfig,
) -> Result<String> {
    let mut reader = Reader::from_str(xml);
    let mut writer = Writer::new(Cursor::new(Vec::new()));
    let mut p_index = 0usize;

    loop {
        match reader.read_event()? {
            Event::Start(e) if e.name().as_ref() == b"w:p" => {
                writer.write_event(Event::Start(e))?;
                write_paragraph_children(&mut writer, blocks.get(&p_index).copied(), config)?;
                p_index += 1;
                skip_to_matching_end(&mut reader, b"w:p")?;
                writer.write_event(Event::End(BytesEnd::new("w:p")))?;
            }
            Event::Empty(e) if e.name().as_ref() == b"w:p" => {
                writer.write_event(Event::Start(e))?;
                write_paragraph_children(&mut writer, blocks.get(&p_index).copied(), config)?;
                p_index += 1;
                writer.write_event(Event::End(BytesEnd::new("w:p")))?;
            }
            Event::Empty(e) if e.name().as_ref() == b"w:pgMar" => {
                writer.write_event(Event::Empty(margins_element(&config.margins)))?;
            }
            Event::Eof => break,
            event => writer.write_event(event)?,
        }
    }

    let bytes = writer.into_inner().into_inner();
    String::from_utf8(bytes).context("rewritten body is not valid UTF-8")
}

/// Consume events up to and including the end tag that closes the element
/// we are currently inside
fn skip_to_matching_end(reader: &mut Reader<&[u8]>, tag: &[u8]) -> Result<()> {
    let mut depth = 1usize;
    loop {
        match reader.read_event()? {
            Event::Start(e) if e.name().as_ref() == tag => depth += 1,
            Event::End(e) if e.name().as_ref() == tag => {
                depth -= 1;
                if depth == 0 {
                    return Ok(());
                }
            }
            Event::Eof => bail!(
                "unexpected end of document inside <{}>",
                String::from_utf8_lossy(tag)
            ),
            _ => {}
        }
    }
}

fn write_paragraph_children<W: IoWrite>(
    writer: &mut Writer<W>,
    block: Option<&TextBlock>,
    config: &FormatConfig,
) -> Result<()> {
    write_paragraph_properties(writer, &config.baseline)?;
    let Some(block) = block else {
        return Ok(());
    };
    for span in &block.spans {
        if span.text.is_empty() {
            continue;
        }
        writer.write_event(Event::Start(BytesStart::new("w:r")))?;
        write_run_properties(writer, &config.baseline, span.emphasized)?;
        let mut t = BytesStart::new("w:t");
        t.push_attribute(("xml:space", "preserve"));
        writer.write_event(Event::Start(t))?;
        writer.write_event(Event::Text(BytesText::new(&span.text)))?;
        writer.write_event(Event::End(BytesEnd::new("w:t")))?;
        writer.write_event(Event::End(BytesEnd::new("w:r")))?;
    }
    Ok(())
}

/// Justified alignment and the configured line spacing for every paragraph
fn write_paragraph_properties<W: IoWrite>(
    writer: &mut Writer<W>,
    baseline: &BaselineStyle,
) -> Result<()> {
    writer.write_event(Event::Start(BytesStart::new("w:pPr")))?;

    let mut spacing = BytesStart::new("w:spacing");
    spacing.push_attribute(("w:before", "0"));
    spacing.push_attribute(("w:after", "0"));
    spacing.push_attribute(("w:line", spacing_to_twips(baseline.line_spacing).to_string().as_str()));
    spacing.push_attribute(("w:lineRule", "auto"));
    writer.write_event(Event::Empty(spacing))?;

    let mut jc = BytesStart::new("w:jc");
    jc.push_attribute(("w:val", "both"));
    writer.write_event(Event::Empty(jc))?;

    writer.write_event(Event::End(BytesEnd::new("w:pPr")))?;
    Ok(())
}

fn write_run_properties<W: IoWrite>(
    writer: &mut Writer<W>,
    baseline: &BaselineStyle,
    emphasized: bool,
) -> Result<()> {
    writer.write_event(Event::Start(BytesStart::new("w:rPr")))?;

    let mut fonts = BytesStart::new("w:rFonts");
    fonts.push_attribute(("w:ascii", baseline.font_name.as_str()));
    fonts.push_attribute(("w:hAnsi", baseline.font_name.as_str()));
    fonts.push_attribute(("w:cs", baseline.font_name.as_str()));
    writer.write_event(Event::Empty(fonts))?;

    if emphasized {
        writer.write_event(Event::Empty(BytesStart::new("w:b")))?;
    }

    let half_points = ((baseline.font_size_pt * 2.0).round() as u32).to_string();
    let mut sz = BytesStart::new("w:sz");
    sz.push_attribute(("w:val", half_points.as_str()));
    writer.write_event(Event::Empty(sz))?;
    let mut sz_cs = BytesStart::new("w:szCs");
    sz_cs.push_attribute(("w:val", half_points.as_str()));
    writer.write_event(Event::Empty(sz_cs))?;

    writer.write_event(Event::End(BytesEnd::new("w:rPr")))?;
    Ok(())
}

fn margins_element(margins: &PageMargins) -> BytesStart<'static> {
    let mut e = BytesStart::new("w:pgMar");
    e.push_attribute(("w:top", cm_to_twips(margins.top_cm).to_string().as_str()));
    e.push_attribute(("w:right", cm_to_twips(margins.right_cm).to_string().as_str()));
    e.push_attribute(("w:bottom", cm_to_twips(margins.bottom_cm).to_string().as_str()));
    e.push_attribute(("w:left", cm_to_twips(margins.left_cm).to_string().as_str()));
    e.push_attribute(("w:header", "708"));
    e.push_attribute(("w:footer", "708"));
    e.push_attribute(("w:gutter", "0"));
    e
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::docx::reader::parse_document_xml;
    use crate::types::Span;

    fn rewrite(xml: &str, doc: &Document) -> String {
        let blocks: HashMap<usize, &TextBlock> =
            doc.iter_blocks().map(|b| (b.xml_index, b)).collect();
        rewrite_document_xml(xml, &blocks, &FormatConfig::default()).unwrap()
    }

    #[test]
    fn paragraph_runs_are_replaced_from_the_block() {
        let xml = r#"<w:document xmlns:w="x"><w:body><w:p><w:r><w:rPr><w:i/></w:rPr><w:t>старый</w:t></w:r></w:p></w:body></w:document>"#;
        let mut doc = parse_document_xml(xml).unwrap();
        doc.blocks[0].spans = vec![Span::plain("на сумму "), Span::emphasized("1 500")];

        let out = rewrite(xml, &doc);
        assert!(out.contains("на сумму "));
        assert!(out.contains("<w:b/>"));
        assert!(!out.contains("старый"));
        assert!(!out.contains("<w:i/>"));
    }

    #[test]
    fn baseline_style_is_written_on_every_run() {
        let xml = r#"<w:document xmlns:w="x"><w:body><w:p><w:r><w:t>текст</w:t></w:r></w:p></w:body></w:document>"#;
        let doc = parse_document_xml(xml).unwrap();
        let out = rewrite(xml, &doc);
        assert!(out.contains(r#"w:ascii="Times New Roman""#));
        assert!(out.contains(r#"<w:sz w:val="28"/>"#));
        assert!(out.contains(r#"<w:spacing w:before="0" w:after="0" w:line="360" w:lineRule="auto"/>"#));
        assert!(out.contains(r#"<w:jc w:val="both"/>"#));
    }

    #[test]
    fn page_margins_are_rewritten() {
        let xml = r#"<w:document xmlns:w="x"><w:body><w:sectPr><w:pgMar w:top="1440" w:right="1440" w:bottom="1440" w:left="1440"/></w:sectPr></w:body></w:document>"#;
        let doc = Document::default();
        let out = rewrite(xml, &doc);
        // 1.0 cm top/bottom, 1.5 cm left/right
        assert!(out.contains(r#"w:top="567""#));
        assert!(out.contains(r#"w:left="851""#));
    }

    #[test]
    fn table_cell_paragraph_is_rewritten_in_place() {
        let xml = r#"<w:document xmlns:w="x"><w:body><w:tbl><w:tr><w:tc><w:p><w:r><w:t>было</w:t></w:r></w:p></w:tc></w:tr></w:tbl></w:body></w:document>"#;
        let mut doc = parse_document_xml(xml).unwrap();
        doc.tables[0].rows[0].cells[0].blocks[0].replace_text("стало".to_string());
        let out = rewrite(xml, &doc);
        assert!(out.contains("стало"));
        assert!(out.contains("<w:tbl>"));
        assert!(!out.contains("было"));
    }

    #[test]
    fn special_characters_are_escaped_in_output() {
        let xml = r#"<w:document xmlns:w="x"><w:body><w:p><w:r><w:t>x</w:t></w:r></w:p></w:body></w:document>"#;
        let mut doc = parse_document_xml(xml).unwrap();
        doc.blocks[0].replace_text("a < b & c".to_string());
        let out = rewrite(xml, &doc);
        assert!(out.contains("a &lt; b &amp; c"));
    }
}
