use crate::types::{Document, RunStyle, Span, Table, TableCell, TableRow, TextBlock};
use anyhow::Result;
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

/// Extract an attribute value by key from an element
fn get_attr(e: &BytesStart, key: &[u8]) -> Option<String> {
    e.attributes()
        .find(|a| a.as_ref().ok().map(|x| x.key.as_ref()) == Some(key))
        .and_then(Result::ok)
        .map(|attr| String::from_utf8_lossy(&attr.value).to_string())
}

/// Check if w:val explicitly turns a toggle property off ("0", "false", "none")
fn val_is_off(e: &BytesStart) -> bool {
    matches!(
        get_attr(e, b"w:val").as_deref(),
        Some("0") | Some("false") | Some("none")
    )
}

#[derive(Default)]
struct RunState {
    text: String,
    bold: bool,
    style: RunStyle,
}

/// Parse word/document.xml into the block model.
///
/// Every w:p in stream order gets the next xml_index, whether it sits in the
/// body, a table cell or a nested table — the writer walks paragraphs in the
/// same order, so indices line up positionally. Paragraphs of nested tables
/// are flattened into the enclosing top-level cell.
pub fn parse_document_xml(xml: &str) -> Result<Document> {
    let mut reader = Reader::from_str(xml);

    let mut doc = Document::default();
    let mut xml_index = 0usize;

    let mut table_depth = 0usize;
    let mut table: Option<Table> = None;
    let mut row: Option<TableRow> = None;
    let mut cell: Option<TableCell> = None;

    let mut block: Option<TextBlock> = None;
    // paragraphs nested inside a paragraph (textbox content) merge into the
    // enclosing block and get no index of their own
    let mut nested_p = 0usize;
    let mut run: Option<RunState> = None;
    let mut in_rpr = false;
    let mut in_text = false;

    loop {
        match reader.read_event()? {
            Event::Start(e) => match e.name().as_ref() {
                b"w:p" => {
                    if block.is_some() {
                        nested_p += 1;
                    } else {
                        block = Some(TextBlock::new(xml_index));
                        xml_index += 1;
                    }
                }
                b"w:r" if block.is_some() => run = Some(RunState::default()),
                b"w:rPr" if run.is_some() => in_rpr = true,
                b"w:t" if run.is_some() => in_text = true,
                b"w:tbl" => {
                    table_depth += 1;
                    if table_depth == 1 {
                        table = Some(Table::default());
                    }
                }
                b"w:tr" if table_depth == 1 => row = Some(TableRow::default()),
                b"w:tc" if table_depth == 1 => cell = Some(TableCell::default()),
                name => {
                    if in_rpr {
                        if let Some(run) = run.as_mut() {
                            apply_run_property(name, &e, run);
                        }
                    }
                }
            },
            Event::Empty(e) => match e.name().as_ref() {
                b"w:p" => {
                    if block.is_none() {
                        // an empty paragraph still occupies an index
                        attach_block(TextBlock::new(xml_index), cell.as_mut(), &mut doc);
                        xml_index += 1;
                    }
                }
                b"w:tab" | b"w:br" => {
                    if let Some(run) = run.as_mut() {
                        run.text.push(' ');
                    }
                }
                name => {
                    if in_rpr {
                        if let Some(run) = run.as_mut() {
                            apply_run_property(name, &e, run);
                        }
                    }
                }
            },
            Event::Text(t) => {
                if in_text {
                    if let Some(run) = run.as_mut() {
                        run.text.push_str(&t.unescape()?);
                    }
                }
            }
            Event::End(e) => match e.name().as_ref() {
                b"w:t" => in_text = false,
                b"w:rPr" => in_rpr = false,
                b"w:r" => {
                    if let (Some(run), Some(block)) = (run.take(), block.as_mut()) {
                        if !run.text.is_empty() {
                            block.spans.push(Span {
                                text: run.text,
                                emphasized: run.bold,
                                source_style: Some(run.style),
                            });
                        }
                    }
                }
                b"w:p" => {
                    if nested_p > 0 {
                        nested_p -= 1;
                    } else if let Some(block) = block.take() {
                        attach_block(block, cell.as_mut(), &mut doc);
                    }
                }
                b"w:tc" if table_depth == 1 => {
                    if let (Some(cell), Some(row)) = (cell.take(), row.as_mut()) {
                        row.cells.push(cell);
                    }
                }
                b"w:tr" if table_depth == 1 => {
                    if let (Some(row), Some(table)) = (row.take(), table.as_mut()) {
                        table.rows.push(row);
                    }
                }
                b"w:tbl" => {
                    if table_depth == 1 {
                        if let Some(table) = table.take() {
                            doc.tables.push(table);
                        }
                    }
                    table_depth = table_depth.saturating_sub(1);
                }
                _ => {}
            },
            Event::Eof => break,
            _ => {}
        }
    }

    Ok(doc)
}

fn apply_run_property(name: &[u8], e: &BytesStart, run: &mut RunState) {
    match name {
        b"w:b" => run.bold = !val_is_off(e),
        b"w:i" => run.style.italic = !val_is_off(e),
        b"w:u" => run.style.underline = !val_is_off(e),
        b"w:rFonts" => run.style.font_name = get_attr(e, b"w:ascii"),
        b"w:sz" => {
            // half-points on the wire
            run.style.font_size_pt = get_attr(e, b"w:val")
                .and_then(|v| v.parse::<f32>().ok())
                .map(|half| half / 2.0);
        }
        _ => {}
    }
}

fn attach_block(block: TextBlock, cell: Option<&mut TableCell>, doc: &mut Document) {
    match cell {
        Some(cell) => cell.blocks.push(block),
        None => doc.blocks.push(block),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const BODY: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<w:document xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main"><w:body>
<w:p><w:r><w:rPr><w:b/><w:sz w:val="28"/></w:rPr><w:t>жирный</w:t></w:r><w:r><w:t xml:space="preserve"> хвост</w:t></w:r></w:p>
<w:tbl><w:tr><w:tc><w:p><w:r><w:t>ячейка</w:t></w:r></w:p></w:tc></w:tr></w:tbl>
<w:p/>
<w:sectPr><w:pgMar w:top="1440" w:right="1440" w:bottom="1440" w:left="1440"/></w:sectPr>
</w:body></w:document>"#;

    #[test]
    fn parses_body_and_table_blocks() {
        let doc = parse_document_xml(BODY).unwrap();
        assert_eq!(doc.blocks.len(), 2);
        assert_eq!(doc.tables.len(), 1);
        assert_eq!(doc.blocks[0].flattened_text(), "жирный хвост");
        assert_eq!(
            doc.tables[0].rows[0].cells[0].blocks[0].flattened_text(),
            "ячейка"
        );
    }

    #[test]
    fn xml_indices_follow_stream_order() {
        let doc = parse_document_xml(BODY).unwrap();
        assert_eq!(doc.blocks[0].xml_index, 0);
        assert_eq!(doc.tables[0].rows[0].cells[0].blocks[0].xml_index, 1);
        assert_eq!(doc.blocks[1].xml_index, 2); // the empty paragraph
        assert!(doc.blocks[1].spans.is_empty());
    }

    #[test]
    fn bold_run_is_read_as_emphasized_with_source_style() {
        let doc = parse_document_xml(BODY).unwrap();
        let spans = &doc.blocks[0].spans;
        assert_eq!(spans.len(), 2);
        assert!(spans[0].emphasized);
        assert_eq!(
            spans[0].source_style.as_ref().unwrap().font_size_pt,
            Some(14.0)
        );
        assert!(!spans[1].emphasized);
    }

    #[test]
    fn explicit_bold_off_is_not_emphasized() {
        let xml = r#"<w:document xmlns:w="x"><w:body><w:p><w:r><w:rPr><w:b w:val="0"/></w:rPr><w:t>текст</w:t></w:r></w:p></w:body></w:document>"#;
        let doc = parse_document_xml(xml).unwrap();
        assert!(!doc.blocks[0].spans[0].emphasized);
    }

    #[test]
    fn nested_table_paragraphs_flatten_into_outer_cell() {
        let xml = r#"<w:document xmlns:w="x"><w:body><w:tbl><w:tr><w:tc><w:p><w:r><w:t>внешняя</w:t></w:r></w:p><w:tbl><w:tr><w:tc><w:p><w:r><w:t>вложенная</w:t></w:r></w:p></w:tc></w:tr></w:tbl></w:tc></w:tr></w:tbl></w:body></w:document>"#;
        let doc = parse_document_xml(xml).unwrap();
        let cell = &doc.tables[0].rows[0].cells[0];
        assert_eq!(cell.blocks.len(), 2);
        assert_eq!(cell.blocks[1].flattened_text(), "вложенная");
    }
}
