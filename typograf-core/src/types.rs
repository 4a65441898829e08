use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ===== DOCUMENT MODEL =====
// The in-memory view of a .docx body: top-level paragraphs plus table cells.
// Every paragraph in word/document.xml (body or cell, any nesting depth) gets
// a TextBlock tagged with the order the paragraph appears in the XML stream,
// so the writer can match blocks back to paragraphs positionally.

/// Run formatting captured from the source document.
/// Stripped by the baseline reset — only the emphasized flag survives it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RunStyle {
    pub font_name: Option<String>,
    pub font_size_pt: Option<f32>,
    pub italic: bool,
    pub underline: bool,
}

/// One run of text inside a block. After formatting, a block is a partition
/// of its text into plain and emphasized spans.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Span {
    pub text: String,
    pub emphasized: bool,
    /// Formatting inherited from the source run, if any survived so far
    pub source_style: Option<RunStyle>,
}

impl Span {
    pub fn plain(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            emphasized: false,
            source_style: None,
        }
    }

    pub fn emphasized(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            emphasized: true,
            source_style: None,
        }
    }
}

/// A paragraph of text, in the body or inside a table cell
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TextBlock {
    /// Position of the backing paragraph in document-order over the XML stream
    pub xml_index: usize,
    pub spans: Vec<Span>,
}

impl TextBlock {
    pub fn new(xml_index: usize) -> Self {
        Self {
            xml_index,
            spans: Vec::new(),
        }
    }

    pub fn with_text(xml_index: usize, text: impl Into<String>) -> Self {
        let text = text.into();
        let spans = if text.is_empty() {
            Vec::new()
        } else {
            vec![Span::plain(text)]
        };
        Self { xml_index, spans }
    }

    /// Concatenation of all span texts, in order
    pub fn flattened_text(&self) -> String {
        self.spans.iter().map(|s| s.text.as_str()).collect()
    }

    /// Replace the whole block content with a single plain span
    pub fn replace_text(&mut self, text: String) {
        self.spans = if text.is_empty() {
            Vec::new()
        } else {
            vec![Span::plain(text)]
        };
    }

    pub fn has_emphasis(&self) -> bool {
        self.spans.iter().any(|s| s.emphasized)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TableCell {
    pub blocks: Vec<TextBlock>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TableRow {
    pub cells: Vec<TableCell>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Table {
    pub rows: Vec<TableRow>,
}

/// Parsed document body: top-level paragraphs plus tables.
/// Paragraphs of nested tables are flattened into the enclosing cell.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Document {
    pub blocks: Vec<TextBlock>,
    pub tables: Vec<Table>,
}

impl Document {
    /// All blocks in processing order: body paragraphs first, then table cells
    pub fn iter_blocks(&self) -> impl Iterator<Item = &TextBlock> {
        self.blocks.iter().chain(
            self.tables
                .iter()
                .flat_map(|t| t.rows.iter())
                .flat_map(|r| r.cells.iter())
                .flat_map(|c| c.blocks.iter()),
        )
    }

    pub fn iter_blocks_mut(&mut self) -> impl Iterator<Item = &mut TextBlock> {
        let Document { blocks, tables } = self;
        blocks.iter_mut().chain(
            tables
                .iter_mut()
                .flat_map(|t| t.rows.iter_mut())
                .flat_map(|r| r.cells.iter_mut())
                .flat_map(|c| c.blocks.iter_mut()),
        )
    }

    pub fn block_count(&self) -> usize {
        self.iter_blocks().count()
    }
}

// ===== RUN REPORTS =====

/// Outcome of a single pipeline stage over the whole document
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StageReport {
    pub stage: String,
    /// Blocks whose content the stage actually rewrote
    pub blocks_changed: usize,
    pub elapsed_ms: u64,
}

/// Summary of one formatting run, suitable for JSON export
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunReport {
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub blocks_total: usize,
    pub stages: Vec<StageReport>,
}

impl RunReport {
    pub fn total_elapsed_ms(&self) -> u64 {
        self.stages.iter().map(|s| s.elapsed_ms).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flattened_text_concatenates_spans_in_order() {
        let block = TextBlock {
            xml_index: 0,
            spans: vec![
                Span::plain("на сумму "),
                Span::emphasized("1 500"),
                Span::plain(" руб."),
            ],
        };
        assert_eq!(block.flattened_text(), "на сумму 1 500 руб.");
    }

    #[test]
    fn replace_text_with_empty_string_leaves_no_spans() {
        let mut block = TextBlock::with_text(3, "старый текст");
        block.replace_text(String::new());
        assert!(block.spans.is_empty());
        assert_eq!(block.flattened_text(), "");
    }

    #[test]
    fn iter_blocks_visits_body_then_table_cells() {
        let doc = Document {
            blocks: vec![TextBlock::with_text(0, "шапка")],
            tables: vec![Table {
                rows: vec![TableRow {
                    cells: vec![TableCell {
                        blocks: vec![TextBlock::with_text(1, "ячейка")],
                    }],
                }],
            }],
        };
        let order: Vec<String> = doc.iter_blocks().map(|b| b.flattened_text()).collect();
        assert_eq!(order, vec!["шапка", "ячейка"]);
        assert_eq!(doc.block_count(), 2);
    }
}
