use crate::types::TextBlock;

// ===== STYLE BASELINE =====
// The uniform document style lives in FormatConfig and is applied by the
// writer. Here we only erase per-run formatting inherited from the source
// document, keeping the emphasized flag — bold that authors already applied
// survives the reset.

/// Strip inherited run formatting from a block.
/// Returns true when the block carried any.
pub fn reset_formatting(block: &mut TextBlock) -> bool {
    let mut changed = false;
    for span in &mut block.spans {
        if span.source_style.take().is_some() {
            changed = true;
        }
    }
    changed
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{RunStyle, Span};

    #[test]
    fn reset_drops_source_style_and_keeps_emphasis() {
        let mut block = TextBlock {
            xml_index: 0,
            spans: vec![
                Span {
                    text: "важное".to_string(),
                    emphasized: true,
                    source_style: Some(RunStyle {
                        font_name: Some("Arial".to_string()),
                        font_size_pt: Some(10.0),
                        italic: true,
                        underline: false,
                    }),
                },
                Span::plain(" примечание"),
            ],
        };
        assert!(reset_formatting(&mut block));
        assert!(block.spans.iter().all(|s| s.source_style.is_none()));
        assert!(block.spans[0].emphasized);
    }

    #[test]
    fn reset_reports_untouched_block() {
        let mut block = TextBlock::with_text(1, "обычный текст");
        assert!(!reset_formatting(&mut block));
    }
}
