use super::TextStage;
use anyhow::Result;
use regex::Regex;
use std::sync::LazyLock;

/// Typographic space variants that get folded into a regular ASCII space:
/// no-break, thin, hair, zero-width, narrow no-break, medium math, ideographic
const SPECIAL_SPACES: &[char] = &[
    '\u{00A0}', '\u{2009}', '\u{200A}', '\u{200B}', '\u{202F}', '\u{205F}', '\u{3000}',
];

static MULTI_SPACE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r" {2,}").unwrap());

/// Replaces special space characters with ASCII spaces and collapses runs
/// of spaces into one. Runs first so every later rule sees plain spaces.
pub struct WhitespaceNormalizer;

impl TextStage for WhitespaceNormalizer {
    fn name(&self) -> &'static str {
        "whitespace"
    }

    fn apply(&self, text: &str) -> Result<String> {
        let folded: String = text
            .chars()
            .map(|c| if SPECIAL_SPACES.contains(&c) { ' ' } else { c })
            .collect();
        Ok(MULTI_SPACE.replace_all(&folded, " ").into_owned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn folds_special_spaces_to_ascii() {
        let stage = WhitespaceNormalizer;
        let out = stage.apply("1\u{00A0}500\u{2009}руб.").unwrap();
        assert_eq!(out, "1 500 руб.");
    }

    #[test]
    fn collapses_space_runs() {
        let stage = WhitespaceNormalizer;
        let out = stage.apply("слово   и\u{00A0} ещё").unwrap();
        assert_eq!(out, "слово и ещё");
    }

    #[test]
    fn newlines_and_tabs_pass_through() {
        let stage = WhitespaceNormalizer;
        let out = stage.apply("первая\nвторая\tстрока").unwrap();
        assert_eq!(out, "первая\nвторая\tстрока");
    }
}
