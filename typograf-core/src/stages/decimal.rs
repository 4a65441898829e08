use super::{replace_all_checked, TextStage};
use anyhow::Result;
use fancy_regex::Regex;
use std::sync::LazyLock;

// A decimal like "12.5" but not the inner part of a multi-dot token such as
// "1.2.3" — the look-behind/look-ahead reject a separator-digit on either side
static DECIMAL_DOT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?<!\d[.,])\b\d+\.\d+\b(?![.,]\d)").unwrap());

/// Converts the decimal separator from dot to comma
pub struct DecimalCommaConverter;

impl TextStage for DecimalCommaConverter {
    fn name(&self) -> &'static str {
        "decimal-separator"
    }

    fn apply(&self, text: &str) -> Result<String> {
        replace_all_checked(&DECIMAL_DOT, text, |caps| {
            caps.get(0)
                .map(|m| m.as_str().replace('.', ","))
                .unwrap_or_default()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn conv(text: &str) -> String {
        DecimalCommaConverter.apply(text).unwrap()
    }

    #[test]
    fn simple_decimal() {
        assert_eq!(conv("рост 12.5 процента"), "рост 12,5 процента");
    }

    #[test]
    fn large_decimal() {
        assert_eq!(conv("сумма 2500000.75 руб."), "сумма 2500000,75 руб.");
    }

    #[test]
    fn version_numbers_are_left_alone() {
        assert_eq!(conv("версия 1.2.3"), "версия 1.2.3");
    }

    #[test]
    fn comma_decimal_is_untouched() {
        assert_eq!(conv("рост 12,5"), "рост 12,5");
    }

    #[test]
    fn integer_with_trailing_period_is_untouched() {
        assert_eq!(conv("итого 100."), "итого 100.");
    }
}
