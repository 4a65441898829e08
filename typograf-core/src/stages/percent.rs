use super::{replace_all_checked, TextStage};
use anyhow::Result;
use fancy_regex::Regex;
use std::sync::LazyLock;

// The look-behind keeps the rule from touching a percent sign that is
// already preceded by whitespace
static PERCENT_AFTER_NUMBER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(\d+(?:[.,]\d+)?)\s*(?<!\s)%").unwrap());

/// Ensures exactly one space between a number and the percent sign
pub struct PercentSpacer;

impl TextStage for PercentSpacer {
    fn name(&self) -> &'static str {
        "percent-spacing"
    }

    fn apply(&self, text: &str) -> Result<String> {
        replace_all_checked(&PERCENT_AFTER_NUMBER, text, |caps| {
            let number = caps.get(1).map(|m| m.as_str()).unwrap_or("");
            format!("{number} %")
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn space(text: &str) -> String {
        PercentSpacer.apply(text).unwrap()
    }

    #[test]
    fn glued_percent_gets_a_space() {
        assert_eq!(space("рост 12,5%"), "рост 12,5 %");
    }

    #[test]
    fn integer_percent() {
        assert_eq!(space("скидка 20%"), "скидка 20 %");
    }

    #[test]
    fn already_spaced_percent_is_idempotent() {
        assert_eq!(space("рост 12,5 %"), "рост 12,5 %");
    }

    #[test]
    fn percent_without_number_is_untouched() {
        assert_eq!(space("процент %"), "процент %");
    }
}
