use super::TextStage;
use anyhow::Result;
use regex::Regex;
use std::sync::LazyLock;

// A straight quote opens after start-of-text or whitespace, closes before
// whitespace/punctuation/end-of-text. Whatever survives both passes is
// treated as closing.
static OPENING: LazyLock<Regex> = LazyLock::new(|| Regex::new(r#"(^|\s)""#).unwrap());
static CLOSING: LazyLock<Regex> = LazyLock::new(|| Regex::new(r#""(\s|[.!?;,]|$)"#).unwrap());

/// Converts straight double quotes to Russian guillemets « »
pub struct QuoteTypographer;

impl TextStage for QuoteTypographer {
    fn name(&self) -> &'static str {
        "quotes"
    }

    fn apply(&self, text: &str) -> Result<String> {
        let opened = OPENING.replace_all(text, "${1}«");
        let closed = CLOSING.replace_all(&opened, "»${1}");
        Ok(closed.replace('"', "»"))
    }
}
