use super::TextStage;
use crate::classifier::{context_window, excluded_regions, followed_by_year_word};
use anyhow::Result;
use regex::Regex;
use std::sync::LazyLock;

static NUMBER_RUN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[+-]?\d+(?:[.,]\d+)?").unwrap());

/// Inserts space thousands separators into long integers: 2500000,75 becomes
/// 2 500 000,75. Digit runs inside dates, year references and document
/// identifiers are left exactly as written.
pub struct ThousandsGrouper {
    context_radius: usize,
}

impl Default for ThousandsGrouper {
    fn default() -> Self {
        Self { context_radius: 50 }
    }
}

impl ThousandsGrouper {
    pub fn new(context_radius: usize) -> Self {
        Self { context_radius }
    }

    fn should_skip(&self, text: &str, start: usize, end: usize) -> bool {
        if followed_by_year_word(text, end) {
            return true;
        }
        let (window, base) = context_window(text, start, end, self.context_radius);
        excluded_regions(window)
            .iter()
            .any(|&(s, e)| base + s < end && base + e > start)
    }
}

/// "2500000,75" -> "2 500 000,75"; the decimal tail is never regrouped
fn group_token(token: &str) -> String {
    let (sign, rest) = match token.strip_prefix(['+', '-']) {
        Some(rest) => (&token[..1], rest),
        None => ("", token),
    };
    let (integer, tail) = match rest.find([',', '.']) {
        Some(i) => (&rest[..i], &rest[i..]),
        None => (rest, ""),
    };
    if integer.len() <= 3 {
        return token.to_string();
    }

    let head = match integer.len() % 3 {
        0 => 3,
        n => n,
    };
    let mut grouped = String::with_capacity(integer.len() + integer.len() / 3);
    grouped.push_str(&integer[..head]);
    let mut i = head;
    while i < integer.len() {
        grouped.push(' ');
        grouped.push_str(&integer[i..i + 3]);
        i += 3;
    }
    format!("{sign}{grouped}{tail}")
}

impl TextStage for ThousandsGrouper {
    fn name(&self) -> &'static str {
        "thousands-grouping"
    }

    fn apply(&self, text: &str) -> Result<String> {
        let mut out = String::with_capacity(text.len());
        let mut last = 0usize;
        for m in NUMBER_RUN.find_iter(text) {
            out.push_str(&text[last..m.start()]);
            if self.should_skip(text, m.start(), m.end()) {
                out.push_str(m.as_str());
            } else {
                out.push_str(&group_token(m.as_str()));
            }
            last = m.end();
        }
        out.push_str(&text[last..]);
        Ok(out)
    }
}
