use crate::config::ClassifierConfig;
use crate::types::Span;
use regex::Regex;
use std::sync::LazyLock;

// ===== NUMERIC CLASSIFIER =====
// Decides which digit tokens in a block are standalone numbers worth bold
// emphasis, and which are dates, year references or document identifiers that
// must stay plain. Exclusion is anchored to the candidate: a candidate is
// dropped only when it overlaps a date- or identifier-shaped region of the
// surrounding text, or is directly followed by a year word.

const MONTH_FULL_ALT: &str =
    "января|февраля|марта|апреля|мая|июня|июля|августа|сентября|октября|ноября|декабря";
const MONTH_ABBR_ALT: &str = "янв|фев|мар|апр|май|июн|июл|авг|сен|окт|ноя|дек";

/// A digit token found in block text, byte offsets into that text
#[derive(Debug, Clone, PartialEq)]
pub struct CandidateToken {
    pub text: String,
    pub start: usize,
    pub end: usize,
}

// Number shapes that qualify for emphasis, broadest grouping first.
// Grouped forms require at least one three-digit group; the bare form
// catches everything else.
static CANDIDATE_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    [
        r"[+-]?\d{1,3}(?: \d{3})+(?:[.,]\d+)?",
        r"[+-]?\d{1,3}(?:\x{2009}\d{3})+(?:[.,]\d+)?",
        r"[+-]?\d{1,3}(?:,\d{3})+(?:\.\d+)?",
        r"[+-]?\d{1,3}(?:\.\d{3})+(?:,\d+)?",
        r"[+-]?\d+(?:[.,]\d+)?",
    ]
    .iter()
    .map(|p| Regex::new(p).unwrap())
    .collect()
});

// Regions of text no candidate may overlap: dates in any recognized grammar,
// a number directly followed by a month name, and document/case identifiers
// (№-prefixed runs, letter-prefixed codes, digit runs joined by / or -,
// and a long digit group split from a short one by a space).
static EXCLUDED_REGION_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    [
        r"\b\d{1,2}[./-]\d{1,2}[./-]\d{2,4}\b".to_string(),
        r"\b\d{4}[./-]\d{1,2}[./-]\d{1,2}\b".to_string(),
        format!(r"(?i)\b\d{{1,2}}\s+(?:{MONTH_FULL_ALT})\s+\d{{4}}(?:\s*г\.)?"),
        format!(r"(?i)\b\d{{1,2}}\s+(?:{MONTH_ABBR_ALT})\.\s*\d{{2,4}}"),
        format!(r"(?i)\d+\s+(?:{MONTH_FULL_ALT})"),
        format!(r"(?i)\d+\s+(?:{MONTH_ABBR_ALT})\."),
        r"№\s*[\w-]*\d[\w/-]*(?:\s+\d[\w/-]*)*".to_string(),
        r"(?i)\b[а-яё]{1,2}\d{3,}[\w/-]*".to_string(),
        r"\d{3,}[/-]\d[\w/-]*".to_string(),
        r"\b\d{3,}\s+\d{2,4}\b".to_string(),
    ]
    .iter()
    .map(|p| Regex::new(p).unwrap())
    .collect()
});

/// Byte ranges within `window` that candidates must not overlap
pub(crate) fn excluded_regions(window: &str) -> Vec<(usize, usize)> {
    let mut regions = Vec::new();
    for pattern in EXCLUDED_REGION_PATTERNS.iter() {
        for m in pattern.find_iter(window) {
            regions.push((m.start(), m.end()));
        }
    }
    regions
}

// "г." may follow the digits directly; the spelled-out word needs a space.
// Inflections are enumerated so "годовщина" and similar words do not match.
static YEAR_WORD: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?: *г\.| +год(?:а|у|е|ом|ы|ов|ах|ам|ами)?\b)").unwrap()
});

/// True when the token ending at `end` is a year reference: "2024 год",
/// "2024 году", "2024 г." (with or without a space before "г.")
pub(crate) fn followed_by_year_word(text: &str, end: usize) -> bool {
    YEAR_WORD.is_match(&text[end..])
}

/// Window of `radius` chars on each side of [start, end).
/// Returns the slice and its byte base offset.
pub(crate) fn context_window(
    text: &str,
    start: usize,
    end: usize,
    radius: usize,
) -> (&str, usize) {
    let lo = text[..start]
        .char_indices()
        .rev()
        .take(radius)
        .last()
        .map_or(start, |(i, _)| i);
    let hi = text[end..]
        .char_indices()
        .nth(radius)
        .map_or(text.len(), |(i, _)| end + i);
    (&text[lo..hi], lo)
}

pub struct NumericClassifier {
    context_radius: usize,
}

impl NumericClassifier {
    pub fn new(config: &ClassifierConfig) -> Self {
        Self {
            context_radius: config.context_radius,
        }
    }

    /// Candidates that survive exclusion and overlap resolution,
    /// in ascending text order
    pub fn kept_candidates(&self, text: &str) -> Vec<CandidateToken> {
        let mut found: Vec<(CandidateToken, bool)> = Vec::new();
        for pattern in CANDIDATE_PATTERNS.iter() {
            for m in pattern.find_iter(text) {
                let token = CandidateToken {
                    text: m.as_str().to_string(),
                    start: m.start(),
                    end: m.end(),
                };
                let excluded = self.is_excluded(text, &token);
                found.push((token, excluded));
            }
        }

        // Earliest start wins; on a tie the longer match wins. Excluded
        // candidates still claim their range, so a bare fragment inside an
        // excluded grouped number never surfaces on its own.
        found.sort_by(|a, b| a.0.start.cmp(&b.0.start).then(b.0.end.cmp(&a.0.end)));
        let mut claimed: Vec<(usize, usize)> = Vec::new();
        let mut kept: Vec<CandidateToken> = Vec::new();
        for (token, excluded) in found {
            let overlaps = claimed
                .iter()
                .any(|&(s, e)| s < token.end && e > token.start);
            if overlaps {
                continue;
            }
            claimed.push((token.start, token.end));
            if !excluded {
                kept.push(token);
            }
        }
        kept
    }

    /// Split block text into plain and emphasized spans. Concatenating the
    /// returned spans always reproduces `text` exactly.
    pub fn partition(&self, text: &str) -> Vec<Span> {
        let kept = self.kept_candidates(text);
        if kept.is_empty() {
            return if text.is_empty() {
                Vec::new()
            } else {
                vec![Span::plain(text)]
            };
        }

        let mut spans = Vec::new();
        let mut last = 0usize;
        for token in &kept {
            if token.start > last {
                spans.push(Span::plain(&text[last..token.start]));
            }
            spans.push(Span::emphasized(&text[token.start..token.end]));
            last = token.end;
        }
        if last < text.len() {
            spans.push(Span::plain(&text[last..]));
        }
        spans
    }

    fn is_excluded(&self, text: &str, token: &CandidateToken) -> bool {
        if followed_by_year_word(text, token.end) {
            return true;
        }
        let (window, base) = context_window(text, token.start, token.end, self.context_radius);
        excluded_regions(window)
            .iter()
            .any(|&(s, e)| base + s < token.end && base + e > token.start)
    }
}
