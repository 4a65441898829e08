use super::{replace_all_checked, TextStage};
use anyhow::Result;
use fancy_regex::Regex;
use std::sync::LazyLock;

const CANONICAL: &str = "ст-ца";

// Recognized spellings of "станица", most specific first. The bare "ст"
// pattern refuses to match when "-ца" already follows, so the canonical form
// survives a second pass unchanged.
static FORMS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    [
        r"(?i)\bстани(?:ц|цы|цей|ца|це|цам|цами|цах)\b",
        r"(?i)\bст(?:\.|\b)(?!-ца)",
        r"(?i)\bста(?:н|н\.)\b",
        r"(?i)\bстц\b",
        r"(?i)\bстани\b",
    ]
    .iter()
    .map(|p| Regex::new(p).unwrap())
    .collect()
});

/// Rewrites every spelling of "станица" to the canonical "ст-ца"
pub struct StanitsaAbbreviator;

impl TextStage for StanitsaAbbreviator {
    fn name(&self) -> &'static str {
        "abbreviations"
    }

    fn apply(&self, text: &str) -> Result<String> {
        let mut result = text.to_string();
        for form in FORMS.iter() {
            result = replace_all_checked(form, &result, |_| CANONICAL.to_string())?;
        }
        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn abbr(text: &str) -> String {
        StanitsaAbbreviator.apply(text).unwrap()
    }

    #[test]
    fn full_word_and_inflected_forms() {
        assert_eq!(abbr("станица Ленинградская"), "ст-ца Ленинградская");
        assert_eq!(abbr("в станице Кущёвской"), "в ст-ца Кущёвской");
        assert_eq!(abbr("около станицы Динской"), "около ст-ца Динской");
    }

    #[test]
    fn short_forms() {
        assert_eq!(abbr("ст. Ленинградская"), "ст-ца Ленинградская");
        assert_eq!(abbr("стц Каневская"), "ст-ца Каневская");
        assert_eq!(abbr("стан Брюховецкая"), "ст-ца Брюховецкая");
    }

    #[test]
    fn case_insensitive() {
        assert_eq!(abbr("Станица Ленинградская"), "ст-ца Ленинградская");
        assert_eq!(abbr("СТ. Ленинградская"), "ст-ца Ленинградская");
    }

    #[test]
    fn canonical_form_is_idempotent() {
        assert_eq!(abbr("ст-ца Ленинградская"), "ст-ца Ленинградская");
    }

    #[test]
    fn unrelated_words_are_untouched() {
        assert_eq!(abbr("станок и стажёр"), "станок и стажёр");
        assert_eq!(abbr("страница документа"), "страница документа");
    }
}
