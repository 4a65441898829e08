use super::{replace_all_checked, TextStage};
use anyhow::Result;
use fancy_regex::Regex as FancyRegex;
use regex::{Captures, Regex};
use std::sync::LazyLock;

/// Month names in genitive case, indexed by month number - 1
const MONTHS_GENITIVE: [&str; 12] = [
    "января",
    "февраля",
    "марта",
    "апреля",
    "мая",
    "июня",
    "июля",
    "августа",
    "сентября",
    "октября",
    "ноября",
    "декабря",
];

const MONTH_FULL_ALT: &str =
    "января|февраля|марта|апреля|мая|июня|июля|августа|сентября|октября|ноября|декабря";
const MONTH_ABBR_ALT: &str = "янв|фев|мар|апр|май|июн|июл|авг|сен|окт|ноя|дек";

// Numeric dates: day-first and ISO-style year-first
static NUMERIC_DMY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b(\d{1,2})[./-](\d{1,2})[./-](\d{2,4})\b").unwrap());
static NUMERIC_YMD: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b(\d{4})[./-](\d{1,2})[./-](\d{1,2})\b").unwrap());

// Worded dates with abbreviated or full month names. The "г."-suffixed forms
// must be rewritten before the bare forms, and the bare forms must refuse to
// match when "г" follows — otherwise a date that already carries the suffix
// would receive a second one.
static WORDY_ABBR_SUFFIXED: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(
        r"\b(\d{{1,2}})\s+({MONTH_ABBR_ALT})\.\s*(\d{{4}})\s+г\."
    ))
    .unwrap()
});
static WORDY_ABBR: LazyLock<FancyRegex> = LazyLock::new(|| {
    FancyRegex::new(&format!(
        r"\b(\d{{1,2}})\s+({MONTH_ABBR_ALT})\.\s*(\d{{4}})\b(?!\s*г)"
    ))
    .unwrap()
});
static WORDY_FULL_SUFFIXED: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(
        r"\b(\d{{1,2}})\s+({MONTH_FULL_ALT})\s+(\d{{4}})\s+г\."
    ))
    .unwrap()
});
static WORDY_FULL: LazyLock<FancyRegex> = LazyLock::new(|| {
    FancyRegex::new(&format!(
        r"\b(\d{{1,2}})\s+({MONTH_FULL_ALT})\s+(\d{{4}})\b(?!\s*г)"
    ))
    .unwrap()
});

fn month_genitive(month: u32) -> Option<&'static str> {
    MONTHS_GENITIVE.get(month.checked_sub(1)? as usize).copied()
}

fn expand_month_abbrev(abbr: &str) -> Option<&'static str> {
    let idx = MONTH_ABBR_ALT.split('|').position(|a| a == abbr.to_lowercase())?;
    MONTHS_GENITIVE.get(idx).copied()
}

/// Two-digit years below 30 land in the 2000s, the rest in the 1900s
fn expand_year(year: &str) -> String {
    if year.len() == 2 {
        match year.parse::<u32>() {
            Ok(n) if n < 30 => format!("20{year}"),
            Ok(_) => format!("19{year}"),
            Err(_) => year.to_string(),
        }
    } else {
        year.to_string()
    }
}

/// Leaves the match untouched when the month is out of range
fn rewrite_numeric_dmy(caps: &Captures) -> String {
    let month_name = caps[2].parse::<u32>().ok().and_then(month_genitive);
    let day = caps[1].parse::<u32>().ok();
    match (day, month_name) {
        (Some(day), Some(month_name)) => {
            format!("{day} {month_name} {} г.", expand_year(&caps[3]))
        }
        _ => caps[0].to_string(),
    }
}

fn rewrite_numeric_ymd(caps: &Captures) -> String {
    let month_name = caps[2].parse::<u32>().ok().and_then(month_genitive);
    let day = caps[3].parse::<u32>().ok();
    match (day, month_name) {
        (Some(day), Some(month_name)) => format!("{day} {month_name} {} г.", &caps[1]),
        _ => caps[0].to_string(),
    }
}

fn rewrite_wordy_abbrev(caps: &fancy_regex::Captures) -> String {
    let day = caps.get(1).map(|m| m.as_str()).unwrap_or("");
    let abbr = caps.get(2).map(|m| m.as_str()).unwrap_or("");
    let year = caps.get(3).map(|m| m.as_str()).unwrap_or("");
    match expand_month_abbrev(abbr) {
        Some(month_name) => format!("{day} {month_name} {year} г."),
        None => caps
            .get(0)
            .map(|m| m.as_str().to_string())
            .unwrap_or_default(),
    }
}

/// Rewrites every recognized date grammar to the canonical
/// "D <month-genitive> YYYY г." form
pub struct DateCanonicalizer;

impl TextStage for DateCanonicalizer {
    fn name(&self) -> &'static str {
        "dates"
    }

    fn apply(&self, text: &str) -> Result<String> {
        let t = NUMERIC_DMY.replace_all(text, |caps: &Captures| rewrite_numeric_dmy(caps));
        let t = NUMERIC_YMD.replace_all(&t, |caps: &Captures| rewrite_numeric_ymd(caps));
        let t = WORDY_ABBR_SUFFIXED.replace_all(&t, |caps: &Captures| {
            match expand_month_abbrev(&caps[2]) {
                Some(month_name) => format!("{} {month_name} {} г.", &caps[1], &caps[3]),
                None => caps[0].to_string(),
            }
        });
        let t = replace_all_checked(&WORDY_ABBR, &t, rewrite_wordy_abbrev)?;
        let t = WORDY_FULL_SUFFIXED
            .replace_all(&t, |caps: &Captures| {
                format!("{} {} {} г.", &caps[1], &caps[2], &caps[3])
            })
            .into_owned();
        let t = replace_all_checked(&WORDY_FULL, &t, |caps| {
            let get = |i: usize| caps.get(i).map(|m| m.as_str()).unwrap_or("");
            format!("{} {} {} г.", get(1), get(2), get(3))
        })?;
        Ok(t)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn canon(text: &str) -> String {
        DateCanonicalizer.apply(text).unwrap()
    }

    #[test]
    fn numeric_day_first_date() {
        assert_eq!(canon("подписан 12.03.2024 в Москве"), "подписан 12 марта 2024 г. в Москве");
    }

    #[test]
    fn numeric_date_with_dashes_and_slashes() {
        assert_eq!(canon("12-03-2024"), "12 марта 2024 г.");
        assert_eq!(canon("12/03/2024"), "12 марта 2024 г.");
    }

    #[test]
    fn iso_year_first_date() {
        assert_eq!(canon("2024.03.12"), "12 марта 2024 г.");
        assert_eq!(canon("2024-03-05"), "5 марта 2024 г.");
    }

    #[test]
    fn two_digit_year_pivot() {
        assert_eq!(canon("01.04.99"), "1 апреля 1999 г.");
        assert_eq!(canon("01.04.29"), "1 апреля 2029 г.");
        assert_eq!(canon("01.04.30"), "1 апреля 1930 г.");
    }

    #[test]
    fn leading_zero_day_is_stripped() {
        assert_eq!(canon("05.03.2024"), "5 марта 2024 г.");
    }

    #[test]
    fn out_of_range_month_is_left_alone() {
        assert_eq!(canon("05.13.2024"), "05.13.2024");
        assert_eq!(canon("12.00.2024"), "12.00.2024");
    }

    #[test]
    fn abbreviated_month_name() {
        assert_eq!(canon("5 мар. 2024"), "5 марта 2024 г.");
        assert_eq!(canon("5 Мар. 2024"), "5 Мар. 2024"); // alternation is lowercase only
    }

    #[test]
    fn abbreviated_month_with_existing_suffix_gets_no_second_suffix() {
        assert_eq!(canon("5 мар. 2024 г."), "5 марта 2024 г.");
    }

    #[test]
    fn full_month_without_suffix_gains_one() {
        assert_eq!(canon("12 марта 2024"), "12 марта 2024 г.");
    }

    #[test]
    fn canonical_form_is_idempotent() {
        let text = "договор от 12 марта 2024 г. и счёт от 1 апреля 1999 г.";
        assert_eq!(canon(text), text);
        assert_eq!(canon(&canon(text)), canon(text));
    }

    #[test]
    fn version_like_token_is_not_a_date() {
        // month 88 is out of range
        assert_eq!(canon("версия 45.88.2024"), "версия 45.88.2024");
    }
}
