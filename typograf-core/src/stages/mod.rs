// Lexical rewrite stages. Each stage is a pure text transform applied to the
// flattened text of every block, in the fixed order lexical_stages() returns.
// Stages report errors instead of panicking so the pipeline can abort cleanly.

pub mod abbrev;
pub mod dates;
pub mod decimal;
pub mod percent;
pub mod quotes;
pub mod thousands;
pub mod whitespace;

use anyhow::{anyhow, Result};

/// A single text rewrite rule in the normalization pipeline
pub trait TextStage {
    /// Stable stage name used in reports and error messages
    fn name(&self) -> &'static str;

    /// Rewrite the text of one block. Returns the input unchanged when the
    /// rule does not apply.
    fn apply(&self, text: &str) -> Result<String>;
}

/// The lexical pipeline in canonical order. Quote and whitespace cleanup run
/// before the date/number rules so those see single ASCII spaces; grouping
/// runs last so it sees comma decimals and canonical dates.
pub fn lexical_stages() -> Vec<Box<dyn TextStage>> {
    vec![
        Box::new(whitespace::WhitespaceNormalizer),
        Box::new(quotes::QuoteTypographer),
        Box::new(dates::DateCanonicalizer),
        Box::new(decimal::DecimalCommaConverter),
        Box::new(percent::PercentSpacer),
        Box::new(abbrev::StanitsaAbbreviator),
        Box::new(thousands::ThousandsGrouper::default()),
    ]
}

/// replace_all over a fancy_regex pattern that surfaces engine errors
/// (the backtracking engine can fail at match time, unlike plain regex)
pub(crate) fn replace_all_checked(
    re: &fancy_regex::Regex,
    text: &str,
    mut rep: impl FnMut(&fancy_regex::Captures) -> String,
) -> Result<String> {
    let mut out = String::with_capacity(text.len());
    let mut last = 0usize;
    for caps in re.captures_iter(text) {
        let caps = caps?;
        let m = caps
            .get(0)
            .ok_or_else(|| anyhow!("capture group 0 missing"))?;
        out.push_str(&text[last..m.start()]);
        out.push_str(&rep(&caps));
        last = m.end();
    }
    out.push_str(&text[last..]);
    Ok(out)
}
