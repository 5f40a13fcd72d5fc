use crate::error::ScrapeError;
use crate::model::Recipe;
use html_escape::decode_html_entities;
use scraper::Html;

mod json_ld;
mod microdata;
mod page;

pub use json_ld::JsonLdExtractor;
pub use microdata::MicroDataExtractor;
pub use page::PageMeta;

pub struct ParsingContext {
    pub url: String,
    pub document: Html,
}

pub trait Extractor {
    fn parse(&self, context: &ParsingContext) -> Result<Recipe, ScrapeError>;
}

/// Decode entities, drop inline markup and collapse whitespace.
pub(crate) fn normalize_text(text: &str) -> String {
    // for some reason need to decode twice to get the correct string
    let decoded = decode_html_entities(&decode_html_entities(text)).into_owned();

    let stripped = if decoded.contains('<') {
        Html::parse_fragment(&decoded)
            .root_element()
            .text()
            .collect::<Vec<_>>()
            .join(" ")
    } else {
        decoded
    };

    stripped.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Convert an ISO 8601 duration (or a bare number of minutes) to minutes.
///
/// Handles `PT1H30M`, `P1DT2H`, seconds like `PT5400.0S` and ranges like
/// `PT15-20M` (upper bound wins). Zero durations count as absent.
pub fn parse_minutes(duration: &str) -> Option<u32> {
    let duration = duration.trim();
    if duration.is_empty() {
        return None;
    }

    if let Ok(minutes) = duration.parse::<f64>() {
        return positive_minutes(minutes);
    }

    let upper = duration.to_ascii_uppercase();
    let body = upper.strip_prefix('P')?;

    let mut total = 0.0;
    let mut number = String::new();
    let mut in_time = false;
    let mut seen_unit = false;

    for c in body.chars() {
        match c {
            'T' => in_time = true,
            '0'..='9' | '.' => number.push(c),
            // Ranges keep only the upper bound
            '-' => number.clear(),
            'D' | 'H' | 'M' | 'S' | 'W' => {
                let value: f64 = number.parse().ok()?;
                number.clear();
                seen_unit = true;
                total += match (c, in_time) {
                    ('W', false) => value * 7.0 * 24.0 * 60.0,
                    ('D', false) => value * 24.0 * 60.0,
                    ('H', true) => value * 60.0,
                    ('M', true) => value,
                    ('S', true) => value / 60.0,
                    // Months and years make no sense for recipes
                    _ => return None,
                };
            }
            c if c.is_whitespace() => {}
            _ => return None,
        }
    }

    if !seen_unit || !number.is_empty() {
        return None;
    }

    positive_minutes(total)
}

fn positive_minutes(minutes: f64) -> Option<u32> {
    let rounded = minutes.round();
    if rounded >= 1.0 && rounded <= u32::MAX as f64 {
        Some(rounded as u32)
    } else {
        None
    }
}

/// Normalize a yield value: `4` becomes `4 servings`, text is kept.
pub fn format_yields(value: &str) -> Option<String> {
    let value = normalize_text(value);
    if value.is_empty() {
        return None;
    }

    match value.parse::<u32>() {
        Ok(1) => Some("1 serving".to_string()),
        Ok(n) => Some(format!("{n} servings")),
        Err(_) => Some(value),
    }
}

/// Split a comma separated keyword string, dropping blanks and repeats.
pub fn split_keywords<'a>(values: impl IntoIterator<Item = &'a str>) -> Vec<String> {
    let mut keywords: Vec<String> = Vec::new();
    for value in values {
        for keyword in value.split(',') {
            let keyword = normalize_text(keyword);
            if !keyword.is_empty() && !keywords.contains(&keyword) {
                keywords.push(keyword);
            }
        }
    }
    keywords
}

/// `None` for empty strings.
pub(crate) fn non_empty(text: String) -> Option<String> {
    if text.is_empty() {
        None
    } else {
        Some(text)
    }
}
