//! Resilient extraction of a JSON object out of language-model output.
//!
//! Model responses wrap the payload in prose or markdown fencing and get the
//! syntax almost right: single quotes, curly quotes, bare keys, trailing
//! commas. The strict parse runs first; only when it fails does a single
//! ordered repair pass run, followed by one re-parse.

use regex::Regex;
use serde_json::Value;
use std::error::Error;
use std::fmt;

#[derive(Debug)]
pub enum JsonExtractError {
    NoJsonFound,
    Unparsable(serde_json::Error),
}

impl fmt::Display for JsonExtractError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            JsonExtractError::NoJsonFound => {
                write!(f, "no JSON object found in model output")
            }
            JsonExtractError::Unparsable(err) => {
                write!(f, "model output could not be parsed as JSON: {}", err)
            }
        }
    }
}

impl Error for JsonExtractError {}

/// The candidate span: first `{` through the last `}`.
pub fn json_span(raw: &str) -> Option<&str> {
    let start = raw.find('{')?;
    let end = raw.rfind('}')?;
    if end < start {
        return None;
    }
    Some(&raw[start..=end])
}

/// Quote bare object keys: `durationDays:` becomes `"durationDays":`.
/// Keys that are already quoted are left alone because the closing quote
/// sits between the word and the colon.
pub fn quote_bare_keys(text: &str) -> String {
    Regex::new(r"(\w+)\s*:")
        .expect("static regex")
        .replace_all(text, "\"$1\":")
        .into_owned()
}

/// Normalize single quotes and curly double quotes to straight quotes.
pub fn normalize_quotes(text: &str) -> String {
    text.replace('\'', "\"")
        .replace('\u{201c}', "\"")
        .replace('\u{201d}', "\"")
}

/// Remove trailing commas before a closing `}` or `]`.
pub fn strip_trailing_commas(text: &str) -> String {
    Regex::new(r",\s*([}\]])")
        .expect("static regex")
        .replace_all(text, "$1")
        .into_owned()
}

/// Collapse whitespace runs to a single space.
pub fn collapse_whitespace(text: &str) -> String {
    Regex::new(r"\s+")
        .expect("static regex")
        .replace_all(text, " ")
        .into_owned()
}

fn repair(text: &str) -> String {
    collapse_whitespace(&strip_trailing_commas(&normalize_quotes(&quote_bare_keys(
        text,
    ))))
}

/// Extract and parse the first brace-delimited span of `raw`. On a syntax
/// error the repair passes apply once, in order, then one re-parse.
pub fn parse(raw: &str) -> Result<Value, JsonExtractError> {
    let span = json_span(raw).ok_or(JsonExtractError::NoJsonFound)?;
    match serde_json::from_str(span) {
        Ok(value) => Ok(value),
        Err(_) => serde_json::from_str(&repair(span)).map_err(JsonExtractError::Unparsable),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn span_runs_from_first_brace_to_last() {
        assert_eq!(json_span("Sure! {\"a\": {\"b\": 1}} done"), Some("{\"a\": {\"b\": 1}}"));
        assert_eq!(json_span("no braces here"), None);
        assert_eq!(json_span("} reversed {"), None);
    }

    #[test]
    fn well_formed_json_in_prose_parses_without_repair() {
        let value = parse("Here is your plan:\n```json\n{\"summary\": \"ok\"}\n```").unwrap();
        assert_eq!(value["summary"], "ok");
    }

    #[test]
    fn quoting_bare_keys_leaves_quoted_keys_alone() {
        assert_eq!(quote_bare_keys("{durationDays: 3}"), "{\"durationDays\": 3}");
        assert_eq!(quote_bare_keys("{\"summary\":'ok'}"), "{\"summary\":'ok'}");
    }

    #[test]
    fn quotes_normalize_to_straight_doubles() {
        assert_eq!(normalize_quotes("{'a': “b”}"), "{\"a\": \"b\"}");
    }

    #[test]
    fn trailing_commas_are_removed() {
        assert_eq!(strip_trailing_commas("{\"a\": [1, 2,], }"), "{\"a\": [1, 2]}");
    }

    #[test]
    fn whitespace_runs_collapse() {
        assert_eq!(collapse_whitespace("{\"a\":\n\t 1}"), "{\"a\": 1}");
    }

    #[test]
    fn near_json_model_output_is_repaired() {
        let value = parse("Sure! {\"summary\":'ok', durationDays: 3,}").unwrap();
        assert_eq!(value["summary"], "ok");
        assert_eq!(value["durationDays"], 3);
    }

    #[test]
    fn text_without_braces_fails_with_no_json_found() {
        assert!(matches!(parse("nothing to see"), Err(JsonExtractError::NoJsonFound)));
    }

    #[test]
    fn hopeless_text_fails_after_one_repair_attempt() {
        assert!(matches!(
            parse("{this is [ not : salvageable"),
            Err(JsonExtractError::NoJsonFound)
        ));
        assert!(matches!(
            parse("{\"a\": [1, }"),
            Err(JsonExtractError::Unparsable(_))
        ));
    }
}
