//! Lenient parsing of the `chat` command's JSON-ish arguments.
//!
//! Callers pass loosely formed strings. Each parser still produces a usable
//! value, but reports whether it had to fall back so the caller can log it.

use crate::rag::HistoryTurn;
use crate::vector_store::RetrievalFilter;
use serde_json::Value;

/// A parsed argument, tagged with how it was obtained.
#[derive(Debug, Clone, PartialEq)]
pub enum Parsed<T> {
    /// The input was well formed.
    Structured(T),
    /// The input was not understood; this is the fallback value.
    Fallback(T),
}

impl<T> Parsed<T> {
    pub fn into_inner(self) -> T {
        match self {
            Parsed::Structured(v) | Parsed::Fallback(v) => v,
        }
    }

    pub fn is_fallback(&self) -> bool {
        matches!(self, Parsed::Fallback(_))
    }
}

/// Parse `--filter`.
///
/// A JSON array of names is an OR filter, a JSON string is one name, and
/// anything else is taken verbatim as one name. Blank input and an empty
/// array mean no filter.
pub fn parse_filter(raw: &str) -> Parsed<Option<RetrievalFilter>> {
    if raw.trim().is_empty() {
        return Parsed::Structured(None);
    }

    match serde_json::from_str::<Value>(raw) {
        Ok(Value::Array(items)) => {
            let names: Option<Vec<String>> = items
                .into_iter()
                .map(|item| match item {
                    Value::String(s) => Some(s),
                    _ => None,
                })
                .collect();
            match names {
                Some(names) => Parsed::Structured(RetrievalFilter::from_sources(names)),
                None => Parsed::Fallback(Some(RetrievalFilter::Source(raw.to_string()))),
            }
        }
        Ok(Value::String(name)) => Parsed::Structured(Some(RetrievalFilter::Source(name))),
        _ => Parsed::Fallback(Some(RetrievalFilter::Source(raw.to_string()))),
    }
}

/// Parse `--history`. Anything but a JSON array of turns is empty history.
pub fn parse_history(raw: &str) -> Parsed<Vec<HistoryTurn>> {
    match serde_json::from_str::<Vec<HistoryTurn>>(raw) {
        Ok(turns) => Parsed::Structured(turns),
        Err(_) => Parsed::Fallback(Vec::new()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filter_plain_name_is_fallback() {
        let parsed = parse_filter("report.pdf");
        assert!(parsed.is_fallback());
        assert_eq!(
            parsed.into_inner(),
            Some(RetrievalFilter::Source("report.pdf".to_string()))
        );
    }

    #[test]
    fn test_filter_json_array() {
        let parsed = parse_filter(r#"["a.pdf", "b.pdf"]"#);
        assert!(!parsed.is_fallback());
        assert_eq!(
            parsed.into_inner(),
            Some(RetrievalFilter::AnyOf(vec!["a.pdf".to_string(), "b.pdf".to_string()]))
        );

        assert_eq!(
            parse_filter(r#"["a.pdf"]"#),
            Parsed::Structured(Some(RetrievalFilter::Source("a.pdf".to_string())))
        );
    }

    #[test]
    fn test_filter_empty_means_no_filter() {
        assert_eq!(parse_filter("[]"), Parsed::Structured(None));
        assert_eq!(parse_filter("  "), Parsed::Structured(None));
    }

    #[test]
    fn test_filter_json_string() {
        assert_eq!(
            parse_filter(r#""notes.txt""#),
            Parsed::Structured(Some(RetrievalFilter::Source("notes.txt".to_string())))
        );
    }

    #[test]
    fn test_filter_mixed_array_is_fallback() {
        let parsed = parse_filter(r#"["a.pdf", 3]"#);
        assert!(parsed.is_fallback());
        assert_eq!(
            parsed.into_inner(),
            Some(RetrievalFilter::Source(r#"["a.pdf", 3]"#.to_string()))
        );
    }

    #[test]
    fn test_history_valid() {
        let parsed = parse_history(
            r#"[{"role": "user", "content": "Hi"}, {"role": "assistant", "content": "Hello"}]"#,
        );
        assert!(!parsed.is_fallback());
        assert_eq!(
            parsed.into_inner(),
            vec![HistoryTurn::new("user", "Hi"), HistoryTurn::new("assistant", "Hello")]
        );
    }

    #[test]
    fn test_history_invalid_is_empty_fallback() {
        for raw in ["not json", r#"{"role": "user"}"#, r#"[{"role": "user"}]"#, ""] {
            let parsed = parse_history(raw);
            assert!(parsed.is_fallback(), "{:?} should fall back", raw);
            assert!(parsed.into_inner().is_empty());
        }
    }
}
