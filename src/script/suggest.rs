//! Autocomplete for character cues and scene headings.

use once_cell::sync::Lazy;
use regex::Regex;

use super::element::{ElementKind, ScriptElement};

static HEADING_PREFIX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(INT\.|EXT\.)\s*").expect("valid heading prefix pattern"));

static HEADING_TIME_OF_DAY: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\s*-\s*(DAY|NIGHT|MORNING|EVENING|LATER)$").expect("valid time-of-day pattern")
});

/// Only cues and headings offer suggestions.
pub fn supports_autocomplete(kind: Option<ElementKind>) -> bool {
    matches!(
        kind,
        Some(ElementKind::Character) | Some(ElementKind::SceneHeading)
    )
}

/// Distinct texts already used by elements of `kind`, in first-seen order.
///
/// Scene headings are reduced to their location, so `INT. DINER - NIGHT`
/// contributes `DINER`.
pub fn unique_values(elements: &[ScriptElement], kind: ElementKind) -> Vec<String> {
    let mut values: Vec<String> = Vec::new();
    for element in elements.iter().filter(|e| e.kind() == Some(kind)) {
        let value = if kind == ElementKind::SceneHeading {
            let stripped = HEADING_PREFIX.replace(&element.text, "");
            HEADING_TIME_OF_DAY.replace(&stripped, "").trim().to_string()
        } else {
            element.text.trim().to_string()
        };
        if !value.is_empty() && !values.contains(&value) {
            values.push(value);
        }
    }
    values
}

/// The word being typed: the last run after whitespace or `(`.
pub fn current_word(text: &str) -> &str {
    text.rsplit(|c: char| c.is_whitespace() || c == '(')
        .next()
        .unwrap_or_default()
}

/// Known values that extend the word being typed in `text`.
pub fn suggestions(elements: &[ScriptElement], kind: ElementKind, text: &str) -> Vec<String> {
    let word = current_word(text);
    if word.is_empty() {
        return Vec::new();
    }
    let word = word.to_lowercase();
    unique_values(elements, kind)
        .into_iter()
        .filter(|value| {
            let value = value.to_lowercase();
            value.starts_with(&word) && value != word
        })
        .collect()
}

/// Replaces everything from the last occurrence of `word` onward with `value`.
pub fn apply_suggestion(text: &str, word: &str, value: &str) -> String {
    let start = text.rfind(word).unwrap_or(0);
    format!("{}{}", &text[..start], value)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn script() -> Vec<ScriptElement> {
        vec![
            ScriptElement::new(ElementKind::SceneHeading, "INT. DINER - NIGHT"),
            ScriptElement::new(ElementKind::Character, "MARA"),
            ScriptElement::new(ElementKind::Dialogue, "Hi."),
            ScriptElement::new(ElementKind::Character, " MARCUS "),
            ScriptElement::new(ElementKind::Character, "MARA"),
            ScriptElement::new(ElementKind::SceneHeading, "EXT. DINER PARKING LOT - DAY"),
            ScriptElement::new(ElementKind::SceneHeading, "EXT.   DINER - LATER"),
            ScriptElement::new(ElementKind::Character, "   "),
        ]
    }

    #[test]
    fn test_unique_character_values() {
        assert_eq!(
            unique_values(&script(), ElementKind::Character),
            vec!["MARA".to_string(), "MARCUS".to_string()]
        );
    }

    #[test]
    fn test_unique_heading_values_strip_prefix_and_time() {
        assert_eq!(
            unique_values(&script(), ElementKind::SceneHeading),
            vec!["DINER".to_string(), "DINER PARKING LOT".to_string()]
        );
    }

    #[test]
    fn test_current_word() {
        assert_eq!(current_word("INT. DIN"), "DIN");
        assert_eq!(current_word("MARA (V.O"), "V.O");
        assert_eq!(current_word("MARA "), "");
        assert_eq!(current_word(""), "");
    }

    #[test]
    fn test_suggestions_filter_by_prefix() {
        let elements = script();
        assert_eq!(
            suggestions(&elements, ElementKind::Character, "mar"),
            vec!["MARA".to_string(), "MARCUS".to_string()]
        );
        assert_eq!(
            suggestions(&elements, ElementKind::Character, "mara"),
            Vec::<String>::new()
        );
        assert_eq!(
            suggestions(&elements, ElementKind::SceneHeading, "EXT. DIN"),
            vec!["DINER".to_string(), "DINER PARKING LOT".to_string()]
        );
        assert!(suggestions(&elements, ElementKind::Character, "MARA ").is_empty());
    }

    #[test]
    fn test_apply_suggestion() {
        assert_eq!(apply_suggestion("INT. DIN", "DIN", "DINER"), "INT. DINER");
        assert_eq!(apply_suggestion("MA", "MA", "MARCUS"), "MARCUS");
        assert_eq!(apply_suggestion("abc", "zzz", "MARA"), "MARA");
    }

    #[test]
    fn test_supports_autocomplete() {
        assert!(supports_autocomplete(Some(ElementKind::Character)));
        assert!(supports_autocomplete(Some(ElementKind::SceneHeading)));
        assert!(!supports_autocomplete(Some(ElementKind::Dialogue)));
        assert!(!supports_autocomplete(None));
    }
}
