//! Debug Output Parsing
//!
//! Extracts the structured fields a debugging model is prompted to emit
//! (`Code:`, `Error:`, `Explanation:`, `Suggestion:`/`Fix:`) from free-form
//! text. Extraction is strictly lossless: fields the model skipped stay
//! `None` here, and the HTTP layer decides what defaults to substitute.

use std::sync::LazyLock;

use regex::Regex;

/// Fields recovered from model output. All optional; absence means the model
/// did not emit that section.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DebugFields {
    pub fixed_code: Option<String>,
    pub error: Option<String>,
    pub explanation: Option<String>,
    pub suggestion: Option<String>,
}

// A Code block runs until the next "Error:" line or the end of input.
// Multiple blocks are all captured and joined.
static CODE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)Code:\s*(.*?)(?:\nError:|\z)").expect("Invalid regex pattern")
});
// Line fields stop at the end of their own line; horizontal whitespace only
// after the marker so an empty section does not swallow the next line.
static ERROR_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"Error:[ \t]*(.*)").expect("Invalid regex pattern"));
static EXPLANATION_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"Explanation:[ \t]*(.*)").expect("Invalid regex pattern"));
static SUGGESTION_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?:Suggestion|Fix):[ \t]*(.*)").expect("Invalid regex pattern"));

/// Parse debugging model output into its structured fields.
pub fn parse_debug_output(text: &str) -> DebugFields {
    let fixed_code = {
        let blocks: Vec<String> = CODE_RE
            .captures_iter(text)
            .filter_map(|c| c.get(1))
            .map(|m| m.as_str().trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();
        if blocks.is_empty() {
            None
        } else {
            Some(blocks.join("\n\n"))
        }
    };

    DebugFields {
        fixed_code,
        error: capture_line(&ERROR_RE, text),
        explanation: capture_line(&EXPLANATION_RE, text),
        suggestion: capture_line(&SUGGESTION_RE, text),
    }
}

fn capture_line(re: &Regex, text: &str) -> Option<String> {
    re.captures(text)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().trim().to_string())
        .filter(|s| !s.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn parses_all_fields_from_full_output() {
        let text = "Code:\nprint('hello')\nError: NameError on line 1\n\
                    Explanation: The variable was never defined.\n\
                    Suggestion: Define the variable before use.";

        let fields = parse_debug_output(text);
        assert_eq!(fields.fixed_code.as_deref(), Some("print('hello')"));
        assert_eq!(fields.error.as_deref(), Some("NameError on line 1"));
        assert_eq!(
            fields.explanation.as_deref(),
            Some("The variable was never defined.")
        );
        assert_eq!(
            fields.suggestion.as_deref(),
            Some("Define the variable before use.")
        );
    }

    #[test]
    fn trailing_code_block_is_captured() {
        let fields = parse_debug_output("Error: X\nExplanation: Y\nSuggestion: Z\nCode: W");
        assert_eq!(fields.error.as_deref(), Some("X"));
        assert_eq!(fields.explanation.as_deref(), Some("Y"));
        assert_eq!(fields.suggestion.as_deref(), Some("Z"));
        assert_eq!(fields.fixed_code.as_deref(), Some("W"));
    }

    #[test]
    fn absent_markers_yield_all_none() {
        let fields = parse_debug_output("The model rambled without structure.");
        assert_eq!(fields, DebugFields::default());
    }

    #[test]
    fn multiple_code_blocks_are_joined() {
        let text = "Code:\nfirst = 1\nError: oops\nCode:\nsecond = 2";
        let fields = parse_debug_output(text);
        assert_eq!(fields.fixed_code.as_deref(), Some("first = 1\n\nsecond = 2"));
        assert_eq!(fields.error.as_deref(), Some("oops"));
    }

    #[test]
    fn fix_is_accepted_as_suggestion_alias() {
        let fields = parse_debug_output("Fix: add a colon after the if");
        assert_eq!(
            fields.suggestion.as_deref(),
            Some("add a colon after the if")
        );
    }

    #[test]
    fn code_block_runs_to_end_without_error_marker() {
        let text = "Code:\nx = 1\ny = x + 1";
        let fields = parse_debug_output(text);
        assert_eq!(fields.fixed_code.as_deref(), Some("x = 1\ny = x + 1"));
        assert_eq!(fields.error, None);
    }

    #[test]
    fn blank_sections_count_as_absent() {
        let fields = parse_debug_output("Error:   \nExplanation:");
        assert_eq!(fields.error, None);
        assert_eq!(fields.explanation, None);
    }

    proptest! {
        #[test]
        fn never_panics(text in ".*") {
            let _ = parse_debug_output(&text);
        }

        #[test]
        fn marker_free_text_extracts_nothing(
            text in "[a-z 0-9.,]*"
        ) {
            prop_assert_eq!(parse_debug_output(&text), DebugFields::default());
        }
    }
}
