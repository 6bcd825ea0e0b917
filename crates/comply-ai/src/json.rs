//! JSON extraction from model prose
//!
//! Reasoning models are asked for bare JSON but frequently wrap it in
//! markdown fences or commentary. These helpers find the first balanced
//! JSON array or object in a reply, tracking string and escape state so
//! brackets inside string values do not confuse the match.

use serde_json::Value;

use crate::error::ProviderError;

/// Extract and parse the first balanced JSON array in `text`
pub fn extract_json_array(text: &str) -> Result<Value, ProviderError> {
    let candidate = balanced_slice(text, '[', ']')
        .ok_or_else(|| ProviderError::Parse("no JSON array found in reply".to_string()))?;
    let value: Value =
        serde_json::from_str(candidate).map_err(|e| ProviderError::Parse(e.to_string()))?;
    if value.is_array() {
        Ok(value)
    } else {
        Err(ProviderError::Parse("matched text is not an array".to_string()))
    }
}

/// Extract and parse the first balanced JSON object in `text`
pub fn extract_json_object(text: &str) -> Result<Value, ProviderError> {
    let candidate = balanced_slice(text, '{', '}')
        .ok_or_else(|| ProviderError::Parse("no JSON object found in reply".to_string()))?;
    let value: Value =
        serde_json::from_str(candidate).map_err(|e| ProviderError::Parse(e.to_string()))?;
    if value.is_object() {
        Ok(value)
    } else {
        Err(ProviderError::Parse("matched text is not an object".to_string()))
    }
}

/// Find the first balanced `open`..`close` slice, skipping brackets that
/// appear inside JSON strings
fn balanced_slice(text: &str, open: char, close: char) -> Option<&str> {
    let start = find_opener(text, open)?;
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for (i, c) in text[start..].char_indices() {
        if in_string {
            if escaped {
                escaped = false;
            } else if c == '\\' {
                escaped = true;
            } else if c == '"' {
                in_string = false;
            }
            continue;
        }

        if c == '"' {
            in_string = true;
        } else if c == open {
            depth += 1;
        } else if c == close {
            depth -= 1;
            if depth == 0 {
                return Some(&text[start..start + i + c.len_utf8()]);
            }
        }
    }

    None
}

/// First opener that is not inside a string literal
fn find_opener(text: &str, open: char) -> Option<usize> {
    let mut in_string = false;
    let mut escaped = false;

    for (i, c) in text.char_indices() {
        if in_string {
            if escaped {
                escaped = false;
            } else if c == '\\' {
                escaped = true;
            } else if c == '"' {
                in_string = false;
            }
            continue;
        }
        if c == '"' {
            in_string = true;
        } else if c == open {
            return Some(i);
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bare_array() {
        let value = extract_json_array(r#"[{"a": 1}, {"a": 2}]"#).unwrap();
        assert_eq!(value.as_array().unwrap().len(), 2);
    }

    #[test]
    fn test_array_in_markdown_fence() {
        let text = "Here are the changes:\n```json\n[{\"name\": \"THC warning\"}]\n```\nLet me know!";
        let value = extract_json_array(text).unwrap();
        assert_eq!(value[0]["name"], "THC warning");
    }

    #[test]
    fn test_brackets_inside_strings() {
        let text = r#"Result: [{"excerpt": "see rule [37.107.402] for details"}] done"#;
        let value = extract_json_array(text).unwrap();
        assert_eq!(
            value[0]["excerpt"],
            "see rule [37.107.402] for details"
        );
    }

    #[test]
    fn test_escaped_quotes_inside_strings() {
        let text = r#"[{"note": "the label says \"net wt. [1g]\" here"}]"#;
        let value = extract_json_array(text).unwrap();
        assert!(value[0]["note"].as_str().unwrap().contains("[1g]"));
    }

    #[test]
    fn test_object_extraction() {
        let text = "Sure! {\"thc_mg\": 10, \"warnings\": [\"keep away\"]} is what I found.";
        let value = extract_json_object(text).unwrap();
        assert_eq!(value["thc_mg"], 10);
    }

    #[test]
    fn test_no_json_is_parse_error() {
        assert!(matches!(
            extract_json_array("no structured data here"),
            Err(ProviderError::Parse(_))
        ));
    }

    #[test]
    fn test_unbalanced_is_parse_error() {
        assert!(matches!(
            extract_json_array(r#"[{"a": 1}"#),
            Err(ProviderError::Parse(_))
        ));
    }

    #[test]
    fn test_invalid_json_is_parse_error() {
        assert!(matches!(
            extract_json_array("[{a: 1}]"),
            Err(ProviderError::Parse(_))
        ));
    }
}
