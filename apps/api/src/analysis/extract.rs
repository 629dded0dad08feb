/// Returns the first balanced `{ ... }` substring of `text`.
///
/// Braces inside JSON string literals (including escaped quotes) do not count
/// towards the nesting depth. Returns `None` when no object closes.
pub fn first_json_object(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for (offset, ch) in text[start..].char_indices() {
        if in_string {
            match ch {
                _ if escaped => escaped = false,
                '\\' => escaped = true,
                '"' => in_string = false,
                _ => {}
            }
            continue;
        }
        match ch {
            '"' => in_string = true,
            '{' => depth += 1,
            '}' => {
                depth -= 1;
                if depth == 0 {
                    return Some(&text[start..start + offset + 1]);
                }
            }
            _ => {}
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_object() {
        assert_eq!(first_json_object("{\"a\":1}"), Some("{\"a\":1}"));
    }

    #[test]
    fn test_object_inside_prose_and_fences() {
        let text = "Sure! Here you go:\n```json\n{\"a\": {\"b\": 2}}\n```\nAnything else?";
        assert_eq!(first_json_object(text), Some("{\"a\": {\"b\": 2}}"));
    }

    #[test]
    fn test_only_first_object_is_taken() {
        assert_eq!(first_json_object("{\"a\":1} and {\"b\":2}"), Some("{\"a\":1}"));
    }

    #[test]
    fn test_braces_in_strings_are_ignored() {
        let text = r#"{"response": "use } and { freely \"}\" ok", "n": 1} trailing"#;
        assert_eq!(
            first_json_object(text),
            Some(r#"{"response": "use } and { freely \"}\" ok", "n": 1}"#)
        );
    }

    #[test]
    fn test_unbalanced_or_missing() {
        assert_eq!(first_json_object("no json here"), None);
        assert_eq!(first_json_object("{\"a\": {\"b\": 1}"), None);
    }

    #[test]
    fn test_multibyte_text_before_object() {
        let text = "பதில்: {\"sentiment\":\"neutral\"}";
        assert_eq!(first_json_object(text), Some("{\"sentiment\":\"neutral\"}"));
    }
}
