//! HTML escaping for text and attribute values.

/// Escape the five characters with special meaning in HTML text and
/// double- or single-quoted attribute values.
pub fn escape_html(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for ch in input.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            other => out.push(other),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_escapes_markup() {
        assert_eq!(
            escape_html("<b>\"Krach\" & 'chute'</b>"),
            "&lt;b&gt;&quot;Krach&quot; &amp; &#39;chute&#39;&lt;/b&gt;"
        );
    }

    #[test]
    fn test_plain_text_unchanged() {
        assert_eq!(escape_html("Scénario de base"), "Scénario de base");
    }

    proptest! {
        #[test]
        fn prop_output_has_no_raw_brackets(s in ".*") {
            let escaped = escape_html(&s);
            prop_assert!(!escaped.contains('<'));
            prop_assert!(!escaped.contains('>'));
            prop_assert!(!escaped.contains('"'));
        }
    }
}
