//! Utility functions

/// Strips control characters (C0, DEL, C1) and trims surrounding whitespace.
/// Free-text fields go through this before they are persisted.
pub fn sanitize_text(input: &str) -> String {
    input
        .chars()
        .filter(|c| !c.is_control())
        .collect::<String>()
        .trim()
        .to_string()
}

pub fn sanitize_opt(input: Option<&str>) -> Option<String> {
    input.map(sanitize_text)
}

/// Sanitizes every element of a tag list, keeping positions as-is.
pub fn sanitize_tags(tags: &[String]) -> Vec<String> {
    tags.iter().map(|t| sanitize_text(t)).collect()
}

pub fn mask_email(email: &str) -> String {
    if let Some(at_pos) = email.find('@') {
        let (local, domain) = email.split_at(at_pos);
        if local.len() <= 2 {
            format!("{}***{}", &local[..1], domain)
        } else {
            format!("{}***{}", &local[..2], domain)
        }
    } else {
        "***".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize_strips_embedded_control_characters() {
        assert_eq!(sanitize_text("Hello\x00World\x1F"), "HelloWorld");
    }

    #[test]
    fn test_sanitize_trims_whitespace() {
        assert_eq!(sanitize_text("  spaced out  "), "spaced out");
    }

    #[test]
    fn test_sanitize_leaves_clean_text_untouched() {
        assert_eq!(sanitize_text("Normal String"), "Normal String");
    }

    #[test]
    fn test_sanitize_tags_applies_element_wise() {
        let tags = vec![
            "Test\x00String".to_string(),
            "Normal String".to_string(),
            "\x1FAnother\x7F".to_string(),
        ];
        assert_eq!(
            sanitize_tags(&tags),
            vec!["TestString", "Normal String", "Another"]
        );
    }

    #[test]
    fn test_sanitize_opt_preserves_none() {
        assert_eq!(sanitize_opt(None), None);
        assert_eq!(sanitize_opt(Some("a\x01b")), Some("ab".to_string()));
    }

    #[test]
    fn test_mask_email_hides_local_part() {
        assert_eq!(mask_email("rep@acme.example"), "re***@acme.example");
        assert_eq!(mask_email("a@b.c"), "a***@b.c");
        assert_eq!(mask_email("not-an-email"), "***");
    }
}
