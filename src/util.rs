//! Shared helpers.

/// Wrap lead-supplied free text in explicit delimiters before embedding it
/// in a prompt, so the model treats it as data rather than instructions.
pub fn wrap_user_data(text: &str) -> String {
    format!(
        "<<<BEGIN_UNTRUSTED_DATA>>>\n{}\n<<<END_UNTRUSTED_DATA>>>",
        text.trim()
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wraps_with_delimiters() {
        let wrapped = wrap_user_data("hello");
        assert!(wrapped.starts_with("<<<BEGIN_UNTRUSTED_DATA>>>"));
        assert!(wrapped.ends_with("<<<END_UNTRUSTED_DATA>>>"));
        assert!(wrapped.contains("hello"));
    }

    #[test]
    fn trims_surrounding_whitespace() {
        let wrapped = wrap_user_data("  padded  \n");
        assert!(wrapped.contains("\npadded\n"));
    }
}
