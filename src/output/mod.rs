// Output: CSV tables, the JSON run summary and terminal display.

pub mod report;
pub mod tables;
pub mod terminal;

/// Truncate a string to at most `max_chars` characters, appending "..." if truncated.
///
/// Counts characters rather than bytes, so accented text never splits mid-codepoint.
pub fn truncate_chars(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }
    let truncated: String = text.chars().take(max_chars).collect();
    format!("{truncated}...")
}

#[cfg(test)]
mod tests {
    use super::truncate_chars;

    #[test]
    fn truncates_on_char_boundaries() {
        assert_eq!(truncate_chars("càrrega", 3), "càr...");
        assert_eq!(truncate_chars("sol", 3), "sol");
    }
}
