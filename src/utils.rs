

/// Lowercased whitespace-separated words of a label.
pub fn label_words(label: &str) -> impl Iterator<Item = String> + '_ {
    label
        .split_whitespace()
        .map(str::to_lowercase)
}


#[inline]
pub fn safe_truncate_ellipsis(s: &str, max_chars: usize) -> String {
    if s.chars().count() > max_chars {
        format!("{}...", s.chars().take(max_chars).collect::<String>())
    } else {
        s.to_string()
    }
}
