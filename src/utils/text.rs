/// Shortens `value` to at most `max_bytes` bytes on a char boundary, marking
/// the cut with `...`. Used for log lines only; tool results are never cut.
pub fn preview(value: &str, max_bytes: usize) -> String {
    if value.len() <= max_bytes {
        return value.to_string();
    }
    let mut end = max_bytes;
    while end > 0 && !value.is_char_boundary(end) {
        end -= 1;
    }
    format!("{}...", &value[..end])
}

#[cfg(test)]
mod tests {
    use super::preview;

    #[test]
    fn short_values_are_untouched() {
        assert_eq!(preview("not found", 256), "not found");
    }

    #[test]
    fn long_values_are_cut_with_marker() {
        assert_eq!(preview("internal error", 8), "internal...");
    }

    #[test]
    fn cut_never_splits_a_character() {
        // "é" is two bytes; a cut at byte 2 would land inside it.
        assert_eq!(preview("aé-b", 2), "a...");
        assert_eq!(preview("aé-b", 3), "aé...");
    }
}
