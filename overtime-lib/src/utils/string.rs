/// Normalize cell text by replacing control characters with spaces and
/// collapsing runs of whitespace
pub fn normalize_cell_text(value: &str) -> String {
    value
        .chars()
        .map(|c| if c.is_control() { ' ' } else { c })
        .collect::<String>()
        .split_whitespace()
        .collect::<Vec<&str>>()
        .join(" ")
}
