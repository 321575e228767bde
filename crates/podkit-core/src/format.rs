//! Small text helpers for user-facing messages

/// Pluralize a noun by count ("1 spec", "3 specs")
pub fn pluralize(count: usize, noun: &str) -> String {
    if count == 1 {
        noun.to_string()
    } else {
        format!("{}s", noun)
    }
}

/// Format a count together with its noun
pub fn counted(count: usize, noun: &str) -> String {
    format!("{} {}", count, pluralize(count, noun))
}
