//! Whitespace and entity normalization applied before any extraction rule runs.

/// Flattens the status page so rules can match on label/value adjacency.
///
/// `&nbsp;` entities become plain spaces and every run of whitespace, newlines
/// included, collapses to a single space.
pub fn normalize(text: &str) -> String {
    let text = text.replace("&nbsp;", " ");
    let mut normalized = String::with_capacity(text.len());
    let mut in_space = false;
    for ch in text.chars() {
        if ch.is_whitespace() {
            if !in_space {
                normalized.push(' ');
            }
            in_space = true;
        } else {
            normalized.push(ch);
            in_space = false;
        }
    }
    normalized
}
