/// Turns a plain-text comment body into HTML paragraphs.
///
/// Only `<` and `>` are escaped. Every `\n\n` starts a new `<p>`.
/// Empty text produces no markup at all.
pub fn sanitize(text: &str) -> String {
    if text.is_empty() {
        return String::new();
    }

    let escaped = text.replace('<', "&lt;").replace('>', "&gt;");
    escaped
        .split("\n\n")
        .map(|paragraph| format!("<p>{paragraph}</p>"))
        .collect()
}
