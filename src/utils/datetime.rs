/// Width of `YYYY-MM-DD HH:MM:SS`.
const DISPLAY_WIDTH: usize = 19;

/// Format an ISO-8601 instant such as `2021-04-09T03:21:47.408Z` as
/// `2021-04-09 03:21:47`.
///
/// This is purely lexical: the first `T` becomes a space and everything past
/// the seconds is dropped. Input of any other shape comes out truncated, never
/// as an error.
pub fn format_timestamp(timestamp: &str) -> String {
    timestamp
        .replacen('T', " ", 1)
        .chars()
        .take(DISPLAY_WIDTH)
        .collect()
}
