//! HTML escaping and snapshot report export.
//!
//! The report mirrors the dashboard's rendering contract: at most
//! [`TABLE_ROW_CAP`] rows (the most recent ones, oldest first), 1-indexed,
//! every text field escaped, and a link anchor only when a URL is present.

use crate::model::TweetRecord;

/// Maximum rows ever rendered, in the table and in the report. The counter
/// always shows the full snapshot size regardless of this cap.
pub const TABLE_ROW_CAP: usize = 200;

/// Escape the five HTML-significant characters to their named entities.
/// Ampersand is replaced first so the entities introduced by the later
/// substitutions survive untouched.
pub fn escape_html(raw: &str) -> String {
    raw.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#039;")
}

/// Escape an optional field, coercing absence to the empty string.
pub fn escape_opt(raw: Option<&str>) -> String {
    escape_html(raw.unwrap_or(""))
}

/// Render the current snapshot as a standalone HTML document.
pub fn render_report(tweets: &[TweetRecord]) -> String {
    let total = tweets.len();
    let skip = total.saturating_sub(TABLE_ROW_CAP);
    let mut rows = String::new();
    for (i, tweet) in tweets[skip..].iter().enumerate() {
        let link = match tweet.link() {
            Some(url) => format!(
                r#"<a href="{}" target="_blank">link</a>"#,
                escape_html(url)
            ),
            None => String::new(),
        };
        rows.push_str(&format!(
            "<tr><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td></tr>\n",
            i + 1,
            escape_html(&tweet.username),
            escape_html(&tweet.handle),
            escape_html(&tweet.text),
            escape_html(&tweet.timestamp),
            link,
        ));
    }

    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<title>scrapetui report</title>
<style>
body{{font-family:-apple-system,BlinkMacSystemFont,'Segoe UI',sans-serif;background:#111;color:#ddd;padding:16px}}
table{{border-collapse:collapse;width:100%}}
td,th{{border:1px solid #333;padding:4px 8px;font-size:13px;text-align:left}}
th{{background:#1c1c28}}
a{{color:#4a8aff}}
</style>
</head>
<body>
<h2>Tweets ({total})</h2>
<table>
<thead><tr><th>#</th><th>User</th><th>Handle</th><th>Text</th><th>Time</th><th>URL</th></tr></thead>
<tbody>
{rows}</tbody>
</table>
</body>
</html>
"#
    )
}
