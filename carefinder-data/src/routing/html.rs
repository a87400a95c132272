//! Flattening of HTML step instructions.

/// Tags rendered as a word break rather than removed outright.
const BREAKING_TAGS: [&str; 3] = ["div", "br", "p"];

fn is_breaking(tag: &str) -> bool {
    let name: String = tag
        .trim_start_matches('/')
        .chars()
        .take_while(char::is_ascii_alphanumeric)
        .collect::<String>()
        .to_ascii_lowercase();
    BREAKING_TAGS.contains(&name.as_str())
}

/// Reduce an HTML fragment to plain text.
///
/// Tags are dropped and block-level tags become spaces. Named and numeric
/// character references are then decoded, and runs of whitespace collapse to
/// one space.
///
/// # Examples
///
/// ```
/// use carefinder_data::strip_html;
///
/// assert_eq!(
///     strip_html("Turn <b>left</b> onto <b>Ikorodu Rd</b><div style=\"font-size:0.9em\">Toll road</div>"),
///     "Turn left onto Ikorodu Rd Toll road",
/// );
/// assert_eq!(strip_html("Keep right at the fork &amp; merge"), "Keep right at the fork & merge");
/// ```
#[must_use]
pub fn strip_html(fragment: &str) -> String {
    let mut text = String::with_capacity(fragment.len());
    let mut tag: Option<String> = None;
    for ch in fragment.chars() {
        if let Some(name) = tag.as_mut() {
            if ch == '>' {
                let breaking = is_breaking(name);
                tag = None;
                if breaking {
                    text.push(' ');
                }
            } else {
                name.push(ch);
            }
        } else if ch == '<' {
            tag = Some(String::new());
        } else {
            text.push(ch);
        }
    }
    html_escape::decode_html_entities(&text)
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}
