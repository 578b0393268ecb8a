use regex::Regex;
use std::sync::LazyLock;

/// Longest file stem produced by [`sanitize_filename`], in characters
pub const MAX_FILENAME_CHARS: usize = 100;

/// Longest file stem in UTF-8 bytes; leaves room for the extension under the 255-byte name limit
pub const MAX_FILENAME_BYTES: usize = 200;

static HOSTILE_CHARS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"[<>:"/\\|?*\x00-\x1F\x7F]"#).expect("valid regex"));

static WHITESPACE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").expect("valid regex"));

/// Device names Windows refuses as file stems
const RESERVED_STEMS: [&str; 22] = [
    "CON", "PRN", "AUX", "NUL", "COM1", "COM2", "COM3", "COM4", "COM5", "COM6", "COM7", "COM8",
    "COM9", "LPT1", "LPT2", "LPT3", "LPT4", "LPT5", "LPT6", "LPT7", "LPT8", "LPT9",
];

/// Convert an article title to a file stem that is valid on common filesystems
///
/// Returns an empty string when nothing usable is left.
pub fn sanitize_filename(title: &str) -> String {
    let name = WHITESPACE.replace_all(title, " ");
    let name = HOSTILE_CHARS.replace_all(&name, "");
    let name = WHITESPACE.replace_all(&name, " ");
    let name = trim_edges(&name);

    // Limit filename length in characters, then in bytes on a character boundary
    let mut capped: String = name.chars().take(MAX_FILENAME_CHARS).collect();
    if capped.len() > MAX_FILENAME_BYTES {
        let mut end = MAX_FILENAME_BYTES;
        while !capped.is_char_boundary(end) {
            end -= 1;
        }
        capped.truncate(end);
    }
    let mut name = trim_edges(&capped).to_string();

    if RESERVED_STEMS
        .iter()
        .any(|r| r.eq_ignore_ascii_case(&name))
    {
        name.push('_');
    }
    name
}

fn trim_edges(name: &str) -> &str {
    name.trim_matches(|c: char| c == '.' || c.is_whitespace())
}

/// File name for an article: sanitized title, then slug, then `article`
pub fn article_filename(title: &str, slug: &str) -> String {
    let stem = [title, slug]
        .iter()
        .map(|candidate| sanitize_filename(candidate))
        .find(|stem| !stem.is_empty())
        .unwrap_or_else(|| "article".to_string());

    format!("{}.html", stem)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strips_hostile_characters() {
        assert_eq!(
            sanitize_filename("What? A <great> \"story\": part 1/2"),
            "What A great story part 12"
        );
        assert_eq!(sanitize_filename("tab\there\nnewline"), "tab here newline");
        assert_eq!(sanitize_filename("this / that"), "this that");
    }

    #[test]
    fn test_trims_dots_and_spaces() {
        assert_eq!(sanitize_filename("  ..hidden title.. "), "hidden title");
    }

    #[test]
    fn test_caps_length_on_char_boundary() {
        let title = "é".repeat(150);
        let name = sanitize_filename(&title);
        assert_eq!(name.chars().count(), MAX_FILENAME_CHARS);
    }

    #[test]
    fn test_caps_multibyte_titles_by_bytes() {
        let name = sanitize_filename(&"文".repeat(100));
        assert!(name.len() <= MAX_FILENAME_BYTES);
        assert_eq!(name, "文".repeat(66));

        let file = article_filename(&"文".repeat(100), "slug");
        assert!(file.len() <= 255);
    }

    #[test]
    fn test_byte_cap_trims_trailing_space() {
        // 198 bytes, a space, then text past the byte limit
        let title = format!("{} {}", "文".repeat(66), "文".repeat(2));
        let name = sanitize_filename(&title);
        assert_eq!(name, "文".repeat(66));
    }

    #[test]
    fn test_reserved_names() {
        assert_eq!(sanitize_filename("con"), "con_");
        assert_eq!(sanitize_filename("Console"), "Console");
    }

    #[test]
    fn test_article_filename_fallbacks() {
        assert_eq!(article_filename("Hello: World", "hello"), "Hello World.html");
        assert_eq!(article_filename("???", "my-slug"), "my-slug.html");
        assert_eq!(article_filename("///", ""), "article.html");
    }
}
