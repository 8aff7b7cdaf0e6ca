use once_cell::sync::Lazy;
use regex::Regex;

static WHITESPACE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").expect("valid regex"));

// Timestamps ("12:04") and the line breaks between segments
static TIMESTAMP_NOISE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[\n\r0-9:]+").expect("valid regex"));

/// Collapse whitespace runs to single spaces and trim
pub fn collapse_whitespace(text: &str) -> String {
    WHITESPACE.replace_all(text.trim(), " ").trim().to_string()
}

/// Join segment texts in order, one space apart, skipping blank segments
pub fn join_segments<S: AsRef<str>>(segments: &[S]) -> String {
    let joined = segments
        .iter()
        .map(|segment| segment.as_ref().trim())
        .filter(|segment| !segment.is_empty())
        .collect::<Vec<_>>()
        .join(" ");

    collapse_whitespace(&joined)
}

/// Clean raw container text: turn digits, colons and line breaks into
/// spaces, then collapse whitespace. Digits that belong to the spoken text
/// are lost too.
pub fn clean_container_text(raw: &str) -> String {
    let stripped = TIMESTAMP_NOISE.replace_all(raw.trim(), " ");
    collapse_whitespace(&stripped)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_join_segments() {
        assert_eq!(join_segments(&["Hello", "world", "today"]), "Hello world today");
        assert_eq!(join_segments(&["  Hello\n", "", "   ", "big\t world "]), "Hello big world");
        assert_eq!(join_segments::<&str>(&[]), "");
    }

    #[test]
    fn test_clean_container_text() {
        let raw = "\n  0:00\n  Hello there\n  0:04\n  general   Kenobi\n  12:31\n  bye\n";
        assert_eq!(clean_container_text(raw), "Hello there general Kenobi bye");
    }

    #[test]
    fn test_clean_container_text_keeps_words_apart_across_lines() {
        // innerText puts each timestamp and segment on its own line with no indentation
        let raw = "0:00\nhello there\n0:05\nworld today\n0:09\nbye";
        assert_eq!(clean_container_text(raw), "hello there world today bye");
        assert_eq!(clean_container_text("end\r\n1:02:03\r\nstart"), "end start");
    }

    #[test]
    fn test_clean_container_text_only_noise() {
        assert_eq!(clean_container_text("0:00\n1:02\n\n"), "");
    }

    #[test]
    fn test_collapse_whitespace_has_no_double_spaces() {
        let inputs = [
            "  a  b  ",
            "\t\ta\n\nb\r\n c",
            "single",
            " \u{a0}x\u{a0}\u{a0}y ",
        ];
        for input in inputs {
            let out = collapse_whitespace(input);
            assert_eq!(out, out.trim());
            assert!(!out.contains("  "), "double space in {:?}", out);
        }
    }
}
