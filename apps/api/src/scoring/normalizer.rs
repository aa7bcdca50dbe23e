//! Text cleanup applied to every extracted document before matching.

/// Normalizes raw extracted text.
///
/// - `\r` becomes `\n`
/// - runs of newlines collapse to one
/// - runs of spaces/tabs collapse to a single space
/// - leading and trailing whitespace is trimmed
pub fn clean_text(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut prev: Option<char> = None;

    for ch in text.chars() {
        let ch = if ch == '\r' { '\n' } else { ch };
        match ch {
            '\n' if prev == Some('\n') => continue,
            ' ' | '\t' => {
                if prev != Some(' ') {
                    out.push(' ');
                    prev = Some(' ');
                }
                continue;
            }
            _ => {}
        }
        out.push(ch);
        prev = Some(ch);
    }

    out.trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_input_yields_empty() {
        assert_eq!(clean_text(""), "");
        assert_eq!(clean_text("  \t \r\n "), "");
    }

    #[test]
    fn test_carriage_returns_become_single_newline() {
        assert_eq!(clean_text("line one\r\nline two"), "line one\nline two");
        assert_eq!(clean_text("a\r\rb"), "a\nb");
    }

    #[test]
    fn test_collapses_blank_lines() {
        assert_eq!(clean_text("Skills\n\n\n\nPython"), "Skills\nPython");
    }

    #[test]
    fn test_collapses_horizontal_whitespace() {
        assert_eq!(clean_text("Python  \t\t SQL"), "Python SQL");
        assert_eq!(clean_text("\tindented"), "indented");
    }

    #[test]
    fn test_space_between_newlines_is_kept() {
        // Newline runs are collapsed only when adjacent.
        assert_eq!(clean_text("a\n \nb"), "a\n \nb");
    }

    #[test]
    fn test_idempotent() {
        let raw = "  Experienced in   Python\r\n\r\n and SQL \t ";
        let once = clean_text(raw);
        assert_eq!(clean_text(&once), once);
    }
}
