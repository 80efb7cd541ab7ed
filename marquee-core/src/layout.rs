//! Fixed-grid text layout
//!
//! Maps arbitrary text onto the `cols × rows` character grid of the panel.
//! Every line produced is exactly `cols` characters wide, so writing the
//! lines over the previous frame never leaves stale characters behind and
//! frequently refreshed modes do not need to clear (and flicker) first.
//!
//! Widths are counted in `char`s, not bytes.

use alloc::string::String;
use alloc::vec::Vec;

/// Replace accented Latin letters with their unaccented ASCII form
///
/// The HD44780 character ROM has no glyphs for these, so "café" would show
/// up as garbage. Characters outside the folded set pass through unchanged.
pub fn fold_diacritics(text: &str) -> String {
    text.chars().map(fold_char).collect()
}

fn fold_char(c: char) -> char {
    match c {
        'á' | 'à' | 'ã' | 'â' | 'ä' | 'å' => 'a',
        'é' | 'è' | 'ê' | 'ë' => 'e',
        'í' | 'ì' | 'î' | 'ï' => 'i',
        'ó' | 'ò' | 'õ' | 'ô' | 'ö' => 'o',
        'ú' | 'ù' | 'û' | 'ü' => 'u',
        'ç' => 'c',
        'ñ' => 'n',
        'ý' | 'ÿ' => 'y',
        'Á' | 'À' | 'Ã' | 'Â' | 'Ä' | 'Å' => 'A',
        'É' | 'È' | 'Ê' | 'Ë' => 'E',
        'Í' | 'Ì' | 'Î' | 'Ï' => 'I',
        'Ó' | 'Ò' | 'Õ' | 'Ô' | 'Ö' => 'O',
        'Ú' | 'Ù' | 'Û' | 'Ü' => 'U',
        'Ç' => 'C',
        'Ñ' => 'N',
        'Ý' => 'Y',
        _ => c,
    }
}

/// Lay `message` out on a `cols × rows` grid
///
/// Returns exactly `rows` lines of exactly `cols` characters each.
///
/// Without `word_wrap` the message is split on `\n` and each line is padded
/// or truncated. With `word_wrap` the trimmed message is flowed greedily:
/// an explicit `\n` inside the line width breaks the line, text that fits is
/// emitted whole, and otherwise the line breaks at the last space of the
/// first `cols` characters (the space is dropped). A chunk with no usable
/// space is hard-broken at `cols`.
pub fn layout(message: &str, cols: usize, rows: usize, word_wrap: bool) -> Vec<String> {
    let message = fold_diacritics(message);

    if word_wrap {
        pad_lines(wrap(&message, cols, rows), cols, rows)
    } else {
        pad_lines(message.split('\n').map(String::from).collect(), cols, rows)
    }
}

fn wrap(message: &str, cols: usize, rows: usize) -> Vec<String> {
    let chars: Vec<char> = message.trim().chars().collect();
    let mut remaining: &[char] = &chars;
    let mut lines = Vec::with_capacity(rows);

    for _ in 0..rows {
        if remaining.is_empty() {
            lines.push(String::new());
            continue;
        }

        if let Some(newline) = remaining.iter().position(|&c| c == '\n') {
            if newline < cols {
                lines.push(remaining[..newline].iter().collect());
                remaining = &remaining[newline + 1..];
                continue;
            }
        }

        if remaining.len() <= cols {
            lines.push(remaining.iter().collect());
            remaining = &[];
            continue;
        }

        let chunk = &remaining[..cols];
        match chunk.iter().rposition(|&c| c == ' ') {
            Some(space) if space > 0 => {
                lines.push(remaining[..space].iter().collect());
                remaining = &remaining[space + 1..];
            }
            _ => {
                lines.push(chunk.iter().collect());
                remaining = &remaining[cols..];
            }
        }
    }

    lines
}

fn pad_lines(lines: Vec<String>, cols: usize, rows: usize) -> Vec<String> {
    let mut result: Vec<String> = lines
        .into_iter()
        .take(rows)
        .map(|line| {
            let mut padded: String = line.chars().take(cols).collect();
            let width = padded.chars().count();
            padded.extend(core::iter::repeat(' ').take(cols - width));
            padded
        })
        .collect();

    while result.len() < rows {
        result.push(" ".repeat(cols));
    }

    result
}

/// Centre `text` in a field `width` characters wide
///
/// Extra padding goes to the right when it cannot be split evenly. Text
/// wider than the field is returned unchanged.
pub fn center(text: &str, width: usize) -> String {
    let len = text.chars().count();
    if len >= width {
        return String::from(text);
    }
    let left = (width - len) / 2;
    let right = width - len - left;
    let mut out = String::with_capacity(width);
    out.extend(core::iter::repeat(' ').take(left));
    out.push_str(text);
    out.extend(core::iter::repeat(' ').take(right));
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn trimmed(lines: &[String]) -> Vec<&str> {
        lines.iter().map(|l| l.trim_end()).collect()
    }

    #[test]
    fn test_fold_diacritics() {
        assert_eq!(fold_diacritics("café"), "cafe");
        assert_eq!(fold_diacritics("Próspero Ano Novo"), "Prospero Ano Novo");
        assert_eq!(fold_diacritics("ÇÃO ação"), "CAO acao");
        assert_eq!(fold_diacritics("plain ascii 123"), "plain ascii 123");
    }

    #[test]
    fn test_no_wrap_splits_on_newlines() {
        let lines = layout("Hoje: limpo\nAgora: 21 C\nMax: 24 C\nMin: 15 C", 20, 4, false);
        assert_eq!(
            trimmed(&lines),
            vec!["Hoje: limpo", "Agora: 21 C", "Max: 24 C", "Min: 15 C"]
        );
    }

    #[test]
    fn test_no_wrap_truncates_and_drops_extra_rows() {
        let lines = layout("a very long line that keeps going\n2\n3\n4\n5", 10, 4, false);
        assert_eq!(lines[0], "a very lon");
        assert_eq!(lines.len(), 4);
        assert_eq!(lines[3], "4         ");
    }

    #[test]
    fn test_wrap_breaks_at_last_space() {
        let lines = layout("May the Force be with you.", 20, 4, true);
        assert_eq!(trimmed(&lines), vec!["May the Force be", "with you.", "", ""]);
    }

    #[test]
    fn test_wrap_respects_newline_within_width() {
        let lines = layout("Feliz Natal!\n\nQue 2026 seja incrível!", 20, 4, true);
        assert_eq!(
            trimmed(&lines),
            vec!["Feliz Natal!", "", "Que 2026 seja", "incrivel!"]
        );
    }

    #[test]
    fn test_wrap_hard_breaks_long_word() {
        let lines = layout("abcdefghijklmnopqrstuvwxyz", 10, 4, true);
        assert_eq!(
            trimmed(&lines),
            vec!["abcdefghij", "klmnopqrst", "uvwxyz", ""]
        );
    }

    #[test]
    fn test_wrap_ignores_leading_space_as_break() {
        // After the newline the chunk starts with a space, which is not a
        // usable break point
        let lines = layout("ab\n cdefgh", 4, 3, true);
        assert_eq!(lines, vec!["ab  ", " cde", "fgh "]);
    }

    #[test]
    fn test_wrap_trims_message() {
        let lines = layout("   hello   ", 8, 2, true);
        assert_eq!(lines, vec!["hello   ", "        "]);
    }

    #[test]
    fn test_empty_message() {
        let lines = layout("", 20, 4, true);
        assert_eq!(lines, vec![" ".repeat(20); 4]);
    }

    #[test]
    fn test_center() {
        assert_eq!(center("12:30", 10), "  12:30   ");
        assert_eq!(center("too wide for it", 4), "too wide for it");
    }

    proptest! {
        #[test]
        fn prop_exact_geometry(message in "\\PC{0,120}", cols in 1usize..24, rows in 1usize..6, wrap in any::<bool>()) {
            let lines = layout(&message, cols, rows, wrap);
            prop_assert_eq!(lines.len(), rows);
            for line in &lines {
                prop_assert_eq!(line.chars().count(), cols);
            }
        }

        #[test]
        fn prop_layout_is_deterministic(message in "\\PC{0,80}", wrap in any::<bool>()) {
            prop_assert_eq!(layout(&message, 20, 4, wrap), layout(&message, 20, 4, wrap));
        }

        #[test]
        fn prop_wrap_keeps_words_whole(words in proptest::collection::vec("[a-z]{1,8}", 1..12)) {
            // Every word fits in a line, so a break point always exists and
            // no word may be split across lines.
            let message = words.join(" ");
            let lines = layout(&message, 20, 12, true);
            let rejoined: Vec<&str> = lines
                .iter()
                .flat_map(|l| l.split_whitespace())
                .collect();
            prop_assert_eq!(rejoined, words.iter().map(String::as_str).collect::<Vec<_>>());
        }
    }
}
