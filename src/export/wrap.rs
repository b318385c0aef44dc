//! Greedy word wrapping by character count.
//!
//! Whitespace (including newlines) is collapsed to single spaces, matching a
//! fixed-metric page where every glyph is assumed to be one column wide.

/// Wraps `text` into lines of at most `width` characters.
///
/// Words longer than `width` are split across lines, filling whatever space
/// remains on the current line first. Blank input produces no lines.
pub fn wrap(text: &str, width: usize) -> Vec<String> {
    let width = width.max(1);
    let mut lines = Vec::new();
    let mut line = String::new();
    let mut line_len = 0usize;

    for word in text.split_whitespace() {
        let word_len = word.chars().count();
        let sep = usize::from(line_len > 0);

        if line_len + sep + word_len <= width {
            if sep == 1 {
                line.push(' ');
            }
            line.push_str(word);
            line_len += sep + word_len;
            continue;
        }

        if word_len <= width {
            lines.push(std::mem::take(&mut line));
            line.push_str(word);
            line_len = word_len;
            continue;
        }

        // Over-long word: fill the rest of this line, then whole chunks.
        let mut rest: Vec<char> = word.chars().collect();
        let room = width.saturating_sub(line_len + sep);
        if line_len > 0 {
            if room > 0 {
                line.push(' ');
                line.extend(rest.drain(..room));
            }
            lines.push(std::mem::take(&mut line));
        }
        while rest.len() > width {
            lines.push(rest.drain(..width).collect());
        }
        line = rest.into_iter().collect();
        line_len = line.chars().count();
    }

    if line_len > 0 {
        lines.push(line);
    }
    lines
}
