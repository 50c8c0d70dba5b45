use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

/// Greedy word wrap measured in display columns. Words wider than `width`
/// are split on char boundaries.
pub fn wrap_words(text: &str, width: usize) -> Vec<String> {
    if width == 0 {
        return vec![];
    }

    let mut lines = vec![];
    let mut current = String::new();
    let mut current_width = 0;

    for mut word in text.split_whitespace() {
        while word.width() > width {
            if current_width > 0 {
                lines.push(std::mem::take(&mut current));
                current_width = 0;
            }
            let (head, tail) = split_at_width(word, width);
            lines.push(head.to_owned());
            word = tail;
        }

        if word.is_empty() {
            continue;
        }

        let word_width = word.width();
        let needed = if current_width == 0 {
            word_width
        } else {
            current_width + 1 + word_width
        };

        if needed > width {
            lines.push(std::mem::take(&mut current));
            current_width = 0;
        }

        if current_width > 0 {
            current.push(' ');
            current_width += 1;
        }
        current.push_str(word);
        current_width += word_width;
    }

    if current_width > 0 {
        lines.push(current);
    }

    lines
}

/// Keeps at most `max_lines`, ending the last kept line with an ellipsis
/// when anything was dropped.
pub fn clamp_lines(mut lines: Vec<String>, max_lines: usize, width: usize) -> Vec<String> {
    if lines.len() <= max_lines {
        return lines;
    }

    lines.truncate(max_lines);
    if let Some(last) = lines.last_mut() {
        while !last.is_empty() && last.width() + 1 > width {
            last.pop();
        }
        last.push('…');
    }

    lines
}

/// Splits `s` after as many chars as fit in `width` columns. At least one
/// char always goes to the head so callers make progress.
fn split_at_width(s: &str, width: usize) -> (&str, &str) {
    let mut used = 0;
    for (idx, c) in s.char_indices() {
        let w = c.width().unwrap_or(0);
        if used + w > width {
            let idx = if idx == 0 { c.len_utf8() } else { idx };
            return s.split_at(idx);
        }
        used += w;
    }
    (s, "")
}
