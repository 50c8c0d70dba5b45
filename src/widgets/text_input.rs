use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Modifier, Style, Stylize},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Widget},
};
use unicode_width::UnicodeWidthChar;

#[derive(Debug, Clone)]
pub struct TextInput<'a> {
    pub state: &'a TextInputState,
    pub placeholder: &'a str,
    pub disabled: bool,
}

#[derive(Debug, Clone, Default)]
pub struct TextInputState {
    pub input: String,
    /// Cursor position, counted in chars rather than bytes.
    pub cursor_position: usize,
}

impl TextInputState {
    pub fn set(&mut self, input: &str) {
        self.input = input.to_owned();
        self.cursor_position = self.char_count();
    }

    pub fn clear(&mut self) {
        self.input.clear();
        self.cursor_position = 0;
    }

    fn char_count(&self) -> usize {
        self.input.chars().count()
    }

    fn byte_offset(&self, char_idx: usize) -> usize {
        self.input
            .char_indices()
            .nth(char_idx)
            .map(|(offset, _)| offset)
            .unwrap_or(self.input.len())
    }

    /// Index of the first char to draw so the cursor cell fits in `width`
    /// columns.
    fn scroll_offset(&self, width: usize) -> usize {
        let before_cursor: Vec<char> = self.input.chars().take(self.cursor_position).collect();

        // one column is kept for the cursor itself
        let mut used = 1;
        let mut offset = before_cursor.len();
        while offset > 0 {
            let w = before_cursor[offset - 1].width().unwrap_or(0);
            if used + w > width {
                break;
            }
            used += w;
            offset -= 1;
        }

        offset
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> bool {
        if key
            .modifiers
            .intersects(KeyModifiers::CONTROL | KeyModifiers::ALT)
        {
            return false;
        }

        match key.code {
            KeyCode::Char(c) => {
                let offset = self.byte_offset(self.cursor_position);
                self.input.insert(offset, c);
                self.cursor_position += 1;
                true
            }
            KeyCode::Backspace => {
                if self.cursor_position > 0 {
                    self.cursor_position -= 1;
                    let offset = self.byte_offset(self.cursor_position);
                    self.input.remove(offset);
                }
                true
            }
            KeyCode::Delete => {
                if self.cursor_position < self.char_count() {
                    let offset = self.byte_offset(self.cursor_position);
                    self.input.remove(offset);
                }
                true
            }
            KeyCode::Left => {
                self.cursor_position = self.cursor_position.saturating_sub(1);
                true
            }
            KeyCode::Right => {
                self.cursor_position = (self.cursor_position + 1).min(self.char_count());
                true
            }
            KeyCode::Home => {
                self.cursor_position = 0;
                true
            }
            KeyCode::End => {
                self.cursor_position = self.char_count();
                true
            }
            _ => false,
        }
    }
}

impl Widget for TextInput<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let state = self.state;
        let border_style = if self.disabled {
            Style::default().fg(Color::DarkGray)
        } else {
            Style::default().fg(Color::Cyan)
        };
        let block = Block::new().borders(Borders::ALL).border_style(border_style);
        let inner = block.inner(area);
        block.render(area, buf);

        let offset = state.scroll_offset(inner.width as usize);
        let visible = &state.input[state.byte_offset(offset)..];

        let line = if state.input.is_empty() {
            Line::from(Span::styled(
                self.placeholder,
                Style::default().fg(Color::DarkGray),
            ))
        } else if self.disabled {
            Line::from(Span::styled(
                visible,
                Style::default().add_modifier(Modifier::DIM),
            ))
        } else {
            let split = state.byte_offset(state.cursor_position) - state.byte_offset(offset);
            let (before, rest) = visible.split_at(split);
            let mut rest = rest.chars();
            let under_cursor = rest.next().map(String::from).unwrap_or_else(|| " ".into());

            Line::from(vec![
                Span::raw(before),
                Span::styled(under_cursor, Style::default().reversed()),
                Span::raw(rest.as_str()),
            ])
        };

        Paragraph::new(line).render(inner, buf);
    }
}
