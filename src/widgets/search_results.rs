use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Layout, Rect},
    prelude::*,
    widgets::{Block, Borders, Paragraph, StatefulWidget, Widget, Wrap},
};

use crate::results::SearchResult;
use crate::text::{clamp_lines, wrap_words};

#[derive(Debug, Clone)]
pub struct SearchResults<'a> {
    pub results: &'a [SearchResult],
    pub query: &'a str,
}

#[derive(Debug, Default, Clone)]
pub struct SearchResultsState {
    pub vertical_scroll: usize,
}

impl SearchResultsState {
    pub fn scroll_down(&mut self, lines: usize) {
        self.vertical_scroll = self.vertical_scroll.saturating_add(lines);
    }

    pub fn scroll_up(&mut self, lines: usize) {
        self.vertical_scroll = self.vertical_scroll.saturating_sub(lines);
    }
}

/// Titles and snippets are cut to this many lines, like a clamped card.
const MAX_ITEM_LINES: usize = 2;

impl<'a> StatefulWidget for SearchResults<'a> {
    type State = SearchResultsState;

    fn render(self, area: Rect, buf: &mut Buffer, state: &mut Self::State) {
        let width = area.width as usize;

        let summary = wrap_words(
            &format!(
                "● Found {} high-quality results for \"{}\"",
                self.results.len(),
                self.query
            ),
            width,
        );

        let [summary_area, list_area, again_area] = Layout::vertical([
            Constraint::Length(summary.len() as u16 + 1),
            Constraint::Fill(1),
            Constraint::Length(2),
        ])
        .areas(area);

        render_summary(summary, summary_area, buf);

        let items: Vec<(Vec<String>, Vec<String>)> = self
            .results
            .iter()
            .map(|result| {
                let title = clamp_lines(wrap_words(result.title, width), MAX_ITEM_LINES, width);
                let snippet =
                    clamp_lines(wrap_words(result.snippet, width), MAX_ITEM_LINES, width);
                (title, snippet)
            })
            .collect();

        // source border + title + snippet + 1 for margin
        let heights: Vec<usize> = items
            .iter()
            .map(|(title, snippet)| title.len() + snippet.len() + 2)
            .collect();
        let total_height: usize = heights.iter().sum();

        let mut tbuf = Buffer::empty(Rect::new(
            0,
            0,
            list_area.width,
            total_height.min(u16::MAX as usize) as u16,
        ));

        let mut y = 0;
        for ((result, (title, snippet)), &h) in self.results.iter().zip(items).zip(&heights) {
            let item_area = Rect::new(0, y as u16, list_area.width, h as u16).intersection(tbuf.area);
            render_result(result, title, snippet, item_area, &mut tbuf);
            y += h;
        }

        let max_scroll = total_height.saturating_sub(list_area.height as usize);
        state.vertical_scroll = state.vertical_scroll.min(max_scroll);

        crate::buffers::blit(buf, list_area, &tbuf, (0, state.vertical_scroll as u16));

        let hint = if max_scroll > 0 {
            "Start a new search (ctrl+n) · ↑↓ to scroll"
        } else {
            "Start a new search (ctrl+n)"
        };
        Paragraph::new(Line::from(Span::styled(
            hint,
            Style::default()
                .fg(Color::DarkGray)
                .add_modifier(Modifier::UNDERLINED),
        )))
        .centered()
        .wrap(Wrap { trim: true })
        .render(again_area, buf);
    }
}

fn render_summary(summary: Vec<String>, area: Rect, buf: &mut Buffer) {
    let text_style = Style::default().fg(Color::Cyan);

    let lines: Vec<Line> = summary
        .into_iter()
        .enumerate()
        .map(|(idx, line)| match line.strip_prefix("● ") {
            Some(rest) if idx == 0 => Line::from(vec![
                Span::styled("● ", Style::default().fg(Color::LightGreen)),
                Span::styled(rest.to_owned(), text_style),
            ]),
            _ => Line::from(Span::styled(line, text_style)),
        })
        .collect();

    Paragraph::new(lines).render(area, buf);
}

fn render_result(
    result: &SearchResult,
    title: Vec<String>,
    snippet: Vec<String>,
    area: Rect,
    buf: &mut Buffer,
) {
    let block = Block::new().borders(Borders::TOP).title(Span::styled(
        format!(" {} ", result.source),
        Style::default().fg(Color::Cyan).add_modifier(Modifier::DIM),
    ));

    let title_style = Style::default()
        .fg(Color::White)
        .add_modifier(Modifier::BOLD);
    let snippet_style = Style::default().fg(Color::Gray);

    let lines: Vec<Line> = title
        .into_iter()
        .map(|line| Line::from(Span::styled(line, title_style)))
        .chain(
            snippet
                .into_iter()
                .map(|line| Line::from(Span::styled(line, snippet_style))),
        )
        .collect();

    Paragraph::new(lines).block(block).render(area, buf);
}
