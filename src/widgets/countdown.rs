use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Layout, Rect},
    prelude::*,
    widgets::{Block, Borders, Gauge, Paragraph, Widget},
};

use crate::session::StatusBand;

/// The panel shown while a search is "running".
#[derive(Debug, Clone)]
pub struct Countdown {
    pub time_left: u8,
    pub progress: f64,
    pub status: StatusBand,
}

impl Countdown {
    pub const HEIGHT: u16 = 10;

    fn dots(&self) -> Line<'static> {
        let active = usize::from(self.time_left) % 3;
        let spans: Vec<Span> = (0..3)
            .map(|i| {
                if i == active {
                    Span::styled("● ", Style::default().fg(Color::Cyan))
                } else {
                    Span::styled("● ", Style::default().fg(Color::DarkGray))
                }
            })
            .collect();

        Line::from(spans).centered()
    }
}

impl Widget for Countdown {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let block = Block::new()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Cyan));
        let inner = block.inner(area);
        block.render(area, buf);

        let [text_area, gauge_area] =
            Layout::vertical([Constraint::Fill(1), Constraint::Length(1)]).areas(inner);

        let lines = vec![
            Line::from(Span::styled(
                format!("{:02}", self.time_left),
                Style::default()
                    .fg(Color::LightCyan)
                    .add_modifier(Modifier::BOLD),
            ))
            .centered(),
            Line::from(Span::styled(
                "SECONDS REMAINING",
                Style::default().fg(Color::Cyan),
            ))
            .centered(),
            Line::default(),
            self.dots(),
            Line::default(),
            Line::from(Span::styled(
                self.status.message(),
                Style::default().fg(Color::Gray),
            ))
            .centered(),
        ];

        Paragraph::new(lines).render(text_area, buf);

        Gauge::default()
            .gauge_style(Style::default().fg(Color::Cyan).bg(Color::Black))
            .ratio(self.progress.clamp(0.0, 1.0))
            .label(format!("{:.0}%", self.progress * 100.0))
            .render(gauge_area, buf);
    }
}
