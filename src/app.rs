use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use color_eyre::eyre;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use indoc::indoc;
use ratatui::layout::{Flex, Rect};
use ratatui::widgets::{Block, Borders, Paragraph, Wrap};
use ratatui::{DefaultTerminal, prelude::*};
use tokio::sync::mpsc::{self, UnboundedSender};
use tracing::{debug, info};

use crate::config::Config;
use crate::session::{Effect, Session};
use crate::timer::{Delay, Ticker};
use crate::widgets::{Countdown, SearchResults, SearchResultsState, TextInput};

const INTRO_HINT: &str = indoc! {"
    Unlike instant search engines, SlowSearch takes 15 seconds to deliver \
    thoughtfully curated results. Good things come to those who wait.
"};
const HINT_HIGHLIGHT: &str = "thoughtfully curated";

const MAX_WIDTH: u16 = 80;

/// Everything the event loop reacts to. Timer messages carry the generation
/// of the search that scheduled them so leftovers from an earlier search are
/// recognized and dropped.
#[derive(Debug, Clone)]
pub enum Message {
    Input(Event),
    InputClosed,
    Tick(u64),
    Reveal(u64),
}

#[derive(Debug)]
pub struct App {
    pub should_exit: bool,
    session: Session,
    results_state: SearchResultsState,
    config: Config,
    tx: UnboundedSender<Message>,
    generation: u64,
    countdown: Option<Ticker>,
    reveal: Option<Delay>,
}

impl App {
    pub fn new(config: Config, tx: UnboundedSender<Message>) -> Self {
        Self {
            should_exit: false,
            session: Session::new(config.status_thresholds),
            results_state: SearchResultsState::default(),
            config,
            tx,
            generation: 0,
            countdown: None,
            reveal: None,
        }
    }

    pub async fn run(config: Config, mut terminal: DefaultTerminal) -> eyre::Result<()> {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut app = App::new(config, tx.clone());
        let input = InputReader::spawn(tx);

        info!("event loop started");

        while !app.should_exit {
            terminal.draw(|frame| frame.render_widget(&mut app, frame.area()))?;

            let Some(message) = rx.recv().await else {
                break;
            };
            app.handle_message(message);
        }

        // release the timers before waiting on the input thread
        drop(app);
        input.stop()
    }

    pub fn handle_message(&mut self, message: Message) {
        match message {
            Message::Input(Event::Key(key)) => self.handle_key(key),
            Message::Input(_) => {}
            Message::InputClosed => self.should_exit = true,
            Message::Tick(generation) => {
                if generation != self.generation || self.countdown.is_none() {
                    debug!(generation, current = self.generation, "dropping stale tick");
                    return;
                }
                let effects = self.session.tick();
                self.apply(effects);
            }
            Message::Reveal(generation) => {
                if generation != self.generation || self.reveal.take().is_none() {
                    debug!(generation, current = self.generation, "dropping stale reveal");
                    return;
                }
                self.session.reveal();
            }
        }
    }

    fn handle_key(&mut self, key: KeyEvent) {
        if key.kind != KeyEventKind::Press {
            return;
        }

        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);

        match key.code {
            KeyCode::Esc => self.should_exit = true,
            KeyCode::Char('c') if ctrl => self.should_exit = true,
            KeyCode::Char('n') if ctrl => {
                if self.session.show_results() {
                    let effects = self.session.reset();
                    self.apply(effects);
                    self.results_state = SearchResultsState::default();
                }
            }
            KeyCode::Enter => {
                let effects = self.session.submit();
                if !effects.is_empty() {
                    self.results_state = SearchResultsState::default();
                }
                self.apply(effects);
            }
            KeyCode::Up => self.results_state.scroll_up(1),
            KeyCode::Down => self.results_state.scroll_down(1),
            KeyCode::PageUp => self.results_state.scroll_up(10),
            KeyCode::PageDown => self.results_state.scroll_down(10),
            _ => {
                if let Some(input) = self.session.input_mut() {
                    input.handle_key(key);
                }
            }
        }
    }

    fn apply(&mut self, effects: Vec<Effect>) {
        for effect in effects {
            match effect {
                Effect::StartCountdown => {
                    self.generation += 1;
                    // replacing the old ticker cancels it
                    self.countdown = Some(Ticker::start(
                        self.config.tick_interval,
                        self.tx.clone(),
                        Message::Tick(self.generation),
                    ));
                }
                Effect::StopCountdown => self.countdown = None,
                Effect::ScheduleReveal => {
                    self.reveal = Some(Delay::start(
                        self.config.reveal_delay,
                        self.tx.clone(),
                        Message::Reveal(self.generation),
                    ));
                }
                Effect::CancelReveal => self.reveal = None,
            }
        }
    }
}

impl Widget for &mut App {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let [area] = Layout::horizontal([Constraint::Max(MAX_WIDTH)])
            .flex(Flex::Center)
            .areas(area);

        let compact = self.session.has_searched() && !self.session.is_searching();
        let header_height = if compact { 2 } else { 3 };

        let [header_area, search_area, main_area, footer_area] = Layout::vertical([
            Constraint::Length(header_height),
            Constraint::Length(3),
            Constraint::Fill(1),
            Constraint::Length(2),
        ])
        .areas(area);

        App::render_header(compact, header_area, buf);
        self.render_search_box(search_area, buf);

        let [main_area] = Layout::vertical([Constraint::Fill(1)])
            .margin(1)
            .areas(main_area);

        if self.session.is_searching() {
            let [countdown_area, _] =
                Layout::vertical([Constraint::Length(Countdown::HEIGHT), Constraint::Fill(1)])
                    .areas(main_area);

            Countdown {
                time_left: self.session.time_left(),
                progress: self.session.progress(),
                status: self.session.status(),
            }
            .render(countdown_area, buf);
        }

        if self.session.show_results() && !self.session.results().is_empty() {
            SearchResults {
                results: self.session.results(),
                query: self.session.query(),
            }
            .render(main_area, buf, &mut self.results_state);
        }

        if !self.session.has_searched() {
            App::render_intro_hint(main_area, buf);
        }

        App::render_footer(footer_area, buf);
    }
}

impl App {
    fn render_header(compact: bool, area: Rect, buf: &mut Buffer) {
        let mut lines = vec![
            Line::from(vec![
                Span::styled(
                    "SLOW",
                    Style::default()
                        .fg(Color::LightCyan)
                        .add_modifier(Modifier::BOLD),
                ),
                Span::styled(
                    "SEARCH",
                    Style::default()
                        .fg(Color::White)
                        .add_modifier(Modifier::BOLD),
                ),
            ])
            .centered(),
        ];

        if !compact {
            lines.push(
                Line::from(Span::styled(
                    "Q U A L I T Y   T A K E S   T I M E",
                    Style::default().fg(Color::Cyan).add_modifier(Modifier::DIM),
                ))
                .centered(),
            );
        }

        Paragraph::new(lines).render(area, buf);
    }

    fn render_search_box(&self, area: Rect, buf: &mut Buffer) {
        let [input_area, button_area] =
            Layout::horizontal([Constraint::Fill(1), Constraint::Length(12)]).areas(area);

        TextInput {
            state: self.session.input(),
            placeholder: "What do you seek?",
            disabled: self.session.is_searching(),
        }
        .render(input_area, buf);

        let button_style = if self.session.can_submit() {
            Style::default()
                .fg(Color::LightCyan)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::DarkGray)
        };

        Paragraph::new("SEARCH")
            .style(button_style)
            .centered()
            .block(
                Block::new()
                    .borders(Borders::ALL)
                    .border_style(button_style),
            )
            .render(button_area, buf);
    }

    fn render_intro_hint(area: Rect, buf: &mut Buffer) {
        let text = INTRO_HINT.trim_end();
        let line = match text.split_once(HINT_HIGHLIGHT) {
            Some((before, after)) => Line::from(vec![
                Span::raw(before),
                Span::styled(HINT_HIGHLIGHT, Style::default().fg(Color::Cyan)),
                Span::raw(after),
            ]),
            None => Line::from(text),
        };

        Paragraph::new(line)
            .style(Style::default().fg(Color::DarkGray))
            .centered()
            .wrap(Wrap { trim: true })
            .render(area, buf);
    }

    fn render_footer(area: Rect, buf: &mut Buffer) {
        let dim = Style::default().fg(Color::DarkGray);

        Paragraph::new(vec![
            Line::from("Enter to search, ctrl+n for a new search, ↓↑ to scroll, Esc to quit."),
            Line::from(vec![
                Span::raw("Requested by "),
                Span::styled("@stringer_kade", Style::default().fg(Color::Cyan)),
                Span::raw(" · Built by "),
                Span::styled("@clonkbot", Style::default().fg(Color::Yellow)),
            ]),
        ])
        .style(dim)
        .centered()
        .render(area, buf);
    }
}

/// Reads terminal events on a dedicated thread and forwards them into the
/// event loop's channel.
struct InputReader {
    running: Arc<AtomicBool>,
    handle: JoinHandle<eyre::Result<()>>,
}

impl InputReader {
    const POLL_INTERVAL: Duration = Duration::from_millis(50);

    fn spawn(tx: UnboundedSender<Message>) -> Self {
        let running = Arc::new(AtomicBool::new(true));
        let flag = Arc::clone(&running);

        let handle = thread::spawn(move || -> eyre::Result<()> {
            let result = Self::pump(&flag, &tx);
            if result.is_err() {
                let _ = tx.send(Message::InputClosed);
            }
            result
        });

        Self { running, handle }
    }

    fn pump(running: &AtomicBool, tx: &UnboundedSender<Message>) -> eyre::Result<()> {
        while running.load(Ordering::Relaxed) {
            if event::poll(Self::POLL_INTERVAL)? {
                let event = event::read()?;
                if tx.send(Message::Input(event)).is_err() {
                    break;
                }
            }
        }
        Ok(())
    }

    fn stop(self) -> eyre::Result<()> {
        self.running.store(false, Ordering::Relaxed);
        match self.handle.join() {
            Ok(result) => result,
            Err(err) => std::panic::resume_unwind(err),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::{COUNTDOWN_SECS, Phase};
    use tokio::sync::mpsc::UnboundedReceiver;
    use tokio::time::Instant;

    fn test_app() -> (App, UnboundedReceiver<Message>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (App::new(Config::default(), tx), rx)
    }

    fn key(app: &mut App, code: KeyCode) {
        app.handle_message(Message::Input(Event::Key(KeyEvent::new(
            code,
            KeyModifiers::NONE,
        ))));
    }

    fn ctrl(app: &mut App, c: char) {
        app.handle_message(Message::Input(Event::Key(KeyEvent::new(
            KeyCode::Char(c),
            KeyModifiers::CONTROL,
        ))));
    }

    fn type_str(app: &mut App, s: &str) {
        for c in s.chars() {
            key(app, KeyCode::Char(c));
        }
    }

    async fn pump_until(
        app: &mut App,
        rx: &mut UnboundedReceiver<Message>,
        done: impl Fn(&App) -> bool,
    ) {
        while !done(app) {
            let message = rx.recv().await.unwrap();
            app.handle_message(message);
        }
    }

    fn render(app: &mut App) -> String {
        let area = Rect::new(0, 0, 80, 40);
        let mut buf = Buffer::empty(area);
        app.render(area, &mut buf);

        let mut s = String::new();
        for y in 0..area.height {
            for x in 0..area.width {
                s += buf.cell((x, y)).unwrap().symbol();
            }
            s += "\n";
        }
        s
    }

    #[tokio::test(start_paused = true)]
    async fn cats_search_end_to_end() {
        let (mut app, mut rx) = test_app();
        let started = Instant::now();

        type_str(&mut app, "cats");
        key(&mut app, KeyCode::Enter);
        assert_eq!(app.session.phase(), Phase::Searching);

        pump_until(&mut app, &mut rx, |app| {
            app.session.phase() == Phase::Complete
        })
        .await;
        assert_eq!(started.elapsed(), Duration::from_secs(COUNTDOWN_SECS.into()));
        assert_eq!(app.session.results().len(), 5);
        assert!(!app.session.show_results());
        assert!(app.countdown.is_none());

        pump_until(&mut app, &mut rx, |app| app.session.show_results()).await;
        assert_eq!(
            started.elapsed(),
            Duration::from_secs(COUNTDOWN_SECS.into()) + Duration::from_millis(100)
        );
        assert_eq!(
            app.session.results()[0].title,
            "The Ultimate Guide to Deep Research"
        );
        assert!(app.reveal.is_none());

        let rendered = render(&mut app);
        assert!(rendered.contains("Found 5 high-quality results for \"cats\""));
    }

    #[tokio::test]
    async fn whitespace_query_does_not_search() {
        let (mut app, _rx) = test_app();

        type_str(&mut app, "   ");
        key(&mut app, KeyCode::Enter);

        assert_eq!(app.session.phase(), Phase::Idle);
        assert!(!app.session.has_searched());
        assert!(app.countdown.is_none());
    }

    #[tokio::test]
    async fn typing_is_ignored_while_searching() {
        let (mut app, _rx) = test_app();

        type_str(&mut app, "cats");
        key(&mut app, KeyCode::Enter);
        type_str(&mut app, "dogs");
        key(&mut app, KeyCode::Backspace);

        assert_eq!(app.session.query(), "cats");
    }

    #[tokio::test]
    async fn stale_ticks_are_dropped() {
        let (mut app, _rx) = test_app();

        app.handle_message(Message::Tick(0));
        assert_eq!(app.session.phase(), Phase::Idle);

        type_str(&mut app, "cats");
        key(&mut app, KeyCode::Enter);
        app.handle_message(Message::Tick(app.generation - 1));
        assert_eq!(app.session.time_left(), COUNTDOWN_SECS);

        app.handle_message(Message::Tick(app.generation));
        assert_eq!(app.session.time_left(), COUNTDOWN_SECS - 1);
    }

    #[tokio::test]
    async fn reveal_is_dropped_without_pending_delay() {
        let (mut app, _rx) = test_app();

        type_str(&mut app, "cats");
        key(&mut app, KeyCode::Enter);
        for _ in 0..COUNTDOWN_SECS {
            app.handle_message(Message::Tick(app.generation));
        }
        assert!(app.reveal.is_some());

        app.handle_message(Message::Reveal(app.generation - 1));
        assert!(!app.session.show_results());

        app.handle_message(Message::Reveal(app.generation));
        assert!(app.session.show_results());

        app.handle_message(Message::Reveal(app.generation));
        assert!(app.session.show_results());
    }

    #[tokio::test(start_paused = true)]
    async fn new_search_resets_everything() {
        let (mut app, mut rx) = test_app();

        type_str(&mut app, "cats");
        key(&mut app, KeyCode::Enter);

        pump_until(&mut app, &mut rx, |app| {
            app.session.phase() == Phase::Complete
        })
        .await;

        // not offered until the results are on screen
        ctrl(&mut app, 'n');
        assert_eq!(app.session.phase(), Phase::Complete);

        pump_until(&mut app, &mut rx, |app| app.session.show_results()).await;
        ctrl(&mut app, 'n');

        assert_eq!(app.session.phase(), Phase::Idle);
        assert_eq!(app.session.query(), "");
        assert!(app.session.results().is_empty());
        assert!(!app.session.has_searched());
        assert!(!app.session.show_results());
        assert!(render(&mut app).contains("Good things come to those who wait."));
    }

    #[tokio::test]
    async fn escape_and_ctrl_c_exit() {
        let (mut app, _rx) = test_app();
        key(&mut app, KeyCode::Esc);
        assert!(app.should_exit);

        let (mut app, _rx) = test_app();
        ctrl(&mut app, 'c');
        assert!(app.should_exit);
    }

    #[tokio::test]
    async fn closed_input_exits() {
        let (mut app, _rx) = test_app();
        app.handle_message(Message::InputClosed);
        assert!(app.should_exit);
    }

    #[tokio::test]
    async fn intro_hint_highlights_curation() {
        let (mut app, _rx) = test_app();
        let area = Rect::new(0, 0, 80, 40);
        let mut buf = Buffer::empty(area);
        (&mut app).render(area, &mut buf);

        let cyan_text: String = (0..area.height)
            .flat_map(|y| (0..area.width).map(move |x| (x, y)))
            .filter_map(|pos| buf.cell(pos))
            .filter(|cell| cell.fg == Color::Cyan)
            .map(|cell| cell.symbol().to_owned())
            .collect();

        assert!(cyan_text.contains("thoughtfully curated"));
    }

    #[tokio::test]
    async fn narrow_terminal_wraps_results() {
        let (mut app, _rx) = test_app();

        type_str(&mut app, "cats");
        key(&mut app, KeyCode::Enter);
        for _ in 0..COUNTDOWN_SECS {
            app.handle_message(Message::Tick(app.generation));
        }
        app.handle_message(Message::Reveal(app.generation));

        let area = Rect::new(0, 0, 30, 40);
        let mut buf = Buffer::empty(area);
        (&mut app).render(area, &mut buf);

        let mut rendered = String::new();
        for y in 0..area.height {
            for x in 0..area.width {
                rendered += buf.cell((x, y)).unwrap().symbol();
            }
            rendered += "\n";
        }

        assert!(rendered.contains("results for \"cats\""));
        assert!(rendered.contains("Research"));
        assert!(!rendered.contains("resul\n"));
        assert!(!rendered.contains("Deep R"));
    }

    #[tokio::test]
    async fn renders_each_phase() {
        let (mut app, _rx) = test_app();

        let idle = render(&mut app);
        assert!(idle.contains("SLOWSEARCH"));
        assert!(idle.contains("What do you seek?"));
        assert!(idle.contains("Unlike instant search engines"));
        assert!(idle.contains("Requested by @stringer_kade · Built by @clonkbot"));

        type_str(&mut app, "cats");
        key(&mut app, KeyCode::Enter);

        let searching = render(&mut app);
        assert!(searching.contains("15"));
        assert!(searching.contains("SECONDS REMAINING"));
        assert!(searching.contains("Initializing deep search protocols..."));
        assert!(!searching.contains("Unlike instant search engines"));
    }
}
