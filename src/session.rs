use tracing::{debug, info};

use crate::results::{self, SearchResult};
use crate::widgets::TextInputState;

/// Length of the simulated search, in ticks of one second.
pub const COUNTDOWN_SECS: u8 = 15;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Phase {
    #[default]
    Idle,
    Searching,
    Complete,
}

/// Requests for the runtime. The session never owns a clock, it only says
/// which timers should exist.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Effect {
    StartCountdown,
    StopCountdown,
    ScheduleReveal,
    CancelReveal,
}

/// Lower bounds (exclusive) of the first four status bands.
///
/// A `time_left` above `initializing` is band one, above `scanning` band
/// two and so on. Anything at or below `analyzing` falls into the last band.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatusThresholds {
    pub initializing: u8,
    pub scanning: u8,
    pub cross_referencing: u8,
    pub analyzing: u8,
}

impl Default for StatusThresholds {
    fn default() -> Self {
        Self {
            initializing: 12,
            scanning: 9,
            cross_referencing: 6,
            analyzing: 3,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusBand {
    Initializing,
    Scanning,
    CrossReferencing,
    Analyzing,
    Compiling,
}

impl StatusBand {
    pub fn for_time_left(time_left: u8, thresholds: &StatusThresholds) -> Self {
        if time_left > thresholds.initializing {
            Self::Initializing
        } else if time_left > thresholds.scanning {
            Self::Scanning
        } else if time_left > thresholds.cross_referencing {
            Self::CrossReferencing
        } else if time_left > thresholds.analyzing {
            Self::Analyzing
        } else {
            Self::Compiling
        }
    }

    pub fn message(self) -> &'static str {
        match self {
            Self::Initializing => "Initializing deep search protocols...",
            Self::Scanning => "Scanning knowledge databases...",
            Self::CrossReferencing => "Cross-referencing sources...",
            Self::Analyzing => "Analyzing relevance scores...",
            Self::Compiling => "Compiling premium results...",
        }
    }
}

/// All state behind the search page.
#[derive(Debug, Clone)]
pub struct Session {
    query: TextInputState,
    phase: Phase,
    time_left: u8,
    results: Vec<SearchResult>,
    has_searched: bool,
    show_results: bool,
    thresholds: StatusThresholds,
}

impl Default for Session {
    fn default() -> Self {
        Self::new(StatusThresholds::default())
    }
}

impl Session {
    pub fn new(thresholds: StatusThresholds) -> Self {
        Self {
            query: TextInputState::default(),
            phase: Phase::Idle,
            time_left: COUNTDOWN_SECS,
            results: vec![],
            has_searched: false,
            show_results: false,
            thresholds,
        }
    }

    pub fn query(&self) -> &str {
        &self.query.input
    }

    pub fn input(&self) -> &TextInputState {
        &self.query
    }

    /// The query input, unless it is locked by a running countdown.
    pub fn input_mut(&mut self) -> Option<&mut TextInputState> {
        match self.phase {
            Phase::Searching => None,
            Phase::Idle | Phase::Complete => Some(&mut self.query),
        }
    }

    pub fn set_query(&mut self, query: &str) {
        if let Some(input) = self.input_mut() {
            input.set(query);
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn is_searching(&self) -> bool {
        self.phase == Phase::Searching
    }

    pub fn time_left(&self) -> u8 {
        self.time_left
    }

    pub fn results(&self) -> &[SearchResult] {
        &self.results
    }

    pub fn has_searched(&self) -> bool {
        self.has_searched
    }

    pub fn show_results(&self) -> bool {
        self.show_results
    }

    pub fn can_submit(&self) -> bool {
        !self.is_searching() && !self.query().trim().is_empty()
    }

    /// Fraction of the countdown already elapsed, in `[0, 1]`.
    pub fn progress(&self) -> f64 {
        f64::from(COUNTDOWN_SECS - self.time_left) / f64::from(COUNTDOWN_SECS)
    }

    pub fn status(&self) -> StatusBand {
        StatusBand::for_time_left(self.time_left, &self.thresholds)
    }

    pub fn submit(&mut self) -> Vec<Effect> {
        if !self.can_submit() {
            debug!(phase = ?self.phase, "ignoring submit");
            return vec![];
        }

        info!(query = self.query().trim(), "search started");

        let mut effects = vec![];
        if self.phase == Phase::Complete && !self.show_results {
            effects.push(Effect::CancelReveal);
        }

        self.phase = Phase::Searching;
        self.time_left = COUNTDOWN_SECS;
        self.results.clear();
        self.show_results = false;
        self.has_searched = true;

        effects.push(Effect::StartCountdown);
        effects
    }

    pub fn tick(&mut self) -> Vec<Effect> {
        if self.phase != Phase::Searching {
            debug!(phase = ?self.phase, "ignoring tick");
            return vec![];
        }

        self.time_left = self.time_left.saturating_sub(1);
        debug!(time_left = self.time_left, "tick");

        if self.time_left > 0 {
            return vec![];
        }

        self.phase = Phase::Complete;
        self.results = results::catalog().to_vec();
        info!(results = self.results.len(), "search complete");

        vec![Effect::StopCountdown, Effect::ScheduleReveal]
    }

    pub fn reveal(&mut self) {
        if self.phase != Phase::Complete || self.results.is_empty() {
            debug!(phase = ?self.phase, "ignoring reveal");
            return;
        }

        self.show_results = true;
        info!("results revealed");
    }

    pub fn reset(&mut self) -> Vec<Effect> {
        if self.phase != Phase::Complete {
            debug!(phase = ?self.phase, "ignoring reset");
            return vec![];
        }

        self.query.clear();
        self.results.clear();
        self.has_searched = false;
        self.show_results = false;
        self.phase = Phase::Idle;
        info!("session reset");

        vec![Effect::CancelReveal]
    }
}
