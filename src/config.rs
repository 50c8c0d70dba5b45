use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;
use color_eyre::eyre;

use crate::session::{COUNTDOWN_SECS, StatusThresholds};

const DEFAULT_LOG_DIR_NAME: &str = "slowsearch";
const TICK_INTERVAL: Duration = Duration::from_secs(1);

#[derive(Debug, Clone, Parser)]
#[command(version, about)]
pub struct Args {
    /// Pause between the countdown finishing and the results appearing
    #[arg(long, env = "SLOWSEARCH_REVEAL_DELAY_MS", default_value_t = 100)]
    pub reveal_delay_ms: u64,

    /// Where each status message takes over, as seconds remaining
    #[arg(
        long,
        env = "SLOWSEARCH_STATUS_THRESHOLDS",
        value_delimiter = ',',
        default_value = "12,9,6,3"
    )]
    pub status_thresholds: Vec<u8>,

    /// Directory for slowsearch.log, defaults to the user cache directory
    #[arg(long, env = "SLOWSEARCH_LOG_DIR")]
    pub log_dir: Option<PathBuf>,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub tick_interval: Duration,
    pub reveal_delay: Duration,
    pub status_thresholds: StatusThresholds,
    pub log_dir: PathBuf,
}

#[cfg(test)]
impl Default for Config {
    fn default() -> Self {
        Self {
            tick_interval: TICK_INTERVAL,
            reveal_delay: Duration::from_millis(100),
            status_thresholds: StatusThresholds::default(),
            log_dir: std::env::temp_dir().join(DEFAULT_LOG_DIR_NAME),
        }
    }
}

impl TryFrom<Args> for Config {
    type Error = eyre::Report;

    fn try_from(args: Args) -> eyre::Result<Self> {
        let status_thresholds = parse_thresholds(&args.status_thresholds)?;

        let log_dir = match args.log_dir {
            Some(dir) => dir,
            None => dirs::cache_dir()
                .ok_or_else(|| eyre::eyre!("Could not find cache directory"))?
                .join(DEFAULT_LOG_DIR_NAME),
        };

        Ok(Self {
            tick_interval: TICK_INTERVAL,
            reveal_delay: Duration::from_millis(args.reveal_delay_ms),
            status_thresholds,
            log_dir,
        })
    }
}

fn parse_thresholds(values: &[u8]) -> eyre::Result<StatusThresholds> {
    let &[initializing, scanning, cross_referencing, analyzing] = values else {
        eyre::bail!(
            "expected 4 status thresholds, got {}: {values:?}",
            values.len()
        );
    };

    if initializing >= COUNTDOWN_SECS {
        eyre::bail!("status thresholds must be below {COUNTDOWN_SECS}, got {initializing}");
    }

    if !values.windows(2).all(|w| w[0] > w[1]) {
        eyre::bail!("status thresholds must be strictly decreasing: {values:?}");
    }

    Ok(StatusThresholds {
        initializing,
        scanning,
        cross_referencing,
        analyzing,
    })
}
