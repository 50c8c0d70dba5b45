use std::time::Duration;

use tokio::sync::mpsc::UnboundedSender;
use tokio::task::JoinHandle;
use tokio::time::{self, Instant, MissedTickBehavior};

/// A recurring timer. Sends `message` every `period`, the first one a full
/// period after start. Stops when dropped or when the receiver goes away.
#[derive(Debug)]
pub struct Ticker {
    handle: JoinHandle<()>,
}

impl Ticker {
    pub fn start<M>(period: Duration, tx: UnboundedSender<M>, message: M) -> Self
    where
        M: Clone + Send + 'static,
    {
        let handle = tokio::spawn(async move {
            let mut interval = time::interval_at(Instant::now() + period, period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

            loop {
                interval.tick().await;
                if tx.send(message.clone()).is_err() {
                    break;
                }
            }
        });

        Self { handle }
    }
}

impl Drop for Ticker {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

/// A one-shot timer. Sends `message` once after `after`, unless dropped first.
#[derive(Debug)]
pub struct Delay {
    handle: JoinHandle<()>,
}

impl Delay {
    pub fn start<M>(after: Duration, tx: UnboundedSender<M>, message: M) -> Self
    where
        M: Send + 'static,
    {
        let handle = tokio::spawn(async move {
            time::sleep(after).await;
            let _ = tx.send(message);
        });

        Self { handle }
    }
}

impl Drop for Delay {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::sync::mpsc;

    #[tokio::test(start_paused = true)]
    async fn ticker_fires_once_per_period() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let started = Instant::now();
        let _ticker = Ticker::start(Duration::from_secs(1), tx, "tick");

        for expected in 1..=3 {
            assert_eq!(rx.recv().await, Some("tick"));
            assert_eq!(started.elapsed(), Duration::from_secs(expected));
        }
    }

    #[tokio::test(start_paused = true)]
    async fn dropped_ticker_stops() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let ticker = Ticker::start(Duration::from_secs(1), tx, ());

        assert_eq!(rx.recv().await, Some(()));
        drop(ticker);

        // the aborted task drops its sender, closing the channel
        assert_eq!(rx.recv().await, None);
    }

    #[tokio::test(start_paused = true)]
    async fn delay_fires_once() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let started = Instant::now();
        let _delay = Delay::start(Duration::from_millis(100), tx, 7);

        assert_eq!(rx.recv().await, Some(7));
        assert_eq!(started.elapsed(), Duration::from_millis(100));
        assert_eq!(rx.recv().await, None);
    }

    #[tokio::test(start_paused = true)]
    async fn dropped_delay_never_fires() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let delay = Delay::start(Duration::from_millis(100), tx, 7);
        drop(delay);

        assert_eq!(rx.recv().await, None);
    }
}
