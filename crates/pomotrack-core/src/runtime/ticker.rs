//! One-second periodic tick source.
//!
//! At most one tick task exists per [`Ticker`]. Arming always tears down the
//! previous task first, and every tick carries the generation it was armed
//! with so the consumer can drop ticks that were already queued when the
//! ticker was cancelled.

use tokio::sync::mpsc::UnboundedSender;
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Duration, Instant, MissedTickBehavior};

pub const TICK_PERIOD: Duration = Duration::from_secs(1);

#[derive(Debug)]
pub struct Ticker {
    period: Duration,
    generation: u64,
    handle: Option<JoinHandle<()>>,
}

impl Ticker {
    pub fn new() -> Self {
        Self::with_period(TICK_PERIOD)
    }

    pub fn with_period(period: Duration) -> Self {
        Self {
            period,
            generation: 0,
            handle: None,
        }
    }

    /// Start a fresh tick task, cancelling any previous one.
    ///
    /// The first tick fires one full period after arming. `make_tick` turns
    /// the generation into the message sent on `tx`. Returns the generation.
    pub fn arm<M, F>(&mut self, tx: UnboundedSender<M>, make_tick: F) -> u64
    where
        M: Send + 'static,
        F: Fn(u64) -> M + Send + 'static,
    {
        self.disarm();
        self.generation = self.generation.wrapping_add(1);
        let generation = self.generation;
        let period = self.period;
        self.handle = Some(tokio::spawn(async move {
            let mut interval = interval_at(Instant::now() + period, period);
            // A late consumer still gets one tick per elapsed period.
            interval.set_missed_tick_behavior(MissedTickBehavior::Burst);
            loop {
                interval.tick().await;
                if tx.send(make_tick(generation)).is_err() {
                    break;
                }
            }
        }));
        tracing::debug!(generation, "ticker armed");
        generation
    }

    pub fn disarm(&mut self) {
        if let Some(handle) = self.handle.take() {
            handle.abort();
            tracing::debug!(generation = self.generation, "ticker disarmed");
        }
    }

    pub fn is_armed(&self) -> bool {
        self.handle.is_some()
    }

    /// Whether a tick tagged with `generation` came from the live ticker.
    pub fn accepts(&self, generation: u64) -> bool {
        self.is_armed() && generation == self.generation
    }
}

impl Default for Ticker {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for Ticker {
    fn drop(&mut self) {
        self.disarm();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::sync::mpsc;

    #[tokio::test(start_paused = true)]
    async fn ticks_once_per_period() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut ticker = Ticker::new();
        let generation = ticker.arm(tx, |g| g);

        tokio::time::sleep(Duration::from_millis(3500)).await;
        let mut seen = Vec::new();
        while let Ok(g) = rx.try_recv() {
            seen.push(g);
        }
        assert_eq!(seen, vec![generation; 3]);
    }

    #[tokio::test(start_paused = true)]
    async fn rearming_cancels_previous_task() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut ticker = Ticker::new();
        let first = ticker.arm(tx.clone(), |g| g);
        tokio::time::sleep(Duration::from_millis(500)).await;
        let second = ticker.arm(tx, |g| g);
        assert_ne!(first, second);
        assert!(!ticker.accepts(first));
        assert!(ticker.accepts(second));

        tokio::time::sleep(Duration::from_millis(2100)).await;
        let mut seen = Vec::new();
        while let Ok(g) = rx.try_recv() {
            seen.push(g);
        }
        assert_eq!(seen, vec![second, second]);
    }

    #[tokio::test(start_paused = true)]
    async fn disarmed_ticker_is_silent() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut ticker = Ticker::new();
        let generation = ticker.arm(tx, |g| g);
        ticker.disarm();
        assert!(!ticker.is_armed());
        assert!(!ticker.accepts(generation));

        tokio::time::sleep(Duration::from_secs(5)).await;
        assert!(rx.try_recv().is_err());
    }
}
