use std::time::Duration;

use tokio::{
    sync::mpsc::UnboundedSender,
    task::JoinHandle,
    time::{Instant, interval_at},
};
use tracing::debug;

pub const TICK_PERIOD: Duration = Duration::from_secs(1);

/// One tick from a specific countdown. `generation` is unique per started countdown,
/// so ticks from a cancelled task never match its successor, even on the same question.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CountdownTick {
    pub generation: u64,
    pub question: usize,
}

/// Handle to the per-question countdown task. Aborted on `cancel` and on drop.
#[derive(Debug)]
pub struct Countdown {
    generation: u64,
    question: usize,
    handle: JoinHandle<()>,
}

impl Countdown {
    pub fn start(
        generation: u64,
        question: usize,
        period: Duration,
        ticks: UnboundedSender<CountdownTick>,
    ) -> Self {
        let handle = tokio::spawn(async move {
            let mut interval = interval_at(Instant::now() + period, period);
            loop {
                interval.tick().await;
                let tick = CountdownTick {
                    generation,
                    question,
                };
                if ticks.send(tick).is_err() {
                    break;
                }
            }
        });

        debug!(
            "Countdown {} started for question {}",
            generation,
            question + 1
        );
        Self {
            generation,
            question,
            handle,
        }
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn question(&self) -> usize {
        self.question
    }

    pub fn cancel(self) {
        debug!(
            "Countdown {} cancelled for question {}",
            self.generation,
            self.question + 1
        );
        self.handle.abort();
    }
}

impl Drop for Countdown {
    fn drop(&mut self) {
        self.handle.abort();
    }
}
