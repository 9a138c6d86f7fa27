use std::time::Duration;

use tokio::sync::mpsc::{UnboundedReceiver, UnboundedSender, unbounded_channel};
use tracing::{debug, info, warn};

use crate::{
    client::quiz_api_client::QuizApiClient,
    prompt::{builder::build_prompt, models::Settings},
    quiz::{
        countdown::{Countdown, CountdownTick, TICK_PERIOD},
        machine::{QuizEvent, QuizState, reduce},
    },
};

/// Async driver around [`reduce`]. Owns the state and the single live countdown.
pub struct QuizRunner {
    state: QuizState,
    countdown: Option<Countdown>,
    generation: u64,
    ticks_tx: UnboundedSender<CountdownTick>,
    ticks_rx: UnboundedReceiver<CountdownTick>,
    tick_period: Duration,
}

impl QuizRunner {
    pub fn new() -> Self {
        Self::with_tick_period(TICK_PERIOD)
    }

    pub fn with_tick_period(tick_period: Duration) -> Self {
        let (ticks_tx, ticks_rx) = unbounded_channel();

        Self {
            state: QuizState::default(),
            countdown: None,
            generation: 0,
            ticks_tx,
            ticks_rx,
            tick_period,
        }
    }

    pub fn state(&self) -> &QuizState {
        &self.state
    }

    pub fn countdown_question(&self) -> Option<usize> {
        self.countdown.as_ref().map(|c| c.question())
    }

    pub fn dispatch(&mut self, event: QuizEvent) -> &QuizState {
        let state = std::mem::take(&mut self.state);
        self.state = reduce(state, event);
        self.sync_countdown();

        &self.state
    }

    /// Waits for the next tick of the live countdown and applies it. Returns false
    /// when no countdown is running.
    pub async fn next_tick(&mut self) -> bool {
        loop {
            let Some(live) = self.countdown.as_ref().map(|c| c.generation()) else {
                return false;
            };

            let Some(tick) = self.ticks_rx.recv().await else {
                return false;
            };

            // A cancelled task may still deliver one tick after it was aborted.
            if tick.generation != live {
                debug!("Dropping tick from cancelled countdown {}", tick.generation);
                continue;
            }

            self.dispatch(QuizEvent::Tick {
                question: tick.question,
            });
            return true;
        }
    }

    /// Full generation round-trip. `&mut self` keeps a second request from being
    /// issued while one is pending.
    pub async fn generate(
        &mut self,
        api: &QuizApiClient,
        text: &str,
        settings: Settings,
    ) -> &QuizState {
        if text.trim().is_empty() {
            return self.dispatch(QuizEvent::GenerationRejected(
                "Add some content before generating a quiz".into(),
            ));
        }

        let prompt = build_prompt(text, &settings);
        self.dispatch(QuizEvent::GenerationRequested(settings.clone()));
        if !self.state.is_generating() {
            return &self.state;
        }

        info!("Requesting quiz with {} questions", settings.num_questions);
        let event = match api.generate_quiz(&prompt, &settings).await {
            Ok(raw) => QuizEvent::GenerationSucceeded(raw),
            Err(e) => {
                warn!("Generation request failed (retryable: {}): {}", e.is_retryable(), e);
                QuizEvent::GenerationFailed(e.to_string())
            }
        };

        self.dispatch(event)
    }

    fn sync_countdown(&mut self) {
        let target = self.state.countdown_target();
        if self.countdown_question() == target {
            return;
        }

        if let Some(countdown) = self.countdown.take() {
            countdown.cancel();
        }

        if let Some(question) = target {
            self.generation += 1;
            self.countdown = Some(Countdown::start(
                self.generation,
                question,
                self.tick_period,
                self.ticks_tx.clone(),
            ));
        }
    }
}

impl Default for QuizRunner {
    fn default() -> Self {
        Self::new()
    }
}
