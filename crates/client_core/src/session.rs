//! Event-driven orchestration of the recommendation flow.
//!
//! The session owns the state machine and the preference store. Network work is
//! spawned onto the tokio runtime and its outcome comes back as a
//! [`SessionEvent`], which the caller feeds into [`RecommendationSession::apply`]
//! from its own event loop.

use std::sync::Arc;

use shared::domain::{PreferenceInput, PreferenceUpdate};
use tokio::sync::mpsc;
use tracing::{debug, error, info, warn};

use crate::{
    flow::{OutcomeDisposition, RequestGeneration, SubmitTicket, ViewPhase, ViewStateMachine},
    preferences::PreferenceStore,
    presenter::{self, ResultRow},
    error::RecommendError,
    recommend::{RecommendationOutcome, RecommendationService},
};

#[derive(Debug)]
pub enum SessionEvent {
    RecommendationsFinished {
        generation: RequestGeneration,
        outcome: RecommendationOutcome,
    },
}

pub struct RecommendationSession {
    machine: ViewStateMachine,
    store: PreferenceStore,
    service: Arc<dyn RecommendationService>,
    result_count: u32,
    events_tx: mpsc::UnboundedSender<SessionEvent>,
    events_rx: mpsc::UnboundedReceiver<SessionEvent>,
}

impl RecommendationSession {
    /// Starts on the landing phase with whatever preferences were saved last time.
    pub async fn open(
        store: PreferenceStore,
        service: Arc<dyn RecommendationService>,
        result_count: u32,
    ) -> Self {
        let preferences = store.load().await;
        let (events_tx, events_rx) = mpsc::unbounded_channel();
        Self {
            machine: ViewStateMachine::new(preferences),
            store,
            service,
            result_count,
            events_tx,
            events_rx,
        }
    }

    pub fn machine(&self) -> &ViewStateMachine {
        &self.machine
    }

    pub fn phase(&self) -> ViewPhase {
        self.machine.phase()
    }

    pub fn preferences(&self) -> &PreferenceInput {
        self.machine.preferences()
    }

    pub fn start(&mut self) -> bool {
        self.machine.start()
    }

    /// Applies one field change and persists the whole snapshot. A failed save is
    /// logged; the in-memory value still holds for this session.
    pub async fn update(&mut self, update: PreferenceUpdate) -> &PreferenceInput {
        let field = update.field_name();
        let next = PreferenceStore::update(self.machine.preferences(), update);
        self.machine.replace_preferences(next);

        if let Err(err) = self.store.save(self.machine.preferences()).await {
            warn!(field, "failed to save preferences: {err}");
        }
        self.machine.preferences()
    }

    pub async fn clear_saved_preferences(&mut self) -> &PreferenceInput {
        match self.store.clear().await {
            Ok(defaults) => self.machine.replace_preferences(defaults),
            Err(err) => warn!("failed to clear saved preferences: {err}"),
        }
        self.machine.preferences()
    }

    /// Sends the current preferences unless a request is already pending.
    /// Returns whether a request was started.
    pub fn submit(&mut self) -> bool {
        let Some(ticket) = self.machine.begin_submit() else {
            return false;
        };

        let service = Arc::clone(&self.service);
        let events_tx = self.events_tx.clone();
        let result_count = self.result_count;
        info!(generation = ticket.generation.0, "submitting preferences");

        let SubmitTicket {
            generation,
            preferences,
        } = ticket;
        let request =
            tokio::spawn(async move { service.recommend(&preferences, result_count).await });

        // Every submission reports back, even when the request task panics.
        tokio::spawn(async move {
            let outcome = request.await.unwrap_or_else(|err| {
                error!(generation = generation.0, "recommendation task failed: {err}");
                Err(RecommendError::Interrupted(err))
            });
            let event = SessionEvent::RecommendationsFinished {
                generation,
                outcome,
            };
            if events_tx.send(event).is_err() {
                debug!(generation = generation.0, "session closed before outcome arrived");
            }
        });
        true
    }

    pub async fn next_event(&mut self) -> Option<SessionEvent> {
        self.events_rx.recv().await
    }

    pub fn apply(&mut self, event: SessionEvent) -> OutcomeDisposition {
        match event {
            SessionEvent::RecommendationsFinished {
                generation,
                outcome,
            } => self.machine.finish_submit(generation, outcome),
        }
    }

    /// Submits and waits until the outcome for this submission has been applied,
    /// discarding stale events along the way. `None` if the submit was ignored.
    pub async fn run_submission(&mut self) -> Option<ViewPhase> {
        if !self.submit() {
            return None;
        }

        while let Some(event) = self.next_event().await {
            if let OutcomeDisposition::Applied(phase) = self.apply(event) {
                return Some(phase);
            }
        }
        None
    }

    pub fn reset(&mut self) {
        self.machine.reset();
    }

    pub fn rows(&self) -> Vec<ResultRow> {
        presenter::present(self.machine.results())
    }
}

#[cfg(test)]
#[path = "tests/session_tests.rs"]
mod tests;
