//! Phase state machine for landing → collecting → submitting → results.
//!
//! The machine owns every piece of view state. Consumers read it through
//! accessors and change it only through the transition methods below. It never
//! talks to the network: a submission hands out a [`SubmitTicket`] and the caller
//! reports the outcome back with [`ViewStateMachine::finish_submit`].

use shared::{domain::PreferenceInput, protocol::Recommendation};
use tracing::debug;

use crate::recommend::RecommendationOutcome;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewPhase {
    Landing,
    Collecting,
    Submitting,
    Results,
}

/// Identifies one submission. Outcomes tagged with an older generation are stale.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RequestGeneration(pub u64);

impl RequestGeneration {
    fn next(self) -> Self {
        Self(self.0.wrapping_add(1))
    }
}

#[derive(Debug, Clone)]
pub struct SubmitTicket {
    pub generation: RequestGeneration,
    pub preferences: PreferenceInput,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutcomeDisposition {
    Applied(ViewPhase),
    Stale,
}

#[derive(Debug)]
pub struct ViewStateMachine {
    phase: ViewPhase,
    preferences: PreferenceInput,
    results: Vec<Recommendation>,
    last_failure: Option<String>,
    generation: RequestGeneration,
}

impl ViewStateMachine {
    pub fn new(preferences: PreferenceInput) -> Self {
        Self {
            phase: ViewPhase::Landing,
            preferences,
            results: Vec::new(),
            last_failure: None,
            generation: RequestGeneration::default(),
        }
    }

    pub fn phase(&self) -> ViewPhase {
        self.phase
    }

    pub fn preferences(&self) -> &PreferenceInput {
        &self.preferences
    }

    /// Empty outside of [`ViewPhase::Results`].
    pub fn results(&self) -> &[Recommendation] {
        &self.results
    }

    pub fn last_failure(&self) -> Option<&str> {
        self.last_failure.as_deref()
    }

    pub fn generation(&self) -> RequestGeneration {
        self.generation
    }

    pub fn is_in_flight(&self) -> bool {
        self.phase == ViewPhase::Submitting
    }

    pub fn start(&mut self) -> bool {
        if self.phase != ViewPhase::Landing {
            return false;
        }
        self.transition(ViewPhase::Collecting);
        true
    }

    pub fn replace_preferences(&mut self, preferences: PreferenceInput) {
        self.preferences = preferences;
    }

    /// Moves Collecting → Submitting. Returns `None` in any other phase, which
    /// covers a second submit while a request is still pending.
    pub fn begin_submit(&mut self) -> Option<SubmitTicket> {
        if self.phase != ViewPhase::Collecting {
            debug!(phase = ?self.phase, "submit ignored");
            return None;
        }

        self.generation = self.generation.next();
        self.last_failure = None;
        self.transition(ViewPhase::Submitting);

        Some(SubmitTicket {
            generation: self.generation,
            preferences: self.preferences.clone(),
        })
    }

    pub fn finish_submit(
        &mut self,
        generation: RequestGeneration,
        outcome: RecommendationOutcome,
    ) -> OutcomeDisposition {
        if self.phase != ViewPhase::Submitting || generation != self.generation {
            debug!(
                generation = generation.0,
                current = self.generation.0,
                phase = ?self.phase,
                "discarding stale recommendation outcome"
            );
            return OutcomeDisposition::Stale;
        }

        match outcome {
            Ok(results) => {
                debug!(generation = generation.0, count = results.len(), "recommendations applied");
                self.results = results;
                self.transition(ViewPhase::Results);
            }
            Err(err) => {
                self.last_failure = Some(err.user_message());
                self.transition(ViewPhase::Collecting);
            }
        }
        OutcomeDisposition::Applied(self.phase)
    }

    /// Back to Landing from any phase. Results are dropped and any pending
    /// submission becomes stale; preferences are left alone.
    pub fn reset(&mut self) {
        self.generation = self.generation.next();
        self.results.clear();
        self.last_failure = None;
        self.transition(ViewPhase::Landing);
    }

    fn transition(&mut self, to: ViewPhase) {
        debug!(from = ?self.phase, to = ?to, "view phase transition");
        self.phase = to;
    }
}

#[cfg(test)]
#[path = "tests/flow_tests.rs"]
mod tests;
