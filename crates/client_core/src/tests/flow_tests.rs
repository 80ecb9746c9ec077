use super::*;
use crate::error::RecommendError;
use shared::protocol::SongMetadata;

fn drake_preferences() -> PreferenceInput {
    PreferenceInput {
        artist: "Drake".to_string(),
        tempo: 140,
        ..PreferenceInput::default()
    }
}

fn sample_results() -> Vec<Recommendation> {
    vec![Recommendation {
        metadata: SongMetadata {
            song: "One Dance".to_string(),
            artist: "Drake".to_string(),
            genre: "Hip Hop".to_string(),
            length: "02:54".to_string(),
            album: "Views".to_string(),
            release_date: "2016-04-05".to_string(),
            similar_song_1: "Hotline Bling".to_string(),
            similar_song_2: None,
            similar_song_3: None,
        },
        score: 0.91,
    }]
}

fn server_error() -> RecommendError {
    RecommendError::Status {
        status: 500,
        detail: None,
    }
}

fn collecting_machine() -> ViewStateMachine {
    let mut machine = ViewStateMachine::new(drake_preferences());
    assert!(machine.start());
    machine
}

#[test]
fn starts_on_landing_and_start_moves_to_collecting() {
    let mut machine = ViewStateMachine::new(PreferenceInput::default());
    assert_eq!(machine.phase(), ViewPhase::Landing);

    assert!(machine.start());
    assert_eq!(machine.phase(), ViewPhase::Collecting);
    assert!(!machine.start(), "start is only valid from landing");
}

#[test]
fn submit_from_landing_is_ignored() {
    let mut machine = ViewStateMachine::new(PreferenceInput::default());
    assert!(machine.begin_submit().is_none());
    assert_eq!(machine.phase(), ViewPhase::Landing);
}

#[test]
fn ticket_carries_the_current_preferences() {
    let mut machine = collecting_machine();
    let ticket = machine.begin_submit().expect("ticket");

    assert_eq!(machine.phase(), ViewPhase::Submitting);
    assert!(machine.is_in_flight());
    assert_eq!(ticket.preferences, drake_preferences());
    assert_eq!(ticket.generation, machine.generation());
}

#[test]
fn second_submit_while_pending_is_a_no_op() {
    let mut machine = collecting_machine();
    let first = machine.begin_submit().expect("first ticket");

    assert!(machine.begin_submit().is_none());
    assert_eq!(machine.phase(), ViewPhase::Submitting);
    assert_eq!(machine.generation(), first.generation);
}

#[test]
fn success_moves_to_results() {
    let mut machine = collecting_machine();
    let ticket = machine.begin_submit().expect("ticket");

    let disposition = machine.finish_submit(ticket.generation, Ok(sample_results()));

    assert_eq!(disposition, OutcomeDisposition::Applied(ViewPhase::Results));
    assert_eq!(machine.results(), sample_results().as_slice());
}

#[test]
fn empty_success_still_reaches_results() {
    let mut machine = collecting_machine();
    let ticket = machine.begin_submit().expect("ticket");

    machine.finish_submit(ticket.generation, Ok(Vec::new()));

    assert_eq!(machine.phase(), ViewPhase::Results);
    assert!(machine.results().is_empty());
}

#[test]
fn failure_returns_to_collecting_with_input_intact() {
    let mut machine = collecting_machine();
    let ticket = machine.begin_submit().expect("ticket");

    let disposition = machine.finish_submit(ticket.generation, Err(server_error()));

    assert_eq!(disposition, OutcomeDisposition::Applied(ViewPhase::Collecting));
    assert_eq!(machine.preferences(), &drake_preferences());
    assert!(machine.results().is_empty());
    assert!(machine.last_failure().expect("failure message").contains("500"));
}

#[test]
fn retry_after_failure_clears_the_failure_message() {
    let mut machine = collecting_machine();
    let ticket = machine.begin_submit().expect("ticket");
    machine.finish_submit(ticket.generation, Err(server_error()));

    let retry = machine.begin_submit().expect("retry ticket");

    assert!(retry.generation > ticket.generation);
    assert_eq!(machine.last_failure(), None);
}

#[test]
fn reset_discards_results_but_keeps_preferences() {
    let mut machine = collecting_machine();
    let ticket = machine.begin_submit().expect("ticket");
    machine.finish_submit(ticket.generation, Ok(sample_results()));

    machine.reset();

    assert_eq!(machine.phase(), ViewPhase::Landing);
    assert!(machine.results().is_empty());
    assert_eq!(machine.preferences(), &drake_preferences());
    assert!(machine.start());
}

#[test]
fn outcome_arriving_after_reset_is_stale() {
    let mut machine = collecting_machine();
    let ticket = machine.begin_submit().expect("ticket");

    machine.reset();
    let disposition = machine.finish_submit(ticket.generation, Ok(sample_results()));

    assert_eq!(disposition, OutcomeDisposition::Stale);
    assert_eq!(machine.phase(), ViewPhase::Landing);
    assert!(machine.results().is_empty());
}

#[test]
fn old_outcome_cannot_complete_a_newer_submission() {
    let mut machine = collecting_machine();
    let old = machine.begin_submit().expect("old ticket");
    machine.reset();
    machine.start();
    let current = machine.begin_submit().expect("current ticket");

    assert_eq!(
        machine.finish_submit(old.generation, Ok(sample_results())),
        OutcomeDisposition::Stale
    );
    assert_eq!(machine.phase(), ViewPhase::Submitting);

    assert_eq!(
        machine.finish_submit(current.generation, Ok(Vec::new())),
        OutcomeDisposition::Applied(ViewPhase::Results)
    );
}

#[test]
fn outcome_without_pending_submission_is_stale() {
    let mut machine = collecting_machine();
    assert_eq!(
        machine.finish_submit(machine.generation(), Ok(sample_results())),
        OutcomeDisposition::Stale
    );
    assert_eq!(machine.phase(), ViewPhase::Collecting);
}
