// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use AgentStatus::*;

#[yare::parameterized(
    queued_to_running    = { Queued,  Running },
    queued_to_paused     = { Queued,  Paused },
    queued_to_failed     = { Queued,  Failed },
    running_to_paused    = { Running, Paused },
    running_to_completed = { Running, Completed },
    running_to_failed    = { Running, Failed },
    paused_to_running    = { Paused,  Running },
    paused_to_failed     = { Paused,  Failed },
)]
fn forward_transitions_allowed(from: AgentStatus, to: AgentStatus) {
    assert!(from.can_transition_to(to), "{from} -> {to} should be allowed");
}

#[yare::parameterized(
    running_to_queued   = { Running,   Queued },
    paused_to_queued    = { Paused,    Queued },
    paused_to_completed = { Paused,    Completed },
    completed_to_running = { Completed, Running },
    completed_to_failed = { Completed, Failed },
    failed_to_running   = { Failed,    Running },
    failed_to_queued    = { Failed,    Queued },
    same_status         = { Running,   Running },
)]
fn backward_or_terminal_transitions_rejected(from: AgentStatus, to: AgentStatus) {
    assert!(!from.can_transition_to(to), "{from} -> {to} should be rejected");
}

#[yare::parameterized(
    paused_to_completed = { Paused,    Completed, true },
    queued_to_completed = { Queued,    Completed, true },
    running_to_paused   = { Running,   Paused,    true },
    running_to_queued   = { Running,   Queued,    false },
    same_status         = { Paused,    Paused,    false },
    completed_to_failed = { Completed, Failed,    false },
)]
fn reachability_allows_skipped_states(from: AgentStatus, to: AgentStatus, reachable: bool) {
    assert_eq!(from.can_reach(to), reachable, "{from} ->* {to}");
}

#[test]
fn every_direct_transition_is_reachable() {
    for from in AgentStatus::ALL {
        for to in AgentStatus::ALL {
            if from.can_transition_to(to) {
                assert!(from.can_reach(to), "{from} -> {to}");
            }
        }
    }
}

#[test]
fn terminal_statuses_are_absorbing() {
    for from in [Completed, Failed] {
        assert!(from.is_terminal());
        for to in AgentStatus::ALL {
            assert!(!from.can_transition_to(to));
        }
    }
}

#[yare::parameterized(
    pause_running      = { Running,   Action::Pause,     true },
    pause_paused       = { Paused,    Action::Pause,     false },
    pause_completed    = { Completed, Action::Pause,     false },
    resume_paused      = { Paused,    Action::Resume,    true },
    resume_running     = { Running,   Action::Resume,    false },
    cancel_queued      = { Queued,    Action::Cancel,    true },
    cancel_paused      = { Paused,    Action::Cancel,    true },
    cancel_failed      = { Failed,    Action::Cancel,    false },
    delete_completed   = { Completed, Action::Delete,    true },
    delete_failed      = { Failed,    Action::Delete,    true },
    delete_running     = { Running,   Action::Delete,    false },
    intervene_running  = { Running,   Action::Intervene, true },
    intervene_queued   = { Queued,    Action::Intervene, false },
)]
fn command_permissions(status: AgentStatus, action: Action, allowed: bool) {
    assert_eq!(status.permits(action), allowed);
}

#[test]
fn status_parses_from_display() {
    for status in AgentStatus::ALL {
        assert_eq!(status.to_string().parse::<AgentStatus>().unwrap(), status);
    }
    assert_eq!(" Done ".parse::<AgentStatus>().unwrap(), Completed);
    assert_eq!("bogus".parse::<AgentStatus>(), Err(UnknownStatus("bogus".to_string())));
}

#[test]
fn status_serializes_snake_case() {
    assert_eq!(serde_json::to_string(&Running).unwrap(), "\"running\"");
    assert_eq!(serde_json::to_string(&Action::Intervene).unwrap(), "\"intervene\"");
}
