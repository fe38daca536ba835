// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Command error taxonomy.

use deck_adapters::TransportError;
use deck_core::{Action, AgentId, AgentStatus};
use deck_wire::reason;
use thiserror::Error;

/// Why a command did not succeed.
///
/// None of these leave a mark on the registry.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CommandError {
    #[error("cannot {action} agent {id} while it is {status}")]
    InvalidTransition { id: AgentId, status: AgentStatus, action: Action },

    #[error("launch rejected: {0}")]
    LaunchRejected(String),

    #[error("agent not found: {0}")]
    NotFound(AgentId),

    /// Backend refusal with a reason the client has no dedicated variant for
    #[error("rejected ({reason}): {message}")]
    Rejected { reason: String, message: String },

    #[error(transparent)]
    Transport(TransportError),
}

impl CommandError {
    /// The command may or may not have taken effect; the next sync settles it
    pub fn is_outcome_unknown(&self) -> bool {
        matches!(self, Self::Transport(e) if !e.is_rejection())
    }

    /// Classify a transport failure of `action` against `id`, last seen in `status`
    pub(crate) fn from_transport(
        err: TransportError,
        id: &AgentId,
        status: AgentStatus,
        action: Action,
    ) -> Self {
        match err {
            TransportError::Rejected { reason: why, .. } if why == reason::INVALID_TRANSITION => {
                Self::InvalidTransition { id: id.clone(), status, action }
            }
            TransportError::NotFound(_) => Self::NotFound(id.clone()),
            other => Self::from(other),
        }
    }

    /// Classify a transport failure of a launch
    pub(crate) fn from_launch(err: TransportError) -> Self {
        match err {
            TransportError::Rejected { reason: why, message }
                if why == reason::LAUNCH_REJECTED
                    || why == reason::INVALID_PROJECT
                    || why == reason::VALIDATION =>
            {
                Self::LaunchRejected(if message.is_empty() { why } else { message })
            }
            other => Self::from(other),
        }
    }
}

impl From<TransportError> for CommandError {
    fn from(err: TransportError) -> Self {
        match err {
            TransportError::Rejected { reason, message } => Self::Rejected { reason, message },
            other => Self::Transport(other),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn id() -> AgentId {
        AgentId::new("agt-1")
    }

    #[test]
    fn backend_invalid_transition_keeps_context() {
        let err = CommandError::from_transport(
            TransportError::rejected("invalid_transition", "already done"),
            &id(),
            AgentStatus::Running,
            Action::Pause,
        );
        assert_eq!(
            err,
            CommandError::InvalidTransition {
                id: id(),
                status: AgentStatus::Running,
                action: Action::Pause
            }
        );
        assert!(!err.is_outcome_unknown());
    }

    #[yare::parameterized(
        invalid_project = { "invalid_project", "no such project", "no such project" },
        validation      = { "validation",      "",                "validation" },
        launch_rejected = { "launch_rejected", "quota",           "quota" },
    )]
    fn launch_refusals_become_launch_rejected(reason: &str, message: &str, expected: &str) {
        let err = CommandError::from_launch(TransportError::rejected(reason, message));
        assert_eq!(err, CommandError::LaunchRejected(expected.to_string()));
    }

    #[test]
    fn unmapped_reason_stays_rejected() {
        let err = CommandError::from(TransportError::rejected("quota_exceeded", "slow down"));
        assert_eq!(
            err,
            CommandError::Rejected { reason: "quota_exceeded".into(), message: "slow down".into() }
        );
        assert!(!err.is_outcome_unknown());
    }

    #[yare::parameterized(
        connection = { TransportError::Connection("refused".into()), true },
        timeout    = { TransportError::Timeout,                      true },
        protocol   = { TransportError::Protocol("garbage".into()),   true },
        not_found  = { TransportError::NotFound("agt-1".into()),     false },
    )]
    fn only_unanswered_failures_leave_outcome_unknown(err: TransportError, unknown: bool) {
        assert_eq!(CommandError::from(err).is_outcome_unknown(), unknown);
    }

    #[test]
    fn message_names_action_and_status() {
        let err = CommandError::InvalidTransition {
            id: id(),
            status: AgentStatus::Completed,
            action: Action::Pause,
        };
        assert_eq!(err.to_string(), "cannot pause agent agt-1 while it is completed");
    }
}
