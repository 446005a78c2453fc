use super::outcome::OutcomeKind;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Serialize, Deserialize, PartialEq, Eq, Clone, Copy, Default)]
#[serde(rename_all = "lowercase")]
pub enum PaymentState {
    #[default]
    Pending,
    Authorization,
    Completed,
    Failed,
}

impl fmt::Display for PaymentState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PaymentState::Pending => "pending",
            PaymentState::Authorization => "authorization",
            PaymentState::Completed => "completed",
            PaymentState::Failed => "failed",
        };
        f.write_str(name)
    }
}

/// A payment tracked locally while the buyer pays off-site.
///
/// Created by the storage collaborator before the redirect and mutated only
/// through [`ReconcilableState`].
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq, Clone)]
pub struct PaymentRecord {
    pub payment_id: String,
    /// The processor's transaction id (`PAYID`) from the last feedback.
    pub remote_id: Option<String>,
    /// The processor's raw status from the last feedback.
    pub remote_state: Option<String>,
    pub state: PaymentState,
    pub authorized_at: Option<DateTime<Utc>>,
    pub completed_at: Option<DateTime<Utc>>,
    /// Optimistic concurrency counter, bumped by the store on every save.
    #[serde(default)]
    pub version: u64,
}

impl PaymentRecord {
    pub fn new(payment_id: impl Into<String>) -> Self {
        Self {
            payment_id: payment_id.into(),
            remote_id: None,
            remote_state: None,
            state: PaymentState::Pending,
            authorized_at: None,
            completed_at: None,
            version: 0,
        }
    }
}

/// What applying an outcome did to the local state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    /// The state moved.
    Advanced {
        from: PaymentState,
        to: PaymentState,
    },
    /// Same state re-applied; timestamps were overwritten.
    Refreshed(PaymentState),
    /// Nothing changed.
    Held(PaymentState),
}

impl Transition {
    pub fn is_mutation(self) -> bool {
        !matches!(self, Transition::Held(_))
    }

    pub fn state(self) -> PaymentState {
        match self {
            Transition::Advanced { to, .. } => to,
            Transition::Refreshed(state) | Transition::Held(state) => state,
        }
    }
}

/// Capability of a record to absorb callback outcomes.
///
/// Implementations must be safe to apply redundantly and in any order:
/// `completed` and `failed` are never left, and `authorization` only moves
/// forward to `completed`.
pub trait ReconcilableState {
    fn record_feedback(&mut self, remote_id: Option<&str>, remote_state: Option<&str>);

    fn apply_outcome(&mut self, outcome: OutcomeKind, at: DateTime<Utc>) -> Transition;
}

impl ReconcilableState for PaymentRecord {
    fn record_feedback(&mut self, remote_id: Option<&str>, remote_state: Option<&str>) {
        self.remote_id = remote_id.map(str::to_string);
        self.remote_state = remote_state.map(str::to_string);
    }

    fn apply_outcome(&mut self, outcome: OutcomeKind, at: DateTime<Utc>) -> Transition {
        let from = self.state;
        match (outcome, from) {
            (OutcomeKind::Invalid | OutcomeKind::Declined, PaymentState::Pending) => {
                self.state = PaymentState::Failed;
            }
            (OutcomeKind::Authorized, PaymentState::Pending | PaymentState::Authorization) => {
                self.state = PaymentState::Authorization;
                self.authorized_at = Some(at);
            }
            (
                OutcomeKind::Completed,
                PaymentState::Pending | PaymentState::Authorization | PaymentState::Completed,
            ) => {
                self.state = PaymentState::Completed;
                self.authorized_at = Some(at);
                self.completed_at = Some(at);
            }
            _ => return Transition::Held(from),
        }

        if self.state == from {
            Transition::Refreshed(from)
        } else {
            Transition::Advanced {
                from,
                to: self.state,
            }
        }
    }
}
