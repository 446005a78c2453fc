use crate::domain::feedback::{Feedback, NCERROR, PAYID, STATUS};
use crate::domain::outcome::{
    ClassifiedOutcome, OutcomeKind, STATUS_AUTHORISED, SUCCESS_STATUSES,
};

/// Maps a verified feedback to a closed outcome.
///
/// Only call this after the signature verified; unverified feedback is
/// rejected as `Invalid` by the reconciler without being classified.
#[derive(Debug, Clone, Copy, Default)]
pub struct ResponseClassifier;

impl ResponseClassifier {
    pub fn new() -> Self {
        Self
    }

    pub fn classify(&self, feedback: &Feedback) -> ClassifiedOutcome {
        let remote_id = feedback.non_empty(PAYID).map(str::to_string);

        let Some(status) = feedback.get(STATUS) else {
            return ClassifiedOutcome {
                kind: OutcomeKind::Declined,
                remote_id,
                error_code: None,
            };
        };

        if status == STATUS_AUTHORISED {
            ClassifiedOutcome {
                kind: OutcomeKind::Authorized,
                remote_id,
                error_code: None,
            }
        } else if SUCCESS_STATUSES.contains(&status) {
            ClassifiedOutcome {
                kind: OutcomeKind::Completed,
                remote_id,
                error_code: None,
            }
        } else {
            ClassifiedOutcome {
                kind: OutcomeKind::Declined,
                remote_id,
                error_code: feedback.non_empty(NCERROR).map(str::to_string),
            }
        }
    }
}
