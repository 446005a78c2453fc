use crate::domain::feedback::{CallbackRequest, Channel, Feedback, HttpMethod};
use tracing::Dispatch;

/// Picks the authoritative parameter set of a callback.
///
/// POST requests carry their fields in the body, anything else in the query
/// string. The two sources are never merged and nothing is normalized.
#[derive(Debug, Clone, Default)]
pub struct FeedbackExtractor {
    log_feedback: bool,
    dispatch: Option<Dispatch>,
}

impl FeedbackExtractor {
    pub fn new(log_feedback: bool) -> Self {
        Self {
            log_feedback,
            dispatch: None,
        }
    }

    /// Routes the raw feedback log to `dispatch` instead of the global subscriber.
    pub fn with_dispatch(mut self, dispatch: Dispatch) -> Self {
        self.dispatch = Some(dispatch);
        self
    }

    pub fn extract(&self, channel: Channel, request: &CallbackRequest) -> Feedback {
        let source = match request.method {
            HttpMethod::Post => &request.body,
            HttpMethod::Get | HttpMethod::Other => &request.query,
        };
        let feedback = Feedback::new(source.clone());

        if self.log_feedback {
            match &self.dispatch {
                Some(dispatch) => {
                    tracing::dispatcher::with_default(dispatch, || log_feedback(channel, &feedback))
                }
                None => log_feedback(channel, &feedback),
            }
        }

        feedback
    }
}

// The signature field stays in the log: rejected callbacks must be auditable.
fn log_feedback(channel: Channel, feedback: &Feedback) {
    let fields: Vec<(&str, &str)> = feedback.iter().collect();
    tracing::debug!(%channel, ?fields, "processor feedback received");
}
