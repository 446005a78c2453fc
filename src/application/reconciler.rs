use crate::application::classifier::ResponseClassifier;
use crate::domain::feedback::{Channel, Feedback, PAYID, STATUS};
use crate::domain::outcome::{ClassifiedOutcome, OutcomeKind};
use crate::domain::payment::{PaymentRecord, ReconcilableState, Transition};
use crate::domain::ports::{ClockBox, PaymentStoreBox};
use crate::domain::signature::CallbackVerifiable;
use crate::error::{FeedbackError, Result};
use tracing::Dispatch;
use tracing::instrument::WithSubscriber;

/// Applies verified, classified feedback to the stored payment record.
///
/// Every call first records the remote id and status on the payment and
/// persists it, so even a forged callback leaves a trail. Only the notify
/// channel moves the local state; the return channel is informational.
///
/// The reconciler holds no state between calls and never retries. It relies
/// on the store's versioned `save` to reject concurrent load-mutate-save
/// sequences for the same payment.
pub struct PaymentReconciler {
    store: PaymentStoreBox,
    verifier: Box<dyn CallbackVerifiable>,
    classifier: ResponseClassifier,
    clock: ClockBox,
    dispatch: Option<Dispatch>,
}

impl PaymentReconciler {
    pub fn new(
        store: PaymentStoreBox,
        verifier: Box<dyn CallbackVerifiable>,
        clock: ClockBox,
    ) -> Self {
        Self {
            store,
            verifier,
            classifier: ResponseClassifier::new(),
            clock,
            dispatch: None,
        }
    }

    pub fn with_dispatch(mut self, dispatch: Dispatch) -> Self {
        self.dispatch = Some(dispatch);
        self
    }

    pub async fn on_return(&self, feedback: &Feedback) -> Result<PaymentRecord> {
        self.process(Channel::Return, feedback).await
    }

    pub async fn on_notify(&self, feedback: &Feedback) -> Result<PaymentRecord> {
        self.process(Channel::Notify, feedback).await
    }

    /// Processes one callback and returns the record as persisted.
    ///
    /// Errors are raised only after any failure transition has been saved.
    pub async fn process(&self, channel: Channel, feedback: &Feedback) -> Result<PaymentRecord> {
        let run = self.reconcile(channel, feedback);
        match &self.dispatch {
            Some(dispatch) => run.with_subscriber(dispatch.clone()).await,
            None => run.await,
        }
    }

    async fn reconcile(&self, channel: Channel, feedback: &Feedback) -> Result<PaymentRecord> {
        let payment_id = feedback
            .payment_id()
            .ok_or(FeedbackError::LookupFailure(None))?;
        let mut record = self
            .store
            .load(payment_id)
            .await?
            .ok_or_else(|| FeedbackError::LookupFailure(Some(payment_id.to_string())))?;

        record.record_feedback(feedback.get(PAYID), feedback.get(STATUS));
        self.store.save(&mut record).await?;

        let outcome = if self.verifier.verify(feedback) {
            self.classifier.classify(feedback)
        } else {
            tracing::warn!(%channel, payment_id, "feedback signature mismatch");
            ClassifiedOutcome::invalid(record.remote_id.clone())
        };

        if channel == Channel::Notify {
            let transition = record.apply_outcome(outcome.kind, self.clock.now());
            match transition {
                Transition::Advanced { from, to } => {
                    tracing::info!(payment_id, %from, %to, "payment state advanced");
                }
                Transition::Held(state) if outcome.kind.is_success() => {
                    tracing::warn!(
                        payment_id,
                        %state,
                        outcome = ?outcome.kind,
                        "late success notification ignored"
                    );
                }
                _ => {}
            }
            if transition.is_mutation() {
                self.store.save(&mut record).await?;
            }
        }

        match outcome.kind {
            OutcomeKind::Invalid => Err(FeedbackError::InvalidResponse),
            OutcomeKind::Declined => {
                tracing::info!(
                    %channel,
                    payment_id,
                    error_code = outcome.error_code.as_deref().unwrap_or(""),
                    "payment declined by the gateway"
                );
                Err(FeedbackError::Decline {
                    code: outcome.error_code,
                })
            }
            OutcomeKind::Authorized | OutcomeKind::Completed => Ok(record),
        }
    }
}
