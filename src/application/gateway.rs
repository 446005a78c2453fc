use crate::application::extractor::FeedbackExtractor;
use crate::application::reconciler::PaymentReconciler;
use crate::config::GatewayConfig;
use crate::domain::feedback::{CallbackRequest, Channel};
use crate::domain::payment::{PaymentRecord, PaymentState};
use crate::domain::ports::{ClockBox, PaymentStoreBox};
use crate::domain::signature::AllParametersComposer;
use crate::error::Result;
use serde::Serialize;
use tracing::Dispatch;

/// Off-site gateway callback endpoints: the buyer's return and the
/// processor's notification.
pub struct OffsiteGateway {
    extractor: FeedbackExtractor,
    reconciler: PaymentReconciler,
}

impl OffsiteGateway {
    pub fn new(extractor: FeedbackExtractor, reconciler: PaymentReconciler) -> Self {
        Self {
            extractor,
            reconciler,
        }
    }

    pub fn from_config(config: &GatewayConfig, store: PaymentStoreBox, clock: ClockBox) -> Self {
        let composer = AllParametersComposer::new(config.sha_out.clone(), config.sha_algorithm);
        Self::new(
            FeedbackExtractor::new(config.log_feedback),
            PaymentReconciler::new(store, Box::new(composer), clock),
        )
    }

    /// Sends every log line of both stages to `dispatch`.
    pub fn with_dispatch(self, dispatch: Dispatch) -> Self {
        Self {
            extractor: self.extractor.with_dispatch(dispatch.clone()),
            reconciler: self.reconciler.with_dispatch(dispatch),
        }
    }

    pub async fn on_return(&self, request: &CallbackRequest) -> Result<PaymentRecord> {
        self.handle(Channel::Return, request).await
    }

    pub async fn on_notify(&self, request: &CallbackRequest) -> Result<PaymentRecord> {
        self.handle(Channel::Notify, request).await
    }

    pub async fn handle(&self, channel: Channel, request: &CallbackRequest) -> Result<PaymentRecord> {
        let feedback = self.extractor.extract(channel, request);
        self.reconciler.process(channel, &feedback).await
    }
}

/// What the buyer sees after returning from the processor.
///
/// A verified success is confirmed unless the record has already failed.
/// Everything else renders the same page; the notification decides the outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ReturnPage {
    Confirmed,
    Processing,
}

impl ReturnPage {
    pub fn for_result(result: &Result<PaymentRecord>) -> Self {
        match result {
            Ok(record) if record.state != PaymentState::Failed => ReturnPage::Confirmed,
            _ => ReturnPage::Processing,
        }
    }

    pub fn message(self) -> &'static str {
        match self {
            ReturnPage::Confirmed => "Thank you, your payment has been received.",
            ReturnPage::Processing => {
                "Your payment is being processed. You will receive a confirmation shortly."
            }
        }
    }
}

/// Acknowledgement returned to the processor on the notify channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "ack", rename_all = "lowercase")]
pub enum NotifyAck {
    Accepted,
    Rejected { redeliver: bool },
}

impl NotifyAck {
    pub fn for_result(result: &Result<PaymentRecord>) -> Self {
        match result {
            Ok(_) => NotifyAck::Accepted,
            Err(err) => NotifyAck::Rejected {
                redeliver: err.is_redeliverable(),
            },
        }
    }
}
