//! Application layer: the callback pipeline.
//!
//! `FeedbackExtractor` picks the fields of a request, `PaymentReconciler`
//! verifies, classifies and applies them to the stored payment, and
//! `OffsiteGateway` wires both behind the return and notify endpoints.

pub mod classifier;
pub mod extractor;
pub mod gateway;
pub mod reconciler;
