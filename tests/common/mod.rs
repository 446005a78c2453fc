#![allow(dead_code)]

use chrono::{DateTime, TimeZone, Utc};
use offsite_feedback::application::reconciler::PaymentReconciler;
use offsite_feedback::domain::feedback::{Feedback, SHASIGN};
use offsite_feedback::domain::payment::{PaymentRecord, PaymentState};
use offsite_feedback::domain::ports::PaymentStore;
use offsite_feedback::domain::signature::{AllParametersComposer, HashAlgorithm, Passphrase};
use offsite_feedback::infrastructure::clock::FixedClock;
use offsite_feedback::infrastructure::in_memory::InMemoryPaymentStore;

pub const SECRET: &str = "Mysecretsig1875!?";
pub const PAYMENT_ID: &str = "1001";

pub fn composer(algorithm: HashAlgorithm) -> AllParametersComposer {
    AllParametersComposer::new(Passphrase::new(SECRET), algorithm)
}

pub fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 3, 14, 15, 9, 26).unwrap()
}

pub fn pairs(items: &[(&str, &str)]) -> Vec<(String, String)> {
    items
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

/// Appends the processor's SHASIGN (uppercase hex, as the processor sends it).
pub fn sign_pairs(mut fields: Vec<(String, String)>, algorithm: HashAlgorithm) -> Vec<(String, String)> {
    let signature = composer(algorithm).sign(&Feedback::new(fields.clone()));
    fields.push((SHASIGN.to_string(), signature.to_uppercase()));
    fields
}

pub fn signed(items: &[(&str, &str)]) -> Feedback {
    Feedback::new(sign_pairs(pairs(items), HashAlgorithm::Sha512))
}

/// Echoed order fields plus the given status/error, correlated to `PAYMENT_ID`.
pub fn notification(status: &str, payid: &str, ncerror: &str) -> Feedback {
    signed(&[
        ("orderID", "ORD-1001"),
        ("currency", "EUR"),
        ("amount", "49.99"),
        ("PM", "CreditCard"),
        ("BRAND", "VISA"),
        ("PAYMENT_ID", PAYMENT_ID),
        ("STATUS", status),
        ("PAYID", payid),
        ("NCERROR", ncerror),
    ])
}

pub async fn setup_with(state: PaymentState) -> (PaymentReconciler, InMemoryPaymentStore) {
    let store = InMemoryPaymentStore::new();
    let mut record = PaymentRecord::new(PAYMENT_ID);
    record.state = state;
    store.create(record).await.unwrap();
    let reconciler = PaymentReconciler::new(
        Box::new(store.clone()),
        Box::new(composer(HashAlgorithm::Sha512)),
        Box::new(FixedClock::new(now())),
    );
    (reconciler, store)
}

pub async fn setup() -> (PaymentReconciler, InMemoryPaymentStore) {
    setup_with(PaymentState::Pending).await
}

pub async fn stored(store: &InMemoryPaymentStore) -> PaymentRecord {
    store.load(PAYMENT_ID).await.unwrap().unwrap()
}
