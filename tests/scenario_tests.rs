mod common;

use common::{notification, pairs, setup, stored};
use offsite_feedback::domain::feedback::Feedback;
use offsite_feedback::domain::payment::PaymentState;
use offsite_feedback::error::FeedbackError;

#[tokio::test]
async fn test_notify_success_completes_payment() {
    let (reconciler, store) = setup().await;

    let record = reconciler
        .on_notify(&notification("9", "12345", ""))
        .await
        .unwrap();

    assert_eq!(record.state, PaymentState::Completed);
    assert_eq!(record.remote_id.as_deref(), Some("12345"));
    assert_eq!(record.remote_state.as_deref(), Some("9"));
    assert_eq!(record.authorized_at, Some(common::now()));
    assert_eq!(record.completed_at, Some(common::now()));
    assert_eq!(stored(&store).await, record);
}

#[tokio::test]
async fn test_notify_decline_fails_payment() {
    let (reconciler, store) = setup().await;

    let err = reconciler
        .on_notify(&notification("0", "", "50001111"))
        .await
        .unwrap_err();

    match err {
        FeedbackError::Decline { code } => assert_eq!(code.as_deref(), Some("50001111")),
        other => panic!("expected a decline, got {other:?}"),
    }
    let record = stored(&store).await;
    assert_eq!(record.state, PaymentState::Failed);
    assert_eq!(record.remote_state.as_deref(), Some("0"));
}

#[tokio::test]
async fn test_tampered_signature_fails_payment_but_keeps_trail() {
    let (reconciler, store) = setup().await;

    let mut fields: Vec<(String, String)> = notification("9", "12345", "")
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    let signature = &mut fields.last_mut().unwrap().1;
    let first = if signature.starts_with('0') { "1" } else { "0" };
    signature.replace_range(0..1, first);

    let err = reconciler
        .on_notify(&Feedback::new(fields))
        .await
        .unwrap_err();

    assert!(matches!(err, FeedbackError::InvalidResponse));
    let record = stored(&store).await;
    assert_eq!(record.state, PaymentState::Failed);
    assert_eq!(record.remote_id.as_deref(), Some("12345"));
    assert_eq!(record.remote_state.as_deref(), Some("9"));
    assert!(record.completed_at.is_none());
}

#[tokio::test]
async fn test_unsigned_feedback_is_rejected() {
    let (reconciler, store) = setup().await;
    let feedback = Feedback::new(pairs(&[
        ("PAYMENT_ID", common::PAYMENT_ID),
        ("STATUS", "9"),
        ("PAYID", "1"),
    ]));

    let err = reconciler.on_notify(&feedback).await.unwrap_err();
    assert!(matches!(err, FeedbackError::InvalidResponse));
    assert_eq!(stored(&store).await.state, PaymentState::Failed);
}

#[tokio::test]
async fn test_unknown_payment_is_lookup_failure() {
    let (reconciler, store) = setup().await;
    let feedback = common::signed(&[("PAYMENT_ID", "nope"), ("STATUS", "9")]);

    let err = reconciler.on_notify(&feedback).await.unwrap_err();
    assert!(matches!(err, FeedbackError::LookupFailure(Some(_))));
    // Untouched: create only.
    assert_eq!(stored(&store).await.version, 1);
}
