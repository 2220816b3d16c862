// End-to-end verification against a local stand-in for the Khalti API
//
// Covers both verification flows, the outbound request shape, error
// classification and the transport-only retry.

#[path = "../helpers/mod.rs"]
mod helpers;

use std::time::{Duration, Instant};

use helpers::*;
use khalti_gateway::core::{AppError, Currency};
use khalti_gateway::gateways::{GatewaySettings, KhaltiApi, PaymentGateway};
use khalti_gateway::transactions::models::ReturnQuery;
use khalti_gateway::transactions::{InvoiceRef, NormalizedTransaction, TransactionStatus};
use rust_decimal::Decimal;
use serde_json::json;
use std::str::FromStr;
use wiremock::matchers::{any, body_string, header, method, path};
use wiremock::{Mock, ResponseTemplate};

#[tokio::test]
async fn test_completed_push_is_approved() {
    let processor = MockProcessor::start().await;
    processor
        .on_verify(200, verification_response("Completed"), 1)
        .await;

    let transaction = processor
        .gateway()
        .verify_push(&test_settings(), &push_body())
        .await
        .expect("push verifies");

    assert_eq!(
        transaction,
        NormalizedTransaction {
            client_id: "42".to_string(),
            amount: "50.00".to_string(),
            currency: Currency::NPR,
            status: TransactionStatus::Approved,
            transaction_id: "txn_1".to_string(),
            invoices: vec![InvoiceRef::new("7", Decimal::from_str("50.00").unwrap())],
            message: None,
        }
    );
}

#[tokio::test]
async fn test_refunded_push_is_declined() {
    let processor = MockProcessor::start().await;
    processor
        .on_verify(200, verification_response("Refunded"), 1)
        .await;

    let transaction = processor
        .gateway()
        .verify_push(&test_settings(), &push_body())
        .await
        .expect("push verifies");

    assert_eq!(transaction.status, TransactionStatus::Declined);
    assert_eq!(transaction.transaction_id, "txn_1");
    assert_eq!(transaction.amount, "50.00");
}

#[tokio::test]
async fn test_verify_request_is_form_encoded_with_key_auth() {
    let processor = MockProcessor::start().await;
    Mock::given(method("POST"))
        .and(path(VERIFY_PATH))
        .and(header("Authorization", "Key sk_test"))
        .and(body_string("token=tkn1&amount=5000"))
        .respond_with(ResponseTemplate::new(200).set_body_json(verification_response("Completed")))
        .expect(1)
        .mount(&processor.server)
        .await;

    let result = processor
        .client()
        .verify_token(&test_settings(), "tkn1", 5000)
        .await
        .expect("verify succeeds");

    assert_eq!(result.idx, "txn_1");
    assert_eq!(result.state_name(), Some("Completed"));
}

#[tokio::test]
async fn test_return_looks_up_transaction_by_idx() {
    let processor = MockProcessor::start().await;
    processor
        .on_lookup("txn_1", 200, verification_response("Completed"), 1)
        .await;

    let query = ReturnQuery {
        idx: "txn_1".to_string(),
        client_id: Some("42".to_string()),
    };
    let transaction = processor
        .gateway()
        .verify_return(&test_settings(), &query)
        .await
        .expect("return verifies");

    assert_eq!(transaction.status, TransactionStatus::Approved);
    assert_eq!(transaction.client_id, "42");
    assert_eq!(transaction.amount, "50.00");
    assert_eq!(transaction.transaction_id, "txn_1");
}

#[tokio::test]
async fn test_invalid_idx_is_rejected_without_calling_out() {
    let processor = MockProcessor::start().await;
    Mock::given(any())
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&processor.server)
        .await;

    let err = processor
        .client()
        .lookup_transaction(&test_settings(), "../admin")
        .await
        .unwrap_err();

    assert!(matches!(err, AppError::Validation(_)));
}

#[tokio::test]
async fn test_detail_payload_is_processor_declined() {
    let processor = MockProcessor::start().await;
    processor
        .on_verify(401, json!({ "detail": "Invalid token." }), 1)
        .await;

    let err = processor
        .client()
        .verify_token(&test_settings(), "tkn1", 5000)
        .await
        .unwrap_err();

    match err {
        AppError::ProcessorDeclined(detail) => assert_eq!(detail, "Invalid token."),
        other => panic!("expected ProcessorDeclined, got {:?}", other),
    }
}

#[tokio::test]
async fn test_error_key_payload_is_processor_declined() {
    let processor = MockProcessor::start().await;
    processor
        .on_verify(
            400,
            json!({ "error_key": "validation_error", "amount": ["Amount mismatch."] }),
            1,
        )
        .await;

    let err = processor
        .client()
        .verify_token(&test_settings(), "tkn1", 5000)
        .await
        .unwrap_err();

    match err {
        AppError::ProcessorDeclined(reason) => assert!(reason.starts_with("validation_error")),
        other => panic!("expected ProcessorDeclined, got {:?}", other),
    }
}

#[tokio::test]
async fn test_server_error_is_unreachable_and_not_retried() {
    let processor = MockProcessor::start().await;
    Mock::given(method("POST"))
        .and(path(VERIFY_PATH))
        .respond_with(ResponseTemplate::new(500).set_body_string("upstream down"))
        .expect(1)
        .mount(&processor.server)
        .await;

    let err = processor
        .client()
        .verify_token(&test_settings(), "tkn1", 5000)
        .await
        .unwrap_err();

    assert!(matches!(err, AppError::VerificationUnreachable(_)));
}

#[tokio::test]
async fn test_non_json_success_is_malformed() {
    let processor = MockProcessor::start().await;
    Mock::given(method("POST"))
        .and(path(VERIFY_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>ok</html>"))
        .expect(1)
        .mount(&processor.server)
        .await;

    let err = processor
        .client()
        .verify_token(&test_settings(), "tkn1", 5000)
        .await
        .unwrap_err();

    assert!(matches!(err, AppError::VerificationMalformedResponse(_)));
}

#[tokio::test]
async fn test_timeout_is_retried_once_within_the_deadline() {
    let processor = MockProcessor::start().await;
    Mock::given(method("POST"))
        .and(path(VERIFY_PATH))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(verification_response("Completed"))
                .set_delay(Duration::from_secs(10)),
        )
        .expect(2)
        .mount(&processor.server)
        .await;

    let started = Instant::now();
    let err = processor
        .client_with_timeout(Duration::from_secs(1))
        .verify_token(&test_settings(), "tkn1", 5000)
        .await
        .unwrap_err();

    assert!(matches!(err, AppError::VerificationUnreachable(_)));
    assert!(
        started.elapsed() < Duration::from_secs(3),
        "verification outlived its deadline: {:?}",
        started.elapsed()
    );
}

#[tokio::test]
async fn test_unreachable_push_is_reported_as_declined() {
    let processor = MockProcessor::start().await;
    Mock::given(method("POST"))
        .and(path(VERIFY_PATH))
        .respond_with(ResponseTemplate::new(503))
        .expect(1)
        .mount(&processor.server)
        .await;

    let body = json!({
        "token": "tkn1",
        "amount": 5000,
        "merchant_client": "42",
        "merchant_invoice": "7=50.00"
    })
    .to_string();

    let transaction = processor
        .gateway()
        .verify_push(&test_settings(), &body)
        .await
        .expect("verification failures are not errors");

    assert_eq!(transaction.status, TransactionStatus::Declined);
    assert_eq!(transaction.client_id, "42");
    assert_eq!(transaction.transaction_id, "tkn1");
    assert_eq!(transaction.amount, "50.00");
    assert_eq!(transaction.invoices.len(), 1);
    assert!(transaction.message.is_some());
}

#[tokio::test]
async fn test_undecodable_push_never_calls_out() {
    let processor = MockProcessor::start().await;
    Mock::given(any())
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&processor.server)
        .await;

    let err = processor
        .gateway()
        .verify_push(&test_settings(), "{\"amount\": 5000}")
        .await
        .unwrap_err();

    assert!(matches!(err, AppError::Validation(_)));
}

#[tokio::test]
async fn test_refund_is_unsupported_and_never_calls_out() {
    let processor = MockProcessor::start().await;
    Mock::given(any())
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&processor.server)
        .await;

    let err = processor
        .gateway()
        .refund(
            &test_settings(),
            "ref_1",
            "txn_1",
            Decimal::from_str("50.00").unwrap(),
            None,
        )
        .await
        .unwrap_err();

    match err {
        AppError::UnsupportedOperation(message) => assert_eq!(
            message,
            "The requested operation is not supported by this gateway."
        ),
        other => panic!("expected UnsupportedOperation, got {:?}", other),
    }
}

#[tokio::test]
async fn test_settings_with_empty_secret_are_rejected() {
    let processor = MockProcessor::start().await;
    let err = processor
        .gateway()
        .validate_settings(GatewaySettings::new("pk_test", ""))
        .unwrap_err();

    match err {
        AppError::ConfigInvalid(fields) => {
            assert_eq!(fields.len(), 1);
            assert_eq!(fields[0].field, "secret_key");
        }
        other => panic!("expected ConfigInvalid, got {:?}", other),
    }
    assert_eq!(processor.request_count().await, 0);
}
