//! Client behavior tests against a local mock server.
//!
//! These tests run hermetically with wiremock and cover the token
//! lifecycle, the 401 refresh-and-retry path, retry/backoff behavior,
//! error mapping, and cursor pagination.

use std::sync::Once;
use std::time::Duration;

use futures_util::StreamExt;
use serde_json::json;
use tracing_subscriber::EnvFilter;
use wiremock::matchers::{body_string_contains, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use meridian_rs::models::NewPaymentBuilder;
use meridian_rs::{
    AccountId, Credentials, Error, MeridianClient, PayeeId, PaymentId, RetryConfig,
};

static INIT: Once = Once::new();

fn init_logging() {
    INIT.call_once(|| {
        tracing_subscriber::fmt()
            .with_env_filter(EnvFilter::from_default_env())
            .with_test_writer()
            .try_init()
            .ok();
    });
}

/// Client pointed at the mock server, with fast backoff so retry tests
/// do not slow the suite down.
fn mock_client(server: &MockServer) -> MeridianClient {
    init_logging();
    MeridianClient::builder()
        .credentials(Credentials::client_credentials("test-client", "test-secret"))
        .base_url(server.uri())
        .retry(
            RetryConfig::default()
                .with_max_retries(2)
                .with_initial_backoff(Duration::from_millis(10)),
        )
        .build()
        .expect("client should build against mock server")
}

/// Mount a token endpoint that always succeeds with the given token.
async fn mount_token(server: &MockServer, access_token: &str) {
    Mock::given(method("POST"))
        .and(path("/oauth2/token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "access_token": access_token,
            "token_type": "Bearer",
            "expires_in": 3600
        })))
        .mount(server)
        .await;
}

fn account_json(id: &str) -> serde_json::Value {
    json!({
        "id": id,
        "name": "Main Checking",
        "account_type": "checking",
        "currency": "GBP",
        "status": "open",
        "created_at": "2024-03-01T09:30:00Z"
    })
}

fn transaction_json(id: &str) -> serde_json::Value {
    json!({
        "id": id,
        "account_id": "acc_01",
        "amount": "12.50",
        "currency": "GBP",
        "direction": "debit",
        "status": "booked",
        "description": "COFFEE SHOP",
        "booked_at": "2024-06-10T12:00:00Z"
    })
}

// ============================================================================
// TOKEN LIFECYCLE
// ============================================================================

mod token_tests {
    use super::*;

    #[tokio::test]
    async fn test_first_request_exchanges_client_credentials() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/oauth2/token"))
            .and(body_string_contains("grant_type=client_credentials"))
            .and(body_string_contains("client_id=test-client"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "access_token": "tok_1",
                "expires_in": 3600
            })))
            .expect(1)
            .mount(&server)
            .await;

        Mock::given(method("GET"))
            .and(path("/accounts"))
            .and(header("authorization", "Bearer tok_1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "data": [account_json("acc_01")]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let client = mock_client(&server);
        let accounts = client.accounts().list().await.unwrap();
        assert_eq!(accounts.len(), 1);
        assert_eq!(accounts[0].id.as_str(), "acc_01");
    }

    #[tokio::test]
    async fn test_token_is_cached_across_requests() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/oauth2/token"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "access_token": "tok_1",
                "expires_in": 3600
            })))
            .expect(1)
            .mount(&server)
            .await;

        Mock::given(method("GET"))
            .and(path("/accounts"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "data": []
            })))
            .expect(3)
            .mount(&server)
            .await;

        let client = mock_client(&server);
        for _ in 0..3 {
            client.accounts().list().await.unwrap();
        }
    }

    #[tokio::test]
    async fn test_token_exchange_failure_surfaces_description() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/oauth2/token"))
            .respond_with(ResponseTemplate::new(400).set_body_json(json!({
                "error": "invalid_client",
                "error_description": "client secret is not valid"
            })))
            .mount(&server)
            .await;

        let client = mock_client(&server);
        let err = client.accounts().list().await.unwrap_err();
        match err {
            Error::Authentication(message) => {
                assert!(message.contains("client secret is not valid"), "{message}");
            }
            other => panic!("Expected Authentication error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_forced_refresh_surfaces_grant_failure() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/oauth2/token"))
            .respond_with(ResponseTemplate::new(401).set_body_json(json!({
                "error": "invalid_client"
            })))
            .mount(&server)
            .await;

        let client = mock_client(&server);
        let err = client.refresh_token().await.unwrap_err();
        assert!(err.is_auth_error(), "got {:?}", err);
    }

    #[tokio::test]
    async fn test_authorization_code_renews_with_issued_refresh_token() {
        let server = MockServer::start().await;

        // The code exchange issues a refresh token; the code is single-use.
        Mock::given(method("POST"))
            .and(path("/oauth2/token"))
            .and(body_string_contains("grant_type=authorization_code"))
            .and(body_string_contains("code=auth_code_1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "access_token": "tok_1",
                "expires_in": 3600,
                "refresh_token": "rt_1"
            })))
            .expect(1)
            .mount(&server)
            .await;

        Mock::given(method("POST"))
            .and(path("/oauth2/token"))
            .and(body_string_contains("grant_type=refresh_token"))
            .and(body_string_contains("refresh_token=rt_1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "access_token": "tok_2",
                "expires_in": 3600
            })))
            .expect(1)
            .mount(&server)
            .await;

        Mock::given(method("GET"))
            .and(path("/accounts"))
            .and(header("authorization", "Bearer tok_1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "data": [] })))
            .mount(&server)
            .await;

        Mock::given(method("GET"))
            .and(path("/accounts"))
            .and(header("authorization", "Bearer tok_2"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "data": [] })))
            .mount(&server)
            .await;

        let client = MeridianClient::builder()
            .credentials(Credentials::AuthorizationCode {
                client_id: "test-client".to_string(),
                client_secret: "test-secret".to_string().into(),
                code: "auth_code_1".to_string().into(),
                redirect_uri: "https://example.com/callback".to_string(),
            })
            .base_url(server.uri())
            .build()
            .unwrap();

        client.accounts().list().await.unwrap();
        // Forcing a refresh must use the refresh token, never the code again.
        client.refresh_token().await.unwrap();
        client.accounts().list().await.unwrap();
    }
}

// ============================================================================
// 401 REFRESH-AND-RETRY
// ============================================================================

mod unauthorized_tests {
    use super::*;

    #[tokio::test]
    async fn test_401_triggers_refresh_and_single_retry() {
        let server = MockServer::start().await;

        // First exchange hands out a token the resource server rejects.
        Mock::given(method("POST"))
            .and(path("/oauth2/token"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "access_token": "tok_stale",
                "expires_in": 3600
            })))
            .up_to_n_times(1)
            .mount(&server)
            .await;

        Mock::given(method("POST"))
            .and(path("/oauth2/token"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "access_token": "tok_fresh",
                "expires_in": 3600
            })))
            .mount(&server)
            .await;

        Mock::given(method("GET"))
            .and(path("/accounts"))
            .and(header("authorization", "Bearer tok_stale"))
            .respond_with(ResponseTemplate::new(401))
            .expect(1)
            .mount(&server)
            .await;

        Mock::given(method("GET"))
            .and(path("/accounts"))
            .and(header("authorization", "Bearer tok_fresh"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "data": [account_json("acc_01")]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let client = mock_client(&server);
        let accounts = client.accounts().list().await.unwrap();
        assert_eq!(accounts.len(), 1);
    }

    #[tokio::test]
    async fn test_second_401_surfaces_token_expired() {
        let server = MockServer::start().await;

        // Initial exchange plus exactly one forced refresh.
        Mock::given(method("POST"))
            .and(path("/oauth2/token"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "access_token": "tok_rejected",
                "expires_in": 3600
            })))
            .expect(2)
            .mount(&server)
            .await;

        Mock::given(method("GET"))
            .and(path("/accounts"))
            .respond_with(ResponseTemplate::new(401))
            .expect(2)
            .mount(&server)
            .await;

        let client = mock_client(&server);
        let err = client.accounts().list().await.unwrap_err();
        assert!(matches!(err, Error::TokenExpired), "got {:?}", err);
        assert!(err.is_auth_error());
    }
}

// ============================================================================
// RETRIES AND ERROR MAPPING
// ============================================================================

mod error_mapping_tests {
    use super::*;

    #[tokio::test]
    async fn test_transient_503_is_retried() {
        let server = MockServer::start().await;
        mount_token(&server, "tok_1").await;

        Mock::given(method("GET"))
            .and(path("/accounts"))
            .respond_with(ResponseTemplate::new(503))
            .up_to_n_times(1)
            .mount(&server)
            .await;

        Mock::given(method("GET"))
            .and(path("/accounts"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "data": [] })))
            .expect(1)
            .mount(&server)
            .await;

        let client = mock_client(&server);
        let accounts = client.accounts().list().await.unwrap();
        assert!(accounts.is_empty());
    }

    #[tokio::test]
    async fn test_rate_limit_maps_retry_after_header() {
        let server = MockServer::start().await;
        mount_token(&server, "tok_1").await;

        Mock::given(method("GET"))
            .and(path("/accounts"))
            .respond_with(ResponseTemplate::new(429).insert_header("retry-after", "7"))
            .mount(&server)
            .await;

        let client = MeridianClient::builder()
            .credentials(Credentials::client_credentials("test-client", "test-secret"))
            .base_url(server.uri())
            .retry(RetryConfig::no_retry())
            .build()
            .unwrap();

        let err = client.accounts().list().await.unwrap_err();
        match err {
            Error::RateLimited { retry_after_secs } => assert_eq!(retry_after_secs, 7),
            other => panic!("Expected RateLimited, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_404_maps_to_not_found_with_message() {
        let server = MockServer::start().await;
        mount_token(&server, "tok_1").await;

        Mock::given(method("GET"))
            .and(path("/accounts/acc_missing"))
            .respond_with(ResponseTemplate::new(404).set_body_json(json!({
                "error": { "code": "not_found", "message": "No such account" }
            })))
            .mount(&server)
            .await;

        let client = mock_client(&server);
        let err = client
            .accounts()
            .get(&AccountId::new("acc_missing"))
            .await
            .unwrap_err();
        match err {
            Error::NotFound(message) => assert_eq!(message, "No such account"),
            other => panic!("Expected NotFound, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_422_carries_api_code_and_message() {
        let server = MockServer::start().await;
        mount_token(&server, "tok_1").await;

        Mock::given(method("POST"))
            .and(path("/payments"))
            .respond_with(ResponseTemplate::new(422).set_body_json(json!({
                "error": {
                    "code": "insufficient_funds",
                    "message": "Account balance does not cover this payment"
                }
            })))
            .mount(&server)
            .await;

        let client = mock_client(&server);
        let payment = NewPaymentBuilder::new()
            .account(AccountId::new("acc_01"))
            .payee(PayeeId::new("pye_01"))
            .amount(rust_decimal_macros::dec!(1000000.00))
            .currency("GBP")
            .reference("TOO-BIG")
            .build()
            .unwrap();

        let err = client.payments().create(payment).await.unwrap_err();
        match err {
            Error::Api {
                status,
                code,
                message,
                ..
            } => {
                assert_eq!(status, 422);
                assert_eq!(code.as_deref(), Some("insufficient_funds"));
                assert!(message.contains("does not cover"));
            }
            other => panic!("Expected Api error, got {:?}", other),
        }
    }
}

// ============================================================================
// RESOURCE SERVICES
// ============================================================================

mod service_tests {
    use super::*;

    #[tokio::test]
    async fn test_create_payment_unwraps_envelope() {
        let server = MockServer::start().await;
        mount_token(&server, "tok_1").await;

        Mock::given(method("POST"))
            .and(path("/payments"))
            .and(body_string_contains("INV-2024-0917"))
            .respond_with(ResponseTemplate::new(201).set_body_json(json!({
                "data": {
                    "id": "pay_0001",
                    "account_id": "acc_01",
                    "payee_id": "pye_01",
                    "amount": "45.00",
                    "currency": "GBP",
                    "reference": "INV-2024-0917",
                    "status": "created",
                    "created_at": "2024-06-12T08:00:00Z"
                },
                "request_id": "req_abc123"
            })))
            .expect(1)
            .mount(&server)
            .await;

        let client = mock_client(&server);
        let payment = NewPaymentBuilder::new()
            .account(AccountId::new("acc_01"))
            .payee(PayeeId::new("pye_01"))
            .amount(rust_decimal_macros::dec!(45.00))
            .currency("GBP")
            .reference("INV-2024-0917")
            .build()
            .unwrap();

        let created = client.payments().create(payment).await.unwrap();
        assert_eq!(created.id.as_str(), "pay_0001");
        assert_eq!(created.amount, rust_decimal_macros::dec!(45.00));
        assert!(created.executed_at.is_none());
    }

    #[tokio::test]
    async fn test_cancel_payment_tolerates_empty_body() {
        let server = MockServer::start().await;
        mount_token(&server, "tok_1").await;

        Mock::given(method("DELETE"))
            .and(path("/payments/pay_0001"))
            .respond_with(ResponseTemplate::new(204))
            .expect(1)
            .mount(&server)
            .await;

        let client = mock_client(&server);
        client
            .payments()
            .cancel(&PaymentId::new("pay_0001"))
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_api_version_header_is_sent_when_pinned() {
        let server = MockServer::start().await;
        mount_token(&server, "tok_1").await;

        Mock::given(method("GET"))
            .and(path("/accounts"))
            .and(header("meridian-version", "2024-06-01"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "data": [] })))
            .expect(1)
            .mount(&server)
            .await;

        let client = MeridianClient::builder()
            .credentials(Credentials::client_credentials("test-client", "test-secret"))
            .base_url(server.uri())
            .api_version(meridian_rs::ApiVersion::new("2024-06-01").unwrap())
            .build()
            .unwrap();

        client.accounts().list().await.unwrap();
    }
}

// ============================================================================
// PAGINATION
// ============================================================================

mod pagination_tests {
    use super::*;

    #[tokio::test]
    async fn test_stream_follows_next_cursor() {
        let server = MockServer::start().await;
        mount_token(&server, "tok_1").await;

        // Mount the cursor-specific page first; matching falls through to
        // the generic first-page mock otherwise.
        Mock::given(method("GET"))
            .and(path("/accounts/acc_01/transactions"))
            .and(query_param("cursor", "cur_2"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "data": [transaction_json("txn_03")],
                "meta": { "count": 1 }
            })))
            .expect(1)
            .mount(&server)
            .await;

        Mock::given(method("GET"))
            .and(path("/accounts/acc_01/transactions"))
            .and(query_param("limit", "2"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "data": [transaction_json("txn_01"), transaction_json("txn_02")],
                "meta": { "next_cursor": "cur_2", "count": 2 }
            })))
            .expect(1)
            .mount(&server)
            .await;

        let client = mock_client(&server);
        let query = meridian_rs::api::TransactionsQuery {
            limit: Some(2),
            ..Default::default()
        };

        let stream = client
            .transactions()
            .list_stream(&AccountId::new("acc_01"), Some(query));
        let items: Vec<_> = stream
            .collect::<Vec<_>>()
            .await
            .into_iter()
            .collect::<Result<Vec<_>, _>>()
            .unwrap();

        assert_eq!(items.len(), 3);
        assert_eq!(items[0].id.as_str(), "txn_01");
        assert_eq!(items[2].id.as_str(), "txn_03");
    }

    #[tokio::test]
    async fn test_stream_ends_without_cursor() {
        let server = MockServer::start().await;
        mount_token(&server, "tok_1").await;

        Mock::given(method("GET"))
            .and(path("/accounts/acc_01/transactions"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "data": [transaction_json("txn_01")],
                "meta": { "count": 1 }
            })))
            .expect(1)
            .mount(&server)
            .await;

        let client = mock_client(&server);
        let mut stream = client
            .transactions()
            .list_stream(&AccountId::new("acc_01"), None);

        assert!(stream.next().await.unwrap().is_ok());
        assert!(stream.next().await.is_none());
    }
}

// ============================================================================
// CONFIGURATION RESOLUTION
// ============================================================================

mod config_tests {
    use super::*;

    // Environment-variable resolution is covered by a single test to avoid
    // races between parallel tests mutating process-wide state.
    #[test]
    fn test_builder_precedence_over_environment_variables() {
        let credentials = Credentials::client_credentials("test-client", "test-secret");

        std::env::set_var("MERIDIAN_ENVIRONMENT", "sandbox");
        std::env::set_var("MERIDIAN_BASE_URL", "https://stub.meridianbank.io");
        std::env::set_var("MERIDIAN_TIMEOUT_SECS", "45");

        // Env vars apply when nothing explicit is set.
        let client = MeridianClient::builder()
            .credentials(credentials.clone())
            .build()
            .unwrap();
        assert_eq!(client.environment(), meridian_rs::Environment::Sandbox);
        assert_eq!(client.config().base_url, "https://stub.meridianbank.io");
        assert_eq!(client.config().timeout, Duration::from_secs(45));

        // Explicit builder values win over the environment.
        let client = MeridianClient::builder()
            .credentials(credentials.clone())
            .environment(meridian_rs::Environment::Production)
            .base_url("https://other.meridianbank.io")
            .timeout(Duration::from_secs(5))
            .build()
            .unwrap();
        assert_eq!(client.environment(), meridian_rs::Environment::Production);
        assert_eq!(client.config().base_url, "https://other.meridianbank.io");
        assert_eq!(client.config().timeout, Duration::from_secs(5));

        // A malformed timeout is a configuration error, not a panic.
        std::env::set_var("MERIDIAN_TIMEOUT_SECS", "soon");
        let result = MeridianClient::builder().credentials(credentials).build();
        assert!(matches!(result.unwrap_err(), Error::Config(_)));

        std::env::remove_var("MERIDIAN_ENVIRONMENT");
        std::env::remove_var("MERIDIAN_BASE_URL");
        std::env::remove_var("MERIDIAN_TIMEOUT_SECS");
    }

    #[test]
    fn test_invalid_base_url_is_rejected_at_build() {
        let result = MeridianClient::builder()
            .credentials(Credentials::client_credentials("test-client", "test-secret"))
            .base_url("not a url")
            .build();
        assert!(matches!(result.unwrap_err(), Error::UrlParse(_)));
    }

    #[test]
    fn test_trailing_slash_is_stripped_from_base_url() {
        let client = MeridianClient::builder()
            .credentials(Credentials::client_credentials("test-client", "test-secret"))
            .base_url("https://api.sandbox.meridianbank.io/")
            .build()
            .unwrap();
        assert_eq!(
            client.config().base_url,
            "https://api.sandbox.meridianbank.io"
        );
    }
}
