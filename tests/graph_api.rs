//! Integration tests for the executor and client against a mock Graph API.
//!
//! Tests cover:
//! - Retrying transient statuses over real HTTP
//! - Replaying JSON bodies on retries
//! - Deadlines covering slow responses
//! - Graph error envelope decoding through the client

use std::time::Duration;

use http::{Method, StatusCode};
use serde_json::json;
use wacloud::client::{Client, ClientError, StaticToken};
use wacloud::config::ValidatedConfig;
use wacloud::context::{CallContext, ContextError};
use wacloud::error::read_error;
use wacloud::time::InstantSleeper;
use wacloud::transport::{Executor, ExecutorConfig, HttpRequest, ReqwestClient};
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const PHONE_ID: &str = "106540352242922";

fn http_client() -> ReqwestClient {
    let inner = reqwest::Client::builder().no_proxy().build().unwrap();
    ReqwestClient::from_client(inner)
}

fn executor(max_retries: u32) -> Executor<ReqwestClient, InstantSleeper> {
    Executor::new(http_client())
        .with_sleeper(InstantSleeper)
        .with_config(ExecutorConfig::new().with_max_retries(max_retries))
}

fn url(server: &MockServer, route: &str) -> url::Url {
    url::Url::parse(&format!("{}{route}", server.uri())).unwrap()
}

fn client(server: &MockServer) -> Client<ReqwestClient, StaticToken, InstantSleeper> {
    let config = ValidatedConfig::parse(&format!(
        r#"
        [graph]
        version = "v20.0"
        waba_id = "102290129340398"
        phone_number_id = "{PHONE_ID}"
        base_url = "{}"
        timeout_secs = 5

        [retry]
        max_retries = 2
        "#,
        server.uri()
    ))
    .unwrap();
    Client::new(config, http_client(), StaticToken::new("EAAG-token")).with_sleeper(InstantSleeper)
}

mod executor_retries {
    use super::*;

    #[tokio::test]
    async fn recovers_after_server_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v20.0/me"))
            .respond_with(ResponseTemplate::new(500).set_body_string("oops"))
            .up_to_n_times(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/v20.0/me"))
            .respond_with(ResponseTemplate::new(200).set_body_string(r#"{"id":"1"}"#))
            .mount(&server)
            .await;

        let response = executor(3)
            .execute(&CallContext::background(), HttpRequest::get(url(&server, "/v20.0/me")))
            .await
            .unwrap();

        assert_eq!(response.status, StatusCode::OK);
        assert_eq!(&response.body.bytes().await.unwrap()[..], br#"{"id":"1"}"#);
        assert_eq!(server.received_requests().await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn returns_last_response_when_retries_run_out() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&server)
            .await;

        let response = executor(2)
            .execute(&CallContext::background(), HttpRequest::get(url(&server, "/v20.0/me")))
            .await
            .unwrap();

        assert_eq!(response.status, StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(server.received_requests().await.unwrap().len(), 3);
    }

    #[tokio::test]
    async fn does_not_retry_client_errors() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let response = executor(3)
            .execute(&CallContext::background(), HttpRequest::get(url(&server, "/v20.0/me")))
            .await
            .unwrap();

        assert_eq!(response.status, StatusCode::NOT_FOUND);
        assert_eq!(server.received_requests().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn replays_json_body_on_every_attempt() {
        let server = MockServer::start().await;
        let payload = json!({"messaging_product": "whatsapp", "to": "15551234567"});
        Mock::given(method("POST"))
            .and(body_json(&payload))
            .respond_with(ResponseTemplate::new(502))
            .up_to_n_times(1)
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(body_json(&payload))
            .respond_with(ResponseTemplate::new(200))
            .mount(&server)
            .await;

        let request =
            HttpRequest::json(Method::POST, url(&server, "/v20.0/1/messages"), &payload).unwrap();
        let response = executor(3)
            .execute(&CallContext::background(), request)
            .await
            .unwrap();

        assert_eq!(response.status, StatusCode::OK);
        let received = server.received_requests().await.unwrap();
        assert_eq!(received.len(), 2);
        assert_eq!(received[0].body, received[1].body);
    }

    #[tokio::test]
    async fn deadline_cuts_slow_response() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(5)))
            .mount(&server)
            .await;
        let ctx = CallContext::background().with_timeout(Duration::from_millis(200));

        let err = executor(3)
            .execute(&ctx, HttpRequest::get(url(&server, "/v20.0/me")))
            .await
            .unwrap_err();

        assert_eq!(err.context_error(), Some(ContextError::DeadlineExceeded));
    }

    #[tokio::test]
    async fn error_envelope_is_decoded_from_live_response() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(
                ResponseTemplate::new(400)
                    .insert_header("x-fb-trace-id", "HdrTrace")
                    .set_body_string(
                        r#"{"error":{"message":"Unsupported get request.","type":"GraphMethodException","code":100,"error_subcode":33}}"#,
                    ),
            )
            .mount(&server)
            .await;

        let response = executor(0)
            .execute(&CallContext::background(), HttpRequest::get(url(&server, "/v20.0/42")))
            .await
            .unwrap();
        let err = read_error(response).await;

        let detail = err.detail().unwrap();
        assert_eq!(detail.code, 100);
        assert_eq!(detail.error_subcode, Some(33));
        assert_eq!(err.trace_id(), Some("HdrTrace"));
        assert_eq!(err.http().status(), Some(StatusCode::BAD_REQUEST));
        assert_eq!(err.http().url().map(url::Url::path), Some("/v20.0/42"));
    }
}

mod client_calls {
    use super::*;

    #[tokio::test]
    async fn sends_bearer_token_and_decodes_json() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path(format!("/v20.0/{PHONE_ID}")))
            .and(header("authorization", "Bearer EAAG-token"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "id": PHONE_ID,
                "display_phone_number": "15550783881",
            })))
            .mount(&server)
            .await;

        let phone: serde_json::Value = client(&server)
            .call_json(&CallContext::background(), Method::GET, PHONE_ID, None::<&()>)
            .await
            .unwrap();

        assert_eq!(phone["display_phone_number"], "15550783881");
    }

    #[tokio::test]
    async fn graph_error_carries_payload_trace_id() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path(format!("/v20.0/{PHONE_ID}/messages")))
            .respond_with(
                ResponseTemplate::new(400)
                    .insert_header("x-fb-trace-id", "HdrTrace")
                    .set_body_string(
                        r#"{"error":{"message":"(#131030) Recipient phone number not in allowed list","type":"OAuthException","code":131030,"fbtrace_id":"BodyTrace"}}"#,
                    ),
            )
            .mount(&server)
            .await;

        let err = client(&server)
            .call_json::<_, serde_json::Value>(
                &CallContext::background(),
                Method::POST,
                &format!("{PHONE_ID}/messages"),
                Some(&json!({"messaging_product": "whatsapp", "to": "15551234567"})),
            )
            .await
            .unwrap_err();

        let ClientError::Api(graph) = &err else {
            panic!("expected graph error, got {err:?}");
        };
        assert_eq!(graph.code(), Some(131_030));
        assert_eq!(graph.trace_id(), Some("BodyTrace"));
        assert!(!err.is_retryable());
        assert_eq!(server.received_requests().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn rate_limit_is_retried_by_the_client() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(429))
            .up_to_n_times(2)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"data": []})))
            .mount(&server)
            .await;

        let body: serde_json::Value = client(&server)
            .call_json(&CallContext::background(), Method::GET, "102290129340398/phone_numbers", None::<&()>)
            .await
            .unwrap();

        assert_eq!(body, json!({"data": []}));
        assert_eq!(server.received_requests().await.unwrap().len(), 3);
    }
}
