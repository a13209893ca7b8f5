//! Tests for HTTP request/response types.

use super::{BodyRewind, HttpRequest, HttpResponse, ResponseBody};

fn test_url() -> url::Url {
    url::Url::parse("https://graph.facebook.com/v20.0/123/messages").unwrap()
}

mod http_request {
    use super::*;

    #[test]
    fn new_creates_request_with_method_and_url() {
        let req = HttpRequest::new(http::Method::PUT, test_url());

        assert_eq!(req.method, http::Method::PUT);
        assert_eq!(req.url, test_url());
        assert!(req.headers.is_empty());
        assert!(req.body.is_none());
        assert!(req.rewind.is_none());
    }

    #[test]
    fn get_and_post_set_method() {
        assert_eq!(HttpRequest::get(test_url()).method, http::Method::GET);
        assert_eq!(HttpRequest::post(test_url()).method, http::Method::POST);
    }

    #[test]
    fn with_body_is_one_shot() {
        let req = HttpRequest::post(test_url()).with_body(b"payload".to_vec());

        assert_eq!(req.body.as_deref(), Some(&b"payload"[..]));
        assert!(req.has_body());
        assert!(!req.is_rewindable());
    }

    #[test]
    fn with_rewindable_body_replays_same_bytes() {
        let req = HttpRequest::post(test_url()).with_rewindable_body(b"payload".to_vec());

        assert!(req.is_rewindable());
        let replay = req.rewind.as_ref().unwrap().rewind().unwrap();
        assert_eq!(replay, b"payload");
    }

    #[test]
    fn empty_body_does_not_need_rewind() {
        let req = HttpRequest::post(test_url()).with_body(Vec::new());

        assert!(!req.has_body());
        assert!(req.is_rewindable());
    }

    #[test]
    fn with_rewind_attaches_custom_function() {
        let req = HttpRequest::post(test_url())
            .with_body(b"a".to_vec())
            .with_rewind(BodyRewind::new(|| Ok(b"a".to_vec())));

        assert!(req.is_rewindable());
    }

    #[test]
    fn json_sets_content_type_and_rewindable_body() {
        let req = HttpRequest::json(
            http::Method::POST,
            test_url(),
            &serde_json::json!({"messaging_product": "whatsapp"}),
        )
        .unwrap();

        assert_eq!(
            req.headers.get(http::header::CONTENT_TYPE).unwrap(),
            "application/json"
        );
        assert_eq!(
            req.body.as_deref(),
            Some(&br#"{"messaging_product":"whatsapp"}"#[..])
        );
        assert!(req.rewind.is_some());
    }

    #[test]
    fn with_header_appends_multiple_values_for_same_name() {
        let req = HttpRequest::get(test_url())
            .with_header(
                http::header::ACCEPT,
                http::HeaderValue::from_static("text/html"),
            )
            .with_header(
                http::header::ACCEPT,
                http::HeaderValue::from_static("application/json"),
            );

        assert_eq!(req.headers.get_all(http::header::ACCEPT).iter().count(), 2);
    }

    #[test]
    fn clone_shares_rewind_capability() {
        let req = HttpRequest::post(test_url()).with_rewindable_body(b"x".to_vec());
        let cloned = req.clone();

        assert_eq!(cloned.rewind.unwrap().rewind().unwrap(), b"x");
    }

    #[test]
    fn debug_does_not_expose_rewind_internals() {
        let rewind = BodyRewind::from_bytes(b"secret-ish");
        assert_eq!(format!("{rewind:?}"), "BodyRewind(..)");
    }
}

mod http_response {
    use super::*;

    #[test]
    fn new_has_no_request_line() {
        let resp = HttpResponse::new(
            http::StatusCode::OK,
            http::HeaderMap::new(),
            ResponseBody::empty(),
        );

        assert!(resp.request.is_none());
        assert!(resp.is_success());
    }

    #[test]
    fn with_request_records_method_and_url() {
        let resp = HttpResponse::from_bytes(http::StatusCode::OK, http::HeaderMap::new(), "ok")
            .with_request(http::Method::POST, test_url());

        let line = resp.request.unwrap();
        assert_eq!(line.method, http::Method::POST);
        assert_eq!(line.url, test_url());
    }

    #[test]
    fn error_statuses_are_not_success() {
        for code in [400, 404, 429, 500] {
            let resp = HttpResponse::from_bytes(
                http::StatusCode::from_u16(code).unwrap(),
                http::HeaderMap::new(),
                "",
            );
            assert!(!resp.is_success());
        }
    }

    #[tokio::test]
    async fn take_body_leaves_empty_body_behind() {
        let mut resp =
            HttpResponse::from_bytes(http::StatusCode::OK, http::HeaderMap::new(), "hello");

        let body = resp.take_body();

        assert_eq!(body.bytes().await.unwrap(), "hello");
        assert!(resp.take_body().bytes().await.unwrap().is_empty());
    }
}
