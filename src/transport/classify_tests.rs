//! Tests for transient-failure classification.

use super::{TransportError, is_retryable_status, is_transient};
use http::StatusCode;
use std::io;

fn io_error(kind: io::ErrorKind) -> TransportError {
    TransportError::Connection(Box::new(io::Error::new(kind, "socket failure")))
}

mod transport_errors {
    use super::*;

    #[test]
    fn timeout_is_transient() {
        assert!(is_transient(&TransportError::Timeout));
    }

    #[test]
    fn cancellation_is_permanent() {
        assert!(!is_transient(&TransportError::Canceled));
    }

    #[test]
    fn closed_connection_is_permanent() {
        assert!(!is_transient(&TransportError::Closed));
    }

    #[test]
    fn invalid_url_is_permanent() {
        assert!(!is_transient(&TransportError::InvalidUrl("::".to_string())));
    }

    #[test]
    fn dns_timeout_or_temporary_is_transient() {
        let timeout = TransportError::Dns {
            host: "graph.facebook.com".to_string(),
            timeout: true,
            temporary: false,
        };
        let temporary = TransportError::Dns {
            host: "graph.facebook.com".to_string(),
            timeout: false,
            temporary: true,
        };

        assert!(is_transient(&timeout));
        assert!(is_transient(&temporary));
    }

    #[test]
    fn dns_not_found_is_permanent() {
        let err = TransportError::Dns {
            host: "nope.invalid".to_string(),
            timeout: false,
            temporary: false,
        };
        assert!(!is_transient(&err));
    }

    #[test]
    fn transient_socket_errors_are_transient() {
        for kind in [
            io::ErrorKind::ConnectionReset,
            io::ErrorKind::ConnectionAborted,
            io::ErrorKind::BrokenPipe,
            io::ErrorKind::TimedOut,
            io::ErrorKind::HostUnreachable,
            io::ErrorKind::NetworkUnreachable,
            io::ErrorKind::UnexpectedEof,
        ] {
            assert!(is_transient(&io_error(kind)), "{kind:?} should be transient");
        }
    }

    #[test]
    fn refused_connection_is_permanent() {
        assert!(!is_transient(&io_error(io::ErrorKind::ConnectionRefused)));
    }

    #[test]
    fn unexpected_eof_while_reading_body_is_transient() {
        let err = TransportError::Body(Box::new(io::Error::from(io::ErrorKind::UnexpectedEof)));
        assert!(is_transient(&err));
    }

    #[test]
    fn opaque_errors_are_permanent() {
        let err = TransportError::Other("certificate verify failed".into());
        assert!(!is_transient(&err));
    }

    #[test]
    fn nested_io_error_is_found_through_source_chain() {
        #[derive(Debug, thiserror::Error)]
        #[error("hyper: connection error")]
        struct Wrapper(#[source] io::Error);

        let err = TransportError::Other(Box::new(Wrapper(io::Error::from(
            io::ErrorKind::ConnectionReset,
        ))));

        assert!(is_transient(&err));
    }
}

mod status_codes {
    use super::*;

    #[test]
    fn rate_limit_and_transient_5xx_are_retryable() {
        for code in [429, 500, 502, 503, 504] {
            let status = StatusCode::from_u16(code).unwrap();
            assert!(is_retryable_status(status), "{code} should be retryable");
        }
    }

    #[test]
    fn permanent_statuses_are_not_retryable() {
        for code in [501, 505, 400, 401, 403, 404] {
            let status = StatusCode::from_u16(code).unwrap();
            assert!(!is_retryable_status(status), "{code} should not be retryable");
        }
    }

    #[test]
    fn success_and_redirects_are_not_retryable() {
        for code in [200, 201, 204, 301, 304] {
            let status = StatusCode::from_u16(code).unwrap();
            assert!(!is_retryable_status(status));
        }
    }

    #[test]
    fn request_timeout_is_not_retryable_by_default() {
        assert!(!is_retryable_status(StatusCode::REQUEST_TIMEOUT));
    }
}
