//! Framework-agnostic HTTP endpoint for webhook handshakes and deliveries.

use http::header::{ALLOW, CONTENT_TYPE};
use http::{HeaderValue, Method, Request, Response, StatusCode};
use tracing::{debug, warn};

use crate::context::CallContext;
use crate::secrets::SecretResolver;

use super::{AuthError, Authenticator, Dispatcher, SIGNATURE_HEADER, WebhookHandler, parse_event};

const SUBSCRIBE: &str = "subscribe";

/// Query parameters of a subscription handshake.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HandshakeQuery {
    /// `hub.mode`, expected to be `subscribe`.
    pub mode: String,
    /// `hub.verify_token`.
    pub verify_token: String,
    /// `hub.challenge`, echoed back on success.
    pub challenge: String,
}

impl HandshakeQuery {
    /// Extracts the handshake parameters from a raw query string.
    ///
    /// Missing parameters are left empty; the first occurrence of a
    /// repeated parameter wins.
    #[must_use]
    pub fn parse(query: Option<&str>) -> Self {
        let (mut mode, mut verify_token, mut challenge) = (None, None, None);
        for (key, value) in url::form_urlencoded::parse(query.unwrap_or_default().as_bytes()) {
            let slot = match &*key {
                "hub.mode" => &mut mode,
                "hub.verify_token" => &mut verify_token,
                "hub.challenge" => &mut challenge,
                _ => continue,
            };
            slot.get_or_insert_with(|| value.into_owned());
        }
        Self {
            mode: mode.unwrap_or_default(),
            verify_token: verify_token.unwrap_or_default(),
            challenge: challenge.unwrap_or_default(),
        }
    }
}

/// Serves webhook requests.
///
/// - `GET`: subscription handshake; echoes `hub.challenge` once the mode
///   and verify token check out
/// - `POST`: delivery; the signature is verified on the raw body before
///   the payload is parsed and dispatched
/// - anything else: `405 Method Not Allowed`
///
/// Failures caused by the sender map to 4xx. A secret that cannot be
/// resolved is a server-side problem and maps to 500; a lookup cut short
/// by the request's [`CallContext`] maps to 503.
///
/// # Example
///
/// ```
/// use wacloud::context::CallContext;
/// use wacloud::secrets::{SecretKey, StaticSecrets};
/// use wacloud::webhook::{Authenticator, Dispatcher, WebhookEndpoint};
///
/// # async fn example() {
/// let secrets = StaticSecrets::new().with_secret(SecretKey::VerifyToken, "hello");
/// let endpoint = WebhookEndpoint::new(Authenticator::new(secrets), Dispatcher::new(()));
///
/// let request = http::Request::get("/webhook?hub.mode=subscribe&hub.verify_token=hello&hub.challenge=42")
///     .body(Vec::new())
///     .unwrap();
/// let ctx = CallContext::background().with_timeout(std::time::Duration::from_secs(5));
/// let response = endpoint.handle(&ctx, request).await;
/// assert_eq!(response.body(), "42");
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct WebhookEndpoint<R, H> {
    auth: Authenticator<R>,
    dispatcher: Dispatcher<H>,
}

impl<R: SecretResolver, H: WebhookHandler> WebhookEndpoint<R, H> {
    /// Creates an endpoint from its pipeline stages.
    #[must_use]
    pub const fn new(auth: Authenticator<R>, dispatcher: Dispatcher<H>) -> Self {
        Self { auth, dispatcher }
    }

    /// Returns the authenticator.
    #[must_use]
    pub const fn authenticator(&self) -> &Authenticator<R> {
        &self.auth
    }

    /// Returns the dispatcher.
    #[must_use]
    pub const fn dispatcher(&self) -> &Dispatcher<H> {
        &self.dispatcher
    }

    /// Handles one request; secret lookups are bounded by `ctx`.
    pub async fn handle(&self, ctx: &CallContext, request: Request<Vec<u8>>) -> Response<String> {
        let method = request.method();
        if method == Method::GET {
            self.handshake(ctx, &request).await
        } else if method == Method::POST {
            self.deliver(ctx, &request).await
        } else {
            let mut response = reply(StatusCode::METHOD_NOT_ALLOWED, "");
            response
                .headers_mut()
                .insert(ALLOW, HeaderValue::from_static("GET, POST"));
            response
        }
    }

    async fn handshake(&self, ctx: &CallContext, request: &Request<Vec<u8>>) -> Response<String> {
        let query = HandshakeQuery::parse(request.uri().query());
        if query.mode != SUBSCRIBE {
            warn!(mode = %query.mode, "Rejected webhook handshake: invalid mode");
            return reply(StatusCode::BAD_REQUEST, "invalid mode");
        }
        if let Err(err) = self.auth.check_verify_token(ctx, &query.verify_token).await {
            warn!(error = %err, "Rejected webhook handshake");
            return auth_failure(&err, "verify token mismatch");
        }
        debug!("Accepted webhook handshake");
        reply(StatusCode::OK, query.challenge)
    }

    async fn deliver(&self, ctx: &CallContext, request: &Request<Vec<u8>>) -> Response<String> {
        let body = request.body();
        let signature = request
            .headers()
            .get(SIGNATURE_HEADER)
            .and_then(|value| value.to_str().ok())
            .unwrap_or_default();
        if let Err(err) = self.auth.check_signature(ctx, body, signature).await {
            warn!(error = %err, "Rejected webhook delivery");
            return auth_failure(&err, "invalid signature");
        }

        let event = match parse_event(body) {
            Ok(event) => event,
            Err(err) => {
                warn!(error = %err, "Rejected webhook delivery");
                return reply(StatusCode::BAD_REQUEST, "invalid payload");
            }
        };

        self.dispatcher.dispatch(&event, request.headers());
        debug!(entries = event.entry.len(), "Accepted webhook delivery");
        reply(StatusCode::OK, "ok")
    }
}

fn auth_failure(err: &AuthError, message: &str) -> Response<String> {
    if err.is_secret_error() {
        reply(StatusCode::INTERNAL_SERVER_ERROR, "internal error")
    } else if err.context_error().is_some() {
        reply(StatusCode::SERVICE_UNAVAILABLE, "unavailable")
    } else {
        reply(StatusCode::FORBIDDEN, message)
    }
}

fn reply(status: StatusCode, body: impl Into<String>) -> Response<String> {
    let mut response = Response::new(body.into());
    *response.status_mut() = status;
    response.headers_mut().insert(
        CONTENT_TYPE,
        HeaderValue::from_static("text/plain; charset=utf-8"),
    );
    response
}
