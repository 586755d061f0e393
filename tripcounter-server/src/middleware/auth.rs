use actix_web::dev::Payload;
use actix_web::{FromRequest, HttpRequest};
use futures::future;

use crate::handlers::error::HttpErrorResponse;

/// Name of the cookie the upstream session layer sets after the
/// authorization-code exchange.
pub const SESSION_COOKIE: &str = "session_email";

/// Header alternative for non-browser clients (and the upstream proxy).
pub const SESSION_HEADER: &str = "X-Session-Email";

/// The authenticated principal: an opaque email established upstream.
/// Session issuance and verification live outside this service; a request
/// that reaches a handler without an identity fails here with a 401 before
/// touching the table gateway.
#[derive(Debug, Clone)]
pub struct AuthenticatedUser {
    pub email: String,
}

impl FromRequest for AuthenticatedUser {
    type Error = HttpErrorResponse;
    type Future = future::Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        match identity_from_request(req) {
            Some(email) => future::ok(AuthenticatedUser { email }),
            None => future::err(HttpErrorResponse::AuthenticationRequired(
                "No session is established",
            )),
        }
    }
}

fn identity_from_request(req: &HttpRequest) -> Option<String> {
    let from_header = req
        .headers()
        .get(SESSION_HEADER)
        .and_then(|value| value.to_str().ok());

    let email = match from_header {
        Some(email) => String::from(email),
        None => req.cookie(SESSION_COOKIE)?.value().to_owned(),
    };

    let email = email.trim();

    if email.is_empty() {
        return None;
    }

    Some(String::from(email))
}
