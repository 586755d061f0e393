use chrono::NaiveDate;
use serde::Deserialize;

pub mod budget;
pub mod expenses;
pub mod extras;
pub mod health;
pub mod odometer;
pub mod reports;
pub mod trips;

/// Optional `?date=YYYY-MM-DD` query, defaulting to today.
#[derive(Deserialize)]
pub struct DateQuery {
    pub date: Option<NaiveDate>,
}

pub(crate) fn today() -> NaiveDate {
    chrono::Local::now().date_naive()
}

pub(crate) fn current_clock_time() -> String {
    chrono::Local::now().format("%H:%M").to_string()
}

pub mod error {
    use actix_web::http::StatusCode;
    use actix_web::{HttpResponse, HttpResponseBuilder};
    use serde_json::json;
    use std::fmt;

    /// The full error surface of the API. Every write failure carries a
    /// specific, distinguishable reason; gateway failures are logged in full
    /// server-side and reduced to a generic message on the wire.
    #[derive(Debug)]
    pub enum HttpErrorResponse {
        // 400
        InvalidInput(&'static str),
        MissingField(&'static str),

        // 401
        AuthenticationRequired(&'static str),

        // 409
        Conflict(&'static str),

        // 500
        InternalError(&'static str),
    }

    impl std::error::Error for HttpErrorResponse {}

    impl fmt::Display for HttpErrorResponse {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            write!(f, "{}: {}", self.error_code(), self.message())
        }
    }

    impl HttpErrorResponse {
        pub fn error_code(&self) -> &'static str {
            match self {
                HttpErrorResponse::InvalidInput(_) => "invalid_input",
                HttpErrorResponse::MissingField(_) => "missing_field",
                HttpErrorResponse::AuthenticationRequired(_) => "not_authenticated",
                HttpErrorResponse::Conflict(_) => "duplicate",
                HttpErrorResponse::InternalError(_) => "internal_error",
            }
        }

        pub fn message(&self) -> &'static str {
            match self {
                HttpErrorResponse::InvalidInput(msg)
                | HttpErrorResponse::MissingField(msg)
                | HttpErrorResponse::AuthenticationRequired(msg)
                | HttpErrorResponse::Conflict(msg)
                | HttpErrorResponse::InternalError(msg) => msg,
            }
        }
    }

    impl actix_web::error::ResponseError for HttpErrorResponse {
        fn error_response(&self) -> HttpResponse {
            HttpResponseBuilder::new(self.status_code()).json(json!({
                "error": self.error_code(),
                "message": self.message(),
            }))
        }

        fn status_code(&self) -> StatusCode {
            match *self {
                HttpErrorResponse::InvalidInput(_) | HttpErrorResponse::MissingField(_) => {
                    StatusCode::BAD_REQUEST
                }
                HttpErrorResponse::AuthenticationRequired(_) => StatusCode::UNAUTHORIZED,
                HttpErrorResponse::Conflict(_) => StatusCode::CONFLICT,
                HttpErrorResponse::InternalError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            }
        }
    }
}
