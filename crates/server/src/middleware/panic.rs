//! Convert handler panics into JSON 500 responses.

use std::any::Any;

use axum::{
    Json,
    body::Body,
    http::{Response, StatusCode},
    response::IntoResponse,
};
use tower_http::catch_panic::{CatchPanicLayer, ResponseForPanic};

use crate::error::ErrorBody;

/// Panic responder; the panic message is shown only in development.
#[derive(Debug, Clone, Copy)]
pub struct PanicResponder {
    expose_message: bool,
}

impl ResponseForPanic for PanicResponder {
    type ResponseBody = Body;

    fn response_for_panic(&mut self, err: Box<dyn Any + Send + 'static>) -> Response<Body> {
        let detail = panic_message(err.as_ref());
        tracing::error!(panic = detail, "Handler panicked");

        let message = if self.expose_message {
            detail.to_string()
        } else {
            "Something went wrong".to_string()
        };

        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ErrorBody {
                error: "Internal Server Error",
                message,
            }),
        )
            .into_response()
    }
}

fn panic_message(err: &(dyn Any + Send)) -> &str {
    err.downcast_ref::<String>()
        .map(String::as_str)
        .or_else(|| err.downcast_ref::<&'static str>().copied())
        .unwrap_or("unknown panic")
}

/// Layer catching panics anywhere below it.
#[must_use]
pub fn catch_panic_layer(development: bool) -> CatchPanicLayer<PanicResponder> {
    CatchPanicLayer::custom(PanicResponder {
        expose_message: development,
    })
}
