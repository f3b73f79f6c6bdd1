use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use error_stack::Report;
use kernel::interface::schema::Violations;
use kernel::{ErrorMessage, KernelError};
use serde::Serialize;
use std::process::{ExitCode, Termination};

#[derive(Debug)]
pub struct StackTrace(Report<KernelError>);

impl From<Report<KernelError>> for StackTrace {
    fn from(e: Report<KernelError>) -> Self {
        StackTrace(e)
    }
}

impl Termination for StackTrace {
    fn report(self) -> ExitCode {
        self.0.report()
    }
}

#[derive(Debug)]
pub struct ErrorStatus(Report<KernelError>);

impl ErrorStatus {
    pub fn not_found(message: impl Into<String>) -> Self {
        Self(Report::new(KernelError::NotFound).attach_printable(ErrorMessage::new(message)))
    }
}

impl From<Report<KernelError>> for ErrorStatus {
    fn from(e: Report<KernelError>) -> Self {
        ErrorStatus(e)
    }
}

impl From<JsonRejection> for ErrorStatus {
    fn from(rejection: JsonRejection) -> Self {
        ErrorStatus(
            Report::new(KernelError::Validation)
                .attach_printable(ErrorMessage::new(rejection.body_text())),
        )
    }
}

#[derive(Debug, Serialize)]
struct ErrorBody<M> {
    error: ErrorDetail<M>,
}

#[derive(Debug, Serialize)]
struct ErrorDetail<M> {
    message: M,
}

impl<M: Serialize> ErrorBody<M> {
    fn new(message: M) -> Json<Self> {
        Json(Self {
            error: ErrorDetail { message },
        })
    }
}

impl IntoResponse for ErrorStatus {
    fn into_response(self) -> axum::response::Response {
        let report = self.0;
        let context = *report.current_context();
        let message = || {
            report
                .downcast_ref::<ErrorMessage>()
                .map(ToString::to_string)
                .unwrap_or_else(|| context.to_string())
        };
        match context {
            KernelError::Validation => {
                tracing::debug!("rejected invalid input: {report:?}");
                let messages = report
                    .downcast_ref::<Violations>()
                    .map(Violations::messages)
                    .unwrap_or_else(|| vec![message()]);
                (StatusCode::BAD_REQUEST, ErrorBody::new(messages)).into_response()
            }
            KernelError::NotFound => {
                tracing::debug!("{}", message());
                (StatusCode::NOT_FOUND, ErrorBody::new(message())).into_response()
            }
            KernelError::Conflict => {
                tracing::info!("{}", message());
                (StatusCode::CONFLICT, ErrorBody::new(message())).into_response()
            }
            KernelError::Timeout | KernelError::Internal => {
                tracing::error!("{report:?}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorBody::new("Internal Server Error"),
                )
                    .into_response()
            }
        }
    }
}
