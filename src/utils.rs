use actix_web::http::StatusCode;
use actix_web::HttpRequest;
use actix_web::HttpResponse;
use serde::Serialize;

/// Body of every non-2xx response: `{"error": "..."}`
#[derive(Serialize)]
struct ErrorBody<'a> {
    error: &'a str,
}

/// Body of every 2xx response from `/api/newsletter`: `{"message": "..."}`
#[derive(Serialize)]
struct MessageBody<'a> {
    message: &'a str,
}

pub fn json_error(
    status: StatusCode,
    error: &str,
) -> HttpResponse {
    HttpResponse::build(status).json(ErrorBody { error })
}

pub fn json_message(message: &str) -> HttpResponse { HttpResponse::Ok().json(MessageBody { message }) }

/// Default service of every resource: the path exists, but not for this
/// method.
pub async fn method_not_allowed() -> HttpResponse {
    json_error(StatusCode::METHOD_NOT_ALLOWED, "Method Not Allowed")
}

/// Default service of the whole app
pub async fn not_found(req: HttpRequest) -> HttpResponse {
    #[derive(Serialize)]
    struct NotFound<'a> {
        error: &'a str,
        path: &'a str,
    }

    HttpResponse::NotFound().json(NotFound {
        error: "Not Found",
        path: req.path(),
    })
}

/// Write an error followed by every `source` in its chain, one per line. Used
/// as the `Debug` impl of our error enums, so that `TracingLogger` and
/// `error.cause_chain` fields capture the root cause.
pub fn error_chain_fmt(
    e: &impl std::error::Error,
    f: &mut std::fmt::Formatter<'_>,
) -> std::fmt::Result {
    writeln!(f, "{}\n", e)?;
    let mut current = e.source();
    while let Some(cause) = current {
        writeln!(f, "Caused by:\n\t{}", cause)?;
        current = cause.source();
    }
    Ok(())
}
