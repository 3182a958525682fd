use std::fmt::Debug;

use actix_web::http::StatusCode;
use actix_web::web;
use actix_web::HttpResponse;
use actix_web::ResponseError;
use serde::Deserialize;

use crate::domain::SubscriberEmail;
use crate::newsletter::Newsletter;
use crate::newsletter::SubscriptionError;
use crate::utils::error_chain_fmt;
use crate::utils::json_error;
use crate::utils::json_message;

#[derive(Deserialize)]
pub struct SubscriptionRequest {
    email: String,
}

/// Everything that can go wrong in `subscribe`. The `Display` string is sent
/// to the browser as-is; the sources are only ever logged.
#[derive(thiserror::Error)]
pub enum SubscribeError {
    #[error("A valid email address is required.")]
    ValidationError(#[source] anyhow::Error),
    #[error("Newsletter signup is temporarily unavailable.")]
    Unavailable,
    #[error("Unable to subscribe right now. Please try again later.")]
    UpstreamError(#[source] anyhow::Error),
}

impl Debug for SubscribeError {
    fn fmt(
        &self,
        f: &mut std::fmt::Formatter<'_>,
    ) -> std::fmt::Result {
        error_chain_fmt(self, f)
    }
}

impl ResponseError for SubscribeError {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::ValidationError(_) => StatusCode::BAD_REQUEST,
            Self::Unavailable => StatusCode::SERVICE_UNAVAILABLE,
            Self::UpstreamError(_) => StatusCode::BAD_GATEWAY,
        }
    }

    fn error_response(&self) -> HttpResponse { json_error(self.status_code(), &self.to_string()) }
}

impl From<SubscriptionError> for SubscribeError {
    fn from(e: SubscriptionError) -> Self {
        match e {
            SubscriptionError::ConfigurationError => Self::Unavailable,
            SubscriptionError::ProviderError(e) => {
                Self::UpstreamError(anyhow::Error::new(e).context("could not add list member"))
            }
        }
    }
}

/// `POST /api/newsletter`
///
/// Order matters: the body is validated before the configuration is
/// consulted, and Mailchimp is only called once both pass.
///
/// # Request example
///
/// ```sh
///     curl -i -H 'Content-Type: application/json' -d '{"email":"john@foo.com"}' http://127.0.0.1:4000/api/newsletter
/// ```
///
/// # Arguments
///
/// `body` is taken as a `Result` so that a missing body, invalid JSON, a
/// missing `email` or a non-string `email` all produce our JSON 400 instead of
/// actix's plain-text one.
#[tracing::instrument(
    name = "Adding newsletter subscriber",
    skip(body, newsletter),
    fields(subscriber_email = tracing::field::Empty)
)]
pub async fn subscribe(
    body: Result<web::Json<SubscriptionRequest>, actix_web::Error>,
    newsletter: web::Data<Newsletter>,
) -> Result<HttpResponse, SubscribeError> {
    // `actix_web::Error` is not `Send`, so only its message is kept
    let body = body.map_err(|e| {
        SubscribeError::ValidationError(anyhow::anyhow!("could not parse request body: {e}"))
    })?;

    let email = SubscriberEmail::parse(body.0.email)
        .map_err(|e| SubscribeError::ValidationError(anyhow::anyhow!(e)))?;
    tracing::Span::current().record("subscriber_email", tracing::field::display(&email));

    if !newsletter.is_configured() {
        return Err(SubscribeError::Unavailable);
    }

    let status = newsletter.subscribe(&email).await.map_err(|e| {
        let e = SubscribeError::from(e);
        if let SubscribeError::UpstreamError(ref cause) = e {
            tracing::error!(
                error.cause_chain=?cause,
                error.message=%cause,
                "Mailchimp error"
            );
        }
        e
    })?;

    Ok(json_message(status.message()))
}
