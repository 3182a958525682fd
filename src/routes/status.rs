use actix_web::web;
use actix_web::HttpResponse;
use serde::Serialize;

use crate::newsletter::Newsletter;
use crate::startup::AppEnvironment;

#[derive(Serialize)]
struct Status<'a> {
    name: &'a str,
    environment: &'a str,
    version: &'a str,
    /// `online` iff Mailchimp is configured
    newsletter: &'a str,
}

/// `GET /api/status`
///
/// For operators and uptime monitors; not consulted by the subscription flow.
pub async fn status(
    newsletter: web::Data<Newsletter>,
    environment: web::Data<AppEnvironment>,
) -> HttpResponse {
    HttpResponse::Ok().json(Status {
        name: "SynkLab API",
        environment: &environment.0,
        version: env!("CARGO_PKG_VERSION"),
        newsletter: match newsletter.is_configured() {
            true => "online",
            false => "offline",
        },
    })
}
