use actix_web::HttpResponse;

/// `GET /health_check`
///
/// Liveness probe for the load balancer; always 200 with an empty body, even
/// when the newsletter is offline (see `/api/status` for that).
pub async fn health_check() -> HttpResponse { HttpResponse::Ok().finish() }
