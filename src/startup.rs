use std::net::TcpListener;

use actix_web::dev::Server;
use actix_web::web;
use actix_web::web::Data;
use actix_web::App;
use actix_web::HttpServer;
use tracing_actix_web::TracingLogger;

use crate::configuration::Settings;
use crate::newsletter::Newsletter;
use crate::routes::health_check;
use crate::routes::status;
use crate::routes::subscribe;
use crate::utils::method_not_allowed;
use crate::utils::not_found;

/// Wrapper for actix's `Server` with access to the bound port. Not to be
/// confused with actix's `App`!
pub struct Application {
    /// Left private; use `get_port` to access
    port: u16,
    server: Server,
}

impl Application {
    /// Bind the listener and build the `Newsletter` from `cfg`. Missing
    /// Mailchimp credentials are not an error here.
    pub async fn build(cfg: Settings) -> Result<Self, anyhow::Error> {
        let addr = format!("{}:{}", cfg.application.host, cfg.application.port);
        let listener = TcpListener::bind(addr)?;

        // port 0 means the OS picked one; keep it for tests
        let port = listener.local_addr()?.port();

        let newsletter = Newsletter::from_settings(&cfg.mailchimp);

        let server = run(
            listener,
            newsletter,
            AppEnvironment(cfg.application.environment),
        )?;

        Ok(Self { port, server })
    }

    pub fn get_port(&self) -> u16 { self.port }

    /// Because this consumes `self`, this should be the final function call (or
    /// passed to `tokio::spawn`)
    pub async fn run_until_stopped(self) -> Result<(), std::io::Error> { self.server.await }
}

/// Wrapper for the `APP_ENVIRONMENT` name (because raw `String`s may conflict
/// with one another when passed around by `Data`)
pub struct AppEnvironment(pub String);

/// The server is not responsible for binding to an address, it only listens to
/// an already bound address.
///
/// Declares all API endpoints.
pub fn run(
    listener: TcpListener,
    newsletter: Newsletter,
    environment: AppEnvironment,
) -> Result<Server, anyhow::Error> {
    // `Data` is an `Arc`; every worker gets a clone of the same read-only
    // `Newsletter` (and thus the same `reqwest` connection pool)
    let newsletter = Data::new(newsletter);
    let environment = Data::new(environment);

    // the closure runs once per worker
    let server = HttpServer::new(move || {
        App::new()
            .wrap(TracingLogger::default())
            .service(
                web::resource("/health_check")
                    .route(web::get().to(health_check))
                    .default_service(web::to(method_not_allowed)),
            )
            .service(
                web::resource("/api/newsletter")
                    .route(web::post().to(subscribe))
                    .default_service(web::to(method_not_allowed)),
            )
            .service(
                web::resource("/api/status")
                    .route(web::get().to(status))
                    .default_service(web::to(method_not_allowed)),
            )
            .default_service(web::to(not_found))
            .app_data(newsletter.clone())
            .app_data(environment.clone())
    })
    .listen(listener)?
    .run();

    Ok(server)
}
