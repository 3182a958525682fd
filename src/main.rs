use synklab::configuration::get_configuration;
use synklab::startup::Application;
use synklab::telemetry::get_subscriber;
use synklab::telemetry::init_subscriber;

/// Initialise telemetry, load config, and start the server
#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    // RUST_LOG overrides the default level
    let subscriber = get_subscriber("synklab", "info", std::io::stdout);
    init_subscriber(subscriber);

    let cfg = get_configuration()?;
    tracing::info!(
        host = %cfg.application.host,
        port = cfg.application.port,
        environment = %cfg.application.environment,
        "starting SynkLab API"
    );

    let app = Application::build(cfg).await?;
    app.run_until_stopped().await?;
    Ok(())
}
