use once_cell::sync::Lazy;
use secrecy::Secret;
use synklab::configuration::get_configuration;
use synklab::configuration::Settings;
use synklab::startup::Application;
use synklab::telemetry::get_subscriber;
use synklab::telemetry::init_subscriber;
use wiremock::MockServer;

/// Init the tracing subscriber once per test binary.
///
/// To opt in to verbose logging, use the env var `TEST_LOG`:
///
/// ```sh
///      TEST_LOG=true cargo test [test_name] | bunyan
/// ```
static TRACING: Lazy<()> = Lazy::new(|| {
    // the two sinks are different types, hence two arms
    match std::env::var("TEST_LOG") {
        Ok(_) => init_subscriber(get_subscriber("test", "debug", std::io::stdout)),
        Err(_) => init_subscriber(get_subscriber("test", "debug", std::io::sink)),
    };
});

pub const AUDIENCE_ID: &str = "test-audience";
pub const MEMBERS_PATH: &str = "/lists/test-audience/members";

pub struct TestApp {
    pub addr: String,
    /// Stands in for the Mailchimp API. Unused (but still running) when the app
    /// was spawned without credentials.
    pub mailchimp_server: MockServer,
    pub api_client: reqwest::Client,
}

impl TestApp {
    /// `POST /api/newsletter` with a JSON body
    pub async fn post_newsletter(
        &self,
        body: &serde_json::Value,
    ) -> reqwest::Response {
        self.api_client
            .post(format!("{}/api/newsletter", self.addr))
            .json(body)
            .send()
            .await
            .expect("execute request")
    }

    /// `POST /api/newsletter` with an arbitrary body and content type
    pub async fn post_newsletter_raw(
        &self,
        body: &str,
        content_type: &str,
    ) -> reqwest::Response {
        self.api_client
            .post(format!("{}/api/newsletter", self.addr))
            .header("Content-Type", content_type)
            .body(body.to_owned())
            .send()
            .await
            .expect("execute request")
    }

    pub async fn request(
        &self,
        method: reqwest::Method,
        path: &str,
    ) -> reqwest::Response {
        self.api_client
            .request(method, format!("{}{path}", self.addr))
            .send()
            .await
            .expect("execute request")
    }

    pub async fn get_status(&self) -> reqwest::Response { self.request(reqwest::Method::GET, "/api/status").await }
}

/// Spawn the app with Mailchimp credentials pointing at a `MockServer`.
pub async fn spawn_app() -> TestApp {
    spawn(|cfg, mailchimp_uri| {
        cfg.mailchimp.api_key = Some(Secret::new("test-key-us21".to_string()));
        cfg.mailchimp.server_prefix = Some("us21".to_string());
        cfg.mailchimp.audience_id = Some(AUDIENCE_ID.to_string());
        cfg.mailchimp.base_url = Some(mailchimp_uri.to_string());
    })
    .await
}

/// Spawn the app with no Mailchimp credentials at all, i.e. newsletter offline.
pub async fn spawn_app_without_mailchimp() -> TestApp {
    spawn(|cfg, mailchimp_uri| {
        cfg.mailchimp.api_key = None;
        cfg.mailchimp.server_prefix = None;
        cfg.mailchimp.audience_id = None;
        // even if something tried to call out, it would hit the mock
        cfg.mailchimp.base_url = Some(mailchimp_uri.to_string());
    })
    .await
}

async fn spawn(configure: impl FnOnce(&mut Settings, &str)) -> TestApp {
    Lazy::force(&TRACING);

    let mailchimp_server = MockServer::start().await;

    let cfg = {
        let mut cfg = get_configuration().expect("read configuration");
        // port 0: the OS assigns a random free port
        cfg.application.port = 0;
        cfg.application.host = "127.0.0.1".to_string();
        // short enough for the timeout test to be quick
        cfg.mailchimp.timeout_milliseconds = 500;
        configure(&mut cfg, &mailchimp_server.uri());
        cfg
    };

    let app = Application::build(cfg).await.expect("build application");
    let addr = format!("http://127.0.0.1:{}", app.get_port());
    tokio::spawn(app.run_until_stopped());

    TestApp {
        addr,
        mailchimp_server,
        api_client: reqwest::Client::new(),
    }
}
