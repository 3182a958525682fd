use std::env;
use std::env::current_dir;
use std::fmt::Display;
use std::time::Duration;

use config::Config;
use config::ConfigError;
use secrecy::ExposeSecret;
use secrecy::Secret;
use serde::Deserialize;
use serde_aux::field_attributes::deserialize_number_from_string;

/// Global configuration, loaded from `configuration/*.yaml` and `APP_*` env
/// vars. See `get_configuration`.
#[derive(Clone, Deserialize)]
pub struct Settings {
    pub application: ApplicationSettings,
    pub mailchimp: MailchimpSettings,
}

/// Server configuration
#[derive(Clone, Deserialize)]
pub struct ApplicationSettings {
    /// Should be localhost on dev machine, 0.0.0.0 on prod
    pub host: String,

    #[serde(deserialize_with = "deserialize_number_from_string")]
    pub port: u16,

    /// Not read from the yaml files; filled in from `APP_ENVIRONMENT` by
    /// `get_configuration`, and reported by `/api/status`.
    #[serde(default)]
    pub environment: String,
}

/// Mailing list provider configuration. Every credential is optional: the
/// server still starts without them, it just reports the newsletter as
/// offline.
#[derive(Clone, Deserialize)]
pub struct MailchimpSettings {
    pub api_key: Option<Secret<String>>,

    /// Datacenter prefix, e.g. `us21`; the last segment of the API key.
    pub server_prefix: Option<String>,

    /// Id of the audience (list) that new members are added to
    pub audience_id: Option<String>,

    /// Overrides the API root derived from `server_prefix`. Only meant for
    /// pointing the client at a mock server.
    pub base_url: Option<String>,

    #[serde(deserialize_with = "deserialize_number_from_string")]
    pub timeout_milliseconds: u64,
}

/// The subset of `MailchimpSettings` that must be present before any request
/// is sent to Mailchimp.
#[derive(Clone, Debug)]
pub struct MailchimpCredentials {
    pub api_key: Secret<String>,
    pub base_url: String,
    pub audience_id: String,
}

/// Env vars set to `""` count as absent.
fn non_empty(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

impl MailchimpSettings {
    /// `None` unless the api key, server prefix and audience id are all set.
    pub fn credentials(&self) -> Option<MailchimpCredentials> {
        let api_key = non_empty(self.api_key.as_ref().map(|k| k.expose_secret().as_str()))?;
        // the prefix becomes part of the host name, so it must not be able to
        // smuggle in a path, fragment or other host
        let server_prefix = non_empty(self.server_prefix.as_deref())
            .filter(|p| p.chars().all(|c| c.is_ascii_alphanumeric()))?;
        let audience_id = non_empty(self.audience_id.as_deref())?;

        let base_url = match non_empty(self.base_url.as_deref()) {
            Some(url) => url.to_string(),
            None => format!("https://{server_prefix}.api.mailchimp.com/3.0"),
        };

        Some(MailchimpCredentials {
            api_key: Secret::new(api_key.to_string()),
            base_url,
            audience_id: audience_id.to_string(),
        })
    }

    pub fn timeout(&self) -> Duration { Duration::from_millis(self.timeout_milliseconds) }
}

pub enum Environment {
    Local,
    Production,
}

impl Display for Environment {
    fn fmt(
        &self,
        f: &mut std::fmt::Formatter<'_>,
    ) -> std::fmt::Result {
        write!(
            f,
            "{}",
            match self {
                Environment::Local => "local",
                Environment::Production => "production",
            }
        )
    }
}

impl TryFrom<String> for Environment {
    type Error = String;
    fn try_from(value: String) -> Result<Self, Self::Error> {
        match value.to_lowercase().as_str() {
            "local" => Ok(Self::Local),
            "production" => Ok(Self::Production),
            e => Err(format!(
                "{e} is not a supported environment. Use either `local` or `production`"
            )),
        }
    }
}

/// Load yaml configuration files at `<project_root>/configuration`, then
/// overlay `APP_*` env vars.
///
/// `application` fields must be present, otherwise initialisation fails and
/// the server will not start. `mailchimp` credentials may be missing.
pub fn get_configuration() -> Result<Settings, ConfigError> {
    let cfg_dir = current_dir()
        .map_err(|e| ConfigError::Message(format!("could not get current dir: {e}")))?
        .join("configuration");

    let env: Environment = env::var("APP_ENVIRONMENT")
        .unwrap_or_else(|_| "local".to_string())
        .try_into()
        .map_err(ConfigError::Message)?;

    let settings = Config::builder()
        .add_source(config::File::from(cfg_dir.join("base.yaml")))
        .add_source(config::File::from(cfg_dir.join(format!("{env}.yaml"))))
        .add_source(
            // env vars are always strings, hence `serde-aux` on numeric fields.
            //
            // `APP_MAILCHIMP__API_KEY=...` -> `Settings.mailchimp.api_key`
            config::Environment::with_prefix("APP")
                .prefix_separator("_")
                .separator("__"),
        )
        .set_override("application.environment", env.to_string())?
        .build()?;

    settings.try_deserialize::<Settings>()
}
