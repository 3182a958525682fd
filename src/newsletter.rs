use std::fmt::Debug;

use crate::configuration::MailchimpSettings;
use crate::domain::SubscriberEmail;
use crate::domain::SubscriptionStatus;
use crate::mailchimp_client::MailchimpClient;
use crate::mailchimp_client::MailchimpError;
use crate::utils::error_chain_fmt;

/// Newsletter signups, gated on Mailchimp being configured. Built once at
/// startup and never mutated afterwards.
pub struct Newsletter {
    client: Option<MailchimpClient>,
}

#[derive(thiserror::Error)]
pub enum SubscriptionError {
    #[error("Mailchimp is not configured")]
    ConfigurationError,
    #[error("Mailchimp request failed")]
    ProviderError(#[source] MailchimpError),
}

impl Debug for SubscriptionError {
    fn fmt(
        &self,
        f: &mut std::fmt::Formatter<'_>,
    ) -> std::fmt::Result {
        error_chain_fmt(self, f)
    }
}

impl Newsletter {
    /// Never fails: missing or unusable credentials leave the newsletter
    /// offline, with a warning.
    pub fn from_settings(cfg: &MailchimpSettings) -> Self {
        let Some(creds) = cfg.credentials() else {
            tracing::warn!(
                "Mailchimp is not fully configured. Set APP_MAILCHIMP__API_KEY, \
                 APP_MAILCHIMP__SERVER_PREFIX and APP_MAILCHIMP__AUDIENCE_ID to enable \
                 newsletter signups."
            );
            return Self::offline();
        };

        match MailchimpClient::from_credentials(creds, cfg.timeout()) {
            Ok(client) => Self::with_client(client),
            Err(e) => {
                tracing::warn!(
                    error.cause_chain=?e,
                    error.message=%e,
                    "Mailchimp client could not be built; newsletter signups disabled"
                );
                Self::offline()
            }
        }
    }

    pub fn with_client(client: MailchimpClient) -> Self {
        Self {
            client: Some(client),
        }
    }

    pub fn offline() -> Self { Self { client: None } }

    pub fn is_configured(&self) -> bool { self.client.is_some() }

    #[tracing::instrument(name = "Subscribing to newsletter", skip(self))]
    pub async fn subscribe(
        &self,
        email: &SubscriberEmail,
    ) -> Result<SubscriptionStatus, SubscriptionError> {
        let client = self
            .client
            .as_ref()
            .ok_or(SubscriptionError::ConfigurationError)?;
        client
            .add_list_member(email)
            .await
            .map_err(SubscriptionError::ProviderError)
    }
}
