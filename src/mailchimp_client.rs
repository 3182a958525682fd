use std::time::Duration;

use anyhow::Context;
use reqwest::Client;
use reqwest::StatusCode;
use reqwest::Url;
use secrecy::ExposeSecret;
use secrecy::Secret;
use serde::Deserialize;
use serde::Serialize;

use crate::configuration::MailchimpCredentials;
use crate::domain::SubscriberEmail;
use crate::domain::SubscriptionStatus;

/// `title` of the problem document Mailchimp returns when the address is
/// already a member of the audience.
const MEMBER_EXISTS: &str = "Member Exists";

/// Thin client for the Mailchimp Marketing API (v3). Only the "add list
/// member" operation is used.
///
/// `Client` holds a connection pool, so a single `MailchimpClient` should be
/// built at startup and shared by all workers.
#[derive(Debug)]
pub struct MailchimpClient {
    http_client: Client,
    /// API root, e.g. `https://us21.api.mailchimp.com/3.0`, without trailing
    /// slash
    base_url: String,
    api_key: Secret<String>,
    audience_id: String,
}

#[derive(thiserror::Error, Debug)]
pub enum MailchimpError {
    /// Connection failure, timeout, or an unreadable response
    #[error("could not reach Mailchimp")]
    Transport(#[from] reqwest::Error),
    #[error("Mailchimp returned {status}: {title} ({detail})")]
    Api {
        status: StatusCode,
        title: String,
        detail: String,
    },
}

/// Mailchimp's error body (RFC 7807 style). Every field is optional so that
/// a malformed body still yields a `MailchimpError::Api`.
#[derive(Deserialize, Default)]
struct ProblemDocument {
    #[serde(default)]
    title: String,
    #[serde(default)]
    detail: String,
}

#[derive(Serialize)]
struct AddListMemberRequest<'a> {
    email_address: &'a str,
    status: &'a str,
}

impl MailchimpClient {
    /// Fails if `base_url` is not a valid url, or if the TLS backend cannot be
    /// initialised.
    pub fn new(
        base_url: &str,
        api_key: Secret<String>,
        audience_id: String,
        timeout: Duration,
    ) -> Result<Self, anyhow::Error> {
        Url::parse(base_url).with_context(|| format!("invalid Mailchimp base url {base_url:?}"))?;

        let http_client = Client::builder()
            .timeout(timeout)
            .build()
            .context("could not build http client")?;

        Ok(Self {
            http_client,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key,
            audience_id,
        })
    }

    pub fn from_credentials(
        creds: MailchimpCredentials,
        timeout: Duration,
    ) -> Result<Self, anyhow::Error> {
        Self::new(&creds.base_url, creds.api_key, creds.audience_id, timeout)
    }

    /// `POST /lists/{audience_id}/members` with status `subscribed`.
    ///
    /// "Member Exists" is reported as `Ok(SubscriptionStatus::Exists)`, so
    /// calling this twice with the same address never fails.
    #[tracing::instrument(
        name = "Adding member to Mailchimp audience",
        skip(self, email),
        fields(audience_id = %self.audience_id)
    )]
    pub async fn add_list_member(
        &self,
        email: &SubscriberEmail,
    ) -> Result<SubscriptionStatus, MailchimpError> {
        let url = format!("{}/lists/{}/members", self.base_url, self.audience_id);
        let body = AddListMemberRequest {
            email_address: email.as_ref(),
            status: "subscribed",
        };

        let resp = self
            .http_client
            .post(url)
            // mailchimp ignores the username; the key is the password
            .basic_auth("synklab", Some(self.api_key.expose_secret()))
            .json(&body)
            .send()
            .await?;

        let status = resp.status();
        if status.is_success() {
            return Ok(SubscriptionStatus::Subscribed);
        }

        let raw = resp.text().await?;
        let problem: ProblemDocument = serde_json::from_str(&raw).unwrap_or_default();

        if problem.title == MEMBER_EXISTS {
            tracing::info!("address already on the list");
            return Ok(SubscriptionStatus::Exists);
        }

        Err(MailchimpError::Api {
            status,
            title: problem.title,
            detail: problem.detail,
        })
    }
}
