use std::fmt::Display;

#[derive(Debug, Clone, PartialEq, Eq)]
/// A trimmed address containing an `@`. Deliberately lenient: anything
/// stricter is left to Mailchimp, which rejects bad addresses itself.
///
/// Must be instantiated with `SubscriberEmail::parse`.
pub struct SubscriberEmail(String);

impl SubscriberEmail {
    pub fn parse(email: String) -> Result<Self, String> {
        let trimmed = email.trim();
        trimmed
            .contains('@')
            .then(|| Self(trimmed.to_string()))
            .ok_or_else(|| format!("Invalid email: {email:?}"))
    }
}

impl AsRef<str> for SubscriberEmail {
    fn as_ref(&self) -> &str { &self.0 }
}

impl Display for SubscriberEmail {
    fn fmt(
        &self,
        f: &mut std::fmt::Formatter<'_>,
    ) -> std::fmt::Result {
        self.0.fmt(f)
    }
}
