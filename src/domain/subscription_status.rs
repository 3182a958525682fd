/// Outcome of a successful subscribe call. Adding an address that is already
/// on the list is not an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubscriptionStatus {
    Subscribed,
    Exists,
}

impl SubscriptionStatus {
    /// Message returned to the browser
    pub fn message(&self) -> &'static str {
        match self {
            Self::Subscribed => "Successfully subscribed.",
            Self::Exists => "You are already on the list.",
        }
    }
}
