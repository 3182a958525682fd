mod subscriber_email;
mod subscription_status;
// allow external `use` statements to skip `subscriber_email` etc
pub use subscriber_email::SubscriberEmail;
pub use subscription_status::SubscriptionStatus;
