pub mod configuration;
pub mod domain;
pub mod mailchimp_client;
pub mod newsletter;
pub mod routes;
pub mod startup;
pub mod telemetry;
pub mod utils;
