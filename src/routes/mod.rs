mod health_check;
mod newsletter;
mod status;

pub use health_check::*;
pub use newsletter::*;
pub use status::*;
