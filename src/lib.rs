pub mod api;
pub mod config;
pub mod http;
pub mod runtime;

pub use api::{Answer, RequestClient};
pub use config::Config;
pub use http::{ErrorCategory, RequestError};
