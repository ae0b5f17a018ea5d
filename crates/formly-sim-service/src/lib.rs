pub mod config;
pub mod http;
pub mod logging;
pub mod server;

pub use config::{LogFormat, ServiceConfig};
pub use http::{handle_request, route, AppState, HttpBody};
pub use server::serve;
