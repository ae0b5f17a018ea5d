pub mod error;
pub mod request;
pub mod response;
pub mod scoring;
pub mod service;


pub use error::*;
pub use request::*;
pub use response::*;
pub use scoring::*;
pub use service::*;
