//! Data transfer objects for the web API.

mod response;

pub use response::*;
