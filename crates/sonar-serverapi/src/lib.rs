//! Typed client for the SonarQube Server and SonarQube Cloud web APIs.
//!
//! The layering is deliberate: [`http::HttpClient`] owns the connection
//! pool and redirect policy, [`helper::ServerApiHelper`] adds endpoint
//! resolution and failure classification, and the modules under [`api`]
//! map typed parameters onto individual endpoints. [`api::ServerApi`]
//! bundles the resource clients behind one facade.

pub mod api;
pub mod error;
pub mod helper;
pub mod http;
pub mod paging;
pub mod url;
pub mod version;

pub use api::ServerApi;
pub use error::ServerApiError;
pub use helper::{EndpointParams, ServerApiHelper};
pub use http::{HttpClient, Response};
pub use paging::Paging;
pub use version::Version;
