// Developer Blog - API Core
//
// Backend for a developer blog: posts with tags and SEO metadata, moderated
// reader comments, and an admin API for authoring. Actions live per-domain
// in domains/*/actions and are served over HTTP from server/.

pub mod common;
pub mod config;
pub mod domains;
pub mod kernel;
pub mod server;

pub use config::*;
