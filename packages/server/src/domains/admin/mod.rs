//! Admin domain - the dashboard overview

pub mod actions;

pub use actions::{dashboard, Dashboard};
