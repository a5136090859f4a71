//! Auth domain - verifies the bearer tokens that guard the admin surface
//!
//! Tokens are issued by the hosted auth provider; this service only checks
//! signature, issuer, and expiry, then reads the role and email claims.

pub mod jwt;

pub use jwt::{Claims, JwtService, AUTHENTICATED_ROLE, SERVICE_ROLE};
