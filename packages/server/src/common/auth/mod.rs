// Authorization errors shared by the JWT middleware and admin routes

mod errors;

pub use errors::AuthError;
