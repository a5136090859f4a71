// HTTP routes
pub mod admin;
pub mod comments;
pub mod extract;
pub mod health;
pub mod media;
pub mod posts;
pub mod response;
pub mod tags;

pub use admin::*;
pub use comments::*;
pub use extract::{ApiJson, ApiQuery};
pub use health::*;
pub use media::*;
pub use posts::*;
pub use response::ApiResponse;
pub use tags::*;
