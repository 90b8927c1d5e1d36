pub mod auth;
pub mod cors;
pub mod session;
pub mod valid_body;

pub use auth::*;
pub use cors::*;
pub use session::*;
pub use valid_body::*;
