pub mod session;
pub mod token;

pub use session::RequestSession;
pub use token::{AuthTokens, AuthUser, TokenData, TokenType};
