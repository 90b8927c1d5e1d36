pub mod token;

pub use token::{Authenticator, TokenAuthenticator, TokenServiceConfig};
