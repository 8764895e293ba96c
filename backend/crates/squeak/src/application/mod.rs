//! Application Layer
//!
//! Use cases and application services.

pub mod authorize;
pub mod config;
pub mod feed;
pub mod login;
pub mod post_squeak;
pub mod register;
pub mod token;

// Re-exports
pub use authorize::AuthorizeUseCase;
pub use config::AuthConfig;
pub use feed::FeedUseCase;
pub use login::{LoginInput, LoginOutput, LoginUseCase};
pub use post_squeak::PostSqueakUseCase;
pub use register::{RegisterInput, RegisterOutput, RegisterUseCase};
pub use token::{IssuedToken, TokenService};
