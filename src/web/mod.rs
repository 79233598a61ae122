//! HTTP surface
//!
//! A deliberately small API: GET / triggers one acquisition and returns the
//! OTP as the body. TLS termination belongs to a reverse proxy in front.

mod auth;
mod handlers;
mod routes;

pub use auth::AUTH_TOKEN_HEADER;
pub use routes::create_router;
