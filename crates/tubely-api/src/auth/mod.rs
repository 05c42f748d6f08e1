//! Bearer-token authentication.

pub mod jwt;
pub mod models;

pub use jwt::{Claims, JwtService};
pub use models::AuthUser;
