//! Authentication: token issuing and verification, password hashing, and
//! the request gate protecting task routes.

pub mod extractors;
pub mod middleware;
pub mod password;
pub mod token;

pub use extractors::AuthenticatedUserId;
pub use middleware::AuthMiddleware;
pub use password::{hash_password, spawn_hash_password, spawn_verify_password, verify_password};
pub use token::{Claims, JwtService, TokenService};
