//! Session tokens and password hashing

mod jwt;
mod password;

pub use jwt::{JwtService, SessionClaims};
pub use password::{hash_password, validate_password_strength, verify_password, MIN_PASSWORD_LEN};
