//! Bearer-token identity. Tokens are minted by the external identity provider;
//! this module only verifies them.

mod claims;
pub mod extractors;
pub mod jwt;

pub use claims::Claims;
pub use extractors::AuthUser;
pub use jwt::JwtKeys;
