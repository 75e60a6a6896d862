//! Cookie serialization for the `Set-Cookie` response header.

pub mod codec;

pub use codec::{CookieError, CookieOptions, CookieValue, SameSite};
