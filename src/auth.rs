//! Origin keys, token values, and the cached token model.

pub mod origin;
pub mod secret;
pub mod token;

pub use origin::*;
pub use secret::*;
pub use token::*;
