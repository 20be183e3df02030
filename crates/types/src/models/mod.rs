//! Shared model utilities

pub mod amount;
pub mod secret_string;

pub use amount::{rescale, AMOUNT_SCALE};
pub use secret_string::SecretString;
