//! Authentication utilities

mod shared_secret;

pub use shared_secret::SharedSecret;
