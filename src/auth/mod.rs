//! Simulated sign-in.
//!
//! There is no credential database: any non-empty username with a long
//! enough password signs in. The store only tracks who is signed in and
//! keeps that across page loads through key-value storage.

pub mod store;

pub use store::{AuthStore, LoginCredentials, Registration, User, DEFAULT_MIN_PASSWORD_LENGTH};
