//! Portphelia - portfolio cards for a signed-in user
//!
//! Two stores over synchronous key-value storage: an auth store holding the
//! (simulated) session and a card store holding the current user's cards.

pub mod app;
pub mod auth;
pub mod cards;
pub mod cli;
pub mod clock;
pub mod config;
pub mod error;
pub mod navigation;
pub mod storage;

#[cfg(test)]
mod test_utils;

pub use app::App;
pub use cli::Args;
