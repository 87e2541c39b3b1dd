//! ResoView: a local gallery for imported image folders.
//!
//! Images are grouped into folders by their directory, previewed from memory
//! for the current session, and tracked in a metadata-only manifest that
//! survives restarts. Accounts and the session are plain JSON documents.

pub mod app;
pub mod config;
pub mod error;
pub mod media;
pub mod state;

pub use app::App;
pub use config::Config;
pub use error::{AppError, Result};
