/// State management module
///
/// This module handles all application state, including:
/// - The JSON document store (store.rs)
/// - Shared data structures (data.rs)
/// - Accounts and the active session (credentials.rs, session.rs)
/// - The media registry and its persisted manifest (registry.rs, projector.rs)

pub mod credentials;
pub mod data;
pub mod projector;
pub mod registry;
pub mod session;
pub mod store;
