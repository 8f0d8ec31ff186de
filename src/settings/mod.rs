//! Site-wide settings shared by every page.
//!
//! Footer settings are fetched once per process and fanned out to all
//! subscribers. See [`cache`] for the state machine.

pub mod cache;

pub use cache::{CacheStatus, SettingsCache, Subscription};
