//! Configuration for the listening session and command matcher.
//!
//! Provides `AppConfig` (top-level settings), sub-configs per subsystem,
//! `AppPaths` for cross-platform data directories, and TOML persistence via
//! `AppConfig::load` / `AppConfig::save`.

pub mod paths;
pub mod settings;

pub use paths::AppPaths;
pub use settings::{AppConfig, ListenerConfig, MatcherConfig, SttConfig};
