//! Voice commands: the serializable command table and the delta-based
//! matcher that scans transcript updates against it.

pub mod matcher;
pub mod table;

pub use matcher::{CommandAction, CommandHit, CommandMatcher, VoiceCommand};
pub use table::{default_specs, CommandCategory, CommandSpec, CommandTable};
