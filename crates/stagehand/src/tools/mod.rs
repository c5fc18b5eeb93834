//! Command implementations behind the dispatcher.

pub mod addressables;
pub mod assets;
pub mod atlas;
pub mod package;
