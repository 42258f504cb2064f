//! Command implementations for pacfall CLI

pub mod check;
pub mod completions;
pub mod helpers;
pub mod install;
pub mod search;
pub mod version;
