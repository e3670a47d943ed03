//! CLI command implementations

pub mod classify;
pub mod fix_names;
pub mod pack;
pub mod validate;
