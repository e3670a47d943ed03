//! Texpack CLI library.
//!
//! This crate provides the pieces behind the `texpack` binary: loading a
//! scene manifest and its source images from disk, a renderer that serves
//! pre-rendered bakes, and the command implementations.

pub mod commands;
pub mod input;
pub mod renderer;
