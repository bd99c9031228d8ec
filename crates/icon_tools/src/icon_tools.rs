//! PNG to ICO conversion and web favicon set generation.
//!
//! This crate is the shared image capability used by the converter front end
//! and by the folder icon reconciler:
//! - Multi-resolution ICO encoding and inspection of embedded frame widths
//! - Single-file and batch PNG → ICO conversion
//! - Favicon set assembly (ICO, PNG variants, web manifest, HTML snippet)
//!
//! Every operation is synchronous and runs to completion on the caller's thread.

mod color;
mod container;
mod convert;
mod error;
mod favicon;
mod sizes;

pub use color::*;
pub use container::*;
pub use convert::*;
pub use error::*;
pub use favicon::*;
pub use sizes::*;
