//! Custom folder icons for Windows Explorer.
//!
//! A folder is given an icon by placing `folder.ico` (or `folder.png`, which
//! is converted) inside it. [`Reconciler`] checks the icon has every size
//! Explorer asks for, rebuilds it from the PNG when it doesn't, writes
//! `desktop.ini` and marks the folder and descriptor with the attributes the
//! shell looks for.
//!
//! File attribute changes go through [`FileAttributes`] so the reconciler
//! itself runs on any platform.

mod attributes;
mod batch;
mod descriptor;
mod error;
mod reconciler;
mod report;

pub use attributes::*;
pub use batch::*;
pub use descriptor::*;
pub use error::*;
pub use reconciler::*;
pub use report::*;
