//! Core library for the navis-export command line application.
//!
//! The library turns a Navisworks viewpoint export into a flat comment table
//! plus a diagnostic trace. Responsibilities are kept narrow: the document
//! model lives in [`navis::tools::model`], readers and writers under
//! [`navis::tools::io`], the flattening walk in [`navis::tools::flatten`], and
//! the end-to-end orchestration in [`navis::tools::export`].

pub mod navis;

pub use navis::tools::{Result, ToolError, error, export, flatten, io, model};
