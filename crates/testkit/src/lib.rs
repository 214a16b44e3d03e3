#![warn(missing_docs)]
//! Test surfaces: scene builders and a JSONL target trace.

mod scene;
mod trace;

pub use scene::*;
pub use trace::*;
