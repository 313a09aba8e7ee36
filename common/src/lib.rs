#![warn(missing_docs)]

//! `webpinspect-common` is a common library shared by the `webpinspect` crates.
//!
//! It provides the [`Report`] error wrapper used to trace exactly where in a parser an error occurred, the macros used
//! to construct such reports, and the [`FourCC`](parse::FourCC) chunk tag type.

#[macro_use]
pub mod macros;

pub mod error;
pub mod parse;

//
// public types
//

pub use error::{Report, Result, ResultExt};
