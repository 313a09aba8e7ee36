//! Parsing types shared between chunk formats.

mod fourcc;

pub use fourcc::FourCC;
