//! Request-side processing stages.
//!
//! - **decode**: sniff, decode, and normalize uploaded image bytes

pub mod decode;

pub use decode::{DecodedImage, ImageDecoder};
