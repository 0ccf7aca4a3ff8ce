//! Mask compilation and address matching.
//!
//! Masks follow the address grouping grammar (`S-XXXX-XXXX-XXXX-XXXXX`)
//! with wildcards at character positions:
//! - `?` any character
//! - `#` digits 2-9
//! - `@` any letter or digit
//! - `-`/`+` structural separators

mod mask;

pub use mask::{Mask, MaskError};
