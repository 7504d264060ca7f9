//! Building blocks shared by the `qrtile` crates: the module grid of a symbol, QR versions and
//! error correction levels, payload formatters, and the atlas of structural modules.

mod content;
mod matrix;
mod meta;
mod structure;

pub use content::{BytesContent, Content, SecurityType, StringContent, UnknownSecurityType, WifiContent};
pub use matrix::BitMatrix;
pub use meta::{Ecl, Version};
pub use structure::StructureAtlas;
