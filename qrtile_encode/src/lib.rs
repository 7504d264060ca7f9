//! Encoding and rendering of QR codes.
//!
//! An [Encoder] turns some [Content](qrtile_core::Content) into a [QrCode], which can then be
//! rendered as text for a terminal or as an image, optionally with decorative blocks in place of
//! dark modules.

mod code;
mod encode;
mod raster;
mod render;
mod symbol;

pub use code::{QrCode, DEFAULT_BACKGROUND, DEFAULT_FOREGROUND};
pub use encode::{Encoder, EncodingError};
pub use raster::{rasterize, ColorBlock, Decorated, Sampler};
pub use render::{Block, PatternBlock, SolidBlock};
pub use symbol::{QrcodeSymbolEncoder, SymbolEncoder, SymbolError, SymbolOptions, DEFAULT_MARGIN};
