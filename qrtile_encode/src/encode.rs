use image::Rgba;
use tracing::debug;

use qrtile_core::{Content, Ecl, Version};

use crate::code::{DEFAULT_BACKGROUND, DEFAULT_FOREGROUND};
use crate::symbol::{QrcodeSymbolEncoder, SymbolEncoder, SymbolError, SymbolOptions, DEFAULT_MARGIN};
use crate::QrCode;

/// Encoder for a QR code.
///
/// Collects the payload, encoding parameters, and colors, then hands the payload to a
/// [SymbolEncoder] and wraps the result into a [QrCode].
/// # Example
/// ```
/// use qrtile_core::{Ecl, StringContent};
/// use qrtile_encode::Encoder;
/// let code = Encoder::new()
///     .with_content(StringContent::new("Hello, world!"))
///     .with_ecl(Ecl::L)
///     .build()
///     .unwrap();
/// assert_eq!(code.width(), 21 + 2 * 4);
/// ```
pub struct Encoder<E = QrcodeSymbolEncoder> {
    content: Option<Box<dyn Content>>,
    ecl: Ecl,
    version: Option<Version>,
    margin: usize,
    border: bool,
    invert: bool,
    foreground: Rgba<u8>,
    background: Rgba<u8>,
    symbol_encoder: E,
}

impl Encoder {
    /// Construct a new encoder backed by the `qrcode` crate, with default settings.
    pub fn new() -> Self {
        Self::with_symbol_encoder(QrcodeSymbolEncoder)
    }
}

impl Default for Encoder {
    fn default() -> Self {
        Self::new()
    }
}

impl<E: SymbolEncoder> Encoder<E> {
    /// Construct a new encoder delegating symbol generation to `symbol_encoder`.
    pub fn with_symbol_encoder(symbol_encoder: E) -> Self {
        Self {
            content: None,
            ecl: Ecl::H,
            version: None,
            margin: DEFAULT_MARGIN,
            border: true,
            invert: false,
            foreground: DEFAULT_FOREGROUND,
            background: DEFAULT_BACKGROUND,
            symbol_encoder,
        }
    }

    /// Replace the symbol encoder, keeping every other setting.
    pub fn using<F: SymbolEncoder>(self, symbol_encoder: F) -> Encoder<F> {
        Encoder {
            content: self.content,
            ecl: self.ecl,
            version: self.version,
            margin: self.margin,
            border: self.border,
            invert: self.invert,
            foreground: self.foreground,
            background: self.background,
            symbol_encoder,
        }
    }

    /// Set the `content` to encode.
    pub fn with_content<C: Content + 'static>(mut self, content: C) -> Self {
        self.content = Some(Box::new(content));
        self
    }

    /// Whether some content has been set.
    pub fn has_content(&self) -> bool {
        self.content.is_some()
    }

    /// Get the error correction level.
    pub fn ecl(&self) -> Ecl {
        self.ecl
    }

    /// Set the error correction level.
    pub fn with_ecl(mut self, ecl: Ecl) -> Self {
        self.ecl = ecl;
        self
    }

    /// Get the forced version, if any.
    pub fn version(&self) -> Option<Version> {
        self.version
    }

    /// Force the symbol to the specified `version`.
    pub fn with_version(mut self, version: Version) -> Self {
        self.version = Some(version);
        self
    }

    /// Let the symbol encoder pick the smallest version that fits.
    pub fn with_auto_version(mut self) -> Self {
        self.version = None;
        self
    }

    /// Quiet zone, in modules, that the symbol will be built with. Zero when the border is
    /// disabled, whatever margin was set.
    pub fn margin(&self) -> usize {
        if self.border {
            self.margin
        } else {
            0
        }
    }

    /// Set the quiet zone size in modules.
    pub fn with_margin(mut self, margin: usize) -> Self {
        self.margin = margin;
        self
    }

    /// Enable or disable the quiet zone.
    pub fn with_border(mut self, border: bool) -> Self {
        self.border = border;
        self
    }

    /// Disable the quiet zone.
    pub fn without_border(self) -> Self {
        self.with_border(false)
    }

    /// Swap foreground and background in the built code.
    pub fn inverted(mut self, invert: bool) -> Self {
        self.invert = invert;
        self
    }

    /// Set the color of dark modules.
    pub fn with_foreground(mut self, color: Rgba<u8>) -> Self {
        self.foreground = color;
        self
    }

    /// Set the color of light modules.
    pub fn with_background(mut self, color: Rgba<u8>) -> Self {
        self.background = color;
        self
    }

    /// The options handed to the symbol encoder.
    pub fn symbol_options(&self) -> SymbolOptions {
        SymbolOptions {
            ecl: self.ecl,
            version: self.version,
            margin: self.margin(),
        }
    }

    /// Encode the content.
    pub fn build(&self) -> Result<QrCode, EncodingError> {
        let content = self.content.as_ref().ok_or(EncodingError::ContentMissing)?;
        let payload = content.payload();
        let options = self.symbol_options();
        debug!(
            payload_len = payload.len(),
            ecl = %options.ecl,
            version = ?options.version,
            margin = options.margin,
            "encoding payload"
        );
        let matrix = self.symbol_encoder.encode(&payload, &options)?;
        debug!(
            width = matrix.width(),
            height = matrix.height(),
            "symbol encoded"
        );
        Ok(QrCode::new(
            matrix,
            self.invert,
            options.margin,
            self.foreground,
            self.background,
        ))
    }
}

#[derive(Debug, thiserror::Error)]
pub enum EncodingError {
    #[error("no content to encode")]
    ContentMissing,
    #[error(transparent)]
    Symbol(#[from] SymbolError),
}
