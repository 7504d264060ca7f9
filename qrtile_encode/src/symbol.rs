use qrtile_core::{BitMatrix, Ecl, Version};

/// Number of quiet zone modules around a symbol unless configured otherwise.
pub const DEFAULT_MARGIN: usize = 4;

/// Parameters handed to a [SymbolEncoder].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SymbolOptions {
    pub ecl: Ecl,
    /// Forced version, or `None` to pick the smallest version that fits the payload.
    pub version: Option<Version>,
    /// Quiet zone, in modules, added on every side of the symbol.
    pub margin: usize,
}

impl Default for SymbolOptions {
    fn default() -> Self {
        Self {
            ecl: Ecl::default(),
            version: None,
            margin: DEFAULT_MARGIN,
        }
    }
}

/// Turns a payload into the module grid of a QR symbol, quiet zone included.
///
/// Error correction coding, module placement, and mask selection all happen behind this trait.
pub trait SymbolEncoder {
    fn encode(&self, payload: &str, options: &SymbolOptions) -> Result<BitMatrix, SymbolError>;
}

impl<T: SymbolEncoder + ?Sized> SymbolEncoder for &T {
    fn encode(&self, payload: &str, options: &SymbolOptions) -> Result<BitMatrix, SymbolError> {
        (**self).encode(payload, options)
    }
}

/// Failure of a [SymbolEncoder].
#[derive(Debug, thiserror::Error)]
pub enum SymbolError {
    /// The payload does not fit the requested version, or any version at all when automatic.
    #[error("cannot encode {len} B of data with version {} and ECL {ecl}", version_label(.version))]
    DataTooLong {
        len: usize,
        version: Option<Version>,
        ecl: Ecl,
    },
    /// Any other failure of the underlying encoder, such as an unsupported version.
    #[error(transparent)]
    Backend(Box<dyn std::error::Error + Send + Sync>),
}

fn version_label(version: &Option<Version>) -> String {
    match version {
        Some(version) => version.to_string(),
        None => "auto".to_owned(),
    }
}

/// [SymbolEncoder] backed by the `qrcode` crate.
#[derive(Debug, Clone, Copy, Default)]
pub struct QrcodeSymbolEncoder;

impl QrcodeSymbolEncoder {
    pub fn new() -> Self {
        Self
    }
}

impl SymbolEncoder for QrcodeSymbolEncoder {
    fn encode(&self, payload: &str, options: &SymbolOptions) -> Result<BitMatrix, SymbolError> {
        let ec_level = ec_level(options.ecl);
        let symbol = match options.version {
            Some(version) => qrcode::QrCode::with_version(
                payload,
                qrcode::Version::Normal(version.number() as i16),
                ec_level,
            ),
            None => qrcode::QrCode::with_error_correction_level(payload, ec_level),
        }
        .map_err(|err| symbol_error(err, payload.len(), options))?;

        let size = symbol.width();
        let bare = BitMatrix::from_fn(size, size, |x, y| {
            symbol[(x, y)] == qrcode::Color::Dark
        });
        Ok(bare.padded(options.margin))
    }
}

fn symbol_error(err: qrcode::types::QrError, len: usize, options: &SymbolOptions) -> SymbolError {
    match err {
        qrcode::types::QrError::DataTooLong => SymbolError::DataTooLong {
            len,
            version: options.version,
            ecl: options.ecl,
        },
        other => SymbolError::Backend(Box::new(other)),
    }
}

fn ec_level(ecl: Ecl) -> qrcode::EcLevel {
    match ecl {
        Ecl::L => qrcode::EcLevel::L,
        Ecl::M => qrcode::EcLevel::M,
        Ecl::Q => qrcode::EcLevel::Q,
        Ecl::H => qrcode::EcLevel::H,
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_auto_version_with_margin() {
        let options = SymbolOptions {
            ecl: Ecl::L,
            ..Default::default()
        };
        let matrix = QrcodeSymbolEncoder.encode("HELLO WORLD", &options).unwrap();
        // Version 1 plus 4 quiet modules on each side.
        assert_eq!(matrix.width(), 21 + 8);
        assert_eq!(matrix.height(), 21 + 8);
        for k in 0..matrix.width() {
            assert_eq!(matrix.get(k, 0), Some(false));
            assert_eq!(matrix.get(0, k), Some(false));
            assert_eq!(matrix.get(k, 28), Some(false));
        }
        // Top-left corner of the finder pattern.
        assert_eq!(matrix.get(4, 4), Some(true));
    }

    #[test]
    fn test_forced_version() {
        let options = SymbolOptions {
            ecl: Ecl::M,
            version: Some(Version::V05),
            margin: 0,
        };
        let matrix = QrcodeSymbolEncoder.encode("hi", &options).unwrap();
        assert_eq!(matrix.width(), Version::V05.symbol_size());
    }

    #[test]
    fn test_data_too_long_for_forced_version() {
        let options = SymbolOptions {
            ecl: Ecl::H,
            version: Some(Version::V01),
            margin: 4,
        };
        let payload = "this payload is far too long for a version 1 symbol at level H";
        let err = QrcodeSymbolEncoder.encode(payload, &options).unwrap_err();
        assert!(matches!(
            err,
            SymbolError::DataTooLong {
                version: Some(Version::V01),
                ecl: Ecl::H,
                ..
            }
        ));
        assert!(err.to_string().contains("version V1 and ECL H"));
    }

    #[test]
    fn test_other_qrcode_errors_are_kept_as_backend() {
        let options = SymbolOptions::default();
        let err = symbol_error(qrcode::types::QrError::InvalidVersion, 3, &options);
        assert!(matches!(err, SymbolError::Backend(_)));
        assert_eq!(
            err.to_string(),
            qrcode::types::QrError::InvalidVersion.to_string()
        );

        let err = symbol_error(qrcode::types::QrError::DataTooLong, 3, &options);
        assert_eq!(
            err.to_string(),
            "cannot encode 3 B of data with version auto and ECL H"
        );
    }

    #[test]
    fn test_matches_qrcode_modules() {
        let options = SymbolOptions {
            ecl: Ecl::Q,
            version: None,
            margin: 2,
        };
        let matrix = QrcodeSymbolEncoder.encode("qrtile", &options).unwrap();
        let reference =
            qrcode::QrCode::with_error_correction_level("qrtile", qrcode::EcLevel::Q).unwrap();
        let size = reference.width();
        for y in 0..size {
            for x in 0..size {
                let dark = reference[(x, y)] == qrcode::Color::Dark;
                assert_eq!(matrix.get(x + 2, y + 2), Some(dark));
            }
        }
    }
}
