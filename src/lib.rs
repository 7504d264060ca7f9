//! Render QR codes as terminal text or images, with optional decorative blocks.
//!
//! ```
//! use qrtile::{Ecl, Encoder, SecurityType, WifiContent};
//! let code = Encoder::new()
//!     .with_content(WifiContent::new("TP-Link", "12345", SecurityType::Wpa, true))
//!     .with_ecl(Ecl::M)
//!     .build()
//!     .unwrap();
//! print!("{}", code.to_small_string());
//! ```

pub use qrtile_core::*;
pub use qrtile_encode::*;
