use std::sync::OnceLock;

use image::Rgba;

use qrtile_core::BitMatrix;

pub const DEFAULT_FOREGROUND: Rgba<u8> = Rgba([0, 0, 0, u8::MAX]);
pub const DEFAULT_BACKGROUND: Rgba<u8> = Rgba([u8::MAX, u8::MAX, u8::MAX, u8::MAX]);

/// An encoded QR code together with the state needed to render it.
///
/// The module grid is fixed at construction. Only the colors can change afterwards, and none of
/// the renderers ever re-encode the payload.
#[derive(Debug, Clone)]
pub struct QrCode {
    matrix: BitMatrix,
    width: usize,
    height: usize,
    margin: usize,
    foreground: Rgba<u8>,
    background: Rgba<u8>,
    bools: OnceLock<Vec<Vec<bool>>>,
}

impl QrCode {
    /// Wrap `matrix`, a grid that includes `margin` quiet modules on every side. With `invert`,
    /// `foreground` and `background` are swapped here, once.
    /// # Example
    /// ```
    /// use image::Rgba;
    /// use qrtile_core::BitMatrix;
    /// use qrtile_encode::QrCode;
    /// let red = Rgba([255, 0, 0, 255]);
    /// let blue = Rgba([0, 0, 255, 255]);
    /// let code = QrCode::new(BitMatrix::filled(21, 21, false), true, 0, red, blue);
    /// assert_eq!(code.foreground(), blue);
    /// assert_eq!(code.background(), red);
    /// ```
    pub fn new(
        matrix: BitMatrix,
        invert: bool,
        margin: usize,
        foreground: Rgba<u8>,
        background: Rgba<u8>,
    ) -> Self {
        let (foreground, background) = if invert {
            (background, foreground)
        } else {
            (foreground, background)
        };
        Self {
            width: matrix.width(),
            height: matrix.height(),
            matrix,
            margin,
            foreground,
            background,
            bools: OnceLock::new(),
        }
    }

    /// Get the underlying module grid.
    pub fn matrix(&self) -> &BitMatrix {
        &self.matrix
    }

    /// Width in modules, quiet zone included.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Height in modules, quiet zone included.
    pub fn height(&self) -> usize {
        self.height
    }

    /// Quiet zone size in modules.
    pub fn margin(&self) -> usize {
        self.margin
    }

    pub fn foreground(&self) -> Rgba<u8> {
        self.foreground
    }

    pub fn background(&self) -> Rgba<u8> {
        self.background
    }

    pub fn set_foreground(&mut self, color: Rgba<u8>) {
        self.foreground = color;
    }

    pub fn set_background(&mut self, color: Rgba<u8>) {
        self.background = color;
    }

    /// Swap foreground and background.
    pub fn invert(&mut self) {
        std::mem::swap(&mut self.foreground, &mut self.background);
    }

    /// Whether the module at `(x, y)` is dark. Positions outside the grid are light.
    #[inline]
    pub fn is_dark(&self, x: usize, y: usize) -> bool {
        self.matrix.get(x, y).unwrap_or(false)
    }

    /// Whether `(x, y)` lies in the quiet zone.
    #[inline]
    pub fn in_margin(&self, x: usize, y: usize) -> bool {
        x < self.margin
            || y < self.margin
            || x >= self.width.saturating_sub(self.margin)
            || y >= self.height.saturating_sub(self.margin)
    }

    /// The modules as `rows[y][x]`. Computed on first use, then cached.
    pub fn to_bool_array(&self) -> &[Vec<bool>] {
        self.bools.get_or_init(|| {
            (0..self.height)
                .map(|y| (0..self.width).map(|x| self.is_dark(x, y)).collect())
                .collect()
        })
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn diagonal(width: usize, height: usize) -> QrCode {
        let matrix = BitMatrix::from_fn(width, height, |x, y| x == y);
        QrCode::new(matrix, false, 1, DEFAULT_FOREGROUND, DEFAULT_BACKGROUND)
    }

    #[test]
    fn test_bool_array_dimensions() {
        let code = diagonal(5, 3);
        let rows = code.to_bool_array();
        assert_eq!(rows.len(), code.height());
        assert_eq!(rows[0].len(), code.width());
        assert!(rows[2][2]);
        assert!(!rows[2][1]);
    }

    #[test]
    fn test_bool_array_is_cached() {
        let code = diagonal(4, 4);
        let first = code.to_bool_array();
        let second = code.to_bool_array();
        assert_eq!(first, second);
        assert!(std::ptr::eq(first, second));
    }

    #[test]
    fn test_invert_is_applied_once() {
        let code = QrCode::new(
            BitMatrix::filled(3, 3, true),
            true,
            0,
            DEFAULT_FOREGROUND,
            DEFAULT_BACKGROUND,
        );
        assert_eq!(code.foreground(), DEFAULT_BACKGROUND);
        assert_eq!(code.background(), DEFAULT_FOREGROUND);
        // Reading colors again never re-swaps.
        assert_eq!(code.foreground(), DEFAULT_BACKGROUND);
    }

    #[test]
    fn test_color_setters() {
        let mut code = diagonal(3, 3);
        let gray = Rgba([51, 51, 51, 255]);
        code.set_foreground(gray);
        code.set_background(DEFAULT_FOREGROUND);
        assert_eq!(code.foreground(), gray);
        code.invert();
        assert_eq!(code.foreground(), DEFAULT_FOREGROUND);
        assert_eq!(code.background(), gray);
    }

    #[test]
    fn test_margin_zone() {
        let code = diagonal(5, 5);
        assert!(code.in_margin(0, 2));
        assert!(code.in_margin(4, 2));
        assert!(code.in_margin(2, 4));
        assert!(!code.in_margin(1, 1));
        assert!(!code.in_margin(3, 3));
    }

    #[test]
    fn test_shared_between_threads() {
        let code = std::sync::Arc::new(diagonal(6, 6));
        let handles: Vec<_> = (0..4)
            .map(|_| {
                let code = code.clone();
                std::thread::spawn(move || code.to_bool_array().len())
            })
            .collect();
        for handle in handles {
            assert_eq!(handle.join().unwrap(), 6);
        }
    }
}
