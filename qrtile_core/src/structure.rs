use crate::BitMatrix;

/// Side of a finder pattern.
const FINDER_SIZE: usize = 7;
/// Offset and side of the solid square at the centre of a finder pattern.
const FINDER_CORE_OFFSET: usize = 2;
const FINDER_CORE_SIZE: usize = 3;
/// Row (and column) hosting the timing patterns.
const TIMING_POS: usize = 6;
/// Timing patterns start after a finder pattern and its separator.
const TIMING_START: usize = FINDER_SIZE + 1;

/// An atlas of the modules of a symbol that belong to the fixed structure of a QR code: the outer
/// ring and the centre square of the three finder patterns, and the timing patterns.
///
/// Those modules must never be restyled, otherwise scanners cannot locate the symbol. Coordinates
/// are relative to the symbol itself, without quiet zone.
///
/// Alignment patterns of versions 2 and above are not part of the atlas.
pub struct StructureAtlas {
    matrix: BitMatrix,
}

impl StructureAtlas {
    /// Create a new atlas for a symbol of `width` x `height` modules.
    pub fn new(width: usize, height: usize) -> Self {
        let mut matrix = BitMatrix::filled(width, height, false);
        if width < FINDER_SIZE || height < FINDER_SIZE {
            return Self { matrix };
        }

        // Finder patterns: keep the outer ring and the centre, release the ring in between.
        // There is no finder pattern in the bottom-right corner.
        for (x, y) in [
            (0, 0),
            (width - FINDER_SIZE, 0),
            (0, height - FINDER_SIZE),
        ] {
            matrix.fill(true, x, y, FINDER_SIZE, FINDER_SIZE);
            matrix.fill(false, x + 1, y + 1, FINDER_SIZE - 2, FINDER_SIZE - 2);
            matrix.fill(
                true,
                x + FINDER_CORE_OFFSET,
                y + FINDER_CORE_OFFSET,
                FINDER_CORE_SIZE,
                FINDER_CORE_SIZE,
            );
        }

        // Timing patterns run between the finder patterns' separators.
        if width > 2 * TIMING_START {
            matrix.fill(true, TIMING_START, TIMING_POS, width - 2 * TIMING_START, 1);
        }
        if height > 2 * TIMING_START {
            matrix.fill(true, TIMING_POS, TIMING_START, 1, height - 2 * TIMING_START);
        }

        Self { matrix }
    }

    /// Get the width of the atlas.
    #[inline]
    pub fn width(&self) -> usize {
        self.matrix.width()
    }

    /// Get the height of the atlas.
    #[inline]
    pub fn height(&self) -> usize {
        self.matrix.height()
    }

    /// Check whether position (`x`, `y`) is structural. Positions outside the symbol never are.
    /// # Example
    /// ```
    /// use qrtile_core::StructureAtlas;
    /// let atlas = StructureAtlas::new(21, 21);
    /// assert!(atlas.is_structural(0, 0));
    /// assert!(atlas.is_structural(3, 3));
    /// assert!(!atlas.is_structural(1, 1));
    /// assert!(!atlas.is_structural(20, 20));
    /// assert!(!atlas.is_structural(42, 0));
    /// ```
    #[inline]
    pub fn is_structural(&self, x: usize, y: usize) -> bool {
        self.matrix.get(x, y).unwrap_or(false)
    }
}
