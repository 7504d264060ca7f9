use bitvec::{slice::BitSlice, vec::BitVec};

/// A `width` x `height` grid of bits stored row by row. A set bit is a dark module.
///
/// Positions are given as `(x, y)`: `x` is the column and `y` the row.
#[derive(Clone, PartialEq, Eq)]
pub struct BitMatrix {
    data: BitVec,
    width: usize,
    height: usize,
}

impl BitMatrix {
    /// Return a matrix of `width` x `height` filled with `value`.
    pub fn filled(width: usize, height: usize, value: bool) -> Self {
        Self {
            data: BitVec::repeat(value, width * height),
            width,
            height,
        }
    }

    /// Build a matrix by evaluating `f(x, y)` at every position.
    /// # Example
    /// ```
    /// use qrtile_core::BitMatrix;
    /// let checkers = BitMatrix::from_fn(3, 2, |x, y| (x + y) % 2 == 0);
    /// assert_eq!(checkers.get(0, 0), Some(true));
    /// assert_eq!(checkers.get(1, 0), Some(false));
    /// assert_eq!(checkers.get(3, 0), None);
    /// ```
    pub fn from_fn<F>(width: usize, height: usize, mut f: F) -> Self
    where
        F: FnMut(usize, usize) -> bool,
    {
        let mut data = BitVec::with_capacity(width * height);
        for y in 0..height {
            for x in 0..width {
                data.push(f(x, y));
            }
        }
        Self {
            data,
            width,
            height,
        }
    }

    /// Get the width of the matrix.
    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    /// Get the height of the matrix.
    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    /// Get the 1D index of the data array corresponding to position `(x, y)`, checking for validity.
    #[inline]
    fn linearized_index(&self, x: usize, y: usize) -> Option<usize> {
        if x < self.width && y < self.height {
            Some(self.width * y + x)
        } else {
            None
        }
    }

    /// Same as [BitMatrix::linearized_index], panicking if the position is invalid.
    #[inline]
    fn linearized_index_unwrapped(&self, x: usize, y: usize) -> usize {
        self.linearized_index(x, y).unwrap_or_else(|| {
            panic!(
                "index out of bounds: the size is {}x{} but the index is ({}, {})",
                self.width, self.height, x, y
            )
        })
    }

    /// Get the bit at position `(x, y)`.
    #[inline]
    pub fn get(&self, x: usize, y: usize) -> Option<bool> {
        self.data
            .get(self.linearized_index(x, y)?)
            .map(|bit| *bit)
    }

    /// Get the `y`th row of the matrix.
    pub fn row(&self, y: usize) -> Option<&BitSlice> {
        if y >= self.height {
            return None;
        }
        let start = self.width * y;
        Some(&self.data[start..start + self.width])
    }

    /// Fill a rectangle with its upper-left corner at (`x`, `y`) of size `width` and `height` with
    /// `value`.
    /// # Panics
    /// Panics if any access is out of bounds.
    pub fn fill(&mut self, value: bool, x: usize, y: usize, width: usize, height: usize) {
        if width == 0 {
            return;
        }
        for line in y..(y + height) {
            let range = self.linearized_index_unwrapped(x, line)
                ..=self.linearized_index_unwrapped(x + width - 1, line);
            self.data[range].fill(value)
        }
    }

    /// Return a copy of the matrix surrounded by `margin` unset bits on every side.
    /// # Example
    /// ```
    /// use qrtile_core::BitMatrix;
    /// let padded = BitMatrix::filled(2, 2, true).padded(1);
    /// assert_eq!((padded.width(), padded.height()), (4, 4));
    /// assert_eq!(padded.get(0, 0), Some(false));
    /// assert_eq!(padded.get(1, 1), Some(true));
    /// ```
    pub fn padded(&self, margin: usize) -> Self {
        let (width, height) = (self.width + 2 * margin, self.height + 2 * margin);
        Self::from_fn(width, height, |x, y| {
            x >= margin
                && y >= margin
                && self.get(x - margin, y - margin).unwrap_or(false)
        })
    }

}

impl std::fmt::Debug for BitMatrix {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "BitMatrix {}x{} {{", self.width, self.height)?;
        for y in 0..self.height {
            let Some(row) = self.row(y) else {
                break;
            };
            write!(f, "    ")?;
            for bit in row.iter() {
                write!(f, "{}", if *bit { '#' } else { '.' })?;
            }
            writeln!(f)?;
        }
        write!(f, "}}")
    }
}
