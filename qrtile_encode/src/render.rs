use itertools::iproduct;

use crate::QrCode;

/// A tile drawn in place of every dark module.
///
/// Text renderers use blocks of glyphs, raster renderers blocks of pixels. A light module is
/// always drawn as an empty tile of the same dimensions.
pub trait Block {
    type Sample;

    /// Width and height of the tile.
    fn dimensions(&self) -> (usize, usize);

    /// Sample at offset `(dx, dy)` inside the tile.
    fn sample(&self, dx: usize, dy: usize) -> Self::Sample;
}

/// "██": a full block two cells wide, so that modules look square in a terminal.
#[derive(Debug, Clone, Copy, Default)]
pub struct SolidBlock;

impl Block for SolidBlock {
    type Sample = char;

    fn dimensions(&self) -> (usize, usize) {
        (2, 1)
    }

    fn sample(&self, _dx: usize, _dy: usize) -> char {
        '█'
    }
}

/// A rectangle of glyphs, given as lines of text. Short lines are padded with spaces.
/// # Example
/// ```
/// use qrtile_encode::{Block, PatternBlock};
/// let block = PatternBlock::new("/\\\n\\/");
/// assert_eq!(block.dimensions(), (2, 2));
/// assert_eq!(block.sample(1, 1), '/');
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PatternBlock {
    glyphs: Vec<Vec<char>>,
    width: usize,
}

impl PatternBlock {
    pub fn new(pattern: &str) -> Self {
        let glyphs: Vec<Vec<char>> = pattern.lines().map(|line| line.chars().collect()).collect();
        let width = glyphs.iter().map(Vec::len).max().unwrap_or(0);
        Self { glyphs, width }
    }
}

impl From<&str> for PatternBlock {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl Block for PatternBlock {
    type Sample = char;

    fn dimensions(&self) -> (usize, usize) {
        (self.width, self.glyphs.len())
    }

    fn sample(&self, dx: usize, dy: usize) -> char {
        self.glyphs
            .get(dy)
            .and_then(|line| line.get(dx))
            .copied()
            .unwrap_or(' ')
    }
}

/// Glyphs for a pair of stacked modules, indexed by `top | bottom << 1`.
const SMALL_GLYPHS: [char; 4] = [' ', '▀', '▄', '█'];

mod ansi {
    use image::Rgba;

    const FOREGROUND: u8 = 38;
    const BACKGROUND: u8 = 48;
    const RESET: &str = "\x1b[0m";

    fn push_color(out: &mut String, layer: u8, color: Rgba<u8>) {
        let Rgba([r, g, b, _]) = color;
        out.push_str(&format!("\x1b[{layer};2;{r};{g};{b}m"));
    }

    /// Push the truecolor escapes for `fg` and `bg`, skipping fully transparent ones. Returns
    /// whether anything was pushed.
    pub(super) fn push_colors(out: &mut String, fg: Rgba<u8>, bg: Rgba<u8>) -> bool {
        if fg[3] != 0 {
            push_color(out, FOREGROUND, fg);
        }
        if bg[3] != 0 {
            push_color(out, BACKGROUND, bg);
        }
        fg[3] != 0 || bg[3] != 0
    }

    pub(super) fn push_reset(out: &mut String) {
        out.push_str(RESET);
    }

    /// Push `glyph` in its own colors so that neighbouring glyphs never bleed into each other.
    pub(super) fn push_painted(out: &mut String, glyph: char, fg: Rgba<u8>, bg: Rgba<u8>) {
        let painted = push_colors(out, fg, bg);
        out.push(glyph);
        if painted {
            push_reset(out);
        }
    }
}

impl QrCode {
    /// Render two module rows per line of text using half blocks, in the code's colors.
    ///
    /// With an odd height, the last line pairs the last row with light modules.
    pub fn to_small_string(&self) -> String {
        tracing::trace!(width = self.width(), height = self.height(), "rendering small string");
        let rows = self.to_bool_array();
        let (fg, bg) = (self.foreground(), self.background());
        let mut out = String::new();
        for pair in rows.chunks(2) {
            for x in 0..self.width() {
                let top = pair[0][x];
                let bottom = pair.get(1).is_some_and(|row| row[x]);
                let glyph = SMALL_GLYPHS[top as usize | (bottom as usize) << 1];
                ansi::push_painted(&mut out, glyph, fg, bg);
            }
            out.push('\n');
        }
        out
    }

    /// Render every module as a tile of `block`: dark modules with the block's glyphs in the
    /// foreground color, light modules as blanks on the background.
    /// # Example
    /// ```
    /// use image::Rgba;
    /// use qrtile_core::BitMatrix;
    /// use qrtile_encode::{PatternBlock, QrCode};
    /// let transparent = Rgba([0, 0, 0, 0]);
    /// let code = QrCode::new(BitMatrix::from_fn(2, 1, |x, _| x == 0), false, 0, transparent, transparent);
    /// assert_eq!(code.to_block_string(&PatternBlock::new("[]")), "[]  \n");
    /// ```
    pub fn to_block_string<B>(&self, block: &B) -> String
    where
        B: Block<Sample = char> + ?Sized,
    {
        let (block_width, block_height) = block.dimensions();
        tracing::trace!(block_width, block_height, "rendering block string");
        let rows = self.to_bool_array();
        let (fg, bg) = (self.foreground(), self.background());
        let mut out = String::new();
        for (y, dy) in iproduct!(0..self.height(), 0..block_height) {
            for (x, dx) in iproduct!(0..self.width(), 0..block_width) {
                if rows[y][x] {
                    ansi::push_painted(&mut out, block.sample(dx, dy), fg, bg);
                } else {
                    ansi::push_painted(&mut out, ' ', bg, bg);
                }
            }
            out.push('\n');
        }
        out
    }

    /// Render dark modules as `set` and light ones as `unset`, one line per module row, without
    /// colors.
    /// # Example
    /// ```
    /// use image::Rgba;
    /// use qrtile_core::BitMatrix;
    /// use qrtile_encode::QrCode;
    /// let black = Rgba([0, 0, 0, 255]);
    /// let code = QrCode::new(BitMatrix::from_fn(2, 2, |x, y| x == y), false, 0, black, black);
    /// assert_eq!(code.to_string_with("##", ".."), "##..\n..##\n");
    /// ```
    pub fn to_string_with(&self, set: &str, unset: &str) -> String {
        let mut out = String::new();
        for row in self.to_bool_array() {
            for &dark in row {
                out.push_str(if dark { set } else { unset });
            }
            out.push('\n');
        }
        out
    }

    /// Same as [QrCode::to_string_with], wrapped in the code's colors.
    pub fn to_colored_string(&self, set: &str, unset: &str) -> String {
        let mut out = String::new();
        let painted = ansi::push_colors(&mut out, self.foreground(), self.background());
        out.push_str(&self.to_string_with(set, unset));
        if painted {
            ansi::push_reset(&mut out);
        }
        out
    }
}
