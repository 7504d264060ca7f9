use image::imageops::{self, FilterType};
use image::{Rgba, RgbaImage};

use qrtile_core::StructureAtlas;

use crate::{Block, QrCode};

/// A source of pixels that can be rasterized.
pub trait Sampler {
    /// Width and height in pixels.
    fn dimensions(&self) -> (u32, u32);

    /// Color of pixel `(x, y)`.
    fn pixel(&self, x: u32, y: u32) -> Rgba<u8>;
}

/// Rasterize `sampler` into an image.
pub fn rasterize<S: Sampler + ?Sized>(sampler: &S) -> RgbaImage {
    let (width, height) = sampler.dimensions();
    RgbaImage::from_fn(width, height, |x, y| sampler.pixel(x, y))
}

/// One pixel per module.
impl Sampler for QrCode {
    fn dimensions(&self) -> (u32, u32) {
        (self.width() as u32, self.height() as u32)
    }

    fn pixel(&self, x: u32, y: u32) -> Rgba<u8> {
        if self.is_dark(x as usize, y as usize) {
            self.foreground()
        } else {
            self.background()
        }
    }
}

impl Block for RgbaImage {
    type Sample = Rgba<u8>;

    fn dimensions(&self) -> (usize, usize) {
        (self.width() as usize, self.height() as usize)
    }

    fn sample(&self, dx: usize, dy: usize) -> Rgba<u8> {
        *self.get_pixel(dx as u32, dy as u32)
    }
}

/// A single pixel of a solid color.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColorBlock(pub Rgba<u8>);

impl Block for ColorBlock {
    type Sample = Rgba<u8>;

    fn dimensions(&self) -> (usize, usize) {
        (1, 1)
    }

    fn sample(&self, _dx: usize, _dy: usize) -> Rgba<u8> {
        self.0
    }
}

/// A QR code whose dark modules are drawn with a decorative block image.
///
/// Quiet zone modules are always background. Finder and timing modules are drawn in plain
/// foreground or background whatever the block looks like, so the result stays scannable.
pub struct Decorated<'a, B: ?Sized> {
    code: &'a QrCode,
    block: &'a B,
    atlas: StructureAtlas,
}

impl<'a, B> Decorated<'a, B>
where
    B: Block<Sample = Rgba<u8>> + ?Sized,
{
    pub fn new(code: &'a QrCode, block: &'a B) -> Self {
        let margin = code.margin();
        let atlas = StructureAtlas::new(
            code.width().saturating_sub(2 * margin),
            code.height().saturating_sub(2 * margin),
        );
        Self { code, block, atlas }
    }

    /// Color of the sub-pixel `(dx, dy)` of module `(x, y)`.
    fn module_pixel(&self, x: usize, y: usize, dx: usize, dy: usize) -> Rgba<u8> {
        let code = self.code;
        if code.in_margin(x, y) {
            return code.background();
        }
        let margin = code.margin();
        let dark = code.is_dark(x, y);
        if self.atlas.is_structural(x - margin, y - margin) {
            return code.pixel_color(dark);
        }
        if dark {
            composite(self.block.sample(dx, dy), code.background())
        } else {
            code.background()
        }
    }
}

impl<B> Sampler for Decorated<'_, B>
where
    B: Block<Sample = Rgba<u8>> + ?Sized,
{
    /// Saturates at `u32::MAX` on overflow.
    fn dimensions(&self) -> (u32, u32) {
        let (block_width, block_height) = self.block.dimensions();
        let scaled = |modules: usize, block: usize| {
            modules
                .checked_mul(block)
                .and_then(|pixels| u32::try_from(pixels).ok())
                .unwrap_or(u32::MAX)
        };
        (
            scaled(self.code.width(), block_width),
            scaled(self.code.height(), block_height),
        )
    }

    fn pixel(&self, x: u32, y: u32) -> Rgba<u8> {
        let (block_width, block_height) = self.block.dimensions();
        let (x, y) = (x as usize, y as usize);
        self.module_pixel(
            x / block_width,
            y / block_height,
            x % block_width,
            y % block_height,
        )
    }
}

/// Put `pixel` over `background`. Transparent pixels leave the background untouched.
fn composite(pixel: Rgba<u8>, background: Rgba<u8>) -> Rgba<u8> {
    match pixel[3] {
        0 => background,
        u8::MAX => pixel,
        alpha => {
            let alpha = alpha as u16;
            let mix = |fg: u8, bg: u8| {
                ((fg as u16 * alpha + bg as u16 * (255 - alpha) + 127) / 255) as u8
            };
            let Rgba([r, g, b, _]) = pixel;
            let Rgba([bg_r, bg_g, bg_b, bg_a]) = background;
            let coverage = alpha + (bg_a as u16 * (255 - alpha) + 127) / 255;
            Rgba([mix(r, bg_r), mix(g, bg_g), mix(b, bg_b), coverage.min(255) as u8])
        }
    }
}

impl QrCode {
    fn pixel_color(&self, dark: bool) -> Rgba<u8> {
        if dark {
            self.foreground()
        } else {
            self.background()
        }
    }

    /// One pixel per module.
    pub fn to_image(&self) -> RgbaImage {
        rasterize(self)
    }

    /// One pixel per module, scaled to `width` x `height` with nearest neighbour sampling.
    pub fn to_resized_image(&self, width: u32, height: u32) -> RgbaImage {
        tracing::trace!(width, height, "rendering resized image");
        imageops::resize(&self.to_image(), width, height, FilterType::Nearest)
    }

    /// Draw every dark module with `block`, see [Decorated]. The image is `width * block width`
    /// by `height * block height` pixels.
    pub fn to_image_with_block<B>(&self, block: &B) -> RgbaImage
    where
        B: Block<Sample = Rgba<u8>> + ?Sized,
    {
        let (block_width, block_height) = block.dimensions();
        tracing::trace!(block_width, block_height, "rendering image with block");
        rasterize(&Decorated::new(self, block))
    }

    /// Same as [QrCode::to_image_with_block], scaled to `width` x `height` with nearest neighbour
    /// sampling.
    pub fn to_resized_image_with_block<B>(&self, block: &B, width: u32, height: u32) -> RgbaImage
    where
        B: Block<Sample = Rgba<u8>> + ?Sized,
    {
        imageops::resize(
            &self.to_image_with_block(block),
            width,
            height,
            FilterType::Nearest,
        )
    }
}
