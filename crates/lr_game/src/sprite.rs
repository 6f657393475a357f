//! Car sprites and their collision masks.
//!
//! Car art is authored on a white background. Loading a model classifies
//! every pixel as background or paint, blanks the background to transparent,
//! resamples the cleaned image to the size the geometry resolver asked for,
//! and derives the collision mask from that same resampled image. Mask and
//! visual always come from one buffer: scaling them independently would let
//! resampling artifacts make them disagree at the silhouette edge.
//!
//! A missing or corrupt asset degrades to a solid 60x100 placeholder whose
//! mask is fully opaque, so collision falls back to rectangle behavior for
//! that entity and the game keeps running.

use image::imageops::{self, FilterType};
use image::{Rgba, RgbaImage};
use std::fs;
use std::path::Path;

pub const FALLBACK_WIDTH: u32 = 60;
pub const FALLBACK_HEIGHT: u32 = 100;
const FALLBACK_COLOR: [u8; 4] = [255, 0, 0, 255];

/// Car model number, 1 through 5, one asset file per model.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CarModel(u8);

impl CarModel {
    pub const MIN: u8 = 1;
    pub const MAX: u8 = 5;

    pub const fn new(number: u8) -> Option<Self> {
        if number >= Self::MIN && number <= Self::MAX {
            Some(Self(number))
        } else {
            None
        }
    }

    pub const fn number(self) -> u8 {
        self.0
    }

    pub fn asset_file(self) -> String {
        format!("car{}.png", self.0)
    }

    /// Next model, saturating at the top of the range.
    pub fn next(self) -> Self {
        Self((self.0 + 1).min(Self::MAX))
    }

    /// Previous model, saturating at the bottom of the range.
    pub fn prev(self) -> Self {
        Self((self.0 - 1).max(Self::MIN))
    }
}

impl Default for CarModel {
    fn default() -> Self {
        Self(3)
    }
}

/// True when the pixel belongs to the background and must be excluded from
/// both the visual and the collision mask. Thresholds are exact:
/// pure white, near-white, light achromatic, or effectively transparent.
pub fn is_background_pixel(px: [u8; 4]) -> bool {
    let [r, g, b, a] = px;
    if r == 255 && g == 255 && b == 255 {
        return true;
    }
    if r > 240 && g > 240 && b > 240 {
        return true;
    }
    if r > 220
        && g > 220
        && b > 220
        && (r as i16 - g as i16).abs() < 20
        && (g as i16 - b as i16).abs() < 20
    {
        return true;
    }
    if a < 10 {
        return true;
    }
    false
}

/// Per-pixel opacity bitmap used for exact collision testing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpriteMask {
    width: u32,
    height: u32,
    bits: Vec<bool>,
}

impl SpriteMask {
    /// Classify the whole image in one pass over the flat RGBA buffer.
    pub fn from_image(image: &RgbaImage) -> Self {
        let bits = image
            .as_raw()
            .chunks_exact(4)
            .map(|px| !is_background_pixel([px[0], px[1], px[2], px[3]]))
            .collect();
        Self {
            width: image.width(),
            height: image.height(),
            bits,
        }
    }

    /// Every pixel opaque. Collision proxy for the placeholder rectangle.
    pub fn solid(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            bits: vec![true; (width * height) as usize],
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Out-of-bounds coordinates are transparent.
    pub fn is_opaque(&self, x: u32, y: u32) -> bool {
        if x >= self.width || y >= self.height {
            return false;
        }
        self.bits[(y * self.width + x) as usize]
    }

    /// True when any opaque pixel of `self` coincides with an opaque pixel of
    /// `other` placed at `offset` (other's origin relative to self's origin).
    /// Only the window where the two grids overlap is scanned.
    pub fn overlap(&self, other: &SpriteMask, offset: (i32, i32)) -> bool {
        let (ox, oy) = offset;
        let x0 = ox.max(0);
        let y0 = oy.max(0);
        let x1 = (ox + other.width as i32).min(self.width as i32);
        let y1 = (oy + other.height as i32).min(self.height as i32);

        for py in y0..y1 {
            for px in x0..x1 {
                if self.is_opaque(px as u32, py as u32)
                    && other.is_opaque((px - ox) as u32, (py - oy) as u32)
                {
                    return true;
                }
            }
        }
        false
    }
}

/// A processed car visual and the mask derived from it. Immutable once built;
/// model changes and resizes replace the whole pair.
#[derive(Debug, Clone)]
pub struct CarSprite {
    pub image: RgbaImage,
    pub mask: SpriteMask,
    pub is_fallback: bool,
}

impl CarSprite {
    /// Load and process a car model at the requested target size. Never fails:
    /// unloadable art becomes the solid placeholder.
    pub fn load(assets_dir: &Path, model: CarModel, target: (u32, u32)) -> Self {
        let path = assets_dir.join(model.asset_file());
        match load_rgba_image(&path) {
            Ok(original) => {
                let cleaned = remove_background(&original);
                let scaled =
                    imageops::resize(&cleaned, target.0, target.1, FilterType::Triangle);
                let mask = SpriteMask::from_image(&scaled);
                Self {
                    image: scaled,
                    mask,
                    is_fallback: false,
                }
            }
            Err(err) => {
                log::warn!("{err}. Falling back to placeholder car.");
                Self::fallback()
            }
        }
    }

    pub fn fallback() -> Self {
        let image = RgbaImage::from_pixel(
            FALLBACK_WIDTH,
            FALLBACK_HEIGHT,
            Rgba(FALLBACK_COLOR),
        );
        Self {
            image,
            mask: SpriteMask::solid(FALLBACK_WIDTH, FALLBACK_HEIGHT),
            is_fallback: true,
        }
    }

    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }
}

pub fn load_rgba_image(path: &Path) -> Result<RgbaImage, String> {
    let bytes =
        fs::read(path).map_err(|e| format!("Failed to read sprite {}: {e}", path.display()))?;
    let decoded = image::load_from_memory(&bytes)
        .map_err(|e| format!("Failed to decode sprite {}: {e}", path.display()))?;
    Ok(decoded.to_rgba8())
}

/// Blank every background-classified pixel to fully transparent.
pub fn remove_background(image: &RgbaImage) -> RgbaImage {
    let mut cleaned = image.clone();
    for px in cleaned.pixels_mut() {
        if is_background_pixel(px.0) {
            *px = Rgba([0, 0, 0, 0]);
        }
    }
    cleaned
}

#[cfg(test)]
mod tests {
    use super::*;

    fn image_from_pixels(width: u32, height: u32, pixels: &[[u8; 4]]) -> RgbaImage {
        let mut img = RgbaImage::new(width, height);
        for (i, px) in pixels.iter().enumerate() {
            let x = i as u32 % width;
            let y = i as u32 / width;
            img.put_pixel(x, y, Rgba(*px));
        }
        img
    }

    #[test]
    fn classification_thresholds_are_exact() {
        // Pure white and near-white are background.
        assert!(is_background_pixel([255, 255, 255, 255]));
        assert!(is_background_pixel([241, 241, 241, 255]));
        // Light achromatic gray is background.
        assert!(is_background_pixel([230, 230, 230, 255]));
        // 240 fails the near-white rule but passes light achromatic.
        assert!(is_background_pixel([240, 240, 240, 255]));
        // Saturated light colors are paint: channel spread breaks achromatic.
        assert!(!is_background_pixel([230, 190, 230, 255]));
        // 220 is not > 220.
        assert!(!is_background_pixel([220, 220, 220, 255]));
        // Alpha below 10 is background regardless of color.
        assert!(is_background_pixel([0, 0, 0, 9]));
        assert!(is_background_pixel([10, 200, 30, 5]));
        // Alpha exactly 10 is kept.
        assert!(!is_background_pixel([0, 0, 0, 10]));
        // Opaque black is paint.
        assert!(!is_background_pixel([0, 0, 0, 255]));
    }

    #[test]
    fn mask_is_deterministic() {
        let img = image_from_pixels(
            2,
            2,
            &[
                [255, 255, 255, 255],
                [0, 0, 0, 255],
                [90, 90, 90, 255],
                [10, 20, 30, 5],
            ],
        );
        let a = SpriteMask::from_image(&img);
        let b = SpriteMask::from_image(&img);
        assert_eq!(a, b);
        assert!(!a.is_opaque(0, 0));
        assert!(a.is_opaque(1, 0));
        assert!(a.is_opaque(0, 1));
        assert!(!a.is_opaque(1, 1));
    }

    #[test]
    fn mask_survives_background_removal_unchanged() {
        // Blanking background pixels to (0,0,0,0) must not change how any
        // pixel classifies, so mask(clean(img)) == mask(img).
        let img = image_from_pixels(
            2,
            2,
            &[
                [255, 255, 255, 255],
                [180, 0, 0, 255],
                [245, 245, 245, 255],
                [30, 30, 30, 255],
            ],
        );
        let direct = SpriteMask::from_image(&img);
        let cleaned = SpriteMask::from_image(&remove_background(&img));
        assert_eq!(direct, cleaned);
    }

    #[test]
    fn out_of_bounds_is_transparent() {
        let mask = SpriteMask::solid(3, 3);
        assert!(mask.is_opaque(2, 2));
        assert!(!mask.is_opaque(3, 2));
        assert!(!mask.is_opaque(2, 3));
    }

    #[test]
    fn fallback_is_solid_placeholder() {
        let sprite = CarSprite::fallback();
        assert!(sprite.is_fallback);
        assert_eq!(sprite.width(), 60);
        assert_eq!(sprite.height(), 100);
        for y in 0..sprite.height() {
            for x in 0..sprite.width() {
                assert!(sprite.mask.is_opaque(x, y));
            }
        }
    }

    #[test]
    fn missing_asset_falls_back() {
        let sprite = CarSprite::load(
            Path::new("/nonexistent/assets"),
            CarModel::default(),
            (100, 130),
        );
        assert!(sprite.is_fallback);
        assert_eq!(sprite.width(), FALLBACK_WIDTH);
        assert_eq!(sprite.height(), FALLBACK_HEIGHT);
    }

    #[test]
    fn model_range_saturates() {
        assert!(CarModel::new(0).is_none());
        assert!(CarModel::new(6).is_none());
        let first = CarModel::new(1).unwrap();
        let last = CarModel::new(5).unwrap();
        assert_eq!(first.prev(), first);
        assert_eq!(last.next(), last);
        assert_eq!(first.next().number(), 2);
    }
}
