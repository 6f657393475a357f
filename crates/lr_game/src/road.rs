//! Scrolling road backdrop.
//!
//! Two copies of the road image stack vertically and scroll downward; when a
//! copy's top edge passes the bottom of the viewport it wraps back above the
//! other. The source image is kept so resizes rescale from the original
//! pixels instead of compounding resampling losses.

use image::imageops::{self, FilterType};
use image::{Rgba, RgbaImage};
use std::path::Path;

use crate::sprite::load_rgba_image;

pub const ROAD_ASSET: &str = "road1.png";
pub const ROAD_SCROLL_SPEED: f32 = 5.0;

const FALLBACK_ASPHALT: [u8; 4] = [55, 55, 60, 255];

pub struct Road {
    source: Option<RgbaImage>,
    pub image: RgbaImage,
    pub y1: f32,
    pub y2: f32,
    pub is_fallback: bool,
}

impl Road {
    pub fn load(assets_dir: &Path, viewport: (u32, u32)) -> Self {
        let (source, is_fallback) = match load_rgba_image(&assets_dir.join(ROAD_ASSET)) {
            Ok(img) => (Some(img), false),
            Err(err) => {
                log::warn!("{err}. Falling back to plain asphalt.");
                (None, true)
            }
        };
        let image = scale_to_viewport(source.as_ref(), viewport);
        Self {
            source,
            image,
            y1: 0.0,
            y2: -(viewport.1 as f32),
            is_fallback,
        }
    }

    pub fn step(&mut self) {
        let height = self.image.height() as f32;
        self.y1 += ROAD_SCROLL_SPEED;
        self.y2 += ROAD_SCROLL_SPEED;
        if self.y1 >= height {
            self.y1 = -height;
        }
        if self.y2 >= height {
            self.y2 = -height;
        }
    }

    pub fn handle_resize(&mut self, viewport: (u32, u32)) {
        self.image = scale_to_viewport(self.source.as_ref(), viewport);
        self.y1 = 0.0;
        self.y2 = -(viewport.1 as f32);
    }
}

fn scale_to_viewport(source: Option<&RgbaImage>, viewport: (u32, u32)) -> RgbaImage {
    let (w, h) = (viewport.0.max(1), viewport.1.max(1));
    match source {
        Some(img) => imageops::resize(img, w, h, FilterType::Triangle),
        None => RgbaImage::from_pixel(w, h, Rgba(FALLBACK_ASPHALT)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fallback_road() -> Road {
        Road::load(Path::new("/nonexistent/assets"), (800, 600))
    }

    #[test]
    fn missing_asset_yields_viewport_sized_fallback() {
        let road = fallback_road();
        assert!(road.is_fallback);
        assert_eq!(road.image.dimensions(), (800, 600));
        assert_eq!(road.y1, 0.0);
        assert_eq!(road.y2, -600.0);
    }

    #[test]
    fn copies_stay_one_screen_apart_while_scrolling() {
        let mut road = fallback_road();
        for _ in 0..1000 {
            road.step();
            let gap = (road.y1 - road.y2).abs();
            assert!((gap - 600.0).abs() < 1e-3, "copies drifted: gap {gap}");
        }
    }

    #[test]
    fn copy_wraps_after_scrolling_one_screen() {
        let mut road = fallback_road();
        // 600 / 5 = 120 steps until y1 reaches the bottom edge.
        for _ in 0..120 {
            road.step();
        }
        assert_eq!(road.y1, -600.0);
        assert_eq!(road.y2, 0.0);
    }

    #[test]
    fn resize_rescales_and_resets_scroll() {
        let mut road = fallback_road();
        for _ in 0..37 {
            road.step();
        }
        road.handle_resize((1024, 768));
        assert_eq!(road.image.dimensions(), (1024, 768));
        assert_eq!(road.y1, 0.0);
        assert_eq!(road.y2, -768.0);
    }
}
