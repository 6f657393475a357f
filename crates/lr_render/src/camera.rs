use glam::Mat4;

#[repr(C)]
#[derive(Copy, Clone, Debug, bytemuck::Pod, bytemuck::Zeroable)]
pub struct CameraUniform {
    pub view_proj: [[f32; 4]; 4],
}

/// Fixed screen-space camera: one pixel equals one world unit, origin at the
/// top-left corner, y growing downward. Game coordinates map directly to
/// viewport pixels.
pub struct ScreenCamera {
    pub viewport: (u32, u32),
}

impl ScreenCamera {
    pub fn new(viewport_width: u32, viewport_height: u32) -> Self {
        Self {
            viewport: (viewport_width, viewport_height),
        }
    }

    pub fn build_uniform(&self) -> CameraUniform {
        let (w, h) = (self.viewport.0 as f32, self.viewport.1 as f32);
        // Top-left origin: left=0, right=w, bottom=h, top=0 flips the y axis.
        let proj = Mat4::orthographic_rh(0.0, w, h, 0.0, -1.0, 1.0);

        CameraUniform {
            view_proj: proj.to_cols_array_2d(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec4;

    #[test]
    fn top_left_maps_to_upper_left_clip_corner() {
        let camera = ScreenCamera::new(800, 600);
        let m = Mat4::from_cols_array_2d(&camera.build_uniform().view_proj);
        let clip = m * Vec4::new(0.0, 0.0, 0.0, 1.0);
        assert!((clip.x - -1.0).abs() < 1e-6);
        assert!((clip.y - 1.0).abs() < 1e-6);
    }

    #[test]
    fn bottom_right_maps_to_lower_right_clip_corner() {
        let camera = ScreenCamera::new(800, 600);
        let m = Mat4::from_cols_array_2d(&camera.build_uniform().view_proj);
        let clip = m * Vec4::new(800.0, 600.0, 0.0, 1.0);
        assert!((clip.x - 1.0).abs() < 1e-6);
        assert!((clip.y - -1.0).abs() < 1e-6);
    }
}
