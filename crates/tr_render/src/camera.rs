use glam::Mat4;

#[repr(C)]
#[derive(Copy, Clone, Debug, bytemuck::Pod, bytemuck::Zeroable)]
pub struct CameraUniform {
    pub view_proj: [[f32; 4]; 4],
}

/// Screen-space camera: one world unit is one window pixel, the origin is the
/// top-left corner and y grows downward, matching sprite sheet and window
/// coordinates.
pub struct Camera2D {
    pub viewport: (u32, u32),
}

impl Camera2D {
    pub fn new(viewport_width: u32, viewport_height: u32) -> Self {
        Self {
            viewport: (viewport_width, viewport_height),
        }
    }

    pub fn build_uniform(&self) -> CameraUniform {
        let (w, h) = (self.viewport.0 as f32, self.viewport.1 as f32);
        let proj = Mat4::orthographic_rh(0.0, w, h, 0.0, -1.0, 1.0);

        CameraUniform {
            view_proj: proj.to_cols_array_2d(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec3;

    fn project(camera: &Camera2D, x: f32, y: f32) -> Vec3 {
        Mat4::from_cols_array_2d(&camera.build_uniform().view_proj)
            .project_point3(Vec3::new(x, y, 0.0))
    }

    #[test]
    fn window_corners_map_to_clip_corners() {
        let camera = Camera2D::new(800, 600);
        let top_left = project(&camera, 0.0, 0.0);
        let bottom_right = project(&camera, 800.0, 600.0);
        assert!((top_left.x + 1.0).abs() < 1e-5 && (top_left.y - 1.0).abs() < 1e-5);
        assert!((bottom_right.x - 1.0).abs() < 1e-5 && (bottom_right.y + 1.0).abs() < 1e-5);
    }

    #[test]
    fn resized_viewport_keeps_pixels_one_to_one() {
        let mut camera = Camera2D::new(800, 600);
        camera.viewport = (1024, 768);
        let center = project(&camera, 512.0, 384.0);
        assert!(center.x.abs() < 1e-5);
        assert!(center.y.abs() < 1e-5);
    }
}
