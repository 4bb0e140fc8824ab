use bytemuck::{Pod, Zeroable};
use cubecam_camera::{Camera, Projection};
use glam::Mat4;

/// Matrices for one frame, all column-major.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameMatrices {
    pub model: Mat4,
    pub view: Mat4,
    pub projection: Mat4,
}

impl FrameMatrices {
    /// The camera must be current (updated since its last pose write).
    pub fn new(camera: &Camera, projection: &Projection) -> Self {
        Self {
            model: Mat4::IDENTITY,
            view: camera.view(),
            projection: projection.matrix(),
        }
    }

    pub fn model_view_projection(&self) -> Mat4 {
        self.projection * self.view * self.model
    }
}

/// GPU layout of the scene uniform block in `vertex.wgsl`.
#[repr(C)]
#[derive(Debug, Copy, Clone, Pod, Zeroable)]
pub struct SceneUniforms {
    pub model: [[f32; 4]; 4],
    pub view: [[f32; 4]; 4],
    pub projection: [[f32; 4]; 4],
    pub time: f32,
    _pad: [f32; 3],
}

impl SceneUniforms {
    pub fn new(matrices: &FrameMatrices, time: f32) -> Self {
        Self {
            model: matrices.model.to_cols_array_2d(),
            view: matrices.view.to_cols_array_2d(),
            projection: matrices.projection.to_cols_array_2d(),
            time,
            _pad: [0.0; 3],
        }
    }
}

impl Default for SceneUniforms {
    fn default() -> Self {
        let identity = FrameMatrices {
            model: Mat4::IDENTITY,
            view: Mat4::IDENTITY,
            projection: Mat4::IDENTITY,
        };
        Self::new(&identity, 0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cubecam_camera::Eulers;
    use glam::Vec3;

    #[test]
    fn uniform_block_matches_wgsl_size() {
        // Three mat4x4<f32> plus an f32, rounded up to 16-byte alignment.
        assert_eq!(std::mem::size_of::<SceneUniforms>(), 208);
    }

    #[test]
    fn model_is_identity() {
        let cam = Camera::default();
        let m = FrameMatrices::new(&cam, &Projection::default());
        assert_eq!(m.model, Mat4::IDENTITY);
        assert_eq!(m.view, cam.view());
    }

    #[test]
    fn origin_projects_to_screen_centre() {
        let cam = Camera::new(Vec3::new(0.0, 0.0, 5.0), Eulers::new(0.0, 0.0, -90.0));
        let m = FrameMatrices::new(&cam, &Projection::default());
        let ndc = m.model_view_projection().project_point3(Vec3::ZERO);
        assert!(ndc.x.abs() < 1e-5 && ndc.y.abs() < 1e-5);
        assert!(ndc.z > 0.0 && ndc.z < 1.0);
    }

    #[test]
    fn uniforms_copy_columns_and_time() {
        let cam = Camera::default();
        let m = FrameMatrices::new(&cam, &Projection::default());
        let u = SceneUniforms::new(&m, 1.5);
        assert_eq!(u.view, cam.view().to_cols_array_2d());
        assert_eq!(u.time, 1.5);
        assert_eq!(bytemuck::bytes_of(&u).len(), 208);
    }
}
