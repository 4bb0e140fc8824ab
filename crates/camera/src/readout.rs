use crate::camera::{Camera, Eulers};
use serde::Serialize;

/// Read-only snapshot of the camera pose for HUD and CLI output.
#[derive(Debug, Clone, Serialize)]
pub struct PoseReadout {
    pub position: [f32; 3],
    pub eulers: Eulers,
    pub forward: [f32; 3],
    /// Column-major view matrix.
    pub view: [[f32; 4]; 4],
}

impl PoseReadout {
    pub fn capture(camera: &Camera) -> Self {
        Self {
            position: camera.position.to_array(),
            eulers: camera.eulers,
            forward: camera.forward().to_array(),
            view: camera.view().to_cols_array_2d(),
        }
    }
}

impl std::fmt::Display for PoseReadout {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "pos=({:.2}, {:.2}, {:.2}) pitch={:.1} yaw={:.1} roll={:.1} fwd=({:.2}, {:.2}, {:.2})",
            self.position[0],
            self.position[1],
            self.position[2],
            self.eulers.pitch,
            self.eulers.yaw,
            self.eulers.roll,
            self.forward[0],
            self.forward[1],
            self.forward[2],
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec3;

    #[test]
    fn capture_copies_pose() {
        let cam = Camera::new(Vec3::new(1.0, 2.0, 3.0), Eulers::new(5.0, 0.0, 90.0));
        let readout = PoseReadout::capture(&cam);
        assert_eq!(readout.position, [1.0, 2.0, 3.0]);
        assert_eq!(readout.eulers.yaw, 90.0);
        assert_eq!(readout.view, cam.view().to_cols_array_2d());
    }

    #[test]
    fn display_shows_position_and_angles() {
        let cam = Camera::new(Vec3::new(0.0, 0.0, 5.0), Eulers::new(-12.5, 0.0, -90.0));
        let s = PoseReadout::capture(&cam).to_string();
        assert!(s.contains("pos=(0.00, 0.00, 5.00)"));
        assert!(s.contains("pitch=-12.5"));
        assert!(s.contains("yaw=-90.0"));
    }
}
