use crate::action::{Action, FrameInput};
use cubecam_camera::{Camera, Eulers};
use glam::{Vec2, Vec3};
use serde::{Deserialize, Serialize};

/// Largest pitch magnitude, in degrees, the controller lets through.
///
/// +/-90 is the singular pose where the basis derivation breaks down.
pub const PITCH_LIMIT: f32 = 89.0;

/// Tunable fly-control parameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ControlSettings {
    /// Degrees of rotation per unit of mouse motion.
    pub sensitivity: f32,
    /// Movement speed in world units per second.
    pub speed: f32,
    /// Speed factor while [`Action::Sprint`] is held.
    pub sprint_multiplier: f32,
}

impl Default for ControlSettings {
    fn default() -> Self {
        Self {
            sensitivity: 0.1,
            speed: 2.5,
            sprint_multiplier: 2.0,
        }
    }
}

pub fn clamp_pitch(pitch: f32) -> f32 {
    pitch.clamp(-PITCH_LIMIT, PITCH_LIMIT)
}

/// Keeps yaw in `[0, 360)`. Trigonometry is unaffected.
pub fn wrap_yaw(yaw: f32) -> f32 {
    yaw.rem_euclid(360.0)
}

/// Applies one frame of input to a camera.
#[derive(Debug, Clone, Default)]
pub struct FlyController {
    pub settings: ControlSettings,
}

impl FlyController {
    pub fn new(settings: ControlSettings) -> Self {
        Self { settings }
    }

    /// Accumulate a look delta into `eulers`, then clamp pitch and wrap yaw.
    pub fn look(&self, eulers: &mut Eulers, delta: Vec2) {
        let s = self.settings.sensitivity;
        eulers.pitch = clamp_pitch(eulers.pitch + delta.y * s);
        eulers.yaw = wrap_yaw(eulers.yaw + delta.x * s);
    }

    /// Current movement speed, including the sprint factor.
    pub fn speed(&self, input: &FrameInput) -> f32 {
        if input.holds(Action::Sprint) {
            self.settings.speed * self.settings.sprint_multiplier
        } else {
            self.settings.speed
        }
    }

    /// World-space displacement for this frame along the camera's basis.
    pub fn displacement(&self, camera: &Camera, input: &FrameInput) -> Vec3 {
        let mut dir = Vec3::ZERO;
        if input.holds(Action::MoveForward) {
            dir += camera.forward();
        }
        if input.holds(Action::MoveBackward) {
            dir -= camera.forward();
        }
        // `right` points to the viewer's left.
        if input.holds(Action::StrafeLeft) {
            dir += camera.right();
        }
        if input.holds(Action::StrafeRight) {
            dir -= camera.right();
        }
        if input.holds(Action::Ascend) {
            dir += camera.up();
        }
        if input.holds(Action::Descend) {
            dir -= camera.up();
        }
        dir * self.speed(input) * input.dt
    }

    /// Run the full per-frame policy: look, refresh the basis, move along it,
    /// and leave the camera's derived state current.
    pub fn apply(&self, camera: &mut Camera, input: &FrameInput) {
        self.look(&mut camera.eulers, input.look_delta);
        camera.update();

        let step = self.displacement(camera, input);
        if step != Vec3::ZERO {
            camera.position += step;
            camera.update();
        }

        tracing::trace!(
            x = camera.position.x,
            y = camera.position.y,
            z = camera.position.z,
            pitch = camera.eulers.pitch,
            yaw = camera.eulers.yaw,
            "camera input applied"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f32 = 1e-5;

    fn facing_neg_z() -> Camera {
        Camera::new(Vec3::ZERO, Eulers::new(0.0, 0.0, -90.0))
    }

    #[test]
    fn pitch_clamps_exactly_at_limit() {
        let ctrl = FlyController::default();
        let mut eulers = Eulers::new(85.0, 0.0, 0.0);
        ctrl.look(&mut eulers, Vec2::new(0.0, 100.0));
        assert_eq!(eulers.pitch, 89.0);

        let mut eulers = Eulers::new(-85.0, 0.0, 0.0);
        ctrl.look(&mut eulers, Vec2::new(0.0, -100.0));
        assert_eq!(eulers.pitch, -89.0);
    }

    #[test]
    fn pitch_inside_limit_accumulates() {
        let ctrl = FlyController::default();
        let mut eulers = Eulers::new(85.0, 0.0, 0.0);
        ctrl.look(&mut eulers, Vec2::new(0.0, 10.0));
        assert!((eulers.pitch - 86.0).abs() < EPS);
    }

    #[test]
    fn out_of_range_pitch_is_clamped_even_without_motion() {
        let ctrl = FlyController::default();
        let mut cam = facing_neg_z();
        cam.eulers.pitch = 120.0;
        ctrl.apply(&mut cam, &FrameInput::new(0.016));
        assert_eq!(cam.eulers.pitch, PITCH_LIMIT);
        assert!(cam.view().is_finite());
    }

    #[test]
    fn yaw_wraps() {
        assert!((wrap_yaw(370.0) - 10.0).abs() < EPS);
        assert!((wrap_yaw(-90.0) - 270.0).abs() < EPS);
        assert_eq!(wrap_yaw(0.0), 0.0);

        let ctrl = FlyController::default();
        let mut eulers = Eulers::new(0.0, 0.0, 350.0);
        ctrl.look(&mut eulers, Vec2::new(200.0, 0.0));
        assert!((eulers.yaw - 10.0).abs() < 1e-3);
    }

    #[test]
    fn look_leaves_roll_alone() {
        let ctrl = FlyController::default();
        let mut eulers = Eulers::new(0.0, 12.0, 0.0);
        ctrl.look(&mut eulers, Vec2::new(30.0, -40.0));
        assert_eq!(eulers.roll, 12.0);
    }

    #[test]
    fn move_forward_follows_view_direction() {
        let ctrl = FlyController::default();
        let mut cam = facing_neg_z();
        let input = FrameInput::new(1.0).with_action(Action::MoveForward);
        ctrl.apply(&mut cam, &input);
        assert!(cam.position.abs_diff_eq(Vec3::new(0.0, 0.0, -2.5), EPS));
    }

    #[test]
    fn sprint_doubles_speed() {
        let ctrl = FlyController::default();
        let walk = FrameInput::new(0.5).with_action(Action::MoveForward);
        let sprint = walk.clone().with_action(Action::Sprint);
        assert_eq!(ctrl.speed(&sprint), 2.0 * ctrl.speed(&walk));

        let cam = facing_neg_z();
        let a = ctrl.displacement(&cam, &walk);
        let b = ctrl.displacement(&cam, &sprint);
        assert!(b.abs_diff_eq(a * 2.0, EPS));
    }

    #[test]
    fn strafe_right_moves_to_viewers_right() {
        let ctrl = FlyController::default();
        let mut cam = facing_neg_z();
        let input = FrameInput::new(1.0).with_action(Action::StrafeRight);
        ctrl.apply(&mut cam, &input);
        assert!(cam.position.x > 0.0);
        assert!(cam.position.z.abs() < EPS);
    }

    #[test]
    fn ascend_moves_along_camera_up() {
        let ctrl = FlyController::default();
        let mut cam = facing_neg_z();
        ctrl.apply(&mut cam, &FrameInput::new(2.0).with_action(Action::Ascend));
        assert!(cam.position.abs_diff_eq(Vec3::new(0.0, 5.0, 0.0), EPS));
    }

    #[test]
    fn opposing_actions_cancel() {
        let ctrl = FlyController::default();
        let mut cam = facing_neg_z();
        let input = FrameInput::new(1.0)
            .with_action(Action::MoveForward)
            .with_action(Action::MoveBackward)
            .with_action(Action::StrafeLeft)
            .with_action(Action::StrafeRight);
        ctrl.apply(&mut cam, &input);
        assert!(cam.position.abs_diff_eq(Vec3::ZERO, EPS));
    }

    #[test]
    fn apply_leaves_camera_current() {
        let ctrl = FlyController::default();
        let mut cam = facing_neg_z();
        let input = FrameInput::new(0.1)
            .with_look(Vec2::new(45.0, 20.0))
            .with_action(Action::MoveForward);
        ctrl.apply(&mut cam, &input);

        let mut fresh = cam.clone();
        fresh.update();
        assert_eq!(fresh, cam);
    }

    #[test]
    fn settings_fill_missing_fields() {
        let s: ControlSettings = serde_yaml::from_str("speed: 5.0\n").unwrap();
        assert_eq!(s.speed, 5.0);
        assert_eq!(s.sensitivity, 0.1);
        assert_eq!(s.sprint_multiplier, 2.0);
    }
}
