use glam::{Mat4, Vec3};
use serde::{Deserialize, Serialize};

/// Fixed vertical reference used to derive the camera basis.
///
/// The camera's own `up` is never fed back into the derivation.
pub const WORLD_UP: Vec3 = Vec3::Y;

/// Orientation angles in degrees.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Eulers {
    pub pitch: f32,
    pub roll: f32,
    pub yaw: f32,
}

impl Eulers {
    pub fn new(pitch: f32, roll: f32, yaw: f32) -> Self {
        Self { pitch, roll, yaw }
    }

    /// Unit direction for these angles: yaw turns about world Y, pitch tilts
    /// away from the horizontal plane. Roll does not affect the direction.
    pub fn direction(&self) -> Vec3 {
        let (pitch, yaw) = (self.pitch.to_radians(), self.yaw.to_radians());
        Vec3::new(
            yaw.cos() * pitch.cos(),
            pitch.sin(),
            yaw.sin() * pitch.cos(),
        )
        .normalize()
    }
}

/// `[pitch, roll, yaw]`, the order the pose is written in settings files.
impl From<[f32; 3]> for Eulers {
    fn from([pitch, roll, yaw]: [f32; 3]) -> Self {
        Self { pitch, roll, yaw }
    }
}

impl From<Eulers> for [f32; 3] {
    fn from(e: Eulers) -> Self {
        [e.pitch, e.roll, e.yaw]
    }
}

/// First-person camera.
///
/// `position` and `eulers` are plain state that the input policy writes
/// directly. The basis and view matrix are derived from them and go stale
/// after such a write until the next [`Camera::update`].
#[derive(Debug, Clone, PartialEq)]
pub struct Camera {
    pub position: Vec3,
    pub eulers: Eulers,
    forward: Vec3,
    right: Vec3,
    up: Vec3,
    view: Mat4,
}

impl Default for Camera {
    fn default() -> Self {
        Self::new(Vec3::new(0.0, 0.0, 3.0), Eulers::new(0.0, 0.0, -90.0))
    }
}

impl Camera {
    /// Create a camera and compute its derived state.
    pub fn new(position: Vec3, eulers: Eulers) -> Self {
        let mut cam = Self {
            position,
            eulers,
            forward: Vec3::NEG_Z,
            right: Vec3::NEG_X,
            up: Vec3::Y,
            view: Mat4::IDENTITY,
        };
        cam.update();
        cam
    }

    /// Recompute `forward`, `right`, `up` and `view` from `eulers` and
    /// `position`.
    ///
    /// `right` is `world_up x forward`, which points to the viewer's left in
    /// a right-handed view. Pitch of exactly +/-90 degrees makes that cross
    /// product vanish and produces a NaN basis.
    pub fn update(&mut self) {
        self.forward = self.eulers.direction();
        self.right = WORLD_UP.cross(self.forward).normalize();
        self.up = self.forward.cross(self.right);
        self.view = Mat4::look_at_rh(self.position, self.position + self.forward, self.up);
    }

    /// Point the camera at `target` and re-derive `eulers` from the result.
    ///
    /// The view is built with [`WORLD_UP`] as reference. Angles are recovered
    /// from the view's `-Z` row (the world-space forward) as the exact inverse
    /// of [`Eulers::direction`], so calling [`Camera::update`] afterwards
    /// reproduces the same view. Roll is the signed angle about `forward`
    /// between the up vector `update` would derive and the view's up row,
    /// which is zero for a world-up look-at.
    ///
    /// Callers check [`Camera::can_look_at`] first; a target at the camera or
    /// straight above or below it yields a NaN basis.
    pub fn look_at(&mut self, target: Vec3) {
        self.view = Mat4::look_at_rh(self.position, target, WORLD_UP);

        let forward = -self.view.row(2).truncate();
        let view_up = self.view.row(1).truncate();

        let horizontal = (forward.x * forward.x + forward.z * forward.z).sqrt();
        let pitch = forward.y.atan2(horizontal);
        let yaw = forward.z.atan2(forward.x);

        let right = WORLD_UP.cross(forward).normalize();
        let free_up = forward.cross(right);
        let roll = free_up.cross(view_up).dot(forward).atan2(free_up.dot(view_up));

        self.eulers = Eulers::new(pitch.to_degrees(), roll.to_degrees(), yaw.to_degrees());
        self.forward = forward;
        self.right = right;
        self.up = view_up;

        tracing::debug!(
            pitch = self.eulers.pitch,
            yaw = self.eulers.yaw,
            roll = self.eulers.roll,
            "camera re-synced from look-at"
        );
    }

    /// Whether [`Camera::look_at`] can aim at `target`. False when the target
    /// is at the camera or straight above or below it, where no heading exists.
    pub fn can_look_at(&self, target: Vec3) -> bool {
        let offset = target - self.position;
        offset.x * offset.x + offset.z * offset.z > 1e-8
    }

    pub fn forward(&self) -> Vec3 {
        self.forward
    }

    pub fn right(&self) -> Vec3 {
        self.right
    }

    pub fn up(&self) -> Vec3 {
        self.up
    }

    /// World-to-camera transform, column-major and right-handed.
    pub fn view(&self) -> Mat4 {
        self.view
    }
}
