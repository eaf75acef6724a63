use crate::math::{to_radians, Matrix4, Vector3};

/// Starting position used by the demo scene: ten units in front of the origin.
pub const DEFAULT_CAMERA_POSITION: Vector3 = Vector3::new(0.0, 0.0, -10.0);

/// Viewer position + orientation with a cached view matrix.
///
/// `rotation` holds Euler angles in degrees: `x` is pitch, `y` is yaw and
/// `z` is roll. The view matrix is derived state; it only changes when
/// [`Camera::render`] runs.
#[derive(Debug, Clone)]
pub struct Camera {
    position: Vector3,
    rotation: Vector3,
    view_matrix: Matrix4,
    view_updates: u64,
}

impl Camera {
    pub fn new(position: Vector3) -> Self {
        Self {
            position,
            rotation: Vector3::ZERO,
            view_matrix: Matrix4::identity(),
            view_updates: 0,
        }
    }

    pub fn position(&self) -> Vector3 {
        self.position
    }

    pub fn set_position(&mut self, position: Vector3) {
        self.position = position;
    }

    pub fn rotation(&self) -> Vector3 {
        self.rotation
    }

    pub fn set_rotation(&mut self, rotation_degrees: Vector3) {
        self.rotation = rotation_degrees;
    }

    /// View matrix computed by the most recent [`Camera::render`].
    pub fn view_matrix(&self) -> Matrix4 {
        self.view_matrix
    }

    /// How many times [`Camera::render`] has run.
    pub fn view_updates(&self) -> u64 {
        self.view_updates
    }

    /// World-space point the camera looks at for the current position/rotation.
    pub fn look_target(&self) -> Vector3 {
        let (_, look) = self.oriented_axes();
        look + self.position
    }

    /// Recomputes the view matrix from `position` and `rotation`.
    pub fn render(&mut self) {
        let (up, look) = self.oriented_axes();
        let target = look + self.position;
        self.view_matrix = look_at_lh(self.position, target, up);
        self.view_updates += 1;
    }

    /// Canonical up/look vectors rotated into the camera's orientation.
    ///
    /// The rotation matrix has no translation, so only direction changes here.
    fn oriented_axes(&self) -> (Vector3, Vector3) {
        let pitch = to_radians(self.rotation.x);
        let yaw = to_radians(self.rotation.y);
        let roll = to_radians(self.rotation.z);

        let rotation = Matrix4::rotation_yaw_pitch_roll(yaw, pitch, roll);
        (
            Vector3::UP.transform(&rotation),
            Vector3::FORWARD.transform(&rotation),
        )
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self::new(DEFAULT_CAMERA_POSITION)
    }
}

/// Builds a left-handed look-at view matrix.
///
/// Rows 0..3 hold the camera basis as columns. The translation row is
/// `(-x·p, y·p, z·p)`: only the x term is negated.
#[rustfmt::skip]
pub fn look_at_lh(position: Vector3, target: Vector3, up: Vector3) -> Matrix4 {
    let z_axis = (target - position).normalize();
    let x_axis = up.cross(z_axis).normalize();
    let y_axis = z_axis.cross(x_axis);

    Matrix4::from_array([
        x_axis.x, y_axis.x, z_axis.x, 0.0,
        x_axis.y, y_axis.y, z_axis.y, 0.0,
        x_axis.z, y_axis.z, z_axis.z, 0.0,
        -x_axis.dot(position), y_axis.dot(position), z_axis.dot(position), 1.0,
    ])
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f32 = 1e-5;

    fn basis(view: &Matrix4) -> [Vector3; 3] {
        let col = |c: usize| Vector3::new(view.get(0, c), view.get(1, c), view.get(2, c));
        [col(0), col(1), col(2)]
    }

    fn assert_orthonormal(view: &Matrix4) {
        let [x, y, z] = basis(view);
        for axis in [x, y, z] {
            assert!((axis.length() - 1.0).abs() < 1e-4, "non-unit axis {axis:?}");
        }
        assert!(x.dot(y).abs() < 1e-4);
        assert!(y.dot(z).abs() < 1e-4);
        assert!(z.dot(x).abs() < 1e-4);
    }

    #[test]
    fn default_camera_looks_down_positive_z() {
        let camera = Camera::default();
        assert_eq!(camera.position(), Vector3::new(0.0, 0.0, -10.0));
        assert_eq!(camera.look_target(), Vector3::new(0.0, 0.0, -9.0));
    }

    #[test]
    fn view_matrix_is_stale_until_render() {
        let mut camera = Camera::default();
        assert_eq!(camera.view_matrix(), Matrix4::identity());

        camera.render();
        let first = camera.view_matrix();
        assert_ne!(first, Matrix4::identity());

        camera.set_rotation(Vector3::new(0.0, 30.0, 0.0));
        assert_eq!(camera.view_matrix(), first);

        camera.render();
        assert_ne!(camera.view_matrix(), first);
        assert_eq!(camera.view_updates(), 2);
    }

    #[test]
    fn unrotated_basis_is_the_world_axes() {
        let mut camera = Camera::default();
        camera.render();

        let [x, y, z] = basis(&camera.view_matrix());
        assert_eq!(x, Vector3::new(1.0, 0.0, 0.0));
        assert_eq!(y, Vector3::new(0.0, 1.0, 0.0));
        assert_eq!(z, Vector3::new(0.0, 0.0, 1.0));
        assert_orthonormal(&camera.view_matrix());
    }

    #[test]
    fn rotated_basis_stays_orthonormal() {
        let mut camera = Camera::new(Vector3::new(2.0, -1.0, 5.0));
        for rot in [
            Vector3::new(15.0, 45.0, 0.0),
            Vector3::new(-30.0, 200.0, 10.0),
            Vector3::new(60.0, -90.0, 45.0),
        ] {
            camera.set_rotation(rot);
            camera.render();
            assert_orthonormal(&camera.view_matrix());
        }
    }

    #[test]
    fn yaw_turns_the_look_target() {
        let mut camera = Camera::new(Vector3::ZERO);
        camera.set_rotation(Vector3::new(0.0, 90.0, 0.0));
        let t = camera.look_target();
        assert!((t.x - 1.0).abs() < EPS && t.y.abs() < EPS && t.z.abs() < EPS, "{t:?}");
    }

    #[test]
    fn translation_row_negates_only_x() {
        // Pins the asymmetric sign convention; a "fixed" look-at would fail here.
        let mut camera = Camera::new(Vector3::new(3.0, 4.0, -10.0));
        camera.render();
        assert_eq!(camera.view_matrix().row(3), [-3.0, 4.0, -10.0, 1.0]);
    }

    #[test]
    fn look_at_matches_camera_render() {
        let mut camera = Camera::new(Vector3::new(1.0, 2.0, 3.0));
        camera.set_rotation(Vector3::new(10.0, 20.0, 30.0));
        camera.render();

        let up = Vector3::UP.transform(&Matrix4::rotation_yaw_pitch_roll(
            to_radians(20.0),
            to_radians(10.0),
            to_radians(30.0),
        ));
        let expected = look_at_lh(camera.position(), camera.look_target(), up);
        assert!(camera.view_matrix().approx_eq(&expected, EPS));
    }
}
