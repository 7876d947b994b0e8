//! Transform of the ground plane.
//!
//! The plane is stretched to 800 units on X and Z, lifted and pushed back, and
//! spun around Y as the touch point moves across the screen: one full screen
//! width turns it four times.

use cgmath::{frustum, Matrix4, Point2, Rad, Vector2, Vector3};

use crate::engine_state::rendering::draw_bucket::BucketTransform;

/// Transformation matrix to convert from OpenGL's coordinate system to WGPU's.
///
/// NDC depth in WGPU runs from 0 to 1 instead of -1 to 1, so Z is scaled by
/// 0.5 and shifted by 0.5.
#[rustfmt::skip]
pub const OPENGL_TO_WGPU_MATRIX: Matrix4<f32> = Matrix4::new(
    1.0, 0.0, 0.0, 0.0,
    0.0, 1.0, 0.0, 0.0,
    0.0, 0.0, 0.5, 0.0,
    0.0, 0.0, 0.5, 1.0,
);

const PLANE_SCALE: [f32; 3] = [800.0, 1.0, 800.0];
const PLANE_OFFSET: [f32; 3] = [0.0, 2.0, 10.0];
/// Radians of spin per screen width of touch travel
#[allow(clippy::approx_constant)]
const SPIN_PER_WIDTH: f32 = 3.14 * 8.0;
const Z_NEAR: f32 = 0.1;
const Z_FAR: f32 = 100.0;

/// Spin angle of the plane for a touch point.
pub fn plane_angle(touch: Point2<f32>, resolution: Vector2<f32>) -> Rad<f32> {
    if resolution.x <= 0.0 {
        return Rad(0.0);
    }
    Rad(touch.x / resolution.x * SPIN_PER_WIDTH)
}

/// Model and projection of the plane for the current touch point.
pub fn plane_transform(touch: Point2<f32>, resolution: Vector2<f32>) -> BucketTransform {
    let [sx, sy, sz] = PLANE_SCALE;
    let model = Matrix4::from_nonuniform_scale(sx, sy, sz)
        * Matrix4::from_angle_y(plane_angle(touch, resolution))
        * Matrix4::from_translation(Vector3::from(PLANE_OFFSET));
    let projection = OPENGL_TO_WGPU_MATRIX
        * frustum(0.0, resolution.x, 0.0, resolution.y, Z_NEAR, Z_FAR);

    BucketTransform { model, projection }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use cgmath::{Vector4, Zero};

    fn resolution() -> Vector2<f32> {
        Vector2::new(1080.0, 2000.0)
    }

    #[test]
    fn test_angle_follows_touch_x() {
        assert_relative_eq!(plane_angle(Point2::new(0.0, 500.0), resolution()).0, 0.0);
        assert_relative_eq!(
            plane_angle(Point2::new(1080.0, 0.0), resolution()).0,
            3.14 * 8.0
        );
        assert_relative_eq!(
            plane_angle(Point2::new(10.0, 10.0), Vector2::zero()).0,
            0.0
        );
    }

    #[test]
    fn test_model_scales_after_translating() {
        let transform = plane_transform(Point2::new(0.0, 0.0), resolution());
        let origin = transform.model * Vector4::new(0.0, 0.0, 0.0, 1.0);

        assert_relative_eq!(origin.x, 0.0);
        assert_relative_eq!(origin.y, 2.0);
        assert_relative_eq!(origin.z, 8000.0);
        assert_relative_eq!(origin.w, 1.0);
    }

    #[test]
    fn test_projection_maps_near_plane_to_zero_depth() {
        let transform = plane_transform(Point2::new(0.0, 0.0), resolution());
        let clip = transform.projection * Vector4::new(540.0, 1000.0, -Z_NEAR, 1.0);
        assert_relative_eq!(clip.z / clip.w, 0.0, epsilon = 1e-5);
    }
}
