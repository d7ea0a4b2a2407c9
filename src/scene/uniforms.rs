use std::f32::consts::FRAC_PI_2;

use ash::vk;
use nalgebra::{Matrix4, Point3, Vector3};

/// The per-frame uniform data consumed by the vertex shader. Matrices are
/// column-major, matching GLSL's default mat4 layout.
#[derive(Debug, Copy, Clone, PartialEq)]
#[repr(C)]
pub struct UniformBufferObject {
    pub model: [[f32; 4]; 4],
    pub view: [[f32; 4]; 4],
    pub proj: [[f32; 4]; 4],
}

impl UniformBufferObject {
    /// Compute the model, view, and projection matrices for a point in time.
    ///
    /// The model spins about +Z at 90 degrees per second. The camera looks
    /// at the origin from (2, 2, 2) with +Z up. The projection flips Y
    /// because Vulkan's clip space points Y down while the view matrix
    /// assumes Y up.
    pub fn mvp_at(seconds: f32, extent: vk::Extent2D) -> Self {
        let model = Matrix4::from_axis_angle(
            &Vector3::z_axis(),
            seconds * FRAC_PI_2,
        );

        let view = Matrix4::look_at_rh(
            &Point3::new(2.0, 2.0, 2.0),
            &Point3::origin(),
            &Vector3::z(),
        );

        let aspect = extent.width as f32 / extent.height.max(1) as f32;
        let mut proj = Matrix4::new_perspective(
            aspect,
            45.0_f32.to_radians(),
            0.1,
            10.0,
        );
        proj[(1, 1)] *= -1.0;

        Self {
            model: model.into(),
            view: view.into(),
            proj: proj.into(),
        }
    }
}

#[cfg(test)]
mod test {
    use approx::assert_relative_eq;

    use super::*;

    const EXTENT: vk::Extent2D = vk::Extent2D {
        width: 800,
        height: 600,
    };

    #[test]
    fn the_model_matrix_starts_as_identity() {
        let ubo = UniformBufferObject::mvp_at(0.0, EXTENT);
        let model = Matrix4::from(ubo.model);
        assert_relative_eq!(model, Matrix4::identity(), epsilon = 1e-6);
    }

    #[test]
    fn the_model_completes_a_quarter_turn_each_second() {
        let ubo = UniformBufferObject::mvp_at(1.0, EXTENT);
        let model = Matrix4::from(ubo.model);
        let expected = Matrix4::from_axis_angle(
            &Vector3::z_axis(),
            std::f32::consts::FRAC_PI_2,
        );
        assert_relative_eq!(model, expected, epsilon = 1e-6);
    }

    #[test]
    fn the_view_matrix_moves_the_eye_to_the_origin() {
        let ubo = UniformBufferObject::mvp_at(0.0, EXTENT);
        let view = Matrix4::from(ubo.view);
        let eye = view.transform_point(&Point3::new(2.0, 2.0, 2.0));
        assert_relative_eq!(eye, Point3::origin(), epsilon = 1e-5);
    }

    #[test]
    fn the_projection_flips_y_for_vulkan_clip_space() {
        let ubo = UniformBufferObject::mvp_at(0.0, EXTENT);
        assert!(ubo.proj[1][1] < 0.0);
    }
}
