use bevy_math::Mat4;
use bevy_math::Vec3;

/// Perspective projection constants. Only the aspect ratio changes at runtime.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Projection {
    pub fov_y_degrees: f32,
    pub near: f32,
    pub far: f32,
}

impl Default for Projection {
    fn default() -> Self {
        Self {
            fov_y_degrees: 45.0,
            near: 0.1,
            far: 100.0,
        }
    }
}

impl Projection {
    /// Left-handed perspective with depth mapped to `[0, 1]`.
    pub fn matrix(&self, width: u32, height: u32) -> Mat4 {
        Mat4::perspective_lh(
            self.fov_y_degrees.to_radians(),
            width as f32 / height as f32,
            self.near,
            self.far,
        )
    }
}

/// Recovers `width / height` from a matrix built by [`Projection::matrix`].
pub fn aspect_ratio_of(projection: &Mat4) -> f32 {
    projection.y_axis.y / projection.x_axis.x
}

/// Per-frame world, view and projection. The world and view never change in these samples.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transforms {
    pub world: Mat4,
    pub view: Mat4,
    pub projection: Mat4,
}

impl Transforms {
    pub fn new(world_translation: Vec3) -> Self {
        Self {
            world: Mat4::from_translation(world_translation),
            view: Mat4::IDENTITY,
            projection: Mat4::IDENTITY,
        }
    }

    pub fn world_view_projection(&self) -> Mat4 {
        self.projection * self.view * self.world
    }
}

/// Layout of the `cbuffer` the vertex shaders read. Column-major, matching HLSL's default packing.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConstantBuffer {
    pub world_view_projection: [f32; 16],
}

impl From<Mat4> for ConstantBuffer {
    fn from(matrix: Mat4) -> Self {
        Self {
            world_view_projection: matrix.to_cols_array(),
        }
    }
}

/// Where a model-space point lands on a `width` x `height` target, in pixels with y down.
/// `z` is the depth-buffer value.
pub fn project_to_screen(wvp: &Mat4, point: Vec3, width: u32, height: u32) -> Vec3 {
    let clip = *wvp * point.extend(1.0);
    let ndc = clip.truncate() / clip.w;
    Vec3::new(
        (ndc.x + 1.0) * 0.5 * width as f32,
        (1.0 - ndc.y) * 0.5 * height as f32,
        ndc.z,
    )
}
