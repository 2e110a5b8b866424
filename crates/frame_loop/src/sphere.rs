use crate::error::FrameLoopError;
use crate::error::FrameLoopResult;
use crate::geometry::Mesh;
use crate::geometry::Semantic;
use crate::geometry::VertexStream;
use std::f32::consts::PI;
use std::f32::consts::TAU;

/// UV sphere with shared pole vertices.
///
/// With the default 20 stacks and 20 slices this produces 382 vertices and 2280 indices.
#[derive(Debug, Clone, PartialEq)]
pub struct SphereMesh {
    pub positions: Vec<f32>,
    pub normals: Vec<f32>,
    pub texcoords: Vec<f32>,
    pub elements: Vec<u16>,
}

impl Default for SphereMesh {
    fn default() -> Self {
        Self::build(1.0, 20, 20)
    }
}

fn vertex_count_for(stacks: u32, slices: u32) -> u32 {
    2 + (stacks - 1) * slices
}

impl SphereMesh {
    /// Rejects spheres with fewer than 2 stacks or 3 slices, and spheres whose vertices
    /// do not fit 16-bit indices.
    pub fn new(radius: f32, stacks: u16, slices: u16) -> FrameLoopResult<Self> {
        let fits = stacks >= 2
            && slices >= 3
            && vertex_count_for(stacks as u32, slices as u32) <= u16::MAX as u32 + 1;
        if !fits {
            return Err(FrameLoopError::SphereParameters { stacks, slices });
        }
        Ok(Self::build(radius, stacks, slices))
    }

    fn build(radius: f32, stacks: u16, slices: u16) -> Self {
        let stacks = stacks as u32;
        let slices = slices as u32;
        let ring_count = stacks - 1;
        let vertex_count = vertex_count_for(stacks, slices);

        let mut sphere = SphereMesh {
            positions: Vec::with_capacity(vertex_count as usize * 3),
            normals: Vec::with_capacity(vertex_count as usize * 3),
            texcoords: Vec::with_capacity(vertex_count as usize * 2),
            elements: Vec::with_capacity((2 * slices * ring_count * 3) as usize),
        };

        sphere.push_vertex(radius, [0.0, 1.0, 0.0], [0.5, 0.0]);
        for stack in 1..stacks {
            let phi = PI * stack as f32 / stacks as f32;
            let (sin_phi, cos_phi) = phi.sin_cos();
            for slice in 0..slices {
                let theta = TAU * slice as f32 / slices as f32;
                let (sin_theta, cos_theta) = theta.sin_cos();
                sphere.push_vertex(
                    radius,
                    [sin_phi * cos_theta, cos_phi, sin_phi * sin_theta],
                    [
                        slice as f32 / slices as f32,
                        stack as f32 / stacks as f32,
                    ],
                );
            }
        }
        sphere.push_vertex(radius, [0.0, -1.0, 0.0], [0.5, 1.0]);

        let north = 0u32;
        let south = vertex_count - 1;
        let ring = |stack: u32, slice: u32| 1 + (stack - 1) * slices + slice % slices;

        for slice in 0..slices {
            sphere.push_triangle(north, ring(1, slice + 1), ring(1, slice));
        }
        for stack in 1..ring_count {
            for slice in 0..slices {
                let a = ring(stack, slice);
                let b = ring(stack, slice + 1);
                let c = ring(stack + 1, slice);
                let d = ring(stack + 1, slice + 1);
                sphere.push_triangle(a, b, c);
                sphere.push_triangle(b, d, c);
            }
        }
        for slice in 0..slices {
            sphere.push_triangle(south, ring(ring_count, slice), ring(ring_count, slice + 1));
        }

        sphere
    }

    fn push_vertex(&mut self, radius: f32, normal: [f32; 3], texcoord: [f32; 2]) {
        self.positions.extend(normal.iter().map(|n| n * radius));
        self.normals.extend(normal);
        self.texcoords.extend(texcoord);
    }

    fn push_triangle(&mut self, a: u32, b: u32, c: u32) {
        self.elements.extend([a as u16, b as u16, c as u16]);
    }

    pub fn vertex_count(&self) -> u32 {
        self.positions.len() as u32 / 3
    }

    pub fn element_count(&self) -> u32 {
        self.elements.len() as u32
    }

    pub fn into_mesh(self) -> Mesh {
        Mesh {
            streams: vec![
                VertexStream::new(Semantic::Position, self.positions),
                VertexStream::new(Semantic::Normal, self.normals),
                VertexStream::new(Semantic::TexCoord, self.texcoords),
            ],
            indices: Some(self.elements),
        }
    }
}
