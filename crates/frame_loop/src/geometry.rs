use crate::error::FrameLoopError;
use crate::error::FrameLoopResult;

/// Vertex input semantics the samples use. Each maps to one float stream in its own slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Semantic {
    Position,
    Color,
    Normal,
    TexCoord,
}

impl Semantic {
    pub fn name(self) -> &'static str {
        match self {
            Semantic::Position => "POSITION",
            Semantic::Color => "COLOR",
            Semantic::Normal => "NORMAL",
            Semantic::TexCoord => "TEXCOORD",
        }
    }

    /// Floats per vertex.
    pub fn components(self) -> u32 {
        match self {
            Semantic::TexCoord => 2,
            _ => 3,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct VertexStream {
    pub semantic: Semantic,
    pub data: Vec<f32>,
}

impl VertexStream {
    pub fn new(semantic: Semantic, data: Vec<f32>) -> Self {
        Self { semantic, data }
    }

    pub fn stride(&self) -> u32 {
        self.semantic.components() * std::mem::size_of::<f32>() as u32
    }

    pub fn byte_width(&self) -> u32 {
        (self.data.len() * std::mem::size_of::<f32>()) as u32
    }
}

/// Static geometry uploaded once at startup, one vertex buffer per stream.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Mesh {
    pub streams: Vec<VertexStream>,
    pub indices: Option<Vec<u16>>,
}

impl Mesh {
    pub fn stream(&self, semantic: Semantic) -> Option<&VertexStream> {
        self.streams.iter().find(|s| s.semantic == semantic)
    }

    pub fn vertex_count(&self) -> u32 {
        self.stream(Semantic::Position)
            .map(|s| s.data.len() as u32 / s.semantic.components())
            .unwrap_or(0)
    }

    /// Vertices or indices covered by the single draw call.
    pub fn draw_count(&self) -> u32 {
        match &self.indices {
            Some(indices) => indices.len() as u32,
            None => self.vertex_count(),
        }
    }

    /// The streams bound to input slots `0..inputs.len()`, in the order the vertex shader declares.
    pub fn streams_for(&self, inputs: &[Semantic]) -> FrameLoopResult<Vec<&VertexStream>> {
        inputs
            .iter()
            .map(|semantic| {
                self.stream(*semantic)
                    .ok_or(FrameLoopError::InputLayoutMismatch {
                        semantic: semantic.name(),
                    })
            })
            .collect()
    }
}

pub const TRIANGLE_POSITIONS: [f32; 9] = [
    0.0, 1.0, 0.0, //
    1.0, -1.0, 0.0, //
    -1.0, -1.0, 0.0,
];

pub const TRIANGLE_COLORS: [f32; 9] = [
    1.0, 0.0, 0.0, //
    0.0, 0.0, 1.0, //
    0.0, 1.0, 0.0,
];

/// The red/blue/green triangle, drawn without an index buffer.
pub fn triangle() -> Mesh {
    Mesh {
        streams: vec![
            VertexStream::new(Semantic::Position, TRIANGLE_POSITIONS.to_vec()),
            VertexStream::new(Semantic::Color, TRIANGLE_COLORS.to_vec()),
        ],
        indices: None,
    }
}
