//! Source point cloud read from a header-delimited text file

use crate::point::*;

/// Property names that must all be declared for a cloud to carry vertex colors
pub const COLOR_PROPERTIES: [&str; 3] = ["red", "green", "blue"];

/// Whether the declared properties carry per-vertex color.
///
/// True iff every name in [`COLOR_PROPERTIES`] appears as an exact token,
/// in any order.
pub fn properties_have_color<S: AsRef<str>>(properties: &[S]) -> bool {
    COLOR_PROPERTIES
        .iter()
        .all(|channel| properties.iter().any(|p| p.as_ref() == *channel))
}

/// A polygon record holding 0-based vertex indices
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Face {
    pub indices: Vec<usize>,
}

impl Face {
    pub fn new(indices: Vec<usize>) -> Self {
        Self { indices }
    }

    /// Number of vertices in the polygon
    pub fn len(&self) -> usize {
        self.indices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    /// Indices converted to the 1-based convention of OBJ files
    pub fn one_based(&self) -> impl Iterator<Item = usize> + '_ {
        self.indices.iter().map(|&i| i + 1)
    }
}

/// Point cloud as declared by a PLY header and read from its body.
///
/// Built once by the reader and only read afterwards.
#[derive(Debug, Clone, PartialEq)]
pub struct SourceCloud {
    /// Vertex count declared in the header
    pub vertex_count: usize,
    /// Face count declared in the header
    pub face_count: usize,
    /// Property names in declaration order
    pub properties: Vec<String>,
    pub vertices: Vec<Point3d>,
    /// Normalized vertex colors, present only when the header declares color
    pub colors: Option<Vec<Color3>>,
    /// Retained polygons (3 or more vertices)
    pub faces: Vec<Face>,
    /// Face records skipped for having fewer than 3 vertices
    pub dropped_faces: usize,
}

impl SourceCloud {
    /// Create an empty cloud for the declared counts.
    ///
    /// Storage grows as records are read, so a declared count is never trusted
    /// as an allocation size. Color storage exists only if the properties
    /// declare all three channels.
    pub fn from_header(vertex_count: usize, face_count: usize, properties: Vec<String>) -> Self {
        let colors = properties_have_color(&properties).then(Vec::new);
        Self {
            vertex_count,
            face_count,
            properties,
            vertices: Vec::new(),
            colors,
            faces: Vec::new(),
            dropped_faces: 0,
        }
    }

    pub fn has_color(&self) -> bool {
        self.colors.is_some()
    }

    /// Number of vertices read so far
    pub fn len(&self) -> usize {
        self.vertices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    /// Color of vertex `index`, if the cloud carries colors
    pub fn color(&self, index: usize) -> Option<Color3> {
        self.colors.as_ref().and_then(|c| c.get(index).copied())
    }

    /// Iterate vertices paired with their colors
    pub fn iter(&self) -> impl Iterator<Item = (&Point3d, Option<Color3>)> + '_ {
        self.vertices
            .iter()
            .enumerate()
            .map(move |(i, v)| (v, self.color(i)))
    }
}
