//! ASCII PLY reading
//!
//! The reader classifies header lines by their leading tokens and then reads
//! exactly the declared number of vertex and face records. Parsing moves
//! through an explicit state progression (header, vertices, faces, done) so
//! the body blocks are located by what has been consumed rather than by line
//! offsets.

use posekit_core::{normalize_rgb, Error, Face, Point3d, Result, SourceCloud};
use std::fmt::Display;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::ops::ControlFlow;
use std::path::Path;
use std::str::{FromStr, SplitWhitespace};
use tracing::debug;

/// Header metadata collected before the body is read
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PlyHeader {
    pub vertex_count: usize,
    pub face_count: usize,
    /// Trailing token of every `property` line, in declaration order
    pub properties: Vec<String>,
    /// Encoding from the `format` line, if present
    pub format: Option<String>,
    pub comments: Vec<String>,
}

impl PlyHeader {
    /// Whether all three color channels were declared
    pub fn has_color(&self) -> bool {
        posekit_core::properties_have_color(&self.properties)
    }

    /// Consume one trimmed header line. Returns true on `end_header`.
    fn parse_line(&mut self, line: &str, line_no: usize) -> Result<bool> {
        if line == "end_header" {
            return Ok(true);
        }

        let mut tokens = line.split_whitespace();
        match tokens.next() {
            Some("element") => match tokens.next() {
                Some("vertex") => self.vertex_count = parse_count(line, line_no)?,
                Some("face") => self.face_count = parse_count(line, line_no)?,
                _ => {}
            },
            Some("property") => {
                if let Some(name) = line.split_whitespace().last() {
                    self.properties.push(name.to_string());
                }
            }
            Some("format") => {
                let format = tokens.next().unwrap_or_default();
                if format.starts_with("binary") {
                    return Err(Error::UnsupportedFormat(format!(
                        "{format} PLY bodies cannot be read as text"
                    )));
                }
                self.format = Some(format.to_string());
            }
            Some("comment") => {
                let comment = line["comment".len()..].trim();
                self.comments.push(comment.to_string());
            }
            _ => {}
        }
        Ok(false)
    }
}

/// Declared element count: the last token of an `element` line
fn parse_count(line: &str, line_no: usize) -> Result<usize> {
    let token = line.split_whitespace().last().unwrap_or_default();
    token
        .parse::<usize>()
        .map_err(|e| Error::parse(line_no, format!("invalid element count '{token}': {e}")))
}

/// Parse the next whitespace token of a record as `T`
fn next_value<T>(tokens: &mut SplitWhitespace<'_>, line_no: usize, what: &str) -> Result<T>
where
    T: FromStr,
    T::Err: Display,
{
    let token = tokens
        .next()
        .ok_or_else(|| Error::parse(line_no, format!("missing {what}")))?;
    token
        .parse::<T>()
        .map_err(|e| Error::parse(line_no, format!("invalid {what} '{token}': {e}")))
}

enum ReadState {
    Header(PlyHeader),
    Vertices(SourceCloud),
    Faces(SourceCloud),
}

impl ReadState {
    /// Move past blocks whose declared count is already satisfied.
    ///
    /// Breaks with the finished cloud once every declared record has been read.
    fn advance(self) -> ControlFlow<SourceCloud, Self> {
        match self {
            ReadState::Vertices(cloud) if cloud.vertices.len() == cloud.vertex_count => {
                ReadState::Faces(cloud).advance()
            }
            ReadState::Faces(cloud) if cloud.faces.len() + cloud.dropped_faces == cloud.face_count => {
                ControlFlow::Break(cloud)
            }
            state => ControlFlow::Continue(state),
        }
    }

    fn consume(self, line: &str, line_no: usize) -> Result<Self> {
        match self {
            ReadState::Header(mut header) => {
                if !header.parse_line(line.trim(), line_no)? {
                    return Ok(ReadState::Header(header));
                }
                debug!(
                    vertices = header.vertex_count,
                    faces = header.face_count,
                    properties = ?header.properties,
                    comments = ?header.comments,
                    "PLY header parsed"
                );
                let PlyHeader {
                    vertex_count,
                    face_count,
                    properties,
                    ..
                } = header;
                Ok(ReadState::Vertices(SourceCloud::from_header(
                    vertex_count,
                    face_count,
                    properties,
                )))
            }
            ReadState::Vertices(mut cloud) => {
                read_vertex(&mut cloud, line, line_no)?;
                Ok(ReadState::Vertices(cloud))
            }
            ReadState::Faces(mut cloud) => {
                read_face(&mut cloud, line, line_no)?;
                Ok(ReadState::Faces(cloud))
            }
        }
    }

    /// Error for input that ends while this state still expects lines
    fn end_of_input(&self) -> Error {
        match self {
            ReadState::Header(_) => Error::MissingEndHeader,
            ReadState::Vertices(cloud) => Error::Truncated {
                section: "vertex",
                expected: cloud.vertex_count,
                found: cloud.vertices.len(),
            },
            ReadState::Faces(cloud) => Error::Truncated {
                section: "face",
                expected: cloud.face_count,
                found: cloud.faces.len() + cloud.dropped_faces,
            },
        }
    }
}

fn read_vertex(cloud: &mut SourceCloud, line: &str, line_no: usize) -> Result<()> {
    let mut tokens = line.split_whitespace();
    let x = next_value::<f64>(&mut tokens, line_no, "x coordinate")?;
    let y = next_value::<f64>(&mut tokens, line_no, "y coordinate")?;
    let z = next_value::<f64>(&mut tokens, line_no, "z coordinate")?;
    cloud.vertices.push(Point3d::new(x, y, z));

    if let Some(colors) = cloud.colors.as_mut() {
        let r = next_value::<u8>(&mut tokens, line_no, "red channel")?;
        let g = next_value::<u8>(&mut tokens, line_no, "green channel")?;
        let b = next_value::<u8>(&mut tokens, line_no, "blue channel")?;
        colors.push(normalize_rgb([r, g, b]));
    }
    Ok(())
}

fn read_face(cloud: &mut SourceCloud, line: &str, line_no: usize) -> Result<()> {
    let mut tokens = line.split_whitespace();
    let declared = next_value::<i64>(&mut tokens, line_no, "face vertex count")?;
    if declared < 3 {
        cloud.dropped_faces += 1;
        return Ok(());
    }

    let mut indices = Vec::new();
    for _ in 0..declared {
        indices.push(next_value::<usize>(&mut tokens, line_no, "vertex index")?);
    }
    cloud.faces.push(Face::new(indices));
    Ok(())
}

/// Reader for header-delimited ASCII PLY point clouds
pub struct PlyReader;

impl PlyReader {
    /// Read a point cloud from a file on disk
    pub fn read_file<P: AsRef<Path>>(path: P) -> Result<SourceCloud> {
        let file = File::open(path.as_ref())?;
        Self::read(BufReader::new(file))
    }

    /// Read a point cloud from any buffered text source
    pub fn read<R: BufRead>(reader: R) -> Result<SourceCloud> {
        let mut lines = reader.lines();
        let mut line_no = 0;
        let mut state = ReadState::Header(PlyHeader::default());

        loop {
            state = match state.advance() {
                ControlFlow::Break(cloud) => return Ok(cloud),
                ControlFlow::Continue(state) => state,
            };

            let Some(line) = lines.next() else {
                return Err(state.end_of_input());
            };
            let line = line?;
            line_no += 1;
            state = state.consume(&line, line_no)?;
        }
    }

    /// Read only the header, stopping at `end_header`
    pub fn read_header<R: BufRead>(reader: R) -> Result<PlyHeader> {
        let mut header = PlyHeader::default();
        for (i, line) in reader.lines().enumerate() {
            if header.parse_line(line?.trim(), i + 1)? {
                return Ok(header);
            }
        }
        Err(Error::MissingEndHeader)
    }
}
