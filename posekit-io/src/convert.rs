//! PLY point cloud to OBJ + MTL conversion

use crate::obj::{MtlMaterial, ObjWriter, DEFAULT_MATERIAL_NAME};
use crate::ply::PlyReader;
use posekit_core::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Options for [`convert_ply_to_obj_with_options`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConvertOptions {
    /// Material declared in the MTL file and selected by the OBJ file
    pub material_name: String,
    /// Log a warning when degenerate face records were dropped
    pub warn_on_dropped_faces: bool,
}

impl Default for ConvertOptions {
    fn default() -> Self {
        Self {
            material_name: DEFAULT_MATERIAL_NAME.to_string(),
            warn_on_dropped_faces: true,
        }
    }
}

impl ConvertOptions {
    pub fn with_material_name<S: Into<String>>(mut self, name: S) -> Self {
        self.material_name = name.into();
        self
    }

    /// Do not warn about dropped degenerate faces
    pub fn quiet_dropped_faces(mut self) -> Self {
        self.warn_on_dropped_faces = false;
        self
    }

    fn validate(&self) -> Result<()> {
        if self.material_name.is_empty() || self.material_name.contains(char::is_whitespace) {
            return Err(Error::InvalidData(format!(
                "material name {:?} must be a single non-empty token",
                self.material_name
            )));
        }
        Ok(())
    }
}

/// Summary of a finished conversion
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConvertReport {
    pub source: PathBuf,
    pub mesh: PathBuf,
    pub material: PathBuf,
    pub vertex_count: usize,
    /// Faces written to the mesh file
    pub face_count: usize,
    /// Face records skipped for having fewer than 3 vertices
    pub dropped_faces: usize,
    pub has_color: bool,
}

/// Convert `src` (ASCII PLY) into `dst` (OBJ) plus a material file next to it
pub fn convert_ply_to_obj<P: AsRef<Path>, Q: AsRef<Path>>(src: P, dst: Q) -> Result<ConvertReport> {
    convert_ply_to_obj_with_options(src, dst, &ConvertOptions::default())
}

/// Convert with explicit options.
///
/// The whole source is parsed before any output is created, so malformed input
/// leaves the destination untouched. Write failures may leave partial files.
#[tracing::instrument(skip_all, fields(src = %src.as_ref().display(), dst = %dst.as_ref().display()))]
pub fn convert_ply_to_obj_with_options<P: AsRef<Path>, Q: AsRef<Path>>(
    src: P,
    dst: Q,
    options: &ConvertOptions,
) -> Result<ConvertReport> {
    options.validate()?;
    let src = src.as_ref();
    let dst = dst.as_ref();

    let cloud = PlyReader::read_file(src)?;
    let material = MtlMaterial::for_cloud(options.material_name.clone(), cloud.has_color());
    let mtl_path = ObjWriter::write_files(&cloud, dst, &material)?;

    info!(
        "Converted {} -> {} -> {}",
        src.display(),
        dst.display(),
        mtl_path.display()
    );
    if cloud.has_color() {
        info!("Vertex colors detected, written to OBJ vertices");
    } else {
        info!("No color properties, using default grey material");
    }
    if cloud.dropped_faces > 0 && options.warn_on_dropped_faces {
        warn!(
            dropped = cloud.dropped_faces,
            declared = cloud.face_count,
            "Dropped face records with fewer than 3 vertices"
        );
    }

    Ok(ConvertReport {
        source: src.to_path_buf(),
        mesh: dst.to_path_buf(),
        material: mtl_path,
        vertex_count: cloud.vertices.len(),
        face_count: cloud.faces.len(),
        dropped_faces: cloud.dropped_faces,
        has_color: cloud.has_color(),
    })
}
