//! OBJ and MTL writing

use posekit_core::{Error, Result, SourceCloud};
use serde::Serialize;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

/// Name of the single material assigned to every face
pub const DEFAULT_MATERIAL_NAME: &str = "material_0";

/// Diffuse color used when vertex colors drive the shading
pub const DIFFUSE_WHITE: [f64; 3] = [1.0, 1.0, 1.0];

/// Diffuse color used for clouds without vertex colors
pub const DIFFUSE_GREY: [f64; 3] = [0.8, 0.8, 0.8];

/// A single `newmtl` block
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MtlMaterial {
    pub name: String,
    /// Diffuse reflectivity
    pub kd: [f64; 3],
    /// Ambient reflectivity
    pub ka: [f64; 3],
    /// Specular reflectivity
    pub ks: [f64; 3],
    /// Opacity
    pub d: f64,
    /// Illumination model
    pub illum: u8,
}

impl MtlMaterial {
    /// Material for a converted cloud: white diffuse when vertex colors are
    /// present so they dominate, neutral grey otherwise.
    pub fn for_cloud(name: impl Into<String>, has_color: bool) -> Self {
        Self {
            name: name.into(),
            kd: if has_color { DIFFUSE_WHITE } else { DIFFUSE_GREY },
            ka: [0.2, 0.2, 0.2],
            ks: [0.0, 0.0, 0.0],
            d: 1.0,
            illum: 2,
        }
    }

    /// Write the material block
    pub fn write<W: Write>(&self, writer: &mut W) -> Result<()> {
        writeln!(writer, "newmtl {}", self.name)?;
        writeln!(writer, "Kd {}", fmt_triple(self.kd))?;
        writeln!(writer, "Ka {}", fmt_triple(self.ka))?;
        writeln!(writer, "Ks {}", fmt_triple(self.ks))?;
        writeln!(writer, "d {}", fmt_float(self.d))?;
        writeln!(writer, "illum {}", self.illum)?;
        Ok(())
    }
}

/// Shortest round-trip form that always keeps a decimal point (`1.0`, `0.5`)
fn fmt_float(value: f64) -> String {
    format!("{value:?}")
}

fn fmt_triple([a, b, c]: [f64; 3]) -> String {
    format!("{} {} {}", fmt_float(a), fmt_float(b), fmt_float(c))
}

/// Writer for OBJ meshes with a companion MTL file
pub struct ObjWriter;

impl ObjWriter {
    /// Material file path next to `obj_path`, plus the file name the OBJ refers to.
    ///
    /// `meshes/box.obj` maps to (`meshes/box.mtl`, `box.mtl`).
    pub fn material_path<P: AsRef<Path>>(obj_path: P) -> Result<(PathBuf, String)> {
        let obj_path = obj_path.as_ref();
        let stem = obj_path
            .file_stem()
            .ok_or_else(|| Error::InvalidPath(format!("{} has no file name", obj_path.display())))?;
        let mtl_name = format!("{}.mtl", stem.to_string_lossy());
        Ok((obj_path.with_file_name(&mtl_name), mtl_name))
    }

    /// Write the OBJ body: material reference, vertices, then faces
    pub fn write_obj<W: Write>(
        cloud: &SourceCloud,
        writer: &mut W,
        mtl_name: &str,
        material_name: &str,
    ) -> Result<()> {
        writeln!(writer, "mtllib {mtl_name}")?;
        writeln!(writer, "usemtl {material_name}")?;

        for (vertex, color) in cloud.iter() {
            write!(
                writer,
                "v {} {} {}",
                fmt_float(vertex.x),
                fmt_float(vertex.y),
                fmt_float(vertex.z)
            )?;
            if let Some(rgb) = color {
                write!(writer, " {}", fmt_triple(rgb))?;
            }
            writeln!(writer)?;
        }

        for face in &cloud.faces {
            write!(writer, "f")?;
            for index in face.one_based() {
                write!(writer, " {index}")?;
            }
            writeln!(writer)?;
        }

        Ok(())
    }

    /// Write `obj_path` and its material file. Returns the material file path.
    ///
    /// Parent directories must already exist.
    pub fn write_files<P: AsRef<Path>>(
        cloud: &SourceCloud,
        obj_path: P,
        material: &MtlMaterial,
    ) -> Result<PathBuf> {
        let obj_path = obj_path.as_ref();
        let (mtl_path, mtl_name) = Self::material_path(obj_path)?;

        let mut mtl_writer = BufWriter::new(File::create(&mtl_path)?);
        material.write(&mut mtl_writer)?;
        mtl_writer.flush()?;

        let mut obj_writer = BufWriter::new(File::create(obj_path)?);
        Self::write_obj(cloud, &mut obj_writer, &mtl_name, &material.name)?;
        obj_writer.flush()?;

        Ok(mtl_path)
    }
}
