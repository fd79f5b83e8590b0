//! File conversion and inspection for posekit
//!
//! This crate reads header-delimited ASCII PLY point clouds, writes them out
//! as OBJ meshes with a companion MTL material, and inspects depth images.

pub mod ply;
pub mod obj;
pub mod convert;
pub mod depth;

pub use ply::{PlyHeader, PlyReader};
pub use obj::{MtlMaterial, ObjWriter, DEFAULT_MATERIAL_NAME};
pub use convert::{convert_ply_to_obj, convert_ply_to_obj_with_options, ConvertOptions, ConvertReport};
pub use depth::{depth_stats, inspect_depth_image, DepthStats};

#[cfg(test)]
mod tests;
