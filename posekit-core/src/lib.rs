//! Core data structures for posekit
//!
//! This crate provides the transient point-cloud model produced by the PLY
//! reader and the error taxonomy shared by every posekit crate.

pub mod point;
pub mod point_cloud;
pub mod error;

pub use point::*;
pub use point_cloud::*;
pub use error::*;

/// Re-export commonly used types from nalgebra
pub use nalgebra::Point3;

/// Common result type for posekit operations
pub type Result<T> = std::result::Result<T, Error>;
