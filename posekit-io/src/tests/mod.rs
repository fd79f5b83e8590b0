//! Test modules for posekit-io
//!
//! File-level tests that run the converter end to end through temporary
//! directories.

pub mod conversion_tests;
