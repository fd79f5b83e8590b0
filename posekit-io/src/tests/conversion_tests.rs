//! End-to-end tests for PLY to OBJ + MTL conversion

use crate::{convert_ply_to_obj, convert_ply_to_obj_with_options, ConvertOptions};
use posekit_core::Error;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

const PLAIN_PLY: &str = "ply
format ascii 1.0
element vertex 2
property float x
property float y
property float z
element face 1
property list uchar int vertex_indices
end_header
0 0 0
1 0 0
3 0 1 0
";

const COLORED_PLY: &str = "ply
format ascii 1.0
element vertex 2
property float x
property float y
property float z
property uchar red
property uchar green
property uchar blue
element face 1
property list uchar int vertex_indices
end_header
0 0 0 255 0 0
1 0 0 0 255 0
3 0 1 0
";

fn write_source(dir: &TempDir, name: &str, contents: &str) -> PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, contents).unwrap();
    path
}

fn lines_with_prefix(path: &Path, prefix: &str) -> Vec<String> {
    fs::read_to_string(path)
        .unwrap()
        .lines()
        .filter(|l| l.starts_with(prefix))
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod scenario_tests {
    use super::*;

    #[test]
    fn test_plain_cloud_scenario() {
        let dir = TempDir::new().unwrap();
        let src = write_source(&dir, "plain.ply", PLAIN_PLY);
        let dst = dir.path().join("plain.obj");

        let report = convert_ply_to_obj(&src, &dst).unwrap();
        assert_eq!(report.vertex_count, 2);
        assert_eq!(report.face_count, 1);
        assert!(!report.has_color);
        assert_eq!(report.material, dir.path().join("plain.mtl"));

        let obj = fs::read_to_string(&dst).unwrap();
        assert_eq!(
            obj,
            "mtllib plain.mtl\nusemtl material_0\nv 0.0 0.0 0.0\nv 1.0 0.0 0.0\nf 1 2 1\n"
        );
        assert_eq!(lines_with_prefix(&report.material, "Kd"), vec!["Kd 0.8 0.8 0.8"]);
    }

    #[test]
    fn test_colored_cloud_scenario() {
        let dir = TempDir::new().unwrap();
        let src = write_source(&dir, "colored.ply", COLORED_PLY);
        let dst = dir.path().join("colored.obj");

        let report = convert_ply_to_obj(&src, &dst).unwrap();
        assert!(report.has_color);

        let vertices = lines_with_prefix(&dst, "v ");
        assert!(vertices[0].ends_with("1.0 0.0 0.0"));
        assert!(vertices[1].ends_with("0.0 1.0 0.0"));
        assert_eq!(lines_with_prefix(&report.material, "Kd"), vec!["Kd 1.0 1.0 1.0"]);
    }

    #[test]
    fn test_two_index_face_is_dropped() {
        let dir = TempDir::new().unwrap();
        let src = write_source(&dir, "degenerate.ply", &PLAIN_PLY.replace("3 0 1 0", "2 0 1"));
        let dst = dir.path().join("degenerate.obj");

        let report = convert_ply_to_obj(&src, &dst).unwrap();
        assert_eq!(report.face_count, 0);
        assert_eq!(report.dropped_faces, 1);
        assert!(lines_with_prefix(&dst, "f").is_empty());
    }
}

#[cfg(test)]
mod property_tests {
    use super::*;

    /// Fan of `n` vertices with colors and a mix of valid and degenerate faces
    fn generated_ply(n: usize, with_color: bool) -> (String, usize) {
        let mut text = String::from("ply\nformat ascii 1.0\n");
        text.push_str(&format!("element vertex {n}\n"));
        text.push_str("property float x\nproperty float y\nproperty float z\n");
        if with_color {
            text.push_str("property uchar red\nproperty uchar green\nproperty uchar blue\n");
        }
        let face_records = n - 2;
        text.push_str(&format!("element face {face_records}\n"));
        text.push_str("property list uchar int vertex_indices\nend_header\n");

        for i in 0..n {
            let angle = i as f64 * 0.3;
            text.push_str(&format!("{} {} {}", angle.cos(), angle.sin(), i as f64 * 0.01));
            if with_color {
                text.push_str(&format!(" {} {} {}", (i * 37) % 256, (i * 91) % 256, 255 - i % 256));
            }
            text.push('\n');
        }

        let mut valid = 0;
        for i in 0..face_records {
            if i % 4 == 3 {
                text.push_str(&format!("2 {} {}\n", i, i + 1));
            } else if i % 4 == 2 {
                text.push_str(&format!("4 0 {} {} {}\n", i, i + 1, i + 2));
                valid += 1;
            } else {
                text.push_str(&format!("3 0 {} {}\n", i + 1, i + 2));
                valid += 1;
            }
        }
        (text, valid)
    }

    #[test]
    fn test_counts_match_header() {
        let dir = TempDir::new().unwrap();
        let (text, valid) = generated_ply(40, false);
        let src = write_source(&dir, "fan.ply", &text);
        let dst = dir.path().join("fan.obj");

        let report = convert_ply_to_obj(&src, &dst).unwrap();
        assert_eq!(lines_with_prefix(&dst, "v ").len(), 40);
        assert_eq!(lines_with_prefix(&dst, "f ").len(), valid);
        assert_eq!(report.face_count + report.dropped_faces, 38);
    }

    #[test]
    fn test_vertex_field_counts() {
        let dir = TempDir::new().unwrap();

        let (plain, _) = generated_ply(20, false);
        let src = write_source(&dir, "plain.ply", &plain);
        let dst = dir.path().join("plain.obj");
        convert_ply_to_obj(&src, &dst).unwrap();
        for line in lines_with_prefix(&dst, "v ") {
            assert_eq!(line.split_whitespace().count(), 4, "{line}");
        }

        let (colored, _) = generated_ply(20, true);
        let src = write_source(&dir, "colored.ply", &colored);
        let dst = dir.path().join("colored.obj");
        convert_ply_to_obj(&src, &dst).unwrap();
        for line in lines_with_prefix(&dst, "v ") {
            let fields: Vec<f64> = line
                .split_whitespace()
                .skip(1)
                .map(|t| t.parse().unwrap())
                .collect();
            assert_eq!(fields.len(), 6, "{line}");
            assert!(fields[3..].iter().all(|c| (0.0..=1.0).contains(c)), "{line}");
        }
    }

    #[test]
    fn test_indices_are_shifted_by_one() {
        let dir = TempDir::new().unwrap();
        let text = "element vertex 5\nelement face 1\nend_header\n0 0 0\n1 0 0\n2 0 0\n3 0 0\n4 0 0\n5 4 0 2 3 1\n";
        let src = write_source(&dir, "shift.ply", text);
        let dst = dir.path().join("shift.obj");
        convert_ply_to_obj(&src, &dst).unwrap();
        assert_eq!(lines_with_prefix(&dst, "f "), vec!["f 5 1 3 4 2"]);
    }

    #[test]
    fn test_conversion_is_idempotent() {
        let dir = TempDir::new().unwrap();
        let (text, _) = generated_ply(30, true);
        let src = write_source(&dir, "scan.ply", &text);
        let dst = dir.path().join("scan.obj");
        let mtl = dir.path().join("scan.mtl");

        convert_ply_to_obj(&src, &dst).unwrap();
        let first = (fs::read(&dst).unwrap(), fs::read(&mtl).unwrap());
        convert_ply_to_obj(&src, &dst).unwrap();
        let second = (fs::read(&dst).unwrap(), fs::read(&mtl).unwrap());
        assert_eq!(first, second);
    }
}

#[cfg(test)]
mod option_and_error_tests {
    use super::*;

    #[test]
    fn test_custom_material_name() {
        let dir = TempDir::new().unwrap();
        let src = write_source(&dir, "box.ply", PLAIN_PLY);
        let dst = dir.path().join("box.obj");
        let options = ConvertOptions::default().with_material_name("needle_box");

        let report = convert_ply_to_obj_with_options(&src, &dst, &options).unwrap();
        assert_eq!(lines_with_prefix(&dst, "usemtl"), vec!["usemtl needle_box"]);
        assert_eq!(lines_with_prefix(&report.material, "newmtl"), vec!["newmtl needle_box"]);
    }

    #[test]
    fn test_missing_source() {
        let dir = TempDir::new().unwrap();
        let err = convert_ply_to_obj(dir.path().join("absent.ply"), dir.path().join("out.obj"))
            .unwrap_err();
        assert!(matches!(err, Error::Io(_)));
    }

    #[test]
    fn test_malformed_source_writes_nothing() {
        let dir = TempDir::new().unwrap();
        let src = write_source(&dir, "bad.ply", "ply\nelement vertex 2\nend_header\n0 0 0\n");
        let dst = dir.path().join("bad.obj");

        let err = convert_ply_to_obj(&src, &dst).unwrap_err();
        assert!(matches!(err, Error::Truncated { .. }));
        assert!(!dst.exists());
        assert!(!dir.path().join("bad.mtl").exists());
    }

    #[test]
    fn test_missing_output_directory() {
        let dir = TempDir::new().unwrap();
        let src = write_source(&dir, "plain.ply", PLAIN_PLY);
        let dst = dir.path().join("missing").join("plain.obj");
        let err = convert_ply_to_obj(&src, &dst).unwrap_err();
        assert!(matches!(err, Error::Io(_)));
    }

    #[test]
    fn test_report_serializes() {
        let dir = TempDir::new().unwrap();
        let src = write_source(&dir, "plain.ply", PLAIN_PLY);
        let report = convert_ply_to_obj(&src, dir.path().join("plain.obj")).unwrap();

        let json: serde_json::Value = serde_json::to_value(&report).unwrap();
        assert_eq!(json["vertex_count"], 2);
        assert_eq!(json["has_color"], false);
    }
}
