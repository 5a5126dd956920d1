// Released under MIT License.

//! Utilities used by the integration tests.

#![allow(dead_code)]

use std::path::Path;

/// Write a constraint log with the given (coordinate, force) samples into
/// `dir/REPORT`.
pub fn write_report(dir: &Path, samples: &[(f64, f64)]) {
    let mut content = String::new();
    for (cc, b_m) in samples {
        content.push_str(&format!(
            "   cc>  R  const   {:.8}\n   b_m>   {:.8}\n",
            cc, b_m
        ));
    }

    std::fs::write(dir.join("REPORT"), content).unwrap();
}

/// Build a segmented simulation tree under `root`: one `RUN<k>` directory per
/// entry of `segments`, in the given order, each with its own constraint log.
pub fn build_segments(root: &Path, segments: &[&[(f64, f64)]]) {
    for (k, samples) in segments.iter().enumerate() {
        let dir = root.join(format!("RUN{}", k + 1));
        std::fs::create_dir(&dir).unwrap();
        write_report(&dir, samples);
    }
}
