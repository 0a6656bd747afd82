//! Icon rasterization via macOS `sips`.
//!
//! `.icns` files are converted to PNG by shelling out to
//! `sips -s format png <icns> --out <png>`, then decoded and resized with the
//! `image` crate.  The temporary PNG is removed once read.

use crate::traits::IconRasterizer;
use image::imageops::FilterType;
use image::RgbaImage;
use log::debug;
use std::path::{Path, PathBuf};
use std::process::Command;

/// Errors from rasterizing an icon.  None of these are fatal; the caller
/// shows a text label instead.
#[derive(Debug, thiserror::Error)]
pub enum IconError {
    /// The conversion tool could not be started.
    #[error("failed to run {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    /// The conversion tool ran but reported failure.
    #[error("{program} exited with {status}")]
    Convert { program: String, status: String },

    /// The converted file could not be read back.
    #[error("cannot read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The converted file is not a decodable image.
    #[error("decode error: {0}")]
    Decode(#[from] image::ImageError),

    /// A zero-sized raster was requested.
    #[error("icon size must be positive")]
    ZeroSize,
}

/// Decode an encoded image and resize it to exactly `size × size` with
/// Lanczos3 filtering.
pub fn decode_and_resize(data: &[u8], size: u32) -> Result<RgbaImage, IconError> {
    if size == 0 {
        return Err(IconError::ZeroSize);
    }
    let img = image::load_from_memory(data)?;
    Ok(img.resize_exact(size, size, FilterType::Lanczos3).to_rgba8())
}

/// [`IconRasterizer`] backed by the `sips` command-line tool.
#[derive(Debug, Clone)]
pub struct SipsRasterizer {
    program: String,
    scratch_dir: PathBuf,
}

impl Default for SipsRasterizer {
    fn default() -> Self {
        Self::new()
    }
}

impl SipsRasterizer {
    /// Use `sips` from `PATH` and the system temp directory for scratch files.
    pub fn new() -> Self {
        Self {
            program: "sips".into(),
            scratch_dir: std::env::temp_dir(),
        }
    }

    /// Override the conversion program.
    pub fn with_program(mut self, program: impl Into<String>) -> Self {
        self.program = program.into();
        self
    }

    /// Override where the intermediate PNG is written.
    pub fn with_scratch_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.scratch_dir = dir.into();
        self
    }

    fn convert(&self, source: &Path, out: &Path) -> Result<Vec<u8>, IconError> {
        let status = Command::new(&self.program)
            .args(["-s", "format", "png"])
            .arg(source)
            .arg("--out")
            .arg(out)
            .stdout(std::process::Stdio::null())
            .stderr(std::process::Stdio::null())
            .status()
            .map_err(|source| IconError::Spawn {
                program: self.program.clone(),
                source,
            })?;
        if !status.success() {
            return Err(IconError::Convert {
                program: self.program.clone(),
                status: status.to_string(),
            });
        }
        std::fs::read(out).map_err(|source| IconError::Read {
            path: out.to_path_buf(),
            source,
        })
    }
}

impl IconRasterizer for SipsRasterizer {
    fn rasterize(&self, source: &Path, key: &str, size: u32) -> Result<RgbaImage, IconError> {
        let out = self.scratch_dir.join(format!("{}.png", key));
        let result = self.convert(source, &out);
        if let Err(e) = std::fs::remove_file(&out) {
            if e.kind() != std::io::ErrorKind::NotFound {
                debug!("could not remove {}: {}", out.display(), e);
            }
        }
        decode_and_resize(&result?, size)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{ImageFormat, Rgba};
    use std::io::Cursor;

    fn png_bytes(w: u32, h: u32) -> Vec<u8> {
        let img = RgbaImage::from_pixel(w, h, Rgba([0, 123, 255, 255]));
        let mut buf = Cursor::new(Vec::new());
        img.write_to(&mut buf, ImageFormat::Png).unwrap();
        buf.into_inner()
    }

    #[test]
    fn resizes_to_exact_square() {
        let out = decode_and_resize(&png_bytes(40, 20), 64).unwrap();
        assert_eq!(out.dimensions(), (64, 64));
    }

    #[test]
    fn solid_colour_survives_resize() {
        let out = decode_and_resize(&png_bytes(256, 256), 128).unwrap();
        let px = out.get_pixel(64, 64);
        assert_eq!(px.0[3], 255);
        assert!((px.0[2] as i32 - 255).abs() <= 1);
    }

    #[test]
    fn garbage_is_a_decode_error() {
        let err = decode_and_resize(b"not an image", 64).unwrap_err();
        assert!(matches!(err, IconError::Decode(_)));
    }

    #[test]
    fn zero_size_is_rejected() {
        let err = decode_and_resize(&png_bytes(8, 8), 0).unwrap_err();
        assert!(matches!(err, IconError::ZeroSize));
    }

    #[test]
    fn missing_tool_is_a_spawn_error() {
        let tmp = tempfile::tempdir().unwrap();
        let r = SipsRasterizer::new()
            .with_program("appswitcher-no-such-sips")
            .with_scratch_dir(tmp.path());
        let err = r
            .rasterize(Path::new("/nonexistent.icns"), "com.example", 64)
            .unwrap_err();
        assert!(matches!(err, IconError::Spawn { .. }));
    }

    #[cfg(unix)]
    #[test]
    fn failing_tool_is_a_convert_error_and_leaves_no_scratch_file() {
        let tmp = tempfile::tempdir().unwrap();
        let r = SipsRasterizer::new()
            .with_program("false")
            .with_scratch_dir(tmp.path());
        let err = r
            .rasterize(Path::new("/nonexistent.icns"), "com.example", 64)
            .unwrap_err();
        assert!(matches!(err, IconError::Convert { .. }));
        assert!(!tmp.path().join("com.example.png").exists());
    }
}
