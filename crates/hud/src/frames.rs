//! FrameWriter - writes rendered frames as numbered PNG files

use std::fs;
use std::path::{Path, PathBuf};

use contracts::ContractError;
use tracing::{error, instrument};

use crate::canvas::SkiaCanvas;

/// Writes `{prefix}{index:06}.png` into one directory
#[derive(Debug)]
pub struct FrameWriter {
    base_path: PathBuf,
    prefix: String,
    written: u64,
}

impl FrameWriter {
    /// Create the output directory if needed
    pub fn new(base_path: impl Into<PathBuf>, prefix: impl Into<String>) -> std::io::Result<Self> {
        let base_path = base_path.into();
        fs::create_dir_all(&base_path)?;
        Ok(Self {
            base_path,
            prefix: prefix.into(),
            written: 0,
        })
    }

    pub fn base_path(&self) -> &Path {
        &self.base_path
    }

    pub fn written(&self) -> u64 {
        self.written
    }

    pub fn path_for(&self, index: u64) -> PathBuf {
        self.base_path
            .join(format!("{}{:06}.png", self.prefix, index))
    }

    /// Write the canvas as the next frame, returning its path
    #[instrument(name = "frame_writer_write", skip(self, canvas), fields(frame = self.written))]
    pub fn write(&mut self, canvas: &SkiaCanvas) -> Result<PathBuf, ContractError> {
        let path = self.path_for(self.written);
        canvas.save_png(&path).inspect_err(|e| {
            error!(path = %path.display(), error = %e, "frame write failed");
        })?;
        self.written += 1;
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_frames_are_numbered() {
        let dir = tempdir().unwrap();
        let mut writer = FrameWriter::new(dir.path().join("out"), "hud_").unwrap();
        let canvas = SkiaCanvas::new(4, 4).unwrap();

        let first = writer.write(&canvas).unwrap();
        let second = writer.write(&canvas).unwrap();
        assert_eq!(first.file_name().unwrap(), "hud_000000.png");
        assert_eq!(second.file_name().unwrap(), "hud_000001.png");
        assert_eq!(writer.written(), 2);

        let entries: Vec<_> = fs::read_dir(writer.base_path()).unwrap().collect();
        assert_eq!(entries.len(), 2);
    }
}
