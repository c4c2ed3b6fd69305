// Runtime settings: optional TOML file, then command-line overrides.

use std::fs;
use std::path::{Path, PathBuf};

use clap::Parser;
use serde::Deserialize;

use crate::brush::{BrushShape, MAX_RADIUS, MIN_RADIUS};
use crate::error::{Error, Result};
use crate::history::DEFAULT_CAPACITY;
use crate::pattern::DrawingMode;
use crate::stereo::{DEFAULT_DEPTH, MAX_DEPTH, MIN_DEPTH};

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Directory exported bitmaps are written to.
    pub storage_root: PathBuf,
    /// Checkerboard cell edge in pixels.
    pub cell_size: usize,
    pub brush_radius: i32,
    pub brush_shape: BrushShape,
    /// Undo (and redo) steps kept.
    pub history_capacity: usize,
    /// Initial and post-clear stereo depth.
    pub depth_offset: f32,
    pub mode: DrawingMode,
    /// Integer window magnification (1, 2 or 4).
    pub window_scale: u8,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            storage_root: PathBuf::from("."),
            cell_size: 20,
            brush_radius: 5,
            brush_shape: BrushShape::default(),
            history_capacity: DEFAULT_CAPACITY,
            depth_offset: DEFAULT_DEPTH,
            mode: DrawingMode::default(),
            window_scale: 1,
        }
    }
}

impl Config {
    pub fn from_toml(text: &str) -> Result<Self> {
        Ok(toml::from_str::<Config>(text)?.sanitized())
    }

    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path).map_err(|e| Error::io(path, e))?;
        Self::from_toml(&text)
    }

    /// Clamp every field into the range the engine accepts.
    pub fn sanitized(mut self) -> Self {
        self.cell_size = self.cell_size.max(1);
        self.brush_radius = self.brush_radius.clamp(MIN_RADIUS, MAX_RADIUS);
        self.history_capacity = self.history_capacity.max(1);
        self.depth_offset = self.depth_offset.clamp(MIN_DEPTH, MAX_DEPTH);
        self.window_scale = match self.window_scale {
            0..=1 => 1,
            2..=3 => 2,
            _ => 4,
        };
        self
    }
}

/// Scratch-off drawing toy with stereo preview.
#[derive(Debug, Parser)]
#[command(name = "sqribble", version, about)]
pub struct Cli {
    /// TOML config file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Directory for exported bitmaps
    #[arg(long)]
    pub storage_root: Option<PathBuf>,

    /// Bitmap to load into both layers at startup
    #[arg(long)]
    pub open: Option<PathBuf>,

    /// Window magnification
    #[arg(long)]
    pub scale: Option<u8>,

    /// Initial brush radius (1-50)
    #[arg(long)]
    pub brush_radius: Option<i32>,
}

impl Cli {
    /// Load the config file if one was given, then apply flag overrides.
    pub fn resolve(&self) -> Result<Config> {
        let mut config = match &self.config {
            Some(path) => Config::load(path)?,
            None => Config::default(),
        };
        if let Some(root) = &self.storage_root {
            config.storage_root = root.clone();
        }
        if let Some(scale) = self.scale {
            config.window_scale = scale;
        }
        if let Some(radius) = self.brush_radius {
            config.brush_radius = radius;
        }
        Ok(config.sanitized())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_file_gives_defaults() {
        assert_eq!(Config::from_toml("").unwrap(), Config::default());
    }

    #[test]
    fn parses_and_clamps() {
        let config = Config::from_toml(
            r#"
            storage_root = "/tmp/shots"
            mode = "solid-on-black"
            brush_shape = "soft"
            brush_radius = 80
            depth_offset = -40.0
            window_scale = 3
            history_capacity = 0
            "#,
        )
        .unwrap();
        assert_eq!(config.storage_root, PathBuf::from("/tmp/shots"));
        assert_eq!(config.mode, DrawingMode::SolidOnBlack);
        assert_eq!(config.brush_shape, BrushShape::Soft);
        assert_eq!(config.brush_radius, MAX_RADIUS);
        assert_eq!(config.depth_offset, MIN_DEPTH);
        assert_eq!(config.window_scale, 2);
        assert_eq!(config.history_capacity, 1);
        assert_eq!(config.cell_size, 20);
    }

    #[test]
    fn unknown_keys_are_errors() {
        assert!(matches!(Config::from_toml("colour = 3"), Err(Error::Config(_))));
    }

    #[test]
    fn flags_override_file() {
        let cli = Cli::parse_from(["sqribble", "--storage-root", "out", "--brush-radius", "0"]);
        let config = cli.resolve().unwrap();
        assert_eq!(config.storage_root, PathBuf::from("out"));
        assert_eq!(config.brush_radius, MIN_RADIUS);
    }
}
