//! Layered scratch-off canvas engine.
//!
//! A hidden layer sits under an overlay; brushing lowers a per-pixel erase
//! mask and the composite cross-fades between the two. Strokes are undoable
//! as whole gestures, the result can be previewed as a stereo pair and
//! exported to (or imported from) a fixed-size 24-bit BMP.

pub mod app;
pub mod brush;
pub mod codec;
pub mod composite;
pub mod config;
pub mod draw;
pub mod engine;
pub mod error;
pub mod history;
pub mod input;
pub mod line;
pub mod mapper;
pub mod pattern;
pub mod stereo;
pub mod types;

pub use engine::{Engine, FrameReport, Style};
pub use error::{Error, Result};
