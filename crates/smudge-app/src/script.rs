//! Scene scripts: canvases to register plus the input to feed them.

use crate::error::{ReplayError, ReplayResult};
use serde::Deserialize;
use smudge_core::{AnnotationDialogOptions, CanvasIndex, CanvasSettings};
use std::fs;
use std::path::Path;

/// A recorded session.
#[derive(Debug, Clone, Deserialize)]
pub struct SceneScript {
    #[serde(default)]
    pub dialog: AnnotationDialogOptions,
    /// Canvases, registered in order. The first gets index 0.
    pub canvases: Vec<CanvasSettings>,
    #[serde(default)]
    pub events: Vec<ScriptEvent>,
}

/// One input delivered to the engine.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ScriptEvent {
    GestureStart { canvas: CanvasIndex },
    GestureSample { canvas: CanvasIndex, x: f64, y: f64 },
    GestureEnd { canvas: CanvasIndex },
    /// Shorthand for start, one sample per point, then end.
    Stroke {
        canvas: CanvasIndex,
        points: Vec<[f64; 2]>,
    },
    Undo { canvas: CanvasIndex },
    Reset { canvas: CanvasIndex },
    SecondaryClick { canvas: CanvasIndex, x: f64, y: f64 },
    AnnotationText { text: String },
    AnnotationSubmit,
    AnnotationDismiss,
}

impl SceneScript {
    /// Parse a script from a JSON string.
    pub fn from_json(json: &str) -> ReplayResult<Self> {
        serde_json::from_str(json).map_err(|e| ReplayError::Parse(e.to_string()))
    }

    /// Read and parse a script file.
    pub fn load(path: &Path) -> ReplayResult<Self> {
        let json = fs::read_to_string(path)
            .map_err(|e| ReplayError::Io(format!("Failed to read {}: {}", path.display(), e)))?;
        let script: Self = serde_json::from_str(&json)
            .map_err(|e| ReplayError::Parse(format!("Failed to parse {}: {}", path.display(), e)))?;
        log::debug!(
            "Loaded {} with {} canvases and {} events",
            path.display(),
            script.canvases.len(),
            script.events.len()
        );
        Ok(script)
    }
}
