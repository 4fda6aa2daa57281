//! Notifications from the engine to the host surface.

use crate::annotation::CloseReason;
use crate::registry::CanvasIndex;
use crate::settings::AnnotationDialogOptions;
use crate::shapes::ShapeId;
use crate::store::AnnotationChange;
use kurbo::Point;
use serde::Serialize;

/// Something the host should react to, usually by redrawing.
///
/// Queued by [`CanvasRegistry`](crate::registry::CanvasRegistry) and drained
/// with `poll_events`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SurfaceEvent {
    /// The in-progress stroke of a canvas changed.
    ActiveShapeChanged { canvas: CanvasIndex },
    /// The finalized shapes of a canvas changed.
    ShapesChanged { canvas: CanvasIndex },
    /// A secondary click was resolved; `hits` lists containing shapes front
    /// to back.
    HitResolved {
        canvas: CanvasIndex,
        point: Point,
        hits: Vec<ShapeId>,
    },
    /// Mount the annotation dialog.
    AnnotationOpened {
        canvas: CanvasIndex,
        shape: ShapeId,
        text: String,
        dialog: AnnotationDialogOptions,
    },
    /// Unmount the annotation dialog.
    AnnotationClosed {
        canvas: CanvasIndex,
        shape: ShapeId,
        reason: CloseReason,
        change: AnnotationChange,
    },
}

impl SurfaceEvent {
    /// Canvas the event concerns.
    pub fn canvas(&self) -> CanvasIndex {
        match self {
            SurfaceEvent::ActiveShapeChanged { canvas }
            | SurfaceEvent::ShapesChanged { canvas }
            | SurfaceEvent::HitResolved { canvas, .. }
            | SurfaceEvent::AnnotationOpened { canvas, .. }
            | SurfaceEvent::AnnotationClosed { canvas, .. } => *canvas,
        }
    }
}
