//! Smudge Core Library
//!
//! Platform-agnostic engine for freehand region tracing over images: point
//! sampling, shape storage with undo, hit testing and shape annotations.
//! Hosts feed pointer input into a [`CanvasRegistry`] and redraw from its
//! state and events.

pub mod annotation;
pub mod events;
pub mod registry;
pub mod sampler;
pub mod settings;
pub mod shapes;
pub mod store;

pub use annotation::{
    AnnotationCommit, AnnotationError, AnnotationSession, AnnotationState, CloseReason,
};
pub use events::SurfaceEvent;
pub use hit_test::{FillRule, HitTester, point_in_polygon};
pub use registry::{CanvasContext, CanvasIndex, CanvasRegistry, RegistryError, RegistryResult};
pub use sampler::{MIN_POINT_SPACING, PointSampler};
pub use settings::{AnnotationDialogOptions, CanvasSettings, IdPolicy};
pub use shapes::{MIN_SHAPE_POINTS, SerializableColor, Shape, ShapeId, parse_css_color};
pub use store::{AnnotationChange, ShapeStore, SnapshotError, SnapshotResult, UndoOutcome};
