//! Registry of canvases sharing one engine.

use crate::annotation::{
    AnnotationCommit, AnnotationError, AnnotationSession, AnnotationState, CloseReason,
};
use crate::events::SurfaceEvent;
use crate::hit_test::HitTester;
use crate::settings::{AnnotationDialogOptions, CanvasSettings};
use crate::shapes::{Shape, ShapeId};
use crate::store::{AnnotationChange, ShapeStore, SnapshotError, UndoOutcome};
use kurbo::Point;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;
use uuid::Uuid;

/// Position of a canvas in its registry, assigned at registration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CanvasIndex(usize);

impl CanvasIndex {
    /// Zero-based position in registration order.
    pub fn get(self) -> usize {
        self.0
    }
}

impl From<usize> for CanvasIndex {
    fn from(index: usize) -> Self {
        Self(index)
    }
}

impl fmt::Display for CanvasIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Registry errors.
#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("Unknown canvas: {0}")]
    UnknownCanvas(CanvasIndex),
    #[error(transparent)]
    Annotation(#[from] AnnotationError),
    #[error(transparent)]
    Snapshot(#[from] SnapshotError),
}

/// Result type for registry operations.
pub type RegistryResult<T> = Result<T, RegistryError>;

/// One managed image: its settings, shapes and hit tester.
#[derive(Debug, Clone)]
pub struct CanvasContext {
    index: CanvasIndex,
    /// Unique identifier, stable even if hosts shuffle their elements.
    id: Uuid,
    settings: CanvasSettings,
    store: ShapeStore,
    hit_tester: HitTester,
}

impl CanvasContext {
    fn new(index: CanvasIndex, settings: CanvasSettings) -> Self {
        Self {
            index,
            id: Uuid::new_v4(),
            store: ShapeStore::with_id_policy(settings.id_policy),
            hit_tester: HitTester::new(settings.fill_rule),
            settings,
        }
    }

    /// Position of this canvas in its registry.
    pub fn index(&self) -> CanvasIndex {
        self.index
    }

    /// Random identifier assigned at registration.
    pub fn id(&self) -> Uuid {
        self.id
    }

    /// Settings supplied at registration.
    pub fn settings(&self) -> &CanvasSettings {
        &self.settings
    }

    /// Finalized shapes and the in-progress stroke.
    pub fn store(&self) -> &ShapeStore {
        &self.store
    }

    /// Hit tester configured with the canvas fill rule.
    pub fn hit_tester(&self) -> &HitTester {
        &self.hit_tester
    }
}

/// Owns every canvas on a page plus the page-wide annotation session.
///
/// Host surfaces call the `gesture_*`, `secondary_click` and `annotation_*`
/// methods as input arrives, then read `active_points`/`shapes` and drain
/// [`poll_events`](Self::poll_events) to decide what to redraw.
#[derive(Debug, Default)]
pub struct CanvasRegistry {
    canvases: Vec<CanvasContext>,
    annotation: AnnotationState,
    dialog: AnnotationDialogOptions,
    /// Notifications not yet handed to the host.
    events: Vec<SurfaceEvent>,
}

impl CanvasRegistry {
    /// Create an empty registry with default dialog options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty registry whose dialogs open with `dialog`.
    pub fn with_dialog_options(dialog: AnnotationDialogOptions) -> Self {
        Self {
            dialog,
            ..Self::default()
        }
    }

    /// Options passed along in every `AnnotationOpened` event.
    pub fn dialog_options(&self) -> &AnnotationDialogOptions {
        &self.dialog
    }

    /// Add a canvas. Indices count up from 0 in registration order.
    pub fn register(&mut self, settings: CanvasSettings) -> CanvasIndex {
        let index = CanvasIndex(self.canvases.len());
        log::debug!(
            "Registered canvas {} (image: {:?}, annotations: {})",
            index,
            settings.image_source,
            settings.annotation_enabled
        );
        self.canvases.push(CanvasContext::new(index, settings));
        index
    }

    /// Number of registered canvases.
    pub fn len(&self) -> usize {
        self.canvases.len()
    }

    /// Returns true if no canvas has been registered.
    pub fn is_empty(&self) -> bool {
        self.canvases.is_empty()
    }

    /// Look up a registered canvas.
    pub fn canvas(&self, canvas: CanvasIndex) -> RegistryResult<&CanvasContext> {
        self.canvases
            .get(canvas.0)
            .ok_or(RegistryError::UnknownCanvas(canvas))
    }

    fn canvas_mut(&mut self, canvas: CanvasIndex) -> RegistryResult<&mut CanvasContext> {
        self.canvases
            .get_mut(canvas.0)
            .ok_or(RegistryError::UnknownCanvas(canvas))
    }

    /// All canvases in registration order.
    pub fn canvases(&self) -> impl Iterator<Item = &CanvasContext> {
        self.canvases.iter()
    }

    /// Points of the stroke being drawn on `canvas`.
    pub fn active_points(&self, canvas: CanvasIndex) -> RegistryResult<&[Point]> {
        Ok(self.canvas(canvas)?.store.active_points())
    }

    /// Finalized shapes of `canvas`, back to front.
    pub fn shapes(&self, canvas: CanvasIndex) -> RegistryResult<&[Shape]> {
        Ok(self.canvas(canvas)?.store.shapes())
    }

    /// Pointer went down: start a new stroke.
    pub fn gesture_start(&mut self, canvas: CanvasIndex) -> RegistryResult<()> {
        let ctx = self.canvas_mut(canvas)?;
        let had_points = !ctx.store.active_points().is_empty();
        ctx.store.begin_gesture();

        if had_points {
            self.events.push(SurfaceEvent::ActiveShapeChanged { canvas });
        }
        Ok(())
    }

    /// Pointer moved while down. Returns whether the sample became a vertex.
    pub fn gesture_sample(&mut self, canvas: CanvasIndex, point: Point) -> RegistryResult<bool> {
        let accepted = self.canvas_mut(canvas)?.store.sample(point);
        if accepted {
            self.events.push(SurfaceEvent::ActiveShapeChanged { canvas });
        }
        Ok(accepted)
    }

    /// Pointer went up: finalize the stroke. Returns the new shape's id, or
    /// `None` if the stroke was too small to keep.
    pub fn gesture_end(&mut self, canvas: CanvasIndex) -> RegistryResult<Option<ShapeId>> {
        let ctx = self.canvas_mut(canvas)?;
        let had_points = !ctx.store.active_points().is_empty();
        let created = ctx.store.end_gesture();

        if had_points {
            self.events.push(SurfaceEvent::ActiveShapeChanged { canvas });
        }
        if created.is_some() {
            self.events.push(SurfaceEvent::ShapesChanged { canvas });
        }
        Ok(created)
    }

    /// Abandon the current stroke, or remove the last shape.
    pub fn undo(&mut self, canvas: CanvasIndex) -> RegistryResult<UndoOutcome> {
        let outcome = self.canvas_mut(canvas)?.store.undo();
        match &outcome {
            UndoOutcome::AbandonedGesture => {
                self.events.push(SurfaceEvent::ActiveShapeChanged { canvas });
            }
            UndoOutcome::RemovedShape(_) => {
                self.events.push(SurfaceEvent::ShapesChanged { canvas });
            }
            UndoOutcome::Nothing => {}
        }
        Ok(outcome)
    }

    /// Clear the stroke and every shape of `canvas`.
    pub fn reset(&mut self, canvas: CanvasIndex) -> RegistryResult<()> {
        let ctx = self.canvas_mut(canvas)?;
        let had_points = !ctx.store.active_points().is_empty();
        let had_shapes = !ctx.store.is_empty();
        ctx.store.reset();

        if had_points {
            self.events.push(SurfaceEvent::ActiveShapeChanged { canvas });
        }
        if had_shapes {
            self.events.push(SurfaceEvent::ShapesChanged { canvas });
        }
        Ok(())
    }

    /// Topmost shape of `canvas` containing `point`.
    pub fn hit_test(&self, canvas: CanvasIndex, point: Point) -> RegistryResult<Option<ShapeId>> {
        let ctx = self.canvas(canvas)?;
        Ok(ctx.hit_tester.test(point, ctx.store.shapes()).map(Shape::id))
    }

    /// Every shape of `canvas` containing `point`, front to back.
    pub fn hits(&self, canvas: CanvasIndex, point: Point) -> RegistryResult<Vec<ShapeId>> {
        let ctx = self.canvas(canvas)?;
        Ok(ctx.hit_tester.hits(point, ctx.store.shapes()))
    }

    /// Double/secondary click: resolve the topmost shape under `point` and,
    /// if the canvas allows it, open the annotation dialog for it.
    ///
    /// Fails with [`AnnotationError::AlreadyOpen`] if a dialog is already up.
    pub fn secondary_click(
        &mut self,
        canvas: CanvasIndex,
        point: Point,
    ) -> RegistryResult<Option<ShapeId>> {
        let hits = self.hits(canvas, point)?;
        let hit = hits.first().copied();
        log::debug!(
            "Secondary click at ({}, {}) on canvas {}: inside {} shape(s)",
            point.x,
            point.y,
            canvas,
            hits.len()
        );
        self.events.push(SurfaceEvent::HitResolved { canvas, point, hits });

        if let Some(id) = hit {
            self.open_annotation(canvas, id)?;
        }
        Ok(hit)
    }

    /// Open the annotation dialog for shape `shape` of `canvas`.
    ///
    /// Returns `None` without opening anything if the canvas has annotations
    /// disabled or has no such shape.
    pub fn open_annotation(
        &mut self,
        canvas: CanvasIndex,
        shape: ShapeId,
    ) -> RegistryResult<Option<&AnnotationSession>> {
        let ctx = self.canvas(canvas)?;
        if !ctx.settings.annotation_enabled {
            log::debug!("Annotations disabled on canvas {}", canvas);
            return Ok(None);
        }
        let Some(target) = ctx.store.get(shape) else {
            return Ok(None);
        };

        let session = AnnotationSession::new(canvas, target);
        let text = session.text().to_string();
        self.annotation.open(session)?;

        self.events.push(SurfaceEvent::AnnotationOpened {
            canvas,
            shape,
            text,
            dialog: self.dialog.clone(),
        });
        Ok(self.annotation.session())
    }

    /// The open annotation session, if any.
    pub fn annotation_session(&self) -> Option<&AnnotationSession> {
        self.annotation.session()
    }

    /// Mirror the dialog's text. Returns `false` if no dialog is open.
    pub fn annotation_text_changed(&mut self, text: impl Into<String>) -> bool {
        match self.annotation.session_mut() {
            Some(session) => {
                session.set_text(text);
                true
            }
            None => false,
        }
    }

    /// The dialog form was submitted.
    pub fn annotation_submit(&mut self) -> Option<AnnotationCommit> {
        self.close_annotation(CloseReason::Submitted)
    }

    /// The dialog was dismissed. The current text is still saved.
    pub fn annotation_dismiss(&mut self) -> Option<AnnotationCommit> {
        self.close_annotation(CloseReason::Dismissed)
    }

    fn close_annotation(&mut self, reason: CloseReason) -> Option<AnnotationCommit> {
        let session = self.annotation.take()?;
        let canvas = session.canvas();
        let Some(ctx) = self.canvases.get_mut(canvas.0) else {
            log::warn!("Dropped annotation for missing canvas {}", canvas);
            return None;
        };

        let commit = session.commit(&mut ctx.store, reason);
        self.events.push(SurfaceEvent::AnnotationClosed {
            canvas,
            shape: commit.shape,
            reason,
            change: commit.change,
        });
        if matches!(commit.change, AnnotationChange::Set | AnnotationChange::Removed) {
            self.events.push(SurfaceEvent::ShapesChanged { canvas });
        }
        Some(commit)
    }

    /// Serialize the shapes of `canvas` to JSON.
    pub fn export_canvas(&self, canvas: CanvasIndex) -> RegistryResult<String> {
        Ok(self.canvas(canvas)?.store.to_json()?)
    }

    /// Replace the shapes of `canvas` with a JSON snapshot.
    pub fn import_canvas(&mut self, canvas: CanvasIndex, json: &str) -> RegistryResult<()> {
        self.canvas_mut(canvas)?.store.load_json(json)?;
        self.events.push(SurfaceEvent::ActiveShapeChanged { canvas });
        self.events.push(SurfaceEvent::ShapesChanged { canvas });
        Ok(())
    }

    /// Take all queued notifications.
    pub fn poll_events(&mut self) -> Vec<SurfaceEvent> {
        std::mem::take(&mut self.events)
    }
}
