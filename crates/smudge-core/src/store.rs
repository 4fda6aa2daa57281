//! Per-canvas shape store: the in-progress stroke plus the finalized shapes.

use crate::sampler::PointSampler;
use crate::settings::IdPolicy;
use crate::shapes::{MIN_SHAPE_POINTS, Shape, ShapeId};
use kurbo::Point;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use thiserror::Error;

/// Errors from exporting or importing a store snapshot.
#[derive(Debug, Error)]
pub enum SnapshotError {
    #[error("Serialization error: {0}")]
    Serialization(String),
    #[error("Shape {id} has {points} points, at least {min} are required", min = MIN_SHAPE_POINTS)]
    InvalidShape { id: ShapeId, points: usize },
    #[error("Shape id {0} appears more than once")]
    DuplicateId(ShapeId),
}

/// Result type for snapshot operations.
pub type SnapshotResult<T> = Result<T, SnapshotError>;

/// Serialized form of a store's finalized shapes.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct StoreSnapshot {
    shapes: Vec<Shape>,
}

/// What an undo call did.
#[derive(Debug, Clone, PartialEq)]
pub enum UndoOutcome {
    /// The in-progress stroke was thrown away.
    AbandonedGesture,
    /// The most recent finalized shape was removed.
    RemovedShape(Shape),
    /// Nothing to undo.
    Nothing,
}

/// What a `set_annotation` call did.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnnotationChange {
    /// The annotation was set or overwritten.
    Set,
    /// An existing annotation was removed.
    Removed,
    /// Empty text on a shape that had no annotation.
    Unchanged,
    /// No shape with that id.
    NotFound,
}

/// Ordered collection of finalized shapes for one canvas, together with the
/// stroke currently being drawn.
#[derive(Debug, Clone)]
pub struct ShapeStore {
    /// Finalized shapes in drawing order (back to front).
    shapes: Vec<Shape>,
    /// The in-progress stroke.
    active: PointSampler,
    id_policy: IdPolicy,
    /// Next id under [`IdPolicy::Monotonic`].
    next_id: ShapeId,
}

impl Default for ShapeStore {
    fn default() -> Self {
        Self::new()
    }
}

impl ShapeStore {
    /// Create an empty store with length-derived ids.
    pub fn new() -> Self {
        Self::with_id_policy(IdPolicy::default())
    }

    /// Create an empty store allocating ids with `id_policy`.
    pub fn with_id_policy(id_policy: IdPolicy) -> Self {
        Self {
            shapes: Vec::new(),
            active: PointSampler::new(),
            id_policy,
            next_id: 1,
        }
    }

    /// Start a new stroke, dropping any leftover points.
    pub fn begin_gesture(&mut self) {
        self.active.reset();
    }

    /// Offer a pointer sample to the in-progress stroke.
    pub fn sample(&mut self, point: Point) -> bool {
        self.active.consider(point)
    }

    /// Finish the in-progress stroke, storing it if it forms a region.
    ///
    /// The stroke is cleared either way.
    pub fn end_gesture(&mut self) -> Option<ShapeId> {
        let coords = self.active.take();
        self.finalize(coords).map(Shape::id)
    }

    /// Store `coords` as a new shape if there are enough of them.
    pub fn finalize(&mut self, coords: Vec<Point>) -> Option<&Shape> {
        if coords.len() < MIN_SHAPE_POINTS {
            log::debug!("Discarded stroke with {} points", coords.len());
            return None;
        }

        let id = self.allocate_id();
        log::debug!("Finalized shape {} with {} points", id, coords.len());
        self.shapes.push(Shape::new(id, coords));
        self.shapes.last()
    }

    fn allocate_id(&mut self) -> ShapeId {
        match self.id_policy {
            IdPolicy::LengthDerived => self.shapes.len() as ShapeId + 1,
            IdPolicy::Monotonic => {
                let id = self.next_id;
                self.next_id += 1;
                id
            }
        }
    }

    /// Abandon the in-progress stroke, or remove the last shape if there is
    /// no stroke.
    pub fn undo(&mut self) -> UndoOutcome {
        if !self.active.is_empty() {
            self.active.reset();
            log::debug!("Undo abandoned in-progress stroke");
            return UndoOutcome::AbandonedGesture;
        }

        match self.shapes.pop() {
            Some(shape) => {
                log::debug!("Undo removed shape {}", shape.id);
                UndoOutcome::RemovedShape(shape)
            }
            None => UndoOutcome::Nothing,
        }
    }

    /// Remove the in-progress stroke and every shape.
    pub fn reset(&mut self) {
        self.active.reset();
        self.shapes.clear();
        self.next_id = 1;
        log::debug!("Store reset");
    }

    /// Set or clear the annotation of the shape with `id`.
    ///
    /// Empty text removes the annotation.
    pub fn set_annotation(&mut self, id: ShapeId, text: &str) -> AnnotationChange {
        let Some(shape) = self.shapes.iter_mut().find(|s| s.id == id) else {
            return AnnotationChange::NotFound;
        };

        if text.is_empty() {
            if shape.annotation.take().is_some() {
                AnnotationChange::Removed
            } else {
                AnnotationChange::Unchanged
            }
        } else {
            shape.annotation = Some(text.to_string());
            AnnotationChange::Set
        }
    }

    /// Get a shape by id.
    pub fn get(&self, id: ShapeId) -> Option<&Shape> {
        self.shapes.iter().find(|s| s.id == id)
    }

    /// Finalized shapes, back to front.
    pub fn shapes(&self) -> &[Shape] {
        &self.shapes
    }

    /// Points of the in-progress stroke.
    pub fn active_points(&self) -> &[Point] {
        self.active.points()
    }

    /// How new ids are chosen.
    pub fn id_policy(&self) -> IdPolicy {
        self.id_policy
    }

    /// Number of finalized shapes.
    pub fn len(&self) -> usize {
        self.shapes.len()
    }

    /// Returns true if no shape is stored.
    pub fn is_empty(&self) -> bool {
        self.shapes.is_empty()
    }

    /// Serialize the finalized shapes to JSON.
    pub fn to_json(&self) -> SnapshotResult<String> {
        let snapshot = StoreSnapshot {
            shapes: self.shapes.clone(),
        };
        serde_json::to_string_pretty(&snapshot)
            .map_err(|e| SnapshotError::Serialization(e.to_string()))
    }

    /// Replace the finalized shapes with those in `json`.
    ///
    /// Ids must be unique. Under [`IdPolicy::LengthDerived`] the shapes are
    /// renumbered `1..=n` in stored order. The in-progress stroke is dropped.
    /// On error the store is untouched.
    pub fn load_json(&mut self, json: &str) -> SnapshotResult<()> {
        let snapshot: StoreSnapshot =
            serde_json::from_str(json).map_err(|e| SnapshotError::Serialization(e.to_string()))?;

        if let Some(bad) = snapshot
            .shapes
            .iter()
            .find(|s| s.coords.len() < MIN_SHAPE_POINTS)
        {
            log::warn!("Rejected snapshot: shape {} is degenerate", bad.id);
            return Err(SnapshotError::InvalidShape {
                id: bad.id,
                points: bad.coords.len(),
            });
        }

        let mut seen = HashSet::new();
        if let Some(dup) = snapshot.shapes.iter().find(|s| !seen.insert(s.id)) {
            log::warn!("Rejected snapshot: shape id {} is duplicated", dup.id);
            return Err(SnapshotError::DuplicateId(dup.id));
        }

        let mut shapes = snapshot.shapes;
        // Length-derived ids must be 1..=n or later shapes collide with live ones.
        if self.id_policy == IdPolicy::LengthDerived {
            for (i, shape) in shapes.iter_mut().enumerate() {
                let id = i as ShapeId + 1;
                if shape.id != id {
                    log::debug!("Renumbered imported shape {} to {}", shape.id, id);
                    shape.id = id;
                }
            }
        }

        self.next_id = shapes.iter().map(|s| s.id).max().unwrap_or(0) + 1;
        self.shapes = shapes;
        self.active.reset();
        Ok(())
    }

    /// Build a store from a JSON snapshot.
    pub fn from_json(json: &str, id_policy: IdPolicy) -> SnapshotResult<Self> {
        let mut store = Self::with_id_policy(id_policy);
        store.load_json(json)?;
        Ok(store)
    }
}
