//! Annotation editing session bound to one selected shape.
//!
//! A session is opened when a secondary click lands on a shape of a canvas
//! with annotations enabled. The host mirrors the dialog's text into it and
//! closes it on submit or dismiss. Both ways of closing write the current
//! text back to the shape.

use crate::registry::CanvasIndex;
use crate::shapes::{Shape, ShapeId};
use crate::store::{AnnotationChange, ShapeStore};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Annotation session contract violations.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum AnnotationError {
    #[error("Annotation session already open for shape {shape} on canvas {canvas}")]
    AlreadyOpen { canvas: CanvasIndex, shape: ShapeId },
}

/// How a session was closed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CloseReason {
    /// The dialog form was submitted.
    Submitted,
    /// The dialog was dismissed (close button or overlay click).
    Dismissed,
}

/// An open editing session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnnotationSession {
    canvas: CanvasIndex,
    target: ShapeId,
    text: String,
}

impl AnnotationSession {
    /// Start editing `shape`, seeded with its current annotation.
    pub(crate) fn new(canvas: CanvasIndex, shape: &Shape) -> Self {
        Self {
            canvas,
            target: shape.id(),
            text: shape.annotation().unwrap_or_default().to_string(),
        }
    }

    /// Canvas owning the target shape.
    pub fn canvas(&self) -> CanvasIndex {
        self.canvas
    }

    /// Id of the shape being annotated.
    pub fn target(&self) -> ShapeId {
        self.target
    }

    /// Current edit text.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Replace the edit text.
    pub fn set_text(&mut self, text: impl Into<String>) {
        self.text = text.into();
    }

    /// Write the edit text back to the target shape, ending the session.
    pub(crate) fn commit(self, store: &mut ShapeStore, reason: CloseReason) -> AnnotationCommit {
        let change = store.set_annotation(self.target, &self.text);
        log::debug!(
            "Annotation for shape {} on canvas {} {:?} ({:?})",
            self.target,
            self.canvas,
            reason,
            change
        );
        AnnotationCommit {
            canvas: self.canvas,
            shape: self.target,
            text: self.text,
            reason,
            change,
        }
    }
}

/// Result of closing a session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnnotationCommit {
    pub canvas: CanvasIndex,
    pub shape: ShapeId,
    /// Text that was written back.
    pub text: String,
    pub reason: CloseReason,
    pub change: AnnotationChange,
}

/// The single annotation slot shared by every canvas.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum AnnotationState {
    #[default]
    Closed,
    Open(AnnotationSession),
}

impl AnnotationState {
    /// Returns true while a dialog is open.
    pub fn is_open(&self) -> bool {
        matches!(self, Self::Open(_))
    }

    /// The open session, if any.
    pub fn session(&self) -> Option<&AnnotationSession> {
        match self {
            Self::Open(session) => Some(session),
            Self::Closed => None,
        }
    }

    /// Mutable access to the open session.
    pub fn session_mut(&mut self) -> Option<&mut AnnotationSession> {
        match self {
            Self::Open(session) => Some(session),
            Self::Closed => None,
        }
    }

    /// Move to `Open`. Fails if a session is already open.
    pub fn open(&mut self, session: AnnotationSession) -> Result<(), AnnotationError> {
        if let Self::Open(current) = self {
            log::warn!(
                "Refused to open annotation for shape {}: shape {} on canvas {} is still being edited",
                session.target,
                current.target,
                current.canvas
            );
            return Err(AnnotationError::AlreadyOpen {
                canvas: current.canvas,
                shape: current.target,
            });
        }

        *self = Self::Open(session);
        Ok(())
    }

    /// Move to `Closed`, handing back the session that was open.
    pub fn take(&mut self) -> Option<AnnotationSession> {
        match std::mem::take(self) {
            Self::Open(session) => Some(session),
            Self::Closed => None,
        }
    }
}
