//! Drives a [`CanvasRegistry`] from a scene script, acting as its host
//! surface.

use crate::error::{ReplayError, ReplayResult};
use crate::script::{SceneScript, ScriptEvent};
use kurbo::Point;
use serde::Serialize;
use smudge_core::{CanvasContext, CanvasIndex, CanvasRegistry, RegistryError, Shape, SurfaceEvent};
use uuid::Uuid;

/// Final state of one canvas.
#[derive(Debug, Clone, Serialize)]
pub struct CanvasReport {
    pub index: CanvasIndex,
    pub id: Uuid,
    pub image_source: Option<String>,
    /// CSS color hosts draw the stroke outline with.
    pub border_color: String,
    /// CSS color hosts fill the stroke with.
    pub fill_color: String,
    pub shapes: Vec<Shape>,
    /// Stroke still in progress when the script ended.
    pub active_points: Vec<Point>,
}

impl From<&CanvasContext> for CanvasReport {
    fn from(ctx: &CanvasContext) -> Self {
        Self {
            index: ctx.index(),
            id: ctx.id(),
            image_source: ctx.settings().image_source.clone(),
            border_color: ctx.settings().border_color.to_css(),
            fill_color: ctx.settings().fill_color.to_css(),
            shapes: ctx.store().shapes().to_vec(),
            active_points: ctx.store().active_points().to_vec(),
        }
    }
}

/// Everything a replay produced.
#[derive(Debug, Clone, Serialize)]
pub struct ReplayReport {
    pub canvases: Vec<CanvasReport>,
    /// Every event the engine emitted, in order.
    pub events: Vec<SurfaceEvent>,
}

impl ReplayReport {
    /// Serialize the report as pretty JSON.
    pub fn to_json(&self) -> ReplayResult<String> {
        serde_json::to_string_pretty(self).map_err(|e| ReplayError::Serialization(e.to_string()))
    }
}

/// Register the script's canvases and feed it every event.
pub fn run(script: &SceneScript) -> ReplayResult<ReplayReport> {
    let mut registry = CanvasRegistry::with_dialog_options(script.dialog.clone());
    for settings in &script.canvases {
        registry.register(settings.clone());
    }

    let mut events = Vec::new();
    for (step, event) in script.events.iter().enumerate() {
        apply(&mut registry, step, event)?;
        events.extend(registry.poll_events());
    }
    log::info!(
        "Replayed {} events over {} canvases",
        script.events.len(),
        registry.len()
    );

    Ok(ReplayReport {
        canvases: registry.canvases().map(CanvasReport::from).collect(),
        events,
    })
}

fn apply(registry: &mut CanvasRegistry, step: usize, event: &ScriptEvent) -> ReplayResult<()> {
    let at_step = |source: RegistryError| ReplayError::Registry { step, source };

    match event {
        ScriptEvent::GestureStart { canvas } => registry.gesture_start(*canvas).map_err(at_step)?,
        ScriptEvent::GestureSample { canvas, x, y } => {
            registry
                .gesture_sample(*canvas, Point::new(*x, *y))
                .map_err(at_step)?;
        }
        ScriptEvent::GestureEnd { canvas } => {
            registry.gesture_end(*canvas).map_err(at_step)?;
        }
        ScriptEvent::Stroke { canvas, points } => {
            registry.gesture_start(*canvas).map_err(at_step)?;
            for &[x, y] in points {
                registry
                    .gesture_sample(*canvas, Point::new(x, y))
                    .map_err(at_step)?;
            }
            registry.gesture_end(*canvas).map_err(at_step)?;
        }
        ScriptEvent::Undo { canvas } => {
            registry.undo(*canvas).map_err(at_step)?;
        }
        ScriptEvent::Reset { canvas } => registry.reset(*canvas).map_err(at_step)?,
        ScriptEvent::SecondaryClick { canvas, x, y } => {
            registry
                .secondary_click(*canvas, Point::new(*x, *y))
                .map_err(at_step)?;
        }
        ScriptEvent::AnnotationText { text } => {
            if !registry.annotation_text_changed(text.as_str()) {
                return Err(ReplayError::Annotation {
                    step,
                    action: "annotation_text",
                });
            }
        }
        ScriptEvent::AnnotationSubmit => {
            registry.annotation_submit().ok_or(ReplayError::Annotation {
                step,
                action: "annotation_submit",
            })?;
        }
        ScriptEvent::AnnotationDismiss => {
            registry.annotation_dismiss().ok_or(ReplayError::Annotation {
                step,
                action: "annotation_dismiss",
            })?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use smudge_core::{AnnotationError, CloseReason};

    fn replay(json: &str) -> ReplayResult<ReplayReport> {
        run(&SceneScript::from_json(json).unwrap())
    }

    #[test]
    fn test_annotate_then_undo() {
        let report = replay(
            r#"{
                "canvases": [{ "annotation_enabled": true }],
                "events": [
                    { "type": "stroke", "canvas": 0, "points": [[0, 0], [10, 0], [10, 10], [0, 10]] },
                    { "type": "secondary_click", "canvas": 0, "x": 5, "y": 5 },
                    { "type": "annotation_text", "text": "tree" },
                    { "type": "annotation_submit" }
                ]
            }"#,
        )
        .unwrap();

        let shapes = &report.canvases[0].shapes;
        assert_eq!(shapes.len(), 1);
        assert_eq!(shapes[0].annotation(), Some("tree"));
        assert!(report.events.iter().any(|e| matches!(
            e,
            SurfaceEvent::AnnotationClosed { reason: CloseReason::Submitted, shape: 1, .. }
        )));

        let report = replay(
            r#"{
                "canvases": [{}],
                "events": [
                    { "type": "stroke", "canvas": 0, "points": [[0, 0], [10, 0], [10, 10], [0, 10]] },
                    { "type": "undo", "canvas": 0 },
                    { "type": "undo", "canvas": 0 }
                ]
            }"#,
        )
        .unwrap();
        assert!(report.canvases[0].shapes.is_empty());
    }

    #[test]
    fn test_unfinished_stroke_reported() {
        let report = replay(
            r#"{
                "canvases": [{ "image_source": "a.jpg" }, { "image_source": "b.jpg" }],
                "events": [
                    { "type": "gesture_start", "canvas": 1 },
                    { "type": "gesture_sample", "canvas": 1, "x": 1.4, "y": 2.6 },
                    { "type": "gesture_sample", "canvas": 1, "x": 2, "y": 3 }
                ]
            }"#,
        )
        .unwrap();

        assert_eq!(report.canvases.len(), 2);
        assert_eq!(report.canvases[1].image_source.as_deref(), Some("b.jpg"));
        assert_eq!(report.canvases[1].active_points, vec![Point::new(1.0, 3.0)]);
        assert!(report.canvases[0].active_points.is_empty());
    }

    #[test]
    fn test_unknown_canvas_reports_step() {
        let err = replay(
            r#"{ "canvases": [{}], "events": [
                { "type": "undo", "canvas": 0 },
                { "type": "gesture_start", "canvas": 2 }
            ] }"#,
        )
        .unwrap_err();

        assert!(matches!(
            err,
            ReplayError::Registry {
                step: 1,
                source: RegistryError::UnknownCanvas(c),
            } if c.get() == 2
        ));
    }

    #[test]
    fn test_submit_without_dialog() {
        let err = replay(r#"{ "canvases": [{}], "events": [{ "type": "annotation_submit" }] }"#)
            .unwrap_err();
        assert!(matches!(
            err,
            ReplayError::Annotation { step: 0, action: "annotation_submit" }
        ));
    }

    #[test]
    fn test_second_dialog_rejected() {
        let err = replay(
            r#"{
                "canvases": [{ "annotation_enabled": true }],
                "events": [
                    { "type": "stroke", "canvas": 0, "points": [[0, 0], [10, 0], [10, 10], [0, 10]] },
                    { "type": "secondary_click", "canvas": 0, "x": 5, "y": 5 },
                    { "type": "secondary_click", "canvas": 0, "x": 5, "y": 5 }
                ]
            }"#,
        )
        .unwrap_err();

        assert!(matches!(
            err,
            ReplayError::Registry {
                step: 2,
                source: RegistryError::Annotation(AnnotationError::AlreadyOpen { shape: 1, .. })
            }
        ));
    }

    #[test]
    fn test_report_json() {
        let report = replay(
            r#"{ "canvases": [{}], "events": [
                { "type": "stroke", "canvas": 0, "points": [[0, 0], [10, 0], [10, 10]] }
            ] }"#,
        )
        .unwrap();

        let value: serde_json::Value = serde_json::from_str(&report.to_json().unwrap()).unwrap();
        assert_eq!(value["canvases"][0]["index"], 0);
        assert_eq!(value["canvases"][0]["shapes"][0]["id"], 1);
        assert_eq!(value["canvases"][0]["border_color"], "rgb(255, 255, 255)");
        assert_eq!(value["canvases"][0]["fill_color"], "rgba(0, 0, 0, 0.3)");
        assert!(value["canvases"][0]["id"].as_str().is_some_and(|id| id.len() == 36));
        assert_eq!(value["events"][0]["type"], "active_shape_changed");
    }
}
