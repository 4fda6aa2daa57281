//! Per-canvas and annotation dialog configuration.

use crate::hit_test::FillRule;
use crate::shapes::{SerializableColor, parse_css_color};
use serde::{Deserialize, Serialize};

/// How new shape ids are chosen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IdPolicy {
    /// `id = number of stored shapes + 1`. An id removed by undo is handed
    /// out again by the next finalized shape.
    #[default]
    LengthDerived,
    /// Ids increase for the whole lifetime of the store and never repeat.
    /// Reset starts counting from 1 again.
    Monotonic,
}

/// Settings supplied when a canvas is registered.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CanvasSettings {
    /// Outline color hosts should use for the in-progress stroke.
    #[serde(default = "default_border_color")]
    pub border_color: SerializableColor,
    /// Fill color hosts should use for the in-progress stroke.
    #[serde(default = "default_fill_color")]
    pub fill_color: SerializableColor,
    /// Whether a secondary click on a shape opens the annotation dialog.
    #[serde(default)]
    pub annotation_enabled: bool,
    /// Image the canvas is laid over.
    #[serde(default)]
    pub image_source: Option<String>,
    #[serde(default)]
    pub id_policy: IdPolicy,
    #[serde(default)]
    pub fill_rule: FillRule,
}

fn default_border_color() -> SerializableColor {
    parse_css_color("rgb(255, 255, 255)")
}

fn default_fill_color() -> SerializableColor {
    parse_css_color("rgba(0, 0, 0, 0.3)")
}

impl Default for CanvasSettings {
    fn default() -> Self {
        Self {
            border_color: default_border_color(),
            fill_color: default_fill_color(),
            annotation_enabled: false,
            image_source: None,
            id_policy: IdPolicy::default(),
            fill_rule: FillRule::default(),
        }
    }
}

impl CanvasSettings {
    /// Settings for an image with everything else at defaults.
    pub fn for_image(image_source: impl Into<String>) -> Self {
        Self {
            image_source: Some(image_source.into()),
            ..Self::default()
        }
    }

    /// Enable or disable the annotation dialog.
    pub fn with_annotations(mut self, enabled: bool) -> Self {
        self.annotation_enabled = enabled;
        self
    }

    /// Set how shape ids are allocated.
    pub fn with_id_policy(mut self, policy: IdPolicy) -> Self {
        self.id_policy = policy;
        self
    }

    /// Set the containment rule for hit tests.
    pub fn with_fill_rule(mut self, rule: FillRule) -> Self {
        self.fill_rule = rule;
        self
    }
}

/// Presentation options for the annotation dialog. Hosts decide how to use
/// them; the engine only passes them along.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnnotationDialogOptions {
    /// Transition class applied to the dialog.
    pub class_name: String,
    /// Show a close button.
    pub close_button: bool,
    /// Minimum dialog width in pixels.
    pub min_width: u32,
    /// Maximum dialog width in pixels.
    pub max_width: u32,
    /// Dim the page behind the dialog; clicking it dismisses the dialog.
    pub overlay: bool,
}

impl Default for AnnotationDialogOptions {
    fn default() -> Self {
        Self {
            class_name: "fade-and-drop".to_string(),
            close_button: true,
            min_width: 280,
            max_width: 600,
            overlay: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let settings = CanvasSettings::default();
        assert_eq!(settings.border_color, SerializableColor::white());
        assert_eq!(settings.fill_color, SerializableColor::new(0, 0, 0, 77));
        assert!(!settings.annotation_enabled);
        assert_eq!(settings.id_policy, IdPolicy::LengthDerived);
        assert_eq!(settings.fill_rule, FillRule::EvenOdd);
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let settings: CanvasSettings = serde_json::from_str(
            r#"{ "image_source": "tree.jpg", "annotation_enabled": true, "fill_color": "rgba(0, 100, 0, 0.6)" }"#,
        )
        .unwrap();

        assert_eq!(settings.image_source.as_deref(), Some("tree.jpg"));
        assert!(settings.annotation_enabled);
        assert_eq!(settings.fill_color, SerializableColor::new(0, 100, 0, 153));
        assert_eq!(settings.border_color, SerializableColor::white());
    }

    #[test]
    fn test_policy_names() {
        let settings: CanvasSettings =
            serde_json::from_str(r#"{ "id_policy": "monotonic", "fill_rule": "non_zero" }"#).unwrap();
        assert_eq!(settings.id_policy, IdPolicy::Monotonic);
        assert_eq!(settings.fill_rule, FillRule::NonZero);
    }

    #[test]
    fn test_dialog_options_merge() {
        let options: AnnotationDialogOptions =
            serde_json::from_str(r#"{ "max_width": 400, "overlay": false }"#).unwrap();
        assert_eq!(options.max_width, 400);
        assert!(!options.overlay);
        assert_eq!(options.min_width, 280);
        assert_eq!(options.class_name, "fade-and-drop");
    }

    #[test]
    fn test_builders() {
        let settings = CanvasSettings::for_image("a.png")
            .with_annotations(true)
            .with_id_policy(IdPolicy::Monotonic)
            .with_fill_rule(FillRule::NonZero);
        assert_eq!(settings.image_source.as_deref(), Some("a.png"));
        assert!(settings.annotation_enabled);
        assert_eq!(settings.id_policy, IdPolicy::Monotonic);
        assert_eq!(settings.fill_rule, FillRule::NonZero);
    }
}
