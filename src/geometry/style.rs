use serde::{Deserialize, Serialize};

/// Corner style used when stroking a shape outline.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LineJoin {
    #[default]
    Miter,
    Round,
    Bevel,
}

/// Paint attributes of a shape, handed to the renderer unchanged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PaintStyle {
    pub fill: bool,
    pub fill_style: String,
    pub stroke: bool,
    pub stroke_style: String,
    pub line_width: f64,
    pub line_join: LineJoin,
}

impl Default for PaintStyle {
    fn default() -> Self {
        Self {
            fill: false,
            fill_style: "#000".to_owned(),
            stroke: true,
            stroke_style: "#000".to_owned(),
            line_width: 1.0,
            line_join: LineJoin::Miter,
        }
    }
}

impl PaintStyle {
    /// Returns a copy with fill and stroke enabled and a bevel join, the
    /// look every simulated shape is drawn with.
    #[must_use]
    pub fn for_body(&self) -> Self {
        Self {
            fill: true,
            stroke: true,
            line_join: LineJoin::Bevel,
            ..self.clone()
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn for_body_forces_flags_and_keeps_colors() {
        let style = PaintStyle {
            fill: false,
            fill_style: "#ff0000".to_owned(),
            stroke: false,
            ..PaintStyle::default()
        };
        let body = style.for_body();
        assert!(body.fill);
        assert!(body.stroke);
        assert_eq!(body.line_join, LineJoin::Bevel);
        assert_eq!(body.fill_style, "#ff0000");
    }

    #[test]
    fn deserializes_partial_style() {
        let style: PaintStyle =
            serde_json::from_str(r##"{"fillStyle": "#123456", "lineJoin": "round"}"##).unwrap();
        assert_eq!(style.fill_style, "#123456");
        assert_eq!(style.line_join, LineJoin::Round);
        assert!(style.stroke);
    }
}
