use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::{error::ConfigError, marker::MarkerStyle, viewport::CanvasSize};

/// Tunables of the viewer.
///
/// Every field has a default, so a configuration file only needs to list
/// the values it changes:
///
/// ```
/// use geoview::ViewerConfig;
///
/// let config = ViewerConfig::from_json_str(r#"{ "zoom_step": 1.25 }"#).unwrap();
/// assert_eq!(config.zoom_step, 1.25);
/// assert_eq!(config.max_zoom, 10.0);
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ViewerConfig {
    /// Initial size of the rendering surface.
    pub canvas: CanvasSize,
    /// Share of the canvas the fitted raster may use, in `(0, 1]`.
    pub fit_margin: f64,
    /// Zoom multiplier applied per zoom-in event.
    pub zoom_step: f64,
    /// Lower zoom limit.
    pub min_zoom: f64,
    /// Upper zoom limit.
    pub max_zoom: f64,
    /// Appearance of the location markers.
    pub marker: MarkerStyle,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            canvas: CanvasSize::default(),
            fit_margin: 0.9,
            zoom_step: 1.1,
            min_zoom: 0.1,
            max_zoom: 10.0,
            marker: MarkerStyle::default(),
        }
    }
}

impl ViewerConfig {
    /// Parse and validate a JSON configuration.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a JSON configuration file.
    pub fn from_json_file(file_path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let json = std::fs::read_to_string(file_path)?;
        Self::from_json_str(&json)
    }

    /// Check that every value is in its valid range.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.fit_margin > 0.0 && self.fit_margin <= 1.0) {
            return Err(ConfigError::InvalidValue(
                "fit_margin",
                format!("{} is not in (0, 1]", self.fit_margin),
            ));
        }
        if !(self.zoom_step > 1.0 && self.zoom_step.is_finite()) {
            return Err(ConfigError::InvalidValue(
                "zoom_step",
                format!("{} must be greater than 1", self.zoom_step),
            ));
        }
        // the fitted view starts at zoom 1
        if !(self.min_zoom > 0.0
            && self.min_zoom <= 1.0
            && self.max_zoom >= 1.0
            && self.max_zoom.is_finite())
        {
            return Err(ConfigError::InvalidValue(
                "min_zoom/max_zoom",
                format!("[{}, {}] does not contain 1", self.min_zoom, self.max_zoom),
            ));
        }
        self.canvas.validate()?;
        self.marker.validate()
    }
}

#[cfg(test)]
mod tests {
    use super::ViewerConfig;
    use crate::{error::ConfigError, viewport::CanvasSize};

    #[test]
    fn defaults_are_valid() -> Result<(), ConfigError> {
        let config = ViewerConfig::default();
        config.validate()?;
        assert_eq!(config.canvas.width, 800.0);
        assert_eq!(config.canvas.height, 600.0);
        assert_eq!(config.fit_margin, 0.9);
        assert_eq!(config.zoom_step, 1.1);
        assert_eq!((config.min_zoom, config.max_zoom), (0.1, 10.0));
        Ok(())
    }

    #[test]
    fn partial_json() -> Result<(), ConfigError> {
        let config = ViewerConfig::from_json_str(
            r#"{ "canvas": { "width": 1024.0, "height": 768.0 }, "marker": { "arm": 6.0 } }"#,
        )?;
        assert_eq!(config.canvas.width, 1024.0);
        assert_eq!(config.marker.arm, 6.0);
        assert_eq!(config.marker.ring_padding, 2.0);
        assert_eq!(config.zoom_step, 1.1);
        Ok(())
    }

    #[test]
    fn unknown_field_is_rejected() {
        let res = ViewerConfig::from_json_str(r#"{ "zoom": 2.0 }"#);
        assert!(matches!(res, Err(ConfigError::ParseError(_))));
    }

    #[test]
    fn invalid_ranges() {
        for json in [
            r#"{ "fit_margin": 0.0 }"#,
            r#"{ "fit_margin": 1.5 }"#,
            r#"{ "zoom_step": 1.0 }"#,
            r#"{ "min_zoom": 5.0, "max_zoom": 2.0 }"#,
            r#"{ "min_zoom": 0.0 }"#,
            r#"{ "min_zoom": 2.0 }"#,
            r#"{ "max_zoom": 0.5 }"#,
            r#"{ "canvas": { "width": -1.0, "height": 600.0 } }"#,
        ] {
            let res = ViewerConfig::from_json_str(json);
            assert!(
                matches!(res, Err(ConfigError::InvalidValue(..))),
                "{json} should be rejected"
            );
        }
    }

    #[test]
    fn non_finite_canvas() {
        for canvas in [
            CanvasSize::new(f64::INFINITY, 600.0),
            CanvasSize::new(800.0, f64::NAN),
        ] {
            let config = ViewerConfig {
                canvas,
                ..Default::default()
            };
            assert!(matches!(
                config.validate(),
                Err(ConfigError::InvalidValue("canvas", _))
            ));
        }
    }

    #[test]
    fn from_file() -> Result<(), ConfigError> {
        let tmp_dir = tempfile::tempdir()?;
        let file_path = tmp_dir.path().join("viewer.json");
        std::fs::write(&file_path, r#"{ "max_zoom": 4.0 }"#)?;
        let config = ViewerConfig::from_json_file(&file_path)?;
        assert_eq!(config.max_zoom, 4.0);
        Ok(())
    }
}
