use geoview_image::ImageError;
use geoview_io::IoError;

/// An error type for the viewer core.
#[derive(thiserror::Error, Debug)]
pub enum ViewerError {
    /// The raster could not be decoded; the previous session state is kept.
    #[error("Failed to load raster. {0}")]
    LoadFailed(#[from] LoadError),

    /// The geotransform has a zero determinant and cannot be inverted.
    #[error("Geotransform is singular, geographic coordinates cannot be mapped to pixels")]
    SingularTransform,

    /// The requested location falls outside the raster.
    #[error("Location maps to pixel ({pixel_x}, {pixel_y}), outside the raster bounds")]
    OutOfBounds {
        /// Column the location resolved to.
        pixel_x: f64,
        /// Row the location resolved to.
        pixel_y: f64,
    },

    /// The operation needs a loaded raster.
    #[error("No raster loaded")]
    NoRasterLoaded,

    /// The viewer configuration is invalid.
    #[error("Invalid configuration. {0}")]
    Config(#[from] ConfigError),
}

impl ViewerError {
    /// Whether the error only rejects one mark and leaves the session usable.
    pub fn is_rejected_mark(&self) -> bool {
        matches!(self, Self::OutOfBounds { .. } | Self::SingularTransform)
    }
}

/// The reasons a raster load can fail.
#[derive(thiserror::Error, Debug)]
pub enum LoadError {
    /// Error reading or decoding the raster.
    #[error("{0}")]
    Io(#[from] IoError),

    /// Error building the display buffer.
    #[error("{0}")]
    Image(#[from] ImageError),
}

impl From<IoError> for ViewerError {
    fn from(err: IoError) -> Self {
        ViewerError::LoadFailed(LoadError::Io(err))
    }
}

impl From<ImageError> for ViewerError {
    fn from(err: ImageError) -> Self {
        ViewerError::LoadFailed(LoadError::Image(err))
    }
}

/// An error type for the viewer configuration.
#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    /// Error reading the configuration file.
    #[error("Failed to read the configuration file. {0}")]
    FileError(#[from] std::io::Error),

    /// Error parsing the configuration.
    #[error("Failed to parse the configuration. {0}")]
    ParseError(#[from] serde_json::Error),

    /// A configuration value is out of its valid range.
    #[error("Invalid value for {0}: {1}")]
    InvalidValue(&'static str, String),
}
