/// An error type for the io module.
#[derive(thiserror::Error, Debug)]
pub enum IoError {
    /// Error when the file does not exist.
    #[error("File does not exist: {0}")]
    FileDoesNotExist(std::path::PathBuf),

    /// Invalid file extension.
    #[error("File does not have a valid extension: {0}")]
    InvalidFileExtension(std::path::PathBuf),

    /// Error to open the file.
    #[error("Failed to manipulate the file. {0}")]
    FileError(#[from] std::io::Error),

    /// Error to decode the TIFF image.
    #[error("Error with Tiff decoding. {0}")]
    TiffDecodingError(#[from] tiff::TiffError),

    /// The TIFF sample layout cannot be turned into a single band.
    #[error("Unsupported sample layout: {0}")]
    UnsupportedSampleLayout(String),

    /// The georeferencing tags are present but malformed.
    #[error("Invalid georeferencing tags: {0}")]
    InvalidGeoTags(String),

    /// The world file sidecar could not be parsed.
    #[error("Invalid world file {0}: {1}")]
    InvalidWorldFile(std::path::PathBuf, String),

    /// Error to create the image.
    #[error("Failed to create image. {0}")]
    ImageCreationError(#[from] geoview_image::ImageError),

    /// Error to encode the PNG image.
    #[error("Failed to encode the png image. {0}")]
    PngEncodingError(String),
}
