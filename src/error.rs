use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum KmlError {
    #[error("Field '{0}' not found.")]
    MissingField(String),

    #[error("Row has insufficient data: {0} value(s)")]
    InsufficientRow(usize),

    #[error("Invalid coordinates: {0}")]
    InvalidGeometry(String),

    #[error("Error writing KML: {0}")]
    WriteFailure(String),

    #[error("Unsupported input: {0:?}")]
    UnsupportedInput(PathBuf),

    #[error("Invalid GeoJSON: {0}")]
    GeoJson(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("XML error: {0}")]
    Xml(#[from] quick_xml::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[cfg(feature = "gdal")]
    #[error("GDAL error: {0}")]
    Gdal(#[from] gdal::errors::GdalError),
}

pub type Result<T> = std::result::Result<T, KmlError>;
