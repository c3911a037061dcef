pub mod config;
pub mod convert;
pub mod description;
pub mod document;
pub mod error;
pub mod model;
pub mod placemark;
pub mod source;
pub mod writer;

pub use config::ConversionConfig;
pub use convert::{convert, convert_from};
pub use document::{ConversionSummary, DocumentAssembler, FieldIndex, SkippedRows};
pub use error::{KmlError, Result};
pub use model::{Coordinate, FieldNames, FieldValue, KmlDocument, Placemark, Record, Row};
pub use source::RowSource;
pub use writer::KmlWriter;
