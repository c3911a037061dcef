pub mod geojson;
#[cfg(feature = "gdal")]
pub mod ogr;

use std::path::{Path, PathBuf};

use tracing::info;

use crate::error::Result;
use crate::model::Record;

pub use geojson::GeoJsonSource;
#[cfg(feature = "gdal")]
pub use ogr::OgrSource;

/// 座標列のフィールド名
pub const GEOMETRY_FIELD: &str = "geometry";

/// 入力レイヤーからレコードを順に供給する
pub enum RowSource {
    GeoJson(GeoJsonSource),
    #[cfg(feature = "gdal")]
    Ogr(OgrSource),
}

impl RowSource {
    /// 拡張子で入力形式を判定して開く
    ///
    /// `data.gpkg#cities`のように`#`以降でレイヤー名を指定できる（GDAL入力のみ）。
    pub fn open(input: &Path) -> Result<Self> {
        let (path, layer_name) = split_layer_reference(input);

        match input_kind(&path) {
            InputKind::GeoJson => {
                info!("Processing GeoJSON file: {:?}", path);
                Ok(RowSource::GeoJson(GeoJsonSource::open(&path)?))
            }
            #[cfg(feature = "gdal")]
            InputKind::Other => Ok(RowSource::Ogr(OgrSource::open(&path, layer_name)?)),
            #[cfg(not(feature = "gdal"))]
            InputKind::Other => {
                let _ = layer_name;
                Err(crate::error::KmlError::UnsupportedInput(
                    input.to_path_buf(),
                ))
            }
        }
    }

    pub fn for_each_record<F: FnMut(Record)>(self, f: F) -> Result<()> {
        match self {
            RowSource::GeoJson(source) => {
                source.for_each(f);
                Ok(())
            }
            #[cfg(feature = "gdal")]
            RowSource::Ogr(source) => source.for_each_record(f),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum InputKind {
    GeoJson,
    Other,
}

fn input_kind(path: &Path) -> InputKind {
    let ext = path
        .extension()
        .and_then(|s| s.to_str())
        .map(|s| s.to_ascii_lowercase());

    match ext.as_deref() {
        Some("geojson") | Some("json") => InputKind::GeoJson,
        _ => InputKind::Other,
    }
}

/// `path#layer`をパスとレイヤー名に分ける
fn split_layer_reference(input: &Path) -> (PathBuf, Option<String>) {
    if input.exists() {
        return (input.to_path_buf(), None);
    }

    let Some(reference) = input.to_str() else {
        return (input.to_path_buf(), None);
    };

    match reference.rsplit_once('#') {
        Some((path, layer)) if !path.is_empty() && !layer.is_empty() => {
            (PathBuf::from(path), Some(layer.to_string()))
        }
        _ => (input.to_path_buf(), None),
    }
}
