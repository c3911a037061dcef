//! GDAL/OGRで開けるベクタデータからレコードを読み出す

use std::path::Path;
use std::sync::Arc;

use gdal::spatial_ref::{CoordTransform, SpatialRef};
use gdal::vector::{FieldValue as OgrFieldValue, Geometry, LayerAccess};
use gdal::Dataset;
use tracing::{debug, info, warn};

use super::GEOMETRY_FIELD;
use crate::error::Result;
use crate::model::{FieldNames, FieldValue, Record, Row};

/// 経度・緯度の順になるWGS84
const WGS84_LONLAT: &str = "+proj=longlat +datum=WGS84 +no_defs";

pub struct OgrSource {
    dataset: Dataset,
    layer_name: Option<String>,
}

impl OgrSource {
    pub fn open(path: &Path, layer_name: Option<String>) -> Result<Self> {
        info!("Opening OGR dataset: {:?}", path);
        let dataset = Dataset::open(path)?;
        Ok(Self {
            dataset,
            layer_name,
        })
    }

    /// 全地物をWGS84に投影してから順に渡す
    pub fn for_each_record<F: FnMut(Record)>(&self, mut f: F) -> Result<()> {
        let mut layer = match &self.layer_name {
            Some(name) => self.dataset.layer_by_name(name)?,
            None => self.dataset.layer(0)?,
        };

        let mut names: Vec<String> = layer.defn().fields().map(|field| field.name()).collect();
        names.push(GEOMETRY_FIELD.to_string());
        let field_names: FieldNames = names.into();
        debug!("Layer fields: {:?}", field_names);

        let transform = match layer.spatial_ref() {
            Some(source_srs) => {
                let target_srs = SpatialRef::from_proj4(WGS84_LONLAT)?;
                Some(CoordTransform::new(&source_srs, &target_srs)?)
            }
            None => {
                warn!("Layer has no spatial reference, coordinates are used as-is");
                None
            }
        };

        for feature in layer.features() {
            let mut values: Row = feature
                .fields()
                .map(|(_, value)| field_value(value))
                .collect();
            values.push(point_value(feature.geometry(), transform.as_ref()));

            f(Record::new(values, Arc::clone(&field_names)));
        }

        Ok(())
    }
}

fn field_value(value: Option<OgrFieldValue>) -> FieldValue {
    match value {
        None => FieldValue::Null,
        Some(OgrFieldValue::IntegerValue(v)) => FieldValue::Integer(v as i64),
        Some(OgrFieldValue::Integer64Value(v)) => FieldValue::Integer(v),
        Some(OgrFieldValue::RealValue(v)) => FieldValue::Double(v),
        Some(OgrFieldValue::StringValue(v)) => FieldValue::Text(v),
        Some(OgrFieldValue::DateValue(v)) => FieldValue::Text(v.to_string()),
        Some(OgrFieldValue::DateTimeValue(v)) => FieldValue::Text(v.to_string()),
        Some(other) => FieldValue::Text(format!("{:?}", other)),
    }
}

fn point_value(geometry: Option<&Geometry>, transform: Option<&CoordTransform>) -> FieldValue {
    let Some(geometry) = geometry else {
        return FieldValue::Null;
    };
    if geometry.is_empty() || geometry.geometry_name() != "POINT" {
        debug!("Unsupported geometry: {}", geometry.geometry_name());
        return FieldValue::Null;
    }

    let (x, y, _) = match transform {
        Some(transform) => match geometry.transform(transform) {
            Ok(projected) => projected.get_point(0),
            Err(e) => {
                warn!("Failed to project geometry: {}", e);
                return FieldValue::Null;
            }
        },
        None => geometry.get_point(0),
    };

    FieldValue::Coordinates(vec![x, y])
}
