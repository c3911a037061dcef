//! GeoJSON FeatureCollectionからレコードを読み出す
//!
//! RFC 7946のGeoJSONは経度・緯度（WGS84）なので再投影は行わない。
//! フィールド名はプロパティのキー順に並べ、最後に`geometry`を加える。

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;
use std::sync::Arc;

use serde_json::{Map, Value};
use tracing::{debug, warn};

use super::GEOMETRY_FIELD;
use crate::error::{KmlError, Result};
use crate::model::{FieldNames, FieldValue, Record, Row};

pub struct GeoJsonSource {
    features: std::vec::IntoIter<Value>,
    // 直前の地物と同じキー構成ならフィールド名を共有する
    last_field_names: Option<FieldNames>,
}

impl GeoJsonSource {
    pub fn open(path: &Path) -> Result<Self> {
        let file = File::open(path)?;
        Self::from_reader(BufReader::new(file))
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        let value: Value = serde_json::from_reader(reader)?;
        Self::from_value(value)
    }

    pub fn from_value(value: Value) -> Result<Self> {
        let Value::Object(mut collection) = value else {
            return Err(KmlError::GeoJson("root must be an object".to_string()));
        };

        match collection.get("type").and_then(Value::as_str) {
            Some("FeatureCollection") => {}
            Some(other) => {
                return Err(KmlError::GeoJson(format!(
                    "type must be 'FeatureCollection', got '{}'",
                    other
                )))
            }
            None => return Err(KmlError::GeoJson("FeatureCollection must have a type".to_string())),
        }

        let features = match collection.remove("features") {
            Some(Value::Array(features)) => features,
            Some(_) => return Err(KmlError::GeoJson("features must be an array".to_string())),
            None => Vec::new(),
        };
        debug!("GeoJSON contains {} features", features.len());

        Ok(Self {
            features: features.into_iter(),
            last_field_names: None,
        })
    }

    fn to_record(&mut self, feature: Value) -> Option<Record> {
        let mut feature = match feature {
            Value::Object(feature) => feature,
            other => {
                warn!("Skipping feature that is not an object: {}", other);
                return None;
            }
        };

        let properties = match feature.remove("properties") {
            Some(Value::Object(properties)) => properties,
            _ => Map::new(),
        };
        let geometry = geometry_value(feature.get("geometry"));

        let field_names = self.field_names(&properties);
        let mut values: Row = properties.into_iter().map(|(_, v)| property_value(v)).collect();
        values.push(geometry);

        Some(Record::new(values, field_names))
    }

    fn field_names(&mut self, properties: &Map<String, Value>) -> FieldNames {
        if let Some(last) = &self.last_field_names {
            let same = last.len() == properties.len() + 1
                && last.iter().zip(properties.keys()).all(|(a, b)| a == b);
            if same {
                return Arc::clone(last);
            }
        }

        let names: FieldNames = properties
            .keys()
            .cloned()
            .chain(std::iter::once(GEOMETRY_FIELD.to_string()))
            .collect();
        self.last_field_names = Some(Arc::clone(&names));
        names
    }
}

impl Iterator for GeoJsonSource {
    type Item = Record;

    fn next(&mut self) -> Option<Record> {
        loop {
            let feature = self.features.next()?;
            if let Some(record) = self.to_record(feature) {
                return Some(record);
            }
        }
    }
}

fn property_value(value: Value) -> FieldValue {
    match value {
        Value::Null => FieldValue::Null,
        Value::Bool(v) => FieldValue::Bool(v),
        Value::Number(n) => match n.as_i64() {
            Some(v) => FieldValue::Integer(v),
            None => n.as_f64().map_or(FieldValue::Null, FieldValue::Double),
        },
        Value::String(v) => FieldValue::Text(v),
        // 配列・オブジェクトはJSON文字列のまま
        other => FieldValue::Text(other.to_string()),
    }
}

/// Pointのみ座標に変換し、それ以外はNullにする
fn geometry_value(geometry: Option<&Value>) -> FieldValue {
    let Some(Value::Object(geometry)) = geometry else {
        return FieldValue::Null;
    };

    match geometry.get("type").and_then(Value::as_str) {
        Some("Point") => {}
        other => {
            debug!("Unsupported geometry type: {:?}", other);
            return FieldValue::Null;
        }
    }

    let coordinates: Option<Vec<f64>> = geometry
        .get("coordinates")
        .and_then(Value::as_array)
        .and_then(|values| values.iter().map(Value::as_f64).collect());

    coordinates.map_or(FieldValue::Null, FieldValue::Coordinates)
}
