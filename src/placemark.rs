use std::sync::Arc;

use tracing::{debug, warn};

use crate::error::{KmlError, Result};
use crate::model::{Coordinate, FieldValue, Placemark};

pub const UNNAMED: &str = "Unnamed";

/// 行からPlacemarkを組み立てる
///
/// 座標は行の最後の要素から取り出す。座標が取れない行は
/// `KmlError::InvalidGeometry`を返し、呼び出し側で読み飛ばす。
pub fn build_placemark(
    row: &[FieldValue],
    description: String,
    name_field_index: usize,
    icon_href: &Arc<str>,
) -> Result<Placemark> {
    debug!("Creating placemark for row: {:?}", row);

    let name = row
        .get(name_field_index)
        .and_then(FieldValue::to_display_string)
        .unwrap_or_else(|| UNNAMED.to_string());

    let point = match extract_point(row) {
        Ok(point) => point,
        Err(e) => {
            warn!("{} (row: {:?})", e, row);
            return Err(e);
        }
    };

    Ok(Placemark {
        name,
        visibility: true,
        description,
        icon_href: Arc::clone(icon_href),
        point,
    })
}

fn extract_point(row: &[FieldValue]) -> Result<Coordinate> {
    let coords = row
        .last()
        .ok_or_else(|| KmlError::InvalidGeometry("row has no geometry field".to_string()))?;

    match coords {
        FieldValue::Coordinates(values) if values.len() >= 2 => {
            let (lon, lat) = (values[0], values[1]);
            if !lon.is_finite() || !lat.is_finite() {
                return Err(KmlError::InvalidGeometry(format!(
                    "non-finite coordinates: {:?},{:?}",
                    lon, lat
                )));
            }
            Ok(Coordinate { lon, lat })
        }
        FieldValue::Coordinates(values) => Err(KmlError::InvalidGeometry(format!(
            "expected at least 2 values, got {}",
            values.len()
        ))),
        FieldValue::Null => Err(KmlError::InvalidGeometry("geometry is null".to_string())),
        other => Err(KmlError::InvalidGeometry(format!(
            "geometry is not a coordinate pair: {}",
            other
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn icon() -> Arc<str> {
        Arc::from("http://maps.google.com/mapfiles/kml/pushpin/ylw-pushpin.png")
    }

    #[test]
    fn test_build_placemark() {
        let row = vec![
            FieldValue::from("Springfield"),
            FieldValue::from(500),
            FieldValue::from((-89.6, 39.8)),
        ];
        let placemark = build_placemark(&row, "desc".to_string(), 0, &icon()).unwrap();

        assert_eq!(placemark.name, "Springfield");
        assert!(placemark.visibility);
        assert_eq!(placemark.description, "desc");
        assert_eq!(placemark.icon_href, icon());
        assert_eq!(placemark.point.to_string(), "-89.6,39.8,0");
    }

    #[test]
    fn test_null_name_becomes_unnamed() {
        let row = vec![FieldValue::Null, FieldValue::from((1.0, 2.0))];
        let placemark = build_placemark(&row, String::new(), 0, &icon()).unwrap();

        assert_eq!(placemark.name, UNNAMED);
    }

    #[test]
    fn test_name_from_non_text_field() {
        let row = vec![FieldValue::from(42), FieldValue::from((1.0, 2.0))];
        let placemark = build_placemark(&row, String::new(), 0, &icon()).unwrap();

        assert_eq!(placemark.name, "42");
    }

    #[test]
    fn test_extra_coordinate_values_are_ignored() {
        let row = vec![
            FieldValue::from("A"),
            FieldValue::Coordinates(vec![139.7, 35.6, 40.0]),
        ];
        let placemark = build_placemark(&row, String::new(), 0, &icon()).unwrap();

        assert_eq!(placemark.point.to_string(), "139.7,35.6,0");
    }

    #[test]
    fn test_invalid_geometry_is_rejected() {
        let cases = vec![
            vec![FieldValue::from("A"), FieldValue::Null],
            vec![FieldValue::from("A"), FieldValue::Coordinates(vec![1.0])],
            vec![FieldValue::from("A"), FieldValue::from("POINT (1 2)")],
            vec![FieldValue::from("A"), FieldValue::from((f64::NAN, 35.0))],
            vec![FieldValue::from("A"), FieldValue::from((139.7, f64::INFINITY))],
            vec![],
        ];

        for row in cases {
            let result = build_placemark(&row, String::new(), 0, &icon());
            assert!(
                matches!(result, Err(KmlError::InvalidGeometry(_))),
                "row {:?} should be rejected, got {:?}",
                row,
                result
            );
        }
    }
}
