use std::fmt;
use std::sync::Arc;

/// 属性値（ジオメトリ列を含む）
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Null,
    Bool(bool),
    Integer(i64),
    Double(f64),
    Text(String),
    /// 投影済みの経度・緯度（必要なら高さ）
    Coordinates(Vec<f64>),
}

impl FieldValue {
    /// 文字列表現。Nullの場合はNone
    pub fn to_display_string(&self) -> Option<String> {
        match self {
            FieldValue::Null => None,
            other => Some(other.to_string()),
        }
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::Null => Ok(()),
            FieldValue::Bool(v) => write!(f, "{}", v),
            FieldValue::Integer(v) => write!(f, "{}", v),
            // 小数部を常に表示する（500 -> 500.0）
            FieldValue::Double(v) => write!(f, "{:?}", v),
            FieldValue::Text(v) => f.write_str(v),
            FieldValue::Coordinates(values) => {
                f.write_str("(")?;
                for (i, v) in values.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{:?}", v)?;
                }
                f.write_str(")")
            }
        }
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        FieldValue::Text(value.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        FieldValue::Text(value)
    }
}

impl From<i64> for FieldValue {
    fn from(value: i64) -> Self {
        FieldValue::Integer(value)
    }
}

impl From<i32> for FieldValue {
    fn from(value: i32) -> Self {
        FieldValue::Integer(value as i64)
    }
}

impl From<f64> for FieldValue {
    fn from(value: f64) -> Self {
        FieldValue::Double(value)
    }
}

impl From<bool> for FieldValue {
    fn from(value: bool) -> Self {
        FieldValue::Bool(value)
    }
}

impl From<(f64, f64)> for FieldValue {
    fn from((x, y): (f64, f64)) -> Self {
        FieldValue::Coordinates(vec![x, y])
    }
}

impl<T: Into<FieldValue>> From<Option<T>> for FieldValue {
    fn from(value: Option<T>) -> Self {
        value.map_or(FieldValue::Null, Into::into)
    }
}

/// 1地物分の値。最後の要素が座標
pub type Row = Vec<FieldValue>;

/// レイヤー内の全行で共有されるフィールド名
pub type FieldNames = Arc<[String]>;

/// Row Sourceが返す1件分の(行, フィールド名)
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    pub values: Row,
    pub field_names: FieldNames,
}

impl Record {
    pub fn new(values: Row, field_names: FieldNames) -> Self {
        Self {
            values,
            field_names,
        }
    }
}

/// 経度・緯度（WGS84）
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Coordinate {
    pub lon: f64,
    pub lat: f64,
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // 高さは常に0（地表）
        write!(f, "{:?},{:?},0", self.lon, self.lat)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Placemark {
    pub name: String,
    pub visibility: bool,
    pub description: String,
    pub icon_href: Arc<str>,
    pub point: Coordinate,
}

#[derive(Debug, Clone, PartialEq)]
pub struct KmlDocument {
    pub name: String,
    pub description: String,
    pub placemarks: Vec<Placemark>,
}

impl KmlDocument {
    pub fn new(name: impl Into<String>, placemarks: Vec<Placemark>) -> Self {
        let name = name.into();
        Self {
            description: name.clone(),
            name,
            placemarks,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_field_value_display() {
        assert_eq!(FieldValue::from("Springfield").to_string(), "Springfield");
        assert_eq!(FieldValue::from(500).to_string(), "500");
        assert_eq!(FieldValue::from(500.0).to_string(), "500.0");
        assert_eq!(FieldValue::from(true).to_string(), "true");
        assert_eq!(FieldValue::from((-89.6, 39.8)).to_string(), "(-89.6, 39.8)");
        assert_eq!(FieldValue::Null.to_display_string(), None);
    }

    #[test]
    fn test_coordinate_display() {
        let point = Coordinate {
            lon: -89.6,
            lat: 39.8,
        };
        assert_eq!(point.to_string(), "-89.6,39.8,0");

        let point = Coordinate {
            lon: 135.0,
            lat: 35.0,
        };
        assert_eq!(point.to_string(), "135.0,35.0,0");
    }

    #[test]
    fn test_document_name_and_description() {
        let doc = KmlDocument::new("out.kml", Vec::new());
        assert_eq!(doc.name, "out.kml");
        assert_eq!(doc.description, "out.kml");
        assert!(doc.placemarks.is_empty());
    }
}
