use std::collections::HashMap;
use std::sync::Arc;

use tracing::{debug, warn};

use crate::description::build_description;
use crate::error::{KmlError, Result};
use crate::model::{FieldNames, KmlDocument, Placemark, Record};
use crate::placemark::build_placemark;

/// フィールド名から列位置への対応表
#[derive(Debug, Clone)]
pub struct FieldIndex {
    positions: HashMap<String, usize>,
}

impl FieldIndex {
    pub fn new(field_names: &[String]) -> Self {
        let mut positions = HashMap::with_capacity(field_names.len());
        for (i, name) in field_names.iter().enumerate() {
            // 重複時は先頭の列を優先
            positions.entry(name.clone()).or_insert(i);
        }
        Self { positions }
    }

    pub fn position(&self, label: &str) -> Option<usize> {
        self.positions.get(label).copied()
    }

    pub fn resolve(&self, label: &str) -> Result<usize> {
        self.position(label)
            .ok_or_else(|| KmlError::MissingField(label.to_string()))
    }
}

/// 読み飛ばした行の件数
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SkippedRows {
    pub insufficient: usize,
    pub missing_field: usize,
    pub invalid_geometry: usize,
}

impl SkippedRows {
    pub fn total(&self) -> usize {
        self.insufficient + self.missing_field + self.invalid_geometry
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConversionSummary {
    pub rows_read: usize,
    pub placemarks: usize,
    pub skipped: SkippedRows,
}

/// Row Sourceの行を順にPlacemarkへ変換してDocumentを組み立てる
pub struct DocumentAssembler {
    document_name: String,
    name_field: String,
    icon_href: Arc<str>,
    // 直前のフィールド名とその対応表
    resolved: Option<(FieldNames, FieldIndex)>,
    placemarks: Vec<Placemark>,
    summary: ConversionSummary,
}

impl DocumentAssembler {
    pub fn new(
        document_name: impl Into<String>,
        name_field: impl Into<String>,
        icon_href: impl Into<Arc<str>>,
    ) -> Self {
        Self {
            document_name: document_name.into(),
            name_field: name_field.into(),
            icon_href: icon_href.into(),
            resolved: None,
            placemarks: Vec::new(),
            summary: ConversionSummary::default(),
        }
    }

    pub fn push(&mut self, record: Record) {
        debug!("Fetched row: {:?}", record.values);
        self.summary.rows_read += 1;

        match self.process(&record) {
            Ok(placemark) => {
                self.placemarks.push(placemark);
                self.summary.placemarks += 1;
            }
            Err(e) => self.record_skip(e),
        }
    }

    fn process(&mut self, record: &Record) -> Result<Placemark> {
        let row = &record.values;

        // 行の長さを確認
        if row.len() < 2 {
            let e = KmlError::InsufficientRow(row.len());
            warn!("{} (row: {:?})", e, row);
            return Err(e);
        }

        // 名前フィールドの位置を解決
        let name_field_index = match cached_field_index(&mut self.resolved, &record.field_names)
            .resolve(&self.name_field)
        {
            Ok(index) => index,
            Err(e) => {
                warn!("{}", e);
                return Err(e);
            }
        };

        let description = build_description(row, &record.field_names);

        // 座標エラーはbuild_placemark側でログ出力済み
        build_placemark(row, description, name_field_index, &self.icon_href)
    }

    fn record_skip(&mut self, error: KmlError) {
        let skipped = &mut self.summary.skipped;
        match error {
            KmlError::InsufficientRow(_) => skipped.insufficient += 1,
            KmlError::MissingField(_) => skipped.missing_field += 1,
            _ => skipped.invalid_geometry += 1,
        }
    }

    pub fn finish(self) -> (KmlDocument, ConversionSummary) {
        (
            KmlDocument::new(self.document_name, self.placemarks),
            self.summary,
        )
    }
}

/// フィールド名が前の行と同じなら対応表を使い回す
fn cached_field_index<'a>(
    resolved: &'a mut Option<(FieldNames, FieldIndex)>,
    field_names: &FieldNames,
) -> &'a FieldIndex {
    let reuse = matches!(
        &*resolved,
        Some((cached_names, _))
            if Arc::ptr_eq(cached_names, field_names) || cached_names == field_names
    );
    if !reuse {
        *resolved = Some((Arc::clone(field_names), FieldIndex::new(field_names)));
    }

    let (_, index) =
        resolved.get_or_insert_with(|| (Arc::clone(field_names), FieldIndex::new(field_names)));
    index
}

impl Extend<Record> for DocumentAssembler {
    fn extend<T: IntoIterator<Item = Record>>(&mut self, iter: T) {
        for record in iter {
            self.push(record);
        }
    }
}

/// レコード列からDocumentを組み立てる
pub fn assemble_document<I>(
    records: I,
    document_name: &str,
    name_field: &str,
    icon_href: &str,
) -> (KmlDocument, ConversionSummary)
where
    I: IntoIterator<Item = Record>,
{
    let mut assembler = DocumentAssembler::new(document_name, name_field, icon_href);
    assembler.extend(records);
    assembler.finish()
}
