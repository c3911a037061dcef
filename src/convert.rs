use tracing::info;

use crate::config::ConversionConfig;
use crate::document::{ConversionSummary, DocumentAssembler};
use crate::error::Result;
use crate::model::Record;
use crate::source::RowSource;
use crate::writer::KmlWriter;

/// 入力レイヤーを読み込み、KMLファイルを書き出す
///
/// 行ごとの問題（名前フィールドなし、座標不正など）はログを出して読み飛ばす。
/// エラーになるのは入力を開けない場合と、書き出し後の読み戻しに失敗した場合のみ。
pub fn convert(config: &ConversionConfig) -> Result<ConversionSummary> {
    let source = RowSource::open(&config.input)?;
    convert_records(config, |push| source.for_each_record(push))
}

/// 任意のRow Sourceから変換する
pub fn convert_from<I>(config: &ConversionConfig, records: I) -> Result<ConversionSummary>
where
    I: IntoIterator<Item = Record>,
{
    convert_records(config, |push| {
        records.into_iter().for_each(push);
        Ok(())
    })
}

fn convert_records<S>(config: &ConversionConfig, read: S) -> Result<ConversionSummary>
where
    S: FnOnce(&mut dyn FnMut(Record)) -> Result<()>,
{
    info!("Generating KML file...");

    let mut assembler = DocumentAssembler::new(
        config.document_name(),
        config.name_field.as_str(),
        config.icon_href.as_str(),
    );
    read(&mut |record: Record| assembler.push(record))?;
    let (document, summary) = assembler.finish();

    KmlWriter::new().write(&document, &config.output)?;

    info!(
        "KML file generated: {} placemarks from {} rows ({} skipped)",
        summary.placemarks,
        summary.rows_read,
        summary.skipped.total()
    );

    Ok(summary)
}
