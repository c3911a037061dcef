use std::path::PathBuf;

/// 変換パラメータ
#[derive(Debug, Clone)]
pub struct ConversionConfig {
    /// 入力レイヤー（GeoJSONファイル、またはGDALで開けるデータソース）
    pub input: PathBuf,
    /// 出力KMLファイル
    pub output: PathBuf,
    /// 地物名に使うフィールド
    pub name_field: String,
    /// 全Placemark共通のアイコン
    pub icon_href: String,
}

impl ConversionConfig {
    pub fn new(
        input: impl Into<PathBuf>,
        output: impl Into<PathBuf>,
        name_field: impl Into<String>,
        icon_href: impl Into<String>,
    ) -> Self {
        Self {
            input: input.into(),
            output: output.into(),
            name_field: name_field.into(),
            icon_href: icon_href.into(),
        }
    }

    /// KMLのDocument名・説明に使う出力パス文字列
    pub fn document_name(&self) -> String {
        self.output.to_string_lossy().into_owned()
    }
}
