use anyhow::{Context, Result};
use clap::Parser;
use point_kml::ConversionConfig;
use std::path::PathBuf;
use tracing::info;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// 入力レイヤー（GeoJSON、またはGDALで開けるファイル。`path#layer`でレイヤー指定）
    #[arg(value_name = "INPUT")]
    input: PathBuf,

    /// 出力KMLファイル
    #[arg(value_name = "OUTPUT")]
    output: PathBuf,

    /// 地物名に使うフィールド
    #[arg(value_name = "NAME_FIELD")]
    name_field: String,

    /// アイコン画像のURLまたはパス
    #[arg(value_name = "ICON_HREF")]
    icon_href: String,
}

impl From<Args> for ConversionConfig {
    fn from(args: Args) -> Self {
        ConversionConfig::new(args.input, args.output, args.name_field, args.icon_href)
    }
}

fn main() -> Result<()> {
    // ログの初期化
    tracing_subscriber::fmt::init();

    // CLI引数の解析
    let args = Args::parse();

    // 処理開始時間を記録
    let start_time = std::time::Instant::now();

    let config = ConversionConfig::from(args);
    let summary = point_kml::convert(&config)
        .with_context(|| format!("Failed to convert {:?} to {:?}", config.input, config.output))?;

    info!(
        "Written KML: {:?} ({} placemarks, {} rows skipped)",
        config.output,
        summary.placemarks,
        summary.skipped.total()
    );

    // 処理時間を表示
    let elapsed = start_time.elapsed();
    info!("Total processing time: {:?}", elapsed);

    Ok(())
}
