use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::Path;

use quick_xml::escape::partial_escape;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;

use crate::error::{KmlError, Result};
use crate::model::{KmlDocument, Placemark};

pub const KML_NAMESPACE: &str = "http://www.opengis.net/kml/2.2";

const INDENT_SIZE: usize = 2;

#[derive(Default)]
pub struct KmlWriter {}

impl KmlWriter {
    pub fn new() -> Self {
        Self {}
    }

    /// KMLファイルを書き出し、エンティティを戻す
    ///
    /// 1回目の書き出しに失敗してもログを出して後処理に進む。
    pub fn write(&self, document: &KmlDocument, output_path: &Path) -> Result<()> {
        tracing::info!(
            "Writing KML: {:?} ({} placemarks)",
            output_path,
            document.placemarks.len()
        );

        if let Err(e) = self.write_escaped(document, output_path) {
            tracing::error!("{}", e);
        }

        // ファイル全体のエンティティを置換して上書き
        let kml_content = fs::read_to_string(output_path)?;
        let unescaped_kml_content = unescape_entities(&kml_content);
        fs::write(output_path, unescaped_kml_content)?;

        Ok(())
    }

    /// `write`と同じ内容を文字列として返す
    pub fn render(&self, document: &KmlDocument) -> Result<String> {
        let mut buffer = Vec::new();
        self.serialize(document, &mut buffer)?;
        let kml_content = String::from_utf8(buffer)
            .map_err(|e| KmlError::WriteFailure(e.to_string()))?;
        Ok(unescape_entities(&kml_content))
    }

    fn write_escaped(&self, document: &KmlDocument, output_path: &Path) -> Result<()> {
        let file = File::create(output_path)
            .map_err(|e| KmlError::WriteFailure(format!("{:?}: {}", output_path, e)))?;
        let mut out = BufWriter::new(file);
        self.serialize(document, &mut out)
            .map_err(|e| KmlError::WriteFailure(e.to_string()))?;
        out.flush()
            .map_err(|e| KmlError::WriteFailure(e.to_string()))?;
        Ok(())
    }

    fn serialize<W: Write>(&self, document: &KmlDocument, out: &mut W) -> Result<()> {
        let mut writer = Writer::new_with_indent(&mut *out, b' ', INDENT_SIZE);

        writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;
        writer.write_event(Event::Start(
            BytesStart::new("kml").with_attributes([("xmlns", KML_NAMESPACE)]),
        ))?;
        writer.write_event(Event::Start(BytesStart::new("Document")))?;

        write_text_element(&mut writer, "name", &document.name)?;
        write_text_element(&mut writer, "description", &document.description)?;

        for placemark in &document.placemarks {
            write_placemark(&mut writer, placemark)?;
        }

        writer.write_event(Event::End(BytesEnd::new("Document")))?;
        writer.write_event(Event::End(BytesEnd::new("kml")))?;

        out.write_all(b"\n")?;
        Ok(())
    }
}

fn write_placemark<W: Write>(writer: &mut Writer<W>, placemark: &Placemark) -> Result<()> {
    writer.write_event(Event::Start(BytesStart::new("Placemark")))?;

    write_text_element(writer, "name", &placemark.name)?;
    write_text_element(
        writer,
        "visibility",
        if placemark.visibility { "true" } else { "false" },
    )?;
    write_text_element(writer, "description", &placemark.description)?;

    // Style/IconStyle/Icon/href
    writer.write_event(Event::Start(BytesStart::new("Style")))?;
    writer.write_event(Event::Start(BytesStart::new("IconStyle")))?;
    writer.write_event(Event::Start(BytesStart::new("Icon")))?;
    write_text_element(writer, "href", &placemark.icon_href)?;
    writer.write_event(Event::End(BytesEnd::new("Icon")))?;
    writer.write_event(Event::End(BytesEnd::new("IconStyle")))?;
    writer.write_event(Event::End(BytesEnd::new("Style")))?;

    writer.write_event(Event::Start(BytesStart::new("Point")))?;
    write_text_element(writer, "coordinates", &placemark.point.to_string())?;
    writer.write_event(Event::End(BytesEnd::new("Point")))?;

    writer.write_event(Event::End(BytesEnd::new("Placemark")))?;
    Ok(())
}

/// テキストノードは`<`, `>`, `&`のみエスケープする
fn write_text_element<W: Write>(writer: &mut Writer<W>, tag: &str, text: &str) -> Result<()> {
    writer.write_event(Event::Start(BytesStart::new(tag)))?;
    writer.write_event(Event::Text(BytesText::from_escaped(partial_escape(text))))?;
    writer.write_event(Event::End(BytesEnd::new(tag)))?;
    Ok(())
}

/// `&lt;`, `&gt;`, `&amp;`を文字に戻す
///
/// CDATA内に限らずファイル全体に適用されるため、本来エスケープが
/// 必要な値も戻ってしまう点に注意。
pub fn unescape_entities(s: &str) -> String {
    s.replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&amp;", "&")
}
