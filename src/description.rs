use crate::model::FieldValue;

pub const NULL_VALUE_TEXT: &str = "N/A";

/// 行の全フィールドをHTMLテーブルにしてCDATAで包む
///
/// フィールド名と値は先頭から対応付け、短い方で打ち切る。
/// 値はエスケープしないため、`]]>`を含む値はCDATAを壊す。
pub fn build_description(row: &[FieldValue], field_names: &[String]) -> String {
    let mut rows_html = String::new();
    for (field_name, field_value) in field_names.iter().zip(row) {
        let field_value_str = field_value
            .to_display_string()
            .unwrap_or_else(|| NULL_VALUE_TEXT.to_string());
        rows_html.push_str(&format!(
            "<tr><td>{}</td><td>{}</td></tr>",
            field_name, field_value_str
        ));
    }

    format!(
        "<![CDATA[<html><body><table border=\"1\">\
         <tr><th>Field Name</th><th>Field Value</th></tr>\
         {}</table></body></html>]]>",
        rows_html
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_description_table() {
        let row = vec![
            FieldValue::from("Springfield"),
            FieldValue::from(500),
            FieldValue::from((-89.6, 39.8)),
        ];
        let description = build_description(&row, &names(&["Name", "Pop"]));

        assert!(description.starts_with("<![CDATA["));
        assert!(description.ends_with("]]>"));
        assert!(description.contains("<tr><th>Field Name</th><th>Field Value</th></tr>"));
        assert!(description.contains("<tr><td>Name</td><td>Springfield</td></tr>"));
        assert!(description.contains("<tr><td>Pop</td><td>500</td></tr>"));
        // フィールド名より長い分は出力しない
        assert!(!description.contains("-89.6"));
    }

    #[test]
    fn test_null_value_renders_na() {
        let row = vec![FieldValue::Null, FieldValue::from((1.0, 2.0))];
        let description = build_description(&row, &names(&["Comment", "Shape"]));

        assert!(description.contains("<tr><td>Comment</td><td>N/A</td></tr>"));
        assert!(description.contains("<tr><td>Shape</td><td>(1.0, 2.0)</td></tr>"));
    }

    #[test]
    fn test_values_inserted_verbatim() {
        let row = vec![FieldValue::from("<b>A & B</b>"), FieldValue::from((0.0, 0.0))];
        let description = build_description(&row, &names(&["Label"]));

        assert!(description.contains("<td><b>A & B</b></td>"));
    }

    #[test]
    fn test_empty_row_has_header_only() {
        let description = build_description(&[], &names(&["Name"]));
        assert_eq!(description.matches("<tr>").count(), 1);
    }
}
