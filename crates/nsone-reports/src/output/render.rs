//! Record renderers for the structured formats, and readers for the
//! JSON and CSV renderings.

use maud::{html, Markup, DOCTYPE};
use nsone_core::ActivityRecord;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;
use serde_json::{Map, Value};

use crate::error::{ReportError, Result};

/// Title used in generated documents
pub const REPORT_TITLE: &str = "NS1 Activity Report";

/// Pretty-printed JSON array.
pub fn render_json(records: &[ActivityRecord]) -> Result<String> {
    serde_json::to_string_pretty(records).map_err(|e| ReportError::Format(e.to_string()))
}

/// Read records back from [`render_json`] output.
#[cfg(test)]
pub(crate) fn parse_json(text: &str) -> Result<Vec<ActivityRecord>> {
    serde_json::from_str(text).map_err(|e| ReportError::Format(e.to_string()))
}

/// CSV with a header row.
///
/// Columns are the union of all record keys in first-seen order. A cell of
/// a missing field is empty. Strings are written as they are unless that
/// text would read back as JSON (or is empty), in which case the string is
/// written JSON-quoted. Every other value is written as JSON.
pub fn render_csv(records: &[ActivityRecord]) -> Result<String> {
    let columns = column_names(records);

    let mut writer = csv::Writer::from_writer(Vec::new());
    if !columns.is_empty() {
        writer.write_record(&columns)?;
    }

    for record in records {
        writer.write_record(
            columns
                .iter()
                .map(|column| record.get(column).map(csv_cell).unwrap_or_default()),
        )?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| ReportError::Format(e.to_string()))?;
    String::from_utf8(bytes).map_err(|e| ReportError::Format(e.to_string()))
}

/// Read records back from [`render_csv`] output.
#[cfg(test)]
pub(crate) fn parse_csv(text: &str) -> Result<Vec<ActivityRecord>> {
    let mut reader = csv::Reader::from_reader(text.as_bytes());
    let headers = reader.headers()?.clone();

    let mut records = Vec::new();
    for row in reader.records() {
        let row = row?;
        let fields: Map<String, Value> = headers
            .iter()
            .zip(row.iter())
            .filter(|(_, raw)| !raw.is_empty())
            .map(|(name, raw)| {
                let value = serde_json::from_str(raw)
                    .unwrap_or_else(|_| Value::String(raw.to_string()));
                (name.to_string(), value)
            })
            .collect();
        records.push(ActivityRecord::from(fields));
    }

    Ok(records)
}

/// XML document with one `<record>` element per record.
///
/// Objects become nested elements and arrays become `<item>` children.
pub fn render_xml(records: &[ActivityRecord]) -> Result<String> {
    let mut writer = Writer::new_with_indent(Vec::new(), b' ', 2);

    emit(&mut writer, Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;
    emit(&mut writer, Event::Start(BytesStart::new("activity")))?;
    for record in records {
        emit(&mut writer, Event::Start(BytesStart::new("record")))?;
        for (key, value) in record.fields() {
            write_xml_element(&mut writer, key, value)?;
        }
        emit(&mut writer, Event::End(BytesEnd::new("record")))?;
    }
    emit(&mut writer, Event::End(BytesEnd::new("activity")))?;

    let mut xml = String::from_utf8(writer.into_inner())
        .map_err(|e| ReportError::Format(e.to_string()))?;
    xml.push('\n');
    Ok(xml)
}

/// Standalone HTML page with a table of records.
pub fn render_html(records: &[ActivityRecord]) -> Result<String> {
    let columns = column_names(records);

    let table = html! {
        table {
            thead {
                tr {
                    @for column in &columns {
                        th { (column) }
                    }
                }
            }
            tbody {
                @for record in records {
                    tr {
                        @for column in &columns {
                            td { (record.get(column).map(cell_text).unwrap_or_default()) }
                        }
                    }
                }
            }
        }
    };

    Ok(html_document(REPORT_TITLE, &table).into_string())
}

/// Wrap an HTML fragment in a complete page.
pub fn html_document(title: &str, body: &Markup) -> Markup {
    html! {
        (DOCTYPE)
        html {
            head {
                meta charset="utf-8";
                title { (title) }
            }
            body {
                h1 { (title) }
                (body)
            }
        }
    }
}

fn column_names(records: &[ActivityRecord]) -> Vec<String> {
    let mut columns: Vec<String> = Vec::new();
    for key in records.iter().flat_map(|r| r.fields().keys()) {
        if !columns.contains(key) {
            columns.push(key.clone());
        }
    }
    columns
}

fn cell_text(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn csv_cell(value: &Value) -> String {
    match value {
        Value::String(s) if !s.is_empty() && serde_json::from_str::<Value>(s).is_err() => {
            s.clone()
        }
        other => other.to_string(),
    }
}

fn emit(writer: &mut Writer<Vec<u8>>, event: Event<'_>) -> Result<()> {
    writer
        .write_event(event)
        .map_err(|e| ReportError::Format(format!("XML output failed: {e}")))
}

fn write_xml_element(writer: &mut Writer<Vec<u8>>, name: &str, value: &Value) -> Result<()> {
    if !is_xml_name(name) {
        return Err(ReportError::Format(format!(
            "field {name:?} cannot be used as an XML element name"
        )));
    }

    match value {
        Value::Null => emit(writer, Event::Empty(BytesStart::new(name))),
        Value::Object(map) => {
            emit(writer, Event::Start(BytesStart::new(name)))?;
            for (key, child) in map {
                write_xml_element(writer, key, child)?;
            }
            emit(writer, Event::End(BytesEnd::new(name)))
        }
        Value::Array(items) => {
            emit(writer, Event::Start(BytesStart::new(name)))?;
            for item in items {
                write_xml_element(writer, "item", item)?;
            }
            emit(writer, Event::End(BytesEnd::new(name)))
        }
        scalar => {
            let text = cell_text(scalar);
            emit(writer, Event::Start(BytesStart::new(name)))?;
            emit(writer, Event::Text(BytesText::new(&text)))?;
            emit(writer, Event::End(BytesEnd::new(name)))
        }
    }
}

fn is_xml_name(name: &str) -> bool {
    let mut chars = name.chars();
    chars
        .next()
        .is_some_and(|c| c.is_ascii_alphabetic() || c == '_')
        && chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.'))
}
