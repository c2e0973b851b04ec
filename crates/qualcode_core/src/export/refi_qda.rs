//! REFI-QDA-style XML export.
//!
//! # Responsibility
//! - Serialize codes, memos and assignments into one `<Project>` document.
//!
//! # Invariants
//! - Output is UTF-8 and starts with an XML declaration.
//! - Attribute values and text content are escaped (`& < > " '`).
//! - Every element is written with an explicit end tag.
//! - `<Coding>` order: code registry order, then row order; assignments of
//!   codes missing from the registry follow in code id order.

use crate::assignments::AssignmentTable;
use crate::model::{Code, CodeId, Memo, RowId};
use chrono::SecondsFormat;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::io::Write;

/// Download name offered to the user.
pub const EXPORT_FILE_NAME: &str = "coding.refi-qda.xml";

#[derive(Debug)]
pub enum ExportError {
    /// The underlying writer failed.
    Io(std::io::Error),
    /// Written bytes were not valid UTF-8.
    Utf8(std::string::FromUtf8Error),
}

impl Display for ExportError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io(err) => write!(f, "failed to write REFI-QDA export: {err}"),
            Self::Utf8(err) => write!(f, "REFI-QDA export is not UTF-8: {err}"),
        }
    }
}

impl Error for ExportError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io(err) => Some(err),
            Self::Utf8(err) => Some(err),
        }
    }
}

impl From<std::io::Error> for ExportError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<std::string::FromUtf8Error> for ExportError {
    fn from(value: std::string::FromUtf8Error) -> Self {
        Self::Utf8(value)
    }
}

/// Writes the project document into `sink` and returns it.
pub fn write_refi_qda<W: Write>(
    sink: W,
    codes: &[Code],
    memos: &[Memo],
    assignments: &AssignmentTable,
) -> Result<W, ExportError> {
    let mut writer = Writer::new(sink);
    writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;
    writer.write_event(Event::Start(BytesStart::new("Project")))?;

    for code in codes {
        let level = code.level.to_string();
        let mut element = BytesStart::new("Code");
        element.push_attribute(("id", code.id.as_str()));
        element.push_attribute(("name", code.name.as_str()));
        element.push_attribute(("color", code.color.as_str()));
        element.push_attribute(("level", level.as_str()));
        element.push_attribute(("parentId", code.parent_id.as_deref().unwrap_or("")));
        write_childless(&mut writer, element, "Code")?;
    }

    for memo in memos {
        let created_at = memo.created_at.to_rfc3339_opts(SecondsFormat::Millis, true);
        let mut element = BytesStart::new("Memo");
        element.push_attribute(("id", memo.id.as_str()));
        element.push_attribute(("type", memo.memo_type.as_str()));
        element.push_attribute(("createdAt", created_at.as_str()));
        writer.write_event(Event::Start(element))?;
        writer.write_event(Event::Text(BytesText::new(&memo.content)))?;
        writer.write_event(Event::End(BytesEnd::new("Memo")))?;
    }

    for (code_id, row) in coding_pairs(codes, assignments) {
        let data_point_id = row.to_string();
        let mut element = BytesStart::new("Coding");
        element.push_attribute(("codeId", code_id.as_str()));
        element.push_attribute(("dataPointId", data_point_id.as_str()));
        write_childless(&mut writer, element, "Coding")?;
    }

    writer.write_event(Event::End(BytesEnd::new("Project")))?;
    Ok(writer.into_inner())
}

/// Renders the project document as a UTF-8 string.
pub fn to_xml_string(
    codes: &[Code],
    memos: &[Memo],
    assignments: &AssignmentTable,
) -> Result<String, ExportError> {
    let bytes = write_refi_qda(Vec::new(), codes, memos, assignments)?;
    Ok(String::from_utf8(bytes)?)
}

fn write_childless<W: Write>(
    writer: &mut Writer<W>,
    element: BytesStart<'_>,
    name: &str,
) -> Result<(), ExportError> {
    writer.write_event(Event::Start(element))?;
    writer.write_event(Event::End(BytesEnd::new(name)))?;
    Ok(())
}

fn coding_pairs<'a>(
    codes: &'a [Code],
    assignments: &'a AssignmentTable,
) -> Vec<(&'a CodeId, &'a RowId)> {
    let mut pairs = Vec::with_capacity(assignments.total());
    for code in codes {
        if let Some(rows) = assignments.rows_for(&code.id) {
            pairs.extend(rows.iter().map(|row| (&code.id, row)));
        }
    }
    // Why: the table may outlive a registry snapshot handed in by a caller;
    // rows of unregistered codes are still exported, after the known ones.
    for (code_id, rows) in assignments.iter() {
        if codes.iter().any(|code| &code.id == code_id) {
            continue;
        }
        pairs.extend(rows.iter().map(|row| (code_id, row)));
    }
    pairs
}
