//! Outbound serialization of store state.
//!
//! # Responsibility
//! - Render the REFI-QDA interchange document.
//! - Provide a serde snapshot for callers that persist sessions themselves.

pub mod refi_qda;
pub mod snapshot;

pub use refi_qda::{to_xml_string, write_refi_qda, ExportError, EXPORT_FILE_NAME};
pub use snapshot::ProjectSnapshot;
