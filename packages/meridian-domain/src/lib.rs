mod document;
mod geo;
mod normalize;
mod record;
mod text;

pub mod time_serde;

pub use document::{
	FIELD_ABSTRACT, FIELD_ANY, FIELD_EXTENT, FIELD_IDENTIFIER, FIELD_KEYWORD, FIELD_STATUS,
	FIELD_TEMPORAL, FIELD_TITLE, FieldValue, IndexedDocument,
};
pub use geo::{BBox, TimeInterval};
pub use normalize::normalize;
pub use record::{MetadataRecord, RecordKind};
pub use text::{normalize_token, tokenize};

pub type RecordId = i64;

#[derive(Debug, thiserror::Error)]
#[error("Malformed metadata record: {message}")]
pub struct MalformedRecordError {
	pub message: String,
}

impl MalformedRecordError {
	pub(crate) fn new(message: impl Into<String>) -> Self {
		Self { message: message.into() }
	}
}
