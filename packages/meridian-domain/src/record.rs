use serde_json::{Map, Value};
use time::{OffsetDateTime, format_description::well_known::Rfc3339};

use crate::{
	MalformedRecordError,
	geo::{BBox, TimeInterval},
};

#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecordKind {
	Data,
	Dataset,
}

impl RecordKind {
	pub fn as_str(&self) -> &'static str {
		match self {
			Self::Data => "data",
			Self::Dataset => "dataset",
		}
	}
}

/// Hierarchical metadata as handed over by the external metadata store.
///
/// The catalog never writes records back; it only reads the sections below at
/// index time. Absent sections are valid, wrongly typed ones are not.
#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
pub struct MetadataRecord(Value);

impl MetadataRecord {
	pub fn new(value: Value) -> Self {
		Self(value)
	}

	pub fn as_value(&self) -> &Value {
		&self.0
	}

	pub fn title(&self) -> Result<Option<&str>, MalformedRecordError> {
		self.optional_str("title")
	}

	pub fn abstract_text(&self) -> Result<Option<&str>, MalformedRecordError> {
		self.optional_str("abstract")
	}

	pub fn identifier(&self) -> Result<Option<&str>, MalformedRecordError> {
		self.optional_str("identifier")
	}

	pub fn status(&self) -> Result<Option<&str>, MalformedRecordError> {
		self.optional_str("status")
	}

	pub fn keywords(&self) -> Result<Vec<&str>, MalformedRecordError> {
		let Some(raw) = self.root()?.get("keywords") else {
			return Ok(Vec::new());
		};
		let list = raw.as_array().ok_or_else(|| {
			MalformedRecordError::new("keywords must be an array of strings.")
		})?;

		list.iter()
			.map(|entry| {
				entry.as_str().ok_or_else(|| {
					MalformedRecordError::new("keywords must be an array of strings.")
				})
			})
			.collect()
	}

	pub fn extent(&self) -> Result<Option<BBox>, MalformedRecordError> {
		let Some(raw) = self.root()?.get("extent") else {
			return Ok(None);
		};
		let obj = raw
			.as_object()
			.ok_or_else(|| MalformedRecordError::new("extent must be an object."))?;
		let bbox = BBox::new(
			section_f64(obj, "extent", "west")?,
			section_f64(obj, "extent", "south")?,
			section_f64(obj, "extent", "east")?,
			section_f64(obj, "extent", "north")?,
		);

		if !bbox.is_valid() {
			return Err(MalformedRecordError::new(
				"extent must satisfy west <= east and south <= north.",
			));
		}

		Ok(Some(bbox))
	}

	pub fn temporal_extent(&self) -> Result<Option<TimeInterval>, MalformedRecordError> {
		let Some(raw) = self.root()?.get("temporal") else {
			return Ok(None);
		};
		let obj = raw
			.as_object()
			.ok_or_else(|| MalformedRecordError::new("temporal must be an object."))?;
		let interval = TimeInterval::new(
			section_datetime(obj, "temporal", "begin")?,
			section_datetime(obj, "temporal", "end")?,
		);

		if !interval.is_valid() {
			return Err(MalformedRecordError::new("temporal must satisfy begin <= end."));
		}

		Ok(Some(interval))
	}

	fn root(&self) -> Result<&Map<String, Value>, MalformedRecordError> {
		self.0
			.as_object()
			.ok_or_else(|| MalformedRecordError::new("record root must be an object."))
	}

	fn optional_str(&self, key: &str) -> Result<Option<&str>, MalformedRecordError> {
		match self.root()?.get(key) {
			None | Some(Value::Null) => Ok(None),
			Some(Value::String(value)) => Ok(Some(value.as_str())),
			Some(_) => Err(MalformedRecordError::new(format!("{key} must be a string."))),
		}
	}
}

fn section_f64(
	obj: &Map<String, Value>,
	section: &str,
	key: &str,
) -> Result<f64, MalformedRecordError> {
	obj.get(key)
		.and_then(Value::as_f64)
		.ok_or_else(|| MalformedRecordError::new(format!("{section}.{key} must be a number.")))
}

fn section_datetime(
	obj: &Map<String, Value>,
	section: &str,
	key: &str,
) -> Result<OffsetDateTime, MalformedRecordError> {
	let raw = obj.get(key).and_then(Value::as_str).ok_or_else(|| {
		MalformedRecordError::new(format!("{section}.{key} must be an RFC3339 string."))
	})?;

	OffsetDateTime::parse(raw, &Rfc3339).map_err(|_| {
		MalformedRecordError::new(format!("{section}.{key} must be an RFC3339 string."))
	})
}
