mod error;

pub use error::{Error, Result};

use std::{
	env, fs,
	path::{Path, PathBuf},
};

use uuid::Uuid;

use meridian_domain::MetadataRecord;

/// A uniquely named scratch directory for index storage, removed on cleanup
/// or drop.
pub struct TestIndexDir {
	path: PathBuf,
	cleaned: bool,
}

impl TestIndexDir {
	pub fn new() -> Result<Self> {
		let path = env::temp_dir().join(format!("meridian_test_{}", Uuid::new_v4().simple()));

		fs::create_dir_all(&path)?;

		Ok(Self { path, cleaned: false })
	}

	pub fn path(&self) -> &Path {
		&self.path
	}

	pub fn cleanup(mut self) -> Result<()> {
		self.cleanup_inner()
	}

	fn cleanup_inner(&mut self) -> Result<()> {
		if self.cleaned {
			return Ok(());
		}

		fs::remove_dir_all(&self.path)
			.map_err(|err| Error::Message(format!("Failed to remove test index dir: {err}.")))?;

		self.cleaned = true;

		Ok(())
	}
}

impl Drop for TestIndexDir {
	fn drop(&mut self) {
		if let Err(err) = self.cleanup_inner() {
			eprintln!("Test index dir cleanup failed: {err}.");
		}
	}
}

pub fn with_test_dir<F, T>(f: F) -> Result<T>
where
	F: FnOnce(&TestIndexDir) -> Result<T>,
{
	let dir = TestIndexDir::new()?;
	let result = f(&dir);
	let mut dir = dir;

	if let Err(err) = dir.cleanup_inner() {
		eprintln!("Test index dir cleanup warning: {err}.");

		if result.is_ok() {
			return Err(err);
		}
	}

	result
}

/// Builder for metadata records in tests. Only the sections that were set end
/// up in the record, matching how sparse real metadata is.
#[derive(Clone, Debug, Default)]
pub struct RecordFixture {
	title: Option<String>,
	abstract_text: Option<String>,
	identifier: Option<String>,
	status: Option<String>,
	keywords: Vec<String>,
	extent: Option<(f64, f64, f64, f64)>,
	temporal: Option<(String, String)>,
}

impl RecordFixture {
	pub fn titled(title: impl Into<String>) -> Self {
		Self { title: Some(title.into()), ..Self::default() }
	}

	pub fn abstract_text(mut self, text: impl Into<String>) -> Self {
		self.abstract_text = Some(text.into());

		self
	}

	pub fn identifier(mut self, identifier: impl Into<String>) -> Self {
		self.identifier = Some(identifier.into());

		self
	}

	pub fn status(mut self, status: impl Into<String>) -> Self {
		self.status = Some(status.into());

		self
	}

	pub fn keyword(mut self, keyword: impl Into<String>) -> Self {
		self.keywords.push(keyword.into());

		self
	}

	pub fn extent(mut self, west: f64, south: f64, east: f64, north: f64) -> Self {
		self.extent = Some((west, south, east, north));

		self
	}

	pub fn temporal(mut self, begin: impl Into<String>, end: impl Into<String>) -> Self {
		self.temporal = Some((begin.into(), end.into()));

		self
	}

	pub fn build(&self) -> MetadataRecord {
		let mut root = serde_json::Map::new();

		if let Some(title) = &self.title {
			root.insert("title".to_string(), serde_json::json!(title));
		}
		if let Some(abstract_text) = &self.abstract_text {
			root.insert("abstract".to_string(), serde_json::json!(abstract_text));
		}
		if let Some(identifier) = &self.identifier {
			root.insert("identifier".to_string(), serde_json::json!(identifier));
		}
		if let Some(status) = &self.status {
			root.insert("status".to_string(), serde_json::json!(status));
		}
		if !self.keywords.is_empty() {
			root.insert("keywords".to_string(), serde_json::json!(self.keywords));
		}
		if let Some((west, south, east, north)) = self.extent {
			root.insert(
				"extent".to_string(),
				serde_json::json!({ "west": west, "south": south, "east": east, "north": north }),
			);
		}
		if let Some((begin, end)) = &self.temporal {
			root.insert("temporal".to_string(), serde_json::json!({ "begin": begin, "end": end }));
		}

		MetadataRecord::new(serde_json::Value::Object(root))
	}
}
