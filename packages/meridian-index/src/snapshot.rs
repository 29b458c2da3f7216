use std::{
	fs::{self, File},
	io::{ErrorKind, Write},
	path::Path,
};

use meridian_domain::IndexedDocument;

use crate::error::{Error, Result};

pub(crate) const SNAPSHOT_FILE: &str = "segments.json";
const SNAPSHOT_TMP_FILE: &str = "segments.json.tmp";
const SNAPSHOT_VERSION: u32 = 1;

#[derive(serde::Serialize, serde::Deserialize)]
struct Envelope {
	version: u32,
	/// blake3 of the serialized document list; a mismatch at open means the
	/// durable state cannot be trusted.
	checksum: String,
	documents: Vec<IndexedDocument>,
}

/// Writes the committed snapshot: temp file, fsync, atomic rename, dir fsync.
/// A crash at any point leaves either the old snapshot or the new one, never
/// a torn file.
pub(crate) fn write(dir: &Path, documents: Vec<IndexedDocument>) -> Result<u64> {
	let payload = serde_json::to_string(&documents)
		.map_err(|err| Error::corrupted(format!("failed to serialize documents: {err}")))?;
	let envelope = Envelope {
		version: SNAPSHOT_VERSION,
		checksum: blake3::hash(payload.as_bytes()).to_hex().to_string(),
		documents,
	};
	let bytes = serde_json::to_vec(&envelope)
		.map_err(|err| Error::corrupted(format!("failed to serialize snapshot: {err}")))?;
	let tmp_path = dir.join(SNAPSHOT_TMP_FILE);
	let mut tmp = File::create(&tmp_path)?;

	tmp.write_all(&bytes)?;
	tmp.sync_all()?;

	fs::rename(&tmp_path, dir.join(SNAPSHOT_FILE))?;

	File::open(dir)?.sync_all()?;

	Ok(bytes.len() as u64)
}

/// Reads the snapshot back, verifying the checksum. `Ok(None)` when no
/// snapshot exists yet (fresh index).
pub(crate) fn read(dir: &Path) -> Result<Option<Vec<IndexedDocument>>> {
	let path = dir.join(SNAPSHOT_FILE);
	let raw = match fs::read_to_string(&path) {
		Ok(raw) => raw,
		Err(err) if err.kind() == ErrorKind::NotFound => return Ok(None),
		Err(err) => return Err(err.into()),
	};
	let envelope: Envelope = serde_json::from_str(&raw)
		.map_err(|err| Error::corrupted(format!("snapshot is not readable: {err}")))?;

	if envelope.version != SNAPSHOT_VERSION {
		return Err(Error::corrupted(format!(
			"unsupported snapshot version {} (expected {SNAPSHOT_VERSION})",
			envelope.version,
		)));
	}

	let payload = serde_json::to_string(&envelope.documents)
		.map_err(|err| Error::corrupted(format!("failed to serialize documents: {err}")))?;
	let checksum = blake3::hash(payload.as_bytes()).to_hex().to_string();

	if checksum != envelope.checksum {
		return Err(Error::corrupted("snapshot checksum mismatch"));
	}

	Ok(Some(envelope.documents))
}

/// Discards the durable snapshot. The recovery path after corruption: drop
/// the unreadable state, then replay every record from the metadata store.
pub(crate) fn discard(dir: &Path) -> Result<()> {
	for name in [SNAPSHOT_FILE, SNAPSHOT_TMP_FILE] {
		match fs::remove_file(dir.join(name)) {
			Ok(()) => {},
			Err(err) if err.kind() == ErrorKind::NotFound => {},
			Err(err) => return Err(err.into()),
		}
	}

	Ok(())
}
