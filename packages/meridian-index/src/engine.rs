use std::{
	collections::BTreeSet,
	path::{Path, PathBuf},
	sync::{
		Arc, Mutex, RwLock,
		atomic::{AtomicBool, Ordering},
	},
};

use dashmap::{DashMap, mapref::entry::Entry};

use meridian_domain::{IndexedDocument, RecordId, RecordKind};
use meridian_query::Query;

use crate::{
	error::{Error, Result},
	postings::{Candidates, Postings},
	snapshot,
};

#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct DocKey {
	pub id: RecordId,
	pub kind: RecordKind,
}

/// The metadata index: a sharded document table plus per-field posting lists,
/// flushed to a checksummed snapshot on commit.
///
/// Writes to different ids land on different shards and proceed
/// independently; updates to the same id serialize on its shard entry. A
/// search gathers candidates under a short posting-table read lock, releases
/// it, then verifies each candidate against the live document, so readers
/// never hold a lock while a writer needs it.
#[derive(Debug)]
pub struct Index {
	dir: PathBuf,
	docs: DashMap<DocKey, Arc<IndexedDocument>>,
	postings: RwLock<Postings>,
	commit_lock: Mutex<()>,
	dirty: AtomicBool,
	halted: AtomicBool,
}

impl Index {
	/// Opens the index at `dir`, loading the committed snapshot when one
	/// exists. An unreadable snapshot is `Error::Corrupted`; the operator
	/// path forward is [`Index::rebuild`] plus a replay of all records.
	pub fn open(dir: impl Into<PathBuf>) -> Result<Self> {
		let dir = dir.into();

		std::fs::create_dir_all(&dir)?;

		let index = Self {
			dir,
			docs: DashMap::new(),
			postings: RwLock::new(Postings::default()),
			commit_lock: Mutex::new(()),
			dirty: AtomicBool::new(false),
			halted: AtomicBool::new(false),
		};

		if let Some(documents) = snapshot::read(&index.dir)? {
			let mut postings = index.postings_mut();

			for doc in documents {
				let key = DocKey { id: doc.id, kind: doc.kind };
				let doc = Arc::new(doc);

				postings.insert_doc(key, &doc);
				index.docs.insert(key, doc);
			}
		}

		tracing::info!(dir = %index.dir.display(), docs = index.docs.len(), "Opened metadata index.");

		Ok(index)
	}

	/// Discards any durable state at `dir` and opens an empty index. This is
	/// the disaster-recovery entry point; the caller is expected to replay
	/// every record from the external metadata store afterwards.
	pub fn rebuild(dir: impl Into<PathBuf>) -> Result<Self> {
		let dir = dir.into();

		std::fs::create_dir_all(&dir)?;
		snapshot::discard(&dir)?;

		tracing::warn!(dir = %dir.display(), "Discarded index storage for rebuild.");

		Self::open(dir)
	}

	pub fn dir(&self) -> &Path {
		&self.dir
	}

	pub fn len(&self) -> usize {
		self.docs.len()
	}

	pub fn is_empty(&self) -> bool {
		self.docs.is_empty()
	}

	/// Inserts or atomically replaces the document for its `(id, kind)`.
	/// Once this returns, every subsequent search observes the new document
	/// and never the old one.
	pub fn add_or_update(&self, doc: IndexedDocument) -> Result<()> {
		self.ensure_writable()?;

		let key = DocKey { id: doc.id, kind: doc.kind };
		let doc = Arc::new(doc);

		match self.docs.entry(key) {
			Entry::Occupied(mut occupied) => {
				let old = occupied.get().clone();

				{
					let mut postings = self.postings_mut();

					postings.remove_doc(key, &old);
					postings.insert_doc(key, &doc);
				}

				occupied.insert(doc);
			},
			Entry::Vacant(vacant) => {
				self.postings_mut().insert_doc(key, &doc);
				vacant.insert(doc);
			},
		}

		self.dirty.store(true, Ordering::SeqCst);

		Ok(())
	}

	/// Deletes the document; subsequent searches never return it. Removing an
	/// absent document is a no-op, not an error.
	pub fn remove(&self, id: RecordId, kind: RecordKind) -> Result<()> {
		self.ensure_writable()?;

		let key = DocKey { id, kind };

		if let Entry::Occupied(occupied) = self.docs.entry(key) {
			let old = occupied.get().clone();

			self.postings_mut().remove_doc(key, &old);
			occupied.remove();
			self.dirty.store(true, Ordering::SeqCst);
		}

		Ok(())
	}

	pub fn get(&self, id: RecordId, kind: RecordKind) -> Option<Arc<IndexedDocument>> {
		self.docs.get(&DocKey { id, kind }).map(|entry| entry.value().clone())
	}

	pub fn contains(&self, id: RecordId, kind: RecordKind) -> bool {
		self.docs.contains_key(&DocKey { id, kind })
	}

	/// Evaluates the query and returns the matching record ids, deduplicated
	/// and ordered.
	pub fn search(&self, query: &Query) -> BTreeSet<RecordId> {
		self.search_keys(query).into_iter().map(|key| key.id).collect()
	}

	/// Like [`Index::search`] but keeps the `(id, kind)` keys, for callers
	/// that restrict results to one record kind.
	pub fn search_keys(&self, query: &Query) -> BTreeSet<DocKey> {
		let candidates = {
			let postings = self.postings.read().unwrap_or_else(|err| err.into_inner());

			postings.gather(query.expr(), query.default_field())
		};
		let mut out = BTreeSet::new();

		match candidates {
			Candidates::All =>
				for entry in self.docs.iter() {
					if query.matches(entry.value()) {
						out.insert(*entry.key());
					}
				},
			Candidates::Ids(keys) =>
				for key in keys {
					if let Some(doc) = self.docs.get(&key)
						&& query.matches(doc.value())
					{
						out.insert(key);
					}
				},
		}

		out
	}

	/// Durably flushes the current document table. A crash before commit may
	/// lose buffered writes but never corrupts previously committed state.
	/// Concurrent reads are not blocked; concurrent commits serialize.
	pub fn commit(&self) -> Result<()> {
		self.ensure_writable()?;

		let _guard = self.commit_lock.lock().unwrap_or_else(|err| err.into_inner());

		if !self.dirty.swap(false, Ordering::SeqCst) {
			return Ok(());
		}

		let mut entries = self
			.docs
			.iter()
			.map(|entry| (*entry.key(), entry.value().clone()))
			.collect::<Vec<_>>();

		entries.sort_by_key(|(key, _)| *key);

		let documents =
			entries.into_iter().map(|(_, doc)| (*doc).clone()).collect::<Vec<_>>();
		let count = documents.len();

		match snapshot::write(&self.dir, documents) {
			Ok(bytes) => {
				tracing::info!(docs = count, bytes, "Committed metadata index.");

				Ok(())
			},
			Err(err) => {
				// The flush did not happen; keep the pending writes marked.
				self.dirty.store(true, Ordering::SeqCst);

				Err(err)
			},
		}
	}

	/// Drops every document and posting list. Rebuild-only path; callers
	/// quiesce ingestion first. The cleared state becomes durable on the
	/// next commit.
	pub fn clear(&self) -> Result<()> {
		self.ensure_writable()?;
		// Document shards first, postings second: never hold the posting
		// lock while taking shard locks, the writers nest the other way.
		self.docs.clear();
		self.postings_mut().clear();
		self.dirty.store(true, Ordering::SeqCst);

		Ok(())
	}

	/// Refuses all further writes. Called when corruption surfaces so the
	/// condition cannot be papered over by later successful commits.
	pub fn halt(&self) {
		if !self.halted.swap(true, Ordering::SeqCst) {
			tracing::error!(
				dir = %self.dir.display(),
				"Metadata index halted; rebuild from the metadata store is required.",
			);
		}
	}

	pub fn is_halted(&self) -> bool {
		self.halted.load(Ordering::SeqCst)
	}

	fn ensure_writable(&self) -> Result<()> {
		if self.is_halted() {
			return Err(Error::Halted);
		}

		Ok(())
	}

	fn postings_mut(&self) -> std::sync::RwLockWriteGuard<'_, Postings> {
		self.postings.write().unwrap_or_else(|err| err.into_inner())
	}
}
