pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
	/// Transient storage fault; safe to retry with backoff.
	#[error(transparent)]
	Io(#[from] std::io::Error),
	/// Durable storage is unreadable. Fatal: the index must be rebuilt from
	/// the external metadata store.
	#[error("Index storage is corrupted: {message}")]
	Corrupted { message: String },
	/// Writes are refused once corruption has been signalled.
	#[error("Index is halted; writes are refused until the index is rebuilt.")]
	Halted,
}

impl Error {
	pub(crate) fn corrupted(message: impl Into<String>) -> Self {
		Self::Corrupted { message: message.into() }
	}

	pub fn is_fatal(&self) -> bool {
		matches!(self, Self::Corrupted { .. })
	}
}
