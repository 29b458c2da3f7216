pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum Error {
	/// `position` is the byte offset of the offending token in the raw query.
	#[error("Query syntax error at {position}: {message}")]
	Syntax { position: usize, message: String },
}

impl Error {
	pub(crate) fn syntax(position: usize, message: impl Into<String>) -> Self {
		Self::Syntax { position, message: message.into() }
	}

	pub fn position(&self) -> usize {
		match self {
			Self::Syntax { position, .. } => *position,
		}
	}
}
