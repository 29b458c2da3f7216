use std::{
	collections::BTreeMap,
	sync::{Arc, RwLock},
};

use crate::{
	error::{Error, Result},
	module::{ServiceModule, Specification},
};

enum State {
	/// No modules known yet; discovery is staging registrations.
	Uninitialized { staged: BTreeMap<String, Arc<ServiceModule>> },
	/// The published table. Late registrations copy the map and swap the
	/// `Arc`, so in-flight lookups never observe a half-updated table.
	Ready { modules: Arc<BTreeMap<String, Arc<ServiceModule>>> },
}

/// The process-wide protocol module table. Created once at startup, filled by
/// the discovery step, then transitioned to ready exactly once.
pub struct ModuleRegistry {
	state: RwLock<State>,
}

impl ModuleRegistry {
	pub fn new() -> Self {
		Self { state: RwLock::new(State::Uninitialized { staged: BTreeMap::new() }) }
	}

	/// Registers a module under its name. Registering a name twice replaces
	/// the prior binding; discovery may legitimately race, so duplicates are
	/// logged rather than rejected.
	pub fn register(&self, module: ServiceModule) {
		let name = module.name.clone();
		let module = Arc::new(module);
		let mut state = self.write();

		match &mut *state {
			State::Uninitialized { staged } =>
				if staged.insert(name.clone(), module).is_some() {
					tracing::warn!(module = %name, "Replacing duplicate module registration.");
				},
			State::Ready { modules } => {
				let mut next = (**modules).clone();

				if next.insert(name.clone(), module).is_some() {
					tracing::warn!(module = %name, "Replacing duplicate module registration.");
				}

				*modules = Arc::new(next);
			},
		}
	}

	/// The one-time startup transition. Discovery must be finished; calling
	/// this twice is an error so a doubled startup path cannot hide.
	pub fn mark_ready(&self) -> Result<()> {
		let mut state = self.write();

		match &mut *state {
			State::Uninitialized { staged } => {
				let modules = Arc::new(std::mem::take(staged));

				tracing::info!(modules = modules.len(), "Module registry ready.");

				*state = State::Ready { modules };

				Ok(())
			},
			State::Ready { .. } => Err(Error::AlreadyReady),
		}
	}

	pub fn is_ready(&self) -> bool {
		matches!(&*self.read(), State::Ready { .. })
	}

	/// Looks a module up by protocol specification. `None` is the normal
	/// outcome for an unsupported protocol; callers treat it as a client
	/// error.
	pub fn resolve(&self, specification: &Specification) -> Option<Arc<ServiceModule>> {
		let modules = self.snapshot()?;

		modules.values().find(|module| module.specification == *specification).cloned()
	}

	/// All registered modules ordered by name, independent of discovery
	/// order.
	pub fn list(&self) -> Vec<(String, Arc<ServiceModule>)> {
		match self.snapshot() {
			None => Vec::new(),
			Some(modules) =>
				modules.iter().map(|(name, module)| (name.clone(), module.clone())).collect(),
		}
	}

	pub fn len(&self) -> usize {
		self.snapshot().map(|modules| modules.len()).unwrap_or(0)
	}

	pub fn is_empty(&self) -> bool {
		self.len() == 0
	}

	fn snapshot(&self) -> Option<Arc<BTreeMap<String, Arc<ServiceModule>>>> {
		match &*self.read() {
			State::Uninitialized { .. } => None,
			State::Ready { modules } => Some(modules.clone()),
		}
	}

	fn read(&self) -> std::sync::RwLockReadGuard<'_, State> {
		self.state.read().unwrap_or_else(|err| err.into_inner())
	}

	fn write(&self) -> std::sync::RwLockWriteGuard<'_, State> {
		self.state.write().unwrap_or_else(|err| err.into_inner())
	}
}

impl Default for ModuleRegistry {
	fn default() -> Self {
		Self::new()
	}
}
