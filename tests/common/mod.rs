// std
use std::{
	collections::VecDeque,
	sync::{
		Arc, Mutex,
		atomic::{AtomicUsize, Ordering},
	},
};
// crates.io
use time::Duration;
// self
use feign::{
	auth::Origin,
	error::FetchError,
	source::{IssuedToken, TokenSource},
};

/// Outcome replayed by [`scripted`]: `Some((value, seconds))` issues a token, `None` fails.
pub type Step = Option<(&'static str, i64)>;

/// Invocation counter shared with a scripted source.
#[derive(Clone, Debug, Default)]
pub struct Calls(Arc<AtomicUsize>);
impl Calls {
	pub fn get(&self) -> usize {
		self.0.load(Ordering::SeqCst)
	}

	fn bump(&self) {
		self.0.fetch_add(1, Ordering::SeqCst);
	}
}

/// Closure-backed token source replaying `steps` in order; fails once the script runs out.
pub fn scripted(steps: impl IntoIterator<Item = Step>) -> (impl TokenSource + 'static, Calls) {
	let script = Arc::new(Mutex::new(steps.into_iter().collect::<VecDeque<_>>()));
	let calls = Calls::default();
	let counter = calls.clone();
	let source = move |origin: Origin| {
		counter.bump();

		let step = script.lock().expect("Script mutex should not be poisoned.").pop_front();

		async move {
			match step.flatten() {
				Some((value, seconds)) => Ok(IssuedToken::new(value, Duration::seconds(seconds))),
				None => Err(FetchError::message(format!("no token for {origin}"))),
			}
		}
	};

	(source, calls)
}
