// self
use crate::{
	_prelude::*,
	auth::Origin,
	error::{FetchError, HeaderError},
	obs::Layer,
};

/// Type alias that resolves to an instrumented future when tracing is enabled.
#[cfg(feature = "tracing")]
pub type InstrumentedLayer<F> = tracing::instrument::Instrumented<F>;
/// Passthrough future type when tracing is disabled.
#[cfg(not(feature = "tracing"))]
pub type InstrumentedLayer<F> = F;

/// A span builder used by the cache and transport.
#[derive(Clone, Debug)]
pub struct LayerSpan {
	#[cfg(feature = "tracing")]
	span: tracing::Span,
}
impl LayerSpan {
	/// Creates a new span tagged with the layer, stage, and origin key.
	pub fn new(layer: Layer, stage: &'static str, origin: &Origin) -> Self {
		#[cfg(feature = "tracing")]
		{
			let span = tracing::info_span!(
				"feign.layer",
				layer = layer.as_str(),
				stage,
				origin = origin.as_str()
			);

			Self { span }
		}
		#[cfg(not(feature = "tracing"))]
		{
			let _ = (layer, stage, origin);

			Self {}
		}
	}

	/// Instruments an async block without holding a guard across `.await` points.
	pub fn instrument<Fut>(&self, fut: Fut) -> InstrumentedLayer<Fut>
	where
		Fut: Future,
	{
		#[cfg(feature = "tracing")]
		{
			use tracing::Instrument;

			fut.instrument(self.span.clone())
		}
		#[cfg(not(feature = "tracing"))]
		{
			fut
		}
	}
}

/// Logs a token source failure. `stale` reports whether a previous token is still being served.
pub fn warn_fetch_failed(origin: &Origin, error: &FetchError, stale: bool) {
	#[cfg(feature = "tracing")]
	{
		tracing::warn!(origin = origin.as_str(), stale, error = %error, "token fetch failed");
	}
	#[cfg(not(feature = "tracing"))]
	{
		let _ = (origin, error, stale);
	}
}

/// Logs a credential that could not be encoded as an `Authorization` header.
pub fn warn_header_rejected(origin: &Origin, error: &HeaderError) {
	#[cfg(feature = "tracing")]
	{
		tracing::warn!(origin = origin.as_str(), error = %error, "bearer header rejected");
	}
	#[cfg(not(feature = "tracing"))]
	{
		let _ = (origin, error);
	}
}
