//! Optional observability helpers for gateway flows.
//!
//! # Feature Flags
//!
//! - Enable `tracing` (default) to emit structured spans named `idp_gateway.flow` with the
//!   `flow` and `stage` fields, and `warn` events for failed flows.
//! - Enable `metrics` to increment the `idp_gateway_flow_total` counter for every
//!   attempt/success/failure and to record `idp_gateway_flow_duration_seconds`, both labeled by
//!   `flow` + `outcome`.

mod metrics;
mod tracing;

pub use metrics::*;
pub use tracing::*;

// std
use std::time::Instant;
// self
use crate::_prelude::*;

/// Gateway operations observed by the flow helpers.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FlowKind {
	/// Account creation followed by an initial login.
	Register,
	/// Password login plus profile lookup.
	Login,
	/// Refresh token rotation.
	Refresh,
	/// Service-account token acquisition.
	AdminToken,
}
impl FlowKind {
	/// Returns a stable label suitable for span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			FlowKind::Register => "register",
			FlowKind::Login => "login",
			FlowKind::Refresh => "refresh",
			FlowKind::AdminToken => "admin_token",
		}
	}
}
impl Display for FlowKind {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Outcome labels recorded for each attempt.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FlowOutcome {
	/// Entry to a flow.
	Attempt,
	/// Successful completion.
	Success,
	/// Failure propagated back to the caller.
	Failure,
}
impl FlowOutcome {
	/// Returns a stable label suitable for span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			FlowOutcome::Attempt => "attempt",
			FlowOutcome::Success => "success",
			FlowOutcome::Failure => "failure",
		}
	}
}
impl Display for FlowOutcome {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// One flow execution, from its attempt to its outcome.
///
/// [`start`](Self::start) counts the attempt; [`finish`](Self::finish) counts the outcome,
/// records the latency, and logs failures with their source chain.
#[derive(Debug)]
pub struct FlowTimer {
	kind: FlowKind,
	started: Instant,
}
impl FlowTimer {
	/// Records an attempt for `kind` and starts the clock.
	pub fn start(kind: FlowKind) -> Self {
		record_flow_outcome(kind, FlowOutcome::Attempt);

		Self { kind, started: Instant::now() }
	}

	/// Records how the flow ended.
	pub fn finish<T, E>(self, result: &Result<T, E>)
	where
		E: StdError,
	{
		let outcome = if result.is_ok() { FlowOutcome::Success } else { FlowOutcome::Failure };

		record_flow_outcome(self.kind, outcome);
		record_flow_duration(self.kind, outcome, self.started.elapsed());

		if let Err(err) = result {
			trace_flow_failure(self.kind, err);
		}
	}
}
