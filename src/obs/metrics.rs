// std
use std::time::Duration;
// self
use crate::obs::{FlowKind, FlowOutcome};

/// Counter incremented for every flow attempt and result.
pub const FLOW_TOTAL: &str = "idp_gateway_flow_total";
/// Histogram of finished flow latencies, in seconds.
pub const FLOW_DURATION_SECONDS: &str = "idp_gateway_flow_duration_seconds";

/// Records a flow outcome via the global metrics recorder (when enabled).
pub fn record_flow_outcome(kind: FlowKind, outcome: FlowOutcome) {
	#[cfg(feature = "metrics")]
	metrics::counter!(FLOW_TOTAL, "flow" => kind.as_str(), "outcome" => outcome.as_str())
		.increment(1);

	#[cfg(not(feature = "metrics"))]
	{
		let _ = (kind, outcome);
	}
}

/// Records how long a finished flow took, labeled by how it ended.
pub fn record_flow_duration(kind: FlowKind, outcome: FlowOutcome, elapsed: Duration) {
	#[cfg(feature = "metrics")]
	metrics::histogram!(
		FLOW_DURATION_SECONDS,
		"flow" => kind.as_str(),
		"outcome" => outcome.as_str()
	)
	.record(elapsed.as_secs_f64());

	#[cfg(not(feature = "metrics"))]
	{
		let _ = (kind, outcome, elapsed);
	}
}
