//! Counter helpers built on the `metrics` facade. With no recorder
//! installed these are no-ops, so call sites never need to branch.

use metrics::counter;

/// Record an authentication attempt with its outcome label.
pub fn record_authentication(outcome: &str) {
    counter!("podsec_authentication_total", "outcome" => outcome.to_string()).increment(1);
}

/// Record a call to the secrets backend.
pub fn record_backend_call(transport: &str, outcome: &str) {
    counter!(
        "podsec_backend_calls_total",
        "transport" => transport.to_string(),
        "outcome" => outcome.to_string()
    )
    .increment(1);
}
