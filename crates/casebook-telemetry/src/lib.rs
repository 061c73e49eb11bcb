//! Process-wide tracing setup and the Prometheus counters case-core exports.

use once_cell::sync::Lazy;
use prometheus::{CounterVec, Encoder, Opts, Registry, TextEncoder};
use tracing_subscriber::{fmt, EnvFilter};

static REGISTRY: Lazy<Registry> = Lazy::new(Registry::new);

fn counter(name: &str, help: &str, labels: &[&str]) -> CounterVec {
    // Names and labels are literals below; a failure here is a programming error.
    let cv = CounterVec::new(Opts::new(name, help), labels).expect("valid counter definition");
    REGISTRY.register(Box::new(cv.clone())).ok();
    cv
}

static API_REQUESTS: Lazy<CounterVec> =
    Lazy::new(|| counter("casebook_api_requests_total", "API requests total", &["path"]));
static CASE_MUTATIONS: Lazy<CounterVec> =
    Lazy::new(|| counter("casebook_case_mutations_total", "Case mutations by kind", &["kind"]));
static ASSISTANT_OPERATIONS: Lazy<CounterVec> = Lazy::new(|| {
    counter("casebook_assistant_operations_total", "Assistant operation invocations by outcome", &["operation", "outcome"])
});
static GATEWAY_CALLS: Lazy<CounterVec> =
    Lazy::new(|| counter("casebook_gateway_calls_total", "Completion backend calls by purpose and outcome", &["purpose", "outcome"]));

pub fn init() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let fmt = fmt().with_env_filter(filter).with_target(false);
    // JSON logs if CASEBOOK_LOG_JSON=1
    if std::env::var("CASEBOOK_LOG_JSON").ok().as_deref() == Some("1") {
        fmt.json().init();
    } else {
        fmt.init();
    }
}

pub fn inc_api_request(path: &str) { API_REQUESTS.with_label_values(&[path]).inc(); }
pub fn inc_case_mutation(kind: &str) { CASE_MUTATIONS.with_label_values(&[kind]).inc(); }

/// `outcome` is `ok` or `rejected`.
pub fn inc_assistant_operation(operation: &str, ok: bool) {
    ASSISTANT_OPERATIONS.with_label_values(&[operation, if ok { "ok" } else { "rejected" }]).inc();
}

/// `purpose` is `forward`, `chat` or `suggest`; `outcome` is the HTTP status or `transport_error`.
pub fn inc_gateway_call(purpose: &str, outcome: &str) { GATEWAY_CALLS.with_label_values(&[purpose, outcome]).inc(); }

pub fn gather_prometheus() -> String {
    let metric_families = REGISTRY.gather();
    let mut buffer = Vec::new();
    let encoder = TextEncoder::new();
    encoder.encode(&metric_families, &mut buffer).ok();
    String::from_utf8(buffer).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counters_render_in_text_format() {
        inc_api_request("/health");
        inc_case_mutation("field_edit");
        inc_assistant_operation("updateCase", true);
        inc_assistant_operation("closeCase", false);
        inc_gateway_call("suggest", "200");
        let out = gather_prometheus();
        assert!(out.contains("casebook_api_requests_total{path=\"/health\"}"));
        assert!(out.contains("casebook_case_mutations_total{kind=\"field_edit\"}"));
        assert!(out.contains("casebook_assistant_operations_total{operation=\"updateCase\",outcome=\"ok\"}"));
        assert!(out.contains("casebook_assistant_operations_total{operation=\"closeCase\",outcome=\"rejected\"}"));
        assert!(out.contains("casebook_gateway_calls_total{outcome=\"200\",purpose=\"suggest\"}"));
    }
}
