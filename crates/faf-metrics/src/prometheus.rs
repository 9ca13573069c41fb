//! Prometheus text exposition format.

use crate::collector::EndpointSnapshot;

/// Render endpoint snapshots into Prometheus text format.
///
/// All series are COUNTERs labelled by `endpoint`.
pub fn render_prometheus(snapshots: &[EndpointSnapshot]) -> String {
    let mut out = String::new();

    let series: [(&str, &str, fn(&EndpointSnapshot) -> u64); 5] = [
        ("faf_requests_total", "Transform requests received.", |s| s.requests),
        ("faf_client_errors_total", "Requests rejected as invalid.", |s| s.client_errors),
        ("faf_server_errors_total", "Requests that failed internally.", |s| s.server_errors),
        ("faf_elements_total", "Array elements transformed.", |s| s.elements),
        ("faf_latency_microseconds_total", "Cumulative request latency in microseconds.", |s| {
            s.latency_us_sum
        }),
    ];

    for (name, help, value) in series {
        out.push_str(&format!("# HELP {name} {help}\n"));
        out.push_str(&format!("# TYPE {name} counter\n"));
        for s in snapshots {
            out.push_str(&format!(
                "{name}{{endpoint=\"{}\"}} {}\n",
                s.endpoint,
                value(s)
            ));
        }
    }

    out
}
