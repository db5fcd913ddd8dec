use crate::report::report_model::CheckoutRunReport;

// ============================================================================
// Console reporter: formatted terminal output
// ============================================================================

/// Format a checkout run for terminal output.
///
/// Produces output like:
/// ```text
/// === Checkout ===
///
/// ✓ address   resolved
/// ✗ shipping  rejected
///     Sorry, there seems to be a network error. ...
///
/// Checkout: Q2hlY2tvdXQ6MQ==
/// Navigated: /checkout/shipping
/// ```
pub fn format_console_report(report: &CheckoutRunReport) -> String {
    let mut out = String::from("=== Checkout ===\n\n");

    for step in &report.steps {
        let marker = if step.advanced { "\u{2713}" } else { "\u{2717}" };
        out.push_str(&format!("{} {:<9} {}\n", marker, step.step, step.request_status));
        if let Some(ref message) = step.message {
            out.push_str(&format!("    {}\n", message));
        }
    }

    for message in &report.flash {
        out.push_str(&format!("[notice] {}\n", message));
    }

    out.push('\n');
    if let Some(ref id) = report.checkout_id {
        out.push_str(&format!("Checkout: {}\n", id));
    }
    if !report.navigation.is_empty() {
        out.push_str(&format!("Navigated: {}\n", report.navigation.join(" -> ")));
    }

    out
}
