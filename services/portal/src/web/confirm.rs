//! services/portal/src/web/confirm.rs
//!
//! The payment-confirmation redirect flow. Landing on the confirmation route
//! resolves the gateway's query parameters into a redirect target, which the
//! connection handler sends after a short delay so it cannot race the
//! navigation commit itself.

use std::collections::BTreeMap;
use std::time::Duration;

/// The route the payment gateway returns the browser to.
pub const CONFIRMATION_PATH: &str = "/confirmacion-pago";

/// Delay before the redirect is pushed, to avoid a double-navigation race
/// with the commit that landed on the confirmation route.
pub const REDIRECT_DELAY: Duration = Duration::from_millis(400);

/// Resolves the confirmation query into a redirect target. A gateway error
/// returns the user to checkout with the error attached; a completed order
/// moves on to the success page. Neither parameter means nothing to do.
pub fn resolve_redirect(query: &BTreeMap<String, String>) -> Option<String> {
    if let Some(error) = query.get("error").filter(|v| !v.trim().is_empty()) {
        return Some(format!("/checkout?error={}", error));
    }
    if let Some(order_id) = query.get("order_id").filter(|v| !v.trim().is_empty()) {
        return Some(format!("/pago-exitoso?order={}", order_id));
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    fn query(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn gateway_errors_return_to_checkout() {
        let target = resolve_redirect(&query(&[("error", "rejected"), ("order_id", "42")]));
        assert_eq!(target.as_deref(), Some("/checkout?error=rejected"));
    }

    #[test]
    fn completed_orders_move_to_the_success_page() {
        let target = resolve_redirect(&query(&[("order_id", "42")]));
        assert_eq!(target.as_deref(), Some("/pago-exitoso?order=42"));
    }

    #[test]
    fn blank_parameters_are_ignored() {
        assert!(resolve_redirect(&query(&[("error", " "), ("order_id", "")])).is_none());
        assert!(resolve_redirect(&query(&[])).is_none());
    }
}
