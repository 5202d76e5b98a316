//! Payment widget boundary.
//!
//! The widget runs out of process (a script the page loads from the gateway
//! CDN). This module owns the two shapes that cross the boundary: the
//! options object handed to the widget when it opens, and the callback
//! payloads it sends back - a signature triple on success, nothing on
//! dismissal. Keeping the boundary explicit lets tests drive the flow with
//! synthetic events instead of a real widget.

use serde::{Deserialize, Serialize};

use aurum_core::{OrderId, Price};

use crate::checkout::form::CustomerIdentity;

/// Options for opening the payment widget.
///
/// Field names follow the gateway's wire contract; the page passes this
/// object to the widget constructor untouched.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WidgetOptions {
    /// Gateway key id (publishable).
    pub key: String,
    /// Amount in minor units.
    pub amount: Price,
    /// ISO 4217 currency code.
    pub currency: String,
    /// Gateway order id from order creation.
    pub order_id: OrderId,
    /// Identity prefill so the user is not asked twice.
    pub prefill: WidgetPrefill,
}

/// Identity prefill for the widget.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WidgetPrefill {
    pub name: String,
    pub email: String,
    pub contact: String,
}

impl WidgetPrefill {
    /// Build the prefill from a validated customer identity.
    #[must_use]
    pub fn from_identity(identity: &CustomerIdentity) -> Self {
        Self {
            name: identity.name.clone(),
            email: identity.email.as_str().to_owned(),
            contact: identity.phone.as_str().to_owned(),
        }
    }
}

/// Signature triple delivered by the widget's success handler.
///
/// Passed verbatim to the backend's verify endpoint; the client never
/// inspects the signature itself.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentConfirmation {
    pub razorpay_order_id: OrderId,
    pub razorpay_payment_id: String,
    pub razorpay_signature: String,
}

/// What the widget reported back.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WidgetEvent {
    /// The success handler fired with a signature triple.
    Completed(PaymentConfirmation),
    /// The user dismissed the widget; no payload.
    Dismissed,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use aurum_core::{Email, Phone};

    #[test]
    fn test_widget_options_wire_shape() {
        let identity = CustomerIdentity {
            name: "Priya Sharma".to_string(),
            email: Email::parse("priya@example.com").unwrap(),
            phone: Phone::parse("9876543210").unwrap(),
        };
        let options = WidgetOptions {
            key: "rzp_test_k3y".to_string(),
            amount: Price::from_minor_units(299_999),
            currency: "INR".to_string(),
            order_id: OrderId::new("order_9A33XWu170gUtm"),
            prefill: WidgetPrefill::from_identity(&identity),
        };

        let value = serde_json::to_value(&options).unwrap();
        assert_eq!(value["key"], "rzp_test_k3y");
        assert_eq!(value["amount"], 299_999);
        assert_eq!(value["order_id"], "order_9A33XWu170gUtm");
        assert_eq!(value["prefill"]["contact"], "9876543210");
    }

    #[test]
    fn test_confirmation_round_trips_callback_payload() {
        let json = r#"{
            "razorpay_order_id": "order_9A33XWu170gUtm",
            "razorpay_payment_id": "pay_29QQoUBi66xm2f",
            "razorpay_signature": "9ef4dffbfd84f1318f6739a3ce19f9d85851857ae648f114332d8401e0949a3d"
        }"#;
        let confirmation: PaymentConfirmation = serde_json::from_str(json).unwrap();
        assert_eq!(confirmation.razorpay_order_id.as_str(), "order_9A33XWu170gUtm");
    }
}
