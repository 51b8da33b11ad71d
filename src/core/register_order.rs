use crate::config::PricingConfig;
use crate::core::notification::send_order_confirmation;
use crate::domain::gateway::{
    environment_snapshot, into_response, GatewayEvent, GatewayRequestExt, InvocationContext,
    ResponseEnvelope,
};
use crate::domain::model::Order;
use crate::domain::ports::{NotificationReceipt, Notifier};
use crate::utils::codec::{base64_encode, serialize_pretty};
use crate::utils::error::{HimayaError, Result};
use crate::utils::validation::{validate_email, validate_phone_number};
use serde::Serialize;
use std::collections::BTreeMap;

#[derive(Debug, Serialize)]
pub struct RegisterOrderBody {
    pub event: GatewayEvent,
    pub data: Order,
    pub base64_encoded_body: String,
    pub email_response: NotificationReceipt,
    pub context_data: InvocationContext,
    pub environment: BTreeMap<String, String>,
}

/// Validates and prices an order, then mails the confirmation to the billing
/// address.
pub struct RegisterOrderHandler<N: Notifier> {
    pricing: PricingConfig,
    notifier: N,
}

impl<N: Notifier> RegisterOrderHandler<N> {
    pub fn new(pricing: PricingConfig, notifier: N) -> Self {
        Self { pricing, notifier }
    }

    pub async fn handle(&self, event: GatewayEvent, context: InvocationContext) -> ResponseEnvelope {
        into_response(self.process(event, context).await)
    }

    async fn process(
        &self,
        event: GatewayEvent,
        context: InvocationContext,
    ) -> Result<RegisterOrderBody> {
        tracing::info!("Function: Register Order");
        event.require_method("POST")?;

        let body = event.require_body()?;
        let order: Order = serde_json::from_str(&body)
            .map_err(|e| HimayaError::decode(format!("The request body is not a valid order: {}", e)))?;

        tracing::info!("### EVENT: {}", serialize_pretty(&event)?);
        tracing::info!("### BODY: {}", serialize_pretty(&order)?);
        tracing::info!("### CONTEXT: {}", serialize_pretty(&context)?);

        let order = self.price(order)?;
        let billing_email = order.billing_email.clone().unwrap_or_default();

        let email_response = send_order_confirmation(&self.notifier, &billing_email, &order).await?;

        Ok(RegisterOrderBody {
            base64_encoded_body: base64_encode(&serde_json::to_string(&order)?),
            event,
            data: order,
            email_response,
            context_data: context,
            environment: environment_snapshot(std::env::vars()),
        })
    }

    /// 驗證訂單內容並計算金額
    pub fn price(&self, mut order: Order) -> Result<Order> {
        let promo_factor = match order.promo_code.as_deref() {
            Some(code) => self
                .pricing
                .promos
                .factor(code)
                .ok_or_else(|| HimayaError::InvalidPromoCode {
                    code: code.to_string(),
                })?,
            None => 1.0,
        };

        match order.billing_email.as_deref() {
            Some(email) if validate_email(email) => {}
            Some(email) => {
                return Err(HimayaError::InvalidEmail {
                    message: format!("The Billing Email address {} is not valid.", email),
                })
            }
            None => {
                return Err(HimayaError::InvalidEmail {
                    message: "The Billing Email address is required.".to_string(),
                })
            }
        }

        if let Some(email) = order.email_addresses.iter().find(|e| !validate_email(e)) {
            tracing::info!("Rejected email address {}", email);
            return Err(HimayaError::InvalidEmail {
                message: format!("The email address provided {} is not valid.", email),
            });
        }

        if let Some(phone) = order.phone_numbers.iter().find(|p| !validate_phone_number(p)) {
            return Err(HimayaError::InvalidPhoneNumber {
                value: phone.clone(),
            });
        }

        let amount = self.pricing.amount(order.identifier_count(), promo_factor);
        tracing::debug!(
            "Priced {} identifiers at factor {}: {}",
            order.identifier_count(),
            promo_factor,
            amount
        );

        order.amount = Some(amount);
        Ok(order)
    }
}
