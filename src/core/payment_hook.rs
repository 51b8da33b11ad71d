use crate::core::breach_table::BreachTable;
use crate::domain::gateway::{
    environment_snapshot, into_response, GatewayEvent, GatewayRequestExt, InvocationContext,
    ResponseEnvelope,
};
use crate::domain::model::{BreachReport, Order};
use crate::domain::ports::BreachLookup;
use crate::utils::codec::{base64_decode, serialize_pretty};
use crate::utils::error::{HimayaError, Result};
use crate::utils::validation::AccountKind;
use serde::Serialize;
use std::collections::BTreeMap;
use std::sync::Arc;

#[derive(Debug, Serialize)]
pub struct PaymentHookBody {
    pub event: GatewayEvent,
    pub order_data: Order,
    pub report_data: BreachReport,
    pub context_data: InvocationContext,
    pub environment: BTreeMap<String, String>,
}

/// Decodes the order from the `payload` query parameter and reports the
/// breaches each submitted identifier appears in.
pub struct PaymentHookHandler<L: BreachLookup> {
    lookup: L,
    table: Arc<BreachTable>,
}

impl<L: BreachLookup> PaymentHookHandler<L> {
    pub fn new(lookup: L, table: Arc<BreachTable>) -> Self {
        Self { lookup, table }
    }

    pub async fn handle(&self, event: GatewayEvent, context: InvocationContext) -> ResponseEnvelope {
        into_response(self.process(event, context).await)
    }

    async fn process(&self, event: GatewayEvent, context: InvocationContext) -> Result<PaymentHookBody> {
        tracing::info!("Function: Payment Hook");
        event.require_method("GET")?;

        tracing::info!("### EVENT: {}", serialize_pretty(&event)?);
        tracing::info!("### CONTEXT: {}", serialize_pretty(&context)?);

        let order = decode_payload(event.query_param("payload")?)?;
        tracing::info!("### Order Data: {}", serialize_pretty(&order)?);

        let report = self.build_report(&order).await?;

        Ok(PaymentHookBody {
            event,
            order_data: order,
            report_data: report,
            context_data: context,
            environment: environment_snapshot(std::env::vars()),
        })
    }

    /// Every identifier is classified before the first lookup. Lookups then run
    /// one at a time, email addresses first.
    pub async fn build_report(&self, order: &Order) -> Result<BreachReport> {
        let identifiers = order
            .email_addresses
            .iter()
            .chain(&order.phone_numbers)
            .map(|identifier| AccountKind::classify(identifier).map(|kind| (identifier, kind)))
            .collect::<Result<Vec<_>>>()?;

        let mut report = BreachReport::new();
        for (identifier, kind) in identifiers {
            let names = self.lookup.breached_account(identifier).await?;
            tracing::info!(
                "## BREACHES FOR {} ({:?}): {}",
                identifier,
                kind,
                names.len()
            );
            report.insert(identifier.clone(), self.table.enrich(names));
        }

        Ok(report)
    }
}

fn decode_payload(payload: &str) -> Result<Order> {
    let json = base64_decode(payload)?;
    serde_json::from_str(&json)
        .map_err(|e| HimayaError::decode(format!("The payload is not a valid order: {}", e)))
}
