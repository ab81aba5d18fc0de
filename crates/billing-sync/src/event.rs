//! Webhook event parsing.
//!
//! Accepts the provider's envelope `{ "id", "type", "created", "data": { "object" } }`
//! and extracts only what reconciliation needs. Unhandled event types parse
//! successfully as [`EventKind::Other`].

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde_json::Value;
use tracing::warn;

use crate::error::{BillingError, Result};
use crate::ledger::TenantId;
use crate::state::ProviderStatus;

pub const SUBSCRIPTION_CREATED: &str = "customer.subscription.created";
pub const SUBSCRIPTION_UPDATED: &str = "customer.subscription.updated";
pub const INVOICE_PAYMENT_FAILED: &str = "invoice.payment_failed";

#[derive(Debug, Clone, PartialEq)]
pub struct WebhookEvent {
    pub id: String,
    pub created: DateTime<Utc>,
    pub kind: EventKind,
}

#[derive(Debug, Clone, PartialEq)]
pub enum EventKind {
    SubscriptionChanged(SubscriptionPayload),
    /// `None` when the invoice is not tied to a subscription.
    PaymentFailed { subscription_id: Option<String> },
    Other(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct SubscriptionPayload {
    pub external_id: String,
    pub status: ProviderStatus,
    pub current_period_end: Option<DateTime<Utc>>,
    /// From `metadata.tenant_id`; used only when the subscription is new.
    pub tenant_id: Option<TenantId>,
    pub plan_code: Option<String>,
}

#[derive(Deserialize)]
struct RawEvent {
    id: String,
    #[serde(rename = "type")]
    kind: String,
    created: i64,
    data: RawData,
}

#[derive(Deserialize)]
struct RawData {
    object: Value,
}

#[derive(Deserialize)]
struct RawSubscription {
    id: String,
    status: String,
    current_period_end: Option<i64>,
    #[serde(default)]
    metadata: HashMap<String, String>,
}

#[derive(Deserialize)]
struct RawInvoice {
    subscription: Option<Expandable>,
}

/// A reference the provider may send either as a bare id or an expanded object.
#[derive(Deserialize)]
#[serde(untagged)]
enum Expandable {
    Id(String),
    Object { id: String },
}

impl Expandable {
    fn into_id(self) -> String {
        match self {
            Expandable::Id(id) | Expandable::Object { id } => id,
        }
    }
}

impl WebhookEvent {
    pub fn from_json(json: &str) -> Result<Self> {
        Self::from_value(serde_json::from_str(json)?)
    }

    pub fn from_value(value: Value) -> Result<Self> {
        let raw: RawEvent = serde_json::from_value(value)?;
        let created = timestamp("created", raw.created)?;

        let kind = match raw.kind.as_str() {
            SUBSCRIPTION_CREATED | SUBSCRIPTION_UPDATED => {
                let sub: RawSubscription = serde_json::from_value(raw.data.object)?;
                EventKind::SubscriptionChanged(SubscriptionPayload {
                    status: sub.status.parse()?,
                    current_period_end: sub
                        .current_period_end
                        .map(|secs| timestamp("current_period_end", secs))
                        .transpose()?,
                    tenant_id: tenant_from_metadata(&sub.metadata),
                    plan_code: sub
                        .metadata
                        .get("plan_code")
                        .filter(|code| !code.is_empty())
                        .cloned(),
                    external_id: sub.id,
                })
            }
            INVOICE_PAYMENT_FAILED => {
                let invoice: RawInvoice = serde_json::from_value(raw.data.object)?;
                EventKind::PaymentFailed {
                    subscription_id: invoice.subscription.map(Expandable::into_id),
                }
            }
            _ => EventKind::Other(raw.kind),
        };

        Ok(Self {
            id: raw.id,
            created,
            kind,
        })
    }
}

/// Parse a JSON array of webhook envelopes, failing on the first bad one.
pub fn parse_batch(json: &str) -> Result<Vec<WebhookEvent>> {
    let values: Vec<Value> = serde_json::from_str(json)?;
    values.into_iter().map(WebhookEvent::from_value).collect()
}

fn timestamp(field: &'static str, secs: i64) -> Result<DateTime<Utc>> {
    DateTime::from_timestamp(secs, 0).ok_or(BillingError::InvalidTimestamp { field, value: secs })
}

fn tenant_from_metadata(metadata: &HashMap<String, String>) -> Option<TenantId> {
    let raw = metadata.get("tenant_id")?;
    match raw.parse::<u64>() {
        Ok(0) => None,
        Ok(id) => Some(TenantId(id)),
        Err(_) => {
            warn!(tenant_id = %raw, "ignoring non-numeric tenant_id metadata");
            None
        }
    }
}
