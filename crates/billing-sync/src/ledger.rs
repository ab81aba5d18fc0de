//! Subscription ledger: idempotent upsert of provider events into tenant state.
//!
//! Subscriptions are keyed by the provider's external id. Replaying the same
//! event stream, in the same order, always produces the same ledger; an event id
//! that was already applied is reported as a duplicate and changes nothing.

use std::collections::{BTreeMap, HashSet};
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::event::{EventKind, SubscriptionPayload, WebhookEvent};
use crate::state::{BillingStatus, ProviderStatus, Transition};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TenantId(pub u64);

impl fmt::Display for TenantId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Subscription {
    pub external_id: String,
    pub tenant_id: TenantId,
    pub plan_code: Option<String>,
    pub provider_status: ProviderStatus,
    pub current_period_end: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TenantBilling {
    pub tenant_id: TenantId,
    pub plan_code: Option<String>,
    pub status: BillingStatus,
    /// Set when the tenant enters `Blocked`, cleared when it leaves.
    pub blocked_at: Option<DateTime<Utc>>,
}

impl TenantBilling {
    fn transition(&mut self, transition: Transition, at: DateTime<Utc>) {
        let next = self.status.apply(transition);
        self.blocked_at = match (self.status, next) {
            (BillingStatus::Blocked, BillingStatus::Blocked) => self.blocked_at.or(Some(at)),
            (_, BillingStatus::Blocked) => Some(at),
            _ => None,
        };
        self.status = next;
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Applied {
        tenant_id: TenantId,
        status: BillingStatus,
    },
    Duplicate,
    Ignored(IgnoreReason),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IgnoreReason {
    UnhandledType(String),
    /// No existing subscription and no usable `tenant_id` metadata, or the
    /// tenant is not registered.
    UnknownTenant,
    UnknownSubscription,
}

#[derive(Debug, Clone, Default)]
pub struct SubscriptionLedger {
    tenants: BTreeMap<TenantId, TenantBilling>,
    subscriptions: BTreeMap<String, Subscription>,
    processed: HashSet<String>,
}

impl SubscriptionLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a tenant in `Pending`. Re-registering an existing tenant is a no-op.
    pub fn register_tenant(&mut self, tenant_id: TenantId, plan_code: Option<String>) {
        self.tenants.entry(tenant_id).or_insert(TenantBilling {
            tenant_id,
            plan_code,
            status: BillingStatus::Pending,
            blocked_at: None,
        });
    }

    pub fn tenant(&self, tenant_id: TenantId) -> Option<&TenantBilling> {
        self.tenants.get(&tenant_id)
    }

    pub fn tenants(&self) -> impl Iterator<Item = &TenantBilling> {
        self.tenants.values()
    }

    pub fn subscription(&self, external_id: &str) -> Option<&Subscription> {
        self.subscriptions.get(external_id)
    }

    /// Apply one event. Only applied events are remembered as processed, so an
    /// event ignored for an unknown tenant can succeed after registration.
    pub fn apply(&mut self, event: &WebhookEvent) -> Outcome {
        if self.processed.contains(&event.id) {
            debug!(event_id = %event.id, "skipping duplicate webhook event");
            return Outcome::Duplicate;
        }

        let outcome = match &event.kind {
            EventKind::SubscriptionChanged(payload) => {
                self.apply_subscription(payload, event.created)
            }
            EventKind::PaymentFailed {
                subscription_id: Some(subscription_id),
            } => self.apply_payment_failed(subscription_id, event.created),
            EventKind::PaymentFailed {
                subscription_id: None,
            } => Outcome::Ignored(IgnoreReason::UnknownSubscription),
            EventKind::Other(kind) => Outcome::Ignored(IgnoreReason::UnhandledType(kind.clone())),
        };

        match &outcome {
            Outcome::Applied { tenant_id, status } => {
                self.processed.insert(event.id.clone());
                info!(event_id = %event.id, %tenant_id, %status, "applied webhook event");
            }
            Outcome::Ignored(IgnoreReason::UnhandledType(kind)) => {
                debug!(event_id = %event.id, %kind, "ignored unhandled webhook event type");
            }
            Outcome::Ignored(reason) => {
                warn!(event_id = %event.id, ?reason, "ignored webhook event");
            }
            Outcome::Duplicate => {}
        }

        outcome
    }

    fn apply_subscription(&mut self, payload: &SubscriptionPayload, at: DateTime<Utc>) -> Outcome {
        let tenant_id = match self.subscriptions.get(&payload.external_id) {
            Some(existing) => existing.tenant_id,
            None => match payload.tenant_id {
                Some(tenant_id) => tenant_id,
                None => return Outcome::Ignored(IgnoreReason::UnknownTenant),
            },
        };

        let Some(tenant) = self.tenants.get_mut(&tenant_id) else {
            return Outcome::Ignored(IgnoreReason::UnknownTenant);
        };

        let plan_code = payload.plan_code.clone().or_else(|| tenant.plan_code.clone());

        self.subscriptions.insert(
            payload.external_id.clone(),
            Subscription {
                external_id: payload.external_id.clone(),
                tenant_id,
                plan_code: plan_code.clone(),
                provider_status: payload.status,
                current_period_end: payload.current_period_end,
            },
        );

        tenant.plan_code = plan_code;
        tenant.transition(Transition::SubscriptionStatus(payload.status), at);

        Outcome::Applied {
            tenant_id,
            status: tenant.status,
        }
    }

    fn apply_payment_failed(&mut self, subscription_id: &str, at: DateTime<Utc>) -> Outcome {
        let Some(subscription) = self.subscriptions.get(subscription_id) else {
            return Outcome::Ignored(IgnoreReason::UnknownSubscription);
        };
        let tenant_id = subscription.tenant_id;

        let Some(tenant) = self.tenants.get_mut(&tenant_id) else {
            return Outcome::Ignored(IgnoreReason::UnknownTenant);
        };

        tenant.transition(Transition::PaymentFailed, at);

        Outcome::Applied {
            tenant_id,
            status: tenant.status,
        }
    }
}
