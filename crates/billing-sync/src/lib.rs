//! # billing-sync
//!
//! Reconciles billing-provider subscription webhooks into per-tenant billing
//! state. Independent of the slot engine.
//!
//! ```rust
//! use billing_sync::{BillingStatus, SubscriptionLedger, TenantId, WebhookEvent};
//!
//! let mut ledger = SubscriptionLedger::new();
//! ledger.register_tenant(TenantId(1), None);
//!
//! let event = WebhookEvent::from_json(r#"{
//!     "id": "evt_1",
//!     "type": "customer.subscription.updated",
//!     "created": 1772409600,
//!     "data": { "object": {
//!         "id": "sub_1",
//!         "status": "active",
//!         "metadata": { "tenant_id": "1", "plan_code": "pro" }
//!     } }
//! }"#).unwrap();
//!
//! ledger.apply(&event);
//! assert_eq!(ledger.tenant(TenantId(1)).unwrap().status, BillingStatus::Active);
//! ```
//!
//! ## Modules
//!
//! - [`event`] — webhook envelope parsing
//! - [`state`] — `{pending, active, blocked}` transition rules
//! - [`ledger`] — idempotent subscription upsert keyed by external id
//! - [`error`] — error types

pub mod error;
pub mod event;
pub mod ledger;
pub mod state;

pub use error::BillingError;
pub use event::{parse_batch, EventKind, SubscriptionPayload, WebhookEvent};
pub use ledger::{
    IgnoreReason, Outcome, Subscription, SubscriptionLedger, TenantBilling, TenantId,
};
pub use state::{BillingStatus, ProviderStatus, Transition};
