//! Tenant billing state machine.
//!
//! ```text
//!            subscription active
//! Pending ───────────────────────► Active
//!    │                               │  ▲
//!    │ past_due / unpaid /           │  │ subscription active
//!    │ payment failed                ▼  │
//!    └─────────────────────────────► Blocked
//! ```
//!
//! Any other provider status leaves the current state untouched.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::BillingError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BillingStatus {
    #[default]
    Pending,
    Active,
    Blocked,
}

/// Subscription status as reported by the billing provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProviderStatus {
    Incomplete,
    IncompleteExpired,
    Trialing,
    Active,
    PastDue,
    Unpaid,
    Canceled,
    Paused,
}

impl FromStr for ProviderStatus {
    type Err = BillingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "incomplete" => Ok(Self::Incomplete),
            "incomplete_expired" => Ok(Self::IncompleteExpired),
            "trialing" => Ok(Self::Trialing),
            "active" => Ok(Self::Active),
            "past_due" => Ok(Self::PastDue),
            "unpaid" => Ok(Self::Unpaid),
            "canceled" => Ok(Self::Canceled),
            "paused" => Ok(Self::Paused),
            other => Err(BillingError::UnknownStatus(other.to_string())),
        }
    }
}

impl fmt::Display for BillingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Pending => "pending",
            Self::Active => "active",
            Self::Blocked => "blocked",
        };
        f.write_str(name)
    }
}

/// An input to the state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    SubscriptionStatus(ProviderStatus),
    PaymentFailed,
}

impl BillingStatus {
    /// Next state after `transition`. Pure and total.
    pub fn apply(self, transition: Transition) -> BillingStatus {
        match transition {
            Transition::SubscriptionStatus(ProviderStatus::Active) => BillingStatus::Active,
            Transition::SubscriptionStatus(ProviderStatus::PastDue | ProviderStatus::Unpaid) => {
                BillingStatus::Blocked
            }
            Transition::SubscriptionStatus(_) => self,
            Transition::PaymentFailed => BillingStatus::Blocked,
        }
    }
}
