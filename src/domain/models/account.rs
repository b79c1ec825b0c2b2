use serde::{Deserialize, Serialize};
use uuid::Uuid;
use chrono::{DateTime, Duration, Utc};
use sqlx::FromRow;
use std::fmt;
use std::str::FromStr;

pub const STATUS_ACTIVE: &str = "active";
pub const STATUS_CANCELED: &str = "canceled";

/// Length of a billing cycle opened by a plan change.
pub const BILLING_CYCLE_DAYS: i64 = 30;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Plan {
    Free,
    Starter,
    Pro,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlanLimits {
    pub monthly_limit: i64,
    pub max_bots: i64,
    pub white_label: bool,
}

impl Plan {
    /// Tier granted when the payment provider reports an activated subscription.
    pub const PAID: Plan = Plan::Starter;

    pub fn limits(self) -> PlanLimits {
        match self {
            Plan::Free => PlanLimits { monthly_limit: 30, max_bots: 1, white_label: false },
            Plan::Starter => PlanLimits { monthly_limit: 3000, max_bots: 1, white_label: true },
            Plan::Pro => PlanLimits { monthly_limit: 50000, max_bots: 5, white_label: true },
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Plan::Free => "free",
            Plan::Starter => "starter",
            Plan::Pro => "pro",
        }
    }
}

impl fmt::Display for Plan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownPlan(pub String);

impl fmt::Display for UnknownPlan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown plan '{}'", self.0)
    }
}

impl FromStr for Plan {
    type Err = UnknownPlan;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "free" => Ok(Plan::Free),
            "starter" => Ok(Plan::Starter),
            "pro" => Ok(Plan::Pro),
            other => Err(UnknownPlan(other.to_string())),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, FromRow, Clone)]
pub struct Account {
    pub id: String,
    pub email: String,
    pub plan: String,
    pub monthly_limit: i64,
    pub used_this_cycle: i64,
    pub billing_start_at: DateTime<Utc>,
    pub billing_end_at: DateTime<Utc>,
    pub subscription_status: String,
    pub created_at: DateTime<Utc>,
}

impl Account {
    /// A fresh account on the free tier with a new billing cycle starting now.
    pub fn new(email: String) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4().to_string(),
            email,
            plan: Plan::Free.as_str().to_string(),
            monthly_limit: Plan::Free.limits().monthly_limit,
            used_this_cycle: 0,
            billing_start_at: now,
            billing_end_at: now + Duration::days(BILLING_CYCLE_DAYS),
            subscription_status: STATUS_ACTIVE.to_string(),
            created_at: now,
        }
    }

    pub fn plan(&self) -> Result<Plan, UnknownPlan> {
        self.plan.parse()
    }

    /// Moves the account onto `plan`, resets usage and opens a new cycle at `now`.
    pub fn change_plan(&mut self, plan: Plan, now: DateTime<Utc>) {
        self.plan = plan.as_str().to_string();
        self.monthly_limit = plan.limits().monthly_limit;
        self.used_this_cycle = 0;
        self.billing_start_at = now;
        self.billing_end_at = now + Duration::days(BILLING_CYCLE_DAYS);
    }
}
