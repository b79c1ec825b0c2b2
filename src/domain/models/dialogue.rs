use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Pending field of the booking form, in collection order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Slot {
    Name,
    Phone,
    Email,
    Time,
}

/// Identifies one visitor's dialogue with one bot.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SessionKey(String);

impl SessionKey {
    pub fn new(bot_id: &str, visitor_session_id: &str) -> Self {
        SessionKey(format!("{}-{}", bot_id, visitor_session_id))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SessionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LeadDraft {
    pub name: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub preferred_time: Option<String>,
}

/// A fully collected form, ready to become a lead.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompletedForm {
    pub name: String,
    pub phone: String,
    pub email: Option<String>,
    pub preferred_time: String,
}

impl LeadDraft {
    pub fn complete(&self) -> Option<CompletedForm> {
        Some(CompletedForm {
            name: self.name.clone()?,
            phone: self.phone.clone()?,
            email: self.email.clone(),
            preferred_time: self.preferred_time.clone()?,
        })
    }
}

#[derive(Debug, Clone)]
pub struct DialogueSession {
    pub slot: Slot,
    pub draft: LeadDraft,
    pub started_at: DateTime<Utc>,
    pub last_activity_at: DateTime<Utc>,
}

impl DialogueSession {
    pub fn new(slot: Slot, now: DateTime<Utc>) -> Self {
        Self {
            slot,
            draft: LeadDraft::default(),
            started_at: now,
            last_activity_at: now,
        }
    }

    pub fn touch(&mut self, now: DateTime<Utc>) {
        self.last_activity_at = now;
    }

    /// Without a TTL a session never expires.
    pub fn is_expired(&self, now: DateTime<Utc>, ttl: Option<Duration>) -> bool {
        ttl.is_some_and(|ttl| now - self.last_activity_at > ttl)
    }
}
