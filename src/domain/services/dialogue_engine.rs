use std::sync::Arc;
use tracing::{debug, error, info, warn};

use crate::domain::models::{
    bot::Bot,
    dialogue::{CompletedForm, DialogueSession, LeadDraft, SessionKey, Slot},
    lead::{Lead, NewLeadParams},
};
use crate::domain::ports::{LeadRepository, SessionStore};
use crate::domain::services::notification::LeadNotifier;
use crate::domain::services::time_normalizer::TimeNormalizer;
use crate::domain::services::validators::{normalize_email, valid_email, valid_name, valid_phone};

pub const START_REPLY: &str = "Sure 🙂 May I have your full name?";
pub const CONFIRMATION_REPLY: &str = "✅ Appointment request sent. The clinic will contact you shortly.";

/// One row of the booking form: how a slot is asked, checked, stored and left.
pub struct SlotRule {
    pub slot: Slot,
    pub prompt: &'static str,
    pub reprompt: &'static str,
    pub accepts: fn(&str) -> bool,
    pub store: fn(&mut LeadDraft, &str),
    pub next: Option<Slot>,
}

/// Indexed by `Slot` discriminant.
pub static FLOW: [SlotRule; 4] = [
    SlotRule {
        slot: Slot::Name,
        prompt: START_REPLY,
        reprompt: "Please enter a valid full name (letters only).",
        accepts: valid_name,
        store: store_name,
        next: Some(Slot::Phone),
    },
    SlotRule {
        slot: Slot::Phone,
        prompt: "Thanks! May I have your phone number?",
        reprompt: "Please enter a valid phone number (digits only).",
        accepts: valid_phone,
        store: store_phone,
        next: Some(Slot::Email),
    },
    SlotRule {
        slot: Slot::Email,
        prompt: "What is your email address? (type \"skip\" to leave it out)",
        reprompt: "Please enter a valid email.",
        accepts: accepts_email,
        store: store_email,
        next: Some(Slot::Time),
    },
    SlotRule {
        slot: Slot::Time,
        prompt: "Preferred appointment time? (e.g., 2026-01-27 at 14:30)",
        reprompt: "Please enter a preferred time (e.g., Tomorrow 10 AM).",
        accepts: accepts_time,
        store: store_time,
        next: None,
    },
];

impl SlotRule {
    pub fn for_slot(slot: Slot) -> &'static SlotRule {
        &FLOW[slot as usize]
    }
}

fn accepts_email(text: &str) -> bool {
    valid_email(Some(text))
}

fn accepts_time(text: &str) -> bool {
    text.chars().count() >= 3
}

fn store_name(draft: &mut LeadDraft, text: &str) {
    draft.name = Some(text.to_string());
}

fn store_phone(draft: &mut LeadDraft, text: &str) {
    draft.phone = Some(text.to_string());
}

fn store_email(draft: &mut LeadDraft, text: &str) {
    draft.email = normalize_email(text);
}

fn store_time(draft: &mut LeadDraft, text: &str) {
    draft.preferred_time = Some(text.to_string());
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Transition {
    Reprompt(&'static str),
    Advanced(&'static str),
    Completed(CompletedForm),
}

/// Feeds one trimmed visitor answer into the session.
pub fn apply_answer(session: &mut DialogueSession, text: &str) -> Transition {
    let rule = SlotRule::for_slot(session.slot);
    if !(rule.accepts)(text) {
        return Transition::Reprompt(rule.reprompt);
    }

    (rule.store)(&mut session.draft, text);

    match rule.next {
        Some(next) => {
            session.slot = next;
            Transition::Advanced(SlotRule::for_slot(next).prompt)
        }
        None => match session.draft.complete() {
            Some(form) => Transition::Completed(form),
            None => {
                // earlier slots always fill the draft; start over if they somehow did not
                warn!("Final slot reached with incomplete draft, restarting form");
                session.slot = Slot::Name;
                session.draft = LeadDraft::default();
                Transition::Advanced(SlotRule::for_slot(Slot::Name).prompt)
            }
        },
    }
}

pub struct DialogueEngine {
    sessions: Arc<dyn SessionStore>,
    lead_repo: Arc<dyn LeadRepository>,
    notifier: Arc<LeadNotifier>,
    normalizer: TimeNormalizer,
}

impl DialogueEngine {
    pub fn new(
        sessions: Arc<dyn SessionStore>,
        lead_repo: Arc<dyn LeadRepository>,
        notifier: Arc<LeadNotifier>,
        normalizer: TimeNormalizer,
    ) -> Self {
        Self { sessions, lead_repo, notifier, normalizer }
    }

    pub async fn start(&self, key: &SessionKey) -> String {
        self.sessions.create(key, Slot::Name).await;
        info!(session_key = %key, "Booking dialogue started");
        START_REPLY.to_string()
    }

    /// `None` when no dialogue is active for `key`.
    pub async fn advance(&self, key: &SessionKey, bot: &Bot, text: &str) -> Option<String> {
        let mut outcome = None;
        let live = self.sessions
            .mutate(key, Box::new(|session: &mut DialogueSession| outcome = Some(apply_answer(session, text))))
            .await;
        if !live {
            return None;
        }

        match outcome? {
            Transition::Reprompt(reply) => {
                debug!(session_key = %key, "Answer rejected, re-prompting");
                Some(reply.to_string())
            }
            Transition::Advanced(reply) => Some(reply.to_string()),
            Transition::Completed(form) => {
                // whoever removes the session owns the commit
                if self.sessions.delete(key).await.is_some() {
                    self.commit(bot, form).await;
                } else {
                    debug!(session_key = %key, "Session already committed by a concurrent turn");
                }
                Some(CONFIRMATION_REPLY.to_string())
            }
        }
    }

    async fn commit(&self, bot: &Bot, form: CompletedForm) {
        let preferred_time_at = self.normalizer.normalize(&form.preferred_time);
        if preferred_time_at.is_none() {
            info!(bot_id = %bot.id, "Preferred time is free text, storing without UTC instant");
        }

        let lead = Lead::new(NewLeadParams {
            bot_id: bot.id.clone(),
            name: form.name,
            phone: form.phone,
            email: form.email,
            preferred_time: form.preferred_time,
            preferred_time_at,
        });

        match self.lead_repo.create(&lead).await {
            Ok(saved) => info!(bot_id = %bot.id, lead_id = %saved.id, "Lead captured"),
            Err(e) => error!(bot_id = %bot.id, lead_id = %lead.id, "Failed to persist lead: {:?}", e),
        }

        if let Some(recipient) = bot.notification_email.as_deref()
            && let Err(e) = self.notifier.notify(recipient, &lead).await {
            error!(bot_id = %bot.id, lead_id = %lead.id, "Lead notification failed: {:?}", e);
        }
    }
}
