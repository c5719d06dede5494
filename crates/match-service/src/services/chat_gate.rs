//! Per-conversation gate deciding whether the viewer may write to the counterpart.
//!
//! A gate starts in `Unknown`. Opening a conversation moves it to `Checking` and
//! hands out a [`GateTicket`]; resolving the ticket with the match lookup moves it
//! to `Allowed` or `Denied`. Lookup failures deny. Tickets from an earlier `open`
//! are ignored, so a slow lookup for a conversation the viewer already left
//! cannot unlock the current one.

use serde::Serialize;
use tracing::{debug, warn};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::{models::messages::Message, utils::errors::app_error::AppError};

use super::{match_service::MatchService, message_service::MessageService};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum DenyReason {
    /// At least one side has not liked the other.
    NotMatched,
    /// The match lookup failed.
    Unverified,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "snake_case", tag = "state")]
pub enum GateState {
    Unknown,
    Checking,
    Allowed,
    Denied { reason: DenyReason },
}

impl GateState {
    /// Text shown next to a disabled composer.
    pub fn notice(&self) -> Option<&'static str> {
        match self {
            GateState::Denied {
                reason: DenyReason::NotMatched,
            } => Some("You can only send messages once you have both liked each other."),
            GateState::Denied {
                reason: DenyReason::Unverified,
            } => Some("We could not verify your match right now. Please try again later."),
            _ => None,
        }
    }

    fn rejection_warning(&self) -> &'static str {
        match self {
            GateState::Unknown => "Open a conversation before sending a message.",
            GateState::Checking => "Still checking whether you can chat. Please wait a moment.",
            GateState::Denied { .. } => self
                .notice()
                .unwrap_or("You cannot send messages in this conversation."),
            GateState::Allowed => "",
        }
    }
}

/// Identifies one evaluation started by [`ChatGate::open`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GateTicket {
    counterpart: Uuid,
    generation: u64,
}

#[derive(Debug, PartialEq)]
pub enum SubmitOutcome {
    Sent(Message),
    /// Refused locally; nothing was written.
    Rejected { warning: String },
}

#[derive(Debug)]
pub struct ChatGate {
    viewer: Uuid,
    counterpart: Option<Uuid>,
    state: GateState,
    generation: u64,
}

impl ChatGate {
    pub fn new(viewer: Uuid) -> Self {
        Self {
            viewer,
            counterpart: None,
            state: GateState::Unknown,
            generation: 0,
        }
    }

    pub fn viewer(&self) -> Uuid {
        self.viewer
    }

    pub fn counterpart(&self) -> Option<Uuid> {
        self.counterpart
    }

    pub fn state(&self) -> GateState {
        self.state
    }

    /// Starts a fresh evaluation for `counterpart`. Any earlier result, including
    /// one for the same counterpart, is forgotten.
    pub fn open(&mut self, counterpart: Uuid) -> GateTicket {
        self.generation += 1;
        self.counterpart = Some(counterpart);
        self.state = GateState::Checking;
        GateTicket {
            counterpart,
            generation: self.generation,
        }
    }

    /// Leaves the current conversation. Outstanding tickets become stale.
    pub fn close(&mut self) {
        self.generation += 1;
        self.counterpart = None;
        self.state = GateState::Unknown;
    }

    /// Applies a match lookup result. Returns false when the ticket is stale and
    /// the result was dropped.
    pub fn resolve(&mut self, ticket: GateTicket, result: Result<bool, AppError>) -> bool {
        if ticket.generation != self.generation || self.counterpart != Some(ticket.counterpart) {
            debug!(
                "Dropping stale match result for {} -> {}",
                self.viewer, ticket.counterpart
            );
            return false;
        }

        self.state = match result {
            Ok(true) => GateState::Allowed,
            Ok(false) => GateState::Denied {
                reason: DenyReason::NotMatched,
            },
            Err(e) => {
                warn!(
                    "Could not verify match {} -> {}, denying chat: {}",
                    self.viewer, ticket.counterpart, e
                );
                GateState::Denied {
                    reason: DenyReason::Unverified,
                }
            }
        };
        true
    }

    /// Opens `counterpart` and resolves it in one step.
    pub async fn evaluate(&mut self, matches: &MatchService, counterpart: Uuid) -> GateState {
        let ticket = self.open(counterpart);
        let result = matches.is_matched(self.viewer, counterpart).await;
        self.resolve(ticket, result);
        self.state
    }

    /// Sends `body` to the current counterpart when allowed. In any other state
    /// the message is rejected without touching the store.
    pub async fn submit(
        &self,
        messages: &MessageService,
        body: &str,
    ) -> Result<SubmitOutcome, AppError> {
        match (self.state, self.counterpart) {
            (GateState::Allowed, Some(counterpart)) => {
                let message = messages.send(self.viewer, counterpart, body).await?;
                Ok(SubmitOutcome::Sent(message))
            }
            (state, _) => {
                debug!("Rejecting message from {} in state {:?}", self.viewer, state);
                Ok(SubmitOutcome::Rejected {
                    warning: state.rejection_warning().to_string(),
                })
            }
        }
    }
}
