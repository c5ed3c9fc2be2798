//! Application shell state
//!
//! One state object, changed only through [`AppState::reduce`].

use crate::detail::{PanelAction, PanelIntent};
use ambient_core::SystemId;
use serde::Serialize;
use std::collections::VecDeque;
use tracing::{debug, info};

/// External intents kept for display; older ones are dropped
pub const MAX_INTENTS: usize = 64;

/// Top-level view
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum View {
    /// Main feed
    #[default]
    Dashboard,
    /// Triage queue
    Queue,
    /// Sales pipeline
    Opportunities,
    /// Settings
    Settings,
    /// White-label branding
    Branding,
}

/// Input to the shell
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Message {
    /// Switch the top-level view
    Navigate(View),
    /// A feed card was activated
    OpenSystem(SystemId),
    /// The detail panel was closed
    CloseDetail,
    /// Show the certificate over the detail panel
    GenerateReport,
    /// Close the certificate, leaving the detail panel open
    CloseCertificate,
    /// Intent raised by a detail panel
    Intent(PanelIntent),
}

/// Shell state
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct AppState {
    view: View,
    selected: Option<SystemId>,
    show_certificate: bool,
    #[serde(skip)]
    intents: VecDeque<PanelIntent>,
}

impl AppState {
    /// Start on the dashboard with nothing open
    pub fn new() -> Self {
        Self::default()
    }

    /// Current view
    pub const fn view(&self) -> View {
        self.view
    }

    /// System shown in the detail panel
    pub fn selected(&self) -> Option<&str> {
        self.selected.as_deref()
    }

    /// Whether the certificate is showing
    pub const fn show_certificate(&self) -> bool {
        self.show_certificate
    }

    /// Most recent external intents, oldest first
    pub fn intents(&self) -> impl ExactSizeIterator<Item = &PanelIntent> {
        self.intents.iter()
    }

    /// Take every recorded external intent
    pub fn drain_intents(&mut self) -> Vec<PanelIntent> {
        self.intents.drain(..).collect()
    }

    /// Apply one message
    pub fn reduce(&mut self, message: Message) {
        debug!(?message, "shell message");
        match message {
            Message::Navigate(view) => self.view = view,
            Message::OpenSystem(id) => {
                self.selected = Some(id);
                self.show_certificate = false;
            }
            Message::CloseDetail => {
                self.selected = None;
                self.show_certificate = false;
            }
            Message::GenerateReport => {
                if self.selected.is_some() {
                    self.show_certificate = true;
                }
            }
            Message::CloseCertificate => self.show_certificate = false,
            Message::Intent(intent) => {
                if self.selected.as_deref() != Some(intent.system_id.as_str()) {
                    debug!(
                        system_id = %intent.system_id,
                        action = %intent.action,
                        "dropping intent from a panel that is no longer open"
                    );
                    return;
                }
                match intent.action {
                    PanelAction::GenerateReport => self.reduce(Message::GenerateReport),
                    PanelAction::Close => self.reduce(Message::CloseDetail),
                    PanelAction::SyncTo(_)
                    | PanelAction::InitiateCall
                    | PanelAction::SendMessage => {
                        info!(system_id = %intent.system_id, action = %intent.action, "external intent");
                        if self.intents.len() == MAX_INTENTS {
                            self.intents.pop_front();
                        }
                        self.intents.push_back(intent);
                    }
                }
            }
        }
    }
}
