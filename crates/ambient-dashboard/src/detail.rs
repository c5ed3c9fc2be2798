//! System detail panel
//!
//! Owns one system's session state: the live telemetry loop, the
//! maintenance forecast, and the triage checklist. Actions are never
//! performed here; each one is sent upward as a [`PanelIntent`].

use crate::checklist::{Checklist, ChecklistItem};
use crate::live::LiveFeed;
use crate::simulator::MetricSimulator;
use ambient_core::config::TelemetryConfig;
use ambient_core::{Config, HvacSystem, MetricThresholds, SystemId};
use ambient_forecast::{Forecast, ForecastRequest, ForecastResult, ForecastService};
use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use serde::Serialize;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc::UnboundedSender;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

/// Shortest accepted live tick period
const MIN_TICK_INTERVAL: Duration = Duration::from_millis(1);

/// Forecast lifecycle of a panel
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum ForecastState {
    /// No forecast backend configured
    Disabled,
    /// Nothing requested yet
    Idle,
    /// One request in flight
    Loading,
    /// Forecast available
    Ready(Forecast),
    /// Last request failed; nothing is shown
    Unavailable {
        /// Failure description
        reason: String,
    },
}

/// Result of asking for a forecast refresh
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshOutcome {
    /// A new request was issued
    Started,
    /// A request is already pending; nothing was issued
    AlreadyInFlight,
    /// No backend configured
    Disabled,
    /// The panel is unmounted
    NotMounted,
}

/// External field-service platforms
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum FieldService {
    /// Jobber
    Jobber,
    /// `ServiceTitan`
    ServiceTitan,
    /// Housecall Pro
    Housecall,
}

impl FieldService {
    /// Every platform in button order
    pub const ALL: [Self; 3] = [Self::Jobber, Self::ServiceTitan, Self::Housecall];

    /// Platform name
    pub const fn name(self) -> &'static str {
        match self {
            Self::Jobber => "Jobber",
            Self::ServiceTitan => "ServiceTitan",
            Self::Housecall => "Housecall",
        }
    }
}

/// An action the panel can signal
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PanelAction {
    /// Push the system to a field-service platform
    SyncTo(FieldService),
    /// Call the homeowner
    InitiateCall,
    /// Message the homeowner
    SendMessage,
    /// Open the home health certificate
    GenerateReport,
    /// Close the panel
    Close,
}

impl fmt::Display for PanelAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SyncTo(FieldService::Jobber) => write!(f, "Sync to Jobber"),
            Self::SyncTo(service) => write!(f, "Sync {}", service.name()),
            Self::InitiateCall => write!(f, "Call Homeowner"),
            Self::SendMessage => write!(f, "Send Message"),
            Self::GenerateReport => write!(f, "View Home Health Certificate"),
            Self::Close => write!(f, "Close"),
        }
    }
}

/// Intent sent to the owner of the panel
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PanelIntent {
    /// What was asked for
    pub action: PanelAction,
    /// Which system it concerns
    pub system_id: SystemId,
}

/// Mutable session state shared with the live loop and forecast task
#[derive(Debug)]
pub struct PanelState {
    /// Working copy of the system
    pub system: HvacSystem,
    /// Cleared on unmount; nothing may write after that
    pub mounted: bool,
    /// Bumped on every mount so stale tasks can tell they are stale
    pub generation: u64,
    /// Time of the last live tick
    pub last_synced: Option<DateTime<Utc>>,
    /// Live ticks applied since mount
    pub ticks: u64,
    /// Forecast lifecycle
    pub forecast: ForecastState,
    /// Triage checklist
    pub checklist: Checklist,
}

/// Read-only copy of the panel state
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PanelSnapshot {
    /// Working copy of the system
    pub system: HvacSystem,
    /// Whether the panel is mounted
    pub mounted: bool,
    /// Time of the last live tick
    pub last_synced: Option<DateTime<Utc>>,
    /// Live ticks applied since mount
    pub ticks: u64,
    /// Forecast lifecycle
    pub forecast: ForecastState,
    /// Triage checklist
    pub checklist: Checklist,
}

/// Settings a panel is mounted with
#[derive(Clone)]
pub struct PanelOptions {
    /// Live loop settings
    pub telemetry: TelemetryConfig,
    /// Status thresholds
    pub thresholds: MetricThresholds,
    /// Forecast backend, `None` to disable forecasts
    pub forecast: Option<Arc<dyn ForecastService>>,
}

impl fmt::Debug for PanelOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PanelOptions")
            .field("telemetry", &self.telemetry)
            .field("thresholds", &self.thresholds)
            .field("forecast", &self.forecast.as_ref().map(|service| service.name()))
            .finish()
    }
}

impl PanelOptions {
    /// Options from the application configuration
    ///
    /// The forecast backend is built only when forecasts are enabled.
    pub fn from_config(config: &Config) -> ForecastResult<Self> {
        let forecast = if config.forecast.enabled {
            Some(ambient_forecast::build_service(&config.forecast)?)
        } else {
            None
        };
        Ok(Self {
            telemetry: config.telemetry.clone(),
            thresholds: config.thresholds,
            forecast,
        })
    }
}

impl Default for PanelOptions {
    fn default() -> Self {
        Self {
            telemetry: TelemetryConfig::default(),
            thresholds: MetricThresholds::default(),
            forecast: None,
        }
    }
}

/// A mounted detail panel
///
/// Must be created inside a tokio runtime. Dropping the panel unmounts it.
#[derive(Debug)]
pub struct DetailPanel {
    state: Arc<Mutex<PanelState>>,
    options: PanelOptions,
    intents: UnboundedSender<PanelIntent>,
    live: Option<LiveFeed>,
    forecast_task: Option<JoinHandle<()>>,
}

impl DetailPanel {
    /// Mount a panel for `system`
    ///
    /// Starts the live loop and, when a backend is configured, requests a
    /// forecast.
    pub fn mount(
        system: HvacSystem,
        options: PanelOptions,
        intents: UnboundedSender<PanelIntent>,
    ) -> Self {
        let state = PanelState {
            system,
            mounted: false,
            generation: 0,
            last_synced: None,
            ticks: 0,
            forecast: ForecastState::Idle,
            checklist: Checklist::default(),
        };
        let mut panel = Self {
            state: Arc::new(Mutex::new(state)),
            options,
            intents,
            live: None,
            forecast_task: None,
        };
        panel.activate();
        panel
    }

    /// Replace the system shown by this panel
    ///
    /// The previous live loop is stopped before the new one starts, and any
    /// forecast still pending for the previous mount is discarded.
    pub fn remount(&mut self, system: HvacSystem) {
        self.unmount();
        {
            let mut state = self.state.lock();
            state.system = system;
            state.last_synced = None;
            state.ticks = 0;
            state.forecast = ForecastState::Idle;
            state.checklist = Checklist::default();
        }
        self.activate();
    }

    fn activate(&mut self) {
        let system_id = {
            let mut state = self.state.lock();
            state.mounted = true;
            state.generation += 1;
            if self.options.forecast.is_none() {
                state.forecast = ForecastState::Disabled;
            }
            state.system.id.clone()
        };
        info!(system_id = %system_id, "detail panel mounted");

        self.start_live_feed();
        if self.options.forecast.is_some() {
            self.refresh_forecast();
        }
    }

    // Only called right after the generation bump in `activate`, so a tick
    // from a previous loop can never pass the generation check.
    fn start_live_feed(&mut self) {
        if let Some(mut live) = self.live.take() {
            live.stop();
        }
        if !self.is_mounted() {
            return;
        }

        let telemetry = &self.options.telemetry;
        let thresholds = self.options.thresholds.heating_power;
        let simulator = MetricSimulator::from_settings(telemetry, Some(thresholds));
        let period = telemetry.tick_interval().max(MIN_TICK_INTERVAL);
        self.live = Some(LiveFeed::start(Arc::clone(&self.state), simulator, period));
    }

    /// Whether the live loop is running
    pub fn is_live(&self) -> bool {
        self.live.as_ref().is_some_and(LiveFeed::is_running)
    }

    /// Whether a forecast request issued by this mount is still running
    pub fn forecast_pending(&self) -> bool {
        self.forecast_task
            .as_ref()
            .is_some_and(|task| !task.is_finished())
    }

    /// Whether the panel is mounted
    pub fn is_mounted(&self) -> bool {
        self.state.lock().mounted
    }

    /// Id of the system on display
    pub fn system_id(&self) -> SystemId {
        self.state.lock().system.id.clone()
    }

    /// Copy of the current state
    pub fn snapshot(&self) -> PanelSnapshot {
        let state = self.state.lock();
        PanelSnapshot {
            system: state.system.clone(),
            mounted: state.mounted,
            last_synced: state.last_synced,
            ticks: state.ticks,
            forecast: state.forecast.clone(),
            checklist: state.checklist,
        }
    }

    /// Request a forecast unless one is already pending
    ///
    /// Failures are not retried; the state becomes
    /// [`ForecastState::Unavailable`] until the next explicit refresh.
    pub fn refresh_forecast(&mut self) -> RefreshOutcome {
        let Some(service) = self.options.forecast.clone() else {
            return RefreshOutcome::Disabled;
        };

        let (request, generation) = {
            let mut state = self.state.lock();
            if !state.mounted {
                return RefreshOutcome::NotMounted;
            }
            if state.forecast == ForecastState::Loading {
                debug!(system_id = %state.system.id, "forecast already in flight");
                return RefreshOutcome::AlreadyInFlight;
            }
            state.forecast = ForecastState::Loading;
            (ForecastRequest::from_system(&state.system), state.generation)
        };

        let state = Arc::clone(&self.state);
        self.forecast_task = Some(tokio::spawn(async move {
            // a panicking backend surfaces here as a join error
            let call = {
                let service = Arc::clone(&service);
                let request = request.clone();
                tokio::spawn(async move { service.forecast(&request).await })
            };
            let result = match call.await {
                Ok(result) => result.map_err(|e| e.to_string()),
                Err(e) => Err(format!("forecast backend failed: {e}")),
            };

            let mut state = state.lock();
            if !state.mounted || state.generation != generation {
                debug!(
                    system_id = %request.system_id,
                    request_id = %request.id,
                    "discarding forecast for unmounted panel"
                );
                return;
            }
            state.forecast = match result {
                Ok(forecast) => {
                    info!(
                        system_id = %request.system_id,
                        backend = service.name(),
                        "forecast ready"
                    );
                    ForecastState::Ready(forecast)
                }
                Err(reason) => {
                    warn!(
                        system_id = %request.system_id,
                        backend = service.name(),
                        error = %reason,
                        "forecast unavailable"
                    );
                    ForecastState::Unavailable { reason }
                }
            };
        }));

        RefreshOutcome::Started
    }

    /// Flip a checklist item and return its new state
    pub fn toggle_checklist(&self, item: ChecklistItem) -> bool {
        self.state.lock().checklist.toggle(item)
    }

    /// Actions offered for the current state of the system
    ///
    /// Sync buttons when heating power needs attention or any insight
    /// exists, the certificate otherwise. Contact and close are always
    /// offered.
    pub fn available_actions(&self) -> Vec<PanelAction> {
        let state = self.state.lock();
        available_actions(&state.system)
    }

    /// Signal an action upward; returns whether anyone was listening
    pub fn trigger(&self, action: PanelAction) -> bool {
        let intent = PanelIntent {
            action,
            system_id: self.system_id(),
        };
        info!(system_id = %intent.system_id, action = %action, "panel intent");
        if self.intents.send(intent).is_err() {
            warn!(action = %action, "panel intent dropped, no receiver");
            return false;
        }
        true
    }

    /// Stop the live loop and detach any pending forecast; idempotent
    pub fn unmount(&mut self) {
        let was_mounted = {
            let mut state = self.state.lock();
            std::mem::replace(&mut state.mounted, false)
        };
        if let Some(mut live) = self.live.take() {
            live.stop();
        }
        // the request cannot be aborted mid-flight; its result is dropped on arrival
        self.forecast_task = None;
        if was_mounted {
            info!(system_id = %self.system_id(), "detail panel unmounted");
        }
    }
}

impl Drop for DetailPanel {
    fn drop(&mut self) {
        self.unmount();
    }
}

/// Actions offered for `system`
pub fn available_actions(system: &HvacSystem) -> Vec<PanelAction> {
    let needs_sync =
        system.metrics.heating_power.status.needs_attention() || !system.insights.is_empty();

    let mut actions: Vec<PanelAction> = if needs_sync {
        FieldService::ALL.into_iter().map(PanelAction::SyncTo).collect()
    } else {
        vec![PanelAction::GenerateReport]
    };
    actions.extend([
        PanelAction::InitiateCall,
        PanelAction::SendMessage,
        PanelAction::Close,
    ]);
    actions
}
