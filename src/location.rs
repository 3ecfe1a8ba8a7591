// ── Location tracking ─────────────────────────────────────────────────────────
//
// A small state machine over a host-provided position source.  The tracker
// starts the source on demand, hands every accepted fix to an observer, and
// shuts the hardware back down once a fix is good enough — position is a
// set-once input for the embedding application, not a stream it wants to
// keep paying for.

use std::time::{Duration, SystemTime};

use log::{debug, info, warn};

/// A fix at least this accurate can end the search.
pub const ACCURACY_GOAL_M: f64 = 500.0;

/// A cached fix older than this is treated as stale and never ends the
/// search on its own.
pub const MAX_FIX_AGE: Duration = Duration::from_secs(60 * 60);

// ── State ─────────────────────────────────────────────────────────────────────

/// Tracker lifecycle.  `Unsupported` is sticky: once the host has no usable
/// position source, enable requests become no-ops.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LocationState {
    #[default]
    Disabled,
    Searching,
    Found,
    Unsupported,
}

impl LocationState {
    pub fn as_str(&self) -> &'static str {
        match self {
            LocationState::Disabled => "disabled",
            LocationState::Searching => "searching",
            LocationState::Found => "found",
            LocationState::Unsupported => "unsupported",
        }
    }
}

// ── Fix ───────────────────────────────────────────────────────────────────────

/// One position report from the source.
#[derive(Debug, Clone, PartialEq)]
pub struct LocationFix {
    pub latitude_deg: f64,
    pub longitude_deg: f64,
    /// Meters above sea level.  Sources that cannot measure altitude
    /// report 0 here; see [`LocationFix::new`].
    pub altitude_m: f64,
    /// Horizontal accuracy radius in meters, when the source knows it.
    pub horizontal_accuracy_m: Option<f64>,
    /// When the fix was taken, when the source knows it.
    pub timestamp: Option<SystemTime>,
}

impl LocationFix {
    /// Build a fix from raw coordinates.  A non-finite altitude (sources
    /// without an altimeter report NaN) is flattened to sea level.
    pub fn new(latitude_deg: f64, longitude_deg: f64, altitude_m: f64) -> Self {
        Self {
            latitude_deg,
            longitude_deg,
            altitude_m: if altitude_m.is_finite() { altitude_m } else { 0.0 },
            horizontal_accuracy_m: None,
            timestamp: None,
        }
    }

    pub fn with_accuracy(mut self, accuracy_m: f64) -> Self {
        self.horizontal_accuracy_m = Some(accuracy_m);
        self
    }

    pub fn with_timestamp(mut self, timestamp: SystemTime) -> Self {
        self.timestamp = Some(timestamp);
        self
    }

    /// Whether this fix is good enough to end the search: a known accuracy
    /// under [`ACCURACY_GOAL_M`] and a timestamp no older than
    /// [`MAX_FIX_AGE`].  A fix with no timestamp or no accuracy never
    /// settles; a timestamp from the future counts as fresh.
    fn is_settled_at(&self, now: SystemTime) -> bool {
        let Some(timestamp) = self.timestamp else {
            return false;
        };
        let fresh = now
            .duration_since(timestamp)
            .map(|age| age < MAX_FIX_AGE)
            .unwrap_or(true);
        fresh && self.horizontal_accuracy_m.is_some_and(|acc| acc < ACCURACY_GOAL_M)
    }
}

// ── Source ────────────────────────────────────────────────────────────────────

/// Host-side position hardware.  Implementations push fixes into
/// [`LocationTracker::submit`] while started.
pub trait LocationSource {
    fn start_updates(&mut self);
    fn stop_updates(&mut self);

    /// The most recent fix the source already holds, if any.  Replayed
    /// into the tracker on enable so a cached position shows up without
    /// waiting for fresh hardware output.
    fn last_known_position(&self) -> Option<LocationFix> {
        None
    }
}

// ── Tracker ───────────────────────────────────────────────────────────────────

/// Drives a [`LocationSource`] and publishes the latest accepted fix.
///
/// Enabled means actively searching or already settled on a fix.  Once a
/// fix passes the accuracy goal the tracker stops the source and parks in
/// `Found`; disabling and re-enabling starts a fresh search.
pub struct LocationTracker {
    state: LocationState,
    source: Option<Box<dyn LocationSource>>,
    observer: Option<Box<dyn FnMut(&LocationFix)>>,
    last_fix: Option<LocationFix>,
}

impl LocationTracker {
    /// `None` means the host has no position hardware at all; the tracker
    /// then flips to `Unsupported` on the first enable attempt.
    pub fn new(source: Option<Box<dyn LocationSource>>) -> Self {
        Self {
            state: LocationState::default(),
            source,
            observer: None,
            last_fix: None,
        }
    }

    pub fn state(&self) -> LocationState {
        self.state
    }

    pub fn is_enabled(&self) -> bool {
        matches!(self.state, LocationState::Searching | LocationState::Found)
    }

    pub fn is_supported(&self) -> bool {
        self.source.is_some() && self.state != LocationState::Unsupported
    }

    /// Latest accepted fix, surviving disable.
    pub fn last_fix(&self) -> Option<&LocationFix> {
        self.last_fix.as_ref()
    }

    /// Register the callback that receives every accepted fix.  Replaces
    /// any previous observer.
    pub fn set_observer(&mut self, observer: impl FnMut(&LocationFix) + 'static) {
        self.observer = Some(Box::new(observer));
    }

    /// Start or stop the search.  No-op when already in the requested
    /// enablement or when the tracker is `Unsupported`.
    pub fn set_enabled(&mut self, value: bool) {
        if self.state == LocationState::Unsupported {
            return;
        }
        if self.is_enabled() == value {
            return;
        }

        if !value {
            if let Some(source) = self.source.as_mut() {
                source.stop_updates();
            }
            self.state = LocationState::Disabled;
            debug!("location: {}", self.state.as_str());
            return;
        }

        let Some(source) = self.source.as_mut() else {
            warn!("location: no position source on this host");
            self.state = LocationState::Unsupported;
            return;
        };
        source.start_updates();
        self.state = LocationState::Searching;
        debug!("location: {}", self.state.as_str());

        // A source often caches its last answer; replay it so callers get
        // a position without waiting for fresh hardware output.
        if let Some(fix) = self.source.as_ref().and_then(|s| s.last_known_position()) {
            self.submit(fix);
        }
    }

    /// Feed one position report into the tracker.  Ignored unless the
    /// tracker is enabled.
    pub fn submit(&mut self, fix: LocationFix) {
        self.submit_at(fix, SystemTime::now());
    }

    fn submit_at(&mut self, mut fix: LocationFix, now: SystemTime) {
        if !fix.latitude_deg.is_finite() || !fix.longitude_deg.is_finite() {
            debug!("location: dropping invalid fix");
            return;
        }
        if !self.is_enabled() {
            debug!("location: dropping fix while {}", self.state.as_str());
            return;
        }
        if !fix.altitude_m.is_finite() {
            fix.altitude_m = 0.0;
        }

        let settled = fix.is_settled_at(now);
        if let Some(observer) = self.observer.as_mut() {
            observer(&fix);
        }
        self.last_fix = Some(fix);

        if settled && self.state == LocationState::Searching {
            if let Some(source) = self.source.as_mut() {
                source.stop_updates();
            }
            self.state = LocationState::Found;
            info!("location: fix settled, source stopped");
        }
    }
}

impl std::fmt::Debug for LocationTracker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LocationTracker")
            .field("state", &self.state)
            .field("has_source", &self.source.is_some())
            .field("last_fix", &self.last_fix)
            .finish()
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
