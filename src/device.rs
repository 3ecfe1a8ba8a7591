// ── Device info accessor ──────────────────────────────────────────────────────
//
// `DeviceInfo` is the crate's front door: a thin, borrowing view over a
// [`DisplayInfoProvider`] plus the host-owned [`PausePermission`] flag.
// It holds no state of its own — every getter is a live pass-through to the
// provider, with the density answer rescaled to the 160 dpi baseline that
// callers budget layout against.

use std::sync::atomic::{AtomicBool, Ordering};

use serde::{Deserialize, Serialize};

use crate::display::{Rotation, DENSITY_BASE_DPI};
use crate::error::Result;
use crate::host::DisplayInfoProvider;

// ── Pause permission flag ─────────────────────────────────────────────────────

/// Whether the embedding host allows the application to be paused.
///
/// Starts out `false`; the host grants permission once its own setup is far
/// enough along (typically after the first frame is up).  The flag is a
/// plain last-write-wins boolean with no ordering guarantees against other
/// state, hence the relaxed atomics.
#[derive(Debug, Default)]
pub struct PausePermission(AtomicBool);

impl PausePermission {
    pub const fn new(allowed: bool) -> Self {
        Self(AtomicBool::new(allowed))
    }

    pub fn set(&self, allowed: bool) {
        self.0.store(allowed, Ordering::Relaxed);
    }

    pub fn get(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

// ── Report DTO ────────────────────────────────────────────────────────────────

/// One-shot snapshot of everything the accessor can answer, in a shape
/// that serializes cleanly for the probe binary and for logs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeviceReport {
    pub model: String,
    pub density_dpi: f32,
    pub density_ratio: f32,
    pub rotation_code: u8,
    pub rotation_degrees: u16,
    pub can_pause: bool,
}

// ── Accessor ──────────────────────────────────────────────────────────────────

/// Borrowing accessor over a display provider and the pause flag.
///
/// The borrow ties the accessor's lifetime to the host context it reads
/// from, so a `DeviceInfo` can never outlive (or dangle past) the provider
/// that answers its queries.
pub struct DeviceInfo<'h> {
    provider: &'h dyn DisplayInfoProvider,
    pause: &'h PausePermission,
}

impl<'h> DeviceInfo<'h> {
    pub fn new(provider: &'h dyn DisplayInfoProvider, pause: &'h PausePermission) -> Self {
        Self { provider, pause }
    }

    /// Hardware identification as `"<manufacturer>:<model>"`.
    pub fn model(&self) -> Result<String> {
        Ok(self.provider.device_identity()?.to_string())
    }

    /// Raw scale factor of the default display (1.0 = baseline density).
    pub fn density_ratio(&self) -> Result<f32> {
        self.provider.density_scale()
    }

    /// Screen density in dots per inch, normalized so that a 1x display
    /// reports [`DENSITY_BASE_DPI`].
    pub fn screen_density(&self) -> Result<f32> {
        Ok(self.provider.density_scale()? * DENSITY_BASE_DPI)
    }

    /// Current rotation of the default display.
    pub fn rotation(&self) -> Result<Rotation> {
        self.provider.rotation()
    }

    /// Rotation as its integer wire code (0..=3).
    pub fn rotation_code(&self) -> Result<u8> {
        Ok(self.provider.rotation()?.code())
    }

    /// Whether the host currently allows pausing.
    pub fn can_pause(&self) -> bool {
        self.pause.get()
    }

    /// Grant or revoke pause permission on behalf of the host.
    pub fn set_can_pause(&self, allowed: bool) {
        self.pause.set(allowed);
    }

    /// Query everything at once.  Fails if any single query fails; partial
    /// reports are never produced.
    pub fn report(&self) -> Result<DeviceReport> {
        let identity = self.provider.device_identity()?;
        let ratio = self.provider.density_scale()?;
        let rotation = self.provider.rotation()?;
        Ok(DeviceReport {
            model: identity.to_string(),
            density_dpi: ratio * DENSITY_BASE_DPI,
            density_ratio: ratio,
            rotation_code: rotation.code(),
            rotation_degrees: rotation.degrees(),
            can_pause: self.pause.get(),
        })
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
