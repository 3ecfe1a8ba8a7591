// ── Host capability seam ──────────────────────────────────────────────────────
//
// `DisplayInfoProvider` is the narrow interface the accessor uses to talk to
// the running host environment.  The native bindings in `platform::`
// implement it; `FixedDisplay` stands in on headless hosts and in tests.
// A provider is *borrowed* for the accessor's lifetime — the accessor never
// owns or tears down the host context.

use crate::display::Rotation;
use crate::error::Result;

// ── Device identity ───────────────────────────────────────────────────────────

/// Manufacturer and model names resolved from the host's build information.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceIdentity {
    /// Device or board vendor, e.g. `"LENOVO"`.
    pub manufacturer: String,
    /// Product/model name, e.g. `"20QV000WUS"`.
    pub model: String,
}

impl DeviceIdentity {
    pub fn new(manufacturer: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            manufacturer: manufacturer.into(),
            model: model.into(),
        }
    }
}

// The fixed `"<manufacturer>:<model>"` rendering hosts rely on.
// No escaping, no locale handling; empty segments render empty.
impl std::fmt::Display for DeviceIdentity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.manufacturer, self.model)
    }
}

// ── Provider trait ────────────────────────────────────────────────────────────

/// Capability interface over the host's display and platform facilities.
///
/// Implementations answer three questions about the running environment:
/// who built the device, how dense the default display is, and which way it
/// is currently rotated.  Every call is a live query; providers must not
/// cache on the accessor's behalf.
///
/// Failure policy: when a facility cannot be resolved (no display attached,
/// identity source missing), return [`CaliperError::Unavailable`] rather
/// than a raw platform error.
///
/// [`CaliperError::Unavailable`]: crate::CaliperError::Unavailable
pub trait DisplayInfoProvider {
    /// Manufacturer/model identification from the host's build info.
    fn device_identity(&self) -> Result<DeviceIdentity>;

    /// Pixel-density scale factor of the default display, where 1.0 means
    /// the platform baseline density.
    fn density_scale(&self) -> Result<f32>;

    /// Current rotation of the default display.
    fn rotation(&self) -> Result<Rotation>;
}

// ── Fixed provider ────────────────────────────────────────────────────────────

/// A provider that answers every query with fixed values.
///
/// Stands in for the native binding on headless hosts (no display server,
/// CI) and backs most of the crate's tests.
#[derive(Debug, Clone)]
pub struct FixedDisplay {
    pub identity: DeviceIdentity,
    pub scale: f32,
    pub rotation: Rotation,
}

impl FixedDisplay {
    pub fn new(identity: DeviceIdentity, scale: f32, rotation: Rotation) -> Self {
        Self {
            identity,
            scale,
            rotation,
        }
    }
}

impl Default for FixedDisplay {
    /// An unnamed device with a 1x display in its natural orientation.
    fn default() -> Self {
        Self::new(DeviceIdentity::new("unknown", "unknown"), 1.0, Rotation::Deg0)
    }
}

impl DisplayInfoProvider for FixedDisplay {
    fn device_identity(&self) -> Result<DeviceIdentity> {
        Ok(self.identity.clone())
    }

    fn density_scale(&self) -> Result<f32> {
        Ok(self.scale)
    }

    fn rotation(&self) -> Result<Rotation> {
        Ok(self.rotation)
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identity_renders_colon_separated() {
        let id = DeviceIdentity::new("Acme", "X1");
        assert_eq!(id.to_string(), "Acme:X1");
    }

    #[test]
    fn identity_empty_segments_render_empty() {
        // The format is fixed; nothing is substituted for empty names.
        let id = DeviceIdentity::new("", "");
        assert_eq!(id.to_string(), ":");
    }

    #[test]
    fn fixed_display_answers_with_its_values() {
        let p = FixedDisplay::new(DeviceIdentity::new("Acme", "X1"), 2.0, Rotation::Deg90);
        assert_eq!(p.device_identity().unwrap().to_string(), "Acme:X1");
        assert_eq!(p.density_scale().unwrap(), 2.0);
        assert_eq!(p.rotation().unwrap(), Rotation::Deg90);
    }

    #[test]
    fn default_fixed_display_is_1x_unrotated() {
        let p = FixedDisplay::default();
        assert_eq!(p.density_scale().unwrap(), 1.0);
        assert_eq!(p.rotation().unwrap(), Rotation::Deg0);
    }
}
