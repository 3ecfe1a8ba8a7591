// ── Display conventions ───────────────────────────────────────────────────────
//
// Rotation codes and pixel-density baselines shared by the accessor and the
// platform providers.  No platform imports; pure Rust.

// ── Density baselines ─────────────────────────────────────────────────────────

/// Reference DPI for "1x" density in the host convention.
///
/// A provider scale factor of 1.0 corresponds to exactly this many dots per
/// inch; `DeviceInfo::screen_density` multiplies the scale factor by it.
pub const DENSITY_BASE_DPI: f32 = 160.0;

/// Baseline DPI reported by desktop windowing systems at 100% scaling.
///
/// Desktop providers divide their raw DPI reading by this to recover the
/// 1x scale factor.
pub(crate) const BASE_DPI: u32 = 96;

/// Convert a raw desktop DPI reading to the 1x scale factor.
pub(crate) fn scale_from_desktop_dpi(dpi: u32) -> f32 {
    dpi as f32 / BASE_DPI as f32
}

/// Scale a pixel value defined at 1x density to `density_dpi`.
///
/// Rounds to the nearest integer pixel.
pub fn scale(px: i32, density_dpi: f32) -> i32 {
    (px as f32 * density_dpi / DENSITY_BASE_DPI).round() as i32
}

// ── Rotation ──────────────────────────────────────────────────────────────────

/// The current rotation of the host's default display.
///
/// Exactly four values: natural orientation, then 90°, 180° and 270° from
/// it.  `code()` yields the integer (0–3) that hosts, logs and reports
/// exchange; the enumeration matches the mobile-platform codes the value is
/// modelled on.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Rotation {
    /// Natural orientation (code 0).
    #[default]
    Deg0,
    /// Rotated 90° (code 1).
    Deg90,
    /// Rotated 180° (code 2).
    Deg180,
    /// Rotated 270° (code 3).
    Deg270,
}

impl Rotation {
    /// The integer rotation code (0–3).
    pub fn code(self) -> u8 {
        match self {
            Self::Deg0 => 0,
            Self::Deg90 => 1,
            Self::Deg180 => 2,
            Self::Deg270 => 3,
        }
    }

    /// Rotation angle in degrees from the natural orientation.
    pub fn degrees(self) -> u16 {
        match self {
            Self::Deg0 => 0,
            Self::Deg90 => 90,
            Self::Deg180 => 180,
            Self::Deg270 => 270,
        }
    }

    /// Parse an integer rotation code back into a `Rotation`.
    ///
    /// Returns `None` for anything outside 0–3.
    pub fn from_code(code: u8) -> Option<Self> {
        match code {
            0 => Some(Self::Deg0),
            1 => Some(Self::Deg90),
            2 => Some(Self::Deg180),
            3 => Some(Self::Deg270),
            _ => None,
        }
    }

    /// Short display string, e.g. `"90°"`.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Deg0 => "0°",
            Self::Deg90 => "90°",
            Self::Deg180 => "180°",
            Self::Deg270 => "270°",
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
