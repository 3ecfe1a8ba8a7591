// ── Win32 provider ────────────────────────────────────────────────────────────
//
// The one module in the crate where `unsafe` code is permitted.  Every
// `unsafe` block MUST carry a `// SAFETY:` comment that states:
//   • which invariant makes the operation sound, and
//   • what the caller is responsible for maintaining.
//
// Nothing here is `pub` beyond the provider itself; keep the unsafe surface
// as small as possible.

#![allow(unsafe_code)]

use windows::Win32::Foundation::GetLastError;
use windows::Win32::Graphics::Gdi::{
    EnumDisplaySettingsW, DEVMODEW, DMDO_180, DMDO_270, DMDO_90, ENUM_CURRENT_SETTINGS,
};
use windows::Win32::UI::HiDpi::GetDpiForSystem;

use crate::display::{scale_from_desktop_dpi, Rotation, BASE_DPI};
use crate::error::{CaliperError, Result};
use crate::host::{DeviceIdentity, DisplayInfoProvider};
use crate::platform::query_tool;

/// Provider backed by the Win32 display APIs plus WMI for identity.
#[derive(Debug, Clone, Default)]
pub struct Win32Display;

impl DisplayInfoProvider for Win32Display {
    fn device_identity(&self) -> Result<DeviceIdentity> {
        let output = query_tool(
            "wmic",
            &["csproduct", "get", "vendor,name", "/value"],
            "device identity",
        )?;
        parse_wmic_identity(&output).ok_or(CaliperError::Parse {
            what: "wmic output",
        })
    }

    fn density_scale(&self) -> Result<f32> {
        Ok(scale_from_desktop_dpi(system_dpi()))
    }

    fn rotation(&self) -> Result<Rotation> {
        current_orientation()
    }
}

/// Return the primary-monitor system DPI.  Falls back to BASE_DPI (96) on
/// failure (the API returns 0 only on pre-Win10 systems).
fn system_dpi() -> u32 {
    // SAFETY: GetDpiForSystem takes no parameters and always succeeds on Win10+.
    let v = unsafe { GetDpiForSystem() };
    if v == 0 {
        BASE_DPI
    } else {
        v
    }
}

/// Read the current display mode and map its orientation to a rotation code.
fn current_orientation() -> Result<Rotation> {
    let mut mode = DEVMODEW {
        dmSize: std::mem::size_of::<DEVMODEW>() as u16,
        ..Default::default()
    };
    // SAFETY: `mode` is a properly sized DEVMODEW owned by this frame; a null
    // device name selects the display device the calling thread runs on.
    let ok = unsafe { EnumDisplaySettingsW(None, ENUM_CURRENT_SETTINGS, &mut mode) };
    if !ok.as_bool() {
        // SAFETY: GetLastError is a trivially safe thread-local read.
        let code = unsafe { GetLastError() }.0;
        return Err(CaliperError::Win32 {
            function: "EnumDisplaySettingsW",
            code,
        });
    }

    // SAFETY: for display devices, ENUM_CURRENT_SETTINGS fills the display
    // arm of the union, so dmDisplayOrientation is the live field.
    let orientation = unsafe { mode.Anonymous1.Anonymous2.dmDisplayOrientation };
    Ok(match orientation {
        o if o == DMDO_90 => Rotation::Deg90,
        o if o == DMDO_180 => Rotation::Deg180,
        o if o == DMDO_270 => Rotation::Deg270,
        // DMDO_DEFAULT, or anything a future driver invents.
        _ => Rotation::Deg0,
    })
}

/// Parse `wmic csproduct get vendor,name /value` output: `Key=Value` lines
/// with blank separator lines.
///
/// ```text
/// Name=20QV000WUS
/// Vendor=LENOVO
/// ```
fn parse_wmic_identity(output: &str) -> Option<DeviceIdentity> {
    let mut name = None;
    let mut vendor = None;
    for line in output.lines() {
        let line = line.trim();
        if let Some(v) = line.strip_prefix("Name=") {
            name = Some(v.trim().to_owned());
        } else if let Some(v) = line.strip_prefix("Vendor=") {
            vendor = Some(v.trim().to_owned());
        }
    }
    Some(DeviceIdentity::new(vendor?, name?))
}

// ── Tests ─────────────────────────────────────────────────────────────────────
