// ── X11 / Linux provider ──────────────────────────────────────────────────────
//
// Identity comes from the DMI tables the kernel exports under
// /sys/devices/virtual/dmi/id; display metrics come from the X11 query
// tools (`xdpyinfo`, `xrandr`).  Output parsing lives in pure functions so
// it can be tested against captured fixtures without a running X server.

use std::io;
use std::path::{Path, PathBuf};

use crate::display::{scale_from_desktop_dpi, Rotation};
use crate::error::{CaliperError, Result};
use crate::host::{DeviceIdentity, DisplayInfoProvider};
use crate::platform::query_tool;

/// Where the kernel exposes the board's DMI identity strings.
const DMI_ROOT: &str = "/sys/devices/virtual/dmi/id";

/// Provider backed by the X11 query tools and the DMI sysfs tree.
#[derive(Debug, Clone)]
pub struct X11Display {
    dmi_root: PathBuf,
}

impl X11Display {
    pub fn new() -> Self {
        Self {
            dmi_root: PathBuf::from(DMI_ROOT),
        }
    }

    #[cfg(test)]
    fn with_dmi_root(root: impl Into<PathBuf>) -> Self {
        Self {
            dmi_root: root.into(),
        }
    }
}

impl Default for X11Display {
    fn default() -> Self {
        Self::new()
    }
}

impl DisplayInfoProvider for X11Display {
    fn device_identity(&self) -> Result<DeviceIdentity> {
        let manufacturer = read_dmi(&self.dmi_root, "sys_vendor")?;
        let model = read_dmi(&self.dmi_root, "product_name")?;
        Ok(DeviceIdentity::new(manufacturer, model))
    }

    fn density_scale(&self) -> Result<f32> {
        let output = query_tool("xdpyinfo", &[], "display")?;
        let dpi = parse_xdpyinfo_dpi(&output).ok_or(CaliperError::Parse {
            what: "xdpyinfo output",
        })?;
        Ok(scale_from_desktop_dpi(dpi))
    }

    fn rotation(&self) -> Result<Rotation> {
        let output = query_tool("xrandr", &["--query"], "display")?;
        parse_xrandr_rotation(&output).ok_or(CaliperError::Unavailable {
            resource: "display",
        })
    }
}

/// Read one DMI identity file.  A machine without DMI tables (containers,
/// some ARM boards) simply has no identity to report.
fn read_dmi(root: &Path, file: &str) -> Result<String> {
    match std::fs::read_to_string(root.join(file)) {
        Ok(s) => Ok(s.trim().to_owned()),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Err(CaliperError::Unavailable {
            resource: "DMI identity",
        }),
        Err(e) => Err(e.into()),
    }
}

/// Pull the horizontal DPI out of `xdpyinfo` output.  The relevant line:
///
/// ```text
///   resolution:    96x96 dots per inch
/// ```
fn parse_xdpyinfo_dpi(output: &str) -> Option<u32> {
    let line = output
        .lines()
        .find(|l| l.trim_start().starts_with("resolution:"))?;
    let value = line.split(':').nth(1)?.trim();
    value.split('x').next()?.trim().parse().ok()
}

/// Pull the default output's orientation token out of `xrandr --query`
/// output.
///
/// A rotated output names its orientation between the geometry and the
/// reflection list:
///
/// ```text
/// eDP-1 connected primary 1080x1920+0+0 left (normal left inverted right ...
/// ```
///
/// An unrotated output carries no token there, which means `normal`.
/// xrandr lists outputs in connector order, so the `primary` output is
/// preferred over whichever connected output happens to come first.
/// `left` turns the output 90° counter-clockwise, the same screen-to-natural
/// relation as rotation code 1; `right` is code 3.
fn parse_xrandr_rotation(output: &str) -> Option<Rotation> {
    let is_connected = |line: &&str| {
        let mut words = line.split_whitespace();
        words.next().is_some() && words.next() == Some("connected")
    };
    let line = output
        .lines()
        .find(|l| is_connected(l) && l.split_whitespace().nth(2) == Some("primary"))
        .or_else(|| output.lines().find(is_connected))?;
    for token in line.split_whitespace().take_while(|t| !t.starts_with('(')) {
        match token {
            "normal" => return Some(Rotation::Deg0),
            "left" => return Some(Rotation::Deg90),
            "inverted" => return Some(Rotation::Deg180),
            "right" => return Some(Rotation::Deg270),
            _ => {}
        }
    }
    Some(Rotation::Deg0)
}

// ── Tests ─────────────────────────────────────────────────────────────────────
