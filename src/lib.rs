// ── Safety policy ─────────────────────────────────────────────────────────────
// Unsafe code is forbidden everywhere except:
//   • `platform::win32` – Win32 FFI behind the display queries
// Each unsafe block there MUST carry a `// SAFETY:` comment.
#![deny(unsafe_code)]

// ── Module map ────────────────────────────────────────────────────────────────
//
// device    – the accessor: model / density / rotation / pause flag
// display   – rotation codes and density baselines
// error     – central error type and Result alias
// host      – the DisplayInfoProvider capability seam + stub provider
// location  – position fix tracking over a host-supplied source
// platform  – native providers (x11 / win32 / macos) and the selector
// sensors   – attitude (roll/pitch/heading) from raw sensor samples

pub mod device;
pub mod display;
pub mod error;
pub mod host;
pub mod location;
pub mod platform;
pub mod sensors;

pub use device::{DeviceInfo, DeviceReport, PausePermission};
pub use display::{Rotation, DENSITY_BASE_DPI};
pub use error::{CaliperError, Result};
pub use host::{DeviceIdentity, DisplayInfoProvider, FixedDisplay};
