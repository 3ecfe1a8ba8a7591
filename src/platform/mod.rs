// ── Platform bindings ─────────────────────────────────────────────────────────
//
// One provider per desktop target, each implementing `DisplayInfoProvider`
// over whatever the OS exposes.  No `unsafe` lives outside `win32`; the X11
// and macOS providers shell out to the stock query tools rather than
// linking display-server libraries.

#[cfg(target_os = "macos")]
pub mod macos;

#[cfg(windows)]
pub mod win32;

#[cfg(target_os = "linux")]
pub mod x11;

use crate::host::DisplayInfoProvider;

/// Build the provider for the running host.
///
/// Construction never fails; individual queries report
/// [`Unavailable`](crate::CaliperError::Unavailable) when the host cannot
/// answer them.  Targets with no native binding get a
/// [`FixedDisplay`](crate::host::FixedDisplay), whose answers are the
/// 1x/unrotated defaults.
pub fn native() -> Box<dyn DisplayInfoProvider> {
    #[cfg(target_os = "linux")]
    {
        Box::new(x11::X11Display::new())
    }
    #[cfg(windows)]
    {
        Box::new(win32::Win32Display)
    }
    #[cfg(target_os = "macos")]
    {
        Box::new(macos::MacosDisplay)
    }
    #[cfg(not(any(target_os = "linux", windows, target_os = "macos")))]
    {
        Box::new(crate::host::FixedDisplay::default())
    }
}

/// Run a platform query tool and capture its stdout.
///
/// A tool that is not installed and a tool that ran but failed (e.g. no
/// display server reachable) both mean the same thing to callers: the
/// `resource` cannot be resolved on this host.
#[cfg(any(target_os = "linux", windows, target_os = "macos"))]
pub(crate) fn query_tool(
    tool: &str,
    args: &[&str],
    resource: &'static str,
) -> crate::error::Result<String> {
    use crate::error::CaliperError;

    let output = match std::process::Command::new(tool).args(args).output() {
        Ok(output) => output,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            log::debug!("{tool} is not installed");
            return Err(CaliperError::Unavailable { resource });
        }
        Err(e) => return Err(e.into()),
    };
    if !output.status.success() {
        log::debug!("{tool} exited with {}", output.status);
        return Err(CaliperError::Unavailable { resource });
    }
    Ok(String::from_utf8_lossy(&output.stdout).into_owned())
}
