// ── Central error type ────────────────────────────────────────────────────────
//
// All fallible operations in Caliper return `error::Result<T>`.  No panics
// in production paths.  Host-side failures (display gone, identity source
// missing) surface as `Unavailable` rather than raw platform error codes;
// the platform detail rides along where it exists (`Io` source,
// `Win32 { code }`).

/// Every error that Caliper can produce.
#[derive(Debug)]
pub enum CaliperError {
    /// A host facility needed by a query could not be resolved.
    ///
    /// This is the crate's `HostUnavailable` condition: the display is not
    /// attached, the identity source does not exist, or the platform query
    /// tool is absent.
    Unavailable {
        /// What the query needed, for display purposes (e.g. `"display"`).
        resource: &'static str,
    },

    /// Output from a platform query could not be interpreted.
    Parse {
        /// The value being parsed, for display purposes (e.g. `"xrandr output"`).
        what: &'static str,
    },

    /// A standard I/O error (spawning a query tool, sysfs read, …).
    Io(std::io::Error),

    /// A Win32 API call returned a failure code.
    #[cfg(windows)]
    Win32 {
        /// The name of the failing function, for display purposes.
        function: &'static str,
        /// The raw Win32 error code (`GetLastError()` value) or HRESULT.
        code: u32,
    },
}

impl std::fmt::Display for CaliperError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Unavailable { resource } => {
                write!(f, "host {resource} unavailable")
            }
            Self::Parse { what } => write!(f, "could not parse {what}"),
            Self::Io(e) => write!(f, "I/O error: {e}"),
            #[cfg(windows)]
            Self::Win32 { function, code } => {
                write!(f, "{function} failed (error {code:#010x})")
            }
        }
    }
}

impl std::error::Error for CaliperError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for CaliperError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e)
    }
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, CaliperError>;
