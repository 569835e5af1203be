//! Finding and starting Anki so it imports a generated deck.
//!
//! Discovery is a small table from [`Platform`] to a [`DiscoveryStrategy`]. A custom
//! location from [`LauncherConfig`] replaces the table entirely.

use std::env;
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::process::Command;

use tracing::{debug, warn};

use crate::{Error, Result};

/// Executable name searched for on `PATH` (Linux and other Unix desktops).
pub const ANKI_BINARY: &str = "anki";

/// Default install location of the macOS app bundle's executable.
pub const MACOS_ANKI_PATH: &str = "/Applications/Anki.app/Contents/MacOS/Anki";

/// Launcher settings, fixed at construction.
#[derive(Debug, Clone, Default)]
pub struct LauncherConfig {
    /// Path to the Anki executable when it is installed somewhere non-standard.
    pub custom_location: Option<PathBuf>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Platform {
    Windows,
    Linux,
    MacOs,
    Other,
}

impl Platform {
    /// The platform this binary was compiled for.
    pub fn current() -> Self {
        if cfg!(target_os = "windows") {
            Self::Windows
        } else if cfg!(target_os = "macos") {
            Self::MacOs
        } else if cfg!(target_os = "linux") {
            Self::Linux
        } else {
            Self::Other
        }
    }

    /// How Anki is usually found on this platform, if we know.
    pub fn strategy(self) -> Option<Box<dyn DiscoveryStrategy>> {
        match self {
            Self::Windows => Some(Box::new(ProgramFiles)),
            Self::Linux => Some(Box::new(SearchPath::new(ANKI_BINARY))),
            Self::MacOs => Some(Box::new(FixedPath(PathBuf::from(MACOS_ANKI_PATH)))),
            Self::Other => None,
        }
    }
}

/// One way of finding the Anki executable.
pub trait DiscoveryStrategy {
    fn locate(&self) -> Option<PathBuf>;
}

/// A user-supplied path. Found only if it exists.
#[derive(Debug, Clone)]
pub struct CustomLocation(pub PathBuf);

impl DiscoveryStrategy for CustomLocation {
    fn locate(&self) -> Option<PathBuf> {
        if self.0.exists() {
            return Some(self.0.clone());
        }
        warn!(
            path = %self.0.display(),
            "custom Anki location does not exist, check the path and try again"
        );
        None
    }
}

/// A fixed install path.
#[derive(Debug, Clone)]
pub struct FixedPath(pub PathBuf);

impl DiscoveryStrategy for FixedPath {
    fn locate(&self) -> Option<PathBuf> {
        self.0.exists().then(|| self.0.clone())
    }
}

/// Windows' `Program Files`, preferring the 32-bit folder on 64-bit systems.
#[derive(Debug, Clone, Copy)]
pub struct ProgramFiles;

impl DiscoveryStrategy for ProgramFiles {
    fn locate(&self) -> Option<PathBuf> {
        program_files_candidate(env::var_os("PROGRAMFILES(X86)"), env::var_os("PROGRAMFILES"))
            .filter(|p| p.exists())
    }
}

fn program_files_candidate(x86: Option<OsString>, native: Option<OsString>) -> Option<PathBuf> {
    let root = x86.or(native)?;
    Some(PathBuf::from(root).join("Anki").join("anki.exe"))
}

/// An executable looked up in the directories listed in `PATH`.
#[derive(Debug, Clone)]
pub struct SearchPath {
    binary: String,
}

impl SearchPath {
    pub fn new(binary: impl Into<String>) -> Self {
        Self {
            binary: binary.into(),
        }
    }

    fn search_in<I: IntoIterator<Item = PathBuf>>(&self, dirs: I) -> Option<PathBuf> {
        dirs.into_iter()
            .map(|dir| dir.join(&self.binary))
            .find(|candidate| candidate.is_file())
    }
}

impl DiscoveryStrategy for SearchPath {
    fn locate(&self) -> Option<PathBuf> {
        let path = env::var_os("PATH")?;
        self.search_in(env::split_paths(&path))
    }
}

/// Starts Anki with a deck file so its importer opens.
pub struct HostLauncher {
    config: LauncherConfig,
    platform: Platform,
}

impl HostLauncher {
    pub fn new(config: LauncherConfig) -> Self {
        Self::for_platform(config, Platform::current())
    }

    pub fn for_platform(config: LauncherConfig, platform: Platform) -> Self {
        Self { config, platform }
    }

    /// The strategy in effect: the custom location if configured, else the platform default.
    pub fn strategy(&self) -> Option<Box<dyn DiscoveryStrategy>> {
        match &self.config.custom_location {
            Some(path) => Some(Box::new(CustomLocation(path.clone()))),
            None => self.platform.strategy(),
        }
    }

    /// Find the Anki executable, or `None` if it can't be found.
    pub fn locate(&self) -> Option<PathBuf> {
        let found = self.strategy().and_then(|s| s.locate());
        match &found {
            Some(path) => debug!(path = %path.display(), "found Anki"),
            None => warn!(platform = ?self.platform, "could not locate the Anki executable"),
        }
        found
    }

    /// Start `exe` with `deck` as its only argument. Does not wait for it to exit.
    pub fn launch(&self, exe: &Path, deck: &Path) -> Result<()> {
        debug!(exe = %exe.display(), deck = %deck.display(), "launching Anki");
        Command::new(exe)
            .arg(deck)
            .spawn()
            .map_err(|source| Error::Launch {
                path: exe.to_path_buf(),
                source,
            })?;
        Ok(())
    }
}
