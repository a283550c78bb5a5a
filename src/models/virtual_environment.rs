use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::ffi::OsString;
use std::path::{Path, PathBuf};

/// Variables the activation script unsets
pub const REMOVED_VARIABLES: &[&str] = &["PYTHONHOME"];

/// A pre-existing Python virtual environment
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VirtualEnvironment {
    /// Path to the virtual environment directory
    pub path: PathBuf,
}

/// Environment changes that stand in for sourcing `bin/activate`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActivationEnv {
    /// Variables set on every child process
    pub set: BTreeMap<String, String>,
    /// Variables removed from every child process
    pub removed: Vec<String>,
}

impl VirtualEnvironment {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Directory holding the environment's executables
    pub fn bin_dir(&self) -> PathBuf {
        if cfg!(windows) {
            self.path.join("Scripts")
        } else {
            self.path.join("bin")
        }
    }

    /// Activation script whose presence marks a usable environment
    pub fn activate_script(&self) -> PathBuf {
        if cfg!(windows) {
            self.bin_dir().join("activate.bat")
        } else {
            self.bin_dir().join("activate")
        }
    }

    /// Path an executable would have inside the environment
    pub fn executable(&self, name: &str) -> PathBuf {
        if cfg!(windows) && Path::new(name).extension().is_none() {
            self.bin_dir().join(format!("{}.exe", name))
        } else {
            self.bin_dir().join(name)
        }
    }

    /// Compute the activation overlay against the given `PATH`
    pub fn activation_env(&self, current_path: Option<OsString>) -> ActivationEnv {
        let mut set = BTreeMap::new();
        set.insert(
            "VIRTUAL_ENV".to_string(),
            self.path.to_string_lossy().to_string(),
        );

        let mut paths = vec![self.bin_dir()];
        if let Some(current) = current_path {
            paths.extend(std::env::split_paths(&current));
        }
        let joined = std::env::join_paths(&paths)
            .map(|p| p.to_string_lossy().to_string())
            .unwrap_or_else(|_| self.bin_dir().to_string_lossy().to_string());
        set.insert("PATH".to_string(), joined);

        ActivationEnv {
            set,
            removed: REMOVED_VARIABLES.iter().map(|v| (*v).to_string()).collect(),
        }
    }
}
