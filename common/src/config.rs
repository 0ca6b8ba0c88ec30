//! This is the `ConfigFile` struct.
//!
//! This is for finding the right default locations for configuration files for `swarmviz`.
//! This is a configuration file/struct neutral loading engine, storing only the base directory
//! and with `load()` read the proper file or the default one.
//!
//! This encapsulates the configuration file, available with `.inner()` or `.into_inner()`.
//!

use std::env;
use std::fmt::Debug;
use std::fs;
use std::path::{Path, PathBuf};

use directories::BaseDirs;
use eyre::Result;
use serde::de::DeserializeOwned;
use thiserror::Error;
use tracing::{debug, trace};

use crate::{makepath, Versioned};

/// Config filename
const CONFIG: &str = "config.hcl";

/// Main name for the directory base
const TAG: &str = "swarmviz";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Bad file version {0}, expected {1}")]
    BadFileVersion(usize, usize),
    #[error("Unknown config file {0} and no default in {1}")]
    MissingConfig(String, String),
    #[error("Neither a home directory nor HOME, can not continue")]
    NoHome,
}

/// Wrapper around a configuration struct `T` read from an HCL file.
///
#[derive(Debug)]
pub struct ConfigFile<T: Debug + DeserializeOwned + Versioned> {
    /// This is the base directory for all files.
    basedir: PathBuf,
    /// Where did we read it from, `None` means built-in defaults.
    source: Option<PathBuf>,
    inner: T,
}

/// Find the per-user configuration directory for `tag`.
///
#[tracing::instrument]
fn config_dir(tag: &str) -> Result<PathBuf> {
    let base = match BaseDirs::new() {
        Some(base) => {
            #[cfg(unix)]
            let base = base.home_dir().join(".config");

            #[cfg(windows)]
            let base = base.data_local_dir().to_path_buf();

            base
        }
        None => {
            #[cfg(unix)]
            let homedir = env::var("HOME").map_err(|_| ConfigError::NoHome)?;

            #[cfg(windows)]
            let homedir = env::var("LOCALAPPDATA").map_err(|_| ConfigError::NoHome)?;

            #[cfg(unix)]
            let base: PathBuf = makepath!(homedir, ".config");

            #[cfg(windows)]
            let base = PathBuf::from(homedir);

            base
        }
    };
    debug!("base = {base:?}");
    Ok(makepath!(base, tag))
}

impl<T> ConfigFile<T>
where
    T: Debug + DeserializeOwned + Versioned,
{
    /// Returns the path of the default config directory
    ///
    pub fn config_path(&self) -> PathBuf {
        self.basedir.clone()
    }

    /// Returns the path of the default config file
    ///
    pub fn default_file(&self) -> PathBuf {
        let cfg = self.config_path().join(CONFIG);
        debug!("default = {cfg:?}");
        cfg
    }

    /// File we actually read, if any.
    ///
    pub fn source(&self) -> Option<&Path> {
        self.source.as_deref()
    }

    /// Decode an HCL string into `T` and check its version.
    ///
    #[tracing::instrument(skip(data))]
    pub fn decode(data: &str) -> Result<T> {
        let data: T = hcl::from_str(data)?;
        debug!("struct data = {data:?}");

        if data.version() != T::VERSION {
            return Err(ConfigError::BadFileVersion(data.version(), T::VERSION).into());
        }
        Ok(data)
    }

    /// Load the file and return a struct T in the right format.
    ///
    /// Use the following search path:
    /// - file specified on CLI
    /// - default basedir (base on $HOME or $LOCALAPPDATA)
    ///
    #[tracing::instrument]
    pub fn load(fname: Option<&Path>) -> Result<ConfigFile<T>> {
        let basedir = config_dir(TAG)?;
        let default = basedir.join(CONFIG);

        let fname = match fname {
            Some(fname) => fname.to_path_buf(),
            None => default.clone(),
        };

        if !fname.exists() {
            return Err(ConfigError::MissingConfig(
                fname.to_string_lossy().to_string(),
                default.to_string_lossy().to_string(),
            )
            .into());
        }
        let fname = fname.canonicalize()?;

        trace!("Loading config file {fname:?} from {basedir:?}");

        let data = fs::read_to_string(&fname)?;
        let inner = Self::decode(&data)?;

        Ok(ConfigFile {
            basedir,
            source: Some(fname),
            inner,
        })
    }

    /// Same as `load()` but fall back to `T::default()` when no file is specified and the
    /// default one does not exist.  An explicitly named file must exist.
    ///
    #[tracing::instrument]
    pub fn load_or_default(fname: Option<&Path>) -> Result<ConfigFile<T>>
    where
        T: Default,
    {
        if fname.is_some() {
            return Self::load(fname);
        }

        let basedir = config_dir(TAG)?;
        if basedir.join(CONFIG).exists() {
            return Self::load(None);
        }

        trace!("No configuration file, using defaults");
        Ok(ConfigFile {
            basedir,
            source: None,
            inner: T::default(),
        })
    }

    /// Return the inner configuration file
    ///
    pub fn inner(&self) -> &T {
        &self.inner
    }

    /// Consume the wrapper
    ///
    pub fn into_inner(self) -> T {
        self.inner
    }
}
