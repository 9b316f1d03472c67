//! These structs provide the CLI interface for the ifc-dashboard binary.

use clap::Parser;
use std::convert::Infallible;
use std::fmt::{Display, Formatter};
use std::net::IpAddr;
use std::ops::Deref;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tracing_subscriber::filter::LevelFilter;

/// The data file looked for in the working directory when none is given.
pub const DEFAULT_DATA_FILE: &str = "base_de_datos.csv";
pub const DEFAULT_HOST: &str = "127.0.0.1";
pub const DEFAULT_PORT: u16 = 8050;

/// ifc-dashboard: serves a dashboard of IFC investment projects.
///
/// The program reads a CSV file of investment projects once at startup and serves a single page
/// with an overview of the investments, a country ranking that can be flipped between the largest
/// and the smallest investors, and a browsable table of the raw data.
#[derive(Debug, Parser, Clone)]
pub struct Args {
    #[clap(flatten)]
    common: Common,

    /// The CSV file of investment projects.
    #[arg(long, env = "IFC_DASHBOARD_DATA", default_value = DEFAULT_DATA_FILE)]
    data: DisplayPath,

    /// The address to listen on.
    #[arg(long, env = "IFC_DASHBOARD_HOST", default_value = DEFAULT_HOST)]
    host: IpAddr,

    /// The port to listen on.
    #[arg(long, env = "IFC_DASHBOARD_PORT", default_value_t = DEFAULT_PORT)]
    port: u16,
}

impl Args {
    pub fn new(common: Common, data: PathBuf, host: IpAddr, port: u16) -> Self {
        Self {
            common,
            data: data.into(),
            host,
            port,
        }
    }

    pub fn common(&self) -> &Common {
        &self.common
    }

    pub fn data(&self) -> &DisplayPath {
        &self.data
    }

    pub fn host(&self) -> IpAddr {
        self.host
    }

    pub fn port(&self) -> u16 {
        self.port
    }
}

/// Arguments that control the program rather than the dashboard.
#[derive(Debug, Parser, Clone)]
pub struct Common {
    /// The logging verbosity. One of, from least to most verbose:
    /// off, error, warn, info, debug, trace
    ///
    /// This can be overridden by RUST_LOG.
    #[arg(long, default_value_t = LevelFilter::INFO)]
    log_level: LevelFilter,
}

impl Common {
    pub fn new(log_level: LevelFilter) -> Self {
        Self { log_level }
    }

    pub fn log_level(&self) -> LevelFilter {
        self.log_level
    }
}

#[derive(Debug, Default, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct DisplayPath(PathBuf);

impl From<PathBuf> for DisplayPath {
    fn from(value: PathBuf) -> Self {
        DisplayPath(value)
    }
}

impl Deref for DisplayPath {
    type Target = Path;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl AsRef<Path> for DisplayPath {
    fn as_ref(&self) -> &Path {
        &self.0
    }
}

impl Display for DisplayPath {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0.to_string_lossy())
    }
}

impl FromStr for DisplayPath {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(PathBuf::from(s)))
    }
}

impl DisplayPath {
    pub fn path(&self) -> &Path {
        &self.0
    }
}
