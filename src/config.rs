//! Runtime configuration of the dashboard.
//!
//! The configuration comes from the command line (or the matching `IFC_DASHBOARD_*` environment
//! variables) and is validated once, before anything is loaded.

use crate::args::Args;
use crate::{utils, Result};
use anyhow::{bail, Context};
use std::net::SocketAddr;
use std::path::{Path, PathBuf};

/// The `Config` object holds the validated settings: where the data file is and which address
/// to serve on.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct Config {
    data_path: PathBuf,
    addr: SocketAddr,
}

impl Config {
    /// This will
    /// - validate that the data file exists and is a file
    /// - canonicalize its path
    /// - resolve the listening address
    pub async fn load(args: &Args) -> Result<Self> {
        let maybe_relative = args.data().path();
        if !maybe_relative.is_file() {
            bail!("The data file is missing '{}'", maybe_relative.display())
        }
        let data_path = utils::canonicalize(maybe_relative)
            .await
            .context("Unable to resolve the data file path")?;
        Ok(Self {
            data_path,
            addr: SocketAddr::new(args.host(), args.port()),
        })
    }

    pub fn data_path(&self) -> &Path {
        &self.data_path
    }

    pub fn addr(&self) -> SocketAddr {
        self.addr
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::args::Common;
    use crate::test::{write_csv, PROJECTS_CSV};
    use std::net::{IpAddr, Ipv4Addr};
    use tracing_subscriber::filter::LevelFilter;

    fn args(data: PathBuf) -> Args {
        Args::new(
            Common::new(LevelFilter::INFO),
            data,
            IpAddr::V4(Ipv4Addr::LOCALHOST),
            8050,
        )
    }

    #[tokio::test]
    async fn test_load() {
        let (_dir, path) = write_csv(PROJECTS_CSV);
        let config = Config::load(&args(path.clone())).await.unwrap();
        assert!(config.data_path().is_absolute());
        assert!(config.data_path().ends_with("projects.csv"));
        assert_eq!(config.addr().to_string(), "127.0.0.1:8050");
    }

    #[tokio::test]
    async fn test_missing_data_file() {
        let err = Config::load(&args(PathBuf::from("no/such/base_de_datos.csv")))
            .await
            .unwrap_err();
        assert!(err.to_string().contains("The data file is missing"));
    }

    #[tokio::test]
    async fn test_directory_is_not_a_data_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let err = Config::load(&args(dir.path().to_path_buf()))
            .await
            .unwrap_err();
        assert!(err.to_string().contains("The data file is missing"));
    }
}
