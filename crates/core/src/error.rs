//! Crate-level error type

use crate::cluster::CatalogError;
use crate::core_types::UnitError;
use crate::ics::IcsError;
use crate::nemo::NemoError;
use crate::orbit::OrbitError;
use crate::potential::PotentialError;
use crate::timeline::TimelineError;
use thiserror::Error;

/// Any error raised by this crate
#[derive(Debug, Error)]
pub enum Error {
    /// Quantity outside its physical domain
    #[error(transparent)]
    Unit(#[from] UnitError),
    /// Cluster lookup or catalog loading
    #[error(transparent)]
    Catalog(#[from] CatalogError),
    /// Potential construction or preset lookup
    #[error(transparent)]
    Potential(#[from] PotentialError),
    /// Orbit integration
    #[error(transparent)]
    Orbit(#[from] OrbitError),
    /// NEMO tool run or output parsing
    #[error(transparent)]
    Nemo(#[from] NemoError),
    /// Initial-condition sampling
    #[error(transparent)]
    Ics(#[from] IcsError),
    /// Stream-run loading, synchronisation or export
    #[error(transparent)]
    Timeline(#[from] TimelineError),
}

/// Result alias using [`Error`]
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_module_errors_convert() {
        fn lookup() -> Result<()> {
            crate::cluster::get_cluster("omega_cen")?;
            Ok(())
        }
        let err = lookup().unwrap_err();
        assert!(matches!(err, Error::Catalog(CatalogError::UnknownCluster { .. })));
        assert!(err.to_string().contains("omega_cen"));
    }
}
