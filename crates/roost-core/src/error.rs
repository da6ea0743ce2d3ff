//! Error types for the Roost simulator.
//!
//! The storage core reports contract violations by panicking; these are
//! the recoverable errors raised at the driver boundary, where callers may
//! legitimately ask for something the world cannot do right now.

use std::error::Error;
use std::fmt;

use crate::id::{SiteId, StrainId, UnitId, UnitKind};

/// Errors from site-level operations (spawn, transfer, removal).
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SiteError {
    /// No site is registered under this ID.
    UnknownSite {
        /// The unrecognised site.
        site: SiteId,
    },
    /// The unit is not currently held by any site.
    UnknownUnit {
        /// The unit that could not be located.
        unit: UnitId,
    },
    /// The target site has no free slot left.
    SiteFull {
        /// The full site.
        site: SiteId,
        /// Its fixed capacity.
        capacity: usize,
    },
    /// The target site does not trade units of this kind.
    KindNotTraded {
        /// The site that rejected the unit.
        site: SiteId,
        /// The rejected kind.
        kind: UnitKind,
    },
    /// The operation is not available for this kind of site
    /// (e.g. routing through a site that is not a broker).
    WrongSiteKind {
        /// The site the operation was attempted on.
        site: SiteId,
        /// Human-readable name of the operation.
        operation: &'static str,
    },
    /// Source and destination of a transfer are the same site.
    SelfTransfer {
        /// The site in question.
        site: SiteId,
    },
    /// The strain does not fit a unit's strain set.
    StrainOutOfRange {
        /// The rejected strain.
        strain: StrainId,
    },
    /// An origin has minted every serial it can represent.
    SerialsExhausted {
        /// The origin site.
        site: SiteId,
    },
}

impl fmt::Display for SiteError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownSite { site } => write!(f, "unknown site: {site}"),
            Self::UnknownUnit { unit } => write!(f, "unit {unit} is not held by any site"),
            Self::SiteFull { site, capacity } => {
                write!(f, "site {site} is full (capacity {capacity})")
            }
            Self::KindNotTraded { site, kind } => {
                write!(f, "site {site} does not trade unit kind {kind}")
            }
            Self::WrongSiteKind { site, operation } => {
                write!(f, "site {site} does not support {operation}")
            }
            Self::SelfTransfer { site } => {
                write!(f, "cannot transfer a unit from site {site} to itself")
            }
            Self::StrainOutOfRange { strain } => {
                write!(f, "strain {strain} is outside the supported strain range")
            }
            Self::SerialsExhausted { site } => {
                write!(f, "origin {site} has no unit serials left")
            }
        }
    }
}

impl Error for SiteError {}
