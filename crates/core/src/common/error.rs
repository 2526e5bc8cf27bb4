//! Configuration error definitions.
//!
//! Construction is the only point where the simulator fails hard: a
//! controller is either built from a coherent configuration or not built at
//! all. Everything that can go wrong afterwards (a full queue, an invariant
//! violation) is observable state rather than an error.

use std::fmt;

/// A configuration error detected at controller construction.
///
/// Each variant names the offending field so a host can report it directly.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// A field that must be non-zero was zero.
    ZeroField(&'static str),

    /// An organization field that feeds the address bit-slicer was not a
    /// power of two.
    NotPowerOfTwo(&'static str),

    /// The burst occupies the data bus longer than the minimum column
    /// command spacing allows. tCCD_S is the binding bound: it governs
    /// back-to-back column commands across bank groups, which share the
    /// channel's data bus.
    BurstExceedsCcd {
        /// Configured burst length in cycles.
        t_burst: u32,
        /// Configured column-to-column spacing across bank groups.
        t_ccd_s: u32,
    },

    /// tRAS is too short to cover an activate, a burst, and read-to-precharge.
    RasTooShort {
        /// Configured row active time.
        t_ras: u32,
        /// Minimum legal value (tRCD + tBurst + tRTP).
        minimum: u32,
    },

    /// tRC is shorter than tRAS + tRP.
    RcTooShort {
        /// Configured row cycle time.
        t_rc: u32,
        /// Minimum legal value (tRAS + tRP).
        minimum: u32,
    },

    /// A declared option whose full design is out of scope was selected.
    Unimplemented(&'static str),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::ZeroField(field) => {
                write!(f, "configuration field `{}` must be non-zero", field)
            }
            ConfigError::NotPowerOfTwo(field) => {
                write!(f, "configuration field `{}` must be a power of two", field)
            }
            ConfigError::BurstExceedsCcd { t_burst, t_ccd_s } => {
                write!(f, "tBurst ({}) exceeds tCCD_S ({})", t_burst, t_ccd_s)
            }
            ConfigError::RasTooShort { t_ras, minimum } => {
                write!(
                    f,
                    "tRAS ({}) is below tRCD + tBurst + tRTP ({})",
                    t_ras, minimum
                )
            }
            ConfigError::RcTooShort { t_rc, minimum } => {
                write!(f, "tRC ({}) is below tRAS + tRP ({})", t_rc, minimum)
            }
            ConfigError::Unimplemented(what) => {
                write!(f, "`{}` is declared but not implemented", what)
            }
        }
    }
}

impl std::error::Error for ConfigError {}
