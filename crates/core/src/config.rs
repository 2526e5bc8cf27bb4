//! Configuration system for the memory controller simulator.
//!
//! This module defines all configuration structures and enums used to
//! parameterize a controller. It provides:
//! 1. **Defaults:** Baseline values for timing, organization, scheduling, and refresh.
//! 2. **Structures:** Hierarchical config for timing, organization, scheduler, and refresh.
//! 3. **Enums:** Technology, fidelity, address mapping, scheduler policy, and refresh policy.
//! 4. **Presets:** Technology-specific timing tables treated as data inputs.
//!
//! Configuration is supplied as JSON (all structures deserialize with
//! per-field fallback to their defaults) or built in code starting from
//! `ControllerConfig::default()`. Validation happens once, at controller
//! construction.

use serde::Deserialize;

use crate::common::ConfigError;

/// Default configuration constants.
///
/// These values define the baseline IDEAL-memory configuration when not
/// explicitly overridden.
mod defaults {
    /// Data rate in megatransfers per second.
    pub const SPEED_MT_S: u32 = 6400;

    /// Total scheduler buffer capacity in requests.
    pub const QUEUE_DEPTH: u32 = 32;

    /// Row-to-column delay (ACT to RD/WR).
    pub const T_RCD: u32 = 14;
    /// Row precharge time (PRE to ACT).
    pub const T_RP: u32 = 14;
    /// Minimum row active time (ACT to PRE).
    pub const T_RAS: u32 = 28;
    /// Row cycle time (ACT to ACT, same bank).
    pub const T_RC: u32 = 42;
    /// CAS latency (RD to data out).
    pub const T_CL: u32 = 14;
    /// CAS write latency (WR to data in).
    pub const T_WL: u32 = 8;
    /// Write recovery time (data in to PRE).
    pub const T_WR: u32 = 24;
    /// Read-to-precharge time.
    pub const T_RTP: u32 = 6;
    /// ACT-to-ACT spacing, same bank group.
    pub const T_RRD_L: u32 = 6;
    /// ACT-to-ACT spacing, different bank group.
    pub const T_RRD_S: u32 = 4;
    /// Column-to-column spacing, same bank group.
    pub const T_CCD_L: u32 = 8;
    /// Column-to-column spacing, different bank group.
    pub const T_CCD_S: u32 = 8;
    /// Four-activate window.
    pub const T_FAW: u32 = 24;
    /// Write-to-read turnaround, same bank group.
    pub const T_WTR_L: u32 = 10;
    /// Write-to-read turnaround, different bank group.
    pub const T_WTR_S: u32 = 4;
    /// Read-to-write bus turnaround.
    pub const T_RTW: u32 = 14;
    /// Burst length in cycles (BL16 / 2).
    pub const T_BURST: u32 = 8;
    /// All-bank refresh cycle time.
    pub const T_RFC: u32 = 280;
    /// Per-bank refresh cycle time.
    pub const T_RFC_PB: u32 = 90;
    /// Same-bank refresh cycle time (DDR5).
    pub const T_RFC_SB: u32 = 90;
    /// Refresh interval.
    pub const T_REFI: u32 = 3900;
    /// CKE minimum pulse width.
    pub const T_CKE: u32 = 5;
    /// Exit power-down to valid command.
    pub const T_XP: u32 = 6;
    /// Exit self-refresh to valid command.
    pub const T_XS: u32 = 216;
    /// Mode register set command cycle time.
    pub const T_MRD: u32 = 8;
    /// Mode register set to non-MRS command.
    pub const T_MOD: u32 = 15;

    /// Fixed latency for the behavioral model, reads.
    pub const FIXED_READ_LATENCY: u32 = 100;
    /// Fixed latency for the behavioral model, writes.
    pub const FIXED_WRITE_LATENCY: u32 = 100;
    /// Mean latency for the transactional model, reads.
    pub const MEAN_READ_LATENCY: u32 = 80;
    /// Mean latency for the transactional model, writes.
    pub const MEAN_WRITE_LATENCY: u32 = 90;
    /// Latency standard deviation for the transactional model.
    pub const LATENCY_STDDEV: u32 = 20;
    /// Latency multiplier for page hits.
    pub const PAGE_HIT_FACTOR: f64 = 0.7;
    /// Latency multiplier for accesses to a closed bank.
    pub const PAGE_EMPTY_FACTOR: f64 = 1.0;
    /// Latency multiplier for page conflicts.
    pub const PAGE_CONFLICT_FACTOR: f64 = 1.3;

    /// Number of channels.
    pub const NUM_CHANNELS: u8 = 1;
    /// Ranks per channel.
    pub const RANKS_PER_CHANNEL: u8 = 1;
    /// Bank groups per rank.
    pub const BANK_GROUPS_PER_RANK: u8 = 4;
    /// Banks per bank group.
    pub const BANKS_PER_BANK_GROUP: u8 = 4;
    /// Rows per bank (16-bit row address).
    pub const ROWS_PER_BANK: u32 = 65536;
    /// Columns per row (10-bit column address).
    pub const COLUMNS_PER_ROW: u32 = 1024;
    /// Device data width in bits (x16).
    pub const DEVICE_WIDTH: u8 = 16;
    /// Devices per rank.
    pub const DEVICES_PER_RANK: u8 = 1;
    /// Burst length in transfers (BL16).
    pub const BURST_LENGTH: u32 = 16;

    /// Scheduler buffer size.
    pub const BUFFER_SIZE: u32 = 32;
    /// Read buffer size for split read/write buffers.
    pub const READ_BUFFER_SIZE: u32 = 16;
    /// Write buffer size for split read/write buffers.
    pub const WRITE_BUFFER_SIZE: u32 = 16;
    /// Watermark: switch to writes when reads fall below this depth.
    pub const HIGH_WATERMARK: u32 = 8;
    /// Watermark: switch back to reads when writes fall below this depth.
    pub const LOW_WATERMARK: u32 = 4;
    /// Banks managed by the scheduler.
    pub const SCHED_NUM_BANKS: u8 = 16;

    /// Maximum refresh postponement, in multiples of tREFI.
    pub const MAX_POSTPONE: u8 = 8;
    /// Maximum refresh pull-in, in multiples of tREFI.
    pub const MAX_PULL_IN: u8 = 8;
}

/// Supported memory technologies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Technology {
    /// Configurable ideal memory.
    #[default]
    Ideal,
    /// JEDEC DDR5.
    Ddr5,
    /// JEDEC LPDDR5.
    Lpddr5,
    /// JEDEC LPDDR5X.
    Lpddr5x,
    /// JEDEC LPDDR6 (future).
    Lpddr6,
    /// JEDEC HBM3.
    Hbm3,
    /// JEDEC HBM3E.
    Hbm3e,
    /// JEDEC HBM4 (future).
    Hbm4,
    /// JEDEC GDDR6.
    Gddr6,
    /// JEDEC GDDR7.
    Gddr7,
}

/// Simulation fidelity levels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Fidelity {
    /// Instant or fixed latency (~100-1000x faster than cycle-accurate).
    #[default]
    Behavioral,
    /// Queue-based statistical timing (~10-100x faster).
    Transactional,
    /// Full protocol state machines (1x baseline).
    CycleAccurate,
}

/// Address mapping scheme.
///
/// Decoding is a pure bit-slice over address bits; the widths derive from
/// the organization. Channel bits always occupy the most significant
/// position and rank bits sit directly below them; the mapping selects the
/// order of the row, bank, and column fields underneath.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AddressMapping {
    /// Ro:Ba:Co, favors sequential streaming within a row.
    #[default]
    RowBankColumn,
    /// Ro:Co:Ba, favors strided access across banks.
    RowColumnBank,
    /// Ba:Ro:Co, favors bank interleaving at small offsets.
    BankRowColumn,
    /// User-defined bit mapping. Declared for completeness; selecting it is
    /// a construction error.
    Custom,
}

/// Scheduler policy types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SchedulerPolicy {
    /// Simple FIFO per bank.
    Fifo,
    /// First-Ready FCFS (row hit priority).
    #[default]
    FrFcfs,
    /// FR-FCFS with read/write grouping.
    FrFcfsGrp,
    /// Grouping priority over row hits. Declared only.
    GrpFrFcfs,
    /// Grouping with watermark thresholds. Declared only.
    GrpFrFcfsWm,
    /// QoS-aware for mixed criticality. Declared only.
    QosAware,
}

/// Buffer organization types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BufferType {
    /// Single shared buffer for all banks. Declared only.
    Shared,
    /// Separate buffer per bank.
    #[default]
    Bankwise,
    /// Separate read and write buffers. Declared only.
    ReadWrite,
}

/// Refresh policy types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RefreshPolicy {
    /// No refresh (SRAM, STT-MRAM).
    None,
    /// Traditional all-bank refresh.
    #[default]
    AllBank,
    /// Per-bank refresh (LPDDR4/5, HBM).
    PerBank,
    /// Same-bank refresh (DDR5).
    SameBank,
    /// Per-2-bank refresh.
    Per2Bank,
    /// Fine-granularity refresh (HBM3): half the interval, half the latency.
    FineGranularity,
}

/// DRAM timing parameters, in memory clock cycles.
///
/// Applicable to DDR5, LPDDR5/5X, HBM3, and GDDR7 with technology-specific
/// presets; see [`presets`].
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
#[allow(non_snake_case)]
pub struct TimingParams {
    /// Row-to-column delay (ACT to RD/WR).
    pub tRCD: u32,
    /// Row precharge time (PRE to ACT).
    pub tRP: u32,
    /// Minimum row active time (ACT to PRE).
    pub tRAS: u32,
    /// Row cycle time (ACT to ACT, same bank).
    pub tRC: u32,
    /// CAS latency (RD to data out).
    pub tCL: u32,
    /// CAS write latency (WR to data in).
    pub tWL: u32,
    /// Write recovery time (data in to PRE).
    pub tWR: u32,
    /// Read-to-precharge time.
    pub tRTP: u32,

    /// ACT-to-ACT spacing, same bank group.
    pub tRRD_L: u32,
    /// ACT-to-ACT spacing, different bank group.
    pub tRRD_S: u32,
    /// Column-to-column spacing, same bank group.
    pub tCCD_L: u32,
    /// Column-to-column spacing, different bank group.
    pub tCCD_S: u32,
    /// Four-activate window.
    pub tFAW: u32,

    /// Write-to-read turnaround, same bank group.
    pub tWTR_L: u32,
    /// Write-to-read turnaround, different bank group.
    pub tWTR_S: u32,
    /// Read-to-write bus turnaround.
    pub tRTW: u32,

    /// Burst length in cycles.
    pub tBurst: u32,

    /// All-bank refresh cycle time.
    pub tRFC: u32,
    /// Per-bank refresh cycle time.
    pub tRFCpb: u32,
    /// Same-bank refresh cycle time.
    pub tRFCsb: u32,
    /// Refresh interval.
    pub tREFI: u32,

    /// CKE minimum pulse width.
    pub tCKE: u32,
    /// Exit power-down to valid command.
    pub tXP: u32,
    /// Exit self-refresh to valid command.
    pub tXS: u32,

    /// Mode register set command cycle time.
    pub tMRD: u32,
    /// Mode register set to non-MRS command.
    pub tMOD: u32,

    /// Fixed read latency for the behavioral model.
    pub fixed_read_latency: u32,
    /// Fixed write latency for the behavioral model.
    pub fixed_write_latency: u32,
    /// Mean read latency for the transactional model.
    pub mean_read_latency: u32,
    /// Mean write latency for the transactional model.
    pub mean_write_latency: u32,
    /// Latency standard deviation for the transactional model.
    pub latency_stddev: u32,
    /// Latency multiplier for page hits (transactional model).
    pub page_hit_factor: f64,
    /// Latency multiplier for accesses to a closed bank.
    pub page_empty_factor: f64,
    /// Latency multiplier for page conflicts.
    pub page_conflict_factor: f64,
}

impl Default for TimingParams {
    fn default() -> Self {
        Self {
            tRCD: defaults::T_RCD,
            tRP: defaults::T_RP,
            tRAS: defaults::T_RAS,
            tRC: defaults::T_RC,
            tCL: defaults::T_CL,
            tWL: defaults::T_WL,
            tWR: defaults::T_WR,
            tRTP: defaults::T_RTP,
            tRRD_L: defaults::T_RRD_L,
            tRRD_S: defaults::T_RRD_S,
            tCCD_L: defaults::T_CCD_L,
            tCCD_S: defaults::T_CCD_S,
            tFAW: defaults::T_FAW,
            tWTR_L: defaults::T_WTR_L,
            tWTR_S: defaults::T_WTR_S,
            tRTW: defaults::T_RTW,
            tBurst: defaults::T_BURST,
            tRFC: defaults::T_RFC,
            tRFCpb: defaults::T_RFC_PB,
            tRFCsb: defaults::T_RFC_SB,
            tREFI: defaults::T_REFI,
            tCKE: defaults::T_CKE,
            tXP: defaults::T_XP,
            tXS: defaults::T_XS,
            tMRD: defaults::T_MRD,
            tMOD: defaults::T_MOD,
            fixed_read_latency: defaults::FIXED_READ_LATENCY,
            fixed_write_latency: defaults::FIXED_WRITE_LATENCY,
            mean_read_latency: defaults::MEAN_READ_LATENCY,
            mean_write_latency: defaults::MEAN_WRITE_LATENCY,
            latency_stddev: defaults::LATENCY_STDDEV,
            page_hit_factor: defaults::PAGE_HIT_FACTOR,
            page_empty_factor: defaults::PAGE_EMPTY_FACTOR,
            page_conflict_factor: defaults::PAGE_CONFLICT_FACTOR,
        }
    }
}

/// Organization parameters: channels, ranks, banks, and page geometry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct OrganizationParams {
    /// Number of independent channels.
    pub num_channels: u8,
    /// Ranks per channel.
    pub ranks_per_channel: u8,
    /// Bank groups per rank.
    pub bank_groups_per_rank: u8,
    /// Banks per bank group.
    pub banks_per_bank_group: u8,
    /// Rows per bank.
    pub rows_per_bank: u32,
    /// Columns per row.
    pub columns_per_row: u32,
    /// Device data width in bits.
    pub device_width: u8,
    /// Devices per rank.
    pub devices_per_rank: u8,
    /// Burst length in transfers.
    pub burst_length: u32,
}

impl Default for OrganizationParams {
    fn default() -> Self {
        Self {
            num_channels: defaults::NUM_CHANNELS,
            ranks_per_channel: defaults::RANKS_PER_CHANNEL,
            bank_groups_per_rank: defaults::BANK_GROUPS_PER_RANK,
            banks_per_bank_group: defaults::BANKS_PER_BANK_GROUP,
            rows_per_bank: defaults::ROWS_PER_BANK,
            columns_per_row: defaults::COLUMNS_PER_ROW,
            device_width: defaults::DEVICE_WIDTH,
            devices_per_rank: defaults::DEVICES_PER_RANK,
            burst_length: defaults::BURST_LENGTH,
        }
    }
}

impl OrganizationParams {
    /// Banks per rank (bank groups times banks per group).
    pub fn banks_per_rank(&self) -> u16 {
        self.bank_groups_per_rank as u16 * self.banks_per_bank_group as u16
    }

    /// Banks per channel (ranks times banks per rank).
    pub fn banks_per_channel(&self) -> u16 {
        self.ranks_per_channel as u16 * self.banks_per_rank()
    }

    /// Total banks across all channels.
    pub fn total_banks(&self) -> usize {
        self.num_channels as usize * self.banks_per_channel() as usize
    }

    /// Capacity of a single channel in bytes.
    pub fn channel_capacity_bytes(&self) -> u64 {
        self.ranks_per_channel as u64
            * self.banks_per_rank() as u64
            * self.rows_per_bank as u64
            * self.columns_per_row as u64
            * (self.device_width as u64 / 8)
            * self.devices_per_rank as u64
    }

    /// Total capacity in bytes.
    pub fn total_capacity_bytes(&self) -> u64 {
        self.num_channels as u64 * self.channel_capacity_bytes()
    }
}

/// Scheduler configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct SchedulerConfig {
    /// Scheduling policy.
    pub policy: SchedulerPolicy,
    /// Buffer organization.
    pub buffer_type: BufferType,
    /// Total buffer capacity in requests.
    pub buffer_size: u32,
    /// Read buffer capacity, for the READ_WRITE buffer type.
    pub read_buffer_size: u32,
    /// Write buffer capacity, for the READ_WRITE buffer type.
    pub write_buffer_size: u32,
    /// Switch to writes when buffered reads fall below this depth.
    pub high_watermark: u32,
    /// Switch back to reads when buffered writes fall below this depth.
    pub low_watermark: u32,
    /// Number of banks. The cycle-accurate controller overrides this with
    /// the organization's total bank count.
    pub num_banks: u8,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            policy: SchedulerPolicy::default(),
            buffer_type: BufferType::default(),
            buffer_size: defaults::BUFFER_SIZE,
            read_buffer_size: defaults::READ_BUFFER_SIZE,
            write_buffer_size: defaults::WRITE_BUFFER_SIZE,
            high_watermark: defaults::HIGH_WATERMARK,
            low_watermark: defaults::LOW_WATERMARK,
            num_banks: defaults::SCHED_NUM_BANKS,
        }
    }
}

/// Refresh manager configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default)]
#[allow(non_snake_case)]
pub struct RefreshConfig {
    /// Refresh policy.
    pub policy: RefreshPolicy,
    /// Refresh interval in cycles.
    pub tREFI: u32,
    /// All-bank refresh cycle time.
    pub tRFC: u32,
    /// Per-bank refresh cycle time.
    pub tRFCpb: u32,
    /// Same-bank refresh cycle time.
    pub tRFCsb: u32,
    /// Maximum postponement, in multiples of tREFI.
    pub max_postpone: u8,
    /// Maximum pull-in, in multiples of tREFI.
    pub max_pull_in: u8,
}

impl Default for RefreshConfig {
    fn default() -> Self {
        Self {
            policy: RefreshPolicy::default(),
            tREFI: defaults::T_REFI,
            tRFC: defaults::T_RFC,
            tRFCpb: defaults::T_RFC_PB,
            tRFCsb: defaults::T_RFC_SB,
            max_postpone: defaults::MAX_POSTPONE,
            max_pull_in: defaults::MAX_PULL_IN,
        }
    }
}

/// Complete memory controller configuration.
///
/// # Examples
///
/// Building a cycle-accurate LPDDR5 configuration in code:
///
/// ```
/// use memsim_core::config::{presets, ControllerConfig, Fidelity, Technology};
///
/// let mut config = ControllerConfig::default();
/// config.technology = Technology::Lpddr5;
/// config.fidelity = Fidelity::CycleAccurate;
/// config.speed_mt_s = 6400;
/// config.timing = presets::lpddr5_6400();
/// assert_eq!(config.clock_mhz(), 3200);
/// assert!(config.validate().is_ok());
/// ```
///
/// Deserializing a partial JSON configuration (absent fields fall back to
/// their defaults):
///
/// ```
/// use memsim_core::config::{ControllerConfig, Fidelity, SchedulerPolicy};
///
/// let json = r#"{
///     "technology": "LPDDR5",
///     "fidelity": "CYCLE_ACCURATE",
///     "queue_depth": 64,
///     "scheduler": { "policy": "FR_FCFS_GRP" }
/// }"#;
/// let config: ControllerConfig = serde_json::from_str(json).unwrap();
/// assert_eq!(config.fidelity, Fidelity::CycleAccurate);
/// assert_eq!(config.queue_depth, 64);
/// assert_eq!(config.scheduler.policy, SchedulerPolicy::FrFcfsGrp);
/// assert_eq!(config.timing.tRCD, 14);
/// ```
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct ControllerConfig {
    /// Memory technology.
    pub technology: Technology,
    /// Simulation fidelity.
    pub fidelity: Fidelity,
    /// Data rate in megatransfers per second.
    pub speed_mt_s: u32,
    /// Total request queue depth.
    pub queue_depth: u32,
    /// Timing parameters.
    pub timing: TimingParams,
    /// Organization parameters.
    pub organization: OrganizationParams,
    /// Address mapping scheme.
    pub address_mapping: AddressMapping,
    /// Scheduler configuration.
    pub scheduler: SchedulerConfig,
    /// Refresh configuration.
    pub refresh: RefreshConfig,
    /// Emit trace output through the `log` facade.
    pub enable_tracing: bool,
    /// Collect statistics.
    pub enable_statistics: bool,
    /// Check invariants after every tick and record violations.
    pub enable_invariants: bool,
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            technology: Technology::default(),
            fidelity: Fidelity::default(),
            speed_mt_s: defaults::SPEED_MT_S,
            queue_depth: defaults::QUEUE_DEPTH,
            timing: TimingParams::default(),
            organization: OrganizationParams::default(),
            address_mapping: AddressMapping::default(),
            scheduler: SchedulerConfig::default(),
            refresh: RefreshConfig::default(),
            enable_tracing: false,
            enable_statistics: true,
            enable_invariants: false,
        }
    }
}

impl ControllerConfig {
    /// Memory clock frequency in MHz (data rate / 2 for DDR signaling).
    pub fn clock_mhz(&self) -> u32 {
        self.speed_mt_s / 2
    }

    /// Clock period in picoseconds.
    pub fn clock_period_ps(&self) -> u32 {
        1_000_000 / self.clock_mhz()
    }

    /// Validates the configuration, naming the first offending field.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] when a field is zero where it must not be,
    /// an organization field is not a power of two, the timing parameters
    /// are mutually inconsistent, or a declared-only option is selected.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let org = &self.organization;
        if org.num_channels == 0 {
            return Err(ConfigError::ZeroField("organization.num_channels"));
        }
        if org.ranks_per_channel == 0 {
            return Err(ConfigError::ZeroField("organization.ranks_per_channel"));
        }
        if org.bank_groups_per_rank == 0 {
            return Err(ConfigError::ZeroField("organization.bank_groups_per_rank"));
        }
        if org.banks_per_bank_group == 0 {
            return Err(ConfigError::ZeroField("organization.banks_per_bank_group"));
        }
        if org.rows_per_bank == 0 {
            return Err(ConfigError::ZeroField("organization.rows_per_bank"));
        }
        if org.columns_per_row == 0 {
            return Err(ConfigError::ZeroField("organization.columns_per_row"));
        }
        if self.queue_depth == 0 {
            return Err(ConfigError::ZeroField("queue_depth"));
        }
        if self.speed_mt_s == 0 {
            return Err(ConfigError::ZeroField("speed_mt_s"));
        }

        // The address decoder slices bit fields, so every extent it touches
        // must be a power of two.
        if !org.num_channels.is_power_of_two() {
            return Err(ConfigError::NotPowerOfTwo("organization.num_channels"));
        }
        if !org.ranks_per_channel.is_power_of_two() {
            return Err(ConfigError::NotPowerOfTwo("organization.ranks_per_channel"));
        }
        if !org.bank_groups_per_rank.is_power_of_two() {
            return Err(ConfigError::NotPowerOfTwo("organization.bank_groups_per_rank"));
        }
        if !org.banks_per_bank_group.is_power_of_two() {
            return Err(ConfigError::NotPowerOfTwo("organization.banks_per_bank_group"));
        }
        if !org.rows_per_bank.is_power_of_two() {
            return Err(ConfigError::NotPowerOfTwo("organization.rows_per_bank"));
        }
        if !org.columns_per_row.is_power_of_two() {
            return Err(ConfigError::NotPowerOfTwo("organization.columns_per_row"));
        }

        let t = &self.timing;
        if t.tBurst == 0 {
            return Err(ConfigError::ZeroField("timing.tBurst"));
        }
        if t.tBurst > t.tCCD_S {
            return Err(ConfigError::BurstExceedsCcd {
                t_burst: t.tBurst,
                t_ccd_s: t.tCCD_S,
            });
        }
        let ras_min = t.tRCD + t.tBurst + t.tRTP;
        if t.tRAS < ras_min {
            return Err(ConfigError::RasTooShort {
                t_ras: t.tRAS,
                minimum: ras_min,
            });
        }
        let rc_min = t.tRAS + t.tRP;
        if t.tRC < rc_min {
            return Err(ConfigError::RcTooShort {
                t_rc: t.tRC,
                minimum: rc_min,
            });
        }

        if self.refresh.policy != RefreshPolicy::None && self.refresh.tREFI == 0 {
            return Err(ConfigError::ZeroField("refresh.tREFI"));
        }

        if self.address_mapping == AddressMapping::Custom {
            return Err(ConfigError::Unimplemented("address_mapping.CUSTOM"));
        }
        match self.scheduler.policy {
            SchedulerPolicy::GrpFrFcfs => {
                return Err(ConfigError::Unimplemented("scheduler.policy.GRP_FR_FCFS"));
            }
            SchedulerPolicy::GrpFrFcfsWm => {
                return Err(ConfigError::Unimplemented("scheduler.policy.GRP_FR_FCFS_WM"));
            }
            SchedulerPolicy::QosAware => {
                return Err(ConfigError::Unimplemented("scheduler.policy.QOS_AWARE"));
            }
            _ => {}
        }
        match self.scheduler.buffer_type {
            BufferType::Shared => {
                return Err(ConfigError::Unimplemented("scheduler.buffer_type.SHARED"));
            }
            BufferType::ReadWrite => {
                return Err(ConfigError::Unimplemented("scheduler.buffer_type.READ_WRITE"));
            }
            BufferType::Bankwise => {}
        }

        Ok(())
    }
}

/// Technology-specific timing presets.
///
/// Presets are data: a host that needs a speed grade not listed here
/// supplies a full [`TimingParams`] of its own.
pub mod presets {
    use super::{Technology, TimingParams};

    /// LPDDR5-6400 timing parameters.
    pub fn lpddr5_6400() -> TimingParams {
        TimingParams {
            tRCD: 18,
            tRP: 18,
            tRAS: 42,
            tRC: 60,
            tCL: 17,
            tWL: 8,
            tWR: 34,
            tRTP: 12,
            tRRD_L: 8,
            tRRD_S: 4,
            tCCD_L: 8,
            tCCD_S: 8,
            tFAW: 32,
            tWTR_L: 16,
            tWTR_S: 8,
            tRTW: 18,
            tBurst: 8,
            tRFC: 280,
            tRFCpb: 90,
            tREFI: 3900,
            ..TimingParams::default()
        }
    }

    /// LPDDR5-7500 timing parameters.
    pub fn lpddr5_7500() -> TimingParams {
        TimingParams {
            tRCD: 21,
            tRP: 21,
            tRAS: 49,
            tRC: 70,
            tCL: 20,
            tWL: 10,
            tWR: 40,
            tRTP: 14,
            tRRD_L: 9,
            tRRD_S: 5,
            tCCD_L: 9,
            tCCD_S: 8,
            tFAW: 37,
            tWTR_L: 19,
            tWTR_S: 9,
            tRTW: 21,
            tBurst: 8,
            tRFC: 280,
            tRFCpb: 90,
            tREFI: 3900,
            ..TimingParams::default()
        }
    }

    /// LPDDR5X-8533 timing parameters.
    pub fn lpddr5x_8533() -> TimingParams {
        TimingParams {
            tRCD: 24,
            tRP: 24,
            tRAS: 56,
            tRC: 80,
            tCL: 22,
            tWL: 11,
            tWR: 45,
            tRTP: 16,
            tRRD_L: 11,
            tRRD_S: 5,
            tCCD_L: 11,
            tCCD_S: 8,
            tFAW: 43,
            tWTR_L: 22,
            tWTR_S: 11,
            tRTW: 24,
            tBurst: 8,
            tRFC: 280,
            tRFCpb: 90,
            tREFI: 3900,
            ..TimingParams::default()
        }
    }

    /// HBM3-5600 timing parameters. HBM uses shorter bursts and refreshes
    /// more often at higher operating temperatures.
    pub fn hbm3_5600() -> TimingParams {
        TimingParams {
            tRCD: 14,
            tRP: 14,
            tRAS: 28,
            tRC: 42,
            tCL: 14,
            tWL: 4,
            tWR: 16,
            tRTP: 4,
            tRRD_L: 4,
            tRRD_S: 4,
            tCCD_L: 4,
            tCCD_S: 4,
            tFAW: 16,
            tWTR_L: 8,
            tWTR_S: 4,
            tRTW: 14,
            tBurst: 4,
            tRFC: 280,
            tRFCpb: 90,
            tREFI: 1950,
            ..TimingParams::default()
        }
    }

    /// GDDR7-32000 timing parameters.
    pub fn gddr7_32000() -> TimingParams {
        TimingParams {
            tRCD: 20,
            tRP: 20,
            tRAS: 46,
            tRC: 66,
            tCL: 20,
            tWL: 10,
            tWR: 28,
            tRTP: 10,
            tRRD_L: 6,
            tRRD_S: 4,
            tCCD_L: 8,
            tCCD_S: 8,
            tFAW: 24,
            tWTR_L: 12,
            tWTR_S: 6,
            tRTW: 16,
            tBurst: 8,
            tRFC: 350,
            tREFI: 1950,
            ..TimingParams::default()
        }
    }

    /// Returns the preset for a technology and speed grade, if one exists.
    ///
    /// `Ideal` always resolves to the default parameters. Unknown
    /// technology/speed combinations return `None` and the host supplies a
    /// full [`TimingParams`].
    pub fn for_technology(technology: Technology, speed_mt_s: u32) -> Option<TimingParams> {
        match (technology, speed_mt_s) {
            (Technology::Ideal, _) => Some(TimingParams::default()),
            (Technology::Lpddr5, 6400) => Some(lpddr5_6400()),
            (Technology::Lpddr5, 7500) => Some(lpddr5_7500()),
            (Technology::Lpddr5x, 8533) => Some(lpddr5x_8533()),
            (Technology::Hbm3, 5600) => Some(hbm3_5600()),
            (Technology::Gddr7, 32000) => Some(gddr7_32000()),
            _ => None,
        }
    }
}
