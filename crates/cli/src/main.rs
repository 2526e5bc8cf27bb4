//! Memory controller simulator CLI.
//!
//! This binary drives a controller with a synthetic request stream. It
//! performs:
//! 1. **Config assembly:** Technology preset lookup plus command-line
//!    overrides for fidelity, scheduler, mapping, and refresh.
//! 2. **Workload generation:** Sequential, strided, or random address
//!    streams with a configurable read fraction.
//! 3. **Reporting:** Statistics sections and any invariant violations on
//!    completion.

use clap::{Parser, Subcommand, ValueEnum};

use memsim_core::common::{Request, RequestKind};
use memsim_core::config::{
    presets, AddressMapping, ControllerConfig, Fidelity, RefreshPolicy, SchedulerPolicy,
    Technology,
};
use memsim_core::create_controller;

#[derive(Parser, Debug)]
#[command(
    name = "memsim",
    author,
    version,
    about = "Multi-fidelity DRAM memory controller simulator",
    long_about = "Run a synthetic workload against a simulated memory controller.\n\n\
        Examples:\n  \
        memsim run --technology lpddr5 --speed 6400 --requests 4096\n  \
        memsim run --fidelity cycle-accurate --scheduler fr-fcfs-grp --pattern random\n  \
        memsim run --technology hbm3 --speed 5600 --refresh per-bank --invariants"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run a synthetic workload and print statistics.
    Run {
        /// Memory technology.
        #[arg(long, value_enum, default_value_t = TechArg::Lpddr5)]
        technology: TechArg,

        /// Data rate in MT/s; must match a preset for the technology.
        #[arg(long, default_value_t = 6400)]
        speed: u32,

        /// Simulation fidelity.
        #[arg(long, value_enum, default_value_t = FidelityArg::CycleAccurate)]
        fidelity: FidelityArg,

        /// Scheduler policy.
        #[arg(long, value_enum, default_value_t = SchedulerArg::FrFcfs)]
        scheduler: SchedulerArg,

        /// Address mapping.
        #[arg(long, value_enum, default_value_t = MappingArg::RowBankColumn)]
        mapping: MappingArg,

        /// Refresh policy.
        #[arg(long, value_enum, default_value_t = RefreshArg::AllBank)]
        refresh: RefreshArg,

        /// Number of requests to submit.
        #[arg(long, default_value_t = 1024)]
        requests: u64,

        /// Address pattern.
        #[arg(long, value_enum, default_value_t = PatternArg::Sequential)]
        pattern: PatternArg,

        /// Stride in bytes for the strided pattern.
        #[arg(long, default_value_t = 4096)]
        stride: u64,

        /// Percentage of requests that are reads.
        #[arg(long, default_value_t = 70)]
        read_percent: u8,

        /// Request queue depth.
        #[arg(long, default_value_t = 32)]
        queue_depth: u32,

        /// Access size in bytes.
        #[arg(long, default_value_t = 64)]
        size: u32,

        /// Enable the invariant checker and report violations.
        #[arg(long)]
        invariants: bool,

        /// Enable trace output (use RUST_LOG=trace to see it).
        #[arg(long)]
        trace: bool,
    },
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum TechArg {
    Ideal,
    Ddr5,
    Lpddr5,
    Lpddr5x,
    Hbm3,
    Gddr7,
}

impl From<TechArg> for Technology {
    fn from(value: TechArg) -> Self {
        match value {
            TechArg::Ideal => Technology::Ideal,
            TechArg::Ddr5 => Technology::Ddr5,
            TechArg::Lpddr5 => Technology::Lpddr5,
            TechArg::Lpddr5x => Technology::Lpddr5x,
            TechArg::Hbm3 => Technology::Hbm3,
            TechArg::Gddr7 => Technology::Gddr7,
        }
    }
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum FidelityArg {
    Behavioral,
    Transactional,
    CycleAccurate,
}

impl From<FidelityArg> for Fidelity {
    fn from(value: FidelityArg) -> Self {
        match value {
            FidelityArg::Behavioral => Fidelity::Behavioral,
            FidelityArg::Transactional => Fidelity::Transactional,
            FidelityArg::CycleAccurate => Fidelity::CycleAccurate,
        }
    }
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum SchedulerArg {
    Fifo,
    FrFcfs,
    FrFcfsGrp,
}

impl From<SchedulerArg> for SchedulerPolicy {
    fn from(value: SchedulerArg) -> Self {
        match value {
            SchedulerArg::Fifo => SchedulerPolicy::Fifo,
            SchedulerArg::FrFcfs => SchedulerPolicy::FrFcfs,
            SchedulerArg::FrFcfsGrp => SchedulerPolicy::FrFcfsGrp,
        }
    }
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum MappingArg {
    RowBankColumn,
    RowColumnBank,
    BankRowColumn,
}

impl From<MappingArg> for AddressMapping {
    fn from(value: MappingArg) -> Self {
        match value {
            MappingArg::RowBankColumn => AddressMapping::RowBankColumn,
            MappingArg::RowColumnBank => AddressMapping::RowColumnBank,
            MappingArg::BankRowColumn => AddressMapping::BankRowColumn,
        }
    }
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum RefreshArg {
    None,
    AllBank,
    PerBank,
    SameBank,
}

impl From<RefreshArg> for RefreshPolicy {
    fn from(value: RefreshArg) -> Self {
        match value {
            RefreshArg::None => RefreshPolicy::None,
            RefreshArg::AllBank => RefreshPolicy::AllBank,
            RefreshArg::PerBank => RefreshPolicy::PerBank,
            RefreshArg::SameBank => RefreshPolicy::SameBank,
        }
    }
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum PatternArg {
    Sequential,
    Strided,
    Random,
}

/// Deterministic xorshift stream for address and read/write choices.
struct Xorshift(u64);

impl Xorshift {
    fn next(&mut self) -> u64 {
        let mut x = self.0;
        x ^= x << 13;
        x ^= x >> 7;
        x ^= x << 17;
        self.0 = x;
        x
    }
}

fn main() {
    env_logger::init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Run {
            technology,
            speed,
            fidelity,
            scheduler,
            mapping,
            refresh,
            requests,
            pattern,
            stride,
            read_percent,
            queue_depth,
            size,
            invariants,
            trace,
        } => {
            let tech: Technology = technology.into();
            let Some(timing) = presets::for_technology(tech, speed) else {
                eprintln!(
                    "Error: no preset for {:?} at {} MT/s; known presets: \
                     LPDDR5 6400/7500, LPDDR5X 8533, HBM3 5600, GDDR7 32000, IDEAL",
                    tech, speed
                );
                std::process::exit(1);
            };

            let mut config = ControllerConfig::default();
            config.technology = tech;
            config.fidelity = fidelity.into();
            config.speed_mt_s = speed;
            config.queue_depth = queue_depth;
            config.timing = timing;
            config.address_mapping = mapping.into();
            config.scheduler.policy = scheduler.into();
            config.refresh.policy = refresh.into();
            config.refresh.tREFI = config.timing.tREFI;
            config.refresh.tRFC = config.timing.tRFC;
            config.refresh.tRFCpb = config.timing.tRFCpb;
            config.refresh.tRFCsb = config.timing.tRFCsb;
            config.enable_invariants = invariants;
            config.enable_tracing = trace;

            let capacity = config.organization.total_capacity_bytes();
            println!(
                "memsim: {:?} {} MT/s, {:?}, scheduler {:?}, {} banks, {} MiB",
                tech,
                speed,
                config.fidelity,
                config.scheduler.policy,
                config.organization.total_banks(),
                capacity / (1024 * 1024)
            );

            let mut controller = match create_controller(config) {
                Ok(controller) => controller,
                Err(err) => {
                    eprintln!("Error: invalid configuration: {}", err);
                    std::process::exit(1);
                }
            };

            let mut rng = Xorshift(0x5DEE_CE66_D1CE_1CED);
            let address_space = capacity.max(1);
            let mut next_sequential: u64 = 0;

            let mut submitted = 0u64;
            while submitted < requests {
                if !controller.can_accept() {
                    controller.tick();
                    continue;
                }
                let address = match pattern {
                    PatternArg::Sequential => {
                        let a = next_sequential;
                        next_sequential = (next_sequential + size as u64) % address_space;
                        a
                    }
                    PatternArg::Strided => {
                        let a = next_sequential;
                        next_sequential = (next_sequential + stride) % address_space;
                        a
                    }
                    PatternArg::Random => rng.next() % address_space,
                };
                let kind = if rng.next() % 100 < read_percent as u64 {
                    RequestKind::Read
                } else {
                    RequestKind::Write
                };
                if controller.submit(Request::new(address, size, kind)).is_some() {
                    submitted += 1;
                }
            }
            controller.drain();

            println!(
                "completed {} requests in {} cycles ({:.1} ns at {} MHz)",
                controller.stats().total_requests(),
                controller.cycle(),
                controller.cycle() as f64 * controller.config().clock_period_ps() as f64 / 1000.0,
                controller.config().clock_mhz()
            );
            controller.stats().print();

            if invariants {
                let violations = controller.violations();
                if violations.is_empty() {
                    println!("invariants: clean");
                } else {
                    println!("invariants: {} violation(s)", violations.len());
                    for v in violations {
                        println!(
                            "  [{}] {} ch{} bank{}: {}",
                            v.cycle, v.invariant_id, v.channel, v.bank, v.message
                        );
                    }
                    std::process::exit(2);
                }
            }
        }
    }
}
