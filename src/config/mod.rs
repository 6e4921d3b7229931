//! Command-line surface and run configuration.
//!
//! Parsing is split from validation: clap collects raw values, `validate`
//! applies every option constraint eagerly and resolves sensitivity-derived
//! defaults, so no indexing work ever starts from a bad configuration.

use std::path::PathBuf;

use clap::Parser;

use crate::error::{EngineError, EngineResult};
use crate::index::frequency::{GIGABYTE, MEGABYTE};
use crate::sequence::CamPolicy;

pub const MIN_SENSITIVITY: u32 = 90;
pub const MAX_SENSITIVITY: u32 = 100;
pub const DEFAULT_SENSITIVITY: u32 = 97;
pub const MAX_SEEDLENGTH: u32 = 32;
pub const MAX_HISTORY: u32 = 64;
pub const MIN_THREADS: usize = 3;

#[derive(Parser, Debug)]
#[command(
    name = "seedex",
    version,
    about = "Seed-and-extend local alignment of nucleotide sequence collections"
)]
pub struct CliArgs {
    /// Input FASTA file holding the primary sequence collection
    #[arg(long = "ii", value_name = "FILE")]
    pub ii: Option<PathBuf>,

    /// Optional FASTA file holding a query collection
    #[arg(long = "qii", value_name = "FILE")]
    pub qii: Option<PathBuf>,

    /// Exact seed length
    #[arg(long, value_name = "LENGTH", default_value_t = 14)]
    pub seedlength: u32,

    /// Use X-drop extension, optionally with a sensitivity setting
    #[arg(long, value_name = "SENSITIVITY", num_args = 0..=1,
          default_missing_value = "97")]
    pub extendxdrop: Option<u32>,

    /// Use greedy extension, optionally with a sensitivity setting
    #[arg(long, value_name = "SENSITIVITY", num_args = 0..=1,
          default_missing_value = "97")]
    pub extendgreedy: Option<u32>,

    /// Width of a diagonal band (0 groups by exact diagonal)
    #[arg(long, value_name = "WIDTH", default_value_t = 6)]
    pub diagbandwidth: u64,

    /// Minimum number of bases a diagonal band's seeds must cover
    #[arg(long, value_name = "BASES")]
    pub mincoverage: Option<u64>,

    /// Minimum length of a reported alignment
    #[arg(long, value_name = "LENGTH", default_value_t = 20)]
    pub alignlength: u64,

    /// Minimum percent identity of a reported alignment
    #[arg(long, value_name = "PERCENT", default_value_t = 80)]
    pub minidentity: u32,

    /// Exclude k-mers occurring more often than this
    #[arg(long, value_name = "FREQ")]
    pub maxfreq: Option<u32>,

    /// Derive the k-mer frequency cutoff from a memory budget
    #[arg(long, value_name = "SIZE")]
    pub memlimit: Option<String>,

    /// Size of the greedy match history window
    #[arg(long, value_name = "SIZE", default_value_t = 60)]
    pub history: u32,

    /// Minimum percentage of matches in the history window
    #[arg(long, value_name = "PERCENT")]
    pub percmathistory: Option<u32>,

    /// Maximum difference of the two extended segment lengths
    #[arg(long, value_name = "DIFF", default_value_t = 30)]
    pub maxalilendiff: u64,

    /// X-drop score threshold
    #[arg(long, value_name = "SCORE")]
    pub xdropbelow: Option<i64>,

    /// Sequence access policy during extension
    #[arg(long, value_name = "POLICY")]
    pub cam: Option<String>,

    /// Skip the forward strand
    #[arg(long = "no-forward")]
    pub no_forward: bool,

    /// Skip the reverse-complement strand
    #[arg(long = "no-reverse")]
    pub no_reverse: bool,

    /// Adjust greedy parameters to the base composition of the input
    #[arg(long = "bias-parameters")]
    pub bias_parameters: bool,

    /// Keep seed pairs whose windows overlap on the same sequence
    #[arg(long)]
    pub overlappingseeds: bool,

    /// Append seed coordinates to every reported alignment
    #[arg(long = "seed-display")]
    pub seed_display: bool,

    /// Cross-check seed pairs against a brute-force enumeration
    #[arg(long)]
    pub verify: bool,

    /// Print every k-mer occurrence
    #[arg(long = "debug-kmer")]
    pub debug_kmer: bool,

    /// Print every seed pair
    #[arg(long = "debug-seedpair")]
    pub debug_seedpair: bool,

    /// Stop after seed generation
    #[arg(long = "only-seeds")]
    pub only_seeds: bool,

    /// Report run statistics
    #[arg(long, short = 'v')]
    pub verbose: bool,

    /// Report per-phase wall-clock times
    #[arg(long)]
    pub benchmark: bool,

    /// Number of extension worker threads
    #[arg(long, short = 't', value_name = "N")]
    pub threads: Option<usize>,

    /// Write alignments to a file instead of stdout
    #[arg(long, value_name = "FILE")]
    pub outfile: Option<PathBuf>,

    #[arg(hide = true)]
    pub extra: Vec<String>,
}

/// Which extension strategy the run uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StrategyChoice {
    Xdrop,
    Greedy,
}

/// The fully validated run configuration. Every derived default is resolved;
/// the engine never consults raw arguments.
#[derive(Debug, Clone)]
pub struct SeedExtendConfig {
    pub primary_path: PathBuf,
    pub query_path: Option<PathBuf>,
    pub seedlength: u32,
    pub diagbandwidth: u64,
    pub mincoverage: u64,
    pub alignlength: u64,
    pub minidentity: u32,
    pub strategy: StrategyChoice,
    pub sensitivity: u32,
    pub xdropbelow: i64,
    pub history: u32,
    pub percmathistory: u32,
    pub maxalilendiff: u64,
    pub maxfreq: Option<u32>,
    pub memlimit_bytes: Option<u64>,
    pub cam: CamPolicy,
    pub forward: bool,
    pub reverse: bool,
    pub bias_parameters: bool,
    pub overlappingseeds: bool,
    pub seed_display: bool,
    pub verify: bool,
    pub debug_kmer: bool,
    pub debug_seedpair: bool,
    pub only_seeds: bool,
    pub verbose: bool,
    pub benchmark: bool,
    pub threads: Option<usize>,
    pub outfile: Option<PathBuf>,
}

impl SeedExtendConfig {
    /// Error budget of the greedy extension, in percent.
    pub fn maxerr_percent(&self) -> u32 {
        100 - self.minidentity
    }
}

fn parse_memlimit(arg: &str) -> EngineResult<u64> {
    let malformed = || {
        EngineError::configuration(
            "argument to option \"--memlimit\" must be an integer argument \
             followed by one of the keywords MB and GB",
        )
    };
    if arg.len() < 3 {
        return Err(malformed());
    }
    let (digits, unit) = arg.split_at(arg.len() - 2);
    let unit_bytes = match unit {
        "MB" => MEGABYTE,
        "GB" => GIGABYTE,
        _ => return Err(malformed()),
    };
    let value: u64 = digits.parse().map_err(|_| malformed())?;
    let bytes = value
        .checked_mul(unit_bytes)
        .ok_or_else(malformed)?;
    if bytes < MEGABYTE {
        return Err(EngineError::configuration(
            "argument to option \"--memlimit\" must be at least 1MB",
        ));
    }
    Ok(bytes)
}

fn default_xdropbelow(sensitivity: u32) -> i64 {
    3 + (sensitivity - MIN_SENSITIVITY) as i64 / 2
}

fn default_percmathistory(sensitivity: u32, minidentity: u32) -> u32 {
    let relaxed = (100 - minidentity) * (sensitivity - 80) / 10;
    (100 - relaxed).clamp(1, 100)
}

/// Apply every option constraint and resolve derived defaults.
pub fn validate(args: CliArgs) -> EngineResult<SeedExtendConfig> {
    if !args.extra.is_empty() {
        return Err(EngineError::configuration("too many arguments"));
    }
    let primary_path = args
        .ii
        .ok_or_else(|| EngineError::configuration("option \"--ii\" is mandatory"))?;

    if args.no_forward && args.no_reverse {
        return Err(EngineError::configuration(
            "option \"--no-reverse\" and option \"--no-forward\" exclude each other",
        ));
    }
    if args.extendxdrop.is_some() && args.extendgreedy.is_some() {
        return Err(EngineError::configuration(
            "option \"--extendxdrop\" and option \"--extendgreedy\" exclude each other",
        ));
    }

    let (strategy, sensitivity) = match (args.extendxdrop, args.extendgreedy) {
        (Some(sens), None) => (StrategyChoice::Xdrop, sens),
        (None, Some(sens)) => (StrategyChoice::Greedy, sens),
        (None, None) => (StrategyChoice::Greedy, DEFAULT_SENSITIVITY),
        (Some(_), Some(_)) => unreachable!(),
    };
    if !(MIN_SENSITIVITY..=MAX_SENSITIVITY).contains(&sensitivity) {
        let option = match strategy {
            StrategyChoice::Xdrop => "--extendxdrop",
            StrategyChoice::Greedy => "--extendgreedy",
        };
        return Err(EngineError::configuration(format!(
            "argument to option \"{option}\" must be an integer in the range \
             {MIN_SENSITIVITY}..{MAX_SENSITIVITY}"
        )));
    }

    if args.seedlength < 1 || args.seedlength > MAX_SEEDLENGTH {
        return Err(EngineError::configuration(format!(
            "argument to option \"--seedlength\" must be an integer in the range \
             1..{MAX_SEEDLENGTH}"
        )));
    }
    if let Some(maxfreq) = args.maxfreq {
        if maxfreq < 2 {
            return Err(EngineError::configuration(
                "option \"--maxfreq\" must be >= 2 to find matching k-mers",
            ));
        }
    }
    if let Some(threads) = args.threads {
        if threads < MIN_THREADS {
            return Err(EngineError::configuration(
                "option \"--threads\" must be >= 3 to find matching k-mers",
            ));
        }
    }
    let memlimit_bytes = args.memlimit.as_deref().map(parse_memlimit).transpose()?;

    if args.history < 1 || args.history > MAX_HISTORY {
        return Err(EngineError::configuration(
            "argument to option \"--history\" must be an integer <= 64",
        ));
    }
    if let Some(percmathistory) = args.percmathistory {
        if percmathistory > 100 {
            return Err(EngineError::configuration(
                "option \"--percmathistory\" must be an integer <= 100",
            ));
        }
    }
    if args.minidentity < 1 || args.minidentity > 100 {
        return Err(EngineError::configuration(
            "option \"--minidentity\" must be an integer in the range 1..100",
        ));
    }
    let cam = match args.cam.as_deref() {
        None => CamPolicy::Direct,
        Some(value) => CamPolicy::parse(value)
            .ok_or_else(|| EngineError::configuration("illegal parameter for option --cam"))?,
    };
    let xdropbelow = args.xdropbelow.unwrap_or_else(|| default_xdropbelow(sensitivity));
    if xdropbelow < 1 {
        return Err(EngineError::configuration(
            "argument to option \"--xdropbelow\" must be an integer >= 1",
        ));
    }

    Ok(SeedExtendConfig {
        primary_path,
        query_path: args.qii,
        seedlength: args.seedlength,
        diagbandwidth: args.diagbandwidth,
        mincoverage: args
            .mincoverage
            .unwrap_or(5 * args.seedlength as u64 / 2),
        alignlength: args.alignlength,
        minidentity: args.minidentity,
        strategy,
        sensitivity,
        xdropbelow,
        history: args.history,
        percmathistory: args
            .percmathistory
            .unwrap_or_else(|| default_percmathistory(sensitivity, args.minidentity)),
        maxalilendiff: args.maxalilendiff,
        maxfreq: args.maxfreq,
        memlimit_bytes,
        cam,
        forward: !args.no_forward,
        reverse: !args.no_reverse,
        bias_parameters: args.bias_parameters,
        overlappingseeds: args.overlappingseeds,
        seed_display: args.seed_display,
        verify: args.verify,
        debug_kmer: args.debug_kmer,
        debug_seedpair: args.debug_seedpair,
        only_seeds: args.only_seeds,
        verbose: args.verbose,
        benchmark: args.benchmark,
        threads: args.threads,
        outfile: args.outfile,
    })
}
