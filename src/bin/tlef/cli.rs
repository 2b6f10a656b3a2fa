use std::path::PathBuf;

use clap::{ArgAction, Args, Parser, Subcommand, ValueEnum};

use tle_fluence::SpectrumKind;

#[derive(Parser)]
#[command(
    name = "tlef",
    about = "Track-length estimator fluence spectra",
    version,
    author,
    before_help = crate::display::banner_for_help(),
    propagate_version = true
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,
}

#[derive(Subcommand)]
pub enum Command {
    /// Score a step trace into fluence spectra
    #[command(visible_alias = "s")]
    Score(ScoreArgs),

    /// Inspect a binary histogram container
    Show(ShowArgs),
}

impl Command {
    pub fn quiet(&self) -> bool {
        match self {
            Command::Score(args) => args.io.quiet,
            Command::Show(args) => args.quiet,
        }
    }
}

/// I/O options of the score command.
#[derive(Args)]
pub struct IoOptions {
    /// Step trace to score (stdin if omitted)
    #[arg(short, long, value_name = "FILE")]
    pub input: Option<PathBuf>,

    /// Output path for the histogram container; text tables share its stem
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Run configuration (TOML); flags override its values
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Suppress progress output (for scripting)
    #[arg(short, long)]
    pub quiet: bool,
}

#[derive(Args)]
#[command(next_help_heading = "Energy Binning")]
pub struct BinningOptions {
    /// Lower edge of the first bin (MeV)
    #[arg(long = "emin", value_name = "MEV")]
    pub min_energy: Option<f64>,

    /// Upper edge of the last bin (MeV)
    #[arg(long = "emax", value_name = "MEV")]
    pub max_energy: Option<f64>,

    /// Number of energy bins
    #[arg(long = "bins", value_name = "N")]
    pub bin_count: Option<usize>,

    /// Use linear instead of logarithmic bin spacing
    #[arg(long)]
    pub linear: bool,
}

#[derive(Args)]
#[command(next_help_heading = "Output")]
pub struct OutputOptions {
    /// Also write one text table per spectrum
    #[arg(long)]
    pub text: bool,

    /// Do not write the binary histogram container
    #[arg(long = "no-binary")]
    pub no_binary: bool,
}

#[derive(Args)]
#[command(next_help_heading = "Stopping Power")]
pub struct StoppingOptions {
    /// Custom stopping-power tables (TOML); defaults to the embedded water table
    #[arg(long = "stopping", value_name = "FILE")]
    pub tables: Option<PathBuf>,
}

#[derive(Args)]
pub struct ScoreArgs {
    #[command(flatten)]
    pub io: IoOptions,

    #[command(flatten)]
    pub binning: BinningOptions,

    #[command(flatten)]
    pub output: OutputOptions,

    #[command(flatten)]
    pub stopping: StoppingOptions,
}

#[derive(Args)]
pub struct ShowArgs {
    /// Binary histogram container to read
    #[arg(value_name = "FILE")]
    pub file: PathBuf,

    /// Spectrum to print as a table
    #[arg(long, value_name = "KIND", default_value = "electron")]
    pub spectrum: SpectrumArg,

    /// Write the table to a file instead of stdout
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Only print the table
    #[arg(short, long)]
    pub quiet: bool,
}

#[derive(Clone, Copy, ValueEnum, Default)]
pub enum SpectrumArg {
    /// Fluence of all electrons and positrons
    #[default]
    Electron,
    /// Fluence of primary electrons
    #[value(alias = "primary-electron")]
    Primary,
    /// Photon track length
    #[value(alias = "gamma")]
    Photon,
}

impl From<SpectrumArg> for SpectrumKind {
    fn from(arg: SpectrumArg) -> Self {
        match arg {
            SpectrumArg::Electron => SpectrumKind::Electron,
            SpectrumArg::Primary => SpectrumKind::PrimaryElectron,
            SpectrumArg::Photon => SpectrumKind::Photon,
        }
    }
}

pub fn parse() -> Cli {
    Cli::parse()
}
