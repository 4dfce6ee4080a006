mod report;
mod sweep;

use std::process::ExitCode;

use clap::Parser;
use phyci_ofdm::{Modulation, OfdmSimulator};
use tracing_subscriber::EnvFilter;

use sweep::{run_sweep, SnrRange};

#[derive(Parser, Debug)]
#[command(name = "phyci", about = "OFDM BER sweep for PHY regression checks")]
struct Args {
    /// Modulation scheme (QPSK or 16QAM).
    #[arg(short, long, default_value = "QPSK")]
    modulation: Modulation,

    /// Number of bits per simulated transmission.
    #[arg(short, long, default_value_t = 10_000)]
    bits: usize,

    /// First SNR value in dB.
    #[arg(long, default_value_t = 0, allow_negative_numbers = true)]
    snr_start: i32,

    /// Last SNR value in dB, inclusive.
    #[arg(long, default_value_t = 20, allow_negative_numbers = true)]
    snr_stop: i32,

    /// SNR increment in dB.
    #[arg(long, default_value_t = 2)]
    snr_step: i32,

    /// Seed for bit and noise generation.
    #[arg(long, default_value_t = 42)]
    seed: u64,

    /// Number of OFDM subcarriers.
    #[arg(long, default_value_t = 64)]
    subcarriers: usize,

    /// Exit with an error if any point misses the BER threshold.
    #[arg(long)]
    strict: bool,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    match run(&args) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(err) => {
            eprintln!("ERROR: Simulation failed - {}", err);
            ExitCode::FAILURE
        }
    }
}

/// Run the sweep and print the report. Returns false when `--strict` is set
/// and a threshold was missed.
fn run(args: &Args) -> Result<bool, Box<dyn std::error::Error>> {
    let range = SnrRange::new(args.snr_start, args.snr_stop, args.snr_step)?;
    let mut simulator = OfdmSimulator::builder()
        .subcarriers(args.subcarriers)
        .modulation(args.modulation)
        .seed(args.seed)
        .build()?;

    let result = run_sweep(&mut simulator, args.bits, range)?;
    print!("{}", report::header(&result));
    print!("{}", report::body(&result));

    let missed = result.threshold_violations().count();
    Ok(!(args.strict && missed > 0))
}
