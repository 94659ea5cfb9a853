use std::error::Error;
use std::ffi::OsString;
use std::fs::File;
use std::io::{self, BufReader, BufWriter, Write};
use std::process::ExitCode;

use clap::{CommandFactory, Parser};
use log::LevelFilter;
use repng::{codec, ClusterOrder, Quantizer, ReshapeMode, TransformConfig};

const AFTER_HELP: &str = "\
Orderings:
    freq    (default) Most common pixels first
    rfreq   Least common pixels first
    shuf    Like freq, but shuffle the color clusters
    light   Lightest pixels first
    dark    Darkest pixels first

Reshape modes:
    none    (default) Output is the same dimensions as the input
    square  Output is a square of (approximately) equal area to the input
    tall    Output height is the longer of the input dimensions
    wide    Output width is the longer of the input dimensions";

/// Creates a PNG image with the same pixels as the input, but in a different
/// order. By default, sorts same-pixel clusters by frequency.
#[derive(Parser, Debug)]
#[command(name = "repng", version, after_help = AFTER_HELP)]
struct Cli {
    /// Downsample colors by n bits where 0 <= n <= 8
    #[arg(short = 'd', long, value_name = "BITS", default_value_t = 0)]
    downsample: u8,

    /// Reshape the output image
    #[arg(short = 'r', long, value_name = "RESHAPE_MODE", default_value = "none")]
    reshape: String,

    /// Order the output in a different way
    #[arg(short = 'o', long, value_name = "ORDERING", default_value = "freq")]
    ordering: String,

    /// Seed for the shuf ordering
    #[arg(long, value_name = "SEED")]
    seed: Option<u64>,

    /// Print debug information to stderr
    #[arg(short = 'v', long)]
    verbose: bool,

    /// Input PNG, or - for stdin
    infile: String,

    /// Output PNG, or - for stdout
    outfile: String,
}

#[derive(Debug)]
struct Options {
    config: TransformConfig,
    infile: String,
    outfile: String,
    verbose: bool,
}

/// Parse and validate an argument list (program name first).
fn parse_args<I, T>(args: I) -> Result<Options, Box<dyn Error>>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    let cli = Cli::try_parse_from(args)?;

    Quantizer::new(cli.downsample)?;
    let reshape: ReshapeMode = cli.reshape.parse()?;
    let ordering: ClusterOrder = cli.ordering.parse()?;

    let mut config = TransformConfig::new()
        .downsample(cli.downsample)
        .reshape(reshape)
        .ordering(ordering);
    if let Some(seed) = cli.seed {
        config = config.seed(seed);
    }

    Ok(Options {
        config,
        infile: cli.infile,
        outfile: cli.outfile,
        verbose: cli.verbose,
    })
}

fn run(opts: &Options) -> Result<(), Box<dyn Error>> {
    let raster = if opts.infile == "-" {
        codec::decode_from(io::stdin().lock())?
    } else {
        codec::decode(BufReader::new(File::open(&opts.infile)?))?
    };

    let bitmap = repng::transform(&raster, &opts.config)?;

    if opts.outfile == "-" {
        let mut out = io::stdout().lock();
        codec::encode(&mut out, &bitmap)?;
        out.flush()?;
    } else {
        let mut out = BufWriter::new(File::create(&opts.outfile)?);
        codec::encode(&mut out, &bitmap)?;
        out.flush()?;
    }
    Ok(())
}

fn usage_error(e: &dyn Error) -> ExitCode {
    eprintln!("error: {e}\n");
    eprintln!("{}", Cli::command().render_help());
    ExitCode::FAILURE
}

fn main() -> ExitCode {
    let opts = match parse_args(std::env::args_os()) {
        Ok(opts) => opts,
        Err(e) => {
            if let Some(clap_err) = e.downcast_ref::<clap::Error>() {
                if matches!(
                    clap_err.kind(),
                    clap::error::ErrorKind::DisplayHelp | clap::error::ErrorKind::DisplayVersion
                ) {
                    let _ = clap_err.print();
                    return ExitCode::SUCCESS;
                }
            }
            return usage_error(e.as_ref());
        }
    };

    let level = if opts.verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Warn
    };
    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .init();

    log::debug!(
        "{} -> {} ({:?})",
        opts.infile,
        opts.outfile,
        opts.config
    );

    match run(&opts) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => usage_error(e.as_ref()),
    }
}
