use clap::Parser;

use notify::RecursiveMode;
use notify_debouncer_mini::new_debouncer;
use std::fs::{self, File};
use std::io::{BufRead, BufReader, Write};
use std::{path::Path, sync::mpsc::channel, time::Duration};
use tempfile::NamedTempFile;
use tracing::{debug, error, info, warn};
use tracing_subscriber::EnvFilter;

use crate::errors::{Error, Result};
use crate::transform::{Components, TransformSpec};
use crate::types::{attr_split, strp};
use crate::{process_text, render, Operation, PathOptions, ProcessConfig, ReverseMode};

/// Command line arguments
#[derive(Parser)]
#[command(author, version, about, long_about=None)] // Read from Cargo.toml
struct Arguments {
    /// Operation to perform on the path data
    operation: Operation,

    /// File of path data, one path per line ('-' for stdin)
    #[arg(default_value = "-")]
    file: String,

    /// Target output file ('-' for stdout)
    #[arg(short, long, default_value = "-")]
    output: String,

    /// Watch file for changes; update output on change. (FILE must be given)
    #[arg(short, long, requires = "file")]
    watch: bool,

    /// Decimal places to keep in output
    #[arg(long, default_value = "4")]
    decimals: u32,

    /// Don't round output values
    #[arg(long, conflicts_with = "decimals")]
    no_round: bool,

    /// Translation: 'x', 'x,y' or 'x,y,z'
    #[arg(long, allow_hyphen_values = true)]
    translate: Option<Components>,

    /// Rotation in degrees: 'z' or 'x,y,z'
    #[arg(long, allow_hyphen_values = true)]
    rotate: Option<Components>,

    /// Skew in degrees: 'x' or 'x,y'
    #[arg(long, allow_hyphen_values = true)]
    skew: Option<Components>,

    /// Scale factor: 's' or 'x,y' or 'x,y,z'
    #[arg(long, allow_hyphen_values = true)]
    scale: Option<Components>,

    /// Mirror top-to-bottom (rotate 180 degrees about the X axis)
    #[arg(long, conflicts_with = "rotate")]
    flip_x: bool,

    /// Mirror left-to-right (rotate 180 degrees about the Y axis)
    #[arg(long, conflicts_with = "rotate")]
    flip_y: bool,

    /// Transform origin 'x,y' or 'x,y,z' (default: bounding box centre)
    #[arg(long, allow_hyphen_values = true)]
    origin: Option<String>,

    /// Distance along the path for 'point-at-length'
    #[arg(long, default_value = "0", allow_hyphen_values = true)]
    length: f64,

    /// How 'reverse' treats multiple sub-paths
    #[arg(long, default_value = "subpaths")]
    reverse_mode: ReverseMode,

    /// Write output as JSON
    #[arg(long)]
    json: bool,

    /// Log debug information to stderr
    #[arg(short, long)]
    verbose: bool,
}

fn parse_origin(value: &str) -> Result<[f64; 3]> {
    let parts = attr_split(value)
        .map(|v| strp(&v))
        .collect::<Result<Vec<_>>>()?;
    match parts.as_slice() {
        [x, y] => Ok([*x, *y, 0.]),
        [x, y, z] => Ok([*x, *y, *z]),
        _ => Err(Error::InvalidValue("origin".into(), value.into())),
    }
}

/// Settings for one `svgpathops` command-line invocation, as passed to `run()`.
///
/// Where paths are read from and written to lives here; what is done to each
/// path is the embedded `ProcessConfig`.
#[derive(Clone, Debug)]
pub struct Config {
    /// Path to input file, or '-' for stdin
    pub input_path: String,
    /// Path to output file, or '-' for stdout
    pub output_path: String,
    /// Stay monitoring `input_path` for changes (Requires input_path is not stdin)
    pub watch: bool,
    /// Log at debug level unless overridden by `RUST_LOG`
    pub verbose: bool,
    /// process config options
    pub process: ProcessConfig,
}

impl Config {
    fn from_args(args: Arguments) -> Result<Self> {
        if args.watch && args.file == "-" {
            // Should already be enforced by clap validation
            return Err(Error::Cli(
                "A non-stdin file must be provided with -w/--watch argument".into(),
            ));
        }
        if args.file != "-" && args.output != "-" {
            let in_path = Path::new(&args.file);
            let out_path = Path::new(&args.output);
            if out_path.exists()
                && out_path.canonicalize().map_err(Error::from_err)?
                    == in_path.canonicalize().map_err(Error::from_err)?
            {
                return Err(Error::Cli(
                    "Output path must not refer to the same file as the input file.".into(),
                ));
            }
        }

        let rotate = match (args.flip_x, args.flip_y) {
            (false, false) => args.rotate,
            (fx, fy) => Some(Components::List(vec![
                if fx { 180. } else { 0. },
                if fy { 180. } else { 0. },
                0.,
            ])),
        };

        Ok(Self {
            input_path: args.file,
            output_path: args.output,
            watch: args.watch,
            verbose: args.verbose,
            process: ProcessConfig {
                operation: args.operation,
                options: PathOptions {
                    decimals: (!args.no_round).then_some(args.decimals),
                    origin: args.origin.as_deref().map(parse_origin).transpose()?,
                },
                transform: TransformSpec {
                    origin: None,
                    translate: args.translate,
                    rotate,
                    skew: args.skew,
                    scale: args.scale,
                },
                length: args.length,
                reverse: args.reverse_mode,
                json: args.json,
            },
        })
    }

    /// Create a `Config` object set up given a command line string.
    ///
    /// The string is parsed using `shlex::split()`, so values containing
    /// spaces or quotes should be quoted or escaped appropriately.
    pub fn from_cmdline(args: &str) -> Result<Self> {
        let args = shlex::split(args).unwrap_or_default();
        let args = Arguments::try_parse_from(args.iter()).map_err(Error::from_err)?;
        Self::from_args(args)
    }
}

/// Create a `Config` object from process arguments.
pub fn get_config() -> Result<Config> {
    let args = Arguments::parse();
    Config::from_args(args)
}

/// Install a stderr log subscriber, filtered by `RUST_LOG` if set.
fn init_logging(config: &Config) {
    let default = match (config.verbose, config.watch) {
        (true, _) => "debug",
        (false, true) => "info",
        (false, false) => "warn",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    // a subscriber may already be installed, e.g. when run repeatedly in tests
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

/// Process each non-blank line of `reader` as separate path data, writing
/// one result line per path.
///
/// Input without any path data is processed once as an empty path, so it
/// fails (or reports `false` for `valid`) rather than printing nothing.
fn process_lines(reader: impl BufRead, writer: &mut dyn Write, cfg: &ProcessConfig) -> Result<()> {
    let mut emit = |data: &str| -> Result<()> {
        let output = process_text(data, cfg)?;
        writeln!(writer, "{}", render(&output, cfg)?)?;
        Ok(())
    };

    let mut paths = 0;
    for (idx, line) in reader.lines().enumerate() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        paths += 1;
        emit(&line).inspect_err(|e| error!("line {}: {e}", idx + 1))?;
    }
    if paths == 0 {
        emit("")?;
    }
    debug!("processed {paths} path(s)");
    Ok(())
}

/// Process the paths in `input` ('-' for stdin), writing results to
/// `output` ('-' for stdout).
///
/// A named output file is only replaced once every path has succeeded.
pub fn process_file(input: &str, output: &str, cfg: &ProcessConfig) -> Result<()> {
    debug!("{:?} {input} -> {output}", cfg.operation);
    let reader: Box<dyn BufRead> = if input == "-" {
        // lines are answered as they arrive, so interactive use works too
        Box::new(std::io::stdin().lock())
    } else {
        Box::new(BufReader::new(File::open(input)?))
    };

    if output == "-" {
        return process_lines(reader, &mut std::io::stdout().lock(), cfg);
    }
    let mut staged = NamedTempFile::new()?;
    process_lines(reader, &mut staged, cfg)?;
    // copy rather than persist(); the temp dir may be on another filesystem
    fs::copy(staged.path(), output)?;
    Ok(())
}

/// Re-process the input file whenever it changes. Only returns on error.
fn watch(config: &Config) -> Result<()> {
    let input = Path::new(&config.input_path);
    let target = input.canonicalize()?;
    let refresh = || {
        if let Err(e) = process_file(&config.input_path, &config.output_path, &config.process) {
            warn!("{}: {e}", config.input_path);
        }
    };

    let (tx, rx) = channel();
    let mut debouncer = new_debouncer(Duration::from_millis(250), tx).map_err(Error::from_err)?;
    debouncer
        .watcher()
        .watch(input, RecursiveMode::NonRecursive)
        .map_err(Error::from_err)?;

    refresh();
    info!("watching {} for changes", config.input_path);
    for result in rx {
        match result {
            Ok(events) => {
                if events
                    .iter()
                    .any(|ev| ev.path.canonicalize().is_ok_and(|p| p == target))
                {
                    info!("{} changed", config.input_path);
                    refresh();
                }
            }
            Err(e) => warn!("watch error: {e:?}"),
        }
    }
    Err(Error::Cli("file watcher stopped".into()))
}

/// Run the `svgpathops` program with a given `Config`.
pub fn run(config: Config) -> Result<()> {
    init_logging(&config);
    if config.watch {
        watch(&config)
    } else {
        process_file(&config.input_path, &config.output_path, &config.process)
    }
}
