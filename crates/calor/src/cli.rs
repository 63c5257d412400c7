//! The `calor` command line.
//!
//! ```text
//! calor run --nx 50 --ny 20 --alpha 1.0 --boundary dirichlet --x-min 100 \
//!     --max-time 25 --format csv --every 10 --output heat.csv
//! ```
//!
//! Flags are parsed by hand into [`RunArgs`]. A `--config` file, when
//! given, supplies the base [`SimulationConfig`] and the remaining flags
//! override it. Exit codes: 0 on completion, 1 when the run fails, 2 for
//! bad usage or an invalid configuration.

use std::error::Error;
use std::fmt;
use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::time::Instant;

use anyhow::{Context, Result};
use calor_core::{Coord, ErrorKind};
use calor_engine::{
    HeldCell, RunError, SchemeKind, SimulationConfig, SimulationRunner, TimeStep,
};
use calor_grid::{Conductivity, GridDims, InitialField, Spacing, ALLOY_CONSTANTS};
use calor_solver::{BoundaryPolicy, EdgeValues};

use crate::config_file::ConfigFile;
use crate::report::{make_sink, OutputFormat};

/// Usage text for `calor help`.
pub const USAGE: &str = "\
usage: calor run [flags]

grid:
  --nx <n>                columns (required without --config)
  --ny <n>                rows; omit for a 1D rod
  --dx <h>, --dy <h>      cell spacing (default 1; dy defaults to dx)

physics and stepping:
  --alpha <a>             thermal diffusivity (default 1)
  --dt <value|auto>       time step (default auto)
  --scheme <explicit|implicit>
  --no-stability-check    allow explicit steps above the stability bound
  --parallel              row-parallel cell updates

boundaries:
  --boundary <dirichlet|neumann|periodic>
  --edge-value <v>        every Dirichlet edge
  --x-min, --x-max, --y-min, --y-max <v>

initial field:
  --initial <v>           uniform value (noise base with --noise)
  --initial-file <path>   whitespace or comma separated values, row-major
  --noise <amplitude>     seeded uniform noise
  --seed <n>
  --fix <row,col=v>       hold a cell at v (or <i=v> in 1D); repeatable

material:
  --alloy <seed>          three-metal alloy with a seeded composition per cell
  --c1, --c2, --c3 <k>    the metals' thermal constants (default 0.75, 1, 1.25)

stop criteria (at least one):
  --max-iterations <n>
  --max-time <t>
  --tolerance <eps>       steady state once no cell changes by eps

output:
  --format <summary|csv|jsonl>
  --every <n>             write every n-th step
  --output <path>         write to a file instead of stdout

  --config <path>         JSON config file; flags override it
";

// ── UsageError ─────────────────────────────────────────────────────

/// Malformed command line.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum UsageError {
    /// No subcommand was given.
    MissingCommand,
    /// The subcommand is not recognised.
    UnknownCommand(String),
    /// The flag is not recognised.
    UnknownFlag(String),
    /// The flag needs a value and none followed.
    MissingValue {
        /// The flag.
        flag: String,
    },
    /// The flag's value could not be parsed.
    InvalidValue {
        /// The flag.
        flag: String,
        /// The rejected value.
        value: String,
    },
    /// A required flag is absent.
    MissingFlag {
        /// The flag.
        flag: &'static str,
    },
    /// Two flags cannot be combined.
    Conflict {
        /// The flag being rejected.
        flag: &'static str,
        /// Why.
        reason: &'static str,
    },
}

impl fmt::Display for UsageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingCommand => write!(f, "missing command (try 'calor help')"),
            Self::UnknownCommand(c) => write!(f, "unknown command '{c}'"),
            Self::UnknownFlag(flag) => write!(f, "unknown flag '{flag}'"),
            Self::MissingValue { flag } => write!(f, "{flag} needs a value"),
            Self::InvalidValue { flag, value } => {
                write!(f, "invalid value for {flag}: '{value}'")
            }
            Self::MissingFlag { flag } => write!(f, "{flag} is required"),
            Self::Conflict { flag, reason } => write!(f, "{flag}: {reason}"),
        }
    }
}

impl Error for UsageError {}

// ── Arguments ──────────────────────────────────────────────────────

/// Boundary selection on the command line.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BoundaryKind {
    /// Fixed edge temperatures.
    Dirichlet,
    /// Insulated edges.
    Neumann,
    /// Wrapping edges.
    Periodic,
}

/// Everything `calor run` accepts. `None` means "not given".
#[derive(Clone, Debug, Default, PartialEq)]
pub struct RunArgs {
    /// `--config`
    pub config: Option<PathBuf>,
    /// `--nx`
    pub nx: Option<usize>,
    /// `--ny`
    pub ny: Option<usize>,
    /// `--dx`
    pub dx: Option<f64>,
    /// `--dy`
    pub dy: Option<f64>,
    /// `--alpha`
    pub alpha: Option<f64>,
    /// `--dt`
    pub dt: Option<TimeStep>,
    /// `--scheme`
    pub scheme: Option<SchemeKind>,
    /// `--no-stability-check`
    pub no_stability_check: bool,
    /// `--parallel`
    pub parallel: bool,
    /// `--boundary`
    pub boundary: Option<BoundaryKind>,
    /// `--edge-value`
    pub edge_value: Option<f64>,
    /// `--x-min`
    pub x_min: Option<f64>,
    /// `--x-max`
    pub x_max: Option<f64>,
    /// `--y-min`
    pub y_min: Option<f64>,
    /// `--y-max`
    pub y_max: Option<f64>,
    /// `--initial`
    pub initial: Option<f64>,
    /// `--initial-file`
    pub initial_file: Option<PathBuf>,
    /// `--noise`
    pub noise: Option<f64>,
    /// `--seed`
    pub seed: Option<u64>,
    /// `--fix`, in order.
    pub fix: Vec<HeldCell>,
    /// `--alloy`
    pub alloy: Option<u64>,
    /// `--c1`, `--c2`, `--c3`
    pub alloy_constants: [Option<f64>; 3],
    /// `--max-iterations`
    pub max_iterations: Option<u64>,
    /// `--max-time`
    pub max_time: Option<f64>,
    /// `--tolerance`
    pub tolerance: Option<f64>,
    /// `--format`
    pub format: OutputFormat,
    /// `--every`
    pub every: Option<u64>,
    /// `--output`
    pub output: Option<PathBuf>,
}

/// A parsed command line.
#[derive(Clone, Debug, PartialEq)]
pub enum Command {
    /// `calor run ...`
    Run(Box<RunArgs>),
    /// `calor help`, `-h`, `--help`
    Help,
    /// `calor version`, `-V`, `--version`
    Version,
}

fn value_of<I: Iterator<Item = String>>(
    flag: &str,
    inline: Option<String>,
    args: &mut I,
) -> Result<String, UsageError> {
    match inline {
        Some(v) => Ok(v),
        None => args.next().ok_or_else(|| UsageError::MissingValue {
            flag: flag.to_string(),
        }),
    }
}

fn parse_value<T: std::str::FromStr>(flag: &str, value: String) -> Result<T, UsageError> {
    value
        .parse::<T>()
        .map_err(|_| UsageError::InvalidValue {
            flag: flag.to_string(),
            value,
        })
}

/// Parse `row,col=value` or `i=value`.
pub fn parse_fix(spec: &str) -> Result<HeldCell, UsageError> {
    let invalid = || UsageError::InvalidValue {
        flag: "--fix".to_string(),
        value: spec.to_string(),
    };
    let (coord, value) = spec.split_once('=').ok_or_else(invalid)?;
    let value: f64 = value.trim().parse().map_err(|_| invalid())?;
    let coord = coord
        .split(',')
        .map(|c| c.trim().parse::<i32>())
        .collect::<Result<Coord, _>>()
        .map_err(|_| invalid())?;
    if coord.is_empty() || coord.len() > 2 {
        return Err(invalid());
    }
    Ok(HeldCell::new(coord, value))
}

/// Parse the arguments after the program name.
pub fn parse_args<I: IntoIterator<Item = String>>(args: I) -> Result<Command, UsageError> {
    let mut args = args.into_iter();
    let command = args.next().ok_or(UsageError::MissingCommand)?;
    match command.as_str() {
        "run" => {}
        "help" | "-h" | "--help" => return Ok(Command::Help),
        "version" | "-V" | "--version" => return Ok(Command::Version),
        _ => return Err(UsageError::UnknownCommand(command)),
    }

    let mut run = RunArgs::default();
    while let Some(arg) = args.next() {
        let (flag, inline) = match arg.split_once('=') {
            Some((f, v)) if f.starts_with("--") => (f.to_string(), Some(v.to_string())),
            _ => (arg, None),
        };
        let f = flag.as_str();
        match f {
            "--no-stability-check" => run.no_stability_check = true,
            "--parallel" => run.parallel = true,
            "-h" | "--help" => return Ok(Command::Help),
            _ if !f.starts_with("--") => return Err(UsageError::UnknownFlag(flag)),
            _ => {
                let value = value_of(f, inline, &mut args)?;
                match f {
                    "--config" => run.config = Some(PathBuf::from(value)),
                    "--nx" => run.nx = Some(parse_value(f, value)?),
                    "--ny" => run.ny = Some(parse_value(f, value)?),
                    "--dx" => run.dx = Some(parse_value(f, value)?),
                    "--dy" => run.dy = Some(parse_value(f, value)?),
                    "--alpha" => run.alpha = Some(parse_value(f, value)?),
                    "--dt" => {
                        run.dt = Some(if value == "auto" {
                            TimeStep::Auto
                        } else {
                            TimeStep::Fixed(parse_value(f, value)?)
                        })
                    }
                    "--scheme" => {
                        run.scheme = Some(match value.as_str() {
                            "explicit" => SchemeKind::Explicit,
                            "implicit" => SchemeKind::implicit(),
                            _ => return Err(invalid(f, value)),
                        })
                    }
                    "--boundary" => {
                        run.boundary = Some(match value.as_str() {
                            "dirichlet" => BoundaryKind::Dirichlet,
                            "neumann" => BoundaryKind::Neumann,
                            "periodic" => BoundaryKind::Periodic,
                            _ => return Err(invalid(f, value)),
                        })
                    }
                    "--edge-value" => run.edge_value = Some(parse_value(f, value)?),
                    "--x-min" => run.x_min = Some(parse_value(f, value)?),
                    "--x-max" => run.x_max = Some(parse_value(f, value)?),
                    "--y-min" => run.y_min = Some(parse_value(f, value)?),
                    "--y-max" => run.y_max = Some(parse_value(f, value)?),
                    "--initial" => run.initial = Some(parse_value(f, value)?),
                    "--initial-file" => run.initial_file = Some(PathBuf::from(value)),
                    "--noise" => run.noise = Some(parse_value(f, value)?),
                    "--seed" => run.seed = Some(parse_value(f, value)?),
                    "--fix" => run.fix.push(parse_fix(&value)?),
                    "--alloy" => run.alloy = Some(parse_value(f, value)?),
                    "--c1" => run.alloy_constants[0] = Some(parse_value(f, value)?),
                    "--c2" => run.alloy_constants[1] = Some(parse_value(f, value)?),
                    "--c3" => run.alloy_constants[2] = Some(parse_value(f, value)?),
                    "--max-iterations" => run.max_iterations = Some(parse_value(f, value)?),
                    "--max-time" => run.max_time = Some(parse_value(f, value)?),
                    "--tolerance" => run.tolerance = Some(parse_value(f, value)?),
                    "--format" => {
                        run.format = value.parse().map_err(|_| invalid(f, value))?;
                    }
                    "--every" => match parse_value::<u64>(f, value.clone())? {
                        0 => return Err(invalid(f, value)),
                        n => run.every = Some(n),
                    },
                    "--output" => run.output = Some(PathBuf::from(value)),
                    _ => return Err(UsageError::UnknownFlag(flag)),
                }
            }
        }
    }
    Ok(Command::Run(Box::new(run)))
}

fn invalid(flag: &str, value: String) -> UsageError {
    UsageError::InvalidValue {
        flag: flag.to_string(),
        value,
    }
}

// ── Config assembly ────────────────────────────────────────────────

/// Read whitespace- or comma-separated temperatures.
pub fn read_values(path: &Path) -> Result<Vec<f64>> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("cannot read initial field {}", path.display()))?;
    text.split(|c: char| c.is_whitespace() || c == ',')
        .filter(|t| !t.is_empty())
        .enumerate()
        .map(|(i, t)| {
            t.parse::<f64>()
                .with_context(|| format!("{}: value {i} ('{t}') is not a number", path.display()))
        })
        .collect()
}

/// Combine the config file (if any) with the flags.
///
/// The result is not validated; [`SimulationRunner::start`] does that.
pub fn build_config(args: &RunArgs) -> Result<SimulationConfig> {
    let mut config = match &args.config {
        Some(path) => ConfigFile::load(path)?.into_config(),
        None => {
            let nx = args.nx.ok_or(UsageError::MissingFlag { flag: "--nx" })?;
            let dims = match args.ny {
                Some(ny) => GridDims::plane(nx, ny),
                None => GridDims::line(nx),
            };
            SimulationConfig::new(dims, Spacing::uniform(1.0), 1.0)
        }
    };

    // 1. Geometry.
    if args.nx.is_some() || args.ny.is_some() {
        let nx = args.nx.unwrap_or(config.dims.nx());
        config.dims = match args.ny.or(config.dims.ny()) {
            Some(ny) => GridDims::plane(nx, ny),
            None => GridDims::line(nx),
        };
    }
    if let Some(dx) = args.dx {
        config.spacing.dx = dx;
        if args.dy.is_none() && args.config.is_none() {
            config.spacing.dy = dx;
        }
    }
    if let Some(dy) = args.dy {
        config.spacing.dy = dy;
    }

    // 2. Physics and stepping.
    if let Some(alpha) = args.alpha {
        config.alpha = alpha;
    }
    if let Some(dt) = args.dt {
        config.time_step = dt;
    }
    if let Some(scheme) = args.scheme {
        let keep = matches!(
            (scheme, config.scheme),
            (SchemeKind::Implicit { .. }, SchemeKind::Implicit { .. })
        );
        if !keep {
            config.scheme = scheme;
        }
    }
    if args.no_stability_check {
        config.stability_check = false;
    }
    if args.parallel {
        config.parallel = true;
    }

    // 3. Boundaries.
    let edges = [args.edge_value, args.x_min, args.x_max, args.y_min, args.y_max];
    let kind = args.boundary.unwrap_or(match config.boundary {
        BoundaryPolicy::Dirichlet(_) => BoundaryKind::Dirichlet,
        BoundaryPolicy::Neumann => BoundaryKind::Neumann,
        BoundaryPolicy::Periodic => BoundaryKind::Periodic,
    });
    config.boundary = match kind {
        BoundaryKind::Dirichlet => {
            let mut values = match config.boundary {
                BoundaryPolicy::Dirichlet(v) => v,
                _ => EdgeValues::uniform(0.0),
            };
            if let Some(v) = args.edge_value {
                values = EdgeValues::uniform(v);
            }
            values.x_min = args.x_min.unwrap_or(values.x_min);
            values.x_max = args.x_max.unwrap_or(values.x_max);
            values.y_min = args.y_min.unwrap_or(values.y_min);
            values.y_max = args.y_max.unwrap_or(values.y_max);
            BoundaryPolicy::Dirichlet(values)
        }
        _ if edges.iter().any(Option::is_some) => {
            return Err(UsageError::Conflict {
                flag: "--edge-value",
                reason: "edge values need --boundary dirichlet",
            }
            .into());
        }
        BoundaryKind::Neumann => BoundaryPolicy::Neumann,
        BoundaryKind::Periodic => BoundaryPolicy::Periodic,
    };

    // 4. Initial field.
    if let Some(path) = &args.initial_file {
        if args.initial.is_some() || args.noise.is_some() {
            return Err(UsageError::Conflict {
                flag: "--initial-file",
                reason: "cannot be combined with --initial or --noise",
            }
            .into());
        }
        config.initial = InitialField::Values(read_values(path)?);
    } else if let Some(amplitude) = args.noise {
        config.initial = InitialField::Noise {
            base: args.initial.unwrap_or(0.0),
            amplitude,
            seed: args.seed.unwrap_or(0),
        };
    } else if let Some(v) = args.initial {
        config.initial = InitialField::Uniform(v);
    }
    config.held.extend(args.fix.iter().cloned());

    // 5. Material.
    if args.alloy.is_some() || args.alloy_constants.iter().any(Option::is_some) {
        let (mut constants, seed) = match config.conductivity {
            Conductivity::Alloy { constants, seed } => (constants, seed),
            _ => (ALLOY_CONSTANTS, 0),
        };
        for (c, arg) in constants.iter_mut().zip(args.alloy_constants) {
            *c = arg.unwrap_or(*c);
        }
        config.conductivity = Conductivity::Alloy {
            constants,
            seed: args.alloy.unwrap_or(seed),
        };
    }

    // 6. Stop criteria.
    if args.max_iterations.is_some() {
        config.stop.max_iterations = args.max_iterations;
    }
    if args.max_time.is_some() {
        config.stop.max_time = args.max_time;
    }
    if args.tolerance.is_some() {
        config.stop.tolerance = args.tolerance;
    }

    Ok(config)
}

// ── Entry point ────────────────────────────────────────────────────

/// Exit code for a failure: 2 for usage and configuration problems, 1 for
/// runs that started and then failed.
pub fn exit_code_for(err: &anyhow::Error) -> u8 {
    match err.downcast_ref::<RunError>() {
        Some(e) if e.kind() != ErrorKind::InvalidConfiguration => 1,
        _ => 2,
    }
}

/// Run the CLI on `args` (program name excluded).
pub fn main<I: IntoIterator<Item = String>>(args: I) -> ExitCode {
    match try_main(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("calor: {err:#}");
            ExitCode::from(exit_code_for(&err))
        }
    }
}

fn try_main<I: IntoIterator<Item = String>>(args: I) -> Result<()> {
    match parse_args(args)? {
        Command::Help => {
            print!("{USAGE}");
            Ok(())
        }
        Command::Version => {
            println!("calor {}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
        Command::Run(run) => run_simulation(&run),
    }
}

fn run_simulation(args: &RunArgs) -> Result<()> {
    let config = build_config(args)?;

    let stdout = io::stdout();
    let out: Box<dyn Write> = match &args.output {
        Some(path) => Box::new(BufWriter::new(
            File::create(path)
                .with_context(|| format!("cannot create output {}", path.display()))?,
        )),
        None => Box::new(BufWriter::new(stdout.lock())),
    };
    let mut sink = make_sink(args.format, args.every, out);

    let mut runner = SimulationRunner::new(config);
    let started = Instant::now();
    let result = runner.run(sink.as_mut());
    let wall = started.elapsed();
    drop(sink);

    let outcome = result?;
    eprintln!(
        "calor: {} after {} steps, t = {}, {:.1} ms ({} solver sweeps, peak change {:.3e})",
        outcome.reason,
        outcome.metrics.steps,
        outcome.final_snapshot.elapsed_time,
        wall.as_secs_f64() * 1e3,
        outcome.metrics.total_sweeps,
        outcome.metrics.peak_max_delta,
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use calor_engine::StopCriteria;
    use smallvec::smallvec;

    fn args(s: &str) -> Vec<String> {
        s.split_whitespace().map(String::from).collect()
    }

    fn run_args(s: &str) -> RunArgs {
        match parse_args(args(s)).unwrap() {
            Command::Run(run) => *run,
            other => panic!("expected run, got {other:?}"),
        }
    }

    #[test]
    fn parses_commands() {
        assert_eq!(parse_args(args("help")), Ok(Command::Help));
        assert_eq!(parse_args(args("--version")), Ok(Command::Version));
        assert_eq!(parse_args(args("")), Err(UsageError::MissingCommand));
        assert_eq!(
            parse_args(args("walk")),
            Err(UsageError::UnknownCommand("walk".into()))
        );
    }

    #[test]
    fn parses_run_flags() {
        let run = run_args(
            "run --nx 5 --ny=3 --dx 0.5 --alpha 2 --dt auto --scheme implicit \
             --boundary neumann --fix 1,2=40 --fix 0,0=-1.5 --max-time 3 \
             --format csv --every 10 --parallel --no-stability-check",
        );
        assert_eq!(run.nx, Some(5));
        assert_eq!(run.ny, Some(3));
        assert_eq!(run.dx, Some(0.5));
        assert_eq!(run.alpha, Some(2.0));
        assert_eq!(run.dt, Some(TimeStep::Auto));
        assert_eq!(run.scheme, Some(SchemeKind::implicit()));
        assert_eq!(run.boundary, Some(BoundaryKind::Neumann));
        assert_eq!(run.fix.len(), 2);
        assert_eq!(run.fix[1].value, -1.5);
        assert_eq!(run.max_time, Some(3.0));
        assert_eq!(run.format, OutputFormat::Csv);
        assert_eq!(run.every, Some(10));
        assert!(run.parallel);
        assert!(run.no_stability_check);
    }

    #[test]
    fn rejects_bad_flags() {
        assert_eq!(
            parse_args(args("run --nx")),
            Err(UsageError::MissingValue {
                flag: "--nx".into()
            })
        );
        assert_eq!(
            parse_args(args("run --nx five")),
            Err(UsageError::InvalidValue {
                flag: "--nx".into(),
                value: "five".into()
            })
        );
        assert_eq!(
            parse_args(args("run --speed 3")),
            Err(UsageError::UnknownFlag("--speed".into()))
        );
        assert!(parse_args(args("run --every 0")).is_err());
        assert!(parse_args(args("run --boundary sticky")).is_err());
        assert!(parse_args(args("run --format xml")).is_err());
    }

    #[test]
    fn fix_syntax() {
        let cell = parse_fix("3=12.5").unwrap();
        assert_eq!(cell.coord, { let c: Coord = smallvec![3]; c });
        assert_eq!(cell.value, 12.5);
        let cell = parse_fix(" 1 , 2 = 7 ").unwrap();
        assert_eq!(cell.coord, { let c: Coord = smallvec![1, 2]; c });
        for bad in ["3", "=1", "a=1", "1,2,3=1", "1=x"] {
            assert!(parse_fix(bad).is_err(), "{bad}");
        }
    }

    #[test]
    fn flags_build_a_config() {
        let run = run_args(
            "run --nx 4 --ny 2 --dx 0.5 --alpha 0.1 --dt 0.01 --x-min 100 \
             --initial 20 --noise 2 --seed 5 --fix 1,1=80 --max-iterations 9 --tolerance 1e-4",
        );
        let config = build_config(&run).unwrap();
        assert_eq!(config.dims, GridDims::plane(4, 2));
        assert_eq!(config.spacing, Spacing::uniform(0.5));
        assert_eq!(config.alpha, 0.1);
        assert_eq!(config.time_step, TimeStep::Fixed(0.01));
        assert_eq!(
            config.boundary,
            BoundaryPolicy::Dirichlet(EdgeValues {
                x_min: 100.0,
                x_max: 0.0,
                y_min: 0.0,
                y_max: 0.0,
            })
        );
        assert_eq!(
            config.initial,
            InitialField::Noise {
                base: 20.0,
                amplitude: 2.0,
                seed: 5
            }
        );
        assert_eq!(config.held.len(), 1);
        assert_eq!(
            config.stop,
            StopCriteria {
                max_iterations: Some(9),
                max_time: None,
                tolerance: Some(1e-4),
            }
        );
        assert!(config.validate().is_ok());
    }

    #[test]
    fn alloy_flags_select_per_cell_conductivity() {
        let config = build_config(&run_args("run --nx 4 --alloy 9 --max-iterations 1")).unwrap();
        assert_eq!(config.conductivity, Conductivity::alloy(9));

        let config = build_config(&run_args("run --nx 4 --c3 2.5 --max-iterations 1")).unwrap();
        assert_eq!(
            config.conductivity,
            Conductivity::Alloy {
                constants: [0.75, 1.0, 2.5],
                seed: 0
            }
        );

        let config = build_config(&run_args("run --nx 4 --max-iterations 1")).unwrap();
        assert!(config.conductivity.is_uniform());
    }

    #[test]
    fn nx_is_required_without_a_config_file() {
        let err = build_config(&run_args("run --max-iterations 1")).unwrap_err();
        assert_eq!(exit_code_for(&err), 2);
        assert!(err.to_string().contains("--nx"));
    }

    #[test]
    fn edge_values_need_dirichlet() {
        let err = build_config(&run_args("run --nx 3 --boundary periodic --x-min 1")).unwrap_err();
        assert!(err.downcast_ref::<UsageError>().is_some());
    }

    #[test]
    fn exit_codes_follow_error_kind() {
        let config_err: anyhow::Error =
            RunError::from(calor_engine::ConfigError::NoStopCriterion).into();
        assert_eq!(exit_code_for(&config_err), 2);
        let step_err: anyhow::Error =
            RunError::from(calor_core::StepError::InvalidTimeStep { dt: 2.0 }).into();
        assert_eq!(exit_code_for(&step_err), 2);
        let unstable: anyhow::Error = RunError::from(calor_core::StepError::NumericalInstability {
            dt: 2.0,
            dt_max: 1.0,
        })
        .into();
        assert_eq!(exit_code_for(&unstable), 1);
    }
}
