//! # `maxsat-bench`
//!
//! Benchmark the MaxSAT search strategies on a DIMACS CNF file, on a file from a directory of
//! benchmarks, or on randomly generated formulas. Prints the per-run measurements and runtime
//! statistics per strategy. Exits with an error if the strategies disagree on a cost.
//!
//! Usage: maxsat-bench [OPTIONS] [IN_PATH]
//!
//! Logging is controlled through the `RUST_LOG` environment variable.

use std::{
    fmt,
    fs::File,
    io::{self, BufWriter, IsTerminal, Write},
    path::PathBuf,
};

use clap::{Parser, ValueEnum};
use maxsat_reduce::algs::maxsat;
use maxsat_reduce_tools::{
    harness::{self, BenchConfig, Input},
    report::{self, Row},
};
use termcolor::{BufferWriter, Color, ColorSpec, WriteColor};

struct Cli {
    config: BenchConfig,
    csv_path: Option<PathBuf>,
    stdout: BufferWriter,
    stderr: BufferWriter,
}

fn color_choice(choice: concolor_clap::ColorChoice, is_terminal: bool) -> termcolor::ColorChoice {
    match choice {
        concolor_clap::ColorChoice::Always => termcolor::ColorChoice::Always,
        concolor_clap::ColorChoice::Never => termcolor::ColorChoice::Never,
        concolor_clap::ColorChoice::Auto => {
            if is_terminal {
                termcolor::ColorChoice::Auto
            } else {
                termcolor::ColorChoice::Never
            }
        }
    }
}

impl Cli {
    fn init() -> Self {
        let args = Args::parse();
        let input = if let Some(path) = args.in_path {
            Input::File(path)
        } else if let Some(dir) = args.collection {
            Input::Collection {
                dir,
                index: args.index,
            }
        } else {
            Input::Generated {
                n_vars: args.n_vars,
                n_clauses: args.n_clauses,
                iterations: args.iterations,
                seed: args.seed,
                write_dir: args.write_dir,
            }
        };
        let strategies = if args.strategy.is_empty() {
            maxsat::Strategy::ALL.to_vec()
        } else {
            args.strategy.into_iter().map(maxsat::Strategy::from).collect()
        };
        Self {
            config: BenchConfig {
                input,
                strategies,
                validate: args.validate,
            },
            csv_path: args.csv,
            stdout: BufferWriter::stdout(color_choice(
                args.color.color,
                io::stdout().is_terminal(),
            )),
            stderr: BufferWriter::stderr(color_choice(
                args.color.color,
                io::stderr().is_terminal(),
            )),
        }
    }

    fn message(writer: &BufferWriter, tag: &str, color: Color, msg: &str) -> io::Result<()> {
        let mut buffer = writer.buffer();
        buffer.set_color(ColorSpec::new().set_bold(true).set_fg(Some(color)))?;
        write!(&mut buffer, "{tag}")?;
        buffer.reset()?;
        buffer.set_color(ColorSpec::new().set_bold(true))?;
        write!(&mut buffer, ": ")?;
        buffer.reset()?;
        writeln!(&mut buffer, "{msg}")?;
        writer.print(&buffer)
    }

    fn info(&self, msg: &str) -> io::Result<()> {
        Self::message(&self.stdout, "info", Color::Blue, msg)
    }

    fn error(&self, err: &anyhow::Error) -> io::Result<()> {
        Self::message(&self.stderr, "error", Color::Red, &format!("{err:#}"))
    }

    fn print_report(&self, rows: &[Row]) -> io::Result<()> {
        let mut buffer = self.stdout.buffer();
        Self::start_block(&mut buffer)?;
        report::write_table(&mut buffer, rows)?;
        Self::end_block(&mut buffer)?;
        Self::start_block(&mut buffer)?;
        report::write_summary(&mut buffer, rows)?;
        Self::end_block(&mut buffer)?;
        self.stdout.print(&buffer)
    }

    fn start_block<W: WriteColor>(buffer: &mut W) -> io::Result<()> {
        buffer.set_color(ColorSpec::new().set_dimmed(true))?;
        write!(buffer, ">>>>>")?;
        buffer.reset()?;
        writeln!(buffer)
    }

    fn end_block<W: WriteColor>(buffer: &mut W) -> io::Result<()> {
        buffer.set_color(ColorSpec::new().set_dimmed(true))?;
        write!(buffer, "<<<<<")?;
        buffer.reset()?;
        writeln!(buffer)
    }
}

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// The DIMACS CNF file to solve. If neither a file nor a collection is given, random
    /// formulas are generated.
    #[arg(conflicts_with = "collection")]
    in_path: Option<PathBuf>,
    /// A directory of `.cnf` files to pick the instance from
    #[arg(long)]
    collection: Option<PathBuf>,
    /// The index of the instance in the sorted collection
    #[arg(long, default_value_t = 0, requires = "collection")]
    index: usize,
    /// The number of variables of generated formulas
    #[arg(long, default_value_t = 20)]
    n_vars: u32,
    /// The number of clauses of generated formulas
    #[arg(long, default_value_t = 50)]
    n_clauses: usize,
    /// The number of generated formulas
    #[arg(long, default_value_t = 5)]
    iterations: usize,
    /// The seed of the first generated formula, further formulas use the following seeds
    /// (wrapping around at the largest seed)
    #[arg(long, default_value_t = 0)]
    seed: u64,
    /// Write the generated formulas to this directory
    #[arg(long)]
    write_dir: Option<PathBuf>,
    /// The strategies to run. Can be given multiple times, defaults to all strategies.
    #[arg(long, short = 's')]
    strategy: Vec<Strategy>,
    /// Cross-check every cost with an exact branch and bound search
    #[arg(long)]
    validate: bool,
    /// Write the raw measurements as CSV to this path
    #[arg(long)]
    csv: Option<PathBuf>,
    #[command(flatten)]
    color: concolor_clap::Color,
}

#[derive(Copy, Clone, PartialEq, Eq, ValueEnum)]
enum Strategy {
    /// Test bounds from the number of clauses downwards
    Descending,
    /// Test bounds from zero upwards
    Ascending,
    /// Binary search over the bounds
    Binary,
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Strategy::Descending => write!(f, "descending"),
            Strategy::Ascending => write!(f, "ascending"),
            Strategy::Binary => write!(f, "binary"),
        }
    }
}

impl From<Strategy> for maxsat::Strategy {
    fn from(value: Strategy) -> Self {
        match value {
            Strategy::Descending => maxsat::Strategy::DescendingRelaxation,
            Strategy::Ascending => maxsat::Strategy::AscendingTightening,
            Strategy::Binary => maxsat::Strategy::BinarySearch,
        }
    }
}

macro_rules! handle_error {
    ($res:expr, $cli:expr) => {{
        match $res {
            Ok(val) => val,
            Err(err) => {
                let err = anyhow::Error::from(err);
                $cli.error(&err)?;
                return Err(err);
            }
        }
    }};
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let cli = Cli::init();

    match &cli.config.input {
        Input::File(path) => cli.info(&format!("solving {}", path.display()))?,
        Input::Collection { dir, index } => {
            cli.info(&format!("solving instance {index} of {}", dir.display()))?;
        }
        Input::Generated {
            n_vars,
            n_clauses,
            iterations,
            seed,
            ..
        } => cli.info(&format!(
            "generating {iterations} formulas with {n_vars} variables and {n_clauses} clauses from seed {seed}"
        ))?,
    }

    let rows = handle_error!(harness::run(&cli.config), cli);
    cli.print_report(&rows)?;

    if let Some(path) = &cli.csv_path {
        let mut writer = BufWriter::new(handle_error!(File::create(path), cli));
        handle_error!(report::write_csv(&mut writer, &rows), cli);
        cli.info(&format!("wrote measurements to {}", path.display()))?;
    }
    Ok(())
}
