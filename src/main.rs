use anyhow::Context as _;
use clap::{error::ErrorKind, CommandFactory as _, Parser};
use env_logger::Builder;
use log::LevelFilter;
use segalign::{
    algorithm::Aligner,
    basic_terminal::{print_json, print_side_by_side, print_summary},
    config::{read_config_file, Config, ConfigOpt, OutputMode},
    input::read_file_list,
    validate::{print_errors, validate},
};
use std::io::{stdout, Write as _};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(arg_required_else_help(true))]
struct Args {
    #[arg(required = true, value_names = ["CANONICAL1", "LEGACY1", "CANONICAL2", "LEGACY2"])]
    files: Vec<String>,

    /// Config file to read instead of the default location.
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Repeat to log more (-v info, -vv debug, -vvv trace).
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(flatten)]
    config_opt: ConfigOpt,
}

fn init_logging(verbose: u8) {
    let log_level = match verbose {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        2 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    };

    Builder::new()
        .filter_level(log_level)
        .format(|buf, record| writeln!(buf, "[{}] {}", record.level(), record.args()))
        .init();
}

fn try_main() -> anyhow::Result<()> {
    let args = Args::parse();
    init_logging(args.verbose);

    if args.files.len() % 2 != 0 {
        Args::command()
            .error(ErrorKind::TooFewValues, "File count must be even")
            .exit();
    }

    let config = Config::default()
        .update(read_config_file(args.config.as_deref())?)
        .update(args.config_opt);
    let aligner = Aligner::new(config.aligner_config().context("invalid alignment configuration")?);

    let input = read_file_list(&args.files)?;
    let alignments = aligner.align_batch(&input.pairs);

    let mut output = stdout().lock();
    for ((alignment, (canonical, legacy)), file_names) in alignments.iter().zip(&input.pairs).zip(&input.file_names) {
        print_errors(&validate(alignment, canonical, legacy));

        match config.mode {
            OutputMode::Debug => writeln!(output, "{alignment:#?}")?,
            OutputMode::Json => print_json(alignment, file_names, &mut output)?,
            OutputMode::Table => {
                writeln!(output, "=== {} <-> {}", file_names[0], file_names[1])?;
                print_side_by_side(alignment, canonical, legacy, config.column_width, config.color, &mut output)?;
                print_summary(alignment, &mut output)?;
            }
        }
    }

    Ok(())
}

fn main() {
    // Returning Result from main would print the error with Debug, not Display.
    if let Err(e) = try_main() {
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    }
}
