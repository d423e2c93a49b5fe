use std::{
    ffi::OsStr,
    fs::read_to_string,
    path::{Path, PathBuf},
    time::Instant,
};

use clap::Parser;
use regex::Regex;
use segalign::{
    algorithm::Aligner,
    config::{read_config_file, Config},
    input::{parse_canonical, parse_legacy},
};

#[derive(Debug)]
struct Testcase {
    canonical: PathBuf,
    legacy: PathBuf,
}

#[derive(Parser)]
struct Args {
    testcase_directory: String,

    #[arg(short, long, default_value_t = String::from(""))]
    filter: String,

    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let regex = Regex::new(&args.filter)?;
    let config = Config::default().update(read_config_file(args.config.as_deref())?);
    let aligner = Aligner::new(config.aligner_config()?);

    let mut testcases = vec![];
    let directory = Path::new(&args.testcase_directory);
    let files = std::fs::read_dir(directory)?;
    for file in files {
        let path = file?.path();
        if path.extension() != Some(OsStr::new("canonical")) {
            continue;
        }

        if path
            .file_stem()
            .and_then(OsStr::to_str)
            .map(|s: &str| regex.is_match(s))
            != Some(true)
        {
            continue;
        }
        let canonical = path;
        let mut legacy = canonical.clone();
        legacy.set_extension("legacy");
        if !legacy.exists() {
            continue;
        }

        testcases.push(Testcase { canonical, legacy });
    }
    testcases.sort_by(|a, b| a.canonical.cmp(&b.canonical));

    for testcase in testcases {
        println!("Align {:?} vs {:?}", testcase.canonical, testcase.legacy);

        let canonical = parse_canonical(&read_to_string(&testcase.canonical)?);
        let legacy = parse_legacy(&read_to_string(&testcase.legacy)?);

        let start = Instant::now();
        let alignment = aligner.align(&canonical, &legacy);
        let elapsed = start.elapsed();

        println!(
            "{}x{} segments in {:.3} ms, optimal score {:.4}",
            canonical.len(),
            legacy.len(),
            elapsed.as_secs_f64() * 1000.0,
            aligner.optimal_score(&canonical, &legacy)
        );
        for (status, count) in alignment.counts().filter(|&(_, count)| count > 0) {
            println!("  {status}: {count}");
        }
    }

    Ok(())
}
