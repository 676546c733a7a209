//! Rank the most frequent IPv4 addresses in one or more input streams.
//!
//! Reads one address per line from the given files (or stdin when none are
//! given) and prints the top-K addresses, highest count first.
//!
//! Run with: cargo run --bin iprank --features cli -- access.log --top 10 --with-counts

use std::fs::File;
use std::io::{self, BufRead, BufReader, Write};
use std::path::PathBuf;

use clap::Parser;
use color_eyre::Result;
use color_eyre::eyre::{WrapErr, bail};
use env_logger::Env;
use log::{debug, info, warn};

use iprank::builder::RankingBuilder;
use iprank::tracker::{DEFAULT_TOP_K, SAMPLE_STREAM, TopAddresses};

/// Count IPv4 addresses and print the most frequent ones
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Input files with one address per line (stdin if none)
    inputs: Vec<PathBuf>,

    /// Number of addresses to rank
    #[arg(short, long, default_value_t = DEFAULT_TOP_K)]
    top: usize,

    /// Abort on the first malformed line instead of skipping it
    #[arg(long)]
    strict: bool,

    /// Print the count next to each address
    #[arg(short = 'c', long)]
    with_counts: bool,

    /// Replay the built-in 17-observation demonstration stream
    #[arg(long, conflicts_with = "inputs")]
    sample: bool,

    /// Pre-size the counter for about this many distinct addresses
    #[arg(long, default_value_t = 0)]
    expected_addresses: usize,
}

/// Outcome of feeding one input into the counter.
#[derive(Debug, Default)]
struct IngestStats {
    observed: u64,
    skipped: u64,
}

fn ingest<R: BufRead>(
    top: &mut TopAddresses,
    reader: R,
    source: &str,
    strict: bool,
) -> Result<IngestStats> {
    let mut stats = IngestStats::default();
    for (line_no, raw) in reader.split(b'\n').enumerate() {
        let raw = raw.wrap_err_with(|| format!("Failed to read line from {}", source))?;
        let parsed = std::str::from_utf8(&raw)
            .map_err(|err| err.to_string())
            .and_then(|line| {
                let addr = line.trim();
                if addr.is_empty() {
                    return Ok(None);
                }
                top.observe_str(addr).map(Some).map_err(|err| err.to_string())
            });
        match parsed {
            Ok(None) => {},
            Ok(Some(_)) => stats.observed += 1,
            Err(err) if strict => {
                bail!("{}:{}: {}", source, line_no + 1, err);
            },
            Err(err) => {
                warn!("{}:{}: skipping line: {}", source, line_no + 1, err);
                stats.skipped += 1;
            },
        }
    }
    debug!(
        "{}: {} observed, {} skipped",
        source, stats.observed, stats.skipped
    );
    Ok(stats)
}

fn main() -> Result<()> {
    color_eyre::install()?;

    let args = Args::parse();

    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();

    let mut top: TopAddresses = RankingBuilder::new(args.top)
        .expected_addresses(args.expected_addresses)
        .try_build()
        .wrap_err("Invalid ranking configuration")?;

    let mut totals = IngestStats::default();
    if args.sample {
        info!("Replaying the demonstration stream");
        for addr in SAMPLE_STREAM {
            top.observe_str(addr)?;
            totals.observed += 1;
        }
    } else if args.inputs.is_empty() {
        let stdin = io::stdin();
        let stats = ingest(&mut top, stdin.lock(), "<stdin>", args.strict)?;
        totals.observed += stats.observed;
        totals.skipped += stats.skipped;
    } else {
        for path in &args.inputs {
            let file = File::open(path)
                .wrap_err_with(|| format!("Failed to open input '{}'", path.display()))?;
            let source = path.display().to_string();
            let stats = ingest(&mut top, BufReader::new(file), &source, args.strict)?;
            totals.observed += stats.observed;
            totals.skipped += stats.skipped;
        }
    }

    info!(
        "Observed {} addresses ({} distinct, {} malformed lines skipped)",
        totals.observed,
        top.distinct(),
        totals.skipped
    );

    let stdout = io::stdout();
    let mut out = stdout.lock();
    for entry in top.ranked() {
        if args.with_counts {
            writeln!(out, "{}\t{}", entry.key, entry.count)?;
        } else {
            writeln!(out, "{}", entry.key)?;
        }
    }
    out.flush()?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn ingest_skips_malformed_lines_when_lenient() {
        let mut top = TopAddresses::new(5);
        let input = Cursor::new("1.1.1.1\nnot-an-ip\n\n  1.1.1.1  \n2.2.2.2\n");
        let stats = ingest(&mut top, input, "test", false).unwrap();
        assert_eq!(stats.observed, 3);
        assert_eq!(stats.skipped, 1);
        assert_eq!(top.count(&"1.1.1.1".parse().unwrap()), Some(2));
    }

    #[test]
    fn ingest_skips_non_utf8_lines_when_lenient() {
        let mut top = TopAddresses::new(5);
        let mut bytes = b"1.1.1.1\n".to_vec();
        bytes.extend_from_slice(&[0xff, 0xfe, b'\n']);
        bytes.extend_from_slice(b"2.2.2.2\r\n");
        let stats = ingest(&mut top, Cursor::new(bytes), "test", false).unwrap();
        assert_eq!(stats.observed, 2);
        assert_eq!(stats.skipped, 1);
        assert_eq!(top.distinct(), 2);
        assert_eq!(top.count(&"2.2.2.2".parse().unwrap()), Some(1));
    }

    #[test]
    fn ingest_fails_on_non_utf8_line_when_strict() {
        let mut top = TopAddresses::new(5);
        let input = Cursor::new(vec![b'1', b'\n', 0xff, b'\n']);
        let err = ingest(&mut top, input, "test", true).unwrap_err();
        assert!(err.to_string().contains("test:2"));
    }

    #[test]
    fn expected_addresses_above_limit_is_a_config_error() {
        let huge = usize::MAX.to_string();
        let args = Args::parse_from(["iprank", "--expected-addresses", huge.as_str()]);
        let result = RankingBuilder::new(args.top)
            .expected_addresses(args.expected_addresses)
            .try_build::<iprank::addr::Ipv4Key>();
        assert!(result.is_err());
    }

    #[test]
    fn ingest_fails_on_malformed_line_when_strict() {
        let mut top = TopAddresses::new(5);
        let input = Cursor::new("1.1.1.1\n1.1.1\n");
        let err = ingest(&mut top, input, "test", true).unwrap_err();
        assert!(err.to_string().contains("test:2"));
    }

    #[test]
    fn args_parse_defaults() {
        let args = Args::parse_from(["iprank"]);
        assert_eq!(args.top, DEFAULT_TOP_K);
        assert!(args.inputs.is_empty());
        assert!(!args.strict);
        assert!(!args.sample);
    }

    #[test]
    fn sample_conflicts_with_inputs() {
        assert!(Args::try_parse_from(["iprank", "--sample", "file.txt"]).is_err());
    }
}
