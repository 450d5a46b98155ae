use clap::{Parser, ValueEnum};
use std::fmt::{Display, Formatter};
use std::path::PathBuf;

pub const QUANTITY_ENV: &str = "VOUCHER_QUANTITY";
pub const SIZE_ENV: &str = "VOUCHER_SIZE";
pub const PREFIX_ENV: &str = "VOUCHER_PREFIX";
pub const OUTPUT_ENV: &str = "VOUCHER_OUTPUT";
pub const NAMESPACE_ENV: &str = "VOUCHER_NAMESPACE";
pub const ALPHABET_ENV: &str = "VOUCHER_ALPHABET";
pub const DEDUP_STORE_ENV: &str = "VOUCHER_DEDUP_STORE";
pub const STALL_RETRIES_ENV: &str = "VOUCHER_STALL_RETRIES";
pub const LOG_FORMAT_ENV: &str = "VOUCHER_LOG_FORMAT";

pub const DEFAULT_QUANTITY: &str = "10000";
pub const DEFAULT_SIZE: &str = "10";
pub const DEFAULT_OUTPUT: &str = "codes.txt";
pub const DEFAULT_STALL_RETRIES: &str = "0";

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum DedupStoreArg {
    #[value(name = "in-memory")]
    InMemory,
    #[value(name = "moka")]
    Moka,
}

impl Display for DedupStoreArg {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            DedupStoreArg::InMemory => write!(f, "in-memory"),
            DedupStoreArg::Moka => write!(f, "moka"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogFormatArg {
    #[value(name = "pretty")]
    Pretty,
    #[value(name = "json")]
    Json,
}

impl Display for LogFormatArg {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            LogFormatArg::Pretty => write!(f, "pretty"),
            LogFormatArg::Json => write!(f, "json"),
        }
    }
}

/// Generate unique voucher codes and write them to a file.
#[derive(Debug, Parser)]
#[command(name = "voucher")]
pub struct CLI {
    /// Number of unique codes to generate.
    #[arg(short, long, env = QUANTITY_ENV, default_value = DEFAULT_QUANTITY)]
    pub quantity: u64,

    /// Length of every code, prefix included.
    #[arg(short, long, env = SIZE_ENV, default_value = DEFAULT_SIZE)]
    pub size: usize,

    #[arg(short, long, env = PREFIX_ENV, default_value = "")]
    pub prefix: String,

    /// Output file; a `.csv` extension selects CSV output.
    #[arg(short, long, env = OUTPUT_ENV, default_value = DEFAULT_OUTPUT)]
    pub output: PathBuf,

    #[arg(
        long,
        env = NAMESPACE_ENV,
        default_value = voucher_generator::DEFAULT_NAMESPACE,
    )]
    pub namespace: String,

    #[arg(
        long,
        env = ALPHABET_ENV,
        default_value = voucher_core::alphabet::DEFAULT_SYMBOLS,
    )]
    pub alphabet: String,

    #[arg(
        long,
        env = DEDUP_STORE_ENV,
        value_enum,
        default_value_t = DedupStoreArg::InMemory
    )]
    pub dedup_store: DedupStoreArg,

    /// Consecutive rounds without progress tolerated before giving up.
    #[arg(long, env = STALL_RETRIES_ENV, default_value = DEFAULT_STALL_RETRIES)]
    pub stall_retries: u32,

    #[arg(
        long,
        env = LOG_FORMAT_ENV,
        value_enum,
        default_value_t = LogFormatArg::Pretty
    )]
    pub log_format: LogFormatArg,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let cli = CLI::try_parse_from(["voucher"]).unwrap();

        assert_eq!(cli.quantity, 10_000);
        assert_eq!(cli.size, 10);
        assert_eq!(cli.prefix, "");
        assert_eq!(cli.output, PathBuf::from("codes.txt"));
        assert_eq!(cli.namespace, "prefix");
        assert_eq!(cli.alphabet, "ABCDEFGHIJKLMNOPQRSTUVWXYZ1234567890");
        assert_eq!(cli.dedup_store, DedupStoreArg::InMemory);
        assert_eq!(cli.stall_retries, 0);
        assert_eq!(cli.log_format, LogFormatArg::Pretty);
    }

    #[test]
    fn flags_override_defaults() {
        let cli = CLI::try_parse_from([
            "voucher",
            "--quantity",
            "50",
            "--size",
            "8",
            "--prefix",
            "PEPSI",
            "--output",
            "out.csv",
            "--dedup-store",
            "moka",
            "--log-format",
            "json",
        ])
        .unwrap();

        assert_eq!(cli.quantity, 50);
        assert_eq!(cli.size, 8);
        assert_eq!(cli.prefix, "PEPSI");
        assert_eq!(cli.output, PathBuf::from("out.csv"));
        assert_eq!(cli.dedup_store, DedupStoreArg::Moka);
        assert_eq!(cli.log_format, LogFormatArg::Json);
    }

    #[test]
    fn rejects_unknown_store() {
        assert!(CLI::try_parse_from(["voucher", "--dedup-store", "redis"]).is_err());
    }
}
