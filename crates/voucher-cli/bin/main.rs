mod cli;

use crate::cli::{DedupStoreArg, LogFormatArg, CLI};
use anyhow::Context;
use clap::Parser;
use jiff::Timestamp;
use std::sync::Arc;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;
use voucher_cli::{FileSink, ResultSink};
use voucher_core::{Alphabet, Code, DedupStore};
use voucher_generator::{Error, GenerationRequest, UniqueCodeService};
use voucher_store::{InMemoryDedupStore, MokaDedupStore};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = CLI::parse();

    init_tracing(config.log_format);

    info!(
        quantity = config.quantity,
        size = config.size,
        prefix = %config.prefix,
        output = %config.output.display(),
        dedup_store = %config.dedup_store,
        "starting voucher generation"
    );

    let alphabet = Alphabet::new(&config.alphabet).context("invalid alphabet")?;
    let request = GenerationRequest::builder()
        .size(config.size)
        .quantity(config.quantity)
        .prefix(config.prefix.clone())
        .namespace(config.namespace.clone())
        .build();
    let sink = FileSink::new(&config.output);

    let start = Timestamp::now();
    let generated = match config.dedup_store {
        DedupStoreArg::InMemory => {
            generate(
                InMemoryDedupStore::new(),
                alphabet,
                &request,
                config.stall_retries,
            )
            .await
        }
        DedupStoreArg::Moka => {
            generate(
                MokaDedupStore::new(),
                alphabet,
                &request,
                config.stall_retries,
            )
            .await
        }
    };

    let codes = match generated {
        Ok(codes) => codes,
        Err(err @ Error::InfeasibleRequest { .. }) => {
            warn!(
                %err,
                "cannot safely generate the requested quantity, the codes would be predictable \
                 or the combinations would run out"
            );
            return Err(err.into());
        }
        Err(err) => return Err(err).context("code generation failed"),
    };

    let written = sink
        .write(&codes)
        .await
        .with_context(|| format!("writing {} codes", codes.len()))?;
    let elapsed = Timestamp::now().duration_since(start);

    info!(
        written,
        output = %sink.path().display(),
        format = ?sink.format(),
        "generated {} codes in {:.2} seconds",
        written,
        elapsed.as_secs_f64()
    );

    Ok(())
}

fn init_tracing(format: LogFormatArg) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let subscriber = tracing_subscriber::fmt().with_env_filter(filter);
    match format {
        LogFormatArg::Pretty => subscriber.init(),
        LogFormatArg::Json => subscriber.json().init(),
    }
}

async fn generate<S: DedupStore>(
    store: S,
    alphabet: Alphabet,
    request: &GenerationRequest,
    stall_retries: u32,
) -> voucher_generator::Result<Vec<Code>> {
    UniqueCodeService::new(alphabet, Arc::new(store))
        .with_stall_retries(stall_retries)
        .generate(request)
        .await
}
