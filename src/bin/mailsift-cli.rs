#[path = "mailsift-cli/args.rs"]
mod args;
#[path = "mailsift-cli/output.rs"]
mod output;

use anyhow::{Context, Result};
use mailsift::{
    BatchContext, BatchOutcome, LookupMx, Pipeline, Progress, ReferenceData, RuleConfig,
};
use tokio::io::AsyncReadExt;
use tokio::sync::mpsc;
use tracing_subscriber::EnvFilter;

use args::Cli;

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();

    let raw = read_input(&cli).await?;
    let reference = cli.reference_data()?;
    let config = cli.rule_config();

    #[cfg(feature = "with-system-dns")]
    let outcome = if cli.system_dns {
        let resolver = mailsift::SystemResolver::from_system_conf()?;
        let pipeline = Pipeline::new(resolver)
            .with_reference_data(reference)
            .with_lookup_timeout(cli.resolver_options().timeout());
        classify(&pipeline, &raw, config, !cli.quiet).await?
    } else {
        run_doh(&cli, reference, &raw, config).await?
    };
    #[cfg(not(feature = "with-system-dns"))]
    let outcome = run_doh(&cli, reference, &raw, config).await?;

    output::write_report(&outcome, &cli)?;

    // codes de sortie : 0 OK, 2 invalids, 1 fatal
    if outcome.invalid().next().is_some() {
        std::process::exit(2);
    }
    Ok(())
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

async fn read_input(cli: &Cli) -> Result<String> {
    match &cli.input {
        Some(path) => tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("read {}", path.display())),
        None => {
            let mut raw = String::new();
            tokio::io::stdin()
                .read_to_string(&mut raw)
                .await
                .context("read stdin")?;
            Ok(raw)
        }
    }
}

async fn run_doh(
    cli: &Cli,
    reference: ReferenceData,
    raw: &str,
    config: RuleConfig,
) -> Result<BatchOutcome> {
    let pipeline = Pipeline::from_options(&cli.resolver_options())?.with_reference_data(reference);
    classify(&pipeline, raw, config, !cli.quiet).await
}

async fn classify<R: LookupMx>(
    pipeline: &Pipeline<R>,
    raw: &str,
    config: RuleConfig,
    show_progress: bool,
) -> Result<BatchOutcome> {
    let mut ctx = BatchContext::new();
    let printer = if show_progress {
        let (tx, rx) = mpsc::unbounded_channel();
        ctx = ctx.with_progress(tx);
        Some(tokio::spawn(render_progress(rx)))
    } else {
        None
    };

    let cancel = ctx.cancel_handle();
    let interrupt = tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::warn!("interrupted, finishing current address");
            cancel.cancel();
        }
    });

    let outcome = pipeline
        .validate_batch_with(raw, config, &mut ctx)
        .await
        .context("please enter at least one email address");

    interrupt.abort();
    drop(ctx);
    if let Some(printer) = printer {
        let _ = printer.await;
    }
    outcome
}

async fn render_progress(mut rx: mpsc::UnboundedReceiver<Progress>) {
    let mut drew = false;
    while let Some(progress) = rx.recv().await {
        eprint!(
            "\r[{}/{}] {:>3.0}%",
            progress.processed,
            progress.total,
            progress.fraction() * 100.0
        );
        drew = true;
    }
    if drew {
        eprintln!();
    }
}
