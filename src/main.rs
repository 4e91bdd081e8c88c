use anyhow::{Context, Result};
use retail_datagen::{
    cli::Cli,
    generator::{Generator, StopSignal},
    sampler::RandomSampler,
    store::Store,
    synth::select_synthesizer,
};
use std::io::IsTerminal;
use tracing::{error, info};
use tracing_subscriber::FmtSubscriber;

fn main() -> Result<()> {
    // a missing .env is fine, the environment and flags still apply
    dotenvy::dotenv().ok();
    let cli = Cli::parse_args();

    let subscriber = FmtSubscriber::builder()
        .with_max_level(cli.log_level)
        .with_target(false)
        .with_ansi(std::io::stdout().is_terminal())
        .finish();
    tracing::subscriber::set_global_default(subscriber).context("Failed to set up logging")?;

    let Some(dsn) = cli.dsn() else {
        error!("PG_DSN not set. Please set PG_DSN in your environment.");
        std::process::exit(1);
    };

    let stop = StopSignal::new();
    let handler_stop = stop.clone();
    ctrlc::set_handler(move || handler_stop.raise()).context("Failed to install Ctrl-C handler")?;

    let sampler = RandomSampler::from_seed(cli.seed)?;
    let synth = select_synthesizer(cli.openai_api_key.as_deref(), &cli.openai_base_url, &cli.model);

    let store = match Store::open(dsn) {
        Ok(store) => {
            info!("Database connected successfully");
            store
        }
        Err(err) => {
            error!("Database connection failed at startup: {:#}", err);
            return Err(err);
        }
    };

    if cli.bootstrap_schema {
        if let Err(err) = store.bootstrap_schema() {
            error!("Schema bootstrap failed: {:#}", err);
            close(store);
            info!("Exited cleanly.");
            return Err(err);
        }
        info!("Schema ready");
    }

    let mut generator = Generator::new(store, sampler, synth)
        .with_interval(cli.interval())
        .with_stop_signal(stop.clone());

    let result = generator.run(cli.max_iterations);
    match &result {
        Ok(iterations) if stop.is_raised() => {
            info!("Interrupted after {} iteration(s)", iterations)
        }
        Ok(_) => {}
        Err(err) => error!("Generator stopped: {:#}", err),
    }

    close(generator.into_store());
    info!("Exited cleanly.");

    result.map(|_| ())
}

fn close(store: Store) {
    match store.close() {
        Ok(()) => info!("Connection closed"),
        Err(err) => error!("{:#}", err),
    }
}
