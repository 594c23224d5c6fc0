use anyhow::Context;

use mobievent_seed::{
    backend,
    config::{SeedConfig, defaults},
    logging::init_tracing,
};

#[tokio::main]
async fn main() {
    if let Err(err) = run().await {
        tracing::error!("seeding failed: {err:?}");
        std::process::exit(1);
    }
}

async fn run() -> anyhow::Result<()> {
    let cfg = match SeedConfig::from_env() {
        Ok(cfg) => cfg,
        Err(err) => {
            // still report through tracing
            init_tracing(defaults::DEFAULT_RUST_LOG);
            return Err(err);
        }
    };
    init_tracing(&cfg.log_level);

    let ctx = backend::connect(&cfg)
        .await
        .context("failed to connect to the seed backend")?;
    ctx.seeder(&cfg.default_password)
        .run()
        .await
        .context("seeding aborted")?;
    ctx.log_dry_run_summary();
    Ok(())
}
