use shorturl::{config, server};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let config = config::load_from_env()?;
    init_tracing(&config.log_level, &config.log_format)?;
    config.print_summary();

    server::run(config).await
}

fn init_tracing(level: &str, format: &str) -> anyhow::Result<()> {
    let filter = EnvFilter::try_new(level).or_else(|_| EnvFilter::try_new("info"))?;
    let builder = tracing_subscriber::fmt().with_env_filter(filter);

    match format {
        "json" => builder.json().init(),
        _ => builder.init(),
    }

    Ok(())
}
