use anyhow::Result;
use learniq::utils::logging;
use learniq::{App, Config};

#[tokio::main]
async fn main() -> Result<()> {
    // LEARNIQ_CONFIG points at an optional TOML file; env vars win over it
    let config = match std::env::var("LEARNIQ_CONFIG") {
        Ok(path) => Config::from_file(std::path::Path::new(&path))?,
        Err(_) => Config::from_env(),
    };

    logging::init(config.verbose_logging);

    App::initialize(config).await?.run().await?;

    Ok(())
}
