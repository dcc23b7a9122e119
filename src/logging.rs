use anyhow::Result;
use tracing_subscriber::EnvFilter;

use crate::config::LoggingConfig;

/// `RUST_LOG` wins over `logging.level`; an unparsable level falls back to `info`.
pub fn env_filter(cfg: &LoggingConfig) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::try_new(&cfg.level).unwrap_or_else(|_| EnvFilter::new("info"))
    })
}

pub fn init_tracing(cfg: &LoggingConfig) -> Result<()> {
    let builder = tracing_subscriber::fmt().with_env_filter(env_filter(cfg));
    if cfg.json {
        builder
            .json()
            .try_init()
            .map_err(|e| anyhow::anyhow!("failed to init tracing: {}", e))?;
    } else {
        builder
            .with_target(false)
            .try_init()
            .map_err(|e| anyhow::anyhow!("failed to init tracing: {}", e))?;
    }
    Ok(())
}
