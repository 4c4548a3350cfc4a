use anyhow::Result;
use substack_archive::app::Archiver;
use substack_archive::config::AppConfig;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    let loaded = AppConfig::load();
    let config = loaded.config.clone();

    // If RUST_LOG is set, it takes precedence over the configured levels.
    let env_filter = match std::env::var("RUST_LOG") {
        Ok(_) => EnvFilter::from_default_env(),
        Err(_) => EnvFilter::new(config.logging.filter_directive()),
    };

    // Keep the guard alive for the whole run so buffered file logs get flushed.
    let _guard = match config.logging.log_directory.as_deref() {
        Some(log_dir) => {
            let file_appender = tracing_appender::rolling::daily(log_dir, "substack-archive.log");
            let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);
            tracing_subscriber::fmt()
                .with_env_filter(env_filter)
                .with_writer(non_blocking)
                .with_ansi(false)
                .compact()
                .init();
            Some(guard)
        }
        None => {
            tracing_subscriber::fmt()
                .with_env_filter(env_filter)
                .with_writer(std::io::stderr)
                .init();
            None
        }
    };

    loaded.report();

    let archiver = Archiver::new(config);
    if let Err(err) = archiver.run().await {
        tracing::error!("archive run failed: {err:#}");
        return Err(err);
    }

    Ok(())
}
