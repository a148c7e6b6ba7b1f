use clap::Parser;
use poly_history::cli::{Cli, Commands};
use poly_history::config::Config;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Load configuration
    let config = match Config::load(&cli.config) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Warning: Could not load config from {}: {}", cli.config, e);
            eprintln!("Using default configuration");
            Config::parse(include_str!("../config.toml.example"))?
        }
    };

    // Initialize telemetry
    let _telemetry = poly_history::telemetry::init_telemetry(&config.telemetry)?;

    match cli.command {
        Commands::Collect(args) => {
            tracing::info!("Starting collection");
            args.execute(&config).await?;
        }
        Commands::Backtest(args) => {
            tracing::info!("Starting backtest");
            args.execute(&config).await?;
        }
        Commands::Config => {
            println!("Current configuration:");
            println!("  API: {} (timeout {}s)", config.api.clob_url, config.api.timeout_secs);
            println!(
                "  Collect: dir={:?} lookback={}d policy={:?} fidelity={} on_error={:?}",
                config.collect.output_dir,
                config.collect.lookback_days,
                config.collect.window_policy,
                config.collect.fidelity,
                config.collect.on_history_error,
            );
            println!(
                "  Backtest: dir={:?} exclude={:?} entry={}h threshold={}",
                config.backtest.data_dir,
                config.backtest.exclude_pattern,
                config.backtest.entry_horizon_hours,
                config.backtest.entry_price_threshold,
            );
            println!(
                "  Telemetry: level={} format={:?} metrics_port={:?}",
                config.telemetry.log_level, config.telemetry.log_format, config.telemetry.metrics_port
            );
        }
    }

    Ok(())
}
