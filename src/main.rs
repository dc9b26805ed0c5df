use anyhow::Context;
use clap::Parser;
use clip_check::core::ConfigProvider;
use clip_check::utils::{logger, validation::Validate};
use clip_check::{
    CliConfig, ClipError, ConsoleReporter, Controller, Fault, HarnessConfig, SimulatedBoard,
};

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let args = CliConfig::parse();

    logger::init_cli_logger(args.verbose);

    tracing::info!("🚀 Starting clip-check");
    if args.verbose {
        tracing::debug!("CLI config: {:?}", args);
    }

    let config = match load_config(&args) {
        Ok(config) => config,
        Err(e) => exit_with_config_error(&e),
    };

    tracing::info!(
        "✅ Harness '{}' loaded: {} entries on {} outputs",
        config.name(),
        config.pin_map().len(),
        config.pin_map().outputs().len()
    );

    let mut board = SimulatedBoard::wired(config.pin_map());
    for spec in &args.faults {
        match Fault::parse(spec, config.pin_map()) {
            Ok(fault) => board.inject(fault),
            Err(e) => exit_with_config_error(&e),
        }
    }

    // one press and one release per scan
    board.script(
        config.start_pin(),
        (0..args.scans).flat_map(|_| [false, true]),
    );

    let mut controller = Controller::new(board, config, ConsoleReporter::new());
    controller
        .setup()
        .context("Failed to configure the board lines")?;

    let results = controller
        .run_scans(args.scans)
        .await
        .context("Scan aborted by a board error")?;

    let failed = results.iter().filter(|r| !r.passed()).count();
    if failed > 0 {
        tracing::warn!("{} of {} scans reported wiring errors", failed, results.len());
        std::process::exit(2);
    }

    tracing::info!("✅ {} scan(s) completed without errors", results.len());
    Ok(())
}

fn load_config(args: &CliConfig) -> clip_check::Result<HarnessConfig> {
    args.validate()?;

    let mut config = match &args.config {
        Some(path) => {
            tracing::info!("📁 Loading harness from: {}", path);
            HarnessConfig::from_file(path)?
        }
        None => HarnessConfig::default(),
    };

    if let Some(step_delay_ms) = args.step_delay_ms {
        config = config.with_step_delay(step_delay_ms);
        tracing::info!("🔧 Step delay overridden to: {}ms", step_delay_ms);
    }

    config.validate()?;
    Ok(config)
}

fn exit_with_config_error(e: &ClipError) -> ! {
    tracing::error!("❌ Configuration failed: {}", e);
    eprintln!("❌ {}", e);
    std::process::exit(1);
}
