use anyhow::Context;
use clap::Parser;
use prime_stream::core::driver::run_driver_until;
use prime_stream::core::{primes, sample};
use prime_stream::utils::error::ErrorSeverity;
use prime_stream::utils::logger;
use prime_stream::utils::monitor::SystemMonitor;
use prime_stream::{CliConfig, Command, StreamError, ThreadSafeAsyncStream, TomlConfig};
use std::io::Write;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = CliConfig::parse();

    // 先載入設定檔，日誌格式可能由設定檔決定
    let command = cli.command();
    let stream_config = match &command {
        Command::Stream(args) => Some(args.load_config()),
        _ => None,
    };

    // 初始化日誌
    let file_config = stream_config.as_ref().and_then(|c| c.as_ref().ok());
    if cli.log_json_enabled(file_config) {
        logger::init_json_logger();
    } else {
        logger::init_cli_logger(cli.verbose);
    }
    tracing::debug!("CLI config: {:?}", cli);

    let result = match stream_config.transpose() {
        Ok(config) => dispatch(command, config).await,
        Err(e) => Err(e),
    };

    if let Err(e) = result {
        tracing::error!(
            "❌ {} (Category: {:?}, Severity: {:?})",
            e,
            e.category(),
            e.severity()
        );
        tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());
        eprintln!("❌ {}", e.user_friendly_message());

        // 根據錯誤嚴重程度決定退出碼
        let exit_code = match e.severity() {
            ErrorSeverity::Low => 0,
            ErrorSeverity::Medium => 2,
            ErrorSeverity::High => 1,
            ErrorSeverity::Critical => 3,
        };
        if exit_code > 0 {
            std::process::exit(exit_code);
        }
    }

    std::io::stdout().flush().context("failed to flush stdout")?;
    Ok(())
}

async fn run_stream(config: &TomlConfig) -> Result<(), StreamError> {
    let monitor = SystemMonitor::new(config.monitoring_enabled());
    if monitor.is_enabled() {
        tracing::info!("🔍 System monitoring enabled");
    }

    let stream = ThreadSafeAsyncStream::from_config(config);
    monitor.log_stats("Before stream");

    let shutdown = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::warn!("Could not listen for Ctrl-C: {}", e);
            std::future::pending::<()>().await;
        }
    };
    let summary = run_driver_until(&stream, std::io::stdout().lock(), shutdown).await?;

    monitor.log_stats("After stream");
    monitor.log_final_stats();
    if summary.cancelled {
        tracing::warn!(
            "Stream interrupted after {} primes ({} delivered)",
            summary.primes_found,
            summary.delivered
        );
    }
    Ok(())
}

async fn dispatch(command: Command, config: Option<TomlConfig>) -> Result<(), StreamError> {
    let mut out = std::io::stdout();
    match command {
        Command::Stream(args) => {
            let config = match config {
                Some(config) => config,
                None => args.load_config()?,
            };
            run_stream(&config).await
        }
        Command::Hello => sample::say_hello(&mut out),
        Command::Value => Ok(writeln!(out, "{}", sample::value_from_native())?),
        Command::Print { message } => sample::echo(&mut out, &message),
        Command::Object { name } => {
            let profile = sample::create_profile(name.as_deref());
            Ok(writeln!(out, "{}", serde_json::to_string_pretty(&profile)?)?)
        }
        Command::CountPrimes { x, y } => {
            let started = std::time::Instant::now();
            let count = primes::count_primes_in_range(x, y);
            tracing::info!("⏱️ Counted primes in [{}, {}] in {:?}", x, y, started.elapsed());
            Ok(writeln!(out, "{}", count)?)
        }
    }
}
