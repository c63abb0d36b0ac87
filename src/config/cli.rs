use crate::config::toml_config::TomlConfig;
use crate::utils::error::Result;
use crate::utils::validation::{validate_path, Validate};
use clap::{Args, Parser, Subcommand};

#[derive(Debug, Clone, Parser)]
#[command(name = "prime-stream")]
#[command(about = "Streams primes found on a worker thread back to the caller")]
#[command(version)]
pub struct CliConfig {
    #[command(subcommand)]
    pub command: Option<Command>,

    #[arg(short, long, global = true, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, global = true, help = "Emit logs as JSON")]
    pub log_json: bool,
}

#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Run the prime stream and print every delivered prime (default)
    Stream(StreamArgs),
    /// Print a greeting
    Hello,
    /// Print the value handed over by the native side
    Value,
    /// Print a message with a suffix
    Print { message: String },
    /// Print the sample profile object as JSON
    Object {
        #[arg(long)]
        name: Option<String>,
    },
    /// Count the primes in [X, Y]
    CountPrimes {
        #[arg(allow_negative_numbers = true)]
        x: i32,
        #[arg(allow_negative_numbers = true)]
        y: i32,
    },
}

#[derive(Debug, Clone, Default, Args)]
pub struct StreamArgs {
    /// Path to a TOML configuration file
    #[arg(short, long)]
    pub config: Option<String>,

    #[arg(long)]
    pub prime_count: Option<u32>,

    #[arg(long)]
    pub report_every: Option<u32>,

    #[arg(long)]
    pub queue_capacity: Option<usize>,

    /// Log CPU and memory usage around the run
    #[arg(long)]
    pub monitor: bool,
}

impl CliConfig {
    pub fn command(&self) -> Command {
        self.command
            .clone()
            .unwrap_or_else(|| Command::Stream(StreamArgs::default()))
    }

    /// `--log-json` 或設定檔 `[logging] json = true` 任一開啟即可
    pub fn log_json_enabled(&self, config: Option<&TomlConfig>) -> bool {
        self.log_json || config.is_some_and(|c| c.logging.json)
    }
}

impl StreamArgs {
    /// 載入設定檔（若有）並套用命令列覆蓋
    pub fn load_config(&self) -> Result<TomlConfig> {
        self.validate()?;

        let mut config = match &self.config {
            Some(path) => TomlConfig::from_file(path)?,
            None => TomlConfig::default(),
        };

        if let Some(prime_count) = self.prime_count {
            config.stream.prime_count = prime_count;
        }
        if let Some(report_every) = self.report_every {
            config.stream.report_every = report_every;
        }
        if let Some(queue_capacity) = self.queue_capacity {
            config.stream.queue_capacity = queue_capacity;
        }
        if self.monitor {
            config.monitoring.enabled = true;
        }

        config.validate()?;
        Ok(config)
    }
}

impl Validate for StreamArgs {
    fn validate(&self) -> Result<()> {
        if let Some(path) = &self.config {
            validate_path("config", path)?;
        }
        Ok(())
    }
}
