//! Telegraf configuration registrar.
//!
//! Registers a rendered telegraf.conf with InfluxDB at container start.
//!
//! # Flow
//!
//! ```text
//!   env / flags / settings.toml
//!              │
//!              ▼
//!   ┌─────────────────────┐   no token    exit 2
//!   │     CHECK_TOKEN     │──────────────────▶
//!   └──────────┬──────────┘
//!              ▼
//!   ┌─────────────────────┐   budget spent  exit 3
//!   │    WAIT_HEALTHY     │──────────────────▶     GET /health until 200
//!   └──────────┬──────────┘
//!              ▼
//!   ┌─────────────────────┐   read error    exit 4
//!   │     READ_CONFIG     │──────────────────▶
//!   └──────────┬──────────┘
//!              ▼
//!   ┌─────────────────────┐   budget spent  exit 5
//!   │       SUBMIT        │──────────────────▶     POST /api/v2/telegrafs
//!   └──────────┬──────────┘
//!              ▼
//!           exit 0
//! ```

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;

use telegraf_registrar::config::loader::Overrides;
use telegraf_registrar::config::schema::LogFormat;
use telegraf_registrar::lifecycle;
use telegraf_registrar::observability::logging;

#[derive(Parser)]
#[command(name = "register-telegraf")]
#[command(about = "Register a Telegraf configuration with InfluxDB", long_about = None)]
struct Cli {
    /// InfluxDB base URL
    #[arg(long, env = "INFLUX_URL")]
    influx_url: Option<String>,

    /// Organization to create the configuration in (overrides DOCKER_INFLUXDB_INIT_ORG)
    #[arg(long)]
    org: Option<String>,

    /// Path of the rendered telegraf.conf
    #[arg(long, env = "TELEGRAF_CONF_PATH")]
    telegraf_conf: Option<PathBuf>,

    /// Optional TOML settings file (retry budgets, timeouts, names)
    #[arg(long, env = "REGISTRAR_SETTINGS")]
    settings: Option<PathBuf>,

    /// Log output format: text or json
    #[arg(long, env = "REGISTRAR_LOG_FORMAT")]
    log_format: Option<LogFormat>,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    let overrides = Overrides {
        influx_url: cli.influx_url,
        org: cli.org,
        telegraf_conf: cli.telegraf_conf,
        log_format: cli.log_format,
    };

    let config = match lifecycle::prepare(cli.settings.as_deref(), &overrides, |key| {
        std::env::var(key).ok()
    }) {
        Ok(config) => config,
        Err(e) => {
            println!("ERROR: {}", e);
            return ExitCode::from(&e);
        }
    };

    logging::init(&config.observability);
    tracing::info!(
        base_url = %config.influx.base_url,
        org = %config.influx.org,
        conf_path = %config.telegraf.conf_path.display(),
        "register-telegraf v{} starting",
        env!("CARGO_PKG_VERSION")
    );

    let mut stdout = std::io::stdout();
    match lifecycle::run(&config, &mut stdout).await {
        Ok(_) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(exit_code = e.exit_code(), "{}", e);
            ExitCode::from(&e)
        }
    }
}
