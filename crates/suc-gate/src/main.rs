//! suc-gate - system-upgrade-controller readiness gate

use clap::Parser;
use kube::Client;
use semver::Version;

use suc_common::telemetry::{init_telemetry, LogFormat, TelemetryConfig, DEFAULT_LOG_FILTER};
use suc_gate::config::{ControllerConfig, DEFAULT_SUC_CHART_VERSION};
use suc_gate::runner::build_controllers;
use suc_gate::version::parse_version;

/// Deploys the system-upgrade-controller chart and gates upgrades on its readiness
#[derive(Parser, Debug)]
#[command(name = "suc-gate", version, about, long_about = None)]
struct Cli {
    /// Version of the system-upgrade-controller chart to deploy
    #[arg(long, env = "SUC_CHART_VERSION", default_value = DEFAULT_SUC_CHART_VERSION)]
    chart_version: String,

    /// Registry used for clusters that do not configure their own
    #[arg(long, env = "SYSTEM_DEFAULT_REGISTRY", default_value = "")]
    system_default_registry: String,

    /// First Kubernetes version on which the chart must not install PSPs
    #[arg(long, env = "SUC_PSP_THRESHOLD", value_parser = parse_version)]
    psp_threshold: Option<Version>,

    /// Log output format (json or text)
    #[arg(long, env = "LOG_FORMAT", default_value = "json")]
    log_format: LogFormat,
}

impl Cli {
    fn controller_config(&self) -> ControllerConfig {
        let mut config = ControllerConfig::default()
            .with_chart_version(&self.chart_version)
            .with_system_default_registry(&self.system_default_registry);
        if let Some(threshold) = &self.psp_threshold {
            config = config.with_psp_threshold(threshold.clone());
        }
        config
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    init_telemetry(TelemetryConfig {
        format: cli.log_format,
        default_filter: DEFAULT_LOG_FILTER.to_string(),
    })?;

    let config = cli.controller_config();
    tracing::info!(
        chart_version = %config.chart_version,
        psp_threshold = %config.psp_threshold,
        "starting suc-gate"
    );

    let client = Client::try_default()
        .await
        .map_err(|e| anyhow::anyhow!("Failed to create Kubernetes client: {}", e))?;

    tracing::info!("Starting controllers:");
    futures::future::join_all(build_controllers(client, config)).await;

    tracing::info!("suc-gate shutting down");
    Ok(())
}
