//! knockd - configuration check.
//!
//! Loads and validates a configuration, activates the KNOCK module and
//! logs what the server would advertise. Transport lives in the embedding
//! daemon, so the binary exits once the check is done.

use knockd::Server;
use knockd::config::{Config, validate};
use knockd::modules::KnockModule;
use tracing::{error, info};

fn main() -> anyhow::Result<()> {
    let json = std::env::var("KNOCKD_LOG_JSON").is_ok_and(|v| v == "1");
    knockd::telemetry::init_tracing(json);

    // Load configuration
    let config_path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "config.toml".to_string());

    let config = Config::load(&config_path).map_err(|e| {
        error!(path = %config_path, error = %e, "Failed to load config");
        e
    })?;

    if let Err(errors) = validate(&config) {
        for e in &errors {
            error!(error = %e, "Invalid configuration");
        }
        anyhow::bail!("{} configuration error(s) in {}", errors.len(), config_path);
    }

    knockd::metrics::init();

    info!(
        server = %config.server.name,
        network = %config.server.network,
        sid = %config.server.sid,
        knock_delay = config.channel.knock_delay,
        knock_delay_channel = config.channel.knock_delay_channel,
        "Configuration loaded"
    );

    let server = Server::new(&config);
    server.load(&KnockModule);

    for line in server.isupport_lines() {
        info!(tokens = %line, "ISUPPORT");
    }
    info!(line = %server.capab_message().to_string().trim_end(), "CAPAB");

    Ok(())
}
