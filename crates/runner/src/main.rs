use common::ClientConfig;
use nfon_rest::{NfonClient, NfonClientBuilder, NfonError, RestResponse};
use std::path::Path;
use std::process::ExitCode;
use tracing::{error, info, warn};

/// Config file read when no path is given.
const DEFAULT_CONFIG_PATH: &str = "config.toml";

#[tokio::main]
async fn main() -> ExitCode {
    common::init_logging();

    let config = match load_config(std::env::args().nth(1)) {
        Ok(config) => config,
        Err(e) => {
            error!(error = %e, "Failed to load configuration");
            return ExitCode::FAILURE;
        }
    };

    let client = match NfonClientBuilder::from_config(&config).build() {
        Ok(client) => client,
        Err(e) => {
            error!(error = %e, "Failed to create client");
            return ExitCode::FAILURE;
        }
    };

    info!(
        base_url = %client.base_url(),
        user_id = %client.user_id(),
        "Starting NFON API check"
    );

    match run(&client).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!(error = %e, "Request failed");
            ExitCode::FAILURE
        }
    }
}

/// Load the config file named on the command line. Without an argument,
/// `config.toml` is used if present, else the environment.
fn load_config(arg: Option<String>) -> Result<ClientConfig, common::ConfigError> {
    if let Some(path) = arg {
        info!(path = %path, "Loading configuration file");
        return ClientConfig::from_file(&path);
    }

    if Path::new(DEFAULT_CONFIG_PATH).exists() {
        info!(path = DEFAULT_CONFIG_PATH, "Loading configuration file");
        ClientConfig::from_file(DEFAULT_CONFIG_PATH)
    } else {
        info!("No configuration file, reading environment");
        ClientConfig::from_env()
    }
}

async fn run(client: &NfonClient) -> Result<(), NfonError> {
    let check = client.api_test().await?;
    if check.is_up_to_date() {
        info!(version = %check.server_version, "Endpoint definitions are current");
    } else {
        warn!(
            server_version = %check.server_version,
            local_version = %check.local_version,
            "Endpoint definitions are outdated"
        );
    }

    let user_id = client.user_id();
    let response = match user_id.chars().next() {
        Some('S') => {
            client
                .get("system-integrator-customers", &[("systemIntegratorId", user_id)])
                .await?
        }
        Some('K') => client.get("customer", &[("identifier", user_id)]).await?,
        _ => {
            warn!(user_id = %user_id, "User id is neither a customer nor a system integrator");
            return Ok(());
        }
    };

    print_response(response)
}

fn print_response(response: RestResponse) -> Result<(), NfonError> {
    if !response.is_success() {
        warn!(status = response.status(), "Portal returned an error status");
    }

    match response.json::<serde_json::Value>() {
        Ok(value) => {
            let pretty = serde_json::to_string_pretty(&value)
                .map_err(|e| NfonError::Parse(e.to_string()))?;
            println!("{pretty}");
        }
        Err(_) => println!("{}", response.text()),
    }
    Ok(())
}
