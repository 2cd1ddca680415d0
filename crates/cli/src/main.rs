//! `wix-sites` CLI entry-point: a local host for the Wix site node.
//!
//! Available sub-commands:
//! - `query`: list the first page of editor sites.
//! - `count`: count editor sites.
//! - `test-credentials`: send the credential probe.
//! - `describe`: print the node and credential descriptors as JSON.

use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::EnvFilter;
use uuid::Uuid;

use engine::{NodeDefinition, NodeRunner};
use nodes::wix::{
    Operation, WixCredentialType, WixCredentials, WixSiteNode, CREDENTIAL_NAME, DEFAULT_BASE_URL,
    NODE_NAME,
};
use nodes::{CredentialData, HttpClientConfig, ReqwestClient, StaticCredentials};

#[derive(Parser)]
#[command(
    name = "wix-sites",
    about = "Query and count the sites of a Wix account",
    version
)]
struct Cli {
    /// Account-level Wix API key.
    #[arg(long, env = "WIX_API_KEY", hide_env_values = true, global = true)]
    api_key: Option<String>,

    /// ID of the owning Wix account.
    #[arg(long, env = "WIX_ACCOUNT_ID", global = true)]
    account_id: Option<String>,

    /// API host to send requests to.
    #[arg(long, env = "WIX_BASE_URL", default_value = DEFAULT_BASE_URL, global = true)]
    base_url: String,

    /// Overall request timeout in seconds (none by default).
    #[arg(long, global = true)]
    timeout: Option<u64>,

    /// Log at debug level (overridden by RUST_LOG).
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Retrieve the first page of editor sites, oldest first.
    Query,
    /// Return the total number of editor sites.
    Count,
    /// Check the credentials with a one-site query.
    TestCredentials,
    /// Print the node and credential descriptors.
    Describe,
}

fn init_tracing(verbose: bool) {
    let filter = if verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn build_runner(cli: &Cli) -> anyhow::Result<NodeRunner> {
    let config = HttpClientConfig {
        timeout: cli.timeout.map(Duration::from_secs),
        ..HttpClientConfig::default()
    };
    let http = ReqwestClient::new(&config).context("failed to set up HTTP client")?;

    let mut data = CredentialData::new();
    if let Some(key) = &cli.api_key {
        data.insert(WixCredentials::API_KEY, key.as_str());
    }
    if let Some(account) = &cli.account_id {
        data.insert(WixCredentials::ACCOUNT_ID, account.as_str());
    }
    let credentials = StaticCredentials::new().with(CREDENTIAL_NAME, data);

    let mut runner = NodeRunner::new(Arc::new(http), Arc::new(credentials));
    runner
        .register_node(Arc::new(WixSiteNode::with_base_url(cli.base_url.as_str())))
        .register_credential_type(Arc::new(WixCredentialType::with_base_url(cli.base_url.as_str())));
    Ok(runner)
}

async fn run_operation(runner: &NodeRunner, operation: Operation) -> anyhow::Result<()> {
    let node = NodeDefinition::new("wix", NODE_NAME)
        .with_parameter("resource", "site")
        .with_parameter("operation", operation.as_str());

    // Nodes run here outside of any stored workflow.
    let result = runner.run(Uuid::nil(), &node, Vec::new()).await?;
    info!("execution {} produced {} item(s)", result.execution_id, result.items.len());

    println!("{}", serde_json::to_string_pretty(&result.json())?);
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let runner = build_runner(&cli)?;

    match cli.command {
        Command::Query => run_operation(&runner, Operation::Query).await,
        Command::Count => run_operation(&runner, Operation::Count).await,
        Command::TestCredentials => {
            runner.test_credentials(CREDENTIAL_NAME).await?;
            println!("Credentials are valid.");
            Ok(())
        }
        Command::Describe => {
            let out = serde_json::json!({
                "nodes": runner.node_descriptions(),
                "credentials": runner.credential_descriptions(),
            });
            println!("{}", serde_json::to_string_pretty(&out)?);
            Ok(())
        }
    }
}
