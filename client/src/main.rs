use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::{Parser, Subcommand};
use lib_core::config::DEFAULT_CANDIDATES;
use lib_core::{Config, UserPrompt, WalletProvider};
use lib_evm::{deploy_voting, load_artifact_bytecode, RpcClient, RpcWallet};
use tracing::info;

use voting_client::ui::{self, Command, ConsolePrompt};
use voting_client::{debug, AppEvent, Coordinator};

#[derive(Parser)]
#[command(name = "voting-client", version, about = "Console client for the on-chain voting contract")]
struct Cli {
    #[command(subcommand)]
    command: Cmd,
}

#[derive(Subcommand)]
enum Cmd {
    /// Interactive voting console
    Run {
        /// Answer yes to every confirmation prompt
        #[arg(long)]
        yes: bool,
    },
    /// Deploy the voting contract from a compiled Hardhat artifact
    Deploy {
        /// Path to the artifact JSON (e.g. artifacts/contracts/Voting.sol/Voting.json)
        #[arg(long)]
        artifact: PathBuf,
        /// Candidate name; repeat for several. Defaults to the standard ballot.
        #[arg(long = "candidate")]
        candidates: Vec<String>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    debug::init();

    let config = Config::load().context("invalid configuration")?;
    let rpc = RpcClient::builder()
        .url(config.rpc_url.clone())
        .timeout(config.rpc_timeout)
        .build();

    match cli.command {
        Cmd::Run { yes } => run(config, rpc, yes).await,
        Cmd::Deploy { artifact, candidates } => deploy(config, rpc, artifact, candidates).await,
    }
}

async fn run(config: Config, rpc: RpcClient, auto_confirm: bool) -> anyhow::Result<()> {
    let address = config.require_contract_address()?.to_string();
    info!(rpc_url = %config.rpc_url, contract = %address, "Starting voting console");

    let lines = ui::spawn_stdin_reader();
    let wallet: Arc<dyn WalletProvider> = Arc::new(RpcWallet::new(rpc, address, config.poll_interval));
    let prompt: Arc<dyn UserPrompt> = Arc::new(ConsolePrompt::new(lines.clone(), auto_confirm));
    let coordinator = Coordinator::new(Some(wallet), prompt, &config);

    spawn_renderer(coordinator.subscribe());

    println!("{}", ui::render(&coordinator.snapshot()));
    println!("{}", ui::HELP);

    while let Ok(line) = lines.recv().await {
        let command = match Command::parse(&line) {
            Ok(Some(command)) => command,
            Ok(None) => continue,
            Err(message) => {
                println!("{}", message);
                continue;
            }
        };

        match command {
            Command::Connect => coordinator.connect().await,
            Command::Vote(index) => {
                // Keep the console responsive while the transaction confirms.
                let coordinator = coordinator.clone();
                tokio::spawn(async move { coordinator.vote(index).await });
            }
            Command::Refresh => coordinator.refresh().await,
            Command::Disconnect => coordinator.disconnect().await,
            Command::Status => println!("{}", ui::render(&coordinator.snapshot())),
            Command::Help => println!("{}", ui::HELP),
            Command::Quit => break,
        }
    }

    info!("Voting console closed");
    Ok(())
}

/// Re-render whenever the visible view changes.
fn spawn_renderer(events: async_channel::Receiver<AppEvent>) {
    tokio::spawn(async move {
        let mut last = String::new();
        while let Ok(event) = events.recv().await {
            match event {
                AppEvent::SnapshotChanged(state) => {
                    let view = ui::render(&state);
                    if view != last {
                        println!("{}", view);
                        last = view;
                    }
                }
                AppEvent::Reloaded => println!("Network changed. Session reset; type `connect` to continue."),
            }
        }
    });
}

async fn deploy(config: Config, rpc: RpcClient, artifact: PathBuf, candidates: Vec<String>) -> anyhow::Result<()> {
    let candidates = if candidates.is_empty() {
        DEFAULT_CANDIDATES.iter().map(|c| c.to_string()).collect()
    } else {
        candidates
    };

    let bytecode = load_artifact_bytecode(&artifact)?;
    let outcome = deploy_voting(&rpc, &bytecode, &candidates, config.poll_interval, config.tx_timeout)
        .await
        .with_context(|| format!("deployment via {} failed", config.rpc_url))?;

    println!("Voting contract deployed to {}", outcome.address);
    println!("  deployer:    {}", outcome.deployer);
    println!("  transaction: {}", outcome.transaction_hash);
    println!("  candidates:  {}", candidates.join(", "));
    println!();
    println!("export VOTING_CONTRACT_ADDRESS={}", outcome.address);
    Ok(())
}
