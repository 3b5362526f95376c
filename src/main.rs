//! Staking Minter CLI
//!
//! A command-line toolkit for deploying and administering a jetton
//! staking minter contract.

use clap::{Parser, Subcommand};
use jetton_staking::cli::{self, DeployParams};
use jetton_staking::ledger::{JsonRpcLedger, PollConfig};
use jetton_staking::types::Address;
use jetton_staking::ui::Console;
use std::fs;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "jettonctl")]
#[command(version = "0.1.0")]
#[command(about = "Deploy and administer a jetton staking minter", long_about = None)]
struct Cli {
    /// JSON-RPC endpoint of the ledger node
    #[arg(short, long, default_value = "http://127.0.0.1:8545")]
    endpoint: String,

    /// Address the operator sends from (workchain:hex); determines which
    /// actions the control menu offers
    #[arg(short, long)]
    sender: Option<Address>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Deploy a new staking minter instance
    Deploy {
        /// Compiled minter code blob
        #[arg(short, long)]
        code: PathBuf,

        /// Compiled jetton wallet code blob
        #[arg(short, long)]
        wallet_code: PathBuf,

        /// JSON file with deployment parameters; falls back to the
        /// JETTON_* environment variables when omitted
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Run the interactive control loop against a deployed instance
    Control {
        /// Staking minter address (prompted for when omitted)
        #[arg(short, long)]
        address: Option<Address>,

        /// Expected minter code blob, compared against the deployed code
        #[arg(short, long)]
        code: Option<PathBuf>,
    },
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logger
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    let api = JsonRpcLedger::new(&cli.endpoint)?;
    let rt = tokio::runtime::Runtime::new()?;

    rt.block_on(async {
        match cli.command {
            Commands::Deploy {
                code,
                wallet_code,
                config,
            } => {
                let params = match config {
                    Some(path) => DeployParams::from_file(&path)?,
                    None => DeployParams::from_env()?,
                };
                let code = fs::read(&code)?;
                let wallet_code = fs::read(&wallet_code)?;
                cli::cmd_deploy(&api, &params, &code, &wallet_code, &PollConfig::default())
                    .await?;
            }

            Commands::Control { address, code } => {
                let expected = match &code {
                    Some(path) => Some(fs::read(path)?),
                    None => None,
                };
                let mut ui = Console::new();
                cli::cmd_control(&api, &mut ui, address, cli.sender, expected.as_deref())
                    .await?;
            }
        }

        Ok::<(), Box<dyn std::error::Error>>(())
    })?;

    Ok(())
}
