//! Deploy and control commands

use serde::Deserialize;
use thiserror::Error;

use crate::cell::{Cell, CellError};
use crate::contract::{content_cell, MinterConfig, QueryError, StakingMinter, DEPLOY_VALUE};
use crate::ledger::{LedgerApi, LedgerError, PollConfig};
use crate::types::{Address, Coins};
use crate::ui::{self, Ui, UiError};
use crate::workflow::{Session, WorkflowError};

/// Command-level failures
#[derive(Error, Debug)]
pub enum CliError {
    #[error("missing deployment parameter {0}")]
    MissingParam(&'static str),
    #[error("invalid deployment parameter {name}: {reason}")]
    InvalidParam { name: &'static str, reason: String },
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error("malformed config file: {0}")]
    Config(#[from] serde_json::Error),
    #[error(transparent)]
    Cell(#[from] CellError),
    #[error(transparent)]
    Query(#[from] QueryError),
    #[error(transparent)]
    Ledger(#[from] LedgerError),
    #[error(transparent)]
    Ui(#[from] UiError),
    #[error(transparent)]
    Workflow(#[from] WorkflowError),
    #[error("deployment submitted but the account never became active")]
    DeployTimedOut,
}

/// Raw deployment parameters as read from the environment or a config
/// file; every field passes through the typed parsers before use
#[derive(Debug, Clone, Deserialize)]
struct RawParams {
    admin: String,
    content_uri: String,
    state: Option<String>,
    price: String,
    minter: String,
}

/// Validated deployment parameters
#[derive(Debug, Clone)]
pub struct DeployParams {
    /// Initial admin of the new instance
    pub admin: Address,
    /// Token metadata URI stored in the content cell
    pub content_uri: String,
    /// Whether staking starts paused
    pub paused: bool,
    /// Unit price in nano
    pub price: u64,
    /// Counterpart minter the deploy message associates with
    pub counterpart: Address,
}

impl DeployParams {
    /// Read parameters from the process environment
    /// (`JETTON_ADMIN`, `JETTON_CONTENT_URI`, `JETTON_STATE`,
    /// `JETTON_PRICE`, `JETTON_MINTER`)
    pub fn from_env() -> Result<Self, CliError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Read parameters from a JSON config file
    pub fn from_file(path: &std::path::Path) -> Result<Self, CliError> {
        let text = std::fs::read_to_string(path)?;
        let raw: RawParams = serde_json::from_str(&text)?;
        Self::from_raw(raw)
    }

    fn from_lookup(get: impl Fn(&str) -> Option<String>) -> Result<Self, CliError> {
        let require = |name: &'static str| get(name).ok_or(CliError::MissingParam(name));
        Self::from_raw(RawParams {
            admin: require("JETTON_ADMIN")?,
            content_uri: require("JETTON_CONTENT_URI")?,
            state: get("JETTON_STATE"),
            price: require("JETTON_PRICE")?,
            minter: require("JETTON_MINTER")?,
        })
    }

    fn from_raw(raw: RawParams) -> Result<Self, CliError> {
        let admin = parse_param("admin", &raw.admin, |s| {
            s.parse::<Address>().map_err(|e| e.to_string())
        })?;
        let counterpart = parse_param("minter", &raw.minter, |s| {
            s.parse::<Address>().map_err(|e| e.to_string())
        })?;
        let price = parse_param("price", &raw.price, |s| {
            Coins::from_tokens(s).map_err(|e| e.to_string())
        })?;
        let price = u64::try_from(price.as_nano()).map_err(|_| CliError::InvalidParam {
            name: "price",
            reason: "exceeds 64 bits".into(),
        })?;
        let paused = match raw.state.as_deref().map(str::trim) {
            None | Some("") | Some("false") => false,
            Some("true") => true,
            Some(other) => {
                return Err(CliError::InvalidParam {
                    name: "state",
                    reason: format!("expected true or false, got {other:?}"),
                })
            }
        };
        if raw.content_uri.trim().is_empty() {
            return Err(CliError::InvalidParam {
                name: "content_uri",
                reason: "must not be empty".into(),
            });
        }
        Ok(Self {
            admin,
            content_uri: raw.content_uri.trim().to_string(),
            paused,
            price,
            counterpart,
        })
    }
}

fn parse_param<T>(
    name: &'static str,
    value: &str,
    parse: impl Fn(&str) -> Result<T, String>,
) -> Result<T, CliError> {
    parse(value.trim()).map_err(|reason| CliError::InvalidParam { name, reason })
}

/// Deploy a new staking minter instance
///
/// Builds the configuration cell from `params`, derives the contract
/// address, submits the deploy message with the state-init payload
/// attached, then polls until the account reports deployed code.
/// Returns the address of the new instance.
pub async fn cmd_deploy(
    api: &dyn LedgerApi,
    params: &DeployParams,
    code: &[u8],
    wallet_code: &[u8],
    poll: &PollConfig,
) -> Result<Address, CliError> {
    let config = MinterConfig {
        admin: params.admin,
        content: content_cell(&params.content_uri)?,
        wallet_code: Cell::pack_blob(wallet_code)?,
        paused: params.paused,
        price: params.price,
    };
    let minter = StakingMinter::from_config(&config, Cell::pack_blob(code)?)?;
    let address = *minter.address();
    println!("Deploying staking minter to {address}");

    let block = api.last_block().await?;
    let snapshot = api.account_state(block, &address).await?;
    if snapshot.is_active() {
        println!("Contract is already deployed at {address}");
        return Ok(address);
    }

    minter
        .send_deploy(api, DEPLOY_VALUE, &params.counterpart)
        .await?;
    log::info!("deploy message submitted, waiting for activation");

    let mut active = false;
    for _ in 0..poll.attempts {
        tokio::time::sleep(poll.interval).await;
        let block = api.last_block().await?;
        if api.account_state(block, &address).await?.is_active() {
            active = true;
            break;
        }
    }
    if !active {
        return Err(CliError::DeployTimedOut);
    }

    let data = minter.jetton_data(api).await?;
    println!("Contract deployed successfully!");
    println!("Address: {address}");
    println!("Initial supply: {}", data.total_supply);
    Ok(address)
}

/// Run the interactive control loop against a deployed instance
///
/// Preflight: prompt for the contract address when not given, refuse
/// accounts without deployed code, and warn when the on-chain code hash
/// differs from the expected blob (the operator may proceed anyway).
pub async fn cmd_control(
    api: &dyn LedgerApi,
    ui: &mut dyn Ui,
    address: Option<Address>,
    sender: Option<Address>,
    expected_code: Option<&[u8]>,
) -> Result<(), CliError> {
    let expected_hash = match expected_code {
        Some(code) => Some(Cell::pack_blob(code)?.hash()),
        None => None,
    };

    let mut given = address;
    let address = loop {
        let candidate = match given.take() {
            Some(addr) => addr,
            None => ui::prompt_address(ui, "Please enter the staking minter address:")?,
        };

        let block = api.last_block().await?;
        let snapshot = api.account_state(block, &candidate).await?;
        if !snapshot.is_active() {
            ui.write(&format!(
                "Account {candidate} has no deployed code.\nPlease pick another address.\n"
            ));
            continue;
        }

        if let (Some(expected), Some(actual)) = (expected_hash, snapshot.code_hash) {
            if expected != actual {
                ui.write(&format!(
                    "Warning: the code deployed at {candidate} does not match the expected contract code.\n"
                ));
                if !ui::prompt_bool(ui, "Proceed anyway? (yes/no)")? {
                    continue;
                }
            }
        }

        break candidate;
    };

    log::info!("controlling staking minter at {address}");
    let mut session = Session::new(api, ui, StakingMinter::from_address(address), sender);
    session.run().await?;
    Ok(())
}
