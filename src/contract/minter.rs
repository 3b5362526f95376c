//! The contract handle
//!
//! Every interaction with a deployed staking minter goes through
//! [`StakingMinter`]: sends encode a message body and submit exactly one
//! message without waiting for its effect; reads run a get method and
//! decode the typed stack. Values attached to sends cover contract-side
//! gas and are paid separately from the transferred amount.

use crate::cell::{Cell, CellBuilder, CellError};
use crate::ledger::{LedgerApi, LedgerError, MessageRequest, SendMode, StackReader, StackValue};
use crate::protocol;
use crate::types::{Address, Coins};

use super::config::{MinterConfig, StateInit};
use super::QueryError;

/// Workchain new instances deploy to
const BASE_WORKCHAIN: i8 = 0;

/// Gas attached to plain operations
const OP_VALUE: Coins = Coins::from_nano(100_000_000);

/// Gas attached to configuration changes
const CONFIG_OP_VALUE: Coins = Coins::from_nano(200_000_000);

/// Value attached to the deploy message
pub const DEPLOY_VALUE: Coins = Coins::from_nano(200_000_000);

/// Aggregate result of the `get_jetton_data` read; admin, supply and
/// content always come from one call so they reflect the same ledger
/// height
#[derive(Debug, Clone)]
pub struct JettonData {
    pub total_supply: Coins,
    pub mintable: bool,
    pub admin: Address,
    pub content: Cell,
    pub wallet_code: Cell,
}

/// Staking state and unit price
#[derive(Debug, Clone, Copy)]
pub struct StakingData {
    pub paused: bool,
    /// Unit price in nano
    pub price: u64,
}

/// Auto-withdrawal configuration
#[derive(Debug, Clone, Copy)]
pub struct WithdrawData {
    pub address: Address,
    pub minimum: Coins,
}

/// Handle for one deployed (or about-to-be-deployed) minter instance
#[derive(Debug, Clone)]
pub struct StakingMinter {
    address: Address,
    init: Option<StateInit>,
}

impl StakingMinter {
    /// Attach to an existing instance
    pub fn from_address(address: Address) -> Self {
        Self {
            address,
            init: None,
        }
    }

    /// Prepare a new instance; the address is the hash of the deployment
    /// payload built from `code` and the config's data cell
    pub fn from_config(config: &MinterConfig, code: Cell) -> Result<Self, CellError> {
        let init = StateInit {
            code,
            data: config.data_cell()?,
        };
        let address = init.address(BASE_WORKCHAIN)?;
        Ok(Self {
            address,
            init: Some(init),
        })
    }

    pub fn address(&self) -> &Address {
        &self.address
    }

    async fn send(
        &self,
        api: &dyn LedgerApi,
        value: Coins,
        body: Cell,
        deploy: bool,
    ) -> Result<(), LedgerError> {
        let state_init = if deploy {
            match &self.init {
                Some(init) => Some(init.cell().map_err(|e| {
                    LedgerError::Malformed(format!("deployment payload: {e}"))
                })?),
                None => None,
            }
        } else {
            None
        };

        log::info!("sending message to {} with value {}", self.address, value);
        api.send_message(MessageRequest {
            to: self.address,
            value,
            body,
            state_init,
            mode: SendMode::PayFeesSeparately,
        })
        .await
    }

    /// Deploy the contract, associating it with its counterpart minter
    pub async fn send_deploy(
        &self,
        api: &dyn LedgerApi,
        value: Coins,
        counterpart: &Address,
    ) -> Result<(), QueryError> {
        let body = protocol::wallet_association(counterpart)?;
        Ok(self.send(api, value, body, true).await?)
    }

    /// Mint tokens; attaches `total_value` plus base gas
    pub async fn send_mint(
        &self,
        api: &dyn LedgerApi,
        to: &Address,
        amount: Coins,
        forward_value: Coins,
        total_value: Coins,
    ) -> Result<(), QueryError> {
        let body = protocol::mint(to, amount, forward_value, total_value)?;
        let value = total_value
            .checked_add(OP_VALUE)
            .ok_or(CellError::CoinsTooWide)?;
        Ok(self.send(api, value, body, false).await?)
    }

    pub async fn send_discovery(
        &self,
        api: &dyn LedgerApi,
        owner: &Address,
        include_address: bool,
    ) -> Result<(), QueryError> {
        let body = protocol::ownership_discovery(owner, include_address)?;
        Ok(self.send(api, OP_VALUE, body, false).await?)
    }

    pub async fn send_change_admin(
        &self,
        api: &dyn LedgerApi,
        new_admin: &Address,
    ) -> Result<(), QueryError> {
        let body = protocol::change_admin(new_admin)?;
        Ok(self.send(api, OP_VALUE, body, false).await?)
    }

    pub async fn send_change_withdraw_address(
        &self,
        api: &dyn LedgerApi,
        new_address: &Address,
    ) -> Result<(), QueryError> {
        let body = protocol::change_withdraw_address(new_address)?;
        Ok(self.send(api, OP_VALUE, body, false).await?)
    }

    pub async fn send_change_content(
        &self,
        api: &dyn LedgerApi,
        content: Cell,
    ) -> Result<(), QueryError> {
        let body = protocol::change_content(content)?;
        Ok(self.send(api, OP_VALUE, body, false).await?)
    }

    pub async fn send_change_state(
        &self,
        api: &dyn LedgerApi,
        paused: bool,
    ) -> Result<(), QueryError> {
        let body = protocol::change_state(paused)?;
        Ok(self.send(api, CONFIG_OP_VALUE, body, false).await?)
    }

    pub async fn send_withdraw(
        &self,
        api: &dyn LedgerApi,
        amount: Coins,
    ) -> Result<(), QueryError> {
        let body = protocol::withdraw(amount)?;
        Ok(self.send(api, OP_VALUE, body, false).await?)
    }

    /// Stake `value`; the contract mints according to its current price
    pub async fn send_stake(&self, api: &dyn LedgerApi, value: Coins) -> Result<(), QueryError> {
        let body = protocol::stake()?;
        Ok(self.send(api, value, body, false).await?)
    }

    pub async fn send_change_price(
        &self,
        api: &dyn LedgerApi,
        price: u64,
    ) -> Result<(), QueryError> {
        let body = protocol::change_price(price)?;
        Ok(self.send(api, CONFIG_OP_VALUE, body, false).await?)
    }

    pub async fn send_change_withdraw_minimum(
        &self,
        api: &dyn LedgerApi,
        minimum: Coins,
    ) -> Result<(), QueryError> {
        let body = protocol::change_withdraw_minimum(minimum)?;
        Ok(self.send(api, CONFIG_OP_VALUE, body, false).await?)
    }

    async fn get(
        &self,
        api: &dyn LedgerApi,
        method: &str,
        args: Vec<StackValue>,
    ) -> Result<StackReader, QueryError> {
        let stack = api.run_get_method(&self.address, method, args).await?;
        Ok(StackReader::new(stack))
    }

    /// The aggregate jetton read: supply, mintability, admin, content and
    /// wallet code in one round trip
    pub async fn jetton_data(&self, api: &dyn LedgerApi) -> Result<JettonData, QueryError> {
        let mut stack = self.get(api, "get_jetton_data", vec![]).await?;
        Ok(JettonData {
            total_supply: stack.read_coins()?,
            mintable: stack.read_bool()?,
            admin: stack.read_address()?,
            content: stack.read_cell()?,
            wallet_code: stack.read_cell()?,
        })
    }

    pub async fn staking_data(&self, api: &dyn LedgerApi) -> Result<StakingData, QueryError> {
        let mut stack = self.get(api, "get_staking_data", vec![]).await?;
        let paused = stack.read_bool()?;
        let price = stack.read_int()?;
        let price = u64::try_from(price)
            .map_err(|_| LedgerError::Malformed(format!("price {price} exceeds 64 bits")))?;
        Ok(StakingData { paused, price })
    }

    pub async fn withdraw_data(&self, api: &dyn LedgerApi) -> Result<WithdrawData, QueryError> {
        let mut stack = self.get(api, "get_withdraw_data", vec![]).await?;
        Ok(WithdrawData {
            address: stack.read_address()?,
            minimum: stack.read_coins()?,
        })
    }

    /// Withdraw target address alone
    pub async fn withdraw_address(&self, api: &dyn LedgerApi) -> Result<Address, QueryError> {
        let mut stack = self.get(api, "get_withdraw_address", vec![]).await?;
        Ok(stack.read_address()?)
    }

    /// Wallet address the contract derives for `owner`
    pub async fn wallet_address(
        &self,
        api: &dyn LedgerApi,
        owner: &Address,
    ) -> Result<Address, QueryError> {
        let mut slice = CellBuilder::new();
        slice.store_address(owner)?;
        let args = vec![StackValue::Slice(slice.build())];
        let mut stack = self.get(api, "get_wallet_address", args).await?;
        Ok(stack.read_address()?)
    }

    /// The contract's own associated jetton wallet
    pub async fn jetton_wallet_address(&self, api: &dyn LedgerApi) -> Result<Address, QueryError> {
        let mut stack = self.get(api, "get_jtn_wallet_address", vec![]).await?;
        Ok(stack.read_address()?)
    }

    /// Jetton balance the contract believes it holds
    pub async fn known_jetton_balance(&self, api: &dyn LedgerApi) -> Result<Coins, QueryError> {
        let mut stack = self.get(api, "get_jetton_balance", vec![]).await?;
        Ok(stack.read_coins()?)
    }
}
