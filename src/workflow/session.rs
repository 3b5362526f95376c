//! Session context
//!
//! One operator, one contract handle, one prompt surface. Actions run
//! strictly one at a time: each depends on reading the account's
//! transaction cursor immediately before submission, so nothing here ever
//! launches overlapping requests against the same contract.

use crate::contract::StakingMinter;
use crate::ledger::{LedgerApi, PollConfig};
use crate::types::{Address, Coins};
use crate::ui::{self, Ui, UiError, WithdrawAmount};

use super::{handlers, Action, Outcome, Role, WorkflowError};

/// Everything an action needs, passed explicitly instead of living in
/// module globals
pub struct Session<'a> {
    pub api: &'a dyn LedgerApi,
    pub ui: &'a mut dyn Ui,
    /// Address the operator sends from, when the transport knows it
    pub sender: Option<Address>,
    pub minter: StakingMinter,
    pub poll: PollConfig,
}

impl<'a> Session<'a> {
    pub fn new(
        api: &'a dyn LedgerApi,
        ui: &'a mut dyn Ui,
        minter: StakingMinter,
        sender: Option<Address>,
    ) -> Self {
        Self {
            api,
            ui,
            sender,
            minter,
            poll: PollConfig::default(),
        }
    }

    pub(super) fn write(&mut self, text: &str) {
        self.ui.write(text);
    }

    pub(super) fn prompt_address(&mut self, prompt: &str) -> Result<Address, UiError> {
        ui::prompt_address(&mut *self.ui, prompt)
    }

    pub(super) fn prompt_address_or(
        &mut self,
        prompt: &str,
        default: &Address,
    ) -> Result<Address, UiError> {
        ui::prompt_address_or(&mut *self.ui, prompt, default)
    }

    pub(super) fn prompt_amount(&mut self, prompt: &str) -> Result<Coins, UiError> {
        ui::prompt_amount(&mut *self.ui, prompt)
    }

    pub(super) fn prompt_bool(&mut self, prompt: &str) -> Result<bool, UiError> {
        ui::prompt_bool(&mut *self.ui, prompt)
    }

    pub(super) fn prompt_url(&mut self, prompt: &str) -> Result<String, UiError> {
        ui::prompt_url(&mut *self.ui, prompt)
    }

    pub(super) fn prompt_withdraw_amount(
        &mut self,
        prompt: &str,
    ) -> Result<WithdrawAmount, UiError> {
        ui::prompt_withdraw_amount(&mut *self.ui, prompt)
    }

    /// Derive the session role from the current on-chain admin
    pub async fn role(&self) -> Result<Role, WorkflowError> {
        let admin = self.minter.jetton_data(self.api).await?.admin;
        Ok(super::derive_role(self.sender.as_ref(), &admin))
    }

    /// Run the interactive action loop until the operator quits or the
    /// input stream ends
    pub async fn run(&mut self) -> Result<(), WorkflowError> {
        let role = self.role().await?;
        match role {
            Role::Admin => self.write("Current wallet is the staking admin.\n"),
            Role::User => {
                self.write("Current wallet is not the admin; available actions are restricted.\n")
            }
        }

        let menu = Action::menu(role);
        let labels: Vec<&str> = menu.iter().map(|a| a.label()).collect();

        loop {
            let index = self.ui.choose("Pick an action:", &labels)?;
            let action = menu[index];
            log::debug!("running action {action:?}");

            match handlers::run_action(self, action).await {
                Ok(Outcome::Quit) => return Ok(()),
                Ok(outcome) => log::debug!("action {action:?} ended as {outcome:?}"),
                // operator input ran out: nothing left to drive the loop
                Err(WorkflowError::Ui(e)) => return Err(e.into()),
                Err(e) => self.write(&format!("Action failed: {e}\n")),
            }
        }
    }
}
