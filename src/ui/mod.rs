//! Operator interaction
//!
//! The [`Ui`] trait is the boundary to whatever renders prompts; the
//! workflow only sees typed values obtained through the prompt helpers in
//! [`prompts`]. [`Console`] is the stdin/stdout implementation used by the
//! binary.

mod console;
mod prompts;

use std::io;

use thiserror::Error;

pub use console::Console;
pub use prompts::{
    prompt_address, prompt_address_or, prompt_amount, prompt_bool, prompt_url,
    prompt_withdraw_amount, WithdrawAmount,
};

#[cfg(test)]
pub(crate) use prompts::testing::ScriptedUi;

/// Operator input errors
#[derive(Error, Debug)]
pub enum UiError {
    #[error("terminal i/o failed: {0}")]
    Io(#[from] io::Error),
    #[error("input stream closed")]
    Eof,
}

/// Minimal prompt surface the workflow drives
pub trait Ui {
    /// Show text to the operator
    fn write(&mut self, text: &str);

    /// Ask for one line of input
    fn read_line(&mut self, prompt: &str) -> Result<String, UiError>;

    /// Ask the operator to pick one of `options`; returns its index
    fn choose(&mut self, prompt: &str, options: &[&str]) -> Result<usize, UiError>;
}
