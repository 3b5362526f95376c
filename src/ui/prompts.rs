//! Typed prompt helpers
//!
//! Each helper loops until the operator supplies something parseable, so
//! callers only ever receive validated values. Parsing lives in the
//! `types` module; these functions just drive the retry loop.

use std::str::FromStr;

use crate::types::{Address, Coins};

use super::{Ui, UiError};

fn prompt_parsed<T, E>(ui: &mut dyn Ui, prompt: &str) -> Result<T, UiError>
where
    T: FromStr<Err = E>,
    E: std::fmt::Display,
{
    loop {
        let line = ui.read_line(prompt)?;
        match line.trim().parse() {
            Ok(value) => return Ok(value),
            Err(e) => ui.write(&format!("{e}\nPlease try again.\n")),
        }
    }
}

/// Ask for an address
pub fn prompt_address(ui: &mut dyn Ui, prompt: &str) -> Result<Address, UiError> {
    prompt_parsed(ui, prompt)
}

/// Ask for an address, falling back to `default` on empty input
pub fn prompt_address_or(
    ui: &mut dyn Ui,
    prompt: &str,
    default: &Address,
) -> Result<Address, UiError> {
    loop {
        let line = ui.read_line(prompt)?;
        let line = line.trim();
        if line.is_empty() {
            return Ok(*default);
        }
        match line.parse() {
            Ok(value) => return Ok(value),
            Err(e) => ui.write(&format!("{e}\nPlease try again.\n")),
        }
    }
}

/// Ask for a decimal token amount
pub fn prompt_amount(ui: &mut dyn Ui, prompt: &str) -> Result<Coins, UiError> {
    prompt_parsed(ui, prompt)
}

/// Ask a yes/no question
pub fn prompt_bool(ui: &mut dyn Ui, prompt: &str) -> Result<bool, UiError> {
    loop {
        let line = ui.read_line(prompt)?;
        match line.trim().to_ascii_lowercase().as_str() {
            "yes" | "y" => return Ok(true),
            "no" | "n" => return Ok(false),
            _ => ui.write("Please answer yes or no.\n"),
        }
    }
}

/// Ask for a non-empty URI
pub fn prompt_url(ui: &mut dyn Ui, prompt: &str) -> Result<String, UiError> {
    loop {
        let line = ui.read_line(prompt)?;
        let line = line.trim();
        if !line.is_empty() {
            return Ok(line.to_string());
        }
        ui.write("Content URI must not be empty.\n");
    }
}

/// Operator intent for a withdrawal amount
///
/// Explicit, rather than inferred from a zero-amount sentinel: the
/// operator types `all` to drain the known balance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WithdrawAmount {
    /// Withdraw the full known balance
    All,
    /// Withdraw exactly this much
    Exact(Coins),
}

/// Ask for a withdrawal amount or the word `all`
pub fn prompt_withdraw_amount(ui: &mut dyn Ui, prompt: &str) -> Result<WithdrawAmount, UiError> {
    loop {
        let line = ui.read_line(prompt)?;
        let line = line.trim();
        if line.eq_ignore_ascii_case("all") {
            return Ok(WithdrawAmount::All);
        }
        match Coins::from_tokens(line) {
            Ok(amount) if !amount.is_zero() => return Ok(WithdrawAmount::Exact(amount)),
            Ok(_) => ui.write("Amount must be positive; type 'all' to withdraw everything.\n"),
            Err(e) => ui.write(&format!("{e}\nPlease try again.\n")),
        }
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use super::*;
    use std::collections::VecDeque;

    /// Scripted UI double: feeds canned answers and records output
    pub struct ScriptedUi {
        pub answers: VecDeque<String>,
        pub output: String,
    }

    impl ScriptedUi {
        pub fn new<I, S>(answers: I) -> Self
        where
            I: IntoIterator<Item = S>,
            S: Into<String>,
        {
            Self {
                answers: answers.into_iter().map(Into::into).collect(),
                output: String::new(),
            }
        }
    }

    impl Ui for ScriptedUi {
        fn write(&mut self, text: &str) {
            self.output.push_str(text);
        }

        fn read_line(&mut self, prompt: &str) -> Result<String, UiError> {
            self.output.push_str(prompt);
            self.output.push('\n');
            self.answers.pop_front().ok_or(UiError::Eof)
        }

        fn choose(&mut self, prompt: &str, options: &[&str]) -> Result<usize, UiError> {
            let answer = self.read_line(prompt)?;
            options
                .iter()
                .position(|o| *o == answer)
                .ok_or(UiError::Eof)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::testing::ScriptedUi;
    use super::*;

    #[test]
    fn test_prompt_amount_retries_until_valid() {
        let mut ui = ScriptedUi::new(["not a number", "1.5"]);
        let amount = prompt_amount(&mut ui, "Amount:").unwrap();
        assert_eq!(amount, Coins::from_nano(1_500_000_000));
        assert!(ui.output.contains("Please try again."));
    }

    #[test]
    fn test_prompt_bool_accepts_variants() {
        let mut ui = ScriptedUi::new(["maybe", "YES"]);
        assert!(prompt_bool(&mut ui, "Ok?").unwrap());

        let mut ui = ScriptedUi::new(["n"]);
        assert!(!prompt_bool(&mut ui, "Ok?").unwrap());
    }

    #[test]
    fn test_prompt_address_fallback() {
        let fallback = Address::new(0, [1u8; 32]);
        let mut ui = ScriptedUi::new([""]);
        assert_eq!(
            prompt_address_or(&mut ui, "To:", &fallback).unwrap(),
            fallback
        );
    }

    #[test]
    fn test_prompt_withdraw_amount_tristate() {
        let mut ui = ScriptedUi::new(["ALL"]);
        assert_eq!(
            prompt_withdraw_amount(&mut ui, "Amount:").unwrap(),
            WithdrawAmount::All
        );

        let mut ui = ScriptedUi::new(["0", "2"]);
        assert_eq!(
            prompt_withdraw_amount(&mut ui, "Amount:").unwrap(),
            WithdrawAmount::Exact(Coins::from_nano(2_000_000_000))
        );
        assert!(ui.output.contains("type 'all'"));
    }

    #[test]
    fn test_exhausted_script_is_eof() {
        let mut ui = ScriptedUi::new(Vec::<String>::new());
        assert!(matches!(
            prompt_address(&mut ui, "Addr:"),
            Err(UiError::Eof)
        ));
    }
}
