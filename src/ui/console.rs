//! Terminal implementation of the prompt surface

use std::io::{self, BufRead, Write as _};

use super::{Ui, UiError};

/// Stdin/stdout prompt surface
#[derive(Default)]
pub struct Console;

impl Console {
    pub fn new() -> Self {
        Console
    }
}

impl Ui for Console {
    fn write(&mut self, text: &str) {
        print!("{text}");
        let _ = io::stdout().flush();
    }

    fn read_line(&mut self, prompt: &str) -> Result<String, UiError> {
        print!("{prompt} ");
        io::stdout().flush()?;

        let mut line = String::new();
        let read = io::stdin().lock().read_line(&mut line)?;
        if read == 0 {
            return Err(UiError::Eof);
        }
        Ok(line.trim_end_matches(['\r', '\n']).to_string())
    }

    fn choose(&mut self, prompt: &str, options: &[&str]) -> Result<usize, UiError> {
        loop {
            println!("{prompt}");
            for (i, option) in options.iter().enumerate() {
                println!("  {}) {option}", i + 1);
            }
            let answer = self.read_line(">")?;
            match answer.trim().parse::<usize>() {
                Ok(n) if n >= 1 && n <= options.len() => return Ok(n - 1),
                _ => println!("Please enter a number between 1 and {}.", options.len()),
            }
        }
    }
}
