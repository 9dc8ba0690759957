use std::io::{BufRead, Write};

use anyhow::Context;

use crate::port::{Confirmation, OperatorPrompt};

//Blocks on stdin. Runs on the current-thread runtime, nothing else is pending meanwhile.
#[derive(Debug, Default)]
pub struct ConsolePrompt;

impl OperatorPrompt for ConsolePrompt {
    fn ask(&self, question: &str) -> anyhow::Result<Confirmation> {
        let mut stdout = std::io::stdout().lock();
        write!(stdout, "{}", question)?;
        stdout.flush()?;

        let mut answer = String::new();
        let read = std::io::stdin()
            .lock()
            .read_line(&mut answer)
            .context("Error reading operator answer")?;

        if read == 0 {
            anyhow::bail!("No operator answer, stdin is closed");
        }

        Ok(Confirmation::from_answer(&answer))
    }
}
