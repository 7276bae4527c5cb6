// file: src/select/selector.rs
// version: 1.1.0
// guid: 08070a8c-a8c4-45e7-85a7-1255e3dfcd40

//! Interactive index selection

use super::{table, Selectable};
use crate::error::{AzaError, Result};
use crossterm::{
    cursor::MoveTo,
    execute,
    terminal::{Clear, ClearType},
    tty::IsTty,
};
use std::io::{self, Write};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader, Stdin};
use tracing::debug;

/// Resolve one line of user input to an index into a list of `len` records
pub fn resolve_index(input: &str, len: usize) -> Result<usize> {
    let trimmed = input.trim();
    let index: usize = trimmed
        .parse()
        .map_err(|_| AzaError::invalid_selection(format!("'{}' is not a valid index", trimmed)))?;

    if index >= len {
        return Err(AzaError::invalid_selection(format!(
            "{} is out of range (0-{})",
            index,
            len.saturating_sub(1)
        )));
    }

    Ok(index)
}

/// Presents a table of records and reads a single index
///
/// There is no re-prompt: one bad answer ends the selection with
/// `InvalidSelection`, and end of input ends it with `Cancelled`.
pub struct Selector<R, W> {
    input: R,
    output: W,
    terminal: bool,
}

/// Selector bound to the process's stdin/stdout
pub type TerminalSelector = Selector<BufReader<Stdin>, io::Stdout>;

impl TerminalSelector {
    pub fn terminal() -> Self {
        let stdout = io::stdout();
        let terminal = stdout.is_tty();
        Selector::new(BufReader::new(tokio::io::stdin()), stdout).with_terminal(terminal)
    }
}

impl<R, W> Selector<R, W>
where
    R: AsyncBufRead + Unpin + Send,
    W: Write + Send,
{
    pub fn new(input: R, output: W) -> Self {
        Self {
            input,
            output,
            terminal: false,
        }
    }

    /// Clear the screen and colour the table when talking to a real terminal
    pub fn with_terminal(mut self, terminal: bool) -> Self {
        self.terminal = terminal;
        self
    }

    pub fn output(&self) -> &W {
        &self.output
    }

    /// Show `records`, ask `prompt`, and return the chosen record
    pub async fn select<T: Selectable + Clone>(&mut self, records: &[T], prompt: &str) -> Result<T> {
        self.clear()?;
        write!(self.output, "{}", table::render(records, self.terminal))?;
        write!(self.output, "{}", prompt)?;
        self.output.flush()?;

        let mut line = String::new();
        let read = self.input.read_line(&mut line).await?;
        if read == 0 {
            writeln!(self.output)?;
            return Err(AzaError::Cancelled);
        }

        let index = resolve_index(&line, records.len())?;
        let chosen = records[index].clone();
        debug!("Selected index {}", index);

        self.clear()?;
        writeln!(self.output, "\n{}", chosen.describe())?;
        self.output.flush()?;

        Ok(chosen)
    }

    fn clear(&mut self) -> io::Result<()> {
        if self.terminal {
            execute!(self.output, Clear(ClearType::All), MoveTo(0, 0))?;
        }
        Ok(())
    }
}
