//! Interactive command shell over a [`Blockchain`].
//!
//! The shell is generic over its input and output so sessions can be scripted.

use crate::blockchain::{Block, Blockchain, Party};
use crate::config::PartyConfig;
use crate::error::ChainError;
use crate::miner::Miner;
use indicatif::{ProgressBar, ProgressStyle};
use std::io::{BufRead, Write};
use std::str::FromStr;
use std::time::Duration;
use thiserror::Error;
use tracing::debug;

const HELP: &str = "Valid commands:
    mine: discovers the nonce for a given transaction
    append: appends a new block onto the end of the chain
    remove: removes the last block from the end of the chain
    check: checks that the block chain is valid
    report: reports the balances of both parties
    help: prints this list of commands
    quit: quits the program";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Mine,
    Append,
    Remove,
    Check,
    Report,
    Help,
    Quit,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown command '{0}'")]
pub struct UnknownCommand(pub String);

impl FromStr for Command {
    type Err = UnknownCommand;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "mine" => Ok(Command::Mine),
            "append" => Ok(Command::Append),
            "remove" => Ok(Command::Remove),
            "check" => Ok(Command::Check),
            "report" => Ok(Command::Report),
            "help" => Ok(Command::Help),
            "quit" => Ok(Command::Quit),
            other => Err(UnknownCommand(other.to_string())),
        }
    }
}

pub struct Shell {
    chain: Blockchain,
    miner: Miner,
    parties: PartyConfig,
    show_progress: bool,
}

impl Shell {
    pub fn new(chain: Blockchain, miner: Miner, parties: PartyConfig) -> Self {
        Shell {
            chain,
            miner,
            parties,
            show_progress: false,
        }
    }

    /// Shows a spinner on stderr while mining. It stays hidden when stderr is not a terminal.
    pub fn with_progress(mut self, show_progress: bool) -> Self {
        self.show_progress = show_progress;
        self
    }

    pub fn chain(&self) -> &Blockchain {
        &self.chain
    }

    pub fn into_chain(self) -> Blockchain {
        self.chain
    }

    /// Runs commands until `quit` or end of input.
    pub fn run<R: BufRead, W: Write>(&mut self, mut input: R, mut out: W) -> Result<(), ChainError> {
        loop {
            writeln!(out, "{}", self.chain)?;
            let Some(line) = prompt(&mut input, &mut out, "Command? ")? else {
                break;
            };
            match line.parse::<Command>() {
                Ok(Command::Quit) => break,
                Ok(command) => {
                    if !self.execute(command, &mut input, &mut out)? {
                        break;
                    }
                }
                Err(e) => {
                    debug!("{}", e);
                    writeln!(out, "Invalid command. Type 'help' for a list of commands.")?;
                }
            }
        }
        out.flush()?;
        Ok(())
    }

    /// Runs one command. Returns false when input ran out mid-command.
    pub fn execute<R: BufRead, W: Write>(
        &mut self,
        command: Command,
        input: &mut R,
        out: &mut W,
    ) -> Result<bool, ChainError> {
        match command {
            Command::Help => writeln!(out, "{}", HELP)?,
            Command::Mine => {
                let Some(amount) = read_amount(input, out)? else {
                    return Ok(false);
                };
                if let Some(amount) = amount {
                    let block = self.mine(amount)?;
                    writeln!(out, "amount = {}, nonce = {}", amount, block.nonce())?;
                }
            }
            Command::Append => {
                let Some(amount) = read_amount(input, out)? else {
                    return Ok(false);
                };
                let Some(amount) = amount else {
                    return Ok(true);
                };
                let Some(nonce) = prompt(input, out, "Nonce? ")? else {
                    return Ok(false);
                };
                let Ok(nonce) = nonce.parse::<u64>() else {
                    writeln!(out, "Invalid nonce.")?;
                    return Ok(true);
                };
                let block = Block::reconstruct(
                    self.chain.next_index(),
                    amount,
                    Some(self.chain.tail_digest().clone()),
                    nonce,
                );
                if let Err(e) = self.chain.append(block) {
                    writeln!(out, "Error appending block: {}", self.describe(&e))?;
                }
            }
            Command::Remove => {
                if !self.chain.remove_last() {
                    writeln!(out, "Cannot remove genesis block.")?;
                }
            }
            Command::Check => {
                if self.chain.validate() {
                    writeln!(out, "Chain is valid!")?;
                } else {
                    writeln!(out, "Chain is invalid!")?;
                }
            }
            Command::Report => {
                let balances = self.chain.compute_balances();
                writeln!(
                    out,
                    "{}: {}, {}: {}",
                    self.parties.first, balances.first, self.parties.second, balances.second
                )?;
            }
            Command::Quit => return Ok(false),
        }
        Ok(true)
    }

    fn mine(&self, amount: i32) -> Result<Block, ChainError> {
        let spinner = if self.show_progress {
            ProgressBar::new_spinner()
        } else {
            ProgressBar::hidden()
        };
        if let Ok(style) = ProgressStyle::with_template("{spinner} {msg} [{elapsed}]") {
            spinner.set_style(style);
        }
        spinner.set_message(format!("mining block {}", self.chain.next_index()));
        spinner.enable_steady_tick(Duration::from_millis(100));

        let job = self.miner.spawn_next(&self.chain, amount)?;
        let block = job.wait();
        spinner.finish_and_clear();
        block.ok_or_else(|| ChainError::Miner("mining worker stopped without a result".into()))
    }

    fn party_name(&self, party: Party) -> &str {
        match party {
            Party::First => &self.parties.first,
            Party::Second => &self.parties.second,
        }
    }

    fn describe(&self, err: &ChainError) -> String {
        match err {
            ChainError::InsufficientFunds { party, .. } => {
                format!("Insufficient funds for {}.", self.party_name(*party))
            }
            ChainError::InvalidBlockNumber { .. } => "Block number is incorrect.".to_string(),
            ChainError::InvalidBlockLinkage { .. } => "Previous hash does not match.".to_string(),
            other => other.to_string(),
        }
    }
}

/// Writes `message` and reads one trimmed line. `None` at end of input.
fn prompt<R: BufRead, W: Write>(
    input: &mut R,
    out: &mut W,
    message: &str,
) -> Result<Option<String>, ChainError> {
    write!(out, "{}", message)?;
    out.flush()?;
    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        return Ok(None);
    }
    Ok(Some(line.trim().to_string()))
}

/// Outer `None` is end of input, inner `None` an unparseable amount.
fn read_amount<R: BufRead, W: Write>(
    input: &mut R,
    out: &mut W,
) -> Result<Option<Option<i32>>, ChainError> {
    let Some(line) = prompt(input, out, "Amount transferred? ")? else {
        return Ok(None);
    };
    match line.parse::<i32>() {
        Ok(amount) => Ok(Some(Some(amount))),
        Err(_) => {
            writeln!(out, "Invalid amount.")?;
            Ok(Some(None))
        }
    }
}
