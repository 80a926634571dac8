//! Terminal front end for gobblet-engine.
//!
//! Reads one command per line from stdin and prints the board after every
//! change. Set `RUST_LOG=gobblet_engine=debug` to watch the engine's events.

mod render;

use std::io::{self, BufRead, Write};

use anyhow::{Context, Result};
use clap::Parser;
use gobblet_engine::{GameError, Response, Session, SessionConfig, Size, UndoPolicy};
use tracing::debug;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(author, version, about = "Play Gobblet Gobblers in the terminal")]
struct Cli {
    /// Allow undo to take back the first move of a game as well
    #[arg(long)]
    undo_first_move: bool,

    /// Answer yes to reclaim and reset prompts
    #[arg(short, long)]
    yes: bool,
}

impl Cli {
    fn session_config(&self) -> SessionConfig {
        SessionConfig {
            undo_policy: if self.undo_first_move {
                UndoPolicy::AnyMove
            } else {
                UndoPolicy::KeepFirstMove
            },
        }
    }
}

const HELP: &str = "\
Commands:
  s | m | l        select a small, medium or large piece
  x                clear the selection
  <cell>           act on a cell: row.col (1.1 to 3.3) or index 0-8
  <size> <cell>    select and act in one go, e.g. `l 2.2`
  u | undo         take back the last action
  reset            start a new game
  log              show the move log
  h | help         show this text
  q | quit         leave";

#[derive(Debug, PartialEq, Eq)]
enum Command {
    Select(Option<Size>),
    Cell(usize),
    SelectAndCell(Size, usize),
    Undo,
    Reset,
    Log,
    Help,
    Quit,
}

fn parse_size(word: &str) -> Option<Size> {
    match word {
        "s" | "small" => Some(Size::Small),
        "m" | "medium" => Some(Size::Medium),
        "l" | "large" => Some(Size::Large),
        _ => None,
    }
}

/// `row.col` with 1-based coordinates, or a raw index. Out-of-range values
/// are passed through so the engine reports them.
fn parse_cell(word: &str) -> Option<usize> {
    if let Some((row, col)) = word.split_once('.') {
        let row: usize = row.parse().ok()?;
        let col: usize = col.parse().ok()?;
        if !(1..=3).contains(&row) || !(1..=3).contains(&col) {
            return Some(usize::MAX);
        }
        return Some((row - 1) * 3 + (col - 1));
    }
    word.parse().ok()
}

fn parse_command(line: &str) -> Option<Command> {
    let line = line.trim().to_ascii_lowercase();
    let words: Vec<&str> = line.split_whitespace().collect();
    match words.as_slice() {
        ["x" | "none"] => Some(Command::Select(None)),
        ["u" | "undo"] => Some(Command::Undo),
        ["reset"] => Some(Command::Reset),
        ["log"] => Some(Command::Log),
        ["h" | "help" | "?"] => Some(Command::Help),
        ["q" | "quit" | "exit"] => Some(Command::Quit),
        [word] => parse_size(word)
            .map(|size| Command::Select(Some(size)))
            .or_else(|| parse_cell(word).map(Command::Cell)),
        [size, cell] => Some(Command::SelectAndCell(parse_size(size)?, parse_cell(cell)?)),
        _ => None,
    }
}

/// Ask a yes/no question on stdout, reading the answer from `lines`.
fn confirm<I>(lines: &mut I, question: &str) -> Result<bool>
where
    I: Iterator<Item = io::Result<String>>,
{
    print!("{} [y/N] ", question);
    io::stdout().flush()?;
    let Some(answer) = lines.next() else {
        return Ok(false);
    };
    let answer = answer.context("reading answer")?;
    Ok(matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes"))
}

fn show(session: &Session) {
    let view = session.view();
    print!("{}", render::board(&view));
    print!("{}", render::status(&view));
}

fn report(err: GameError) {
    println!("! {}", err);
}

fn act<I>(session: &mut Session, lines: &mut I, index: usize, assume_yes: bool) -> Result<()>
where
    I: Iterator<Item = io::Result<String>>,
{
    match session.act_on_cell(index, assume_yes) {
        Ok(Response::Applied(_)) => show(session),
        Ok(Response::ConfirmReclaim { at, piece }) => {
            let question = format!("Take your {} back from {}?", piece.size, at);
            if confirm(lines, &question)? {
                match session.act_on_cell(at.index(), true) {
                    Ok(_) => show(session),
                    Err(err) => report(err),
                }
            }
        }
        Err(err) => report(err),
    }
    Ok(())
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();
    let config = cli.session_config();
    debug!(?config, "starting session");

    let mut session = Session::with_config(config);
    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();

    println!("Gobblet Gobblers");
    println!("================");
    println!("Type `help` for commands.\n");
    show(&session);

    loop {
        print!("> ");
        io::stdout().flush()?;
        let Some(line) = lines.next() else {
            break;
        };
        let line = line.context("reading command")?;
        if line.trim().is_empty() {
            continue;
        }

        match parse_command(&line) {
            None => println!("? unknown command, try `help`"),
            Some(Command::Quit) => break,
            Some(Command::Help) => println!("{}", HELP),
            Some(Command::Select(size)) => {
                session.select_size(size);
                print!("{}", render::status(&session.view()));
            }
            Some(Command::Cell(index)) => act(&mut session, &mut lines, index, cli.yes)?,
            Some(Command::SelectAndCell(size, index)) => {
                session.select_size(Some(size));
                act(&mut session, &mut lines, index, cli.yes)?;
            }
            Some(Command::Undo) => match session.undo() {
                Some(_) => show(&session),
                None => println!("! nothing to undo"),
            },
            Some(Command::Reset) => {
                if cli.yes || confirm(&mut lines, "Start a new game?")? {
                    session.reset();
                    show(&session);
                }
            }
            Some(Command::Log) => {
                let mut empty = true;
                for line in session.move_log() {
                    println!("{}", line);
                    empty = false;
                }
                if empty {
                    println!("(no moves yet)");
                }
            }
        }
    }

    Ok(())
}
