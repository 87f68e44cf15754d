//! Interactive filter session.
//!
//! The loop owns a [`Chain`] and feeds it one criterion per line. A line that
//! fails (bad input, unreachable ledger) is reported and leaves the chain as
//! it was.

use crate::commands::filter::matching_products;
use crate::commands::show::load_details;
use crate::config::Config;
use crate::error::{CliError, Result};
use crate::expr;
use crate::output::Formatter;
use crate::validation;
use carbontrace_domain::{Product, ProductDetails, ProductId};
use carbontrace_filter::{Chain, Criterion, FilterEngine, Mode};
use carbontrace_store::SqliteLedger;
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;
use std::path::PathBuf;
use tracing::warn;

/// Run the interactive REPL.
pub fn run_repl(config: &Config, ledger: &SqliteLedger, formatter: &Formatter) -> Result<()> {
    println!("{}", formatter.info("carbontrace - Type 'help' for commands, 'exit' to quit"));
    println!();

    let editor_config = rustyline::Config::builder()
        .max_history_size(config.settings.history_size)
        .map_err(editor_error)?
        .build();
    let mut editor = DefaultEditor::with_config(editor_config).map_err(editor_error)?;

    let history_path = get_history_path()?;
    if editor.load_history(&history_path).is_err() {
        warn!(path = %history_path.display(), "No readable REPL history");
    }

    let mut session = Session::new();

    loop {
        match editor.readline(&session.prompt()) {
            Ok(line) => {
                let line = line.trim();

                if line.is_empty() {
                    continue;
                }

                editor.add_history_entry(line).ok();

                let outcome = parse_repl_command(line).and_then(|cmd| session.execute(cmd, ledger));
                match outcome {
                    Ok(Outcome::Exit) => {
                        println!("{}", formatter.info("Goodbye!"));
                        break;
                    }
                    Ok(outcome) => {
                        if let Err(e) = print_outcome(outcome, &session, formatter) {
                            eprintln!("{}", formatter.error(&e.to_string()));
                        }
                    }
                    Err(e) => {
                        eprintln!("{}", formatter.error(&e.to_string()));
                    }
                }
            }
            Err(ReadlineError::Interrupted) => {
                println!("{}", formatter.info("Use 'exit' to quit"));
            }
            Err(ReadlineError::Eof) => {
                break;
            }
            Err(err) => {
                eprintln!("{}", formatter.error(&format!("Error: {}", err)));
                break;
            }
        }
    }

    editor.save_history(&history_path).ok();

    Ok(())
}

/// REPL command type.
#[derive(Debug)]
pub enum ReplCommand {
    /// Start a new chain
    Where(Criterion),
    /// Combine one more criterion with the current results
    Combine(Mode, Criterion),
    /// Print the current results
    Results,
    /// Detailed view of one product
    Detail(ProductId),
    /// Print the chain's steps
    Steps,
    /// Drop the chain
    Reset,
    /// List filterable fields
    Fields,
    /// Print help
    Help,
    /// Leave the REPL
    Exit,
}

/// What a command produced.
#[derive(Debug)]
pub enum Outcome {
    /// A filter step was applied; the products now matched
    Step(Vec<Product>),
    /// Products matched so far
    Results(Vec<Product>),
    /// One product with its history
    Details(Box<ProductDetails>),
    /// Chain steps should be shown
    Steps,
    /// The chain was dropped
    Reset,
    /// Field table should be shown
    Fields,
    /// Help should be shown
    Help,
    /// Leave the REPL
    Exit,
}

/// Loop state of an interactive session.
#[derive(Debug, Default)]
pub struct Session {
    chain: Chain,
}

impl Session {
    /// Create a session with no filter applied.
    pub fn new() -> Self {
        Self::default()
    }

    /// The current chain.
    pub fn chain(&self) -> &Chain {
        &self.chain
    }

    /// Prompt showing how many products are matched.
    pub fn prompt(&self) -> String {
        if self.chain.is_started() {
            format!("carbontrace [{}]> ", self.chain.results().len())
        } else {
            "carbontrace> ".to_string()
        }
    }

    /// Run one command against `ledger`.
    pub fn execute(&mut self, cmd: ReplCommand, ledger: &SqliteLedger) -> Result<Outcome> {
        let engine = FilterEngine::new(ledger, ledger);

        match cmd {
            ReplCommand::Where(criterion) => {
                let mut chain = Chain::new();
                engine.apply(&mut chain, Mode::Or, criterion)?;
                self.chain = chain;
                Ok(Outcome::Step(matching_products(ledger, self.chain.results())?))
            }
            ReplCommand::Combine(mode, criterion) => {
                if !self.chain.is_started() {
                    return Err(CliError::InvalidInput(
                        "No filter yet. Start one with 'where <field> <op> <value>'".to_string(),
                    ));
                }
                engine.apply(&mut self.chain, mode, criterion)?;
                Ok(Outcome::Step(matching_products(ledger, self.chain.results())?))
            }
            ReplCommand::Results => Ok(Outcome::Results(matching_products(ledger, self.chain.results())?)),
            ReplCommand::Detail(id) => Ok(Outcome::Details(Box::new(load_details(ledger, id)?))),
            ReplCommand::Steps => Ok(Outcome::Steps),
            ReplCommand::Reset => {
                self.chain.reset();
                Ok(Outcome::Reset)
            }
            ReplCommand::Fields => Ok(Outcome::Fields),
            ReplCommand::Help => Ok(Outcome::Help),
            ReplCommand::Exit => Ok(Outcome::Exit),
        }
    }
}

/// Parse a REPL command line.
pub fn parse_repl_command(line: &str) -> Result<ReplCommand> {
    let parts = expr::tokenize(line)?;

    let Some(head) = parts.first() else {
        return Err(CliError::InvalidInput("Empty command".to_string()));
    };

    match head.text.to_lowercase().as_str() {
        "exit" | "quit" | "q" => Ok(ReplCommand::Exit),
        "help" | "?" => Ok(ReplCommand::Help),
        "where" | "filter" => Ok(ReplCommand::Where(expr::parse_criterion(&parts[1..])?)),
        "and" | "or" => {
            let mode = head
                .mode()
                .ok_or_else(|| CliError::InvalidInput(format!("Unknown logic: {}", head)))?;
            Ok(ReplCommand::Combine(mode, expr::parse_criterion(&parts[1..])?))
        }
        "results" | "r" => Ok(ReplCommand::Results),
        "detail" | "show" => {
            let raw = parts
                .get(1)
                .ok_or_else(|| CliError::InvalidInput("Usage: detail <id>".to_string()))?;
            Ok(ReplCommand::Detail(ProductId::new(validation::product_id(&raw.text)?)))
        }
        "steps" => Ok(ReplCommand::Steps),
        "reset" => Ok(ReplCommand::Reset),
        "fields" => Ok(ReplCommand::Fields),
        _ => Err(CliError::InvalidInput(format!(
            "Unknown command: {}. Type 'help' for available commands.",
            head
        ))),
    }
}

fn print_outcome(outcome: Outcome, session: &Session, formatter: &Formatter) -> Result<()> {
    match outcome {
        Outcome::Step(products) => {
            if products.is_empty() {
                println!("{}", formatter.warning("No products match"));
            } else {
                println!("{}", formatter.format_products(&products)?);
                println!(
                    "{}",
                    formatter.info("Narrow with 'and ...', widen with 'or ...', or 'detail <id>'")
                );
            }
        }
        Outcome::Results(products) => {
            println!("{}", formatter.format_products(&products)?);
        }
        Outcome::Details(details) => {
            println!("{}", formatter.format_details(&details)?);
        }
        Outcome::Steps => {
            println!("{}", formatter.format_steps(session.chain().steps()));
        }
        Outcome::Reset => {
            println!("{}", formatter.success("Filter cleared"));
        }
        Outcome::Fields => {
            println!("{}", formatter.format_fields());
        }
        Outcome::Help => print_help(formatter),
        Outcome::Exit => {}
    }
    Ok(())
}

fn editor_error(e: ReadlineError) -> CliError {
    CliError::Io(std::io::Error::other(format!(
        "Failed to initialize editor: {}",
        e
    )))
}

fn get_history_path() -> Result<PathBuf> {
    let dir = Config::home()?;
    std::fs::create_dir_all(&dir)?;
    Ok(dir.join("history.txt"))
}

fn print_help(formatter: &Formatter) {
    println!("{}", formatter.info("Available commands:"));
    println!();
    println!("  where <field> <op> <value>  - Start a new filter");
    println!("  and <field> <op> <value>    - Keep only products also matching");
    println!("  or <field> <op> <value>     - Add products matching");
    println!("    op: = > >= < <=  (addresses, names and ended accept only =)");
    println!("    quote values with spaces: name = \"Raw Cotton\"");
    println!("  results, r                  - Show matched products");
    println!("  detail <id>                 - Show a product with its history");
    println!("  steps                       - Show the filter chain");
    println!("  reset                       - Clear the filter");
    println!("  fields                      - List filterable fields");
    println!("  help, ?                     - Show this help");
    println!("  exit, quit, q               - Exit REPL");
    println!();
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::testing::{self, SUPPLIER};
    use carbontrace_filter::Field;

    fn run(session: &mut Session, ledger: &SqliteLedger, line: &str) -> Result<Outcome> {
        parse_repl_command(line).and_then(|cmd| session.execute(cmd, ledger))
    }

    fn ids(session: &Session) -> Vec<u64> {
        session.chain().results().iter().map(|id| id.value()).collect()
    }

    #[test]
    fn test_parse_commands() {
        assert!(matches!(parse_repl_command("exit"), Ok(ReplCommand::Exit)));
        assert!(matches!(parse_repl_command("?"), Ok(ReplCommand::Help)));
        assert!(matches!(
            parse_repl_command("detail 4"),
            Ok(ReplCommand::Detail(id)) if id == ProductId::new(4)
        ));
        match parse_repl_command("AND lot <= 3") {
            Ok(ReplCommand::Combine(Mode::And, c)) => assert_eq!(c.field(), Field::Lot),
            other => panic!("Expected AND step, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_errors() {
        assert!(parse_repl_command("detail").is_err());
        assert!(parse_repl_command("detail 0").is_err());
        assert!(parse_repl_command("where cf").is_err());
        assert!(parse_repl_command("frobnicate").is_err());
    }

    #[test]
    fn test_session_flow() {
        let ledger = testing::ledger();
        let mut session = Session::new();
        assert_eq!(session.prompt(), "carbontrace> ");

        let outcome = run(&mut session, &ledger, &format!("where supplier = {}", SUPPLIER)).unwrap();
        assert!(matches!(outcome, Outcome::Step(ref p) if p.len() == 2));
        assert_eq!(session.prompt(), "carbontrace [2]> ");

        run(&mut session, &ledger, "and cf > 100").unwrap();
        assert_eq!(ids(&session), vec![2]);

        run(&mut session, &ledger, "or ended = yes").unwrap();
        assert_eq!(ids(&session), vec![2, 3]);
        assert_eq!(session.chain().steps().len(), 3);

        let outcome = run(&mut session, &ledger, "detail 3").unwrap();
        assert!(matches!(outcome, Outcome::Details(ref d) if d.product.name == "Scarf"));

        run(&mut session, &ledger, "reset").unwrap();
        assert!(!session.chain().is_started());
    }

    #[test]
    fn test_where_replaces_chain() {
        let ledger = testing::ledger();
        let mut session = Session::new();

        run(&mut session, &ledger, "where cf >= 80").unwrap();
        run(&mut session, &ledger, "where id = 1").unwrap();
        assert_eq!(ids(&session), vec![1]);
        assert_eq!(session.chain().steps().len(), 1);
    }

    #[test]
    fn test_failed_step_keeps_results() {
        let ledger = testing::ledger();
        let mut session = Session::new();

        run(&mut session, &ledger, "where cf >= 80").unwrap();
        assert!(run(&mut session, &ledger, "and owner >= 0x1111111111111111111111111111111111111111").is_err());
        assert!(run(&mut session, &ledger, "where colour = red").is_err());
        assert!(run(&mut session, &ledger, "detail 42").is_err());

        assert_eq!(ids(&session), vec![2, 3]);
        assert_eq!(session.chain().steps().len(), 1);
    }

    #[test]
    fn test_combine_requires_started_chain() {
        let ledger = testing::ledger();
        let mut session = Session::new();

        let err = run(&mut session, &ledger, "and cf > 1").unwrap_err();
        assert!(matches!(err, CliError::InvalidInput(_)));
    }
}
