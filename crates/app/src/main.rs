use ledger::{JsonFileStore, LedgerState, TracingSink};

use crate::{console::TerminalConsole, error::Result, shell::Shell};

mod console;
mod error;
mod settings;
mod shell;

fn main() -> Result<()> {
    let settings = settings::load()?;

    tracing_subscriber::fmt()
        .with_env_filter(format!(
            "expense_tracker={level},ledger={level}",
            level = settings.log_level
        ))
        .with_writer(std::io::stderr)
        .init();

    let ledger = LedgerState::builder()
        .verifier(settings.verifier()?)
        .events(TracingSink)
        .build();
    let store = JsonFileStore::new(&settings.data_file);
    tracing::debug!("using data file {}", store.path().display());

    let mut shell = Shell::new(ledger, store, TerminalConsole, &settings.currency_symbol);
    if let Err(err) = shell.run() {
        tracing::error!("expense tracker stopped: {err}");
        return Err(err);
    }
    Ok(())
}
