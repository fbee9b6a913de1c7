//! Interactive menu driving the ledger.

use ledger::{InputError, LedgerError, LedgerState, LoadOutcome, PersistenceStore, SummaryReport};

use crate::{console::Console, error::Result};

const MENU: &[&str] = &[
    "",
    "1. Set Username and Password",
    "2. Login",
    "3. Insert Income",
    "4. Add Expense",
    "5. View Expenses",
    "6. Save Data",
    "7. Exit",
];

const PASSWORD_ATTEMPTS: usize = 3;

pub struct Shell<C, S> {
    ledger: LedgerState,
    store: S,
    console: C,
    currency: String,
    authenticated: bool,
}

impl<C: Console, S: PersistenceStore> Shell<C, S> {
    pub fn new(ledger: LedgerState, store: S, console: C, currency: &str) -> Self {
        Self {
            ledger,
            store,
            console,
            currency: currency.to_string(),
            authenticated: false,
        }
    }

    /// Loads the stored data, then serves the menu until the user exits or
    /// input ends.
    pub fn run(&mut self) -> Result<()> {
        match self.ledger.load(&self.store)? {
            LoadOutcome::Loaded => self.console.say("Data loaded successfully!")?,
            LoadOutcome::Fresh => self
                .console
                .say("No previous data found. Starting with a fresh Expense Tracker.")?,
        }

        loop {
            for line in MENU {
                self.console.say(line)?;
            }
            let Some(choice) = self
                .console
                .read_line("Enter your choice ( 1, 2, 3, 4, 5, 6, 7 ): ")?
            else {
                break;
            };

            match choice.trim() {
                "1" => self.set_credentials()?,
                "2" => self.login()?,
                "7" => {
                    self.console.say("Exiting the Expense Tracker. Goodbye!")?;
                    break;
                }
                choice @ ("3" | "4" | "5" | "6") => {
                    if self.require_session()? {
                        match choice {
                            "3" => self.insert_income()?,
                            "4" => self.add_expense()?,
                            "5" => self.view_expenses()?,
                            _ => self.save()?,
                        }
                    }
                }
                _ => self
                    .console
                    .say("Invalid choice. Please enter a number from 1 to 7.")?,
            }
        }
        Ok(())
    }

    #[cfg(test)]
    pub fn ledger(&self) -> &LedgerState {
        &self.ledger
    }

    #[cfg(test)]
    pub fn console(&self) -> &C {
        &self.console
    }

    fn require_session(&mut self) -> Result<bool> {
        if !self.ledger.has_credentials() {
            self.console
                .say("Please set username and password first (Option 1).")?;
            return Ok(false);
        }
        if !self.authenticated {
            self.console.say("Please log in first (Option 2).")?;
            return Ok(false);
        }
        Ok(true)
    }

    fn set_credentials(&mut self) -> Result<()> {
        if self.ledger.has_credentials() {
            return self.console.say("Credentials already set. Cannot set again.");
        }

        let Some(username) = self.console.read_line("Enter username: ")? else {
            return Ok(());
        };
        let username = username.trim().to_string();
        if username.is_empty() {
            return self.console.say("Username must not be empty.");
        }
        let Some(password) = self.new_password()? else {
            return self.console.say("Credentials not set.");
        };

        self.ledger.set_credentials(&username, &password)?;
        self.authenticated = true;
        self.console.say("Credentials set successfully!")
    }

    fn new_password(&mut self) -> Result<Option<String>> {
        for _ in 0..PASSWORD_ATTEMPTS {
            let Some(first) = self.console.read_password("Enter password: ")? else {
                return Ok(None);
            };
            if first.is_empty() {
                self.console.say("Password must not be empty.")?;
                continue;
            }
            let Some(second) = self.console.read_password("Confirm password: ")? else {
                return Ok(None);
            };
            if first == second {
                return Ok(Some(first));
            }
            self.console.say("Passwords do not match. Try again.")?;
        }
        Ok(None)
    }

    fn login(&mut self) -> Result<()> {
        if !self.ledger.has_credentials() {
            return self
                .console
                .say("Please set username and password first (Option 1).");
        }

        let Some(username) = self.console.read_line("Enter username: ")? else {
            return Ok(());
        };
        let Some(password) = self.console.read_password("Enter password: ")? else {
            return Ok(());
        };

        if self.ledger.check_credentials(username.trim(), &password) {
            self.authenticated = true;
            self.console.say("Login successful!")
        } else {
            self.console.say("Invalid credentials. Please try again.")
        }
    }

    fn insert_income(&mut self) -> Result<()> {
        let Some(raw) = self.console.read_line("Enter your monthly income: ")? else {
            return Ok(());
        };
        match self.ledger.set_income(&raw) {
            Ok(()) => {
                let line = format!(
                    "Income of {}{} recorded successfully.",
                    self.currency,
                    self.ledger.income()
                );
                self.console.say(&line)
            }
            Err(err) => self.console.say(input_message(&err)),
        }
    }

    fn add_expense(&mut self) -> Result<()> {
        let Some(category) = self.console.read_line("Enter the expense category: ")? else {
            return Ok(());
        };
        let Some(amount) = self.console.read_line("Enter the expense amount: ")? else {
            return Ok(());
        };
        match self.ledger.add_expense(&category, &amount) {
            Ok(()) => self.console.say("Expense added successfully!"),
            Err(err) => self.console.say(input_message(&err)),
        }
    }

    fn view_expenses(&mut self) -> Result<()> {
        let lines = render_summary(&self.ledger.view_summary(), &self.currency);
        for line in &lines {
            self.console.say(line)?;
        }
        Ok(())
    }

    fn save(&mut self) -> Result<()> {
        match self.ledger.persist(&self.store) {
            Ok(()) => self.console.say("Data saved successfully!"),
            Err(err @ (LedgerError::Io(_) | LedgerError::Json(_))) => {
                self.console.say(&format!("Could not save data: {err}"))
            }
            Err(err) => Err(err.into()),
        }
    }
}

fn input_message(err: &InputError) -> &'static str {
    match err {
        InputError::NotANumber(_) => "Invalid input. Please enter a valid number.",
        InputError::Negative => "Income must be a non-negative number.",
        InputError::NonPositiveAmount => "Amount must be a positive number.",
        InputError::InvalidCategory => "Invalid category name.",
        InputError::Overflow => "Amount is too large.",
    }
}

/// Text lines shown for option 5.
pub fn render_summary(report: &SummaryReport, currency: &str) -> Vec<String> {
    let SummaryReport::Totals(summary) = report else {
        return vec!["No expenses recorded yet.".to_string()];
    };

    let mut lines = vec![String::new(), "Expense Tracker:".to_string()];
    for (category, total) in &summary.categories {
        lines.push(format!("{category}: {currency}{total}"));
    }
    lines.push(format!(
        "Total Expenses: {currency}{}",
        summary.total_expenses
    ));
    lines.push(format!(
        "Remaining Income: {currency}{}",
        summary.remaining_income
    ));
    if summary.over_budget {
        lines.push("Warning: You have exceeded your monthly income!".to_string());
    }
    lines
}

#[cfg(test)]
mod tests {
    use std::collections::VecDeque;

    use ledger::{Argon2Verifier, JsonFileStore, MoneyCents};

    use super::*;

    #[derive(Debug, Default)]
    struct ScriptedConsole {
        lines: VecDeque<String>,
        passwords: VecDeque<String>,
        output: Vec<String>,
    }

    impl ScriptedConsole {
        fn new(lines: &[&str], passwords: &[&str]) -> Self {
            Self {
                lines: lines.iter().map(|s| s.to_string()).collect(),
                passwords: passwords.iter().map(|s| s.to_string()).collect(),
                output: Vec::new(),
            }
        }

        fn said(&self, line: &str) -> bool {
            self.output.iter().any(|l| l == line)
        }
    }

    impl Console for ScriptedConsole {
        fn read_line(&mut self, _prompt: &str) -> Result<Option<String>> {
            Ok(self.lines.pop_front())
        }

        fn read_password(&mut self, _prompt: &str) -> Result<Option<String>> {
            Ok(self.passwords.pop_front())
        }

        fn say(&mut self, line: &str) -> Result<()> {
            self.output.push(line.to_string());
            Ok(())
        }
    }

    fn cheap_ledger() -> LedgerState {
        LedgerState::builder()
            .verifier(Argon2Verifier::with_params(8, 1, 1).unwrap())
            .build()
    }

    fn run(
        store: JsonFileStore,
        lines: &[&str],
        passwords: &[&str],
    ) -> Shell<ScriptedConsole, JsonFileStore> {
        let mut shell = Shell::new(cheap_ledger(), store, ScriptedConsole::new(lines, passwords), "₹");
        shell.run().unwrap();
        shell
    }

    #[test]
    fn full_session_saves_and_reloads() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("data.json");

        let shell = run(
            JsonFileStore::new(&path),
            &["1", "asha", "3", "1500", "4", "Food", "1800", "5", "6", "7"],
            &["pw", "pw"],
        );
        let console = shell.console();
        assert!(console.said("No previous data found. Starting with a fresh Expense Tracker."));
        assert!(console.said("Credentials set successfully!"));
        assert!(console.said("Income of ₹1500.00 recorded successfully."));
        assert!(console.said("Food: ₹1800.00"));
        assert!(console.said("Remaining Income: ₹-300.00"));
        assert!(console.said("Warning: You have exceeded your monthly income!"));
        assert!(console.said("Data saved successfully!"));

        let shell = run(
            JsonFileStore::new(&path),
            &["1", "3", "2", "asha", "3", "2000", "7"],
            &["pw"],
        );
        let console = shell.console();
        assert!(console.said("Data loaded successfully!"));
        assert!(console.said("Credentials already set. Cannot set again."));
        assert!(console.said("Please log in first (Option 2)."));
        assert!(console.said("Login successful!"));
        assert_eq!(shell.ledger().income(), MoneyCents::new(200_000));
        assert_eq!(shell.ledger().expense_total("Food"), Some(MoneyCents::new(180_000)));
    }

    #[test]
    fn menu_requires_credentials_first() {
        let dir = tempfile::tempdir().unwrap();
        let shell = run(
            JsonFileStore::new(dir.path().join("data.json")),
            &["3", "2", "9"],
            &[],
        );

        let console = shell.console();
        assert_eq!(
            console
                .output
                .iter()
                .filter(|l| *l == "Please set username and password first (Option 1).")
                .count(),
            2
        );
        assert!(console.said("Invalid choice. Please enter a number from 1 to 7."));
        assert_eq!(shell.ledger().income(), MoneyCents::ZERO);
    }

    #[test]
    fn wrong_password_keeps_session_locked() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("data.json");
        run(JsonFileStore::new(&path), &["1", "asha", "6", "7"], &["pw", "pw"]);

        let shell = run(
            JsonFileStore::new(&path),
            &["2", "asha", "4", "7"],
            &["nope"],
        );
        let console = shell.console();
        assert!(console.said("Invalid credentials. Please try again."));
        assert!(console.said("Please log in first (Option 2)."));
        assert!(shell.ledger().expenses().is_empty());
    }

    #[test]
    fn password_confirmation_must_match() {
        let dir = tempfile::tempdir().unwrap();
        let shell = run(
            JsonFileStore::new(dir.path().join("data.json")),
            &["1", "asha", "7"],
            &["", "one", "two", "pw", "pw"],
        );

        let console = shell.console();
        assert!(console.said("Password must not be empty."));
        assert!(console.said("Passwords do not match. Try again."));
        assert!(console.said("Credentials set successfully!"));
        assert!(shell.ledger().check_credentials("asha", "pw"));
    }

    #[test]
    fn rejected_input_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let shell = run(
            JsonFileStore::new(dir.path().join("data.json")),
            &[
                "1", "asha", "3", "abc", "3", "-10", "4", "Food", "-5", "4", " ", "5", "5",
            ],
            &["pw", "pw"],
        );

        let console = shell.console();
        assert!(console.said("Invalid input. Please enter a valid number."));
        assert!(console.said("Income must be a non-negative number."));
        assert!(console.said("Amount must be a positive number."));
        assert!(console.said("Invalid category name."));
        assert!(console.said("No expenses recorded yet."));
    }

    #[test]
    fn summary_without_overspending_has_no_warning() {
        let mut ledger = cheap_ledger();
        ledger.set_income("100").unwrap();
        ledger.add_expense("Bus", "40").unwrap();

        let lines = render_summary(&ledger.view_summary(), "$");
        assert_eq!(
            lines,
            vec![
                "",
                "Expense Tracker:",
                "Bus: $40.00",
                "Total Expenses: $40.00",
                "Remaining Income: $60.00",
            ]
        );
    }
}
