//! Single-user expense ledger.
//!
//! [`LedgerState`] holds the credentials, the monthly income and the expense
//! totals per category. It enforces the ledger invariants on every mutation
//! and converts to and from a [`Snapshot`] for persistence.
//!
//! ```rust
//! use ledger::{Argon2Verifier, LedgerState, MoneyCents};
//!
//! let mut ledger = LedgerState::builder()
//!     .verifier(Argon2Verifier::with_params(8, 1, 1).unwrap())
//!     .build();
//! ledger.set_income("1500").unwrap();
//! ledger.add_expense("Food", "1800").unwrap();
//!
//! let report = ledger.view_summary();
//! let totals = report.totals().unwrap();
//! assert_eq!(totals.remaining_income, MoneyCents::new(-30_000));
//! assert!(totals.over_budget);
//! ```
use std::collections::BTreeMap;

pub use credentials::{Argon2Verifier, CredentialHash, CredentialVerifier};
pub use error::{CredentialError, InputError, LedgerError, ParseAmountError};
pub use events::{EventSink, Fields, NoopSink, TracingSink};
pub use money::MoneyCents;
pub use snapshot::{DEFAULT_DATA_FILE, JsonFileStore, PersistenceStore, Snapshot};
pub use summary::{Summary, SummaryReport};

use category::normalize_category;

mod category;
mod credentials;
mod error;
mod events;
mod money;
mod snapshot;
mod summary;

type ResultLedger<T> = Result<T, LedgerError>;

/// What [`LedgerState::load`] found in the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
    /// A snapshot was read and applied.
    Loaded,
    /// Nothing was stored; the state was left untouched.
    Fresh,
}

#[derive(Debug)]
pub struct LedgerState {
    username: Option<String>,
    credential_hash: Option<CredentialHash>,
    income: MoneyCents,
    expenses: BTreeMap<String, MoneyCents>,
    verifier: Box<dyn CredentialVerifier>,
    events: Box<dyn EventSink>,
}

impl Default for LedgerState {
    fn default() -> Self {
        LedgerState::builder().build()
    }
}

impl LedgerState {
    /// Return a builder for `LedgerState`. Help to build the struct.
    pub fn builder() -> LedgerStateBuilder {
        LedgerStateBuilder::default()
    }

    pub fn username(&self) -> Option<&str> {
        self.username.as_deref()
    }

    /// Returns `true` once a username and password hash are present, either
    /// set in this session or loaded from a snapshot.
    pub fn has_credentials(&self) -> bool {
        self.username.is_some() && self.credential_hash.is_some()
    }

    pub fn income(&self) -> MoneyCents {
        self.income
    }

    pub fn expenses(&self) -> &BTreeMap<String, MoneyCents> {
        &self.expenses
    }

    /// Running total of `category`, looked up by its normalized name.
    pub fn expense_total(&self, category: &str) -> Option<MoneyCents> {
        let key = normalize_category(category).ok()?;
        self.expenses.get(&key).copied()
    }

    /// Hashes `password` and stores it together with `username`.
    ///
    /// Calling it again replaces the existing credentials; callers that want
    /// set-once semantics check [`has_credentials`](Self::has_credentials)
    /// first. A hashing failure leaves the previous credentials in place.
    pub fn set_credentials(&mut self, username: &str, password: &str) -> ResultLedger<()> {
        let hash = self.verifier.hash(password).inspect_err(|err| {
            self.events.error(
                "password hashing failed",
                &[("user", username.to_string()), ("error", err.to_string())],
            );
        })?;

        if self.has_credentials() {
            self.events.warn(
                "overwriting existing credentials",
                &[("previous_user", self.username.clone().unwrap_or_default())],
            );
        }

        self.username = Some(username.to_string());
        self.credential_hash = Some(hash);
        self.events
            .info("credentials set", &[("user", username.to_string())]);
        Ok(())
    }

    /// Returns `true` iff `username` matches and `password` verifies against
    /// the stored hash. Always `false` before credentials exist.
    pub fn check_credentials(&self, username: &str, password: &str) -> bool {
        match (&self.username, &self.credential_hash) {
            (Some(stored), Some(hash)) => {
                stored == username && self.verifier.verify(password, hash)
            }
            _ => false,
        }
    }

    /// Replaces the income with the parsed value.
    pub fn set_income(&mut self, raw: &str) -> Result<(), InputError> {
        let income = match raw.parse::<MoneyCents>() {
            Ok(value) => value,
            Err(err) => {
                self.events
                    .warn("invalid input for income", &[("input", raw.to_string())]);
                return Err(err.into());
            }
        };
        if income.is_negative() {
            self.events
                .warn("attempted to set negative income", &[("income", income.to_string())]);
            return Err(InputError::Negative);
        }

        self.income = income;
        self.events
            .info("income recorded", &[("income", income.to_string())]);
        Ok(())
    }

    /// Adds `raw_amount` to the running total of `category`, creating the
    /// category on its first expense.
    pub fn add_expense(&mut self, category: &str, raw_amount: &str) -> Result<(), InputError> {
        let result = self.accumulate_expense(category, raw_amount);
        match &result {
            Ok((key, amount)) => self.events.info(
                "expense added",
                &[("category", key.clone()), ("amount", amount.to_string())],
            ),
            Err(err) => self.events.warn(
                "expense rejected",
                &[
                    ("category", category.to_string()),
                    ("input", raw_amount.to_string()),
                    ("reason", err.to_string()),
                ],
            ),
        }
        result.map(|_| ())
    }

    fn accumulate_expense(
        &mut self,
        category: &str,
        raw_amount: &str,
    ) -> Result<(String, MoneyCents), InputError> {
        let key = normalize_category(category)?;
        let amount = raw_amount.parse::<MoneyCents>()?;
        if !amount.is_positive() {
            return Err(InputError::NonPositiveAmount);
        }

        let current = self.expenses.get(&key).copied().unwrap_or(MoneyCents::ZERO);
        let updated = current.checked_add(amount).ok_or(InputError::Overflow)?;
        self.expenses
            .values()
            .try_fold(amount, |acc, value| acc.checked_add(*value))
            .ok_or(InputError::Overflow)?;

        self.expenses.insert(key.clone(), updated);
        Ok((key, amount))
    }

    /// Totals per category, overall total, what is left of the income and
    /// whether the income has been exceeded.
    pub fn view_summary(&self) -> SummaryReport {
        if self.expenses.is_empty() {
            return SummaryReport::Empty;
        }

        let total_expenses: MoneyCents = self.expenses.values().sum();
        SummaryReport::Totals(Summary {
            categories: self
                .expenses
                .iter()
                .map(|(name, total)| (name.clone(), *total))
                .collect(),
            income: self.income,
            total_expenses,
            remaining_income: self.income.saturating_sub(total_expenses),
            over_budget: total_expenses > self.income,
        })
    }

    pub fn to_snapshot(&self) -> Snapshot {
        Snapshot {
            expenses: self.expenses.clone(),
            income: self.income,
            username: self.username.clone(),
            credential_hash: self.credential_hash.clone(),
        }
    }

    /// Replaces the whole state with `snapshot`.
    ///
    /// Values are taken verbatim. Entries that break the ledger invariants
    /// are kept but reported through the event sink.
    pub fn from_snapshot(&mut self, snapshot: Snapshot) {
        if snapshot.income.is_negative() {
            self.events.warn(
                "snapshot holds negative income",
                &[("income", snapshot.income.to_string())],
            );
        }
        for (category, total) in &snapshot.expenses {
            if category.trim().is_empty() {
                self.events.warn("snapshot holds a blank category", &[]);
            }
            if !total.is_positive() {
                self.events.warn(
                    "snapshot holds a non-positive expense total",
                    &[("category", category.clone()), ("total", total.to_string())],
                );
            }
        }
        if snapshot.username.is_some() != snapshot.credential_hash.is_some() {
            self.events
                .warn("snapshot holds incomplete credentials", &[]);
        }

        self.expenses = snapshot.expenses;
        self.income = snapshot.income;
        self.username = snapshot.username;
        self.credential_hash = snapshot.credential_hash;
    }

    /// Writes the current state to `store`.
    pub fn persist(&self, store: &dyn PersistenceStore) -> ResultLedger<()> {
        store.save(&self.to_snapshot()).inspect_err(|err| {
            self.events
                .error("failed to save data", &[("error", err.to_string())]);
        })?;
        self.events.info(
            "data saved",
            &[("categories", self.expenses.len().to_string())],
        );
        Ok(())
    }

    /// Replaces the state with the snapshot in `store`, if there is one.
    pub fn load(&mut self, store: &dyn PersistenceStore) -> ResultLedger<LoadOutcome> {
        let snapshot = store.load().inspect_err(|err| {
            self.events
                .error("failed to load data", &[("error", err.to_string())]);
        })?;
        let Some(snapshot) = snapshot else {
            self.events
                .info("no previous data found, starting fresh", &[]);
            return Ok(LoadOutcome::Fresh);
        };

        self.from_snapshot(snapshot);
        self.events.info(
            "data loaded",
            &[("categories", self.expenses.len().to_string())],
        );
        Ok(LoadOutcome::Loaded)
    }
}

#[derive(Debug, Default)]
pub struct LedgerStateBuilder {
    verifier: Option<Box<dyn CredentialVerifier>>,
    events: Option<Box<dyn EventSink>>,
}

impl LedgerStateBuilder {
    /// Password hashing backend. Defaults to [`Argon2Verifier`] with the
    /// library default cost.
    pub fn verifier(mut self, verifier: impl CredentialVerifier + 'static) -> LedgerStateBuilder {
        self.verifier = Some(Box::new(verifier));
        self
    }

    /// Event sink. Defaults to [`NoopSink`].
    pub fn events(mut self, events: impl EventSink + 'static) -> LedgerStateBuilder {
        self.events = Some(Box::new(events));
        self
    }

    /// Construct an empty `LedgerState`.
    pub fn build(self) -> LedgerState {
        let events = self.events.unwrap_or_else(|| Box::new(NoopSink));
        events.info("ledger created", &[]);
        LedgerState {
            username: None,
            credential_hash: None,
            income: MoneyCents::ZERO,
            expenses: BTreeMap::new(),
            verifier: self
                .verifier
                .unwrap_or_else(|| Box::new(Argon2Verifier::default())),
            events,
        }
    }
}
