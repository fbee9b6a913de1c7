use crate::MoneyCents;

/// Read-only view of the ledger totals.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SummaryReport {
    /// No expense has been recorded yet.
    Empty,
    Totals(Summary),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Summary {
    /// `(category, total)` pairs, ordered by category name.
    pub categories: Vec<(String, MoneyCents)>,
    pub income: MoneyCents,
    pub total_expenses: MoneyCents,
    /// `income - total_expenses`; negative when over budget.
    pub remaining_income: MoneyCents,
    /// `total_expenses > income`.
    pub over_budget: bool,
}

impl SummaryReport {
    #[must_use]
    pub fn totals(&self) -> Option<&Summary> {
        match self {
            SummaryReport::Empty => None,
            SummaryReport::Totals(summary) => Some(summary),
        }
    }
}
