use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::Error;

/// Wire value standing in for "no income, percentage undefined".
pub const PERCENTAGE_UNDEFINED: i32 = -1;

/// Largest percentage reported. Keeps every defined value clear of the sentinel.
pub const MAX_PERCENTAGE: u32 = i32::MAX as u32;

pub fn percentage_or_sentinel(percentage: Option<u32>) -> i32 {
    match percentage {
        Some(p) => i32::try_from(p).unwrap_or(i32::MAX),
        None => PERCENTAGE_UNDEFINED,
    }
}

/// Rounded share of `part` in `total`, undefined unless `total` is positive.
fn percentage_of(part: f64, total: f64) -> Option<u32> {
    if total > 0.0 {
        let share = (part / total * 100.0).round();
        Some(share.min(f64::from(MAX_PERCENTAGE)) as u32)
    } else {
        None
    }
}

// Percentages travel as plain integers with -1 for "undefined".
mod sentinel {
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(p: &Option<u32>, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_i32(super::percentage_or_sentinel(*p))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Option<u32>, D::Error> {
        let raw = i32::deserialize(d)?;
        Ok(u32::try_from(raw).ok())
    }
}

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Category {
    #[serde(rename = "inc")]
    Income,
    #[serde(rename = "exp")]
    Expense,
}

impl Category {
    pub fn as_str(self) -> &'static str {
        match self {
            Category::Income => "inc",
            Category::Expense => "exp",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "inc" => Ok(Category::Income),
            "exp" => Ok(Category::Expense),
            other => Err(Error::UnknownCategory(other.to_string())),
        }
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct Income {
    pub id: u32,
    pub description: String,
    pub value: f64,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct Expense {
    pub id: u32,
    pub description: String,
    pub value: f64,
    /// Share of total income, as of the last `recompute_expense_percentages`.
    #[serde(with = "sentinel")]
    pub percentage: Option<u32>,
}

impl Expense {
    fn recompute_percentage(&mut self, total_income: f64) {
        self.percentage = percentage_of(self.value, total_income);
    }
}

/// One line of the budget, tagged by category.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(tag = "type")]
pub enum Entry {
    #[serde(rename = "inc")]
    Income(Income),
    #[serde(rename = "exp")]
    Expense(Expense),
}

impl Entry {
    pub fn category(&self) -> Category {
        match self {
            Entry::Income(_) => Category::Income,
            Entry::Expense(_) => Category::Expense,
        }
    }

    pub fn id(&self) -> u32 {
        match self {
            Entry::Income(i) => i.id,
            Entry::Expense(e) => e.id,
        }
    }

    pub fn description(&self) -> &str {
        match self {
            Entry::Income(i) => &i.description,
            Entry::Expense(e) => &e.description,
        }
    }

    pub fn value(&self) -> f64 {
        match self {
            Entry::Income(i) => i.value,
            Entry::Expense(e) => e.value,
        }
    }
}

/// Cached totals. Only meaningful right after `recompute_aggregates`.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Aggregates {
    pub budget: f64,
    pub total_income: f64,
    pub total_expense: f64,
    #[serde(with = "sentinel")]
    pub percentage: Option<u32>,
}

impl Default for Aggregates {
    fn default() -> Self {
        Aggregates {
            budget: 0.0,
            total_income: 0.0,
            total_expense: 0.0,
            percentage: None,
        }
    }
}

/// In-memory income and expense lists plus their cached aggregates.
///
/// Mutations do not touch the cache. After any `add_entry` or `delete_entry`
/// call `recompute_aggregates` and then `recompute_expense_percentages`
/// (or just `refresh`) before reading `aggregates` or `expense_percentages`.
#[derive(Debug, Default, Clone)]
pub struct Ledger {
    incomes: Vec<Income>,
    expenses: Vec<Expense>,
    aggregates: Aggregates,
}

impl Ledger {
    pub fn new() -> Ledger {
        Ledger::default()
    }

    pub fn incomes(&self) -> &[Income] {
        &self.incomes
    }

    pub fn expenses(&self) -> &[Expense] {
        &self.expenses
    }

    /// Appends a new entry with the next id for its category.
    ///
    /// The caller is expected to have validated description and value.
    pub fn add_entry(&mut self, category: Category, description: &str, value: f64) -> Entry {
        let id = self.next_id(category);
        let description = description.to_string();
        match category {
            Category::Income => {
                let income = Income { id, description, value };
                self.incomes.push(income.clone());
                Entry::Income(income)
            }
            Category::Expense => {
                let expense = Expense {
                    id,
                    description,
                    value,
                    percentage: None,
                };
                self.expenses.push(expense.clone());
                Entry::Expense(expense)
            }
        }
    }

    /// Removes the entry with `id` from `category`. Unknown ids are ignored.
    pub fn delete_entry(&mut self, category: Category, id: u32) {
        match category {
            Category::Income => self.incomes.retain(|i| i.id != id),
            Category::Expense => self.expenses.retain(|e| e.id != id),
        }
    }

    pub fn recompute_aggregates(&mut self) {
        let total_income: f64 = self.incomes.iter().map(|i| i.value).sum();
        let total_expense: f64 = self.expenses.iter().map(|e| e.value).sum();

        self.aggregates = Aggregates {
            budget: total_income - total_expense,
            total_income,
            total_expense,
            percentage: percentage_of(total_expense, total_income),
        };
    }

    /// Uses the cached income total, so run `recompute_aggregates` first.
    pub fn recompute_expense_percentages(&mut self) {
        let total_income = self.aggregates.total_income;
        for expense in &mut self.expenses {
            expense.recompute_percentage(total_income);
        }
    }

    /// Both recomputations, in the order they depend on each other.
    pub fn refresh(&mut self) {
        self.recompute_aggregates();
        self.recompute_expense_percentages();
    }

    pub fn aggregates(&self) -> Aggregates {
        self.aggregates
    }

    /// One entry per expense, in list order.
    pub fn expense_percentages(&self) -> Vec<Option<u32>> {
        self.expenses.iter().map(|e| e.percentage).collect()
    }

    fn next_id(&self, category: Category) -> u32 {
        let max = match category {
            Category::Income => self.incomes.iter().map(|i| i.id).max(),
            Category::Expense => self.expenses.iter().map(|e| e.id).max(),
        };
        max.map_or(0, |id| id + 1)
    }
}
