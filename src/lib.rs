use wasm_bindgen::prelude::*;

pub mod controller;
pub mod dom;
pub mod error;
pub mod format;
pub mod input;
pub mod ledger;
pub mod view;

pub use error::{Error, Result};
pub use ledger::{Aggregates, Category, Entry, Expense, Income, Ledger, PERCENTAGE_UNDEFINED};

use crate::dom::Selectors;
use crate::input::NewEntry;
use crate::ledger::percentage_or_sentinel;

/// Budget ledger exposed to JavaScript.
///
/// Follows the same two-phase contract as `Ledger`: call `calculateBudget`
/// and then `calculatePercentages` after mutating, before reading.
#[wasm_bindgen]
pub struct BudgetEngine {
    ledger: Ledger,
}

#[wasm_bindgen]
impl BudgetEngine {
    #[wasm_bindgen(constructor)]
    pub fn new() -> BudgetEngine {
        // Hook up panic handler for better debugging in browser console
        #[cfg(feature = "console_error_panic_hook")]
        console_error_panic_hook::set_once();

        BudgetEngine { ledger: Ledger::new() }
    }

    /// Validates and records an item. Returns the created entry as a JS object.
    #[wasm_bindgen(js_name = addItem)]
    pub fn add_item(&mut self, category: &str, description: &str, value: f64) -> std::result::Result<JsValue, JsValue> {
        let new_entry = NewEntry::new(category.parse::<Category>()?, description, value)?;
        let entry = self
            .ledger
            .add_entry(new_entry.category, &new_entry.description, new_entry.value);
        serde_wasm_bindgen::to_value(&entry).map_err(|e| JsValue::from_str(&e.to_string()))
    }

    #[wasm_bindgen(js_name = deleteItem)]
    pub fn delete_item(&mut self, category: &str, id: u32) -> std::result::Result<(), JsValue> {
        let category = category.parse::<Category>()?;
        self.ledger.delete_entry(category, id);
        Ok(())
    }

    #[wasm_bindgen(js_name = calculateBudget)]
    pub fn calculate_budget(&mut self) {
        self.ledger.recompute_aggregates();
    }

    #[wasm_bindgen(js_name = calculatePercentages)]
    pub fn calculate_percentages(&mut self) {
        self.ledger.recompute_expense_percentages();
    }

    /// `{budget, totalIncome, totalExpense, percentage}`, percentage -1 when undefined.
    #[wasm_bindgen(js_name = getBudget)]
    pub fn get_budget(&self) -> std::result::Result<JsValue, JsValue> {
        serde_wasm_bindgen::to_value(&self.ledger.aggregates())
            .map_err(|e| JsValue::from_str(&e.to_string()))
    }

    #[wasm_bindgen(js_name = getPercentages)]
    pub fn get_percentages(&self) -> Vec<i32> {
        sentinel_percentages(&self.ledger)
    }
}

impl Default for BudgetEngine {
    fn default() -> Self {
        BudgetEngine::new()
    }
}

fn sentinel_percentages(ledger: &Ledger) -> Vec<i32> {
    ledger
        .expense_percentages()
        .into_iter()
        .map(percentage_or_sentinel)
        .collect()
}

/// `category` is `"inc"` or `"exp"`.
#[wasm_bindgen(js_name = formatNumber)]
pub fn format_number(value: f64, category: &str) -> std::result::Result<String, JsValue> {
    let category = category.parse::<Category>()?;
    Ok(format::format_number(value, category))
}

/// Boots the DOM app. `selectors` may be `undefined` or a partial override object.
#[wasm_bindgen]
pub fn start(selectors: JsValue) -> std::result::Result<(), JsValue> {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();

    let selectors = if selectors.is_undefined() || selectors.is_null() {
        Selectors::default()
    } else {
        serde_wasm_bindgen::from_value(selectors)
            .map_err(|e| JsValue::from_str(&format!("Error: Invalid selectors: {}", e)))?
    };
    dom::start_app(selectors)?;
    Ok(())
}
