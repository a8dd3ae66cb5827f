use crate::error::Result;
use crate::input::ItemId;
use crate::ledger::{Aggregates, Entry, Ledger};
use crate::view::View;

/// Wires user actions from a `View` into the `Ledger` and back.
pub struct Controller<V: View> {
    ledger: Ledger,
    view: V,
}

impl<V: View> Controller<V> {
    pub fn new(view: V) -> Controller<V> {
        Controller {
            ledger: Ledger::new(),
            view,
        }
    }

    pub fn ledger(&self) -> &Ledger {
        &self.ledger
    }

    pub fn view(&self) -> &V {
        &self.view
    }

    pub fn init(&mut self, month_label: &str) -> Result<()> {
        self.view.display_month(month_label)?;
        self.view.display_budget(&Aggregates::default())
    }

    /// Reads the form and records it. Invalid input is dropped without a trace.
    pub fn add_item(&mut self) -> Result<Option<Entry>> {
        let new_entry = match self.view.read_input()?.validate() {
            Ok(e) => e,
            Err(_) => return Ok(None),
        };

        let entry = self
            .ledger
            .add_entry(new_entry.category, &new_entry.description, new_entry.value);
        self.view.add_list_item(&entry)?;
        self.view.clear_fields()?;

        self.update_budget()?;
        self.update_percentages()?;
        Ok(Some(entry))
    }

    /// Deletes by rendered element id such as `"exp-3"`.
    ///
    /// Returns `false` when the id is empty or does not name an item.
    pub fn delete_item(&mut self, dom_id: &str) -> Result<bool> {
        let item = match dom_id.parse::<ItemId>() {
            Ok(item) => item,
            Err(_) => return Ok(false),
        };

        self.ledger.delete_entry(item.category, item.id);
        self.view.delete_list_item(item)?;

        self.update_budget()?;
        self.update_percentages()?;
        Ok(true)
    }

    pub fn changed_type(&mut self) -> Result<()> {
        self.view.toggle_type()
    }

    fn update_budget(&mut self) -> Result<()> {
        self.ledger.recompute_aggregates();
        let aggregates = self.ledger.aggregates();
        self.view.display_budget(&aggregates)
    }

    fn update_percentages(&mut self) -> Result<()> {
        self.ledger.recompute_expense_percentages();
        let percentages = self.ledger.expense_percentages();
        self.view.display_percentages(&percentages)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::format::{budget_category, format_number, format_percentage};
    use crate::input::RawInput;
    use crate::ledger::Category;

    /// Renders into plain strings the way the DOM would show them.
    #[derive(Default)]
    struct RecordingView {
        input: RawInput,
        incomes: Vec<(String, String)>,
        expenses: Vec<(String, String, String)>,
        budget: String,
        income_label: String,
        expense_label: String,
        percentage_label: String,
        month: String,
        cleared: usize,
        red: bool,
    }

    impl View for RecordingView {
        fn read_input(&self) -> Result<RawInput> {
            Ok(self.input.clone())
        }

        fn add_list_item(&mut self, entry: &Entry) -> Result<()> {
            let id = ItemId { category: entry.category(), id: entry.id() };
            let value = format_number(entry.value(), entry.category());
            match entry {
                Entry::Income(_) => self.incomes.push((id.to_string(), value)),
                Entry::Expense(_) => {
                    self.expenses.push((id.to_string(), value, "21%".to_string()))
                }
            }
            Ok(())
        }

        fn delete_list_item(&mut self, item: ItemId) -> Result<()> {
            let key = item.to_string();
            self.incomes.retain(|(id, _)| *id != key);
            self.expenses.retain(|(id, _, _)| *id != key);
            Ok(())
        }

        fn clear_fields(&mut self) -> Result<()> {
            self.input.description.clear();
            self.input.value.clear();
            self.cleared += 1;
            Ok(())
        }

        fn display_budget(&mut self, a: &Aggregates) -> Result<()> {
            self.budget = format_number(a.budget, budget_category(a.budget));
            self.income_label = format_number(a.total_income, Category::Income);
            self.expense_label = format_number(a.total_expense, Category::Expense);
            self.percentage_label = format_percentage(a.percentage);
            Ok(())
        }

        fn display_percentages(&mut self, percentages: &[Option<u32>]) -> Result<()> {
            for (row, p) in self.expenses.iter_mut().zip(percentages) {
                row.2 = format_percentage(*p);
            }
            Ok(())
        }

        fn display_month(&mut self, label: &str) -> Result<()> {
            self.month = label.to_string();
            Ok(())
        }

        fn toggle_type(&mut self) -> Result<()> {
            self.red = !self.red;
            Ok(())
        }
    }

    fn submit(ctrl: &mut Controller<RecordingView>, category: &str, desc: &str, value: &str) -> Option<Entry> {
        ctrl.view.input = RawInput::new(category, desc, value);
        ctrl.add_item().unwrap()
    }

    #[test]
    fn test_init_shows_month_and_zeroed_summary() {
        let mut ctrl = Controller::new(RecordingView::default());
        ctrl.init("October 2026").unwrap();

        let view = ctrl.view();
        assert_eq!(view.month, "October 2026");
        assert_eq!(view.budget, "- 0.00");
        assert_eq!(view.income_label, "+ 0.00");
        assert_eq!(view.expense_label, "- 0.00");
        assert_eq!(view.percentage_label, "---");
    }

    #[test]
    fn test_add_renders_and_updates_summary() {
        let mut ctrl = Controller::new(RecordingView::default());
        submit(&mut ctrl, "inc", "Salary", "1000").unwrap();
        submit(&mut ctrl, "exp", "Rent", "400").unwrap();

        let view = ctrl.view();
        assert_eq!(view.incomes, vec![("inc-0".to_string(), "+ 1,000.00".to_string())]);
        assert_eq!(
            view.expenses,
            vec![("exp-0".to_string(), "- 400.00".to_string(), "40%".to_string())]
        );
        assert_eq!(view.budget, "+ 600.00");
        assert_eq!(view.percentage_label, "40%");
        assert_eq!(view.cleared, 2);
        assert!(view.input.description.is_empty());
    }

    #[test]
    fn test_invalid_input_is_silently_ignored() {
        let mut ctrl = Controller::new(RecordingView::default());
        assert_eq!(submit(&mut ctrl, "inc", "", "10"), None);
        assert_eq!(submit(&mut ctrl, "inc", "Salary", "abc"), None);
        assert_eq!(submit(&mut ctrl, "exp", "Rent", "0"), None);

        assert!(ctrl.ledger().incomes().is_empty());
        assert!(ctrl.ledger().expenses().is_empty());
        assert_eq!(ctrl.view().cleared, 0);
        assert_eq!(ctrl.view().input.value, "0");
    }

    #[test]
    fn test_delete_round_trip_restores_totals() {
        let mut ctrl = Controller::new(RecordingView::default());
        submit(&mut ctrl, "inc", "Salary", "100");
        submit(&mut ctrl, "exp", "Rent", "40");
        let before = ctrl.ledger().aggregates();

        let entry = submit(&mut ctrl, "exp", "Food", "25").unwrap();
        let dom_id = ItemId { category: entry.category(), id: entry.id() }.to_string();
        assert_eq!(dom_id, "exp-1");
        assert_eq!(ctrl.view().expenses.len(), 2);

        assert!(ctrl.delete_item(&dom_id).unwrap());
        assert_eq!(ctrl.ledger().aggregates(), before);
        assert_eq!(ctrl.view().expenses.len(), 1);
        assert_eq!(ctrl.view().expenses[0].2, "40%");
    }

    #[test]
    fn test_delete_income_refreshes_percentages() {
        let mut ctrl = Controller::new(RecordingView::default());
        submit(&mut ctrl, "inc", "Salary", "100");
        submit(&mut ctrl, "exp", "Rent", "40");
        submit(&mut ctrl, "exp", "Food", "10");

        ctrl.delete_item("inc-0").unwrap();

        let labels: Vec<&str> = ctrl.view().expenses.iter().map(|r| r.2.as_str()).collect();
        assert_eq!(labels, vec!["---", "---"]);
        assert_eq!(ctrl.view().percentage_label, "---");
        assert_eq!(ctrl.view().budget, "- 50.00");
    }

    #[test]
    fn test_delete_unknown_or_malformed_id() {
        let mut ctrl = Controller::new(RecordingView::default());
        submit(&mut ctrl, "inc", "Salary", "100");
        let before = ctrl.ledger().aggregates();

        assert!(!ctrl.delete_item("").unwrap());
        assert!(!ctrl.delete_item("budget-1").unwrap());
        assert!(ctrl.delete_item("inc-9").unwrap());

        assert_eq!(ctrl.ledger().incomes().len(), 1);
        assert_eq!(ctrl.ledger().aggregates(), before);
    }

    #[test]
    fn test_changed_type_toggles() {
        let mut ctrl = Controller::new(RecordingView::default());
        ctrl.changed_type().unwrap();
        assert!(ctrl.view().red);
        ctrl.changed_type().unwrap();
        assert!(!ctrl.view().red);
    }
}
