use crate::error::Result;
use crate::input::{ItemId, RawInput};
use crate::ledger::{Aggregates, Entry};

/// Presentation side of the app. Holds no budget state of its own.
///
/// Percentage labels are matched to expenses by position, so implementations
/// must render expense items in the order they were added.
pub trait View {
    fn read_input(&self) -> Result<RawInput>;

    fn add_list_item(&mut self, entry: &Entry) -> Result<()>;

    fn delete_list_item(&mut self, item: ItemId) -> Result<()>;

    /// Empties description and value, then focuses the description field.
    fn clear_fields(&mut self) -> Result<()>;

    fn display_budget(&mut self, aggregates: &Aggregates) -> Result<()>;

    fn display_percentages(&mut self, percentages: &[Option<u32>]) -> Result<()>;

    fn display_month(&mut self, label: &str) -> Result<()>;

    /// Flips the input row between income and expense styling.
    fn toggle_type(&mut self) -> Result<()>;
}
