//! Browser DOM adapter and event wiring.

use std::cell::RefCell;
use std::rc::Rc;

use serde::Deserialize;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{Document, Element, Event, HtmlInputElement, HtmlSelectElement, KeyboardEvent};

use crate::controller::Controller;
use crate::error::{Error, Result};
use crate::format::{budget_category, escape_html, format_number, format_percentage, month_label};
use crate::input::{ItemId, RawInput};
use crate::ledger::{Aggregates, Category, Entry};
use crate::view::View;

/// CSS selectors for every element the app reads or writes.
///
/// Defaults match the stock markup; JS callers may override any subset.
#[derive(Deserialize, Clone, Debug, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct Selectors {
    pub input_type: String,
    pub input_description: String,
    pub input_value: String,
    pub input_btn: String,
    pub income_container: String,
    pub expenses_container: String,
    pub budget_label: String,
    pub income_label: String,
    pub expenses_label: String,
    pub percentage_label: String,
    pub container: String,
    pub item: String,
    pub item_delete_btn: String,
    pub expenses_perc_label: String,
    pub date_label: String,
}

impl Default for Selectors {
    fn default() -> Self {
        Selectors {
            input_type: ".add__type".into(),
            input_description: ".add__description".into(),
            input_value: ".add__value".into(),
            input_btn: ".add__btn".into(),
            income_container: ".income__list".into(),
            expenses_container: ".expenses__list".into(),
            budget_label: ".budget__value".into(),
            income_label: ".budget__income--value".into(),
            expenses_label: ".budget__expenses--value".into(),
            percentage_label: ".budget__expenses--percentage".into(),
            container: ".container".into(),
            item: ".item".into(),
            item_delete_btn: ".item__delete--btn".into(),
            expenses_perc_label: ".item__percentage".into(),
            date_label: ".budget__title--month".into(),
        }
    }
}

pub struct DomView {
    document: Document,
    selectors: Selectors,
}

impl DomView {
    pub fn new(document: Document, selectors: Selectors) -> DomView {
        DomView { document, selectors }
    }

    fn query(&self, selector: &str) -> Result<Element> {
        self.document
            .query_selector(selector)?
            .ok_or_else(|| Error::MissingElement(selector.to_string()))
    }

    fn query_as<T: JsCast>(&self, selector: &str) -> Result<T> {
        self.query(selector)?
            .dyn_into::<T>()
            .map_err(|_| Error::MissingElement(selector.to_string()))
    }

    fn query_all(&self, selector: &str) -> Result<Vec<Element>> {
        let nodes = self.document.query_selector_all(selector)?;
        Ok((0..nodes.length())
            .filter_map(|i| nodes.item(i))
            .filter_map(|n| n.dyn_into::<Element>().ok())
            .collect())
    }

    fn set_text(&self, selector: &str, text: &str) -> Result<()> {
        self.query(selector)?.set_text_content(Some(text));
        Ok(())
    }

    fn item_html(entry: &Entry) -> String {
        let id = ItemId { category: entry.category(), id: entry.id() };
        let percentage = match entry {
            Entry::Income(_) => String::new(),
            Entry::Expense(e) => format!(
                r#"<div class="item__percentage">{}</div>"#,
                format_percentage(e.percentage)
            ),
        };
        format!(
            concat!(
                r#"<div class="item clearfix" id="{id}">"#,
                r#"<div class="item__description">{description}</div>"#,
                r#"<div class="right clearfix"><div class="item__value">{value}</div>{percentage}"#,
                r#"<div class="item__delete"><button class="item__delete--btn">"#,
                r#"<i class="ion-ios-close-outline"></i></button></div></div></div>"#,
            ),
            id = id,
            description = escape_html(entry.description()),
            value = format_number(entry.value(), entry.category()),
            percentage = percentage,
        )
    }
}

impl View for DomView {
    fn read_input(&self) -> Result<RawInput> {
        let category = self.query_as::<HtmlSelectElement>(&self.selectors.input_type)?;
        let description = self.query_as::<HtmlInputElement>(&self.selectors.input_description)?;
        let value = self.query_as::<HtmlInputElement>(&self.selectors.input_value)?;
        Ok(RawInput {
            category: category.value(),
            description: description.value(),
            value: value.value(),
        })
    }

    fn add_list_item(&mut self, entry: &Entry) -> Result<()> {
        let list = match entry.category() {
            Category::Income => &self.selectors.income_container,
            Category::Expense => &self.selectors.expenses_container,
        };
        self.query(list)?
            .insert_adjacent_html("beforeend", &Self::item_html(entry))?;
        Ok(())
    }

    fn delete_list_item(&mut self, item: ItemId) -> Result<()> {
        if let Some(el) = self.document.get_element_by_id(&item.to_string()) {
            el.remove();
        }
        Ok(())
    }

    fn clear_fields(&mut self) -> Result<()> {
        let selector = format!(
            "{}, {}",
            self.selectors.input_description, self.selectors.input_value
        );
        let fields: Vec<HtmlInputElement> = self
            .query_all(&selector)?
            .into_iter()
            .filter_map(|el| el.dyn_into::<HtmlInputElement>().ok())
            .collect();
        for field in &fields {
            field.set_value("");
        }
        if let Some(first) = fields.first() {
            first.focus()?;
        }
        Ok(())
    }

    fn display_budget(&mut self, aggregates: &Aggregates) -> Result<()> {
        let s = &self.selectors;
        self.set_text(
            &s.budget_label,
            &format_number(aggregates.budget, budget_category(aggregates.budget)),
        )?;
        self.set_text(
            &s.income_label,
            &format_number(aggregates.total_income, Category::Income),
        )?;
        self.set_text(
            &s.expenses_label,
            &format_number(aggregates.total_expense, Category::Expense),
        )?;
        self.set_text(&s.percentage_label, &format_percentage(aggregates.percentage))
    }

    fn display_percentages(&mut self, percentages: &[Option<u32>]) -> Result<()> {
        let labels = self.query_all(&self.selectors.expenses_perc_label)?;
        for (label, p) in labels.iter().zip(percentages) {
            label.set_text_content(Some(&format_percentage(*p)));
        }
        Ok(())
    }

    fn display_month(&mut self, label: &str) -> Result<()> {
        self.set_text(&self.selectors.date_label, label)
    }

    fn toggle_type(&mut self) -> Result<()> {
        let s = &self.selectors;
        let selector = format!("{}, {}, {}", s.input_type, s.input_description, s.input_value);
        for field in self.query_all(&selector)? {
            field.class_list().toggle("red-focus")?;
        }
        self.query(&s.input_btn)?.class_list().toggle("red")?;
        Ok(())
    }
}

type SharedController = Rc<RefCell<Controller<DomView>>>;

fn report(result: Result<()>) {
    if let Err(e) = result {
        web_sys::console::error_1(&JsValue::from_str(&e.to_string()));
    }
}

fn current_month_label() -> String {
    let now = js_sys::Date::new_0();
    month_label(now.get_month(), now.get_full_year())
}

/// Finds the id of the list item whose delete button was clicked, if any.
fn clicked_item_id(event: &Event, selectors: &Selectors) -> Option<String> {
    let target = event.target()?.dyn_into::<Element>().ok()?;
    target.closest(&selectors.item_delete_btn).ok()??;
    let item = target.closest(&selectors.item).ok()??;
    Some(item.id()).filter(|id| !id.is_empty())
}

/// Installs listeners on the document. Handlers live for the page lifetime.
pub fn start_app(selectors: Selectors) -> Result<()> {
    let document = web_sys::window()
        .and_then(|w| w.document())
        .ok_or_else(|| Error::Js("no document available".to_string()))?;

    let view = DomView::new(document.clone(), selectors.clone());
    let app: SharedController = Rc::new(RefCell::new(Controller::new(view)));
    app.borrow_mut().init(&current_month_label())?;

    let on_add = {
        let app = Rc::clone(&app);
        Closure::<dyn FnMut()>::new(move || {
            report(app.borrow_mut().add_item().map(|_| ()));
        })
    };
    let button = document
        .query_selector(&selectors.input_btn)?
        .ok_or_else(|| Error::MissingElement(selectors.input_btn.clone()))?;
    button.add_event_listener_with_callback("click", on_add.as_ref().unchecked_ref())?;
    on_add.forget();

    let on_key = {
        let app = Rc::clone(&app);
        Closure::<dyn FnMut(KeyboardEvent)>::new(move |event: KeyboardEvent| {
            if event.key() == "Enter" {
                report(app.borrow_mut().add_item().map(|_| ()));
            }
        })
    };
    document.add_event_listener_with_callback("keypress", on_key.as_ref().unchecked_ref())?;
    on_key.forget();

    let on_delete = {
        let app = Rc::clone(&app);
        let selectors = selectors.clone();
        Closure::<dyn FnMut(Event)>::new(move |event: Event| {
            if let Some(id) = clicked_item_id(&event, &selectors) {
                report(app.borrow_mut().delete_item(&id).map(|_| ()));
            }
        })
    };
    let container = document
        .query_selector(&selectors.container)?
        .ok_or_else(|| Error::MissingElement(selectors.container.clone()))?;
    container.add_event_listener_with_callback("click", on_delete.as_ref().unchecked_ref())?;
    on_delete.forget();

    let on_change = {
        let app = Rc::clone(&app);
        Closure::<dyn FnMut()>::new(move || {
            report(app.borrow_mut().changed_type());
        })
    };
    let type_select = document
        .query_selector(&selectors.input_type)?
        .ok_or_else(|| Error::MissingElement(selectors.input_type.clone()))?;
    type_select.add_event_listener_with_callback("change", on_change.as_ref().unchecked_ref())?;
    on_change.forget();

    web_sys::console::log_1(&JsValue::from_str("Application has started."));
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger::{Expense, Income};

    #[test]
    fn test_selectors_default_to_stock_markup() {
        let s = Selectors::default();
        assert_eq!(s.input_type, ".add__type");
        assert_eq!(s.expenses_perc_label, ".item__percentage");
    }

    #[test]
    fn test_selectors_partial_override() {
        let s: Selectors = serde_json::from_str(r##"{"budgetLabel": "#budget"}"##).unwrap();
        assert_eq!(s.budget_label, "#budget");
        assert_eq!(s.income_label, Selectors::default().income_label);
    }

    #[test]
    fn test_income_item_html() {
        let html = DomView::item_html(&Entry::Income(Income {
            id: 2,
            description: "Pay <day>".to_string(),
            value: 1500.0,
        }));
        assert!(html.starts_with(r#"<div class="item clearfix" id="inc-2">"#));
        assert!(html.contains("Pay &lt;day&gt;"));
        assert!(html.contains("+ 1,500.00"));
        assert!(!html.contains("item__percentage"));
    }

    #[test]
    fn test_expense_item_html_has_percentage_slot() {
        let html = DomView::item_html(&Entry::Expense(Expense {
            id: 0,
            description: "Rent".to_string(),
            value: 5.0,
            percentage: None,
        }));
        assert!(html.contains(r#"id="exp-0""#));
        assert!(html.contains("- 5.00"));
        assert!(html.contains(r#"<div class="item__percentage">---</div>"#));
    }
}
