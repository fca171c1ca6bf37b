//! Render contracts of the Panama dynamic fields

use serde_json::Value;

use domain_claim_info::{DynamicFieldComponent, DynamicFieldProps, FieldView, SelectOption};

/// Inline-edited tax id; stored trimmed and uppercased
#[derive(Debug, Clone, Copy, Default)]
pub struct TaxIdField;

impl DynamicFieldComponent for TaxIdField {
    fn render(&self, props: &DynamicFieldProps) -> FieldView {
        let mut view = FieldView::from_props("text", props);
        view.placeholder = Some("8-123-456".to_string());
        view
    }

    fn on_change(&self, raw: Value) -> Value {
        match raw {
            Value::String(tax_id) => Value::String(tax_id.trim().to_uppercase()),
            other => other,
        }
    }
}

/// Select over the insurance zones
#[derive(Debug, Clone, Copy, Default)]
pub struct InsuranceZoneField;

impl InsuranceZoneField {
    pub fn options() -> Vec<SelectOption> {
        vec![
            SelectOption::new("URBAN", "Urbana"),
            SelectOption::new("RURAL", "Rural"),
            SelectOption::new("INTERIOR", "Interior"),
        ]
    }
}

impl DynamicFieldComponent for InsuranceZoneField {
    fn render(&self, props: &DynamicFieldProps) -> FieldView {
        let mut view = FieldView::from_props("select", props);
        view.options = Self::options();
        view
    }
}
