//! Dynamic field registry
//!
//! Dynamic fields exist only while the country bundle contributing them is
//! loaded. Each definition carries its own render contract.

use indexmap::IndexMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;
use std::fmt;
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};
use tracing::warn;

use crate::field_config::{FieldConfig, FieldSection};

/// Where a dynamic field is placed within its section
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldPosition {
    Top,
    Bottom,
    /// Position among the section's fields
    Index(i32),
}

impl Serialize for FieldPosition {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            FieldPosition::Top => serializer.serialize_str("top"),
            FieldPosition::Bottom => serializer.serialize_str("bottom"),
            FieldPosition::Index(index) => serializer.serialize_i32(*index),
        }
    }
}

impl<'de> Deserialize<'de> for FieldPosition {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Index(i32),
            Name(String),
        }

        match Raw::deserialize(deserializer)? {
            Raw::Index(index) => Ok(FieldPosition::Index(index)),
            Raw::Name(name) if name == "top" => Ok(FieldPosition::Top),
            Raw::Name(name) if name == "bottom" => Ok(FieldPosition::Bottom),
            Raw::Name(other) => Err(serde::de::Error::custom(format!(
                "invalid field position: {other}"
            ))),
        }
    }
}

/// What a component receives when asked to render
#[derive(Debug, Clone)]
pub struct DynamicFieldProps {
    pub field_id: String,
    pub config: FieldConfig,
    pub value: Value,
    pub is_loading: bool,
    pub disabled: bool,
}

/// One choice of a select field
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectOption {
    pub value: String,
    pub label: String,
}

impl SelectOption {
    pub fn new(value: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            label: label.into(),
        }
    }
}

/// Presentation description produced by a component
///
/// The form UI turns this into widgets; nothing here is visual.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldView {
    pub field_id: String,
    /// Widget kind, e.g. `text` or `select`
    pub kind: String,
    pub label: String,
    pub value: Value,
    pub required: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub helper_text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub placeholder: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<SelectOption>,
    pub disabled: bool,
    pub is_loading: bool,
}

impl FieldView {
    /// A view of `kind` filled from the props
    pub fn from_props(kind: impl Into<String>, props: &DynamicFieldProps) -> Self {
        Self {
            field_id: props.field_id.clone(),
            kind: kind.into(),
            label: props.config.label.clone(),
            value: props.value.clone(),
            required: props.config.required,
            helper_text: props.config.helper_text.clone(),
            placeholder: None,
            options: Vec::new(),
            disabled: props.disabled || props.is_loading,
            is_loading: props.is_loading,
        }
    }
}

/// Render contract of a dynamic field
pub trait DynamicFieldComponent: Send + Sync {
    fn render(&self, props: &DynamicFieldProps) -> FieldView;

    /// Normalizes a raw value before it is written to the store
    fn on_change(&self, raw: Value) -> Value {
        raw
    }
}

/// Plain text input
#[derive(Debug, Clone, Copy, Default)]
pub struct TextInput;

impl DynamicFieldComponent for TextInput {
    fn render(&self, props: &DynamicFieldProps) -> FieldView {
        FieldView::from_props("text", props)
    }
}

/// A field contributed by a country bundle
#[derive(Clone)]
pub struct DynamicFieldDefinition {
    pub id: String,
    pub section: FieldSection,
    pub position: Option<FieldPosition>,
    pub config: FieldConfig,
    pub component: Arc<dyn DynamicFieldComponent>,
}

impl DynamicFieldDefinition {
    pub fn new(
        id: impl Into<String>,
        section: impl Into<FieldSection>,
        config: FieldConfig,
        component: Arc<dyn DynamicFieldComponent>,
    ) -> Self {
        Self {
            id: id.into(),
            section: section.into(),
            position: None,
            config,
            component,
        }
    }

    pub fn at(mut self, position: FieldPosition) -> Self {
        self.position = Some(position);
        self
    }

    /// Renders the field with its current store value
    pub fn view(&self, value: Value, is_loading: bool, disabled: bool) -> FieldView {
        self.component.render(&DynamicFieldProps {
            field_id: self.id.clone(),
            config: self.config.clone(),
            value,
            is_loading,
            disabled,
        })
    }
}

impl fmt::Debug for DynamicFieldDefinition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DynamicFieldDefinition")
            .field("id", &self.id)
            .field("section", &self.section)
            .field("position", &self.position)
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

/// Registered dynamic fields, iterated in registration order
#[derive(Default)]
pub struct DynamicFieldRegistry {
    fields: RwLock<IndexMap<String, DynamicFieldDefinition>>,
}

impl DynamicFieldRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> RwLockReadGuard<'_, IndexMap<String, DynamicFieldDefinition>> {
        self.fields.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, IndexMap<String, DynamicFieldDefinition>> {
        self.fields.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// Registers a field, overwriting any field with the same id
    ///
    /// Returns true when an existing definition was replaced.
    pub fn register(&self, field: DynamicFieldDefinition) -> bool {
        let mut fields = self.write();
        let replaced = fields.contains_key(&field.id);
        if replaced {
            warn!(field_id = %field.id, "Dynamic field already registered, overwriting");
        }
        fields.insert(field.id.clone(), field);
        replaced
    }

    pub fn register_many(&self, fields: impl IntoIterator<Item = DynamicFieldDefinition>) {
        for field in fields {
            self.register(field);
        }
    }

    pub fn get(&self, field_id: &str) -> Option<DynamicFieldDefinition> {
        self.read().get(field_id).cloned()
    }

    pub fn get_all(&self) -> Vec<DynamicFieldDefinition> {
        self.read().values().cloned().collect()
    }

    pub fn get_by_section(&self, section: &FieldSection) -> Vec<DynamicFieldDefinition> {
        self.read()
            .values()
            .filter(|field| &field.section == section)
            .cloned()
            .collect()
    }

    pub fn has(&self, field_id: &str) -> bool {
        self.read().contains_key(field_id)
    }

    /// Removes a field; returns whether it was registered
    pub fn unregister(&self, field_id: &str) -> bool {
        self.write().shift_remove(field_id).is_some()
    }

    pub fn clear(&self) {
        self.write().clear();
    }

    pub fn len(&self) -> usize {
        self.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.read().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn text_field(id: &str, section: &str) -> DynamicFieldDefinition {
        DynamicFieldDefinition::new(id, section, FieldConfig::new(id, false), Arc::new(TextInput))
    }

    #[test]
    fn test_register_reports_overwrite() {
        let registry = DynamicFieldRegistry::new();
        assert!(!registry.register(text_field("a", "policy")));
        assert!(registry.register(text_field("a", "claim")));
        assert_eq!(registry.len(), 1);
        assert_eq!(registry.get("a").unwrap().section, FieldSection::Claim);
    }

    #[test]
    fn test_unregister_keeps_registration_order() {
        let registry = DynamicFieldRegistry::new();
        registry.register_many(vec![
            text_field("a", "policy"),
            text_field("b", "policy"),
            text_field("c", "policy"),
        ]);
        assert!(registry.unregister("b"));
        assert!(!registry.unregister("b"));
        let ids: Vec<String> = registry.get_all().into_iter().map(|f| f.id).collect();
        assert_eq!(ids, vec!["a", "c"]);
    }

    #[test]
    fn test_unrecognized_section_is_kept() {
        let registry = DynamicFieldRegistry::new();
        registry.register(text_field("extra", "annex"));
        let fields = registry.get_by_section(&FieldSection::from("annex"));
        assert_eq!(fields.len(), 1);
    }

    #[test]
    fn test_position_serde() {
        assert_eq!(serde_json::to_value(FieldPosition::Top).unwrap(), json!("top"));
        assert_eq!(serde_json::to_value(FieldPosition::Index(7)).unwrap(), json!(7));
        let parsed: FieldPosition = serde_json::from_value(json!("bottom")).unwrap();
        assert_eq!(parsed, FieldPosition::Bottom);
        assert!(serde_json::from_value::<FieldPosition>(json!("middle")).is_err());
    }

    #[test]
    fn test_text_input_view_is_disabled_while_loading() {
        let field = text_field("a", "policy");
        let view = field.view(json!("x"), true, false);
        assert_eq!(view.kind, "text");
        assert!(view.disabled);
        assert_eq!(view.value, json!("x"));
    }
}
