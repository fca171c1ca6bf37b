//! Property-Based Test Generators
//!
//! Provides proptest strategies for fixed field ids and partial field
//! overrides.

use domain_claim_info::{FieldOverride, FieldOverridesMap, FixedFieldId};
use proptest::prelude::*;

/// Strategy for generating fixed field ids
pub fn fixed_field_id_strategy() -> impl Strategy<Value = FixedFieldId> {
    prop::sample::select(FixedFieldId::ALL.to_vec())
}

/// Strategy for generating labels, including accented Spanish ones
pub fn label_strategy() -> impl Strategy<Value = String> {
    "[A-Za-zÁÉÍÓÚáéíóúñ ]{1,30}"
}

/// Strategy for generating partial overrides; any subset of properties is set
pub fn field_override_strategy() -> impl Strategy<Value = FieldOverride> {
    (
        prop::option::of(label_strategy()),
        prop::option::of(any::<bool>()),
        prop::option::of(any::<bool>()),
        prop::option::of(-50i32..1000),
        prop::option::of("[a-z ]{0,40}"),
    )
        .prop_map(|(label, required, visible, order, helper_text)| FieldOverride {
            label,
            required,
            visible,
            order,
            helper_text,
            validation: None,
        })
}

/// Strategy for generating override maps keyed by fixed field ids
pub fn overrides_map_strategy() -> impl Strategy<Value = FieldOverridesMap> {
    prop::collection::vec((fixed_field_id_strategy(), field_override_strategy()), 0..8).prop_map(
        |entries| {
            entries
                .into_iter()
                .map(|(id, field_override)| (id.as_str().to_string(), field_override))
                .collect()
        },
    )
}
