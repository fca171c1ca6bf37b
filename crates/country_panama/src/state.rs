//! Panama store extension

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde_json::{json, Value};
use tracing::{info, warn};

use core_kernel::{parse_amount, Money};
use domain_claim_info::{ExtensionError, StateAccess, StateExtension, StateMap};

use crate::fields::{INSURANCE_ZONE, TAX_ID};
use crate::COUNTRY;

pub const HAS_SPECIAL_TAX: &str = "hasPanamaSpecialTax";

/// Special tax applied on top of the calculated deductible
const SPECIAL_TAX_FACTOR: Decimal = dec!(1.07);

fn set_key(state: &dyn StateAccess, key: &str, value: Value) {
    let mut partial = StateMap::new();
    partial.insert(key.to_string(), value);
    state.set_state(partial);
}

fn set_string(state: &dyn StateAccess, key: &str, argument: Value) -> Result<(), ExtensionError> {
    if !argument.is_string() {
        return Err(ExtensionError::new(format!("{key} expects a string, got {argument}")));
    }
    set_key(state, key, argument);
    Ok(())
}

fn set_special_tax(state: &dyn StateAccess, argument: Value) -> Result<(), ExtensionError> {
    let has_tax = argument
        .as_bool()
        .ok_or_else(|| ExtensionError::new(format!("{HAS_SPECIAL_TAX} expects a boolean, got {argument}")))?;
    set_key(state, HAS_SPECIAL_TAX, Value::Bool(has_tax));

    if has_tax {
        let current = state.get_state();
        let calculated = current
            .get("claimInfo")
            .and_then(|claim_info| claim_info.pointer("/data/deductible/Calculated"))
            .and_then(parse_amount)
            .unwrap_or(Decimal::ZERO);
        let deductible = Money::new(calculated, COUNTRY.currency());
        match deductible.multiply(SPECIAL_TAX_FACTOR) {
            Ok(with_tax) => info!(
                original = %deductible.format_with_symbol(),
                with_tax = %with_tax.round_to_currency().format_with_symbol(),
                "Applying Panama special tax to deductible"
            ),
            Err(error) => warn!(
                original = %deductible.format_with_symbol(),
                error = %error,
                "Special tax could not be applied to deductible"
            ),
        }
    }
    Ok(())
}

pub fn state_extension() -> StateExtension {
    let initial = json!({
        TAX_ID: "8-123-456",
        INSURANCE_ZONE: "URBAN",
        HAS_SPECIAL_TAX: false,
    });
    let initial_state = match initial {
        Value::Object(map) => map,
        _ => StateMap::new(),
    };

    StateExtension::new(initial_state)
        .with_action("updatePanamaTaxId", |state, argument| set_string(state, TAX_ID, argument))
        .with_action("updatePanamaInsuranceZone", |state, argument| {
            set_string(state, INSURANCE_ZONE, argument)
        })
        .with_action("setPanamaSpecialTax", set_special_tax)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    #[derive(Default)]
    struct MemoryState(Mutex<StateMap>);

    impl StateAccess for MemoryState {
        fn get_state(&self) -> StateMap {
            self.0.lock().unwrap().clone()
        }

        fn set_state(&self, partial: StateMap) {
            self.0.lock().unwrap().extend(partial);
        }
    }

    fn with_deductible(calculated: Value) -> MemoryState {
        let state = MemoryState::default();
        let mut partial = StateMap::new();
        partial.insert(
            "claimInfo".into(),
            json!({ "data": { "deductible": { "Calculated": calculated } } }),
        );
        state.set_state(partial);
        state
    }

    #[test]
    fn test_special_tax_sets_flag() {
        let state = with_deductible(json!(1000));
        set_special_tax(&state, json!(true)).unwrap();
        assert_eq!(state.get_state().get(HAS_SPECIAL_TAX), Some(&json!(true)));
    }

    #[test]
    fn test_special_tax_on_overflowing_deductible() {
        let state = with_deductible(json!(rust_decimal::Decimal::MAX.to_string()));
        assert!(set_special_tax(&state, json!(true)).is_ok());
        assert_eq!(state.get_state().get(HAS_SPECIAL_TAX), Some(&json!(true)));
    }

    #[test]
    fn test_special_tax_rejects_non_boolean() {
        let state = MemoryState::default();
        assert!(set_special_tax(&state, json!("yes")).is_err());
    }
}
