//! Costa Rica store extension

use serde_json::{json, Value};

use domain_claim_info::{ExtensionError, StateAccess, StateExtension, StateMap};

/// Reported to SUGEF, the financial superintendency
pub const HAS_SUGEF: &str = "hasSugef";
pub const HAS_SPECIAL_DISCOUNT: &str = "hasSpecialDiscount";

fn set_flag(state: &dyn StateAccess, key: &str, argument: Value) -> Result<(), ExtensionError> {
    let flag = argument
        .as_bool()
        .ok_or_else(|| ExtensionError::new(format!("{key} expects a boolean, got {argument}")))?;
    let mut partial = StateMap::new();
    partial.insert(key.to_string(), Value::Bool(flag));
    state.set_state(partial);
    Ok(())
}

pub fn state_extension() -> StateExtension {
    let initial = json!({
        HAS_SUGEF: false,
        HAS_SPECIAL_DISCOUNT: false,
    });
    let initial_state = match initial {
        Value::Object(map) => map,
        _ => StateMap::new(),
    };

    StateExtension::new(initial_state)
        .with_action("setSugefStatus", |state, argument| set_flag(state, HAS_SUGEF, argument))
        .with_action("setSpecialDiscount", |state, argument| {
            set_flag(state, HAS_SPECIAL_DISCOUNT, argument)
        })
}
