//! Claim info store
//!
//! Holds the form's base state (claim data, dynamic field values,
//! validation errors) together with the values and actions composed from
//! the active country's state slices.

use indexmap::IndexMap;
use serde::Serialize;
use serde_json::Value;
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};
use core_kernel::CountryCode;
use tracing::{debug, info, warn};

use crate::demo::demo_claim;
use crate::error::ClaimInfoError;
use crate::model::{ClaimInfoData, ClaimInfoState};
use crate::state::{CombinedState, StateAccess, StateMap};

/// Base state keys; extensions cannot write them through `set_state`
pub const RESERVED_STATE_KEYS: [&str; 3] = ["claimInfo", "dynamicFieldsData", "validationErrors"];

#[derive(Default)]
struct StoreState {
    claim_info: ClaimInfoState,
    dynamic_fields_data: StateMap,
    validation_errors: IndexMap<String, String>,
    extension_values: StateMap,
    extensions: CombinedState,
}

/// Serializable view of the whole store
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StoreSnapshot {
    pub claim_info: ClaimInfoState,
    pub dynamic_fields_data: StateMap,
    pub validation_errors: IndexMap<String, String>,
    pub extensions: StateMap,
    pub actions: Vec<String>,
}

#[derive(Default)]
pub struct ClaimInfoStore {
    state: RwLock<StoreState>,
}

impl ClaimInfoStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> RwLockReadGuard<'_, StoreState> {
        self.state.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, StoreState> {
        self.state.write().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn set_claim_info(&self, data: Option<ClaimInfoData>, is_loading: bool) {
        self.write().claim_info = ClaimInfoState { data, is_loading };
    }

    /// Loads the demo claim of `country`
    pub fn load_demo_claim(&self, country: CountryCode) {
        self.set_claim_info(Some(demo_claim(country)), false);
        info!(country = %country, "Demo claim loaded");
    }

    pub fn claim_info(&self) -> ClaimInfoState {
        self.read().claim_info.clone()
    }

    /// Applies `update` to the claim data; no-op while there is none
    fn update_claim_data(&self, update: impl FnOnce(&mut ClaimInfoData)) {
        let mut state = self.write();
        if let Some(data) = state.claim_info.data.as_mut() {
            update(data);
            state.claim_info.is_loading = false;
        }
    }

    pub fn update_driver_gender(&self, gender: impl Into<String>) {
        let gender = gender.into();
        self.update_claim_data(|data| data.claim.driver.gender = gender);
    }

    pub fn update_driver_birthday(&self, birthday: impl Into<String>) {
        let birthday = birthday.into();
        self.update_claim_data(|data| data.claim.driver.birthday = birthday);
    }

    pub fn update_deductible_exoneration(&self, exonerated: bool) {
        self.update_claim_data(|data| data.deductible.exonerated_by_analyst = exonerated);
    }

    pub fn set_dynamic_field_value(&self, field_id: impl Into<String>, value: Value) {
        self.write().dynamic_fields_data.insert(field_id.into(), value);
    }

    /// Value of a dynamic field, falling back to extension state
    pub fn dynamic_field_value(&self, field_id: &str) -> Option<Value> {
        let state = self.read();
        state
            .dynamic_fields_data
            .get(field_id)
            .or_else(|| state.extension_values.get(field_id))
            .cloned()
    }

    /// Replaces every dynamic field value
    pub fn initialize_dynamic_fields(&self, initial_values: StateMap) {
        self.write().dynamic_fields_data = initial_values;
    }

    pub fn dynamic_fields_data(&self) -> StateMap {
        self.read().dynamic_fields_data.clone()
    }

    pub fn set_validation_errors(&self, errors: IndexMap<String, String>) {
        self.write().validation_errors = errors;
    }

    pub fn clear_validation_errors(&self) {
        self.write().validation_errors.clear();
    }

    pub fn validation_errors(&self) -> IndexMap<String, String> {
        self.read().validation_errors.clone()
    }

    /// Installs the composed extension state
    ///
    /// Extension values replace the previous ones and seed the dynamic
    /// field values.
    pub fn install_extensions(&self, combined: CombinedState) {
        let mut state = self.write();
        state.extension_values = combined.values.clone();
        state.dynamic_fields_data = combined.values.clone();
        debug!(
            values = combined.values.len(),
            actions = combined.actions.len(),
            "Installed state extensions"
        );
        state.extensions = combined;
    }

    pub fn extension_values(&self) -> StateMap {
        self.read().extension_values.clone()
    }

    pub fn action_names(&self) -> Vec<String> {
        self.read().extensions.action_names()
    }

    /// Runs a named extension action against this store
    pub fn dispatch(&self, action: &str, argument: Value) -> Result<(), ClaimInfoError> {
        // The lock is released before the action writes back through set_state.
        let extensions = self.read().extensions.clone();
        extensions.dispatch(action, self, argument)
    }

    pub fn snapshot(&self) -> StoreSnapshot {
        let state = self.read();
        StoreSnapshot {
            claim_info: state.claim_info.clone(),
            dynamic_fields_data: state.dynamic_fields_data.clone(),
            validation_errors: state.validation_errors.clone(),
            extensions: state.extension_values.clone(),
            actions: state.extensions.action_names(),
        }
    }
}

impl StateAccess for ClaimInfoStore {
    fn get_state(&self) -> StateMap {
        let state = self.read();
        let mut map = state.extension_values.clone();
        let claim_info = serde_json::to_value(&state.claim_info).unwrap_or(Value::Null);
        map.insert("claimInfo".to_string(), claim_info);
        map
    }

    fn set_state(&self, partial: StateMap) {
        let mut state = self.write();
        for (key, value) in partial {
            if RESERVED_STATE_KEYS.contains(&key.as_str()) {
                warn!(key = %key, "Ignoring write to reserved state key");
                continue;
            }
            state.extension_values.insert(key, value);
        }
    }
}
