//! State extension registry
//!
//! Countries extend the shared form state with slices. A slice receives the
//! shared state capability and returns a fragment of values and named
//! actions; the registry composes every fragment into one combined state.

use indexmap::IndexMap;
use serde::Serialize;
use serde_json::{Map, Value};
use std::collections::HashSet;
use std::fmt;
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};
use tracing::warn;

use core_kernel::CountryCode;

use crate::error::{ClaimInfoError, ExtensionError};

/// Flat state object keyed by state key
pub type StateMap = Map<String, Value>;

/// Shared state capability handed to slices and actions
pub trait StateAccess: Send + Sync {
    fn get_state(&self) -> StateMap;

    /// Shallow-merges `partial` into the state
    fn set_state(&self, partial: StateMap);
}

/// A named state action; receives the shared state and one argument
pub type StateAction =
    Arc<dyn Fn(&dyn StateAccess, Value) -> Result<(), ExtensionError> + Send + Sync>;

/// Values and actions produced by one slice
#[derive(Clone, Default)]
pub struct StateFragment {
    pub values: StateMap,
    pub actions: IndexMap<String, StateAction>,
}

impl StateFragment {
    fn keys(&self) -> impl Iterator<Item = &String> {
        self.values.keys().chain(self.actions.keys())
    }
}

impl fmt::Debug for StateFragment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StateFragment")
            .field("values", &self.values)
            .field("actions", &self.actions.keys().collect::<Vec<_>>())
            .finish()
    }
}

/// A composable piece of state contributed by a country
pub trait StateSlice: Send + Sync {
    /// Every key the fragment may contain, values and actions alike
    fn declared_keys(&self) -> Vec<String>;

    fn build(&self, state: &dyn StateAccess) -> Result<StateFragment, ExtensionError>;
}

/// How key collisions between slices are resolved
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CollisionPolicy {
    /// The later slice's entry replaces the earlier one
    #[default]
    LastWins,
    /// The later slice is omitted entirely
    Reject,
}

/// A key produced by more than one slice
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct KeyCollision {
    pub key: String,
    pub previous: CountryCode,
    pub winner: CountryCode,
}

/// A slice left out of the combined state
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SliceFailure {
    pub country: CountryCode,
    pub message: String,
}

/// Union of every registered slice's fragment
#[derive(Clone, Default)]
pub struct CombinedState {
    pub values: StateMap,
    pub actions: IndexMap<String, StateAction>,
    pub collisions: Vec<KeyCollision>,
    pub failures: Vec<SliceFailure>,
}

impl CombinedState {
    pub fn has_action(&self, name: &str) -> bool {
        self.actions.contains_key(name)
    }

    pub fn action_names(&self) -> Vec<String> {
        self.actions.keys().cloned().collect()
    }

    /// Invokes the named action against `state`
    pub fn dispatch(
        &self,
        name: &str,
        state: &dyn StateAccess,
        argument: Value,
    ) -> Result<(), ClaimInfoError> {
        let action = self
            .actions
            .get(name)
            .ok_or_else(|| ClaimInfoError::UnknownAction(name.to_string()))?;
        action(state, argument).map_err(|source| ClaimInfoError::ActionFailed {
            action: name.to_string(),
            source,
        })
    }
}

impl fmt::Debug for CombinedState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CombinedState")
            .field("values", &self.values)
            .field("actions", &self.actions.keys().collect::<Vec<_>>())
            .field("collisions", &self.collisions)
            .field("failures", &self.failures)
            .finish()
    }
}

/// Slices keyed by country, composed in registration order
#[derive(Default)]
pub struct StateExtensionRegistry {
    slices: RwLock<IndexMap<CountryCode, Arc<dyn StateSlice>>>,
    policy: CollisionPolicy,
}

impl StateExtensionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_policy(policy: CollisionPolicy) -> Self {
        Self {
            slices: RwLock::default(),
            policy,
        }
    }

    pub fn policy(&self) -> CollisionPolicy {
        self.policy
    }

    fn read(&self) -> RwLockReadGuard<'_, IndexMap<CountryCode, Arc<dyn StateSlice>>> {
        self.slices.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, IndexMap<CountryCode, Arc<dyn StateSlice>>> {
        self.slices.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// Registers a country's slice; returns true if one was replaced
    pub fn register(&self, country: CountryCode, slice: Arc<dyn StateSlice>) -> bool {
        let replaced = self.write().insert(country, slice).is_some();
        if replaced {
            warn!(country = %country, "State extension already registered, overwriting");
        }
        replaced
    }

    pub fn get(&self, country: CountryCode) -> Option<Arc<dyn StateSlice>> {
        self.read().get(&country).cloned()
    }

    pub fn get_all(&self) -> Vec<(CountryCode, Arc<dyn StateSlice>)> {
        self.read()
            .iter()
            .map(|(country, slice)| (*country, Arc::clone(slice)))
            .collect()
    }

    pub fn has(&self, country: CountryCode) -> bool {
        self.read().contains_key(&country)
    }

    pub fn unregister(&self, country: CountryCode) -> bool {
        self.write().shift_remove(&country).is_some()
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

    /// Builds every slice against `state` and merges the fragments
    ///
    /// A slice that fails, produces an undeclared key, or collides under
    /// [`CollisionPolicy::Reject`] is omitted and recorded in `failures`.
    pub fn combine_slices(&self, state: &dyn StateAccess) -> CombinedState {
        let slices = self.get_all();
        let mut combined = CombinedState::default();
        let mut owners: IndexMap<String, CountryCode> = IndexMap::new();

        for (country, slice) in slices {
            let fragment = match slice.build(state) {
                Ok(fragment) => fragment,
                Err(error) => {
                    warn!(country = %country, error = %error, "State slice failed, skipping");
                    combined.failures.push(SliceFailure {
                        country,
                        message: error.message,
                    });
                    continue;
                }
            };

            let declared: HashSet<String> = slice.declared_keys().into_iter().collect();
            let undeclared: Vec<&String> = fragment.keys().filter(|k| !declared.contains(*k)).collect();
            if !undeclared.is_empty() {
                let message = format!(
                    "slice produced undeclared keys: {}",
                    undeclared.iter().map(|k| k.as_str()).collect::<Vec<_>>().join(", ")
                );
                warn!(country = %country, %message, "State slice rejected");
                combined.failures.push(SliceFailure { country, message });
                continue;
            }

            let collisions: Vec<KeyCollision> = fragment
                .keys()
                .filter_map(|key| {
                    owners.get(key).map(|previous| KeyCollision {
                        key: key.clone(),
                        previous: *previous,
                        winner: country,
                    })
                })
                .collect();

            if !collisions.is_empty() && self.policy == CollisionPolicy::Reject {
                let keys: Vec<&str> = collisions.iter().map(|c| c.key.as_str()).collect();
                let message = format!("state keys already defined: {}", keys.join(", "));
                warn!(country = %country, %message, "State slice rejected");
                combined.failures.push(SliceFailure { country, message });
                // Reported against the original owner; nothing was replaced.
                combined.collisions.extend(collisions.into_iter().map(|c| KeyCollision {
                    winner: c.previous,
                    ..c
                }));
                continue;
            }

            for collision in &collisions {
                warn!(
                    key = %collision.key,
                    previous = %collision.previous,
                    winner = %collision.winner,
                    "State key collision, later slice wins"
                );
            }
            combined.collisions.extend(collisions);

            for (key, value) in fragment.values {
                combined.actions.shift_remove(&key);
                owners.insert(key.clone(), country);
                combined.values.insert(key, value);
            }
            for (key, action) in fragment.actions {
                combined.values.remove(&key);
                owners.insert(key.clone(), country);
                combined.actions.insert(key, action);
            }
        }

        combined
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
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

    struct ValueSlice {
        keys: Vec<&'static str>,
        produced: Vec<(&'static str, Value)>,
    }

    impl StateSlice for ValueSlice {
        fn declared_keys(&self) -> Vec<String> {
            self.keys.iter().map(|k| k.to_string()).collect()
        }

        fn build(&self, _state: &dyn StateAccess) -> Result<StateFragment, ExtensionError> {
            let mut fragment = StateFragment::default();
            for (key, value) in &self.produced {
                fragment.values.insert(key.to_string(), value.clone());
            }
            Ok(fragment)
        }
    }

    fn slice(key: &'static str, value: Value) -> Arc<dyn StateSlice> {
        Arc::new(ValueSlice {
            keys: vec![key],
            produced: vec![(key, value)],
        })
    }

    #[test]
    fn test_last_wins_keeps_later_value() {
        let registry = StateExtensionRegistry::new();
        registry.register(CountryCode::CostaRica, slice("shared", json!(1)));
        registry.register(CountryCode::Panama, slice("shared", json!(2)));

        let combined = registry.combine_slices(&MemoryState::default());
        assert_eq!(combined.values["shared"], json!(2));
        assert_eq!(
            combined.collisions,
            vec![KeyCollision {
                key: "shared".to_string(),
                previous: CountryCode::CostaRica,
                winner: CountryCode::Panama,
            }]
        );
        assert!(combined.failures.is_empty());
    }

    #[test]
    fn test_reject_omits_later_slice() {
        let registry = StateExtensionRegistry::with_policy(CollisionPolicy::Reject);
        registry.register(CountryCode::CostaRica, slice("shared", json!(1)));
        registry.register(
            CountryCode::Panama,
            Arc::new(ValueSlice {
                keys: vec!["shared", "own"],
                produced: vec![("shared", json!(2)), ("own", json!(true))],
            }),
        );

        let combined = registry.combine_slices(&MemoryState::default());
        assert_eq!(combined.values["shared"], json!(1));
        assert!(!combined.values.contains_key("own"));
        assert_eq!(combined.failures.len(), 1);
        assert_eq!(combined.failures[0].country, CountryCode::Panama);
    }

    #[test]
    fn test_undeclared_key_is_a_failure() {
        let registry = StateExtensionRegistry::new();
        registry.register(
            CountryCode::Panama,
            Arc::new(ValueSlice {
                keys: vec!["declared"],
                produced: vec![("declared", json!(1)), ("sneaky", json!(2))],
            }),
        );

        let combined = registry.combine_slices(&MemoryState::default());
        assert!(combined.values.is_empty());
        assert!(combined.failures[0].message.contains("sneaky"));
    }

    struct FailingSlice;

    impl StateSlice for FailingSlice {
        fn declared_keys(&self) -> Vec<String> {
            vec!["broken".to_string()]
        }

        fn build(&self, _state: &dyn StateAccess) -> Result<StateFragment, ExtensionError> {
            Err(ExtensionError::new("lookup table unavailable"))
        }
    }

    struct ActionSlice;

    impl StateSlice for ActionSlice {
        fn declared_keys(&self) -> Vec<String> {
            vec!["zone".to_string(), "setZone".to_string()]
        }

        fn build(&self, _state: &dyn StateAccess) -> Result<StateFragment, ExtensionError> {
            let mut fragment = StateFragment::default();
            fragment.values.insert("zone".to_string(), json!("URBAN"));
            let set_zone: StateAction = Arc::new(|state: &dyn StateAccess, zone: Value| {
                let mut partial = StateMap::new();
                partial.insert("zone".to_string(), zone);
                state.set_state(partial);
                Ok(())
            });
            fragment.actions.insert("setZone".to_string(), set_zone);
            Ok(fragment)
        }
    }

    #[test]
    fn test_failing_slice_does_not_affect_others() {
        let registry = StateExtensionRegistry::new();
        registry.register(CountryCode::CostaRica, Arc::new(FailingSlice));
        registry.register(CountryCode::Panama, Arc::new(ActionSlice));

        let state = MemoryState::default();
        let combined = registry.combine_slices(&state);

        assert_eq!(combined.values.get("zone"), Some(&json!("URBAN")));
        assert!(!combined.values.contains_key("broken"));
        assert!(combined.has_action("setZone"));
        assert_eq!(
            combined.failures,
            vec![SliceFailure {
                country: CountryCode::CostaRica,
                message: "lookup table unavailable".to_string(),
            }]
        );

        combined.dispatch("setZone", &state, json!("RURAL")).unwrap();
        assert_eq!(state.get_state().get("zone"), Some(&json!("RURAL")));
    }

    #[test]
    fn test_dispatch_unknown_action() {
        let combined = CombinedState::default();
        let result = combined.dispatch("missing", &MemoryState::default(), Value::Null);
        assert!(matches!(result, Err(ClaimInfoError::UnknownAction(_))));
    }
}
