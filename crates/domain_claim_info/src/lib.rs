//! Claim Info Domain
//!
//! The per-country extensible claim information form. The core knows the
//! fixed fields every country shares; each country plugs in through a
//! [`CountryConfig`] bundle:
//!
//! - **Field overrides** relabel, hide, reorder or require fixed fields
//! - **Dynamic fields** add fields that exist only for that country
//! - **State extensions** add values and actions to the shared store
//! - **Submit extensions** validate, reshape and post-process submissions
//!
//! # Flow
//!
//! ```text
//! register loaders -> select country -> factory loads bundle once
//!   -> registries populated -> fields resolved -> form rendered
//!   -> submit -> pipeline (validate, mutate, submit, post-process)
//! ```
//!
//! # Example
//!
//! ```rust
//! use domain_claim_info::{CountryConfig, CountryConfigFactory, ExtensionError};
//! use core_kernel::CountryCode;
//!
//! let factory = CountryConfigFactory::new();
//! factory.register_country_extension(CountryCode::CostaRica, || async {
//!     Ok::<_, ExtensionError>(CountryConfig::new(CountryCode::CostaRica))
//! });
//! assert!(factory.has_loader(CountryCode::CostaRica));
//! ```

pub mod country_config;
pub mod demo;
pub mod dynamic_fields;
pub mod error;
pub mod factory;
pub mod field_config;
pub mod journal;
pub mod model;
pub mod session;
pub mod state;
pub mod store;
pub mod submit;
pub mod validation;

pub use country_config::{
    CountryConfig, CountryLoader, CountryValidations, ExtensionSlice, GlobalValidation, StateExtension,
};
pub use demo::demo_claim;
pub use dynamic_fields::{
    DynamicFieldComponent, DynamicFieldDefinition, DynamicFieldProps, DynamicFieldRegistry, FieldPosition,
    FieldView, SelectOption, TextInput,
};
pub use error::{ClaimInfoError, ExtensionError};
pub use factory::CountryConfigFactory;
pub use field_config::{
    default_field_config, default_field_configs, merge_all_field_configs, merge_field_config,
    resolved_field_config, sort_fields_by_order, validate_field_values, validate_required_fields,
    visible_fields, FieldCheck, FieldConfig, FieldConfigMap, FieldOverride, FieldOverridesMap,
    FieldSection, FieldValidator, FixedFieldId, ResolvedFieldConfig, ORDER_SENTINEL,
};
pub use journal::SubmissionJournal;
pub use model::{ClaimInfoData, ClaimInfoState};
pub use session::ClaimFormSession;
pub use state::{
    CollisionPolicy, CombinedState, KeyCollision, SliceFailure, StateAccess, StateAction,
    StateExtensionRegistry, StateFragment, StateMap, StateSlice,
};
pub use store::{ClaimInfoStore, StoreSnapshot};
pub use submit::{
    handler_fn, mutator_fn, validator_fn, ClaimSubmitter, IsolationPolicy, PayloadMutator, PipelineError,
    PipelinePhase, PipelinePolicy, PostSubmitHandler, PostSubmitResult, PreSubmitValidator,
    SubmitContext, SubmitExtensionRegistry, SubmitExtensions, SubmitPipeline, SubmitPipelineResult,
};
pub use validation::{str_at, ValidationResult};
