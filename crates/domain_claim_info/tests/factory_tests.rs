//! Country configuration factory tests

use core_kernel::CountryCode;
use domain_claim_info::{
    ClaimInfoError, CountryConfigFactory, ExtensionError, FieldOverride, StateExtension, StateMap,
};
use serde_json::json;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use std::time::Duration;
use test_utils::*;

const CR: CountryCode = CountryCode::CostaRica;
const PA: CountryCode = CountryCode::Panama;

fn panama_bundle() -> domain_claim_info::CountryConfig {
    let mut initial = StateMap::new();
    initial.insert("panamaInsuranceZone".into(), json!("URBAN"));
    CountryConfigBuilder::new(PA)
        .with_override("broker", FieldOverride::new().with_visible(false))
        .with_text_field("panamaTaxId", "policy", "RUC del Asegurado")
        .with_state_extension(StateExtension::new(initial).with_action("noop", |_, _| Ok(())))
        .with_pre_validator(StaticValidator::passing())
        .build()
}

mod factory_tests {
    use super::*;

    #[tokio::test]
    async fn test_load_registers_contributions_once() {
        let factory = CountryConfigFactory::new();
        let loader = CountingLoader::new(panama_bundle);
        let calls = loader.calls();
        factory.register_country_extension(PA, loader);

        let first = factory.load_country_config(PA).await.unwrap();
        let second = factory.load_country_config(PA).await.unwrap();

        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert!(factory.dynamic_fields().has("panamaTaxId"));
        assert!(factory.state_extensions().has(PA));
        assert_eq!(factory.submit_extensions().pre_validators(PA).len(), 1);
    }

    #[tokio::test]
    async fn test_concurrent_loads_share_one_loader_call() {
        let factory = Arc::new(CountryConfigFactory::new());
        let loader = CountingLoader::new(panama_bundle).with_delay(Duration::from_millis(20));
        let calls = loader.calls();
        factory.register_country_extension(PA, loader);

        let handles: Vec<_> = (0..4)
            .map(|_| {
                let factory = Arc::clone(&factory);
                tokio::spawn(async move { factory.load_country_config(PA).await })
            })
            .collect();
        for handle in handles {
            assert!(handle.await.unwrap().is_ok());
        }

        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(factory.dynamic_fields().len(), 1);
    }

    #[tokio::test]
    async fn test_unregistered_country_is_not_found() {
        let factory = CountryConfigFactory::new();

        let error = factory.load_country_config(CR).await.unwrap_err();

        match &error {
            ClaimInfoError::ConfigurationNotFound { country, source } => {
                assert_eq!(*country, CR);
                assert!(source.message.contains("No extension registered for country: CR"));
            }
            other => panic!("Expected ConfigurationNotFound, got {other:?}"),
        }
        assert_eq!(error.to_string(), "Country configuration not found for: CR");
    }

    #[tokio::test]
    async fn test_failing_loader_leaves_registries_empty() {
        let factory = CountryConfigFactory::new();
        factory.register_country_extension(PA, CountingLoader::new(panama_bundle).failing("boom"));

        let error = factory.load_country_config(PA).await.unwrap_err();

        assert!(matches!(error, ClaimInfoError::ConfigurationNotFound { .. }));
        assert!(!factory.is_cached(PA));
        assert!(factory.dynamic_fields().is_empty());
        assert!(!factory.submit_extensions().has_extensions(PA));
    }

    #[tokio::test]
    async fn test_invalid_bundle_is_rejected_before_registration() {
        let factory = CountryConfigFactory::new();
        factory.register_country_extension(PA, || async {
            Ok::<_, ExtensionError>(CountryConfigBuilder::new(PA)
                .with_text_field("panamaTaxId", "policy", "A")
                .with_text_field("panamaTaxId", "claim", "B")
                .build())
        });
        factory.register_country_extension(CR, || async {
            Ok::<_, ExtensionError>(CountryConfigBuilder::new(CR).with_country_code(PA).build())
        });

        assert!(factory.load_country_config(PA).await.is_err());
        assert!(factory.load_country_config(CR).await.is_err());
        assert!(factory.dynamic_fields().is_empty());
        assert!(!factory.is_cached(PA));
        assert!(!factory.is_cached(CR));
    }

    #[tokio::test]
    async fn test_clear_cache_forces_reload_and_empties_registries() {
        let factory = CountryConfigFactory::new();
        let loader = CountingLoader::new(panama_bundle);
        let calls = loader.calls();
        factory.register_country_extension(PA, loader);

        factory.load_country_config(PA).await.unwrap();
        factory.clear_cache();

        assert!(!factory.is_cached(PA));
        assert!(factory.dynamic_fields().is_empty());
        assert!(factory.state_extensions().is_empty());
        assert!(!factory.submit_extensions().has_extensions(PA));

        factory.load_country_config(PA).await.unwrap();
        assert_eq!(calls.load(Ordering::SeqCst), 2);
        assert!(factory.dynamic_fields().has("panamaTaxId"));
    }

    #[tokio::test]
    async fn test_clear_during_load_discards_stale_bundle() {
        let factory = Arc::new(CountryConfigFactory::new());
        factory.register_country_extension(
            PA,
            CountingLoader::new(panama_bundle).with_delay(Duration::from_millis(100)),
        );

        let loading = {
            let factory = Arc::clone(&factory);
            tokio::spawn(async move { factory.load_country_config(PA).await })
        };
        tokio::time::sleep(Duration::from_millis(20)).await;
        factory.clear_cache();

        let result = loading.await.unwrap();
        assert!(matches!(result, Err(ClaimInfoError::LoadSuperseded(PA))));
        assert!(!factory.is_cached(PA));
        assert!(factory.dynamic_fields().is_empty());
        assert!(!factory.submit_extensions().has_extensions(PA));
    }

    #[tokio::test]
    async fn test_state_extension_without_actions_is_not_registered() {
        let factory = CountryConfigFactory::new();
        factory.register_country_extension(CR, || async {
            let mut initial = StateMap::new();
            initial.insert("hasSugef".into(), json!(false));
            Ok::<_, ExtensionError>(CountryConfigBuilder::new(CR)
                .with_state_extension(StateExtension::new(initial))
                .build())
        });

        let config = factory.load_country_config(CR).await.unwrap();

        assert!(!factory.state_extensions().has(CR));
        assert_eq!(config.initial_state().get("hasSugef"), Some(&json!(false)));
    }

    #[test]
    fn test_supported_countries() {
        let factory = CountryConfigFactory::new();
        assert!(factory.is_country_supported("CR"));
        assert!(factory.is_country_supported("PA"));
        assert!(!factory.is_country_supported("MX"));
        assert_eq!(factory.supported_countries(), vec![CR, PA]);
    }
}
