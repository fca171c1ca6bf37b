//! Costa Rica bundle tests
//!
//! Loads the bundle through a factory and drives submissions through the
//! pipeline with the shared fixtures.

use country_costa_rica::{handlers::SUBMIT_LOG, validations, Options, COUNTRY};
use domain_claim_info::{
    ClaimFormSession, ClaimInfoStore, CountryConfigFactory, FixedFieldId, SubmissionJournal,
    SubmitPipeline,
};
use serde_json::json;
use std::sync::Arc;
use test_utils::*;

fn loaded_factory(journal: Arc<SubmissionJournal>) -> Arc<CountryConfigFactory> {
    let factory = Arc::new(CountryConfigFactory::new());
    country_costa_rica::register(&factory, Options::immediate(journal));
    factory
}

mod bundle_tests {
    use super::*;

    #[tokio::test]
    async fn test_bundle_registers_submit_extensions_and_state() {
        let factory = loaded_factory(Arc::new(SubmissionJournal::new()));
        let config = factory.load_country_config(COUNTRY).await.unwrap();

        assert_eq!(config.country_name, "Costa Rica");
        assert!(config.dynamic_fields.is_empty());
        assert!(factory.dynamic_fields().is_empty());
        assert!(factory.state_extensions().has(COUNTRY));

        let extensions = factory.submit_extensions().country_extensions(COUNTRY);
        assert_eq!(extensions.pre_validators.len(), 3);
        assert_eq!(extensions.payload_mutators.len(), 4);
        assert_eq!(extensions.post_handlers.len(), 3);
    }

    #[test]
    fn test_overrides_relabel_and_require() {
        let config = country_costa_rica::config(&Options::default());
        let overrides = config.field_overrides.unwrap();

        let ruc = overrides.get(FixedFieldId::PolicyOwnerRuc.as_str()).unwrap();
        assert_eq!(ruc.label.as_deref(), Some("Cédula de identidad"));
        assert_eq!(ruc.helper_text.as_deref(), Some("Formato: 0-0000-0000"));

        let delinquency = overrides.get(FixedFieldId::PolicyDelinquency.as_str()).unwrap();
        assert_eq!(delinquency.required, Some(true));
        assert_eq!(delinquency.label.as_deref(), Some("Días de morosidad"));
    }

    #[test]
    fn test_global_validation_flags_bad_formats() {
        let data = FormDataBuilder::costa_rica()
            .with("/claimInfo/policy/Owner/ruc", json!("112345678"))
            .with("/claimInfo/vehicleInformation/plate", json!("123456"))
            .build();

        let result = validations::validate_before_submit(&data);
        assert_validation_error(&result, "policyOwnerRuc", "Formato de cédula inválido para Costa Rica");
        assert_validation_error(&result, "vehiclePlate", "Formato de placa inválido para Costa Rica");

        assert_valid(&validations::validate_before_submit(&FormDataFixtures::costa_rica()));
    }
}

mod pipeline_tests {
    use super::*;

    async fn pipeline() -> (SubmitPipeline, Arc<SubmissionJournal>) {
        let journal = Arc::new(SubmissionJournal::new());
        let factory = loaded_factory(Arc::clone(&journal));
        factory.load_country_config(COUNTRY).await.unwrap();
        (SubmitPipeline::new(Arc::clone(factory.submit_extensions())), journal)
    }

    #[tokio::test]
    async fn test_valid_submission_is_normalized_and_post_processed() {
        let (pipeline, journal) = pipeline().await;
        let submitter = RecordingSubmitter::new();

        let result = pipeline
            .execute(COUNTRY, FormDataFixtures::costa_rica(), &submitter)
            .await;

        assert_submitted(&result);
        assert_eq!(result.post_results.as_ref().map(Vec::len), Some(3));

        let payloads = submitter.payloads();
        assert_eq!(payloads.len(), 1);
        let payload = &payloads[0];
        assert_eq!(payload.pointer("/claimInfo/policy/Owner/ruc"), Some(&json!("112345678")));
        assert_eq!(payload.pointer("/claimInfo/currencySymbol"), Some(&json!("₡")));
        assert_eq!(payload.pointer("/countryMetadata/countryCode"), Some(&json!("CR")));
        assert_eq!(payload.pointer("/claimInfo/vehicleInformation/country"), Some(&json!("CR")));
        assert!(payload.get("submittedAt").is_some());

        let entries = journal.entries(SUBMIT_LOG);
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0]["claimId"], json!("CLM-TEST-1"));
        assert_eq!(entries[0]["ownerName"], json!("Juan Carlos"));
    }

    #[tokio::test]
    async fn test_invalid_ruc_blocks_submission() {
        let (pipeline, journal) = pipeline().await;
        let submitter = RecordingSubmitter::new();
        let data = FormDataBuilder::costa_rica()
            .with("/claimInfo/policy/Owner/ruc", json!("12-34"))
            .build();

        let result = pipeline.execute(COUNTRY, data, &submitter).await;

        assert_rejected(
            &result,
            "ruc",
            "El RUC de Costa Rica debe tener el formato correcto (9 o 10 dígitos)",
        );
        assert_eq!(submitter.call_count(), 0);
        assert!(journal.entries(SUBMIT_LOG).is_empty());
    }

    #[tokio::test]
    async fn test_missing_required_fields_are_all_reported() {
        let (pipeline, _) = pipeline().await;
        let data = FormDataBuilder::costa_rica()
            .with("/claimInfo/policy/Owner/name", json!(""))
            .without("/claimInfo/vehicleInformation/plate")
            .without("/claimInfo/vehicleInformation/model")
            .build();

        let result = pipeline.execute(COUNTRY, data, &RecordingSubmitter::new()).await;

        assert_rejected(&result, "ownerName", "El nombre del propietario es requerido");
        assert_rejected(&result, "plate", "La placa del vehículo es requerida");
        assert_rejected(&result, "model", "El modelo del vehículo es requerido");
    }

    #[tokio::test]
    async fn test_missing_ruc_warns_and_high_deductible_warns() {
        let (pipeline, _) = pipeline().await;
        let data = FormDataBuilder::costa_rica()
            .with("/claimInfo/policy/Owner/ruc", json!(""))
            .with("/claimInfo/deductible/Calculated", json!(4_000_000))
            .build();

        let result = pipeline.execute(COUNTRY, data, &RecordingSubmitter::new()).await;

        assert_submitted(&result);
        assert_eq!(
            result.warnings.get("ruc").map(String::as_str),
            Some("No se proporcionó RUC del propietario de la póliza")
        );
        assert_eq!(
            result.warnings.get("deductible").map(String::as_str),
            Some("El deducible es mayor al 20% del monto asegurado")
        );
    }

    #[tokio::test]
    async fn test_zero_insured_amount_is_rejected() {
        let (pipeline, _) = pipeline().await;
        let data = FormDataBuilder::costa_rica()
            .with("/claimInfo/coverageCode", json!("999"))
            .build();

        let result = pipeline.execute(COUNTRY, data, &RecordingSubmitter::new()).await;

        assert_rejected(&result, "insuredAmount", "El monto asegurado debe ser mayor a 0");
    }
}

mod session_tests {
    use super::*;

    #[tokio::test]
    async fn test_state_actions_update_store() {
        let factory = loaded_factory(Arc::new(SubmissionJournal::new()));
        let store = Arc::new(ClaimInfoStore::new());
        let session = ClaimFormSession::new(factory, Arc::clone(&store));

        session.load_country(COUNTRY).await.unwrap();
        assert_eq!(store.dynamic_field_value("hasSugef"), Some(json!(false)));

        store.dispatch("setSugefStatus", json!(true)).unwrap();
        store.dispatch("setSpecialDiscount", json!(true)).unwrap();

        assert_eq!(store.extension_values().get("hasSugef"), Some(&json!(true)));
        assert_eq!(store.extension_values().get("hasSpecialDiscount"), Some(&json!(true)));
        assert!(store.dispatch("setSugefStatus", json!("yes")).is_err());
    }

    #[tokio::test]
    async fn test_session_submit_round_trip() {
        let journal = Arc::new(SubmissionJournal::new());
        let store = Arc::new(ClaimInfoStore::new());
        let session = ClaimFormSession::new(loaded_factory(Arc::clone(&journal)), Arc::clone(&store));

        session.load_country(COUNTRY).await.unwrap();
        store.set_claim_info(Some(ClaimFixtures::costa_rica()), false);

        let result = session.submit_claim(&RecordingSubmitter::new()).await.unwrap();

        assert_submitted(&result);
        assert!(store.validation_errors().is_empty());
        assert_eq!(journal.entries(SUBMIT_LOG).len(), 1);
    }
}
