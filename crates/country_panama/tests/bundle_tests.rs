//! Panama bundle tests

use country_panama::handlers::{zone_stats_key, SUBMIT_LOG};
use country_panama::{fields, validations, Options, COUNTRY};
use domain_claim_info::{
    ClaimFormSession, ClaimInfoStore, CountryConfigFactory, FieldPosition, FieldSection,
    FixedFieldId, SubmissionJournal, SubmitPipeline,
};
use serde_json::json;
use std::sync::Arc;
use test_utils::*;

fn loaded_factory(journal: Arc<SubmissionJournal>) -> Arc<CountryConfigFactory> {
    let factory = Arc::new(CountryConfigFactory::new());
    country_panama::register(&factory, Options::immediate(journal));
    factory
}

async fn pipeline(journal: Arc<SubmissionJournal>) -> SubmitPipeline {
    let factory = loaded_factory(journal);
    factory.load_country_config(COUNTRY).await.unwrap();
    SubmitPipeline::new(Arc::clone(factory.submit_extensions()))
}

mod bundle_tests {
    use super::*;

    #[tokio::test]
    async fn test_dynamic_fields_are_registered_by_section() {
        let factory = loaded_factory(Arc::new(SubmissionJournal::new()));
        factory.load_country_config(COUNTRY).await.unwrap();

        let registry = factory.dynamic_fields();
        assert_eq!(registry.len(), 2);

        let policy = registry.get_by_section(&FieldSection::Policy);
        assert_eq!(policy.len(), 1);
        assert_eq!(policy[0].id, fields::TAX_ID);
        assert_eq!(policy[0].position, Some(FieldPosition::Index(7)));

        let claim = registry.get_by_section(&FieldSection::Claim);
        assert_eq!(claim[0].id, fields::INSURANCE_ZONE);
        assert_eq!(claim[0].position, Some(FieldPosition::Index(14)));
        assert!(claim[0].config.required);
    }

    #[test]
    fn test_overrides_hide_broker_and_reorder_depreciation() {
        let overrides = country_panama::config(&Options::default()).field_overrides.unwrap();
        let configs = domain_claim_info::merge_all_field_configs(Some(&overrides));

        assert!(!configs[FixedFieldId::Broker.as_str()].visible);
        let depreciation = &configs[FixedFieldId::DepreciationPercentage.as_str()];
        assert!(depreciation.required);
        assert_eq!(depreciation.order, Some(5));
        assert_eq!(depreciation.label, "Depreciación anual (%)");
        assert_eq!(configs[FixedFieldId::PolicyOwnerRuc.as_str()].label, "RUC");
    }

    #[test]
    fn test_global_validation() {
        assert_valid(&validations::validate_before_submit(&FormDataFixtures::panama()));

        let data = FormDataBuilder::panama()
            .with("/claimInfo/policy/Owner/ruc", json!("123456"))
            .with("/claimInfo/vehicleInformation/plate", json!("ABC-1234"))
            .with("/claimInfo/vehicleInformation/depreciation", json!(35))
            .without("/dynamicFields/panamaTaxId")
            .build();
        let result = validations::validate_before_submit(&data);

        assert_validation_error(&result, "policyOwnerRuc", "Formato de RUC inválido para Panamá");
        assert_validation_error(
            &result,
            "vehiclePlate",
            "Formato de placa inválido para Panamá (solo números)",
        );
        assert_validation_error(&result, "panamaTaxId", "RUC del asegurado es requerido en Panamá");
        assert_validation_warning(
            &result,
            "depreciation",
            "Depreciación superior al 30% puede requerir aprobación especial",
        );
    }
}

mod pipeline_tests {
    use super::*;

    #[tokio::test]
    async fn test_valid_submission_runs_every_handler() {
        let journal = Arc::new(SubmissionJournal::new());
        let pipeline = pipeline(Arc::clone(&journal)).await;
        let submitter = RecordingSubmitter::new();

        let result = pipeline
            .execute(COUNTRY, FormDataFixtures::panama(), &submitter)
            .await;

        assert_submitted(&result);
        let post_results = result.post_results.unwrap();
        assert_eq!(post_results.len(), 5);
        assert!(post_results.iter().all(|r| r.success));

        let payload = &submitter.payloads()[0];
        assert_eq!(payload.pointer("/panamaSpecific/taxId"), Some(&json!("8-123-456")));
        assert_eq!(payload.pointer("/panamaSpecific/zoneTariff/factor"), Some(&json!(1.0)));
        assert_eq!(payload.pointer("/countryMetadata/currencyAlternative"), Some(&json!("USD")));
        assert_eq!(
            payload.pointer("/claimInfo/vehicleInformation/plateFormat"),
            Some(&json!("numeric"))
        );

        let entries = journal.entries(SUBMIT_LOG);
        assert_eq!(entries[0]["insuranceZone"], json!("URBAN"));
        assert_eq!(journal.stats(&zone_stats_key("URBAN")).unwrap()["count"], json!(1));

        let certificate = post_results[2].data.as_ref().unwrap();
        assert_eq!(certificate["type"], json!("CERTIFICADO_RECLAMO"));
        assert_eq!(
            certificate["url"],
            json!("https://storage.example.com/certificates/CLM-TEST-1.pdf")
        );
    }

    #[tokio::test]
    async fn test_zone_statistics_accumulate() {
        let journal = Arc::new(SubmissionJournal::new());
        let pipeline = pipeline(Arc::clone(&journal)).await;
        let submitter = RecordingSubmitter::new();

        for _ in 0..2 {
            pipeline.execute(COUNTRY, FormDataFixtures::panama(), &submitter).await;
        }

        let stats = journal.stats(&zone_stats_key("URBAN")).unwrap();
        assert_eq!(stats["count"], json!(2));
        assert_eq!(stats["lastClaimId"], json!("CLM-TEST-2"));
    }

    #[tokio::test]
    async fn test_missing_zone_fails_statistics_handler() {
        let pipeline = pipeline(Arc::new(SubmissionJournal::new())).await;
        let data = FormDataBuilder::panama()
            .without("/dynamicFields/panamaInsuranceZone")
            .build();

        let result = pipeline.execute(COUNTRY, data, &RecordingSubmitter::new()).await;

        assert!(!result.success);
        assert!(result.response.is_some());
        assert_error_entry(&result.errors, "post_handler_5", "No se pudo determinar la zona de seguro");
        assert!(result.warnings.contains_key("panamaInsuranceZone"));
    }

    #[tokio::test]
    async fn test_tax_id_and_zone_errors_short_circuit() {
        let pipeline = pipeline(Arc::new(SubmissionJournal::new())).await;
        let submitter = RecordingSubmitter::new();
        let data = FormDataBuilder::panama()
            .with("/dynamicFields/panamaTaxId", json!("BAD"))
            .with("/dynamicFields/panamaInsuranceZone", json!("COLON"))
            .build();

        let result = pipeline.execute(COUNTRY, data, &submitter).await;

        assert_rejected(
            &result,
            "panamaTaxId",
            "El Tax ID de Panamá debe tener el formato correcto (ej: 8-123-456 o PE-12-3456)",
        );
        assert_rejected(
            &result,
            "panamaInsuranceZone",
            "La zona de seguro debe ser URBAN, RURAL o INTERIOR",
        );
        assert_eq!(submitter.call_count(), 0);
    }

    #[tokio::test]
    async fn test_required_fields_and_high_amount() {
        let pipeline = pipeline(Arc::new(SubmissionJournal::new())).await;

        let missing = FormDataBuilder::panama()
            .with("/claimInfo/policy/Owner/ruc", json!("12"))
            .with("/claimInfo/vehicleInformation/plate", json!("12-34"))
            .build();
        let result = pipeline.execute(COUNTRY, missing, &RecordingSubmitter::new()).await;
        assert_rejected(&result, "ruc", "El RUC/DV debe tener al menos 3 caracteres");
        assert_rejected(
            &result,
            "plate",
            "Formato de placa inválido para Panamá (ej: 123456 o ABC-1234)",
        );

        let expensive = FormDataBuilder::panama()
            .with("/claimInfo/policy/coverages/0/insuredAmount", json!("750000"))
            .build();
        let result = pipeline.execute(COUNTRY, expensive, &RecordingSubmitter::new()).await;
        assert_submitted(&result);
        assert_eq!(
            result.warnings.get("insuredAmount").map(String::as_str),
            Some("Monto asegurado muy alto para Panamá (> B/. 500,000)")
        );
    }
}

mod session_tests {
    use super::*;

    #[tokio::test]
    async fn test_dynamic_fields_seeded_and_normalized() {
        let store = Arc::new(ClaimInfoStore::new());
        let session = ClaimFormSession::new(
            loaded_factory(Arc::new(SubmissionJournal::new())),
            Arc::clone(&store),
        );
        session.load_country(COUNTRY).await.unwrap();

        assert_eq!(store.dynamic_field_value(fields::TAX_ID), Some(json!("8-123-456")));
        assert_eq!(store.dynamic_field_value(fields::INSURANCE_ZONE), Some(json!("URBAN")));

        let stored = session
            .set_dynamic_field(fields::TAX_ID, json!(" pe-12-3456"))
            .unwrap();
        assert_eq!(stored, json!("PE-12-3456"));
        assert_eq!(store.dynamic_field_value(fields::TAX_ID), Some(json!("PE-12-3456")));

        let views = session.dynamic_field_views(&FieldSection::Claim);
        assert_eq!(views[0].kind, "select");
        assert_eq!(views[0].value, json!("URBAN"));
    }

    #[tokio::test]
    async fn test_state_actions() {
        let store = Arc::new(ClaimInfoStore::new());
        let session = ClaimFormSession::new(
            loaded_factory(Arc::new(SubmissionJournal::new())),
            Arc::clone(&store),
        );
        session.load_country(COUNTRY).await.unwrap();
        store.set_claim_info(Some(ClaimFixtures::panama()), false);

        store.dispatch("updatePanamaInsuranceZone", json!("RURAL")).unwrap();
        store.dispatch("setPanamaSpecialTax", json!(true)).unwrap();

        let values = store.extension_values();
        assert_eq!(values.get("panamaInsuranceZone"), Some(&json!("RURAL")));
        assert_eq!(values.get("hasPanamaSpecialTax"), Some(&json!(true)));
        assert!(store.dispatch("updatePanamaTaxId", json!(42)).is_err());
    }
}
