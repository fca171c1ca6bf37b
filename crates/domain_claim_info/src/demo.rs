//! Demo claims
//!
//! Claims shaped like the ones each country's backend returns. The demo
//! HTTP surface loads one into the store whenever the country changes.

use core_kernel::CountryCode;

use crate::model::{
    Broker, Claim, ClaimInfoData, Coverage, Deductible, Driver, Owner, Policy, VehicleInformation,
};

/// The demo claim shown for `country`
pub fn demo_claim(country: CountryCode) -> ClaimInfoData {
    match country {
        CountryCode::CostaRica => costa_rica(),
        CountryCode::Panama => panama(),
    }
}

/// A Costa Rican claim in colones
fn costa_rica() -> ClaimInfoData {
    ClaimInfoData {
        policy: Policy {
            policy_number: "POL-CR-2024-001234".into(),
            owner: Owner {
                name: "Juan Carlos".into(),
                last_name: "Rodríguez Pérez".into(),
                ruc: "1-1234-5678".into(),
            },
            broker: Broker {
                full_name: "Seguros del Pacífico S.A.".into(),
            },
            coverages: vec![
                coverage("001", "Cobertura Amplia", "15000000"),
                coverage("002", "Cobertura Básica", "8000000"),
            ],
            pay_overdue_days: 0,
        },
        vehicle_information: VehicleInformation {
            model: "Toyota Corolla".into(),
            plate: "ABC-1234".into(),
            serial_chassis: "JT2BG22K0X0123456".into(),
            year: 2022,
            depreciation: 15.0,
        },
        claim: Claim {
            claim_number: "CLM-CR-2024-567890".into(),
            fud: "APPLY".into(),
            driver: driver("María", "González", "1990-05-15"),
        },
        deductible: Deductible {
            base: 150000.0,
            calculated: 135000.0,
            exonerated_by_analyst: false,
        },
        coverage_code: "001".into(),
        endorsement: "Plan Premium".into(),
        total_loss_percentage: "10.6".into(),
        creditor: "Banco Nacional de Costa Rica".into(),
        deductible_payment: "En taller".into(),
        total_claim_cost: 2450000.0,
        currency: Some("CRC".into()),
    }
}

/// A Panamanian claim in dollars
fn panama() -> ClaimInfoData {
    ClaimInfoData {
        policy: Policy {
            policy_number: "POL-PA-2024-789456".into(),
            owner: Owner {
                name: "Roberto".into(),
                last_name: "Martínez López".into(),
                ruc: "1234567-1-123456".into(),
            },
            broker: Broker {
                full_name: "Aseguradora Mundial de Panamá S.A.".into(),
            },
            coverages: vec![
                coverage("001", "Cobertura Amplia", "25000"),
                coverage("002", "Cobertura Básica", "15000"),
            ],
            pay_overdue_days: 5,
        },
        vehicle_information: VehicleInformation {
            model: "Honda Civic".into(),
            plate: "123456".into(),
            serial_chassis: "2HGFC2F59MH123456".into(),
            year: 2023,
            depreciation: 12.0,
        },
        claim: Claim {
            claim_number: "CLM-PA-2024-123987".into(),
            fud: "NONE".into(),
            driver: driver("Ana", "Fernández", "1988-08-20"),
        },
        deductible: Deductible {
            base: 500.0,
            calculated: 450.0,
            exonerated_by_analyst: false,
        },
        coverage_code: "001".into(),
        endorsement: "Plan Ejecutivo".into(),
        total_loss_percentage: "8.5".into(),
        creditor: "Banco General de Panamá".into(),
        deductible_payment: "En aseguradora".into(),
        total_claim_cost: 4500.0,
        currency: Some("USD".into()),
    }
}

fn coverage(code: &str, description: &str, insured_amount: &str) -> Coverage {
    Coverage {
        coverage_code: code.into(),
        description: description.into(),
        insured_amount: insured_amount.into(),
    }
}

fn driver(name: &str, last_name: &str, birthday: &str) -> Driver {
    Driver {
        name: name.into(),
        last_name: last_name.into(),
        gender: "F".into(),
        birthday: birthday.into(),
    }
}
