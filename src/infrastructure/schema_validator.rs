use anyhow::{anyhow, Result};
use jsonschema::{Draft, JSONSchema};
use once_cell::sync::Lazy;
use serde_json::Value;

static MASK_RECORD_SCHEMA: Lazy<JSONSchema> = Lazy::new(|| {
    let schema_content = include_str!("../schemas/mask_record_schema.json");
    let schema: Value = serde_json::from_str(schema_content).expect("Invalid mask record schema");
    JSONSchema::options()
        .with_draft(Draft::Draft7)
        .compile(&schema)
        .expect("Failed to compile mask record schema")
});

static SIMULATION_REPORT_SCHEMA: Lazy<JSONSchema> = Lazy::new(|| {
    let schema_content = include_str!("../schemas/simulation_report_schema.json");
    let schema: Value =
        serde_json::from_str(schema_content).expect("Invalid simulation report schema");
    JSONSchema::options()
        .with_draft(Draft::Draft7)
        .compile(&schema)
        .expect("Failed to compile simulation report schema")
});

/// Validate a cached edge mask record
pub fn validate_mask_record(record: &Value) -> Result<()> {
    match MASK_RECORD_SCHEMA.validate(record) {
        Ok(()) => Ok(()),
        Err(errors) => {
            let error_list: Vec<String> = errors.map(|e| e.to_string()).collect();
            Err(anyhow!(
                "Mask record validation failed:\n{}",
                error_list.join("\n")
            ))
        }
    }
}

/// Validate the shape of a simulation report; invariants are checked by the usecase layer
pub fn validate_simulation_report(report: &Value) -> Result<()> {
    match SIMULATION_REPORT_SCHEMA.validate(report) {
        Ok(()) => Ok(()),
        Err(errors) => {
            let error_list: Vec<String> = errors.map(|e| e.to_string()).collect();
            Err(anyhow!(
                "Simulation report validation failed:\n{}",
                error_list.join("\n")
            ))
        }
    }
}
