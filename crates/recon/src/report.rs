//! Report document as produced by the extraction pipeline.
//!
//! Every field is optional on the wire. Scalar fields are decoded leniently:
//! text accepts strings, numbers or booleans; counts accept numbers or numeric
//! strings; lists that are null or not arrays decode as empty, and list
//! elements that do not fit the expected shape are skipped.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::error::ReconError;

// ---------------------------------------------------------------------------
// Report
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct Report {
    #[serde(rename = "_id", deserialize_with = "text", skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(deserialize_with = "text")]
    pub file_name: Option<String>,
    #[serde(deserialize_with = "object")]
    pub header: DriverHeader,
    /// Reverse-chronological: index 0 is the most recent policy.
    #[serde(deserialize_with = "list")]
    pub policies: Vec<Policy>,
    #[serde(deserialize_with = "list")]
    pub claims: Vec<Claim>,
    #[serde(deserialize_with = "list")]
    pub previous_inquiries: Vec<PreviousInquiry>,
    #[serde(deserialize_with = "count")]
    pub pages_count: Option<u32>,
}

impl Report {
    /// Decode a report from JSON text.
    ///
    /// Accepts either a bare report object or the store envelope
    /// `{"ok": true, "report": {...}}`.
    pub fn from_json(input: &str) -> Result<Self, ReconError> {
        let value: Value =
            serde_json::from_str(input).map_err(|e| ReconError::ReportDecode(e.to_string()))?;
        Self::from_value(value)
    }

    pub fn from_value(value: Value) -> Result<Self, ReconError> {
        let Value::Object(mut map) = value else {
            return Err(ReconError::ReportDecode("expected a JSON object".into()));
        };
        let doc = match map.remove("report") {
            Some(inner @ Value::Object(_)) if !map.contains_key("header") => inner,
            Some(other) => {
                map.insert("report".into(), other);
                Value::Object(map)
            }
            None => Value::Object(map),
        };
        serde_json::from_value(doc).map_err(|e| ReconError::ReportDecode(e.to_string()))
    }
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct DriverHeader {
    #[serde(deserialize_with = "text")]
    pub driver_name: Option<String>,
    /// Primary driver's license number. Join key for operator matching.
    #[serde(deserialize_with = "text")]
    pub dln: Option<String>,
    #[serde(deserialize_with = "text")]
    pub province: Option<String>,
    #[serde(deserialize_with = "text")]
    pub date_of_birth: Option<String>,
    #[serde(deserialize_with = "text")]
    pub report_date: Option<String>,
    #[serde(deserialize_with = "text")]
    pub address: Option<String>,
    #[serde(deserialize_with = "text")]
    pub gender: Option<String>,
    #[serde(deserialize_with = "text")]
    pub marital_status: Option<String>,
    #[serde(deserialize_with = "count")]
    pub num_claims_6y: Option<u32>,
    #[serde(deserialize_with = "count")]
    pub num_atfault_6y: Option<u32>,
    #[serde(deserialize_with = "count")]
    pub num_comp_losses_6y: Option<u32>,
    #[serde(deserialize_with = "count")]
    pub num_dcpd_6y: Option<u32>,
    #[serde(deserialize_with = "count")]
    pub years_licensed: Option<u32>,
    #[serde(deserialize_with = "count")]
    pub years_cont_insurance: Option<u32>,
    #[serde(deserialize_with = "count")]
    pub years_claims_free: Option<u32>,
    #[serde(deserialize_with = "count")]
    pub years_of_data: Option<u32>,
}

// ---------------------------------------------------------------------------
// Policy
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct Policy {
    #[serde(deserialize_with = "object")]
    pub header: PolicyHeader,
    #[serde(deserialize_with = "list")]
    pub operators: Vec<Operator>,
    #[serde(deserialize_with = "list")]
    pub vehicles: Vec<Vehicle>,
    /// Precomputed upstream; wins over every operator-derived start.
    #[serde(deserialize_with = "text", skip_serializing_if = "Option::is_none")]
    pub start_of_earliest_term: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct PolicyHeader {
    #[serde(deserialize_with = "text")]
    pub policy_number: Option<String>,
    #[serde(deserialize_with = "text")]
    pub insurer: Option<String>,
    #[serde(deserialize_with = "text")]
    pub status: Option<String>,
    #[serde(deserialize_with = "text")]
    pub policy_range: Option<String>,
    #[serde(deserialize_with = "text")]
    pub range_insurer_status: Option<String>,
    #[serde(deserialize_with = "text")]
    pub policyholder_name: Option<String>,
    #[serde(deserialize_with = "text")]
    pub policyholder_address: Option<String>,
    #[serde(deserialize_with = "text")]
    pub effective_date: Option<String>,
    #[serde(deserialize_with = "text")]
    pub expiry_date: Option<String>,
    #[serde(deserialize_with = "text")]
    pub cancellation_date: Option<String>,
    #[serde(deserialize_with = "count")]
    pub num_reported_operators: Option<u32>,
    #[serde(deserialize_with = "count")]
    pub num_pp_vehicles: Option<u32>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct Operator {
    #[serde(alias = "name", deserialize_with = "text")]
    pub operator_name: Option<String>,
    #[serde(alias = "license", deserialize_with = "text")]
    pub dln: Option<String>,
    #[serde(deserialize_with = "text")]
    pub province: Option<String>,
    #[serde(deserialize_with = "text")]
    pub relationship: Option<String>,
    #[serde(deserialize_with = "text")]
    pub year_of_birth: Option<String>,
    #[serde(deserialize_with = "text")]
    pub start_term: Option<String>,
    #[serde(deserialize_with = "text")]
    pub end_term: Option<String>,
    #[serde(deserialize_with = "text")]
    pub vehicle_ref: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct Vehicle {
    #[serde(deserialize_with = "text")]
    pub vehicle: Option<String>,
    #[serde(deserialize_with = "text")]
    pub vin: Option<String>,
    #[serde(deserialize_with = "text")]
    pub coverage: Option<String>,
}

// ---------------------------------------------------------------------------
// Claims + inquiries
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct Claim {
    #[serde(deserialize_with = "text")]
    pub insurer: Option<String>,
    #[serde(deserialize_with = "text")]
    pub date_of_loss: Option<String>,
    #[serde(deserialize_with = "text")]
    pub date_reported: Option<String>,
    #[serde(deserialize_with = "text")]
    pub vehicle: Option<String>,
    #[serde(deserialize_with = "text")]
    pub vin: Option<String>,
    #[serde(deserialize_with = "text")]
    pub coverage: Option<String>,
    #[serde(alias = "status", deserialize_with = "text")]
    pub claim_status: Option<String>,
    #[serde(deserialize_with = "flag")]
    pub at_fault: Option<bool>,
    #[serde(deserialize_with = "text")]
    pub total_loss: Option<String>,
    #[serde(deserialize_with = "text")]
    pub total_expense: Option<String>,
    #[serde(deserialize_with = "text")]
    pub subtotal: Option<String>,
    #[serde(deserialize_with = "optional_object", skip_serializing_if = "Option::is_none")]
    pub first_party_driver: Option<PartyDriver>,
    #[serde(deserialize_with = "optional_object", skip_serializing_if = "Option::is_none")]
    pub third_party_driver: Option<PartyDriver>,
    #[serde(alias = "items", deserialize_with = "list")]
    pub loss_items: Vec<LossItem>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct PartyDriver {
    #[serde(deserialize_with = "text")]
    pub name: Option<String>,
    #[serde(deserialize_with = "text")]
    pub license: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct LossItem {
    #[serde(deserialize_with = "text")]
    pub description: Option<String>,
    #[serde(deserialize_with = "text")]
    pub amount: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct PreviousInquiry {
    #[serde(deserialize_with = "text")]
    pub date: Option<String>,
    #[serde(deserialize_with = "text")]
    pub who: Option<String>,
}

/// Trimmed text, or `None` when absent or blank.
pub fn present(field: &Option<String>) -> Option<&str> {
    field.as_deref().map(str::trim).filter(|s| !s.is_empty())
}

// ---------------------------------------------------------------------------
// Lenient decoders
// ---------------------------------------------------------------------------

fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

fn text<'de, D: Deserializer<'de>>(d: D) -> Result<Option<String>, D::Error> {
    let value = Option::<Value>::deserialize(d)?;
    Ok(value.as_ref().and_then(scalar_text))
}

fn count<'de, D: Deserializer<'de>>(d: D) -> Result<Option<u32>, D::Error> {
    let value = Option::<Value>::deserialize(d)?;
    Ok(match value {
        Some(Value::Number(n)) => n.as_u64().and_then(|v| u32::try_from(v).ok()),
        Some(Value::String(s)) => s.trim().parse().ok(),
        _ => None,
    })
}

fn flag<'de, D: Deserializer<'de>>(d: D) -> Result<Option<bool>, D::Error> {
    let value = Option::<Value>::deserialize(d)?;
    Ok(match value {
        Some(Value::Bool(b)) => Some(b),
        Some(Value::Number(n)) => n.as_f64().map(|v| v != 0.0),
        Some(Value::String(s)) => match s.trim().to_ascii_lowercase().as_str() {
            "true" | "yes" | "y" | "1" => Some(true),
            "false" | "no" | "n" | "0" => Some(false),
            _ => None,
        },
        _ => None,
    })
}

fn list<'de, D, T>(d: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = Option::<Value>::deserialize(d)?;
    Ok(match value {
        Some(Value::Array(items)) => items
            .into_iter()
            .filter_map(|item| serde_json::from_value(item).ok())
            .collect(),
        _ => Vec::new(),
    })
}

fn object<'de, D, T>(d: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned + Default,
{
    Ok(optional_object(d)?.unwrap_or_default())
}

fn optional_object<'de, D, T>(d: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = Option::<Value>::deserialize(d)?;
    Ok(match value {
        Some(v @ Value::Object(_)) => serde_json::from_value(v).ok(),
        _ => None,
    })
}
