use serde::{Deserialize, Serialize};

/// Outcome of resolving one FIPE code. A lookup either produced a payload or
/// a captured failure; there is no third state and no panic path.
#[derive(Debug, Clone, PartialEq)]
pub enum LookupOutcome {
    Success { data: serde_json::Value },
    Failure { status: u16, error: String },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(into = "LookupResultWire", try_from = "LookupResultWire")]
pub struct LookupResult {
    pub code: String,
    pub outcome: LookupOutcome,
}

impl LookupResult {
    pub fn success(code: impl Into<String>, data: serde_json::Value) -> Self {
        Self {
            code: code.into(),
            outcome: LookupOutcome::Success { data },
        }
    }

    pub fn failure(code: impl Into<String>, status: u16, error: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            outcome: LookupOutcome::Failure {
                status,
                error: error.into(),
            },
        }
    }

    pub fn is_ok(&self) -> bool {
        matches!(self.outcome, LookupOutcome::Success { .. })
    }

    pub fn data(&self) -> Option<&serde_json::Value> {
        match &self.outcome {
            LookupOutcome::Success { data } => Some(data),
            LookupOutcome::Failure { .. } => None,
        }
    }
}

/// Wire shape shared with the original HTTP contract: `{code, ok, data}` on
/// success, `{code, ok, status, error}` on failure.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct LookupResultWire {
    code: String,
    ok: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    status: Option<u16>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    error: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    data: Option<serde_json::Value>,
}

impl From<LookupResult> for LookupResultWire {
    fn from(result: LookupResult) -> Self {
        match result.outcome {
            LookupOutcome::Success { data } => Self {
                code: result.code,
                ok: true,
                status: None,
                error: None,
                data: Some(data),
            },
            LookupOutcome::Failure { status, error } => Self {
                code: result.code,
                ok: false,
                status: Some(status),
                error: Some(error),
                data: None,
            },
        }
    }
}

impl TryFrom<LookupResultWire> for LookupResult {
    type Error = String;

    fn try_from(wire: LookupResultWire) -> std::result::Result<Self, Self::Error> {
        if wire.ok {
            let data = wire
                .data
                .ok_or_else(|| format!("result for {} is ok but has no data", wire.code))?;
            Ok(LookupResult::success(wire.code, data))
        } else {
            let error = wire
                .error
                .ok_or_else(|| format!("result for {} failed but has no error", wire.code))?;
            Ok(LookupResult::failure(
                wire.code,
                wire.status.unwrap_or(0),
                error,
            ))
        }
    }
}

/// Body of `POST /api/fipe`. Both fields are optional; the merged set must
/// yield at least one valid code.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BatchRequest {
    #[serde(default)]
    pub codes: Option<Vec<String>>,
    #[serde(default)]
    pub text: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchResponse {
    pub count: usize,
    pub results: Vec<LookupResult>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub ok: bool,
    #[serde(rename = "apiBase")]
    pub api_base: String,
    pub timestamp: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

/// One upstream price record, every field optional. The upstream payload is
/// not under our control; anything absent renders as empty downstream.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VehicleRecord {
    #[serde(default, deserialize_with = "scalar_to_string")]
    pub marca: Option<String>,
    #[serde(default, deserialize_with = "scalar_to_string")]
    pub modelo: Option<String>,
    #[serde(
        default,
        rename = "anoModelo",
        deserialize_with = "scalar_to_string"
    )]
    pub ano_modelo: Option<String>,
    #[serde(default, deserialize_with = "scalar_to_string")]
    pub combustivel: Option<String>,
    #[serde(default, deserialize_with = "scalar_to_string")]
    pub valor: Option<String>,
    #[serde(
        default,
        rename = "mesReferencia",
        deserialize_with = "scalar_to_string"
    )]
    pub mes_referencia: Option<String>,
}

impl VehicleRecord {
    /// Extract the main record from a lookup payload: a sequence yields its
    /// first element, a singular record is used directly. Anything that does
    /// not look like a record yields the empty default.
    pub fn from_payload(data: &serde_json::Value) -> Self {
        let main = match data {
            serde_json::Value::Array(items) => items.first().cloned().unwrap_or_default(),
            other => other.clone(),
        };
        serde_json::from_value(main).unwrap_or_default()
    }
}

// anoModelo arrives as a number, valor as a string; both columns are text.
fn scalar_to_string<'de, D>(deserializer: D) -> std::result::Result<Option<String>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(value.and_then(|v| match v {
        serde_json::Value::Null => None,
        serde_json::Value::String(s) => Some(s),
        other => Some(other.to_string()),
    }))
}
