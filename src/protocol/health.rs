use serde::{Deserialize, Serialize};

use crate::error::{Result, SnowprintError};
use crate::traits::HealthApi;

/// One validator as listed by the stats API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidatorHealth {
    pub name: String,
    pub status: String,
}

/// Etherscan-style envelope returned by the Snowtrace stats API.
///
/// `status` is `"1"` on success. On failure `result` usually carries the
/// reason as a string.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct StatsResponse {
    pub status: String,
    pub message: String,
    pub result: serde_json::Value,
}

impl StatsResponse {
    /// The `result` payload, or [`SnowprintError::Api`] for a failed call.
    pub fn into_result(self) -> Result<serde_json::Value> {
        if self.status == "1" {
            return Ok(self.result);
        }
        let reason = match self.result {
            serde_json::Value::String(reason) if !reason.is_empty() => reason,
            _ => self.message,
        };
        Err(SnowprintError::Api(reason))
    }
}

/// Reads a latency figure served either as a JSON number or a numeric string.
pub(crate) fn latency_millis(value: &serde_json::Value) -> Result<f64> {
    let parsed = match value {
        serde_json::Value::Number(n) => n.as_f64(),
        serde_json::Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    parsed
        .filter(|ms| ms.is_finite() && *ms >= 0.0)
        .ok_or_else(|| SnowprintError::Api(format!("unexpected latency value: {value}")))
}

/// Validator list and network latency, fetched together.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EcosystemHealth {
    pub validators: Vec<ValidatorHealth>,
    pub latency_ms: f64,
}

impl EcosystemHealth {
    /// Fetches validators, then latency. Either failure fails the whole read.
    pub async fn fetch<A: HealthApi + ?Sized>(api: &A) -> Result<Self> {
        let validators = api.validators().await?;
        let latency_ms = api.latency_ms().await?;
        Ok(Self {
            validators,
            latency_ms,
        })
    }

    pub fn active_validators(&self) -> usize {
        self.validators
            .iter()
            .filter(|v| v.status.eq_ignore_ascii_case("active"))
            .count()
    }
}
