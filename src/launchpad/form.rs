//! The launchpad's three-step chain configuration form

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::SnowprintError;
use crate::wizard::{FieldErrors, FormSchema, FormValues, Step, Wizard};

/// Fields of the launchpad form, named as in the launch request JSON.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum LaunchpadField {
    ChainName,
    Symbol,
    Description,
    ConsensusMechanism,
    BlockTime,
    InitialValidators,
    MaxSupply,
    SubnetThreshold,
}

impl LaunchpadField {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ChainName => "chainName",
            Self::Symbol => "symbol",
            Self::Description => "description",
            Self::ConsensusMechanism => "consensusMechanism",
            Self::BlockTime => "blockTime",
            Self::InitialValidators => "initialValidators",
            Self::MaxSupply => "maxSupply",
            Self::SubnetThreshold => "subnetThreshold",
        }
    }
}

impl fmt::Display for LaunchpadField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Consensus {
    /// Proof of stake.
    #[default]
    Pos,
    /// Proof of authority.
    Poa,
}

impl FromStr for Consensus {
    type Err = SnowprintError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pos" => Ok(Self::Pos),
            "poa" => Ok(Self::Poa),
            other => Err(SnowprintError::InvalidConfig(format!(
                "unknown consensus mechanism: {other}"
            ))),
        }
    }
}

/// Launch request produced by a completed launchpad form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LaunchpadConfig {
    pub chain_name: String,
    pub symbol: String,
    pub description: String,
    #[serde(rename = "consensusMechanism")]
    pub consensus: Consensus,
    pub initial_validators: u32,
    #[serde(rename = "blockTime")]
    pub block_time_secs: u64,
    pub max_supply: String,
    pub subnet_threshold: String,
}

const STEPS: &[Step<LaunchpadField>] = &[
    Step {
        title: "Basic Information",
        fields: &[
            LaunchpadField::ChainName,
            LaunchpadField::Symbol,
            LaunchpadField::Description,
        ],
    },
    Step {
        title: "Technical Parameters",
        fields: &[
            LaunchpadField::ConsensusMechanism,
            LaunchpadField::BlockTime,
            LaunchpadField::InitialValidators,
        ],
    },
    Step {
        title: "Economic Model",
        fields: &[LaunchpadField::MaxSupply, LaunchpadField::SubnetThreshold],
    },
];

/// Rules and defaults of the launchpad form.
#[derive(Debug, Clone, Copy, Default)]
pub struct LaunchpadSchema;

/// The launchpad wizard.
pub type LaunchpadWizard = Wizard<LaunchpadSchema>;

impl LaunchpadWizard {
    pub fn launchpad() -> Self {
        Wizard::new(LaunchpadSchema)
    }
}

fn is_valid_symbol(symbol: &str) -> bool {
    (2..=10).contains(&symbol.len())
        && symbol
            .chars()
            .all(|c| c.is_ascii_uppercase() || c.is_ascii_digit())
}

fn is_numeric(value: &str) -> bool {
    let value = value.trim();
    !value.is_empty() && value.parse::<f64>().is_ok_and(f64::is_finite)
}

fn at_least_one<T: FromStr + PartialOrd + From<u8>>(value: &str) -> Option<T> {
    value.trim().parse::<T>().ok().filter(|n| *n >= T::from(1))
}

impl FormSchema for LaunchpadSchema {
    type Field = LaunchpadField;
    type Output = LaunchpadConfig;

    fn steps(&self) -> &'static [Step<LaunchpadField>] {
        STEPS
    }

    fn default_value(&self, field: LaunchpadField) -> &'static str {
        match field {
            LaunchpadField::ConsensusMechanism => "pos",
            LaunchpadField::InitialValidators => "4",
            LaunchpadField::BlockTime => "2",
            _ => "",
        }
    }

    fn validate_field(
        &self,
        field: LaunchpadField,
        values: &FormValues<LaunchpadField>,
    ) -> Option<String> {
        let value = values.get(field);
        let message = match field {
            LaunchpadField::ChainName if value.is_empty() => "Chain name is required",
            LaunchpadField::ChainName if value.chars().count() < 3 => {
                "Chain name must be at least 3 characters"
            }
            LaunchpadField::Symbol if value.is_empty() => "Symbol is required",
            LaunchpadField::Symbol if !is_valid_symbol(value) => {
                "Symbol must be 2-10 uppercase letters or numbers"
            }
            LaunchpadField::ConsensusMechanism if value.parse::<Consensus>().is_err() => {
                "Consensus mechanism must be pos or poa"
            }
            LaunchpadField::InitialValidators if at_least_one::<u32>(value).is_none() => {
                "Must have at least 1 validator"
            }
            LaunchpadField::BlockTime if at_least_one::<u64>(value).is_none() => {
                "Block time must be at least 1 second"
            }
            LaunchpadField::MaxSupply if !is_numeric(value) => "Valid max supply is required",
            LaunchpadField::SubnetThreshold if !is_numeric(value) => {
                "Valid subnet threshold is required"
            }
            _ => return None,
        };
        Some(message.to_string())
    }

    fn finalize(
        &self,
        values: &FormValues<LaunchpadField>,
    ) -> Result<LaunchpadConfig, FieldErrors<LaunchpadField>> {
        let invalid = |field: LaunchpadField| {
            let message = self
                .validate_field(field, values)
                .unwrap_or_else(|| format!("Invalid {field}"));
            FieldErrors::from([(field, message)])
        };

        let config = LaunchpadConfig {
            chain_name: values.get(LaunchpadField::ChainName).to_string(),
            symbol: values.get(LaunchpadField::Symbol).to_string(),
            description: values.get(LaunchpadField::Description).to_string(),
            consensus: values
                .get(LaunchpadField::ConsensusMechanism)
                .parse()
                .map_err(|_| invalid(LaunchpadField::ConsensusMechanism))?,
            initial_validators: at_least_one(values.get(LaunchpadField::InitialValidators))
                .ok_or_else(|| invalid(LaunchpadField::InitialValidators))?,
            block_time_secs: at_least_one(values.get(LaunchpadField::BlockTime))
                .ok_or_else(|| invalid(LaunchpadField::BlockTime))?,
            max_supply: values.get(LaunchpadField::MaxSupply).trim().to_string(),
            subnet_threshold: values.get(LaunchpadField::SubnetThreshold).trim().to_string(),
        };

        info!(
            chain_name = %config.chain_name,
            symbol = %config.symbol,
            consensus = ?config.consensus,
            initial_validators = config.initial_validators,
            event = "launch_request_created"
        );
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::wizard::Advance;
    use rstest::rstest;

    fn check(field: LaunchpadField, value: &str) -> Option<String> {
        let mut values = FormValues::new();
        values.set(field, value);
        LaunchpadSchema.validate_field(field, &values)
    }

    #[rstest]
    #[case("AVAX", true)]
    #[case("A1", true)]
    #[case("ABCDEFGHIJ", true)]
    #[case("A", false)]
    #[case("ABCDEFGHIJK", false)]
    #[case("ab!", false)]
    #[case("avax", false)]
    #[case("ÄB", false)]
    fn test_symbol_rule(#[case] symbol: &str, #[case] valid: bool) {
        assert_eq!(check(LaunchpadField::Symbol, symbol).is_none(), valid);
    }

    #[rstest]
    #[case(LaunchpadField::InitialValidators, "0", false)]
    #[case(LaunchpadField::InitialValidators, "1", true)]
    #[case(LaunchpadField::InitialValidators, "-3", false)]
    #[case(LaunchpadField::BlockTime, "0", false)]
    #[case(LaunchpadField::BlockTime, "2", true)]
    #[case(LaunchpadField::MaxSupply, "", false)]
    #[case(LaunchpadField::MaxSupply, "1e9", true)]
    #[case(LaunchpadField::MaxSupply, "lots", false)]
    #[case(LaunchpadField::SubnetThreshold, "NaN", false)]
    #[case(LaunchpadField::SubnetThreshold, "0.67", true)]
    #[case(LaunchpadField::ConsensusMechanism, "pow", false)]
    #[case(LaunchpadField::ConsensusMechanism, "poa", true)]
    fn test_field_rules(#[case] field: LaunchpadField, #[case] value: &str, #[case] valid: bool) {
        assert_eq!(check(field, value).is_none(), valid);
    }

    #[test]
    fn test_chain_name_messages() {
        insta::assert_snapshot!(
            check(LaunchpadField::ChainName, "").unwrap(),
            @"Chain name is required"
        );
        insta::assert_snapshot!(
            check(LaunchpadField::ChainName, "ab").unwrap(),
            @"Chain name must be at least 3 characters"
        );
    }

    #[test]
    fn test_launch_request_json() {
        let mut wizard = LaunchpadWizard::launchpad();
        wizard.update_field(LaunchpadField::ChainName, "Snowfall");
        wizard.update_field(LaunchpadField::Symbol, "SNOW");
        wizard.advance().unwrap();
        wizard.advance().unwrap();
        wizard.update_field(LaunchpadField::MaxSupply, "1000000");
        wizard.update_field(LaunchpadField::SubnetThreshold, "0.67");

        let Ok(Advance::Finalized(config)) = wizard.advance() else {
            panic!("expected finalized launch request");
        };
        let json = serde_json::to_value(&config).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "chainName": "Snowfall",
                "symbol": "SNOW",
                "description": "",
                "consensusMechanism": "pos",
                "initialValidators": 4,
                "blockTime": 2,
                "maxSupply": "1000000",
                "subnetThreshold": "0.67"
            })
        );
    }
}
