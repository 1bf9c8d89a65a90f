use splitledger_application::{LedgerConfig, ResidualPolicy};
use splitledger_domain::PairwiseAccounting;
use std::{borrow::Cow, env};

pub const PAIRWISE_ACCOUNTING_VAR: &str = "SPLITLEDGER_PAIRWISE_ACCOUNTING";
pub const RESIDUAL_POLICY_VAR: &str = "SPLITLEDGER_RESIDUAL_POLICY";

/// Ledger settings read from the environment (and `.env`, when present).
#[derive(Debug, Default, PartialEq, Eq)]
pub struct AppConfig {
    pub ledger: LedgerConfig,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, Cow<'static, str>> {
        let _ = dotenvy::dotenv();
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, Cow<'static, str>>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut ledger = LedgerConfig::default();

        if let Some(value) = lookup(PAIRWISE_ACCOUNTING_VAR) {
            ledger.pairwise_accounting = parse_pairwise_accounting(&value)?;
        }
        if let Some(value) = lookup(RESIDUAL_POLICY_VAR) {
            ledger.residual_policy = parse_residual_policy(&value)?;
        }

        Ok(Self { ledger })
    }
}

fn parse_pairwise_accounting(value: &str) -> Result<PairwiseAccounting, Cow<'static, str>> {
    match value.trim() {
        "cross_product" => Ok(PairwiseAccounting::CrossProduct),
        "proportional" => Ok(PairwiseAccounting::Proportional),
        other => Err(format!(
            "{PAIRWISE_ACCOUNTING_VAR} must be `cross_product` or `proportional`, got `{other}`"
        )
        .into()),
    }
}

fn parse_residual_policy(value: &str) -> Result<ResidualPolicy, Cow<'static, str>> {
    match value.trim() {
        "reject" => Ok(ResidualPolicy::Reject),
        "include_former_members" => Ok(ResidualPolicy::IncludeFormerMembers),
        other => Err(format!(
            "{RESIDUAL_POLICY_VAR} must be `reject` or `include_former_members`, got `{other}`"
        )
        .into()),
    }
}

/// Installs the global subscriber; `RUST_LOG` picks the level (default `warn`).
pub fn init_logging() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
