use anyhow::Context;
use serde::Deserialize;

/// Fee charged for a job posting: 0.01 SOL.
pub const DEFAULT_FEE_LAMPORTS: u64 = 10_000_000;

#[derive(Debug, Clone, Deserialize)]
pub struct JwtConfig {
    pub secret: String,
    pub issuer: String,
    pub audience: String,
}

/// Server-side verification of posting fees. Without `rpc_url` the
/// client-reported payment status is recorded as-is.
#[derive(Debug, Clone, Deserialize)]
pub struct PaymentConfig {
    pub rpc_url: Option<String>,
    pub treasury_address: Option<String>,
    pub fee_lamports: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub database_url: Option<String>,
    pub max_connections: u32,
    pub jwt: JwtConfig,
    pub payment: PaymentConfig,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let database_url = non_empty("DATABASE_URL");
        let max_connections = parse_or(&non_empty, "DATABASE_MAX_CONNECTIONS", 10u32)?;

        let jwt = JwtConfig {
            secret: non_empty("JWT_SECRET").context("JWT_SECRET must be set")?,
            issuer: non_empty("JWT_ISSUER").unwrap_or_else(|| "jobboard".into()),
            audience: non_empty("JWT_AUDIENCE").unwrap_or_else(|| "jobboard-users".into()),
        };

        let payment = PaymentConfig {
            rpc_url: non_empty("PAYMENT_RPC_URL"),
            treasury_address: non_empty("PAYMENT_TREASURY_ADDRESS"),
            fee_lamports: parse_or(&non_empty, "PAYMENT_FEE_LAMPORTS", DEFAULT_FEE_LAMPORTS)?,
        };
        if payment.rpc_url.is_some() && payment.treasury_address.is_none() {
            anyhow::bail!("PAYMENT_TREASURY_ADDRESS is required when PAYMENT_RPC_URL is set");
        }

        Ok(Self {
            database_url,
            max_connections,
            jwt,
            payment,
        })
    }
}

fn parse_or<T, F>(lookup: &F, key: &str, default: T) -> anyhow::Result<T>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
    F: Fn(&str) -> Option<String>,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse::<T>()
            .with_context(|| format!("{key} has an invalid value: {raw}")),
        None => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_apply_when_only_secret_is_set() {
        let cfg = AppConfig::from_lookup(lookup(&[("JWT_SECRET", "s3cret")])).expect("config");
        assert!(cfg.database_url.is_none());
        assert_eq!(cfg.max_connections, 10);
        assert_eq!(cfg.jwt.issuer, "jobboard");
        assert_eq!(cfg.jwt.audience, "jobboard-users");
        assert!(cfg.payment.rpc_url.is_none());
        assert_eq!(cfg.payment.fee_lamports, DEFAULT_FEE_LAMPORTS);
    }

    #[test]
    fn missing_secret_is_an_error() {
        let err = AppConfig::from_lookup(lookup(&[])).unwrap_err();
        assert!(err.to_string().contains("JWT_SECRET"));
    }

    #[test]
    fn rpc_without_treasury_is_rejected() {
        let err = AppConfig::from_lookup(lookup(&[
            ("JWT_SECRET", "s"),
            ("PAYMENT_RPC_URL", "https://api.devnet.solana.com"),
        ]))
        .unwrap_err();
        assert!(err.to_string().contains("PAYMENT_TREASURY_ADDRESS"));
    }

    #[test]
    fn invalid_numbers_are_not_silently_defaulted() {
        let err = AppConfig::from_lookup(lookup(&[
            ("JWT_SECRET", "s"),
            ("PAYMENT_FEE_LAMPORTS", "a lot"),
        ]))
        .unwrap_err();
        assert!(err.to_string().contains("PAYMENT_FEE_LAMPORTS"));
    }

    #[test]
    fn blank_database_url_means_memory_store() {
        let cfg = AppConfig::from_lookup(lookup(&[("JWT_SECRET", "s"), ("DATABASE_URL", "  ")]))
            .expect("config");
        assert!(cfg.database_url.is_none());
    }
}
