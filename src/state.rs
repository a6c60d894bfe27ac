use std::sync::Arc;

use tracing::{info, warn};

use crate::auth::JwtKeys;
use crate::config::AppConfig;
use crate::db::PgStore;
use crate::payments::{ClientAttested, PaymentVerifier, SolanaRpcVerifier};
use crate::store::{MemoryStore, Store};

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn Store>,
    pub config: Arc<AppConfig>,
    pub jwt: JwtKeys,
    pub payments: Arc<dyn PaymentVerifier>,
}

impl AppState {
    pub async fn init() -> anyhow::Result<Self> {
        let config = Arc::new(AppConfig::from_env()?);

        let store: Arc<dyn Store> = match &config.database_url {
            Some(url) => {
                let pg = PgStore::connect(url, config.max_connections).await?;
                pg.migrate().await?;
                info!(max_connections = config.max_connections, "postgres store ready");
                Arc::new(pg)
            }
            None => {
                warn!("DATABASE_URL not set; using in-memory store, data is lost on restart");
                Arc::new(MemoryStore::new())
            }
        };

        let payments: Arc<dyn PaymentVerifier> = match SolanaRpcVerifier::from_config(&config.payment) {
            Some(verifier) => {
                info!(fee_lamports = config.payment.fee_lamports, "verifying posting fees on chain");
                Arc::new(verifier)
            }
            None => {
                warn!("PAYMENT_RPC_URL not set; recording client-reported payment status unverified");
                Arc::new(ClientAttested)
            }
        };

        Ok(Self::from_parts(store, config, payments))
    }

    pub fn from_parts(
        store: Arc<dyn Store>,
        config: Arc<AppConfig>,
        payments: Arc<dyn PaymentVerifier>,
    ) -> Self {
        let jwt = JwtKeys::from_config(&config.jwt);
        Self {
            store,
            config,
            jwt,
            payments,
        }
    }
}
