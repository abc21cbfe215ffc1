use std::{collections::HashMap, net::IpAddr, sync::Arc};

use animatix_ratelimit_contracts::RateLimitStore;
use chrono::{DateTime, Utc};
use tokio::sync::Mutex;

/// Process-local ledger storage.
///
/// Entries live for the lifetime of the process; a distributed store can be
/// swapped in behind the same trait if the service is ever scaled across
/// processes.
#[derive(Debug, Clone, Default)]
pub struct MemoryRateLimitStore {
    entries: Arc<Mutex<HashMap<IpAddr, Vec<DateTime<Utc>>>>>,
}

impl RateLimitStore for MemoryRateLimitStore {
    async fn take(&self, client: IpAddr) -> anyhow::Result<Vec<DateTime<Utc>>> {
        Ok(self
            .entries
            .lock()
            .await
            .remove(&client)
            .unwrap_or_default())
    }

    async fn put(&self, client: IpAddr, timestamps: Vec<DateTime<Utc>>) -> anyhow::Result<()> {
        let mut entries = self.entries.lock().await;
        if timestamps.is_empty() {
            entries.remove(&client);
        } else {
            entries.insert(client, timestamps);
        }
        Ok(())
    }
}
