// Source address endpoints
//
// `GET /api/siem/source_addresses` with fields/filter. Attributes use plain
// types; keys left out by a `fields` selection decode as zero or empty.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::client::QRadarClient;
use crate::error::Error;
use crate::request::RequestSpec;
use crate::transport::Transport;

pub(crate) const SOURCE_ADDRESSES_PATH: &str = "api/siem/source_addresses";

/// An IP address seen as the source of one or more offenses.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SourceAddress {
    pub id: i64,
    pub source_ip: String,
    pub network: String,
    pub domain_id: i64,
    pub magnitude: i64,
    pub event_flow_count: i64,
    /// Epoch milliseconds.
    pub first_event_flow_seen: i64,
    /// Epoch milliseconds.
    pub last_event_flow_seen: i64,
    pub offense_ids: Vec<i64>,
    pub local_destination_address_ids: Vec<i64>,
}

impl<T: Transport> QRadarClient<T> {
    /// List source addresses.
    ///
    /// `GET /api/siem/source_addresses?fields=..&filter=..`
    pub async fn list_source_addresses(
        &self,
        fields: &str,
        filter: &str,
    ) -> Result<Vec<SourceAddress>, Error> {
        debug!(filter, "listing source addresses");
        self.send(
            RequestSpec::new(SOURCE_ADDRESSES_PATH)
                .fields(fields)
                .filter(filter),
        )
        .await
    }
}
