// Offense endpoints
//
// `GET  /api/siem/offenses`        list, with fields/filter/range
// `GET  /api/siem/offenses/{id}`   single offense
// `POST /api/siem/offenses/{id}`   partial update, returns the new state
//
// Every Offense attribute is a `Field<T>`: the console only returns what
// `fields` asked for, and uses `null` for attributes without a value.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};
use tracing::debug;

use crate::client::QRadarClient;
use crate::error::Error;
use crate::field::Field;
use crate::request::{ItemRange, RequestSpec};
use crate::transport::Transport;

pub(crate) const OFFENSES_PATH: &str = "api/siem/offenses";

// ── Models ───────────────────────────────────────────────────────────

/// An offense: one detected security incident.
///
/// Times are epoch milliseconds.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Offense {
    // Identity
    #[serde(skip_serializing_if = "Field::is_missing")]
    pub id: Field<i64>,
    #[serde(skip_serializing_if = "Field::is_missing")]
    pub domain_id: Field<i64>,
    #[serde(skip_serializing_if = "Field::is_missing")]
    pub description: Field<String>,

    // Counters
    #[serde(skip_serializing_if = "Field::is_missing")]
    pub event_count: Field<i64>,
    #[serde(skip_serializing_if = "Field::is_missing")]
    pub flow_count: Field<i64>,
    #[serde(skip_serializing_if = "Field::is_missing")]
    pub source_count: Field<i64>,
    #[serde(skip_serializing_if = "Field::is_missing")]
    pub category_count: Field<i64>,
    #[serde(skip_serializing_if = "Field::is_missing")]
    pub device_count: Field<i64>,
    #[serde(skip_serializing_if = "Field::is_missing")]
    pub security_category_count: Field<i64>,
    #[serde(skip_serializing_if = "Field::is_missing")]
    pub policy_category_count: Field<i64>,
    #[serde(skip_serializing_if = "Field::is_missing")]
    pub remote_destination_count: Field<i64>,
    #[serde(skip_serializing_if = "Field::is_missing")]
    pub local_destination_count: Field<i64>,
    #[serde(skip_serializing_if = "Field::is_missing")]
    pub username_count: Field<i64>,

    // Classification
    #[serde(skip_serializing_if = "Field::is_missing")]
    pub severity: Field<i64>,
    #[serde(skip_serializing_if = "Field::is_missing")]
    pub credibility: Field<i64>,
    #[serde(skip_serializing_if = "Field::is_missing")]
    pub magnitude: Field<i64>,
    #[serde(skip_serializing_if = "Field::is_missing")]
    pub relevance: Field<i64>,
    #[serde(skip_serializing_if = "Field::is_missing")]
    pub offense_type: Field<i64>,
    #[serde(skip_serializing_if = "Field::is_missing")]
    pub offense_source: Field<String>,
    /// `OPEN`, `HIDDEN` or `CLOSED`. Kept as a string so unknown values
    /// from newer consoles still decode.
    #[serde(skip_serializing_if = "Field::is_missing")]
    pub status: Field<String>,
    #[serde(skip_serializing_if = "Field::is_missing")]
    pub categories: Field<Vec<String>>,

    // Timing
    #[serde(skip_serializing_if = "Field::is_missing")]
    pub start_time: Field<i64>,
    #[serde(skip_serializing_if = "Field::is_missing")]
    pub last_updated_time: Field<i64>,
    #[serde(skip_serializing_if = "Field::is_missing")]
    pub close_time: Field<i64>,

    // Workflow
    #[serde(skip_serializing_if = "Field::is_missing")]
    pub assigned_to: Field<String>,
    #[serde(skip_serializing_if = "Field::is_missing")]
    pub closing_user: Field<String>,
    #[serde(skip_serializing_if = "Field::is_missing")]
    pub closing_reason_id: Field<i64>,
    #[serde(skip_serializing_if = "Field::is_missing")]
    pub follow_up: Field<bool>,
    #[serde(skip_serializing_if = "Field::is_missing")]
    pub protected: Field<bool>,
    #[serde(skip_serializing_if = "Field::is_missing")]
    pub inactive: Field<bool>,

    // Network context
    #[serde(skip_serializing_if = "Field::is_missing")]
    pub source_network: Field<String>,
    #[serde(skip_serializing_if = "Field::is_missing")]
    pub destination_networks: Field<Vec<String>>,
    #[serde(skip_serializing_if = "Field::is_missing")]
    pub source_address_ids: Field<Vec<i64>>,
    #[serde(skip_serializing_if = "Field::is_missing")]
    pub local_destination_address_ids: Field<Vec<i64>>,

    // Nested
    #[serde(skip_serializing_if = "Field::is_missing")]
    pub rules: Field<Vec<OffenseRule>>,
    #[serde(skip_serializing_if = "Field::is_missing")]
    pub log_sources: Field<Vec<OffenseLogSource>>,
}

/// A rule that contributed to an offense.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OffenseRule {
    #[serde(skip_serializing_if = "Field::is_missing")]
    pub id: Field<i64>,
    /// `ADE_RULE`, `BUILDING_BLOCK_RULE`, `CRE_RULE`, ...
    #[serde(rename = "type", skip_serializing_if = "Field::is_missing")]
    pub rule_type: Field<String>,
}

/// A log source that contributed events to an offense.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OffenseLogSource {
    #[serde(skip_serializing_if = "Field::is_missing")]
    pub id: Field<i64>,
    #[serde(skip_serializing_if = "Field::is_missing")]
    pub type_id: Field<i64>,
    #[serde(skip_serializing_if = "Field::is_missing")]
    pub type_name: Field<String>,
    #[serde(skip_serializing_if = "Field::is_missing")]
    pub name: Field<String>,
}

/// Offense workflow state accepted by updates.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE", ascii_case_insensitive)]
pub enum OffenseStatus {
    Open,
    Hidden,
    Closed,
}

/// Partial offense update.
///
/// Only attributes that were set are sent; everything left as
/// [`Field::Missing`] keeps its current value on the console. Setting a
/// member to [`Field::Null`] sends an explicit `null`.
///
/// ```
/// use qradar_api::{OffenseStatus, OffenseUpdate};
///
/// let update = OffenseUpdate::new()
///     .status(OffenseStatus::Closed)
///     .closing_reason_id(2);
/// assert_eq!(
///     serde_json::to_value(&update).unwrap(),
///     serde_json::json!({ "status": "CLOSED", "closing_reason_id": 2 }),
/// );
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OffenseUpdate {
    #[serde(skip_serializing_if = "Field::is_missing")]
    pub status: Field<OffenseStatus>,
    #[serde(skip_serializing_if = "Field::is_missing")]
    pub assigned_to: Field<String>,
    #[serde(skip_serializing_if = "Field::is_missing")]
    pub closing_reason_id: Field<i64>,
    #[serde(skip_serializing_if = "Field::is_missing")]
    pub follow_up: Field<bool>,
    #[serde(skip_serializing_if = "Field::is_missing")]
    pub protected: Field<bool>,
}

impl OffenseUpdate {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn status(mut self, status: OffenseStatus) -> Self {
        self.status = Field::Value(status);
        self
    }

    pub fn assigned_to(mut self, user: impl Into<String>) -> Self {
        self.assigned_to = Field::Value(user.into());
        self
    }

    /// Send `assigned_to: null`, unassigning the offense.
    pub fn unassign(mut self) -> Self {
        self.assigned_to = Field::Null;
        self
    }

    pub fn closing_reason_id(mut self, id: i64) -> Self {
        self.closing_reason_id = Field::Value(id);
        self
    }

    pub fn follow_up(mut self, follow_up: bool) -> Self {
        self.follow_up = Field::Value(follow_up);
        self
    }

    pub fn protected(mut self, protected: bool) -> Self {
        self.protected = Field::Value(protected);
        self
    }

    /// `true` if nothing would be sent.
    pub fn is_empty(&self) -> bool {
        self.status.is_missing()
            && self.assigned_to.is_missing()
            && self.closing_reason_id.is_missing()
            && self.follow_up.is_missing()
            && self.protected.is_missing()
    }
}

/// Options for [`QRadarClient::list_offenses`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OffenseQuery {
    /// Field selection, e.g. `"id,status,severity"`. Empty for server defaults.
    pub fields: String,
    /// AQL-style filter, e.g. `"severity > 5"`. Empty for no filter.
    pub filter: String,
    pub range: ItemRange,
}

impl OffenseQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fields(mut self, fields: impl Into<String>) -> Self {
        self.fields = fields.into();
        self
    }

    pub fn filter(mut self, filter: impl Into<String>) -> Self {
        self.filter = filter.into();
        self
    }

    pub fn range(mut self, from: u64, to: u64) -> Self {
        self.range = ItemRange::new(from, to);
        self
    }
}

// ── Endpoints ────────────────────────────────────────────────────────

impl<T: Transport> QRadarClient<T> {
    /// List offenses.
    ///
    /// `GET /api/siem/offenses?fields=..&filter=..` with `Range: items=a-b`
    pub async fn list_offenses(&self, query: &OffenseQuery) -> Result<Vec<Offense>, Error> {
        debug!(filter = %query.filter, range = ?query.range, "listing offenses");
        let spec = RequestSpec::new(OFFENSES_PATH)
            .fields(&query.fields)
            .filter(&query.filter)
            .range(query.range);
        self.send(spec).await
    }

    /// Fetch one offense.
    ///
    /// `GET /api/siem/offenses/{id}?fields=..`
    pub async fn get_offense(&self, id: i64, fields: &str) -> Result<Offense, Error> {
        debug!(id, "fetching offense");
        self.send(RequestSpec::new(OFFENSES_PATH).id(id).fields(fields))
            .await
    }

    /// Apply a partial update and return the offense as the console now
    /// sees it.
    ///
    /// `POST /api/siem/offenses/{id}?fields=..` with the update as body
    pub async fn update_offense(
        &self,
        id: i64,
        fields: &str,
        update: &OffenseUpdate,
    ) -> Result<Offense, Error> {
        debug!(id, ?update, "updating offense");
        let spec = RequestSpec::new(OFFENSES_PATH)
            .id(id)
            .fields(fields)
            .body(update)?;
        self.send(spec).await
    }
}
