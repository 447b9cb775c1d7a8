// qradar-api: Async Rust client for the QRadar SIEM offense API

pub mod client;
pub mod error;
pub mod field;
pub mod offenses;
pub mod request;
pub mod source_addresses;
pub mod transport;

pub use client::QRadarClient;
pub use error::Error;
pub use field::Field;
pub use offenses::{Offense, OffenseLogSource, OffenseQuery, OffenseRule, OffenseStatus, OffenseUpdate};
pub use request::{ApiRequest, ItemRange, RequestSpec, build_request};
pub use source_addresses::SourceAddress;
pub use transport::{ClientConfig, HttpTransport, TlsMode, Transport, TransportConfig};
