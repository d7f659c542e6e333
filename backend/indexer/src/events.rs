//! Canonical event types emitted by the Biorbit registry contract.
//!
//! These mirror the Soroban contract events defined in
//! `contracts/biorbit/src/events.rs` (plus the role events emitted by its
//! `rbac` module and the token-transfer events of its `nft` module).

use serde::{Deserialize, Serialize};

/// Which id space an event's leading subject topic belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Subject {
    Area,
    Image,
    None,
}

/// All recognised event kinds from the Biorbit contract.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventKind {
    /// A new protected area was registered (`area_reg` topic).
    AreaRegistered,
    /// A follow-up donation was made to an area (`funded` topic).
    AreaFunded,
    /// Monitoring data was recorded for an area (`monitored` topic).
    MonitoringRecorded,
    /// A satellite image was minted (`minted` topic).
    ImageMinted,
    /// An image was escrowed for sale (`listed` topic).
    ImageListed,
    /// An image was purchased (`sold` topic).
    ImageSold,
    /// The minimum donation changed (`don_set` topic).
    DonationUpdated,
    /// The mint price changed (`price_set` topic).
    PriceUpdated,
    /// The contract balance was withdrawn (`withdrawn` topic).
    Withdrawn,
    /// The operational role was granted (`role_set` topic).
    RoleSet,
    /// The operational role was revoked (`role_del` topic).
    RoleDel,
    /// The default-admin position moved (`admin_xfr` topic).
    AdminTransferred,
    /// A token changed custody (`transfer` topic).
    TokenTransfer,
    /// An event from this contract that we don't recognise yet.
    Unknown,
}

impl EventKind {
    /// Parse the leading topic symbol string produced by Soroban into an
    /// [`EventKind`].
    pub fn from_topic(topic: &str) -> Self {
        match topic {
            "area_reg" => Self::AreaRegistered,
            "funded" => Self::AreaFunded,
            "monitored" => Self::MonitoringRecorded,
            "minted" => Self::ImageMinted,
            "listed" => Self::ImageListed,
            "sold" => Self::ImageSold,
            "don_set" => Self::DonationUpdated,
            "price_set" => Self::PriceUpdated,
            "withdrawn" => Self::Withdrawn,
            "role_set" => Self::RoleSet,
            "role_del" => Self::RoleDel,
            "admin_xfr" => Self::AdminTransferred,
            "transfer" => Self::TokenTransfer,
            _ => Self::Unknown,
        }
    }

    /// Return a short identifier string suitable for storage in the
    /// database.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::AreaRegistered => "area_registered",
            Self::AreaFunded => "area_funded",
            Self::MonitoringRecorded => "monitoring_recorded",
            Self::ImageMinted => "image_minted",
            Self::ImageListed => "image_listed",
            Self::ImageSold => "image_sold",
            Self::DonationUpdated => "donation_updated",
            Self::PriceUpdated => "price_updated",
            Self::Withdrawn => "withdrawn",
            Self::RoleSet => "role_set",
            Self::RoleDel => "role_del",
            Self::AdminTransferred => "admin_transferred",
            Self::TokenTransfer => "token_transfer",
            Self::Unknown => "unknown",
        }
    }

    /// Which id column the second topic entry feeds, if any.
    pub fn subject(&self) -> Subject {
        match self {
            Self::AreaRegistered | Self::AreaFunded | Self::MonitoringRecorded => Subject::Area,
            Self::ImageMinted | Self::ImageListed | Self::ImageSold => Subject::Image,
            _ => Subject::None,
        }
    }
}

/// A fully decoded Biorbit event, ready to be stored in the database.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BiorbitEvent {
    pub event_type: String,
    pub area_id: Option<String>,
    pub image_id: Option<String>,
    pub actor: Option<String>,
    pub amount: Option<String>,
    pub ledger: i64,
    pub timestamp: i64,
    pub contract_id: String,
    pub tx_hash: Option<String>,
}

/// A raw event record as stored in / read from the database.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct EventRecord {
    pub id: i64,
    pub event_type: String,
    pub area_id: Option<String>,
    pub image_id: Option<String>,
    pub actor: Option<String>,
    pub amount: Option<String>,
    pub ledger: i64,
    pub timestamp: i64,
    pub contract_id: String,
    pub tx_hash: Option<String>,
    pub created_at: i64,
}
