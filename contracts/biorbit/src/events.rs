//! Event topics and payload structs emitted by the registry.
//!
//! Every state-changing entry point publishes one event with topics
//! `(<tag symbol>, <subject id>)` and a `contracttype` payload struct.
//! Observers (the off-chain indexer among them) must match this schema
//! exactly.

use soroban_sdk::{contracttype, symbol_short, Address, String, Symbol};

// Topic tag for area registrations.
pub const AREA_REGISTERED: Symbol = symbol_short!("area_reg");

// Topic tag for follow-up donations.
pub const AREA_FUNDED: Symbol = symbol_short!("funded");

// Topic tag for monitoring updates.
pub const MONITORING_RECORDED: Symbol = symbol_short!("monitored");

// Topic tag for image mints.
pub const IMAGE_MINTED: Symbol = symbol_short!("minted");

// Topic tag for escrow listings.
pub const IMAGE_LISTED: Symbol = symbol_short!("listed");

// Topic tag for completed purchases.
pub const IMAGE_SOLD: Symbol = symbol_short!("sold");

// Topic tags for parameter updates.
pub const DONATION_UPDATED: Symbol = symbol_short!("don_set");
pub const PRICE_UPDATED: Symbol = symbol_short!("price_set");

// Topic tag for balance withdrawals.
pub const WITHDRAWN: Symbol = symbol_short!("withdrawn");

/// Emitted once per successful registration, carrying the six-field
/// record shape observers are coded against.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct AreaRegistered {
    pub area_id: u64,
    pub name: String,
    pub donor: Address,
    pub amount: i128,
    pub country: String,
    pub geo_json: String,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct AreaFunded {
    pub area_id: u64,
    pub donor: Address,
    pub amount: i128,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct MonitoringRecorded {
    pub area_id: u64,
    pub name: String,
    pub last_detection_date: String,
    pub total_extension: String,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ImageMinted {
    pub image_id: u64,
    pub area_id: u64,
    pub minter: Address,
    pub uri: String,
    pub price: i128,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ImageListed {
    pub image_id: u64,
    pub seller: Address,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ImageSold {
    pub image_id: u64,
    pub buyer: Address,
    pub seller: Address,
    pub price: i128,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct DonationUpdated {
    pub previous: i128,
    pub current: i128,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct PriceUpdated {
    pub previous: i128,
    pub current: i128,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Withdrawn {
    pub admin: Address,
    pub amount: i128,
}
