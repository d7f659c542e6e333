//! # Types
//!
//! Shared data structures used across all modules of the Biorbit registry.
//!
//! ## Design decisions
//!
//! ### Profile / Monitoring split
//!
//! A protected area is internally stored as several ledger entries:
//!
//! - [`AreaProfile`] — written once at registration; never mutated.
//! - [`MonitoringReport`] — absent until the first successful monitoring
//!   update, then written exactly once.
//! - Donor and image-id lists — append-only vectors under their own keys.
//!
//! The public API exposes the reconstructed [`ProtectedArea`] struct for
//! convenience.
//!
//! ### Image lifecycle
//!
//! A [`SatelliteImage`] follows a strict forward-only lifecycle:
//!
//! ```text
//! Minted ──► ListedForSale (escrowed to the contract) ──► Sold
//!     └───────────────────────────────────────────────────►┘
//! ```
//!
//! The escrow step is optional; a direct purchase of an unlisted image is
//! valid. `sold` flips exactly once and never reverts.

use soroban_sdk::{contracttype, Address, String, Vec};

/// Immutable descriptive record of a protected area, written once at
/// registration.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct AreaProfile {
    /// Unique identifier (auto-incremented, zero-based, never reused).
    pub id: u64,
    /// Globally unique among all registered areas.
    pub name: String,
    pub photo: String,
    pub description: String,
    pub geo_json: String,
    pub country: String,
}

/// Deforestation monitoring data for one area.
///
/// The entry does not exist before the first successful
/// `record_monitoring_data` call and is never overwritten afterwards.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct MonitoringReport {
    pub last_detection_date: String,
    pub total_extension: String,
    /// Parallel to `forest_cover_extensions`.
    pub detection_dates: Vec<String>,
    pub forest_cover_extensions: Vec<String>,
}

/// Full public view of a protected area.
///
/// Used as the public API return type; reconstructed internally from the
/// profile, monitoring, donor, and image-list storage entries. Monitoring
/// fields are empty while no report has been recorded.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ProtectedArea {
    pub id: u64,
    pub name: String,
    pub photo: String,
    pub description: String,
    pub geo_json: String,
    pub country: String,
    pub last_detection_date: String,
    pub total_extension: String,
    pub detection_dates: Vec<String>,
    pub forest_cover_extensions: Vec<String>,
    /// Every donor that ever contributed, in order. Duplicates are kept.
    pub donors: Vec<Address>,
    /// Ids of the satellite images minted for this area.
    pub image_ids: Vec<u64>,
}

/// A tokenized satellite capture tied to one protected area.
///
/// The image id doubles as the NFT token id.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct SatelliteImage {
    pub id: u64,
    /// Off-chain content pointer (e.g. an IPFS URI).
    pub uri: String,
    /// Sale price, captured from the global price at mint time.
    pub price: i128,
    pub sold: bool,
    /// Address that minted the image and receives the sale proceeds.
    pub seller: Address,
}
