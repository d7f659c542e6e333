//! # Storage
//!
//! Typed helpers over Soroban's two storage tiers used by Biorbit:
//!
//! ## Instance storage (contract-lifetime TTL)
//!
//! | Key            | Type      | Description                          |
//! |----------------|-----------|--------------------------------------|
//! | `AreaCount`    | `u64`     | Auto-increment area id counter       |
//! | `ImageCount`   | `u64`     | Auto-increment image/token id counter|
//! | `PaymentToken` | `Address` | Asset used for donations and sales   |
//! | `Donation`     | `i128`    | Minimum registration contribution    |
//! | `Price`        | `i128`    | Sale price applied at mint time      |
//!
//! Instance TTL is bumped by **7 days** whenever it falls below 1 day
//! remaining.
//!
//! ## Persistent storage (per-entry TTL)
//!
//! | Key                | Type               | Description                       |
//! |--------------------|--------------------|-----------------------------------|
//! | `Profile(id)`      | `AreaProfile`      | Immutable area record             |
//! | `Monitoring(id)`   | `MonitoringReport` | Write-once monitoring data        |
//! | `Donors(id)`       | `Vec<Address>`     | Append-only donor list            |
//! | `AreaImages(id)`   | `Vec<u64>`         | Image ids owned by the area       |
//! | `NameUsed(name)`   | `bool`             | Global name-uniqueness set        |
//! | `Image(id)`        | `SatelliteImage`   | Image record keyed by id          |
//! | `ImageArea(id)`    | `String`           | Image id → owning area name       |
//!
//! Persistent TTL is bumped by **30 days** whenever it falls below 7 days
//! remaining.
//!
//! ## Why split Profile and Monitoring?
//!
//! The profile never changes after registration while donor lists grow on
//! every contribution; keeping them under separate keys means a donation
//! rewrites a small vector instead of the whole area record, and lets the
//! write-once monitoring rule fall out of plain key existence.

use soroban_sdk::{contracttype, panic_with_error, Address, Env, String, Vec};

use crate::types::{AreaProfile, MonitoringReport, ProtectedArea, SatelliteImage};
use crate::Error;

// ── TTL Constants ────────────────────────────────────────────────────

/// Approximate ledgers per day (~5 seconds per ledger).
const DAY_IN_LEDGERS: u32 = 17_280;

/// Instance storage: bump by 7 days when below 1 day remaining.
const INSTANCE_BUMP_AMOUNT: u32 = 7 * DAY_IN_LEDGERS;
const INSTANCE_LIFETIME_THRESHOLD: u32 = DAY_IN_LEDGERS;

/// Persistent storage: bump by 30 days when below 7 days remaining.
const PERSISTENT_BUMP_AMOUNT: u32 = 30 * DAY_IN_LEDGERS;
const PERSISTENT_LIFETIME_THRESHOLD: u32 = 7 * DAY_IN_LEDGERS;

// ── Storage Keys ─────────────────────────────────────────────────────

/// All registry storage keys.
///
/// Instance-tier keys (counters and global parameters) live as long as
/// the contract and are extended together. Persistent-tier keys hold
/// per-area and per-image data with independent TTLs. Role and token
/// bookkeeping keys live in `rbac` and `nft` respectively.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum DataKey {
    /// Global auto-increment counter for area ids (Instance).
    AreaCount,
    /// Global auto-increment counter for image/token ids (Instance).
    ImageCount,
    /// Asset used for donations, purchases, and withdrawals (Instance).
    PaymentToken,
    /// Minimum contribution required to register an area (Instance).
    Donation,
    /// Sale price stamped onto newly minted images (Instance).
    Price,
    /// Immutable area record keyed by id (Persistent).
    Profile(u64),
    /// Write-once monitoring data keyed by area id (Persistent).
    Monitoring(u64),
    /// Append-only donor list keyed by area id (Persistent).
    Donors(u64),
    /// Image ids owned by an area (Persistent).
    AreaImages(u64),
    /// Name-uniqueness membership set (Persistent).
    NameUsed(String),
    /// Satellite image record keyed by id (Persistent).
    Image(u64),
    /// Image id → owning area name back-reference (Persistent).
    ImageArea(u64),
}

// ── Instance Storage Helpers ─────────────────────────────────────────

/// Extend instance storage TTL if it falls below the threshold.
fn bump_instance(env: &Env) {
    env.storage()
        .instance()
        .extend_ttl(INSTANCE_LIFETIME_THRESHOLD, INSTANCE_BUMP_AMOUNT);
}

/// Atomically reads, increments, and stores the area counter.
/// Returns the id to use for the *current* area (pre-increment value).
pub fn next_area_id(env: &Env) -> u64 {
    bump_instance(env);
    let current: u64 = env
        .storage()
        .instance()
        .get(&DataKey::AreaCount)
        .unwrap_or(0);
    env.storage()
        .instance()
        .set(&DataKey::AreaCount, &(current + 1));
    current
}

/// Atomically reads, increments, and stores the image counter.
pub fn next_image_id(env: &Env) -> u64 {
    bump_instance(env);
    let current: u64 = env
        .storage()
        .instance()
        .get(&DataKey::ImageCount)
        .unwrap_or(0);
    env.storage()
        .instance()
        .set(&DataKey::ImageCount, &(current + 1));
    current
}

/// Number of areas registered so far (== the next id to be allocated).
pub fn area_count(env: &Env) -> u64 {
    bump_instance(env);
    env.storage()
        .instance()
        .get(&DataKey::AreaCount)
        .unwrap_or(0)
}

/// Number of images minted so far.
pub fn image_count(env: &Env) -> u64 {
    bump_instance(env);
    env.storage()
        .instance()
        .get(&DataKey::ImageCount)
        .unwrap_or(0)
}

pub fn set_payment_token(env: &Env, token: &Address) {
    env.storage().instance().set(&DataKey::PaymentToken, token);
    bump_instance(env);
}

/// Asset all value transfers settle in. Panics before `init` has run.
pub fn payment_token(env: &Env) -> Address {
    bump_instance(env);
    env.storage()
        .instance()
        .get(&DataKey::PaymentToken)
        .unwrap_or_else(|| panic_with_error!(env, Error::NotInitialized))
}

pub fn set_donation(env: &Env, value: i128) {
    env.storage().instance().set(&DataKey::Donation, &value);
    bump_instance(env);
}

pub fn donation(env: &Env) -> i128 {
    bump_instance(env);
    env.storage().instance().get(&DataKey::Donation).unwrap_or(0)
}

pub fn set_price(env: &Env, value: i128) {
    env.storage().instance().set(&DataKey::Price, &value);
    bump_instance(env);
}

pub fn price(env: &Env) -> i128 {
    bump_instance(env);
    env.storage().instance().get(&DataKey::Price).unwrap_or(0)
}

// ── Persistent Storage Helpers ───────────────────────────────────────

/// Extend the TTL for a persistent storage key.
fn bump_persistent(env: &Env, key: &DataKey) {
    env.storage()
        .persistent()
        .extend_ttl(key, PERSISTENT_LIFETIME_THRESHOLD, PERSISTENT_BUMP_AMOUNT);
}

/// Store the immutable profile of a newly registered area.
pub fn save_profile(env: &Env, profile: &AreaProfile) {
    let key = DataKey::Profile(profile.id);
    env.storage().persistent().set(&key, profile);
    bump_persistent(env, &key);
}

pub fn try_load_profile(env: &Env, id: u64) -> Option<AreaProfile> {
    let key = DataKey::Profile(id);
    let profile: Option<AreaProfile> = env.storage().persistent().get(&key);
    if profile.is_some() {
        bump_persistent(env, &key);
    }
    profile
}

/// Load an area profile. Panics with `AreaNotFound` for unknown ids.
pub fn load_profile(env: &Env, id: u64) -> AreaProfile {
    try_load_profile(env, id).unwrap_or_else(|| panic_with_error!(env, Error::AreaNotFound))
}

/// `true` once monitoring data has been recorded for the area.
pub fn has_monitoring(env: &Env, id: u64) -> bool {
    env.storage().persistent().has(&DataKey::Monitoring(id))
}

/// Store the one-time monitoring report for an area.
pub fn save_monitoring(env: &Env, id: u64, report: &MonitoringReport) {
    let key = DataKey::Monitoring(id);
    env.storage().persistent().set(&key, report);
    bump_persistent(env, &key);
}

pub fn try_load_monitoring(env: &Env, id: u64) -> Option<MonitoringReport> {
    let key = DataKey::Monitoring(id);
    let report: Option<MonitoringReport> = env.storage().persistent().get(&key);
    if report.is_some() {
        bump_persistent(env, &key);
    }
    report
}

/// Donor list for an area; empty before the first contribution.
pub fn load_donors(env: &Env, id: u64) -> Vec<Address> {
    let key = DataKey::Donors(id);
    let donors: Option<Vec<Address>> = env.storage().persistent().get(&key);
    match donors {
        Some(list) => {
            bump_persistent(env, &key);
            list
        }
        None => Vec::new(env),
    }
}

/// Append a donor to an area's list. Duplicates are kept.
pub fn push_donor(env: &Env, id: u64, donor: &Address) {
    let key = DataKey::Donors(id);
    let mut donors = load_donors(env, id);
    donors.push_back(donor.clone());
    env.storage().persistent().set(&key, &donors);
    bump_persistent(env, &key);
}

/// Image ids owned by an area; empty before the first mint.
pub fn load_area_images(env: &Env, id: u64) -> Vec<u64> {
    let key = DataKey::AreaImages(id);
    let images: Option<Vec<u64>> = env.storage().persistent().get(&key);
    match images {
        Some(list) => {
            bump_persistent(env, &key);
            list
        }
        None => Vec::new(env),
    }
}

/// Append an image id to an area's collection.
pub fn push_area_image(env: &Env, area_id: u64, image_id: u64) {
    let key = DataKey::AreaImages(area_id);
    let mut images = load_area_images(env, area_id);
    images.push_back(image_id);
    env.storage().persistent().set(&key, &images);
    bump_persistent(env, &key);
}

/// Membership test against the global name-uniqueness set.
pub fn is_name_used(env: &Env, name: &String) -> bool {
    env.storage()
        .persistent()
        .get(&DataKey::NameUsed(name.clone()))
        .unwrap_or(false)
}

/// Mark a name as used forever. Names are never released.
pub fn mark_name_used(env: &Env, name: &String) {
    let key = DataKey::NameUsed(name.clone());
    env.storage().persistent().set(&key, &true);
    bump_persistent(env, &key);
}

/// Store a satellite image record (creation and `sold` flip).
pub fn save_image(env: &Env, image: &SatelliteImage) {
    let key = DataKey::Image(image.id);
    env.storage().persistent().set(&key, image);
    bump_persistent(env, &key);
}

pub fn try_load_image(env: &Env, id: u64) -> Option<SatelliteImage> {
    let key = DataKey::Image(id);
    let image: Option<SatelliteImage> = env.storage().persistent().get(&key);
    if image.is_some() {
        bump_persistent(env, &key);
    }
    image
}

/// Load a satellite image. Panics with `ImageNotFound` for unknown ids.
pub fn load_image(env: &Env, id: u64) -> SatelliteImage {
    try_load_image(env, id).unwrap_or_else(|| panic_with_error!(env, Error::ImageNotFound))
}

/// Record the image → owning-area-name back-reference.
pub fn set_image_area(env: &Env, image_id: u64, area_name: &String) {
    let key = DataKey::ImageArea(image_id);
    env.storage().persistent().set(&key, area_name);
    bump_persistent(env, &key);
}

pub fn has_image_area(env: &Env, image_id: u64) -> bool {
    env.storage().persistent().has(&DataKey::ImageArea(image_id))
}

/// Owning area name for an image. Panics with `ImageNotFound` when the
/// back-reference was never recorded.
pub fn load_image_area(env: &Env, image_id: u64) -> String {
    let key = DataKey::ImageArea(image_id);
    let name: Option<String> = env.storage().persistent().get(&key);
    match name {
        Some(n) => {
            bump_persistent(env, &key);
            n
        }
        None => panic_with_error!(env, Error::ImageNotFound),
    }
}

/// Load the full `ProtectedArea` view by combining the profile,
/// monitoring, donor, and image entries. Panics if the area does not
/// exist. Monitoring fields are empty while no report is recorded.
pub fn load_area(env: &Env, id: u64) -> ProtectedArea {
    let profile = load_profile(env, id);
    let report = try_load_monitoring(env, id).unwrap_or_else(|| MonitoringReport {
        last_detection_date: String::from_str(env, ""),
        total_extension: String::from_str(env, ""),
        detection_dates: Vec::new(env),
        forest_cover_extensions: Vec::new(env),
    });
    ProtectedArea {
        id: profile.id,
        name: profile.name,
        photo: profile.photo,
        description: profile.description,
        geo_json: profile.geo_json,
        country: profile.country,
        last_detection_date: report.last_detection_date,
        total_extension: report.total_extension,
        detection_dates: report.detection_dates,
        forest_cover_extensions: report.forest_cover_extensions,
        donors: load_donors(env, id),
        image_ids: load_area_images(env, id),
    }
}
