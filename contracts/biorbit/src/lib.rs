//! # Biorbit Registry Contract
//!
//! Root crate of the **Biorbit** protocol: a registry of environmentally
//! protected areas funded by community donations, with deforestation
//! monitoring data and tokenized satellite imagery sold as non-fungible
//! assets. The single `Biorbit` contract owns all state; its entry
//! points cover the full lifecycle:
//!
//! | Phase        | Entry Point(s)                                        |
//! |--------------|-------------------------------------------------------|
//! | Bootstrap    | [`Biorbit::init`]                                     |
//! | Role admin   | `grant_admin`, `revoke_admin`, `transfer_admin`       |
//! | Registration | [`Biorbit::register_area`], [`Biorbit::donate`]       |
//! | Monitoring   | [`Biorbit::record_monitoring_data`]                   |
//! | Marketplace  | `mint_satellite_image`, `sell_satellite_image`, `buy_satellite_image` |
//! | Parameters   | `set_donation`, `set_price`, `withdraw`               |
//! | Queries      | `get_area`, `get_areas_by_name*`, `get_used_names`, … |
//!
//! ## Architecture
//!
//! Authorization is fully delegated to [`rbac`], token bookkeeping to
//! `nft`, storage access to `storage`, and the sell/buy mutual exclusion
//! to `guard`. This file contains **only** the public entry points,
//! their precondition checks, and event emissions.

#![no_std]

use soroban_sdk::{
    contract, contracterror, contractimpl, panic_with_error, token, Address, Env, String, Vec,
};

pub mod events;
mod guard;
mod nft;
mod storage;
mod types;
pub mod rbac;

#[cfg(test)]
mod invariants;
#[cfg(test)]
mod test_events;
#[cfg(test)]
mod test_pagination;

use events::{
    AreaFunded, AreaRegistered, DonationUpdated, ImageListed, ImageMinted, ImageSold,
    MonitoringRecorded, PriceUpdated, Withdrawn, AREA_FUNDED, AREA_REGISTERED, DONATION_UPDATED,
    IMAGE_LISTED, IMAGE_MINTED, IMAGE_SOLD, MONITORING_RECORDED, PRICE_UPDATED, WITHDRAWN,
};
pub use types::{AreaProfile, MonitoringReport, ProtectedArea, SatelliteImage};

#[contracterror]
#[derive(Copy, Clone, Debug, Eq, PartialEq, PartialOrd, Ord)]
#[repr(u32)]
pub enum Error {
    AlreadyInitialized        = 1,
    NotInitialized            = 2,
    NotAuthorized             = 3,
    InsufficientDonation      = 4,
    NameAlreadyUsed           = 5,
    UnknownName               = 6,
    AreaNotFound              = 7,
    AreaNameMismatch          = 8,
    MonitoringAlreadyRecorded = 9,
    ImageNotFound             = 10,
    ImageAlreadySold          = 11,
    IncorrectPayment          = 12,
    NotTokenOwner             = 13,
    TransferNotApproved       = 14,
    InvalidPaginationWindow   = 15,
    InvalidParameter          = 16,
    ParameterUnchanged        = 17,
    NothingToWithdraw         = 18,
    ReentrantCall             = 19,
    InvalidAmount             = 20,
    TokenNotFound             = 21,
}

#[contract]
pub struct Biorbit;

#[contractimpl]
impl Biorbit {
    // ─────────────────────────────────────────────────────────
    // Initialisation
    // ─────────────────────────────────────────────────────────

    /// Initialise the contract with its first default admin, the asset
    /// all value transfers settle in, and the two global parameters.
    ///
    /// Must be called exactly once immediately after deployment.
    /// Subsequent calls panic with `Error::AlreadyInitialized`.
    pub fn init(env: Env, admin: Address, payment_token: Address, donation: i128, price: i128) {
        admin.require_auth();
        if donation <= 0 || price <= 0 {
            panic_with_error!(&env, Error::InvalidParameter);
        }
        rbac::init_admin(&env, &admin);
        storage::set_payment_token(&env, &payment_token);
        storage::set_donation(&env, donation);
        storage::set_price(&env, price);
    }

    // ─────────────────────────────────────────────────────────
    // Role management
    // ─────────────────────────────────────────────────────────

    /// Grant the operational admin role to `account`. Default-admin only.
    pub fn grant_admin(env: Env, caller: Address, account: Address) {
        rbac::grant_admin(&env, &caller, &account);
    }

    /// Revoke the operational admin role from `account`. Default-admin
    /// only; the default admin itself cannot be revoked.
    pub fn revoke_admin(env: Env, caller: Address, account: Address) {
        rbac::revoke_admin(&env, &caller, &account);
    }

    /// Hand the default-admin position to `new_admin`.
    pub fn transfer_admin(env: Env, caller: Address, new_admin: Address) {
        rbac::transfer_default_admin(&env, &caller, &new_admin);
    }

    /// Return `true` if `account` holds the operational admin role.
    pub fn is_admin(env: Env, account: Address) -> bool {
        rbac::is_admin(&env, &account)
    }

    /// Return the current default admin.
    pub fn admin(env: Env) -> Address {
        rbac::default_admin(&env)
    }

    // ─────────────────────────────────────────────────────────
    // Area registration & donations
    // ─────────────────────────────────────────────────────────

    /// Register a new protected area against a qualifying donation.
    ///
    /// Fails when `amount` is below the global minimum donation or when
    /// `name` was already used by any prior registration. On success the
    /// donation moves into the contract balance, the next area id is
    /// allocated, the donor is recorded, the name is marked used forever,
    /// and observers are notified with the full record.
    pub fn register_area(
        env: Env,
        donor: Address,
        name: String,
        photo: String,
        description: String,
        geo_json: String,
        country: String,
        amount: i128,
    ) -> ProtectedArea {
        donor.require_auth();

        if amount < storage::donation(&env) {
            panic_with_error!(&env, Error::InsufficientDonation);
        }
        if storage::is_name_used(&env, &name) {
            panic_with_error!(&env, Error::NameAlreadyUsed);
        }

        let token_client = token::Client::new(&env, &storage::payment_token(&env));
        token_client.transfer(&donor, &env.current_contract_address(), &amount);

        let id = storage::next_area_id(&env);
        let profile = AreaProfile {
            id,
            name: name.clone(),
            photo,
            description,
            geo_json: geo_json.clone(),
            country: country.clone(),
        };
        storage::save_profile(&env, &profile);
        storage::push_donor(&env, id, &donor);
        storage::mark_name_used(&env, &name);

        env.events().publish(
            (AREA_REGISTERED, id),
            AreaRegistered {
                area_id: id,
                name,
                donor,
                amount,
                country,
                geo_json,
            },
        );

        storage::load_area(&env, id)
    }

    /// Contribute to an existing area. Donors may repeat; every
    /// contribution appends to the area's donor list.
    pub fn donate(env: Env, donor: Address, area_id: u64, amount: i128) {
        donor.require_auth();

        if amount <= 0 {
            panic_with_error!(&env, Error::InvalidAmount);
        }
        // Unknown ids abort before any value moves.
        let _ = storage::load_profile(&env, area_id);

        let token_client = token::Client::new(&env, &storage::payment_token(&env));
        token_client.transfer(&donor, &env.current_contract_address(), &amount);

        storage::push_donor(&env, area_id, &donor);

        env.events().publish(
            (AREA_FUNDED, area_id),
            AreaFunded {
                area_id,
                donor,
                amount,
            },
        );
    }

    /// Record the one-time monitoring data of an area. Admin only.
    ///
    /// `name` must both be a member of the used-name set and match the
    /// stored record at `area_id`, defending against id/name mismatches.
    /// A second call for the same area fails: monitoring fields are
    /// populated exactly once.
    pub fn record_monitoring_data(
        env: Env,
        caller: Address,
        area_id: u64,
        name: String,
        last_detection_date: String,
        total_extension: String,
        detection_dates: Vec<String>,
        forest_cover_extensions: Vec<String>,
    ) {
        rbac::require_admin(&env, &caller);

        if !storage::is_name_used(&env, &name) {
            panic_with_error!(&env, Error::UnknownName);
        }
        let profile = storage::load_profile(&env, area_id);
        if profile.name != name {
            panic_with_error!(&env, Error::AreaNameMismatch);
        }
        if storage::has_monitoring(&env, area_id) {
            panic_with_error!(&env, Error::MonitoringAlreadyRecorded);
        }

        let report = MonitoringReport {
            last_detection_date: last_detection_date.clone(),
            total_extension: total_extension.clone(),
            detection_dates,
            forest_cover_extensions,
        };
        storage::save_monitoring(&env, area_id, &report);

        env.events().publish(
            (MONITORING_RECORDED, area_id),
            MonitoringRecorded {
                area_id,
                name,
                last_detection_date,
                total_extension,
            },
        );
    }

    // ─────────────────────────────────────────────────────────
    // Registry queries
    // ─────────────────────────────────────────────────────────

    /// Retrieve one area by id.
    pub fn get_area(env: Env, area_id: u64) -> ProtectedArea {
        storage::load_area(&env, area_id)
    }

    /// Names of every registered area, in registration order.
    pub fn get_used_names(env: Env) -> Vec<String> {
        let mut names = Vec::new(&env);
        for id in 0..storage::area_count(&env) {
            let profile = storage::load_profile(&env, id);
            if storage::is_name_used(&env, &profile.name) {
                names.push_back(profile.name);
            }
        }
        names
    }

    /// All areas whose name equals `name`, via a full scan of the id
    /// space. Empty when nothing matches.
    pub fn get_areas_by_name(env: Env, name: String) -> Vec<ProtectedArea> {
        Self::collect_by_name(&env, &name)
    }

    /// Paginated variant of [`Biorbit::get_areas_by_name`].
    ///
    /// Returns the matches in window `[page*page_size, page*page_size +
    /// page_size)`, clamped to the true match count. Fails when the
    /// window start reaches or exceeds the match count, or when
    /// `page_size` is zero.
    pub fn get_areas_by_name_paginated(
        env: Env,
        name: String,
        page: u32,
        page_size: u32,
    ) -> Vec<ProtectedArea> {
        let matches = Self::collect_by_name(&env, &name);
        let (start, end) = Self::page_window(&env, matches.len() as u64, page, page_size);
        let mut out = Vec::new(&env);
        for i in start..end {
            out.push_back(matches.get_unchecked(i as u32));
        }
        out
    }

    /// All areas in id order, windowed with the same clamping and
    /// failure semantics as the by-name variant.
    pub fn get_areas_paginated(env: Env, page: u32, page_size: u32) -> Vec<ProtectedArea> {
        let (start, end) = Self::page_window(&env, storage::area_count(&env), page, page_size);
        let mut out = Vec::new(&env);
        for id in start..end {
            out.push_back(storage::load_area(&env, id));
        }
        out
    }

    /// Number of areas registered so far.
    pub fn area_count(env: Env) -> u64 {
        storage::area_count(&env)
    }

    /// Number of satellite images minted so far.
    pub fn image_count(env: Env) -> u64 {
        storage::image_count(&env)
    }

    // ─────────────────────────────────────────────────────────
    // Satellite image marketplace
    // ─────────────────────────────────────────────────────────

    /// Mint a satellite image for an area. Admin only.
    ///
    /// The name/id pair is validated the same way as for monitoring
    /// updates. The new image takes the current global price, is
    /// appended to the area's collection, back-referenced to the area
    /// name, and issued as a token to the caller with `uri` attached.
    pub fn mint_satellite_image(
        env: Env,
        caller: Address,
        area_name: String,
        area_id: u64,
        uri: String,
    ) -> SatelliteImage {
        rbac::require_admin(&env, &caller);

        if !storage::is_name_used(&env, &area_name) {
            panic_with_error!(&env, Error::UnknownName);
        }
        let profile = storage::load_profile(&env, area_id);
        if profile.name != area_name {
            panic_with_error!(&env, Error::AreaNameMismatch);
        }

        let id = storage::next_image_id(&env);
        let price = storage::price(&env);
        let image = SatelliteImage {
            id,
            uri: uri.clone(),
            price,
            sold: false,
            seller: caller.clone(),
        };
        storage::save_image(&env, &image);
        storage::push_area_image(&env, area_id, id);
        storage::set_image_area(&env, id, &area_name);
        nft::mint(&env, &caller, id, &uri);

        env.events().publish(
            (IMAGE_MINTED, id),
            ImageMinted {
                image_id: id,
                area_id,
                minter: caller,
                uri,
                price,
            },
        );

        image
    }

    /// Escrow an unsold image's token to the contract, listing it for
    /// sale. Admin only.
    ///
    /// The caller must be the current token owner and must have approved
    /// the contract as operator (per-token or blanket) beforehand.
    pub fn sell_satellite_image(env: Env, caller: Address, image_id: u64) {
        rbac::require_admin(&env, &caller);
        guard::lock(&env);

        if !storage::has_image_area(&env, image_id) {
            panic_with_error!(&env, Error::ImageNotFound);
        }
        let owner = nft::owner_of(&env, image_id);
        if owner != caller {
            panic_with_error!(&env, Error::NotTokenOwner);
        }
        let contract = env.current_contract_address();
        if !nft::is_approved(&env, &owner, &contract, image_id) {
            panic_with_error!(&env, Error::TransferNotApproved);
        }

        nft::transfer_unchecked(&env, &owner, &contract, image_id);

        env.events().publish(
            (IMAGE_LISTED, image_id),
            ImageListed {
                image_id,
                seller: caller,
            },
        );

        guard::unlock(&env);
    }

    /// Buy an image at its exact price.
    ///
    /// Valid both for escrowed tokens (custody moves from the contract)
    /// and for unlisted ones (custody moves straight from the seller).
    /// The payment settles on the image's recorded seller, `sold` flips
    /// once, and a second purchase of the same id always fails.
    pub fn buy_satellite_image(env: Env, buyer: Address, image_id: u64, amount: i128) {
        buyer.require_auth();
        guard::lock(&env);

        if image_id >= storage::image_count(&env) {
            panic_with_error!(&env, Error::ImageNotFound);
        }
        let mut image = storage::load_image(&env, image_id);
        if amount != image.price {
            panic_with_error!(&env, Error::IncorrectPayment);
        }
        if image.sold {
            panic_with_error!(&env, Error::ImageAlreadySold);
        }

        let token_client = token::Client::new(&env, &storage::payment_token(&env));
        token_client.transfer(&buyer, &image.seller, &amount);

        let owner = nft::owner_of(&env, image_id);
        nft::transfer_unchecked(&env, &owner, &buyer, image_id);

        image.sold = true;
        storage::save_image(&env, &image);

        env.events().publish(
            (IMAGE_SOLD, image_id),
            ImageSold {
                image_id,
                buyer,
                seller: image.seller,
                price: image.price,
            },
        );

        guard::unlock(&env);
    }

    /// Retrieve one image by id.
    pub fn get_satellite_image(env: Env, image_id: u64) -> SatelliteImage {
        storage::load_image(&env, image_id)
    }

    /// All images minted for an area, in mint order.
    pub fn get_area_images(env: Env, area_id: u64) -> Vec<SatelliteImage> {
        let _ = storage::load_profile(&env, area_id);
        let mut out = Vec::new(&env);
        for image_id in storage::load_area_images(&env, area_id).iter() {
            out.push_back(storage::load_image(&env, image_id));
        }
        out
    }

    /// Name of the area an image belongs to.
    pub fn area_of_image(env: Env, image_id: u64) -> String {
        storage::load_image_area(&env, image_id)
    }

    // ─────────────────────────────────────────────────────────
    // Token surface
    // ─────────────────────────────────────────────────────────

    /// Current owner of a token.
    pub fn owner_of(env: Env, token_id: u64) -> Address {
        nft::owner_of(&env, token_id)
    }

    /// Number of tokens held by `owner`.
    pub fn balance_of(env: Env, owner: Address) -> u32 {
        nft::balance_of(&env, &owner)
    }

    /// Metadata URI attached at mint time.
    pub fn token_uri(env: Env, token_id: u64) -> String {
        nft::token_uri(&env, token_id)
    }

    /// Owner-initiated token transfer.
    pub fn transfer(env: Env, from: Address, to: Address, token_id: u64) {
        nft::transfer(&env, &from, &to, token_id);
    }

    /// Transfer using `spender`'s approval instead of the owner's own
    /// signature.
    pub fn transfer_from(env: Env, spender: Address, from: Address, to: Address, token_id: u64) {
        nft::transfer_from(&env, &spender, &from, &to, token_id);
    }

    /// Set or clear the per-token approved operator.
    pub fn approve(env: Env, owner: Address, approved: Option<Address>, token_id: u64) {
        nft::approve(&env, &owner, &approved, token_id);
    }

    /// Per-token approved operator, if any.
    pub fn get_approved(env: Env, token_id: u64) -> Option<Address> {
        nft::get_approved(&env, token_id)
    }

    /// Grant or revoke a blanket operator approval.
    pub fn set_approval_for_all(env: Env, owner: Address, operator: Address, approved: bool) {
        nft::set_approval_for_all(&env, &owner, &operator, approved);
    }

    /// `true` if `operator` holds a blanket approval from `owner`.
    pub fn is_approved_for_all(env: Env, owner: Address, operator: Address) -> bool {
        nft::is_approved_for_all(&env, &owner, &operator)
    }

    // ─────────────────────────────────────────────────────────
    // Parameters & custody
    // ─────────────────────────────────────────────────────────

    /// Change the minimum registration donation. Admin only; rejects
    /// non-positive values and no-op writes.
    pub fn set_donation(env: Env, caller: Address, value: i128) {
        rbac::require_admin(&env, &caller);
        if value <= 0 {
            panic_with_error!(&env, Error::InvalidParameter);
        }
        let previous = storage::donation(&env);
        if value == previous {
            panic_with_error!(&env, Error::ParameterUnchanged);
        }
        storage::set_donation(&env, value);
        env.events().publish(
            (DONATION_UPDATED,),
            DonationUpdated {
                previous,
                current: value,
            },
        );
    }

    /// Change the price stamped onto newly minted images. Admin only;
    /// rejects non-positive values and no-op writes. Already-minted
    /// images keep the price they were created with.
    pub fn set_price(env: Env, caller: Address, value: i128) {
        rbac::require_admin(&env, &caller);
        if value <= 0 {
            panic_with_error!(&env, Error::InvalidParameter);
        }
        let previous = storage::price(&env);
        if value == previous {
            panic_with_error!(&env, Error::ParameterUnchanged);
        }
        storage::set_price(&env, value);
        env.events().publish(
            (PRICE_UPDATED,),
            PriceUpdated {
                previous,
                current: value,
            },
        );
    }

    /// Current minimum registration donation.
    pub fn get_donation(env: Env) -> i128 {
        storage::donation(&env)
    }

    /// Current mint price.
    pub fn get_price(env: Env) -> i128 {
        storage::price(&env)
    }

    /// Drain the contract's full payment-token balance to the caller.
    /// Admin only; fails when there is nothing to withdraw.
    pub fn withdraw(env: Env, caller: Address) -> i128 {
        rbac::require_admin(&env, &caller);

        let token_client = token::Client::new(&env, &storage::payment_token(&env));
        let contract = env.current_contract_address();
        let balance = token_client.balance(&contract);
        if balance <= 0 {
            panic_with_error!(&env, Error::NothingToWithdraw);
        }
        token_client.transfer(&contract, &caller, &balance);

        env.events().publish(
            (WITHDRAWN,),
            Withdrawn {
                admin: caller,
                amount: balance,
            },
        );

        balance
    }
}

impl Biorbit {
    /// Scan the full id space and collect every area whose name is a
    /// member of the used set and equals `name` exactly.
    fn collect_by_name(env: &Env, name: &String) -> Vec<ProtectedArea> {
        let mut out = Vec::new(env);
        for id in 0..storage::area_count(env) {
            let profile = storage::load_profile(env, id);
            if storage::is_name_used(env, &profile.name) && profile.name == *name {
                out.push_back(storage::load_area(env, id));
            }
        }
        out
    }

    /// Compute the `[page*page_size, page*page_size + page_size)` window
    /// over `total` records, clamping the upper bound. Panics when the
    /// start index reaches or exceeds `total` or `page_size` is zero.
    fn page_window(env: &Env, total: u64, page: u32, page_size: u32) -> (u64, u64) {
        if page_size == 0 {
            panic_with_error!(env, Error::InvalidPaginationWindow);
        }
        let start = page as u64 * page_size as u64;
        if start >= total {
            panic_with_error!(env, Error::InvalidPaginationWindow);
        }
        let end = (start + page_size as u64).min(total);
        (start, end)
    }
}
