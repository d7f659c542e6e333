//! # Token-ownership capability
//!
//! Ownership, approval, and transfer bookkeeping for the satellite-image
//! tokens. Each image id doubles as a token id; minting happens only
//! through the registry's mint entry point.
//!
//! The registry composes this module instead of inheriting a token base
//! class: it reads ownership and approval state, and invokes
//! [`transfer_unchecked`] when its own state machine has already
//! validated a custody move (escrow on listing, settlement on purchase).
//! All other transfers go through the checked, caller-authenticated
//! entry points.
//!
//! ## Events
//!
//! * topics — `["transfer", from: Address, to: Address]`, data — token id
//! * topics — `["approve", owner: Address]`, data — token id

use soroban_sdk::{contracttype, panic_with_error, symbol_short, Address, Env, String};

use crate::Error;

/// Token bookkeeping keys (Persistent tier).
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum NftKey {
    /// Token id → current owner.
    Owner(u64),
    /// Owner → number of tokens held.
    Balance(Address),
    /// Token id → metadata URI.
    Uri(u64),
    /// Token id → per-token approved operator.
    Approved(u64),
    /// (owner, operator) → blanket operator approval.
    Operator(Address, Address),
}

/// Issue token `token_id` to `to` with the given metadata URI.
///
/// The registry allocates ids from a monotonic counter, so the id is
/// always fresh here.
pub fn mint(env: &Env, to: &Address, token_id: u64, uri: &String) {
    env.storage()
        .persistent()
        .set(&NftKey::Owner(token_id), to);
    env.storage().persistent().set(&NftKey::Uri(token_id), uri);
    let balance = balance_of(env, to);
    env.storage()
        .persistent()
        .set(&NftKey::Balance(to.clone()), &(balance + 1));
}

/// Current owner of `token_id`. Panics with `TokenNotFound` for ids that
/// were never minted.
pub fn owner_of(env: &Env, token_id: u64) -> Address {
    env.storage()
        .persistent()
        .get(&NftKey::Owner(token_id))
        .unwrap_or_else(|| panic_with_error!(env, Error::TokenNotFound))
}

/// Number of tokens held by `owner`.
pub fn balance_of(env: &Env, owner: &Address) -> u32 {
    env.storage()
        .persistent()
        .get(&NftKey::Balance(owner.clone()))
        .unwrap_or(0)
}

/// Metadata URI attached at mint time.
pub fn token_uri(env: &Env, token_id: u64) -> String {
    env.storage()
        .persistent()
        .get(&NftKey::Uri(token_id))
        .unwrap_or_else(|| panic_with_error!(env, Error::TokenNotFound))
}

/// Set or clear the per-token approved operator. `owner` must
/// authenticate and actually own the token.
pub fn approve(env: &Env, owner: &Address, approved: &Option<Address>, token_id: u64) {
    owner.require_auth();
    if owner_of(env, token_id) != *owner {
        panic_with_error!(env, Error::NotTokenOwner);
    }
    match approved {
        Some(operator) => {
            env.storage()
                .persistent()
                .set(&NftKey::Approved(token_id), operator);
        }
        None => {
            env.storage().persistent().remove(&NftKey::Approved(token_id));
        }
    }
    env.events()
        .publish((symbol_short!("approve"), owner.clone()), token_id);
}

/// Per-token approved operator, if any.
pub fn get_approved(env: &Env, token_id: u64) -> Option<Address> {
    env.storage().persistent().get(&NftKey::Approved(token_id))
}

/// Grant or revoke `operator` the right to move every token of `owner`.
pub fn set_approval_for_all(env: &Env, owner: &Address, operator: &Address, approved: bool) {
    owner.require_auth();
    let key = NftKey::Operator(owner.clone(), operator.clone());
    if approved {
        env.storage().persistent().set(&key, &true);
    } else {
        env.storage().persistent().remove(&key);
    }
}

/// `true` if `operator` holds a blanket approval from `owner`.
pub fn is_approved_for_all(env: &Env, owner: &Address, operator: &Address) -> bool {
    env.storage()
        .persistent()
        .get(&NftKey::Operator(owner.clone(), operator.clone()))
        .unwrap_or(false)
}

/// `true` if `operator` may move `token_id` on behalf of `owner`, either
/// through a per-token approval or a blanket one.
pub fn is_approved(env: &Env, owner: &Address, operator: &Address, token_id: u64) -> bool {
    if is_approved_for_all(env, owner, operator) {
        return true;
    }
    match get_approved(env, token_id) {
        Some(approved) => approved == *operator,
        None => false,
    }
}

/// Owner-initiated transfer. `from` must authenticate and own the token.
pub fn transfer(env: &Env, from: &Address, to: &Address, token_id: u64) {
    from.require_auth();
    if owner_of(env, token_id) != *from {
        panic_with_error!(env, Error::NotTokenOwner);
    }
    do_transfer(env, from, to, token_id);
}

/// Operator-initiated transfer using `spender`'s approval.
pub fn transfer_from(env: &Env, spender: &Address, from: &Address, to: &Address, token_id: u64) {
    spender.require_auth();
    if owner_of(env, token_id) != *from {
        panic_with_error!(env, Error::NotTokenOwner);
    }
    if !is_approved(env, from, spender, token_id) {
        panic_with_error!(env, Error::TransferNotApproved);
    }
    do_transfer(env, from, to, token_id);
}

/// Registry-driven custody move. The caller has already validated the
/// state machine (escrow or settlement); no signature is required here.
pub fn transfer_unchecked(env: &Env, from: &Address, to: &Address, token_id: u64) {
    if owner_of(env, token_id) != *from {
        panic_with_error!(env, Error::NotTokenOwner);
    }
    do_transfer(env, from, to, token_id);
}

fn do_transfer(env: &Env, from: &Address, to: &Address, token_id: u64) {
    // Any outstanding per-token approval dies with the transfer.
    env.storage().persistent().remove(&NftKey::Approved(token_id));
    env.storage().persistent().set(&NftKey::Owner(token_id), to);

    let from_balance = balance_of(env, from);
    env.storage()
        .persistent()
        .set(&NftKey::Balance(from.clone()), &(from_balance - 1));
    let to_balance = balance_of(env, to);
    env.storage()
        .persistent()
        .set(&NftKey::Balance(to.clone()), &(to_balance + 1));

    env.events().publish(
        (symbol_short!("transfer"), from.clone(), to.clone()),
        token_id,
    );
}
