//! # Role-Based Access Control
//!
//! Two levels of authority:
//!
//! - **Default admin** — a single address with full control. Only the
//!   default admin may grant or revoke the operational role or hand the
//!   default-admin position to another address.
//! - **Operational admins** — a set of addresses allowed to record
//!   monitoring data, mint and list satellite images, change the global
//!   parameters, and withdraw the contract balance.
//!
//! The default admin receives the operational role at initialisation, so
//! a fresh deployment is usable with a single address.
//!
//! Role storage lives under [`RbacKey`], separate from the registry's
//! [`crate::storage::DataKey`] namespace.

use soroban_sdk::{contracttype, panic_with_error, symbol_short, Address, Env};

use crate::Error;

/// Role storage keys (Instance tier — role data lives as long as the
/// contract).
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum RbacKey {
    /// The default admin address.
    DefaultAdmin,
    /// Operational-role membership flag per address.
    Admin(Address),
}

/// Set the first default admin. Must be called exactly once; subsequent
/// calls panic with `AlreadyInitialized`.
pub fn init_admin(env: &Env, admin: &Address) {
    if env.storage().instance().has(&RbacKey::DefaultAdmin) {
        panic_with_error!(env, Error::AlreadyInitialized);
    }
    env.storage().instance().set(&RbacKey::DefaultAdmin, admin);
    env.storage()
        .instance()
        .set(&RbacKey::Admin(admin.clone()), &true);
}

/// The current default admin. Panics before initialisation.
pub fn default_admin(env: &Env) -> Address {
    env.storage()
        .instance()
        .get(&RbacKey::DefaultAdmin)
        .unwrap_or_else(|| panic_with_error!(env, Error::NotInitialized))
}

/// `true` if `account` holds the operational admin role.
pub fn is_admin(env: &Env, account: &Address) -> bool {
    env.storage()
        .instance()
        .get(&RbacKey::Admin(account.clone()))
        .unwrap_or(false)
}

/// Authenticate `caller` and require the operational admin role.
pub fn require_admin(env: &Env, caller: &Address) {
    caller.require_auth();
    if !is_admin(env, caller) {
        panic_with_error!(env, Error::NotAuthorized);
    }
}

/// Authenticate `caller` and require the default-admin position.
pub fn require_default_admin(env: &Env, caller: &Address) {
    caller.require_auth();
    if *caller != default_admin(env) {
        panic_with_error!(env, Error::NotAuthorized);
    }
}

/// Grant the operational role to `account`. Default-admin only.
pub fn grant_admin(env: &Env, caller: &Address, account: &Address) {
    require_default_admin(env, caller);
    env.storage()
        .instance()
        .set(&RbacKey::Admin(account.clone()), &true);
    env.events()
        .publish((symbol_short!("role_set"), account.clone()), caller.clone());
}

/// Revoke the operational role from `account`. Default-admin only.
///
/// The default admin cannot be stripped this way; use
/// [`transfer_default_admin`] instead.
pub fn revoke_admin(env: &Env, caller: &Address, account: &Address) {
    require_default_admin(env, caller);
    if *account == default_admin(env) {
        panic_with_error!(env, Error::NotAuthorized);
    }
    env.storage()
        .instance()
        .remove(&RbacKey::Admin(account.clone()));
    env.events()
        .publish((symbol_short!("role_del"), account.clone()), caller.clone());
}

/// Hand the default-admin position to `new_admin`, who also receives the
/// operational role. The previous default admin keeps its operational
/// role until explicitly revoked.
pub fn transfer_default_admin(env: &Env, caller: &Address, new_admin: &Address) {
    require_default_admin(env, caller);
    env.storage().instance().set(&RbacKey::DefaultAdmin, new_admin);
    env.storage()
        .instance()
        .set(&RbacKey::Admin(new_admin.clone()), &true);
    env.events()
        .publish((symbol_short!("admin_xfr"), new_admin.clone()), caller.clone());
}
