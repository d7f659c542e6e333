//! Mutual-exclusion guard around the sell/buy entry points.
//!
//! A nested invocation arriving while the lock is held aborts with
//! `ReentrantCall`. Because failures roll back every storage write of
//! the transaction, a panic between [`lock`] and [`unlock`] releases the
//! lock together with the rest of the aborted state.

use soroban_sdk::{contracttype, panic_with_error, Env};

use crate::Error;

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum GuardKey {
    Lock,
}

/// Acquire the lock; panics if an invocation already holds it.
pub fn lock(env: &Env) {
    let held: bool = env
        .storage()
        .instance()
        .get(&GuardKey::Lock)
        .unwrap_or(false);
    if held {
        panic_with_error!(env, Error::ReentrantCall);
    }
    env.storage().instance().set(&GuardKey::Lock, &true);
}

/// Release the lock at the end of a guarded entry point.
pub fn unlock(env: &Env) {
    env.storage().instance().set(&GuardKey::Lock, &false);
}
