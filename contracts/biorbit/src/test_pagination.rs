extern crate std;

use soroban_sdk::{testutils::Address as _, token, Address, Env, String};

use crate::{Biorbit, BiorbitClient};

const DONATION: i128 = 1_000;
const PRICE: i128 = 5_000;

fn setup_with_areas(names: &[&str]) -> (Env, BiorbitClient<'static>) {
    let env = Env::default();
    env.mock_all_auths();
    let contract_id = env.register(Biorbit, ());
    let client = BiorbitClient::new(&env, &contract_id);
    let admin = Address::generate(&env);
    let issuer = Address::generate(&env);
    let sac = env.register_stellar_asset_contract_v2(issuer);
    let token_admin = token::StellarAssetClient::new(&env, &sac.address());
    client.init(&admin, &sac.address(), &DONATION, &PRICE);

    for name in names {
        let donor = Address::generate(&env);
        token_admin.mint(&donor, &DONATION);
        client.register_area(
            &donor,
            &String::from_str(&env, name),
            &String::from_str(&env, "ipfs://photo"),
            &String::from_str(&env, "reserve"),
            &String::from_str(&env, "{}"),
            &String::from_str(&env, "Ecuador"),
            &DONATION,
        );
    }
    (env, client)
}

const FIVE: [&str; 5] = ["Yasuni", "Sangay", "Podocarpus", "Cajas", "Cotacachi"];

#[test]
fn window_sizes_follow_the_match_count() {
    let (_env, client) = setup_with_areas(&FIVE);

    // min(page_size, N - page*page_size) for every valid page.
    assert_eq!(client.get_areas_paginated(&0, &2).len(), 2);
    assert_eq!(client.get_areas_paginated(&1, &2).len(), 2);
    assert_eq!(client.get_areas_paginated(&2, &2).len(), 1);
    assert_eq!(client.get_areas_paginated(&0, &5).len(), 5);
    assert_eq!(client.get_areas_paginated(&0, &9).len(), 5);
}

#[test]
fn windows_preserve_id_order_without_overlap() {
    let (_env, client) = setup_with_areas(&FIVE);

    let first = client.get_areas_paginated(&0, &2);
    let second = client.get_areas_paginated(&1, &2);
    let last = client.get_areas_paginated(&2, &2);

    assert_eq!(first.get_unchecked(0).id, 0);
    assert_eq!(first.get_unchecked(1).id, 1);
    assert_eq!(second.get_unchecked(0).id, 2);
    assert_eq!(second.get_unchecked(1).id, 3);
    assert_eq!(last.get_unchecked(0).id, 4);
}

#[test]
#[should_panic(expected = "#15")]
fn window_start_beyond_match_count_fails() {
    let (_env, client) = setup_with_areas(&FIVE);
    client.get_areas_paginated(&3, &2);
}

#[test]
#[should_panic(expected = "#15")]
fn window_start_at_match_count_fails() {
    let (_env, client) = setup_with_areas(&FIVE);
    // 5 areas, page*page_size == 5: one past the last record.
    client.get_areas_paginated(&1, &5);
}

#[test]
#[should_panic(expected = "#15")]
fn zero_page_size_fails() {
    let (_env, client) = setup_with_areas(&FIVE);
    client.get_areas_paginated(&0, &0);
}

#[test]
fn by_name_returns_exact_matches_only() {
    let (env, client) = setup_with_areas(&FIVE);

    let matches = client.get_areas_by_name(&String::from_str(&env, "Sangay"));
    assert_eq!(matches.len(), 1);
    assert_eq!(matches.get_unchecked(0).id, 1);

    // Names are exact-matched, not prefix-matched.
    let none = client.get_areas_by_name(&String::from_str(&env, "Sang"));
    assert_eq!(none.len(), 0);
}

#[test]
fn by_name_pagination_clamps_to_single_match() {
    let (env, client) = setup_with_areas(&FIVE);

    let page = client.get_areas_by_name_paginated(&String::from_str(&env, "Cajas"), &0, &10);
    assert_eq!(page.len(), 1);
    assert_eq!(page.get_unchecked(0).name, String::from_str(&env, "Cajas"));
}

#[test]
#[should_panic(expected = "#15")]
fn by_name_pagination_fails_past_the_matches() {
    let (env, client) = setup_with_areas(&FIVE);
    client.get_areas_by_name_paginated(&String::from_str(&env, "Cajas"), &1, &10);
}

#[test]
#[should_panic(expected = "#15")]
fn by_name_pagination_fails_for_unknown_name() {
    let (env, client) = setup_with_areas(&FIVE);
    // Zero matches leave no valid window at all.
    client.get_areas_by_name_paginated(&String::from_str(&env, "Atlantis"), &0, &10);
}

#[test]
fn used_names_follow_registration_order() {
    let (env, client) = setup_with_areas(&FIVE);

    let names = client.get_used_names();
    assert_eq!(names.len(), 5);
    for (i, expected) in FIVE.iter().enumerate() {
        assert_eq!(
            names.get_unchecked(i as u32),
            String::from_str(&env, expected)
        );
    }
}
