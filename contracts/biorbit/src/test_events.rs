extern crate std;

use soroban_sdk::{
    symbol_short,
    testutils::{Address as _, Events},
    token, vec, Address, Env, IntoVal, String, TryIntoVal,
};

use crate::events::{AreaRegistered, DonationUpdated, ImageMinted, ImageSold};
use crate::{Biorbit, BiorbitClient};

const DONATION: i128 = 1_000;
const PRICE: i128 = 5_000;

fn setup() -> (
    Env,
    BiorbitClient<'static>,
    Address,
    token::StellarAssetClient<'static>,
) {
    let env = Env::default();
    env.mock_all_auths();
    let contract_id = env.register(Biorbit, ());
    let client = BiorbitClient::new(&env, &contract_id);
    let admin = Address::generate(&env);
    let issuer = Address::generate(&env);
    let sac = env.register_stellar_asset_contract_v2(issuer);
    let token_admin = token::StellarAssetClient::new(&env, &sac.address());
    client.init(&admin, &sac.address(), &DONATION, &PRICE);
    (env, client, admin, token_admin)
}

fn register_area(
    env: &Env,
    client: &BiorbitClient,
    token_admin: &token::StellarAssetClient,
    name: &str,
) -> (Address, crate::ProtectedArea) {
    let donor = Address::generate(env);
    token_admin.mint(&donor, &DONATION);
    let area = client.register_area(
        &donor,
        &String::from_str(env, name),
        &String::from_str(env, "ipfs://photo"),
        &String::from_str(env, "reserve"),
        &String::from_str(env, "{\"type\":\"Polygon\"}"),
        &String::from_str(env, "Ecuador"),
        &DONATION,
    );
    (donor, area)
}

#[test]
fn area_registered_event_carries_the_full_record() {
    let (env, client, _admin, token_admin) = setup();
    let (donor, area) = register_area(&env, &client, &token_admin, "Yasuni");

    let all_events = env.events().all();
    let last_event = all_events.last().expect("No events found");

    assert_eq!(last_event.0, client.address);
    let expected_topics = vec![
        &env,
        symbol_short!("area_reg").into_val(&env),
        area.id.into_val(&env),
    ];
    assert_eq!(last_event.1, expected_topics);

    let event_data: AreaRegistered = last_event.2.try_into_val(&env).unwrap();
    assert_eq!(
        event_data,
        AreaRegistered {
            area_id: area.id,
            name: String::from_str(&env, "Yasuni"),
            donor: donor.clone(),
            amount: DONATION,
            country: String::from_str(&env, "Ecuador"),
            geo_json: String::from_str(&env, "{\"type\":\"Polygon\"}"),
        }
    );
}

#[test]
fn image_minted_event() {
    let (env, client, admin, token_admin) = setup();
    let (_, area) = register_area(&env, &client, &token_admin, "Yasuni");

    let image = client.mint_satellite_image(
        &admin,
        &area.name,
        &area.id,
        &String::from_str(&env, "ipfs://capture-1"),
    );

    let all_events = env.events().all();
    let last_event = all_events.last().expect("No events found");

    assert_eq!(last_event.0, client.address);
    let expected_topics = vec![
        &env,
        symbol_short!("minted").into_val(&env),
        image.id.into_val(&env),
    ];
    assert_eq!(last_event.1, expected_topics);

    let event_data: ImageMinted = last_event.2.try_into_val(&env).unwrap();
    assert_eq!(
        event_data,
        ImageMinted {
            image_id: image.id,
            area_id: area.id,
            minter: admin.clone(),
            uri: String::from_str(&env, "ipfs://capture-1"),
            price: PRICE,
        }
    );
}

#[test]
fn image_sold_event() {
    let (env, client, admin, token_admin) = setup();
    let (_, area) = register_area(&env, &client, &token_admin, "Yasuni");
    let image = client.mint_satellite_image(
        &admin,
        &area.name,
        &area.id,
        &String::from_str(&env, "ipfs://capture-1"),
    );

    let buyer = Address::generate(&env);
    token_admin.mint(&buyer, &PRICE);
    client.buy_satellite_image(&buyer, &image.id, &PRICE);

    let all_events = env.events().all();
    let last_event = all_events.last().expect("No events found");

    assert_eq!(last_event.0, client.address);
    let expected_topics = vec![
        &env,
        symbol_short!("sold").into_val(&env),
        image.id.into_val(&env),
    ];
    assert_eq!(last_event.1, expected_topics);

    let event_data: ImageSold = last_event.2.try_into_val(&env).unwrap();
    assert_eq!(
        event_data,
        ImageSold {
            image_id: image.id,
            buyer: buyer.clone(),
            seller: admin.clone(),
            price: PRICE,
        }
    );
}

#[test]
fn donation_updated_event_carries_both_values() {
    let (env, client, admin, _token_admin) = setup();

    client.set_donation(&admin, &(DONATION * 2));

    let all_events = env.events().all();
    let last_event = all_events.last().expect("No events found");

    assert_eq!(last_event.0, client.address);
    let expected_topics = vec![&env, symbol_short!("don_set").into_val(&env)];
    assert_eq!(last_event.1, expected_topics);

    let event_data: DonationUpdated = last_event.2.try_into_val(&env).unwrap();
    assert_eq!(
        event_data,
        DonationUpdated {
            previous: DONATION,
            current: DONATION * 2,
        }
    );
}
