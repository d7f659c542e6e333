#![allow(dead_code)]

extern crate std;

use soroban_sdk::{Address, Vec};

use crate::types::{ProtectedArea, SatelliteImage};

/// INV-1: Area ids are sequential starting from 0, gapless.
pub fn assert_sequential_area_ids(areas: &[ProtectedArea]) {
    for (i, area) in areas.iter().enumerate() {
        assert_eq!(
            area.id, i as u64,
            "INV-1 violated: expected area id {}, got {}",
            i, area.id
        );
    }
}

/// INV-2: Image ids are sequential starting from 0, gapless, on a
/// counter separate from area ids.
pub fn assert_sequential_image_ids(images: &[SatelliteImage]) {
    for (i, image) in images.iter().enumerate() {
        assert_eq!(
            image.id, i as u64,
            "INV-2 violated: expected image id {}, got {}",
            i, image.id
        );
    }
}

/// INV-3: `sold` transitions only false→true, never the reverse.
pub fn assert_sold_monotonic(before: &SatelliteImage, after: &SatelliteImage) {
    assert!(
        !(before.sold && !after.sold),
        "INV-3 violated: image {} reverted from sold to unsold",
        before.id
    );
}

/// INV-4: Fields written at registration never change afterwards.
pub fn assert_area_immutable_fields(original: &ProtectedArea, current: &ProtectedArea) {
    assert_eq!(original.id, current.id, "INV-4 violated: area id changed");
    assert_eq!(
        original.name, current.name,
        "INV-4 violated: area name changed"
    );
    assert_eq!(
        original.photo, current.photo,
        "INV-4 violated: area photo changed"
    );
    assert_eq!(
        original.description, current.description,
        "INV-4 violated: area description changed"
    );
    assert_eq!(
        original.geo_json, current.geo_json,
        "INV-4 violated: area geo_json changed"
    );
    assert_eq!(
        original.country, current.country,
        "INV-4 violated: area country changed"
    );
}

/// INV-5: Donor lists only grow, and existing entries keep position and
/// value (duplicates included).
pub fn assert_donors_append_only(before: &Vec<Address>, after: &Vec<Address>) {
    assert!(
        after.len() >= before.len(),
        "INV-5 violated: donor list shrank from {} to {}",
        before.len(),
        after.len()
    );
    for (i, donor) in before.iter().enumerate() {
        assert_eq!(
            after.get(i as u32),
            Some(donor),
            "INV-5 violated: donor at position {} changed",
            i
        );
    }
}

/// INV-6: An image's identity, pointer, price, and seller are fixed at
/// mint; only `sold` may change.
pub fn assert_image_immutable_fields(original: &SatelliteImage, current: &SatelliteImage) {
    assert_eq!(original.id, current.id, "INV-6 violated: image id changed");
    assert_eq!(
        original.uri, current.uri,
        "INV-6 violated: image uri changed"
    );
    assert_eq!(
        original.price, current.price,
        "INV-6 violated: image price changed"
    );
    assert_eq!(
        original.seller, current.seller,
        "INV-6 violated: image seller changed"
    );
}
