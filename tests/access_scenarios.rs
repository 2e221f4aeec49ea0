//! Access restriction scenarios.
//!
//! Walks each access type through the login and permit combinations a
//! dataset page can see.

use chrono::{Duration, TimeZone, Utc};
use chrono_tz::Europe::Helsinki;
use serde_json::json;

use etsin::access::{compute_restrictions_at, AccessRestrictions, AccessRights, AccessType};
use etsin::catalog::CatalogRecord;

fn at(rights: &AccessRights, logged_in: bool) -> AccessRestrictions {
    let now = Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap();
    compute_restrictions_at(rights, false, None, logged_in, now, Helsinki)
}

#[test]
fn test_open_ignores_login() {
    let rights = AccessRights::new(AccessType::Open);
    assert_eq!(at(&rights, false), AccessRestrictions::open());
    assert_eq!(at(&rights, true), AccessRestrictions::open());
}

#[test]
fn test_restricted_ignores_login_and_permit() {
    let rights = AccessRights::new(AccessType::Restricted);
    let now = Utc::now();
    for logged_in in [false, true] {
        for has_permit in [false, true] {
            assert_eq!(
                compute_restrictions_at(&rights, has_permit, None, logged_in, now, Helsinki),
                AccessRestrictions::restricted()
            );
        }
    }
}

#[test]
fn test_login_follows_login_status() {
    let rights = AccessRights::new(AccessType::Login);
    assert!(!at(&rights, false).open);
    assert!(at(&rights, true).open);
}

#[test]
fn test_embargo_lifts_at_available_date() {
    let rights = AccessRights::embargo("2024-06-01T12:00:00Z");
    let available = Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap();

    let before = compute_restrictions_at(&rights, false, None, true, available, Helsinki);
    assert!(!before.open);

    let after = compute_restrictions_at(
        &rights,
        false,
        None,
        false,
        available + Duration::seconds(1),
        Helsinki,
    );
    assert_eq!(after, AccessRestrictions::open());
}

#[test]
fn test_embargo_without_date_stays_restricted() {
    let rights = AccessRights::new(AccessType::Embargo);
    assert_eq!(at(&rights, true), AccessRestrictions::restricted());

    let garbled = AccessRights::embargo("soon");
    assert_eq!(at(&garbled, true), AccessRestrictions::restricted());
}

#[test]
fn test_permit_passes_application_state_through() {
    let rights = AccessRights::new(AccessType::Permit);
    let now = Utc::now();

    let pending = compute_restrictions_at(&rights, false, Some("submitted"), true, now, Helsinki);
    assert!(pending.show_permit_request_button);
    assert!(!pending.allows_download());
    assert_eq!(pending.application_state.as_deref(), Some("submitted"));

    let approved = compute_restrictions_at(&rights, true, Some("approved"), true, now, Helsinki);
    assert!(approved.allows_download());
    assert!(!approved.open);
}

#[test]
fn test_record_without_access_rights_is_restricted() {
    let record = CatalogRecord::new(json!({ "identifier": "cr1", "research_dataset": {} }));
    assert_eq!(at(&record.access_rights(), true), AccessRestrictions::restricted());

    let malformed = CatalogRecord::new(json!({
        "identifier": "cr2",
        "research_dataset": { "access_rights": "open" }
    }));
    assert_eq!(at(&malformed.access_rights(), true), AccessRestrictions::restricted());
}

#[test]
fn test_restrictions_serialize_camel_case() {
    let json = serde_json::to_value(AccessRestrictions::permit(false, None)).unwrap();
    assert_eq!(json["showPermitRequestButton"], true);
    assert_eq!(json["allowDataIdaInfoButton"], false);
    assert!(json["applicationState"].is_null());
}
