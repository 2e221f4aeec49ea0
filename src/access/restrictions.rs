//! Restrictions state machine.

use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use serde::Serialize;

use super::access_type::{AccessRights, AccessType};
use crate::datetime;

/// Which data affordances a caller gets for one dataset.
///
/// A snapshot: recomputed wholesale whenever the descriptor, login status or
/// permit status changes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AccessRestrictions {
    pub open: bool,
    pub allow_data_remote: bool,
    pub allow_data_ida: bool,
    pub allow_data_ida_info_button: bool,
    pub allow_data_ida_download_button: bool,
    pub show_permit_request_button: bool,
    pub application_state: Option<String>,
}

impl AccessRestrictions {
    /// Content freely available.
    pub fn open() -> Self {
        Self {
            open: true,
            allow_data_remote: true,
            allow_data_ida: true,
            allow_data_ida_info_button: true,
            allow_data_ida_download_button: true,
            show_permit_request_button: false,
            application_state: None,
        }
    }

    /// Tabs visible, data locked.
    pub fn restricted() -> Self {
        Self {
            open: false,
            allow_data_remote: true,
            allow_data_ida: true,
            allow_data_ida_info_button: false,
            allow_data_ida_download_button: false,
            show_permit_request_button: false,
            application_state: None,
        }
    }

    /// Data gated behind a REMS permit.
    pub fn permit(has_permit: bool, application_state: Option<String>) -> Self {
        Self {
            open: false,
            allow_data_remote: true,
            allow_data_ida: true,
            allow_data_ida_info_button: has_permit,
            allow_data_ida_download_button: has_permit,
            show_permit_request_button: true,
            application_state,
        }
    }

    /// Whether IDA files of the dataset may be downloaded.
    pub fn allows_download(&self) -> bool {
        self.allow_data_ida_download_button
    }
}

/// Compute restrictions against the current wall-clock time.
///
/// The embargo date is compared afresh on every call, so an embargo lifts
/// without any invalidation once its date passes.
pub fn compute_restrictions(
    rights: &AccessRights,
    has_permit: bool,
    application_state: Option<&str>,
    user_logged_in: bool,
    tz: Tz,
) -> AccessRestrictions {
    compute_restrictions_at(
        rights,
        has_permit,
        application_state,
        user_logged_in,
        Utc::now(),
        tz,
    )
}

/// Compute restrictions at a given instant.
///
/// # Arguments
///
/// * `rights` - Access-rights descriptor of the dataset
/// * `has_permit` - Whether the caller holds an approved permit
/// * `application_state` - Caller's permit application state, passed through for permit datasets
/// * `user_logged_in` - Whether the caller is authenticated
/// * `now` - Instant the embargo date is compared against
/// * `tz` - Timezone for embargo dates without an offset
///
/// Unknown or missing access types fall back to restricted.
pub fn compute_restrictions_at(
    rights: &AccessRights,
    has_permit: bool,
    application_state: Option<&str>,
    user_logged_in: bool,
    now: DateTime<Utc>,
    tz: Tz,
) -> AccessRestrictions {
    match rights.access_type() {
        Some(AccessType::Open) => AccessRestrictions::open(),
        Some(AccessType::Embargo) => {
            let elapsed = rights
                .available
                .as_deref()
                .is_some_and(|available| datetime::is_before(available, now, tz));
            if elapsed {
                AccessRestrictions::open()
            } else {
                AccessRestrictions::restricted()
            }
        }
        Some(AccessType::Permit) => {
            AccessRestrictions::permit(has_permit, application_state.map(str::to_string))
        }
        Some(AccessType::Login) if user_logged_in => AccessRestrictions::open(),
        Some(AccessType::Login) | Some(AccessType::Restricted) => AccessRestrictions::restricted(),
        None => {
            tracing::debug!(
                access_type = rights.access_type_identifier().unwrap_or("<missing>"),
                "Unrecognized access type, treating as restricted"
            );
            AccessRestrictions::restricted()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::access::AccessTypeRef;
    use crate::datetime::DEFAULT_TIMEZONE;
    use chrono::{Duration, TimeZone};
    use serde_json::json;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap()
    }

    fn compute(rights: &AccessRights, has_permit: bool, state: Option<&str>, logged_in: bool) -> AccessRestrictions {
        compute_restrictions_at(rights, has_permit, state, logged_in, now(), DEFAULT_TIMEZONE)
    }

    #[test]
    fn test_open() {
        let r = compute(&AccessRights::new(AccessType::Open), false, None, false);
        assert_eq!(r, AccessRestrictions::open());
        assert!(r.open);
        assert!(r.allow_data_ida_download_button);
        assert!(!r.show_permit_request_button);
        assert!(r.application_state.is_none());
    }

    #[test]
    fn test_restricted() {
        let r = compute(&AccessRights::new(AccessType::Restricted), true, Some("approved"), true);
        assert_eq!(r, AccessRestrictions::restricted());
        assert!(!r.open);
        assert!(r.allow_data_remote);
        assert!(r.allow_data_ida);
        assert!(!r.allow_data_ida_info_button);
        assert!(!r.allow_data_ida_download_button);
        assert!(!r.show_permit_request_button);
        assert!(r.application_state.is_none());
    }

    #[test]
    fn test_permit_without_permit() {
        let r = compute(&AccessRights::new(AccessType::Permit), false, Some("draft"), true);
        assert_eq!(
            serde_json::to_value(&r).unwrap(),
            json!({
                "open": false,
                "allowDataRemote": true,
                "allowDataIda": true,
                "allowDataIdaInfoButton": false,
                "allowDataIdaDownloadButton": false,
                "showPermitRequestButton": true,
                "applicationState": "draft"
            })
        );
    }

    #[test]
    fn test_permit_with_permit() {
        let r = compute(&AccessRights::new(AccessType::Permit), true, Some("approved"), true);
        assert!(!r.open);
        assert!(r.allow_data_ida_info_button);
        assert!(r.allow_data_ida_download_button);
        assert!(r.show_permit_request_button);
        assert_eq!(r.application_state.as_deref(), Some("approved"));
        assert!(r.allows_download());
    }

    #[test]
    fn test_permit_without_application() {
        let r = compute(&AccessRights::new(AccessType::Permit), false, None, false);
        assert!(r.show_permit_request_button);
        assert!(r.application_state.is_none());
    }

    #[test]
    fn test_login() {
        let rights = AccessRights::new(AccessType::Login);
        assert_eq!(compute(&rights, false, None, true), AccessRestrictions::open());
        assert_eq!(
            compute(&rights, false, None, false),
            compute(&AccessRights::new(AccessType::Restricted), false, None, false)
        );
        // Permit state is ignored outside the permit access type
        let r = compute(&rights, true, Some("approved"), false);
        assert!(!r.show_permit_request_button);
        assert!(r.application_state.is_none());
    }

    #[test]
    fn test_embargo_boundary() {
        let past = (now() - Duration::milliseconds(1)).to_rfc3339();
        let future = (now() + Duration::milliseconds(1)).to_rfc3339();

        assert_eq!(
            compute(&AccessRights::embargo(past), false, None, false),
            AccessRestrictions::open()
        );
        assert_eq!(
            compute(&AccessRights::embargo(future), false, None, false),
            AccessRestrictions::restricted()
        );
        // Exactly now is not yet elapsed
        assert_eq!(
            compute(&AccessRights::embargo(now().to_rfc3339()), false, None, false),
            AccessRestrictions::restricted()
        );
    }

    #[test]
    fn test_embargo_date_only_uses_timezone() {
        // 2024-06-01 00:00 Helsinki is 2024-05-31 21:00 UTC
        let rights = AccessRights::embargo("2024-06-01");
        let before = Utc.with_ymd_and_hms(2024, 5, 31, 20, 59, 0).unwrap();
        let after = Utc.with_ymd_and_hms(2024, 5, 31, 21, 1, 0).unwrap();
        assert!(!compute_restrictions_at(&rights, false, None, false, before, DEFAULT_TIMEZONE).open);
        assert!(compute_restrictions_at(&rights, false, None, false, after, DEFAULT_TIMEZONE).open);
    }

    #[test]
    fn test_embargo_missing_or_invalid_date_is_restricted() {
        let missing = AccessRights::new(AccessType::Embargo);
        assert_eq!(compute(&missing, false, None, true), AccessRestrictions::restricted());

        let invalid = AccessRights::embargo("someday");
        assert_eq!(compute(&invalid, false, None, true), AccessRestrictions::restricted());
    }

    #[test]
    fn test_embargo_lifts_as_time_passes() {
        let rights = AccessRights::embargo("2024-06-01T12:00:00Z");
        let later = now() + Duration::seconds(1);
        assert!(!compute(&rights, false, None, false).open);
        assert!(compute_restrictions_at(&rights, false, None, false, later, DEFAULT_TIMEZONE).open);
    }

    #[test]
    fn test_unknown_or_missing_access_type_is_restricted() {
        let unknown = AccessRights {
            access_type: Some(AccessTypeRef {
                identifier: Some("http://uri.suomi.fi/codelist/fairdata/access_type/code/secret".to_string()),
            }),
            available: None,
        };
        assert_eq!(compute(&unknown, true, Some("approved"), true), AccessRestrictions::restricted());
        assert_eq!(
            compute(&AccessRights::default(), true, Some("approved"), true),
            AccessRestrictions::restricted()
        );
    }

    #[test]
    fn test_deterministic() {
        let rights = AccessRights::new(AccessType::Permit);
        let first = compute(&rights, false, Some("submitted"), true);
        let second = compute(&rights, false, Some("submitted"), true);
        assert_eq!(first, second);
    }

    #[test]
    fn test_wall_clock_variant() {
        let rights = AccessRights::embargo("2000-01-01");
        assert!(compute_restrictions(&rights, false, None, false, DEFAULT_TIMEZONE).open);
        let rights = AccessRights::embargo("2999-01-01");
        assert!(!compute_restrictions(&rights, false, None, false, DEFAULT_TIMEZONE).open);
    }
}
