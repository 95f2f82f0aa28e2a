//! Property offerings.
//!
//! Reads are public. Writes need `create-property`, `update-property` or
//! `delete-property`, all of which the decision table grants to admins
//! only. Non-admins see [`PropertyStatus::Active`] and
//! [`PropertyStatus::Funding`] offerings and nothing else; a hidden offering
//! answers 404, not 403, so drafts do not leak their existence.

use brickvault_compliance::{
    AuditAction, FieldIssue, PropertyListing, PropertyUpdate, ValidationError,
};
use brickvault_rbac::{Action, can_manage_properties};
use brickvault_types::{Identity, PropertyId, PropertyStatus, UserId};
use chrono::Utc;
use serde::Deserialize;
use tracing::info;

use crate::error::{PlatformError, Result};
use crate::platform::Platform;
use crate::store::PropertyRecord;
use crate::views::PropertyView;

/// Listing filters. All set fields must match.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PropertyFilter {
    /// Honored for admins only.
    #[serde(default)]
    pub status: Option<PropertyStatus>,
    /// Exact city match.
    #[serde(default)]
    pub city: Option<String>,
    /// Case-insensitive substring of title, description or city.
    #[serde(default)]
    pub search: Option<String>,
}

impl PropertyFilter {
    fn matches(&self, record: &PropertyRecord, admin: bool) -> bool {
        let status_ok = if admin {
            self.status.is_none_or(|status| record.status == status)
        } else {
            record.status.is_listed()
        };
        let city_ok = self
            .city
            .as_deref()
            .is_none_or(|city| record.listing.city == city);
        let search_ok = self.search.as_deref().is_none_or(|term| {
            let term = term.to_lowercase();
            [
                &record.listing.title,
                &record.listing.description,
                &record.listing.city,
            ]
            .iter()
            .any(|field| field.to_lowercase().contains(&term))
        });
        status_ok && city_ok && search_ok
    }
}

fn is_admin(identity: &Identity) -> bool {
    can_manage_properties(identity.role)
}

pub struct PropertyService<'a> {
    platform: &'a Platform,
}

impl<'a> PropertyService<'a> {
    pub(crate) fn new(platform: &'a Platform) -> Self {
        Self { platform }
    }

    /// Offerings visible to `actor`, newest first.
    pub fn list(
        &self,
        actor: Option<UserId>,
        filter: &PropertyFilter,
    ) -> Result<Vec<PropertyView>> {
        let identity = self.platform.authorize(actor, Action::ViewProperties)?;
        let admin = is_admin(&identity);

        Ok(self
            .platform
            .store()
            .properties()?
            .iter()
            .filter(|record| filter.matches(record, admin))
            .map(PropertyView::from)
            .collect())
    }

    /// One offering. Hidden statuses are not found for non-admins.
    pub fn get(&self, actor: Option<UserId>, property_id: PropertyId) -> Result<PropertyView> {
        let identity = self.platform.authorize(actor, Action::ViewPropertyDetails)?;

        match self.platform.store().property(property_id)? {
            Some(record) if is_admin(&identity) || record.status.is_listed() => {
                Ok(PropertyView::from(&record))
            }
            _ => Err(PlatformError::not_found("Property", property_id)),
        }
    }

    /// Lists a new offering as a draft. Requires `create-property`.
    pub fn create(
        &self,
        actor: Option<UserId>,
        listing: &PropertyListing,
    ) -> Result<PropertyView> {
        self.platform.authorize(actor, Action::CreateProperty)?;
        listing.validate()?;

        let funding_goal_cents = listing.funding_goal_cents().ok_or_else(|| ValidationError {
            issues: vec![FieldIssue {
                field: "totalShares",
                message: "Funding goal is too large".to_string(),
            }],
        })?;

        let now = Utc::now();
        let record = PropertyRecord {
            property_id: PropertyId::generate(),
            listing: listing.clone(),
            status: PropertyStatus::Draft,
            available_shares: listing.total_shares,
            funding_goal_cents,
            current_funding_cents: 0,
            created_at: now,
            updated_at: now,
        };
        self.platform.store().insert_property(record.clone())?;

        self.platform.record(
            AuditAction::PropertyCreated {
                property_id: record.property_id,
                title: record.listing.title.clone(),
            },
            actor,
        )?;
        info!(property_id = %record.property_id, "Property created");

        Ok(PropertyView::from(&record))
    }

    /// Edits an offering. Requires `update-property`.
    ///
    /// The merged listing is validated as a whole before anything is stored.
    pub fn update(
        &self,
        actor: Option<UserId>,
        property_id: PropertyId,
        update: &PropertyUpdate,
    ) -> Result<PropertyView> {
        self.platform.authorize(actor, Action::UpdateProperty)?;

        let store = self.platform.store();
        let mut record = store
            .property(property_id)?
            .ok_or_else(|| PlatformError::not_found("Property", property_id))?;

        update.apply_to(&mut record.listing);
        record.listing.validate()?;
        if let Some(status) = update.status {
            record.status = status;
        }
        record.updated_at = Utc::now();
        store.update_property(record.clone())?;

        self.platform.record(
            AuditAction::PropertyUpdated {
                property_id,
                status: record.status,
            },
            actor,
        )?;
        info!(property_id = %property_id, status = %record.status, "Property updated");

        Ok(PropertyView::from(&record))
    }

    /// Removes an offering. Requires `delete-property`.
    pub fn delete(&self, actor: Option<UserId>, property_id: PropertyId) -> Result<()> {
        self.platform.authorize(actor, Action::DeleteProperty)?;
        self.platform.store().delete_property(property_id)?;

        self.platform
            .record(AuditAction::PropertyDeleted { property_id }, actor)?;
        info!(property_id = %property_id, "Property deleted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{listing, operator, platform};
    use brickvault_compliance::AuditQuery;

    fn publish(
        platform: &Platform,
        ops: UserId,
        title: &str,
        status: PropertyStatus,
    ) -> PropertyId {
        let mut l = listing();
        l.title = title.to_string();
        let created = platform.properties().create(Some(ops), &l).unwrap();
        if status != PropertyStatus::Draft {
            let update = PropertyUpdate {
                status: Some(status),
                ..PropertyUpdate::default()
            };
            platform
                .properties()
                .update(Some(ops), created.property_id, &update)
                .unwrap();
        }
        created.property_id
    }

    #[test]
    fn test_only_admins_create() {
        let platform = platform();
        let jane = platform.accounts().register("jane@example.com", "Jane").unwrap();

        let err = platform
            .properties()
            .create(Some(jane.user_id), &listing())
            .unwrap_err();
        assert_eq!(err.http_status(), 403);

        let err = platform.properties().create(None, &listing()).unwrap_err();
        assert_eq!(err.http_status(), 401);
    }

    #[test]
    fn test_create_starts_as_unfunded_draft() {
        let platform = platform();
        let ops = operator(&platform);

        let view = platform.properties().create(Some(ops), &listing()).unwrap();

        assert_eq!(view.status, PropertyStatus::Draft);
        assert_eq!(view.available_shares, 12_000);
        assert_eq!(view.funding_goal_cents, 12_000 * 10_000);
        assert_eq!(view.current_funding_cents, 0);

        let created = platform
            .audit_events(Some(ops), &AuditQuery::default().with_entity("PROPERTY"))
            .unwrap();
        assert_eq!(created.len(), 1);
        assert_eq!(created[0].entity_id, Some(view.property_id.to_string()));
    }

    #[test]
    fn test_invalid_listing_is_not_stored() {
        let platform = platform();
        let ops = operator(&platform);
        let mut bad = listing();
        bad.description = "Too short".into();

        let err = platform.properties().create(Some(ops), &bad).unwrap_err();
        assert_eq!(err.http_status(), 400);
        assert!(platform.store().properties().unwrap().is_empty());
    }

    #[test]
    fn test_drafts_are_hidden_from_non_admins() {
        let platform = platform();
        let ops = operator(&platform);
        let jane = platform.accounts().register("jane@example.com", "Jane").unwrap();

        let draft = publish(&platform, ops, "Harbour View Draft", PropertyStatus::Draft);
        let active = publish(&platform, ops, "Harbour View Active", PropertyStatus::Active);
        publish(&platform, ops, "Harbour View Funding", PropertyStatus::Funding);
        publish(&platform, ops, "Harbour View Closed", PropertyStatus::Closed);

        for actor in [None, Some(jane.user_id)] {
            let seen = platform
                .properties()
                .list(actor, &PropertyFilter::default())
                .unwrap();
            assert_eq!(seen.len(), 2);
            assert!(seen.iter().all(|p| p.status.is_listed()));

            // A status filter does not widen what investors see.
            let drafts = PropertyFilter {
                status: Some(PropertyStatus::Draft),
                ..PropertyFilter::default()
            };
            assert_eq!(platform.properties().list(actor, &drafts).unwrap().len(), 2);

            assert_eq!(platform.properties().get(actor, draft).unwrap_err().http_status(), 404);
            assert!(platform.properties().get(actor, active).is_ok());
        }

        let all = platform.properties().list(Some(ops), &PropertyFilter::default()).unwrap();
        assert_eq!(all.len(), 4);
        let drafts = PropertyFilter {
            status: Some(PropertyStatus::Draft),
            ..PropertyFilter::default()
        };
        let only_drafts = platform.properties().list(Some(ops), &drafts).unwrap();
        assert_eq!(only_drafts.len(), 1);
        assert_eq!(only_drafts[0].property_id, draft);
        assert!(platform.properties().get(Some(ops), draft).is_ok());
    }

    #[test]
    fn test_city_and_search_filters() {
        let platform = platform();
        let ops = operator(&platform);
        let lofts = publish(&platform, ops, "Riverside Lofts", PropertyStatus::Active);
        publish(&platform, ops, "Garden Court", PropertyStatus::Active);

        let search = PropertyFilter {
            search: Some("RIVERSIDE".into()),
            ..PropertyFilter::default()
        };
        let found = platform.properties().list(None, &search).unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].property_id, lofts);

        let nairobi = PropertyFilter {
            city: Some("Nairobi".into()),
            ..PropertyFilter::default()
        };
        assert_eq!(platform.properties().list(None, &nairobi).unwrap().len(), 2);

        let mombasa = PropertyFilter {
            city: Some("Mombasa".into()),
            ..PropertyFilter::default()
        };
        assert!(platform.properties().list(None, &mombasa).unwrap().is_empty());
    }

    #[test]
    fn test_update_revalidates_and_delete_audits() {
        let platform = platform();
        let ops = operator(&platform);
        let id = publish(&platform, ops, "Riverside Lofts", PropertyStatus::Draft);

        let bad = PropertyUpdate {
            expected_annual_return: Some(250.0),
            ..PropertyUpdate::default()
        };
        let err = platform.properties().update(Some(ops), id, &bad).unwrap_err();
        assert_eq!(err.http_status(), 400);
        assert!(
            (platform.properties().get(Some(ops), id).unwrap().listing.expected_annual_return - 8.5)
                .abs()
                < f64::EPSILON
        );

        let jane = platform.accounts().register("jane@example.com", "Jane").unwrap();
        assert_eq!(
            platform.properties().delete(Some(jane.user_id), id).unwrap_err().http_status(),
            403
        );

        platform.properties().delete(Some(ops), id).unwrap();
        assert_eq!(platform.properties().get(Some(ops), id).unwrap_err().http_status(), 404);
        assert_eq!(platform.properties().delete(Some(ops), id).unwrap_err().http_status(), 404);

        let deleted = platform
            .audit_events(Some(ops), &AuditQuery::default().with_action_type("PropertyDeleted"))
            .unwrap();
        assert_eq!(deleted.len(), 1);
    }
}
