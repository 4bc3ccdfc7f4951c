//! Contact management scoped to the authenticated owner.

use std::sync::Arc;

use chrono::{Datelike, Duration, NaiveDate};
use log::{debug, info};
use mongodb::bson::oid::ObjectId;

use crate::constants::{
    BIRTHDAY_WINDOW_DAYS, CODE_CONTACT_EMAIL_EXISTS, CODE_CONTACT_NOT_FOUND,
    CODE_INTERNAL_ERROR, CODE_INVALID_CONTACT_ID, ERR_CONTACT_EMAIL_EXISTS,
    ERR_FAILED_FETCH_USER, ERR_INVALID_CONTACT_ID, ERR_NOT_FOUND,
};
use crate::errors::ApiError;
use crate::models::{Contact, ContactData, ContactFilter, User};
use crate::repositories::ContactRepository;

/// Date on which a birthday is next celebrated, on or after `today`.
///
/// A 29 February birthday falls on 28 February in non-leap years.
pub fn next_birthday(birth_date: NaiveDate, today: NaiveDate) -> NaiveDate {
    let in_year = |year: i32| {
        NaiveDate::from_ymd_opt(year, birth_date.month(), birth_date.day())
            .or_else(|| NaiveDate::from_ymd_opt(year, 2, 28))
            .unwrap_or(today)
    };

    let this_year = in_year(today.year());
    if this_year >= today {
        this_year
    } else {
        in_year(today.year() + 1)
    }
}

fn not_found() -> ApiError {
    ApiError::not_found(CODE_CONTACT_NOT_FOUND, ERR_NOT_FOUND)
}

fn email_taken() -> ApiError {
    ApiError::bad_request(CODE_CONTACT_EMAIL_EXISTS, ERR_CONTACT_EMAIL_EXISTS)
}

/// Parse a contact id from a path segment.
pub fn parse_contact_id(id: &str) -> Result<ObjectId, ApiError> {
    ObjectId::parse_str(id)
        .map_err(|_| ApiError::bad_request(CODE_INVALID_CONTACT_ID, ERR_INVALID_CONTACT_ID))
}

fn owner_id(owner: &User) -> Result<ObjectId, ApiError> {
    owner
        .id
        .ok_or_else(|| ApiError::internal(CODE_INTERNAL_ERROR, ERR_FAILED_FETCH_USER))
}

/// Service for contact operations.
pub struct ContactService {
    contacts: Arc<dyn ContactRepository>,
}

impl ContactService {
    pub fn new(contacts: Arc<dyn ContactRepository>) -> Self {
        Self { contacts }
    }

    pub async fn create(&self, owner: &User, data: ContactData) -> Result<Contact, ApiError> {
        let owner_id = owner_id(owner)?;
        if self
            .contacts
            .find_by_email(owner_id, &data.email)
            .await?
            .is_some()
        {
            return Err(email_taken());
        }

        let contact = self.contacts.insert(Contact::new(owner_id, data)).await?;
        info!("Contact created: {}", contact.id.map(|id| id.to_hex()).unwrap_or_default());
        Ok(contact)
    }

    pub async fn list(
        &self,
        owner: &User,
        filter: &ContactFilter,
        skip: u64,
        limit: u64,
    ) -> Result<Vec<Contact>, ApiError> {
        debug!("Listing contacts with {:?}, skip={}, limit={}", filter, skip, limit);
        self.contacts
            .find_many(owner_id(owner)?, filter, skip, limit)
            .await
    }

    pub async fn get(&self, owner: &User, id: &str) -> Result<Contact, ApiError> {
        let id = parse_contact_id(id)?;
        self.contacts
            .find_by_id(owner_id(owner)?, id)
            .await?
            .ok_or_else(not_found)
    }

    /// Replace every editable field of a contact.
    pub async fn update(
        &self,
        owner: &User,
        id: &str,
        data: ContactData,
    ) -> Result<Contact, ApiError> {
        let id = parse_contact_id(id)?;
        let owner_id = owner_id(owner)?;

        if self.contacts.find_by_id(owner_id, id).await?.is_none() {
            return Err(not_found());
        }
        if let Some(holder) = self.contacts.find_by_email(owner_id, &data.email).await? {
            if holder.id != Some(id) {
                return Err(email_taken());
            }
        }

        let contact = self
            .contacts
            .update(owner_id, id, data)
            .await?
            .ok_or_else(not_found)?;
        info!("Contact updated: {}", id);
        Ok(contact)
    }

    pub async fn remove(&self, owner: &User, id: &str) -> Result<(), ApiError> {
        let id = parse_contact_id(id)?;
        if !self.contacts.delete(owner_id(owner)?, id).await? {
            return Err(not_found());
        }
        info!("Contact deleted: {}", id);
        Ok(())
    }

    /// Contacts with a birthday in the next seven days (today included),
    /// soonest first.
    pub async fn upcoming_birthdays(
        &self,
        owner: &User,
        today: NaiveDate,
        skip: u64,
        limit: u64,
    ) -> Result<Vec<Contact>, ApiError> {
        let window_end = today + Duration::days(BIRTHDAY_WINDOW_DAYS);

        let mut upcoming: Vec<(NaiveDate, Contact)> = self
            .contacts
            .find_all(owner_id(owner)?)
            .await?
            .into_iter()
            .map(|contact| (next_birthday(contact.birth_date, today), contact))
            .filter(|(date, _)| *date < window_end)
            .collect();
        upcoming.sort_by_key(|(date, _)| *date);

        Ok(upcoming
            .into_iter()
            .skip(skip as usize)
            .take(limit as usize)
            .map(|(_, contact)| contact)
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{contact_data, test_services};

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn next_birthday_rolls_into_next_year() {
        assert_eq!(next_birthday(date(1990, 3, 10), date(2024, 3, 10)), date(2024, 3, 10));
        assert_eq!(next_birthday(date(1990, 3, 9), date(2024, 3, 10)), date(2025, 3, 9));
        assert_eq!(next_birthday(date(1990, 1, 2), date(2024, 12, 29)), date(2025, 1, 2));
    }

    #[test]
    fn leap_day_birthdays_move_to_feb_28() {
        assert_eq!(next_birthday(date(2000, 2, 29), date(2023, 2, 1)), date(2023, 2, 28));
        assert_eq!(next_birthday(date(2000, 2, 29), date(2024, 2, 1)), date(2024, 2, 29));
        assert_eq!(next_birthday(date(2000, 2, 29), date(2023, 3, 1)), date(2024, 2, 29));
    }

    #[actix_web::test]
    async fn upcoming_birthdays_window_wraps_year_end() {
        let services = test_services();
        let owner = services.confirmed_user("jane@example.com", "secret123").await;
        let contacts = &services.contacts;

        for (email, birth) in [
            ("jan3@example.com", date(1991, 1, 3)),
            ("dec30@example.com", date(1985, 12, 30)),
            ("jan4@example.com", date(1992, 1, 4)),
            ("dec28@example.com", date(1980, 12, 28)),
            ("june@example.com", date(1990, 6, 1)),
        ] {
            contacts
                .create(&owner, contact_data(email, birth))
                .await
                .unwrap();
        }

        let upcoming = contacts
            .upcoming_birthdays(&owner, date(2024, 12, 29), 0, 10)
            .await
            .unwrap();
        let emails: Vec<&str> = upcoming.iter().map(|c| c.email.as_str()).collect();
        assert_eq!(emails, ["dec30@example.com", "jan3@example.com", "jan4@example.com"]);

        let page = contacts
            .upcoming_birthdays(&owner, date(2024, 12, 29), 1, 1)
            .await
            .unwrap();
        assert_eq!(page[0].email, "jan3@example.com");
    }

    #[actix_web::test]
    async fn window_excludes_seventh_day() {
        let services = test_services();
        let owner = services.confirmed_user("jane@example.com", "secret123").await;
        services
            .contacts
            .create(&owner, contact_data("week@example.com", date(1990, 3, 17)))
            .await
            .unwrap();

        let upcoming = services
            .contacts
            .upcoming_birthdays(&owner, date(2024, 3, 10), 0, 10)
            .await
            .unwrap();
        assert!(upcoming.is_empty());
    }

    #[actix_web::test]
    async fn duplicate_emails_are_rejected_per_owner() {
        let services = test_services();
        let jane = services.confirmed_user("jane@example.com", "secret123").await;
        let john = services.confirmed_user("john@example.com", "secret123").await;
        let data = contact_data("friend@example.com", date(1990, 1, 1));

        services.contacts.create(&jane, data.clone()).await.unwrap();
        let err = services.contacts.create(&jane, data.clone()).await.unwrap_err();
        assert_eq!(err.code(), CODE_CONTACT_EMAIL_EXISTS);

        // Another owner may store the same address.
        assert!(services.contacts.create(&john, data).await.is_ok());
    }

    #[actix_web::test]
    async fn update_checks_email_held_by_other_contact() {
        let services = test_services();
        let owner = services.confirmed_user("jane@example.com", "secret123").await;
        let first = services
            .contacts
            .create(&owner, contact_data("a@example.com", date(1990, 1, 1)))
            .await
            .unwrap();
        services
            .contacts
            .create(&owner, contact_data("b@example.com", date(1990, 1, 1)))
            .await
            .unwrap();
        let first_id = first.id.unwrap().to_hex();

        let err = services
            .contacts
            .update(&owner, &first_id, contact_data("b@example.com", date(1990, 1, 1)))
            .await
            .unwrap_err();
        assert_eq!(err.code(), CODE_CONTACT_EMAIL_EXISTS);

        let mut same_email = contact_data("a@example.com", date(1991, 2, 2));
        same_email.first_name = "Renamed".to_string();
        let updated = services
            .contacts
            .update(&owner, &first_id, same_email)
            .await
            .unwrap();
        assert_eq!(updated.first_name, "Renamed");
        assert_eq!(updated.birth_date, date(1991, 2, 2));
    }

    #[actix_web::test]
    async fn update_of_missing_contact_is_not_found_even_with_taken_email() {
        let services = test_services();
        let owner = services.confirmed_user("jane@example.com", "secret123").await;
        services
            .contacts
            .create(&owner, contact_data("b@example.com", date(1990, 1, 1)))
            .await
            .unwrap();

        let missing = ObjectId::new().to_hex();
        let err = services
            .contacts
            .update(&owner, &missing, contact_data("b@example.com", date(1990, 1, 1)))
            .await
            .unwrap_err();
        assert_eq!(err.code(), CODE_CONTACT_NOT_FOUND);
    }

    #[actix_web::test]
    async fn contacts_are_invisible_to_other_owners() {
        let services = test_services();
        let jane = services.confirmed_user("jane@example.com", "secret123").await;
        let john = services.confirmed_user("john@example.com", "secret123").await;
        let contact = services
            .contacts
            .create(&jane, contact_data("a@example.com", date(1990, 1, 1)))
            .await
            .unwrap();
        let id = contact.id.unwrap().to_hex();

        assert_eq!(
            services.contacts.get(&john, &id).await.unwrap_err().code(),
            CODE_CONTACT_NOT_FOUND
        );
        assert!(services.contacts.remove(&john, &id).await.is_err());
        assert!(services.contacts.remove(&jane, &id).await.is_ok());
        assert!(services.contacts.get(&jane, &id).await.is_err());
    }

    #[actix_web::test]
    async fn malformed_ids_are_bad_requests() {
        let services = test_services();
        let owner = services.confirmed_user("jane@example.com", "secret123").await;

        let err = services.contacts.get(&owner, "not-an-id").await.unwrap_err();
        assert_eq!(err.code(), CODE_INVALID_CONTACT_ID);
    }
}
