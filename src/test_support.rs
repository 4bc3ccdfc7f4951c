//! In-memory fakes and builders shared by the test modules.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use actix_web::dev::{Service, ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::http::StatusCode;
use actix_web::{test, web, App};
use async_trait::async_trait;
use chrono::NaiveDate;
use dashmap::DashMap;
use mongodb::bson::oid::ObjectId;

use crate::config::Config;
use crate::constants::{
    CODE_ACCOUNT_EXISTS, CODE_CONTACT_EMAIL_EXISTS, ERR_ACCOUNT_EXISTS, ERR_CONTACT_EMAIL_EXISTS,
};
use crate::errors::ApiError;
use crate::handlers::HealthProbe;
use crate::models::{Contact, ContactData, ContactFilter, TokenResponse, User};
use crate::repositories::{ContactRepository, UserRepository};
use crate::routes::configure_routes;
use crate::services::avatar_service::{AvatarStore, AvatarUpload};
use crate::services::mail_service::{EmailMessage, EmailSender, MailError};
use crate::services::user_cache::MemoryUserCache;
use crate::services::{
    AuthService, AvatarService, ContactService, JwtKeys, MailService, TokenBlacklist,
};

pub fn test_config() -> Config {
    Config::from_lookup(|key| match key {
        "SECRET_KEY" => Some("test-secret".to_string()),
        _ => None,
    })
    .expect("test configuration is valid")
}

#[derive(Default)]
pub struct MemoryUserRepository {
    users: DashMap<String, User>,
}

#[async_trait]
impl UserRepository for MemoryUserRepository {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, ApiError> {
        Ok(self.users.get(&email.to_lowercase()).map(|u| u.value().clone()))
    }

    async fn create(
        &self,
        email: &str,
        password_hash: &str,
        avatar: Option<String>,
    ) -> Result<User, ApiError> {
        let email = email.to_lowercase();
        if self.users.contains_key(&email) {
            return Err(ApiError::conflict(CODE_ACCOUNT_EXISTS, ERR_ACCOUNT_EXISTS));
        }
        let user = User {
            id: Some(ObjectId::new()),
            email: email.clone(),
            password_hash: password_hash.to_string(),
            avatar,
            refresh_token: None,
            confirmed: false,
            created_at: mongodb::bson::DateTime::now(),
        };
        self.users.insert(email, user.clone());
        Ok(user)
    }

    async fn confirm_email(&self, email: &str) -> Result<(), ApiError> {
        if let Some(mut user) = self.users.get_mut(&email.to_lowercase()) {
            user.confirmed = true;
        }
        Ok(())
    }

    async fn update_token(&self, id: ObjectId, token: Option<&str>) -> Result<(), ApiError> {
        for mut user in self.users.iter_mut() {
            if user.id == Some(id) {
                user.refresh_token = token.map(str::to_string);
            }
        }
        Ok(())
    }

    async fn update_avatar(
        &self,
        email: &str,
        avatar_url: &str,
    ) -> Result<Option<User>, ApiError> {
        Ok(self.users.get_mut(&email.to_lowercase()).map(|mut user| {
            user.avatar = Some(avatar_url.to_string());
            user.value().clone()
        }))
    }
}

/// Contacts kept in insertion order, which stands in for creation time.
#[derive(Default)]
pub struct MemoryContactRepository {
    contacts: Mutex<Vec<Contact>>,
}

#[async_trait]
impl ContactRepository for MemoryContactRepository {
    async fn find_by_id(&self, owner: ObjectId, id: ObjectId) -> Result<Option<Contact>, ApiError> {
        let contacts = self.contacts.lock().unwrap();
        Ok(contacts
            .iter()
            .find(|c| c.user_id == owner && c.id == Some(id))
            .cloned())
    }

    async fn find_by_email(
        &self,
        owner: ObjectId,
        email: &str,
    ) -> Result<Option<Contact>, ApiError> {
        let contacts = self.contacts.lock().unwrap();
        Ok(contacts
            .iter()
            .find(|c| c.user_id == owner && c.email == email)
            .cloned())
    }

    async fn find_many(
        &self,
        owner: ObjectId,
        filter: &ContactFilter,
        skip: u64,
        limit: u64,
    ) -> Result<Vec<Contact>, ApiError> {
        let contacts = self.contacts.lock().unwrap();
        Ok(contacts
            .iter()
            .filter(|c| c.user_id == owner && filter.matches(c))
            .skip(skip as usize)
            .take(limit as usize)
            .cloned()
            .collect())
    }

    async fn find_all(&self, owner: ObjectId) -> Result<Vec<Contact>, ApiError> {
        let contacts = self.contacts.lock().unwrap();
        Ok(contacts
            .iter()
            .filter(|c| c.user_id == owner)
            .cloned()
            .collect())
    }

    async fn insert(&self, mut contact: Contact) -> Result<Contact, ApiError> {
        let mut contacts = self.contacts.lock().unwrap();
        if contacts
            .iter()
            .any(|c| c.user_id == contact.user_id && c.email == contact.email)
        {
            return Err(ApiError::bad_request(
                CODE_CONTACT_EMAIL_EXISTS,
                ERR_CONTACT_EMAIL_EXISTS,
            ));
        }
        contact.id = Some(ObjectId::new());
        contacts.push(contact.clone());
        Ok(contact)
    }

    async fn update(
        &self,
        owner: ObjectId,
        id: ObjectId,
        data: ContactData,
    ) -> Result<Option<Contact>, ApiError> {
        let mut contacts = self.contacts.lock().unwrap();
        Ok(contacts
            .iter_mut()
            .find(|c| c.user_id == owner && c.id == Some(id))
            .map(|contact| {
                contact.apply(data);
                contact.clone()
            }))
    }

    async fn delete(&self, owner: ObjectId, id: ObjectId) -> Result<bool, ApiError> {
        let mut contacts = self.contacts.lock().unwrap();
        let before = contacts.len();
        contacts.retain(|c| !(c.user_id == owner && c.id == Some(id)));
        Ok(contacts.len() < before)
    }
}

#[derive(Default)]
pub struct RecordingEmailSender {
    sent: Mutex<Vec<EmailMessage>>,
}

impl RecordingEmailSender {
    pub fn sent(&self) -> Vec<EmailMessage> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait]
impl EmailSender for RecordingEmailSender {
    async fn send(&self, message: &EmailMessage) -> Result<(), MailError> {
        self.sent.lock().unwrap().push(message.clone());
        Ok(())
    }
}

/// Avatar store returning `memory://{user_id}.{ext}` URLs.
pub struct MemoryAvatarStore;

#[async_trait]
impl AvatarStore for MemoryAvatarStore {
    async fn store(&self, user_id: &str, upload: AvatarUpload) -> Result<String, ApiError> {
        Ok(format!("memory://{}.{}", user_id, upload.extension()))
    }
}

/// Health probe with a fixed answer; `None` simulates an unreachable database.
pub struct StaticProbe(pub Option<bool>);

#[async_trait]
impl HealthProbe for StaticProbe {
    async fn ping(&self) -> Result<bool, ApiError> {
        self.0.ok_or_else(|| {
            ApiError::internal(crate::constants::CODE_INTERNAL_ERROR, "connection refused")
        })
    }
}

pub struct TestServices {
    pub users: Arc<MemoryUserRepository>,
    pub cache: Arc<MemoryUserCache>,
    pub mail_sender: Arc<RecordingEmailSender>,
    pub auth: web::Data<AuthService>,
    pub mail: web::Data<MailService>,
    pub avatars: web::Data<AvatarService>,
    pub contacts: web::Data<ContactService>,
    pub probe: web::Data<dyn HealthProbe>,
}

pub fn test_services() -> TestServices {
    let config = test_config();
    let keys = JwtKeys::from_config(&config);
    let users = Arc::new(MemoryUserRepository::default());
    let cache = Arc::new(MemoryUserCache::new(config.user_cache_ttl_secs));
    let mail_sender = Arc::new(RecordingEmailSender::default());
    let probe: Arc<dyn HealthProbe> = Arc::new(StaticProbe(Some(true)));

    TestServices {
        auth: web::Data::new(AuthService::new(
            users.clone(),
            cache.clone(),
            TokenBlacklist::new(),
            keys.clone(),
        )),
        mail: web::Data::new(MailService::new(mail_sender.clone(), keys)),
        avatars: web::Data::new(AvatarService::new(
            Arc::new(MemoryAvatarStore),
            users.clone(),
            cache.clone(),
        )),
        contacts: web::Data::new(ContactService::new(Arc::new(
            MemoryContactRepository::default(),
        ))),
        probe: web::Data::from(probe),
        users,
        cache,
        mail_sender,
    }
}

impl TestServices {
    /// Create a confirmed account. Uses a cheap bcrypt cost.
    pub async fn confirmed_user(&self, email: &str, password: &str) -> User {
        let hash = bcrypt::hash(password, 4).unwrap();
        self.users.create(email, &hash, None).await.unwrap();
        self.users.confirm_email(email).await.unwrap();
        self.users.find_by_email(email).await.unwrap().unwrap()
    }

    /// Confirmed account with a fresh token pair; the password is `secret123`.
    pub async fn logged_in(&self, email: &str) -> TokenResponse {
        self.confirmed_user(email, "secret123").await;
        self.auth.login(email, "secret123").await.unwrap()
    }

    /// Wait for background mail tasks to deliver at least `count` messages.
    pub async fn wait_for_mail(&self, count: usize) -> Vec<EmailMessage> {
        for _ in 0..100 {
            let sent = self.mail_sender.sent();
            if sent.len() >= count {
                return sent;
            }
            actix_web::rt::time::sleep(Duration::from_millis(10)).await;
        }
        self.mail_sender.sent()
    }
}

pub fn test_app(
    services: &TestServices,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    App::new()
        .app_data(services.auth.clone())
        .app_data(services.mail.clone())
        .app_data(services.avatars.clone())
        .app_data(services.contacts.clone())
        .app_data(services.probe.clone())
        .configure(configure_routes)
}

/// Status of a request, including errors raised by middleware.
pub async fn response_status<S, R, B>(app: &S, req: R) -> StatusCode
where
    S: Service<R, Response = ServiceResponse<B>, Error = actix_web::Error>,
{
    match test::try_call_service(app, req).await {
        Ok(resp) => resp.status(),
        Err(err) => err.as_response_error().status_code(),
    }
}

pub fn contact_data(email: &str, birth_date: NaiveDate) -> ContactData {
    ContactData {
        first_name: "Test".to_string(),
        last_name: "Contact".to_string(),
        email: email.to_string(),
        phone: "+380501234567".to_string(),
        birth_date,
        bio: String::new(),
    }
}
