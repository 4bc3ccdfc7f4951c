//! Authentication handlers: signup, login, token refresh, email verification
//! and logout.

use actix_web::{web, HttpRequest, HttpResponse};
use log::info;
use validator::Validate;

use crate::constants::MSG_LOGOUT_SUCCESS;
use crate::errors::ApiError;
use crate::middleware::{bearer_token, require_user};
use crate::models::{
    LoginForm, MessageResponse, RequestEmail, SignupRequest, SignupResponse, TokenResponse,
};
use crate::services::{AuthService, MailService};
use crate::utils::mask_email;
use crate::validators::validation_errors_to_api_error;

use super::base_url;

/// Send the verification mail after the response has been produced.
fn schedule_verification(mail: &web::Data<MailService>, email: String, host: String) {
    let mail = mail.clone();
    actix_web::rt::spawn(async move {
        mail.send_verification(&email, &host).await;
    });
}

/// Register a new user account
///
/// A confirmation link is mailed to the address; login is refused until it is followed.
#[utoipa::path(
    post,
    path = "/api/auth/signup",
    tag = "Authentication",
    request_body = SignupRequest,
    responses(
        (status = 201, description = "User registered successfully", body = SignupResponse),
        (status = 400, description = "Validation error", body = crate::models::ErrorResponse),
        (status = 409, description = "Account already exists", body = crate::models::ErrorResponse)
    )
)]
pub async fn signup(
    req: HttpRequest,
    auth_service: web::Data<AuthService>,
    mail_service: web::Data<MailService>,
    body: web::Json<SignupRequest>,
) -> Result<HttpResponse, ApiError> {
    body.validate().map_err(validation_errors_to_api_error)?;

    let user = auth_service.signup(&body.email, &body.password).await?;
    schedule_verification(&mail_service, user.email.clone(), base_url(&req));

    Ok(HttpResponse::Created().json(SignupResponse::new(user)))
}

/// Exchange credentials for an access/refresh token pair
///
/// OAuth2 password flow: `username` carries the email address.
#[utoipa::path(
    post,
    path = "/api/auth/login",
    tag = "Authentication",
    request_body(content = LoginForm, content_type = "application/x-www-form-urlencoded"),
    responses(
        (status = 200, description = "Login successful", body = TokenResponse),
        (status = 400, description = "Validation error", body = crate::models::ErrorResponse),
        (status = 401, description = "Invalid credentials or email not confirmed", body = crate::models::ErrorResponse)
    )
)]
pub async fn login(
    auth_service: web::Data<AuthService>,
    form: web::Form<LoginForm>,
) -> Result<HttpResponse, ApiError> {
    form.validate().map_err(validation_errors_to_api_error)?;

    let tokens = auth_service.login(&form.username, &form.password).await?;
    Ok(HttpResponse::Ok().json(tokens))
}

/// Rotate the token pair using the refresh token from the Authorization header
#[utoipa::path(
    get,
    path = "/api/auth/refresh_token",
    tag = "Authentication",
    responses(
        (status = 200, description = "New token pair", body = TokenResponse),
        (status = 401, description = "Invalid or reused refresh token", body = crate::models::ErrorResponse)
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn refresh_token(
    req: HttpRequest,
    auth_service: web::Data<AuthService>,
) -> Result<HttpResponse, ApiError> {
    let token = bearer_token(req.headers())?;
    let tokens = auth_service.refresh(token).await?;
    Ok(HttpResponse::Ok().json(tokens))
}

/// Confirm an email address from the mailed link
#[utoipa::path(
    get,
    path = "/api/auth/confirmed_email/{token}",
    tag = "Authentication",
    params(
        ("token" = String, Path, description = "Email verification token")
    ),
    responses(
        (status = 200, description = "Email confirmed (or already confirmed)", body = MessageResponse),
        (status = 400, description = "Unknown account", body = crate::models::ErrorResponse),
        (status = 401, description = "Token issued for another purpose", body = crate::models::ErrorResponse),
        (status = 422, description = "Invalid or expired token", body = crate::models::ErrorResponse)
    )
)]
pub async fn confirmed_email(
    auth_service: web::Data<AuthService>,
    path: web::Path<String>,
) -> Result<HttpResponse, ApiError> {
    let message = auth_service.confirm_email(&path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(MessageResponse::new(message)))
}

/// Ask for another confirmation email
#[utoipa::path(
    post,
    path = "/api/auth/request_email",
    tag = "Authentication",
    request_body = RequestEmail,
    responses(
        (status = 200, description = "Request accepted", body = MessageResponse),
        (status = 400, description = "Validation error", body = crate::models::ErrorResponse)
    )
)]
pub async fn request_email(
    req: HttpRequest,
    auth_service: web::Data<AuthService>,
    mail_service: web::Data<MailService>,
    body: web::Json<RequestEmail>,
) -> Result<HttpResponse, ApiError> {
    body.validate().map_err(validation_errors_to_api_error)?;

    let outcome = auth_service.request_email(&body.email).await?;
    if outcome.should_send() {
        info!("Re-sending confirmation to {}", mask_email(&body.email));
        schedule_verification(&mail_service, body.email.to_lowercase(), base_url(&req));
    }

    Ok(HttpResponse::Ok().json(MessageResponse::new(outcome.message())))
}

/// Logout the current user
///
/// The access token is revoked until it expires and the stored refresh token is dropped.
#[utoipa::path(
    post,
    path = "/api/auth/logout",
    tag = "Authentication",
    responses(
        (status = 200, description = "Logout successful", body = MessageResponse),
        (status = 401, description = "Invalid or missing token", body = crate::models::ErrorResponse)
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn logout(
    req: HttpRequest,
    auth_service: web::Data<AuthService>,
) -> Result<HttpResponse, ApiError> {
    let current = require_user(&req)?;
    auth_service.logout(&current).await?;
    Ok(HttpResponse::Ok().json(MessageResponse::new(MSG_LOGOUT_SUCCESS)))
}

#[cfg(test)]
mod tests {
    use crate::test_support::{response_status, test_app, test_services};
    use actix_web::{http::StatusCode, test};
    use serde_json::json;

    #[actix_web::test]
    async fn signup_creates_user_and_mails_confirmation() {
        let services = test_services();
        let app = test::init_service(test_app(&services)).await;

        let req = test::TestRequest::post()
            .uri("/api/auth/signup")
            .insert_header(("Host", "notebook.test"))
            .set_json(json!({ "email": "jane@example.com", "password": "secret123" }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::CREATED);

        let body: serde_json::Value = test::read_body_json(resp).await;
        assert_eq!(body["user"]["email"], "jane@example.com");
        assert_eq!(
            body["detail"],
            "User successfully created. Check your email for confirmation."
        );
        assert!(body["user"].get("password_hash").is_none());

        let sent = services.wait_for_mail(1).await;
        assert_eq!(sent[0].to, "jane@example.com");
        assert!(sent[0]
            .html_body
            .contains("http://notebook.test/api/auth/confirmed_email/"));
    }

    #[actix_web::test]
    async fn signup_validates_and_rejects_duplicates() {
        let services = test_services();
        let app = test::init_service(test_app(&services)).await;

        let bad = test::TestRequest::post()
            .uri("/api/auth/signup")
            .set_json(json!({ "email": "not-an-email", "password": "123" }))
            .to_request();
        let resp = test::call_service(&app, bad).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let body: serde_json::Value = test::read_body_json(resp).await;
        assert_eq!(body["errors"].as_array().unwrap().len(), 2);

        services.confirmed_user("jane@example.com", "secret123").await;
        let dup = test::TestRequest::post()
            .uri("/api/auth/signup")
            .set_json(json!({ "email": "jane@example.com", "password": "secret123" }))
            .to_request();
        assert_eq!(
            test::call_service(&app, dup).await.status(),
            StatusCode::CONFLICT
        );
    }

    #[actix_web::test]
    async fn login_uses_form_and_returns_bearer_pair() {
        let services = test_services();
        services.confirmed_user("jane@example.com", "secret123").await;
        let app = test::init_service(test_app(&services)).await;

        let req = test::TestRequest::post()
            .uri("/api/auth/login")
            .set_form([("username", "jane@example.com"), ("password", "secret123")])
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);

        let body: serde_json::Value = test::read_body_json(resp).await;
        assert_eq!(body["token_type"], "bearer");
        assert!(body["access_token"].is_string());
        assert!(body["refresh_token"].is_string());

        let wrong = test::TestRequest::post()
            .uri("/api/auth/login")
            .set_form([("username", "jane@example.com"), ("password", "nope")])
            .to_request();
        let resp = test::call_service(&app, wrong).await;
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(resp.headers().get("WWW-Authenticate").unwrap(), "Bearer");
    }

    #[actix_web::test]
    async fn refresh_token_endpoint_rotates_pair() {
        let services = test_services();
        services.confirmed_user("jane@example.com", "secret123").await;
        let tokens = services
            .auth
            .login("jane@example.com", "secret123")
            .await
            .unwrap();
        let app = test::init_service(test_app(&services)).await;

        let req = test::TestRequest::get()
            .uri("/api/auth/refresh_token")
            .insert_header(("Authorization", format!("Bearer {}", tokens.refresh_token)))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);

        // An access token is not accepted in place of a refresh token.
        let req = test::TestRequest::get()
            .uri("/api/auth/refresh_token")
            .insert_header(("Authorization", format!("Bearer {}", tokens.access_token)))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
        let body: serde_json::Value = test::read_body_json(resp).await;
        assert_eq!(body["message"], "Invalid scope for token");
    }

    #[actix_web::test]
    async fn confirmed_email_flow() {
        let services = test_services();
        services
            .auth
            .signup("jane@example.com", "secret123")
            .await
            .unwrap();
        let token = services
            .auth
            .keys()
            .create_email_token("jane@example.com")
            .unwrap();
        let app = test::init_service(test_app(&services)).await;

        let uri = format!("/api/auth/confirmed_email/{}", token);
        let resp = test::call_service(&app, test::TestRequest::get().uri(&uri).to_request()).await;
        assert_eq!(resp.status(), StatusCode::OK);
        let body: serde_json::Value = test::read_body_json(resp).await;
        assert_eq!(body["message"], "Email confirmed");

        let resp = test::call_service(&app, test::TestRequest::get().uri(&uri).to_request()).await;
        let body: serde_json::Value = test::read_body_json(resp).await;
        assert_eq!(body["message"], "Your email is already confirmed");

        let resp = test::call_service(
            &app,
            test::TestRequest::get()
                .uri("/api/auth/confirmed_email/garbage")
                .to_request(),
        )
        .await;
        assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[actix_web::test]
    async fn request_email_only_mails_pending_accounts() {
        let services = test_services();
        services
            .auth
            .signup("pending@example.com", "secret123")
            .await
            .unwrap();
        let app = test::init_service(test_app(&services)).await;

        for email in ["nobody@example.com", "pending@example.com"] {
            let req = test::TestRequest::post()
                .uri("/api/auth/request_email")
                .set_json(json!({ "email": email }))
                .to_request();
            let resp = test::call_service(&app, req).await;
            let body: serde_json::Value = test::read_body_json(resp).await;
            assert_eq!(body["message"], "Check your email for confirmation.");
        }

        let sent = services.wait_for_mail(1).await;
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].to, "pending@example.com");
    }

    #[actix_web::test]
    async fn logout_revokes_access_token() {
        let services = test_services();
        services.confirmed_user("jane@example.com", "secret123").await;
        let tokens = services
            .auth
            .login("jane@example.com", "secret123")
            .await
            .unwrap();
        let app = test::init_service(test_app(&services)).await;
        let bearer = format!("Bearer {}", tokens.access_token);

        let req = test::TestRequest::post()
            .uri("/api/auth/logout")
            .insert_header(("Authorization", bearer.clone()))
            .to_request();
        assert_eq!(response_status(&app, req).await, StatusCode::OK);

        let req = test::TestRequest::get()
            .uri("/api/users/me")
            .insert_header(("Authorization", bearer))
            .to_request();
        assert_eq!(response_status(&app, req).await, StatusCode::UNAUTHORIZED);
    }
}
