//! Request extension trait for reading the authenticated user.

use actix_web::HttpMessage;

use crate::models::CurrentUser;

/// Extension trait for reading what the AuthMiddleware attached to a request.
pub trait RequestExt {
    /// The authenticated user, or `None` on unauthenticated routes.
    fn current_user(&self) -> Option<CurrentUser>;
}

impl RequestExt for actix_web::HttpRequest {
    fn current_user(&self) -> Option<CurrentUser> {
        self.extensions().get::<CurrentUser>().cloned()
    }
}
