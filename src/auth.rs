//! Admin access gate
//!
//! Every admin request re-presents the shared secret in the Admin-Password
//! header; there are no sessions or tokens. Handlers call `require_admin`
//! before touching either store so denied requests never reach them.

use crate::config::AppConfig;
use crate::error::ApiError;
use actix_web::HttpRequest;
use log::warn;

/// Header carrying the admin shared secret in cleartext
pub const ADMIN_PASSWORD_HEADER: &str = "Admin-Password";

/// Check the request's admin secret against the configured value
pub fn require_admin(req: &HttpRequest, config: &AppConfig) -> Result<(), ApiError> {
    let provided = req
        .headers()
        .get(ADMIN_PASSWORD_HEADER)
        .and_then(|v| v.to_str().ok())
        .ok_or_else(|| {
            warn!("Admin request without {} header", ADMIN_PASSWORD_HEADER);
            ApiError::Unauthorized
        })?;

    if provided != config.admin.secret {
        warn!("Admin request with wrong secret");
        return Err(ApiError::Unauthorized);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::test::TestRequest;

    fn config_with_secret(secret: &str) -> AppConfig {
        let mut config = AppConfig::default();
        config.admin.secret = secret.to_string();
        config
    }

    #[test]
    fn test_correct_secret_is_allowed() {
        let req = TestRequest::default()
            .insert_header((ADMIN_PASSWORD_HEADER, "hunter2"))
            .to_http_request();
        assert!(require_admin(&req, &config_with_secret("hunter2")).is_ok());
    }

    #[test]
    fn test_wrong_secret_is_denied() {
        let req = TestRequest::default()
            .insert_header((ADMIN_PASSWORD_HEADER, "guess"))
            .to_http_request();
        assert!(matches!(
            require_admin(&req, &config_with_secret("hunter2")),
            Err(ApiError::Unauthorized)
        ));
    }

    #[test]
    fn test_missing_header_is_denied() {
        let req = TestRequest::default().to_http_request();
        assert!(matches!(
            require_admin(&req, &config_with_secret("hunter2")),
            Err(ApiError::Unauthorized)
        ));
    }
}
