use crate::{
    auth::Claims,
    errors::{AppError, AppResult},
    models::domain::user::UserRole,
};

pub fn require_admin(claims: &Claims) -> AppResult<()> {
    if claims.role != UserRole::Admin {
        return Err(AppError::Forbidden(
            "Only admins can perform this action".to_string(),
        ));
    }
    Ok(())
}

/// Owner check for user-scoped resources. Admins may read everything.
pub fn require_owner(claims: &Claims, resource_owner_id: &str) -> AppResult<()> {
    if claims.role != UserRole::Admin && claims.sub != resource_owner_id {
        return Err(AppError::Forbidden(
            "You can only access your own resources".to_string(),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_test_claims(user_id: &str, role: UserRole) -> Claims {
        Claims {
            sub: user_id.to_string(),
            username: format!("{}-name", user_id),
            role,
            iat: 0,
            exp: 9999999999,
        }
    }

    #[test]
    fn test_require_admin_success() {
        let claims = create_test_claims("admin-1", UserRole::Admin);
        assert!(require_admin(&claims).is_ok());
    }

    #[test]
    fn test_require_admin_failure() {
        let claims = create_test_claims("user-1", UserRole::User);
        assert!(require_admin(&claims).is_err());
    }

    #[test]
    fn test_require_owner_as_owner() {
        let claims = create_test_claims("user-1", UserRole::User);
        assert!(require_owner(&claims, "user-1").is_ok());
    }

    #[test]
    fn test_require_owner_as_admin() {
        let claims = create_test_claims("admin-1", UserRole::Admin);
        assert!(require_owner(&claims, "someone-else").is_ok());
    }

    #[test]
    fn test_require_owner_failure() {
        let claims = create_test_claims("user-1", UserRole::User);
        let result = require_owner(&claims, "user-2");

        assert!(matches!(result, Err(AppError::Forbidden(_))));
    }
}
