use serde::Serialize;
use utoipa::ToSchema;

use shelf_core::FieldError;
use shelf_infra::AccessToken;

use crate::context::PrincipalContext;

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AccessTokenResponse {
    /// HS256 bearer token for the `Authorization` header.
    pub access_token: String,
}

impl From<AccessToken> for AccessTokenResponse {
    fn from(token: AccessToken) -> Self {
        Self {
            access_token: token.access_token,
        }
    }
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct WhoAmIResponse {
    pub id: String,
    pub email: String,
}

impl From<&PrincipalContext> for WhoAmIResponse {
    fn from(principal: &PrincipalContext) -> Self {
        Self {
            id: principal.account_id().to_string(),
            email: principal.email().to_string(),
        }
    }
}

/// Body of every non-2xx response.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ErrorResponse {
    /// Machine-readable code, e.g. `validation_error` or `not_found`.
    pub error: String,
    pub message: String,
    /// Present on `validation_error` only.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fields: Option<Vec<FieldError>>,
}
