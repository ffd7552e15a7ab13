//! Wire types shared by the API endpoints

use serde::{Deserialize, Serialize};

use crate::session::{Role, Session};

/// One `{id, label}` pair from a lookup catalog
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogEntry {
    pub id: i64,
    #[serde(alias = "name")]
    pub label: String,
}

impl CatalogEntry {
    pub fn new(id: i64, label: impl Into<String>) -> Self {
        Self {
            id,
            label: label.into(),
        }
    }
}

/// Catalog endpoints answer either with a bare list or with `{data: [...]}`
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum CatalogResponse {
    List(Vec<CatalogEntry>),
    Wrapped { data: Vec<CatalogEntry> },
}

impl CatalogResponse {
    pub fn into_entries(self) -> Vec<CatalogEntry> {
        match self {
            CatalogResponse::List(entries) => entries,
            CatalogResponse::Wrapped { data } => data,
        }
    }
}

/// Body of a successful item creation
#[derive(Debug, Clone, Deserialize)]
pub struct CreateItemResponse {
    #[serde(default = "default_true")]
    pub success: bool,
    #[serde(default)]
    pub message: String,
}

fn default_true() -> bool {
    true
}

#[derive(Debug, Serialize)]
pub struct LoginRequest<'a> {
    pub email: &'a str,
    pub password: &'a str,
}

#[derive(Debug, Deserialize)]
pub struct LoginUser {
    pub id: i64,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub role: Role,
}

#[derive(Debug, Deserialize)]
pub struct LoginResponse {
    pub token: String,
    pub user: LoginUser,
}

impl From<LoginResponse> for Session {
    fn from(resp: LoginResponse) -> Self {
        Session {
            token: resp.token,
            user_id: resp.user.id,
            email: resp.user.email,
            role: resp.user.role,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalog_response_shapes() {
        let bare: CatalogResponse =
            serde_json::from_str(r#"[{"id":1,"name":"Tools"},{"id":2,"label":"Safety"}]"#).unwrap();
        assert_eq!(
            bare.into_entries(),
            vec![CatalogEntry::new(1, "Tools"), CatalogEntry::new(2, "Safety")]
        );

        let wrapped: CatalogResponse =
            serde_json::from_str(r#"{"data":[{"id":3,"name":"Warehouse A"}]}"#).unwrap();
        assert_eq!(wrapped.into_entries(), vec![CatalogEntry::new(3, "Warehouse A")]);
    }

    #[test]
    fn test_create_response_defaults() {
        let resp: CreateItemResponse = serde_json::from_str("{}").unwrap();
        assert!(resp.success);
        assert!(resp.message.is_empty());

        let resp: CreateItemResponse =
            serde_json::from_str(r#"{"success":false,"message":"nope"}"#).unwrap();
        assert!(!resp.success);
    }

    #[test]
    fn test_login_response_into_session() {
        let resp: LoginResponse = serde_json::from_str(
            r#"{"token":"t0k","user":{"id":9,"email":"a@b.c","role":"admin"}}"#,
        )
        .unwrap();
        let session = Session::from(resp);
        assert_eq!(session.user_id, 9);
        assert_eq!(session.role, Role::Admin);
        assert_eq!(session.token, "t0k");
    }
}
