//! Uniform CRUD wrappers over [`ApiClient`].
//!
//! Every resource exposes the same verbs against `{base}`, `{base}/all`, and
//! `{base}/{id}`. Role-menu and password-reset endpoints sit on top.

#[cfg(test)]
#[path = "services_test.rs"]
mod services_test;

use serde_json::Value;

use super::api::{ApiClient, RequestOptions};
use super::error::ApiError;

pub const USER_BASE: &str = "/user";
pub const ROLE_BASE: &str = "/roles";
pub const MENU_BASE: &str = "/menu";
pub const MENU_ROLE_BASE: &str = "/menu-role";

fn query_options(query: &[(&str, &str)]) -> RequestOptions {
    query
        .iter()
        .fold(RequestOptions::new(), |opts, (k, v)| opts.query(*k, *v))
}

/// Truthy `id` from a request body: non-empty string or non-zero number.
pub(crate) fn body_id(body: &Value) -> Option<String> {
    match body.get("id")? {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) if n.as_f64().is_some_and(|f| f != 0.0) => Some(n.to_string()),
        _ => None,
    }
}

/// CRUD verbs for one REST resource.
#[derive(Clone, Debug)]
pub struct ResourceService {
    api: ApiClient,
    base: String,
}

impl ResourceService {
    #[must_use]
    pub fn new(api: ApiClient, base: impl Into<String>) -> Self {
        Self { api, base: base.into() }
    }

    #[must_use]
    pub fn base(&self) -> &str {
        &self.base
    }

    /// Paged/filtered list: `GET {base}?query`.
    ///
    /// # Errors
    ///
    /// Propagates the classified [`ApiError`].
    pub async fn retrieve(&self, query: &[(&str, &str)]) -> Result<Value, ApiError> {
        self.api.get(&self.base, &query_options(query)).await
    }

    /// Unpaged list: `GET {base}/all?query`.
    ///
    /// # Errors
    ///
    /// Propagates the classified [`ApiError`].
    pub async fn retrieve_all(&self, query: &[(&str, &str)]) -> Result<Value, ApiError> {
        self.api.get(&format!("{}/all", self.base), &query_options(query)).await
    }

    /// # Errors
    ///
    /// Propagates the classified [`ApiError`].
    pub async fn retrieve_by_id(&self, id: &str) -> Result<Value, ApiError> {
        self.api.get(&format!("{}/{id}", self.base), &RequestOptions::new()).await
    }

    /// Update when the body carries an id, create otherwise.
    ///
    /// # Errors
    ///
    /// Propagates the classified [`ApiError`].
    pub async fn save(&self, body: &Value) -> Result<Value, ApiError> {
        match body_id(body) {
            Some(id) => self.update(&id, body).await,
            None => self.create(body).await,
        }
    }

    /// # Errors
    ///
    /// Propagates the classified [`ApiError`].
    pub async fn create(&self, body: &Value) -> Result<Value, ApiError> {
        self.api.post(&self.base, body).await
    }

    /// # Errors
    ///
    /// Propagates the classified [`ApiError`].
    pub async fn update(&self, id: &str, body: &Value) -> Result<Value, ApiError> {
        self.api.put(&format!("{}/{id}", self.base), body).await
    }

    /// # Errors
    ///
    /// Propagates the classified [`ApiError`].
    pub async fn destroy(&self, id: &str) -> Result<Value, ApiError> {
        self.api.delete(&format!("{}/{id}", self.base)).await
    }
}

/// `/user` resource plus password reset.
#[derive(Clone, Debug)]
pub struct UserService {
    pub crud: ResourceService,
}

impl UserService {
    #[must_use]
    pub fn new(api: ApiClient) -> Self {
        Self { crud: ResourceService::new(api, USER_BASE) }
    }

    /// `PUT /user/password/reset/{id}`.
    ///
    /// # Errors
    ///
    /// Propagates the classified [`ApiError`].
    pub async fn reset_password(&self, id: &str, body: &Value) -> Result<Value, ApiError> {
        self.crud
            .api
            .put(&format!("{USER_BASE}/password/reset/{id}"), body)
            .await
    }
}

/// `/roles` resource.
#[must_use]
pub fn role_service(api: ApiClient) -> ResourceService {
    ResourceService::new(api, ROLE_BASE)
}

/// `/menu` resource plus the role-menu assignment endpoints.
#[derive(Clone, Debug)]
pub struct MenuService {
    pub crud: ResourceService,
}

impl MenuService {
    #[must_use]
    pub fn new(api: ApiClient) -> Self {
        Self { crud: ResourceService::new(api, MENU_BASE) }
    }

    /// Menu tree visible to a role: `GET /menu-role?query`.
    ///
    /// # Errors
    ///
    /// Propagates the classified [`ApiError`].
    pub async fn retrieve_role_menu(&self, query: &[(&str, &str)]) -> Result<Value, ApiError> {
        self.crud.api.get(MENU_ROLE_BASE, &query_options(query)).await
    }

    /// Raw role-menu assignment rows: `GET /menu-role/trx?query`.
    ///
    /// # Errors
    ///
    /// Propagates the classified [`ApiError`].
    pub async fn retrieve_role_menu_trx(&self, query: &[(&str, &str)]) -> Result<Value, ApiError> {
        self.crud
            .api
            .get(&format!("{MENU_ROLE_BASE}/trx"), &query_options(query))
            .await
    }

    /// Replace a role's menu assignments: `POST /menu-role/bulk`.
    ///
    /// # Errors
    ///
    /// Propagates the classified [`ApiError`].
    pub async fn create_bulk_role_menu(&self, body: &Value) -> Result<Value, ApiError> {
        self.crud.api.post(&format!("{MENU_ROLE_BASE}/bulk"), body).await
    }
}
