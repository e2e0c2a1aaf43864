use crate::domain::model::{Category, RegistrationFormData, Service, User};
use crate::domain::ports::{AccountGateway, CatalogSource};
use crate::utils::error::{MarketError, Result};
use async_trait::async_trait;
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Client for the marketplace REST API.
#[derive(Debug, Clone)]
pub struct ApiClient {
    client: Client,
    base_url: String,
}

/// Body of `POST /users`.
#[derive(Debug, Clone, Serialize)]
pub struct NewAccountRequest<'a> {
    pub role: Option<&'a str>,
    pub first_name: &'a str,
    pub last_name: &'a str,
    pub email: &'a str,
    pub phone: &'a str,
    pub password: &'a str,
    pub region: &'a str,
    pub city: &'a str,
    pub street: &'a str,
    pub address: &'a str,
    pub image: Option<&'a str>,
}

impl<'a> From<&'a RegistrationFormData> for NewAccountRequest<'a> {
    fn from(form: &'a RegistrationFormData) -> Self {
        Self {
            role: form.user_type.map(|t| t.as_str()),
            first_name: &form.first_name,
            last_name: &form.last_name,
            email: &form.email,
            phone: &form.phone,
            password: &form.password,
            region: &form.governorate,
            city: &form.city,
            street: &form.street,
            address: &form.detailed_address,
            image: form.profile_image.as_deref(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: Option<String>,
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>, timeout_secs: u64) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()?;
        Ok(Self {
            client,
            base_url: base_url.into(),
        })
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.base_url.trim_end_matches('/'), path)
    }

    async fn get_json<T: DeserializeOwned>(&self, resource: &str, path: &str) -> Result<T> {
        let url = self.endpoint(path);
        tracing::debug!("Making API request to: {}", url);
        let response = self.client.get(&url).send().await?;
        tracing::debug!("API response status: {}", response.status());

        if !response.status().is_success() {
            return Err(MarketError::FetchError {
                resource: resource.to_string(),
                status: response.status().as_u16(),
            });
        }
        Ok(response.json().await?)
    }

    /// Prefers the server's `message` over a bare status line.
    async fn failure_message(response: Response, fallback: &str) -> (u16, String) {
        let status = response.status().as_u16();
        let message = response
            .json::<ErrorBody>()
            .await
            .ok()
            .and_then(|body| body.message)
            .unwrap_or_else(|| format!("{}: {}", fallback, status));
        (status, message)
    }

    pub async fn fetch_users(&self) -> Result<Vec<User>> {
        self.get_json("users", "users").await
    }

    pub async fn fetch_user_by_id(&self, id: u64) -> Result<User> {
        self.get_json("user", &format!("users/{}", id)).await
    }

    pub async fn update_user_status(&self, user_id: u64, status: &str, token: &str) -> Result<User> {
        let url = self.endpoint(&format!("users/{}", user_id));
        tracing::debug!("Updating status of user {} to {}", user_id, status);
        let response = self
            .client
            .put(&url)
            .bearer_auth(token)
            .json(&serde_json::json!({ "status": status }))
            .send()
            .await?;

        if !response.status().is_success() {
            let (status, message) =
                Self::failure_message(response, "Error updating user status").await;
            tracing::warn!("Status update for user {} failed: {}", user_id, message);
            return Err(MarketError::ApiResponseError { status, message });
        }
        Ok(response.json().await?)
    }
}

#[async_trait]
impl CatalogSource for ApiClient {
    async fn fetch_services(&self) -> Result<Vec<Service>> {
        self.get_json("services", "services").await
    }

    async fn fetch_categories(&self) -> Result<Vec<Category>> {
        self.get_json("categories", "categories").await
    }
}

#[async_trait]
impl AccountGateway for ApiClient {
    async fn create_account(&self, form: &RegistrationFormData) -> Result<()> {
        let url = self.endpoint("users");
        tracing::debug!("Creating account for {}", form.email);
        let response = self
            .client
            .post(&url)
            .json(&NewAccountRequest::from(form))
            .send()
            .await
            .map_err(|e| MarketError::SubmissionError {
                message: e.to_string(),
            })?;

        if !response.status().is_success() {
            let (_, message) = Self::failure_message(response, "Error creating account").await;
            return Err(MarketError::SubmissionError { message });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::UserType;
    use httpmock::prelude::*;

    fn user_json(id: u64, status: &str) -> serde_json::Value {
        serde_json::json!({
            "id": id,
            "first_name": "Lina",
            "last_name": "Haddad",
            "phone": "0912345678",
            "status": status,
            "role_id": 2,
            "region_id": 1,
            "city": "Damascus",
            "street": "Mezzeh",
            "image": null,
            "address": "Building 4",
            "email": "lina@example.com",
            "email_verified_at": null,
            "created_at": "2024-01-15T10:30:00.000000Z",
            "updated_at": "2024-01-15T10:30:00.000000Z"
        })
    }

    #[tokio::test]
    async fn test_fetch_categories() {
        let server = MockServer::start();
        let api_mock = server.mock(|when, then| {
            when.method(GET).path("/api/categories");
            then.status(200)
                .header("Content-Type", "application/json")
                .json_body(serde_json::json!([{"id": 1, "name": "Cleaning"}]));
        });

        let client = ApiClient::new(server.url("/api/"), 5).unwrap();
        let categories = client.fetch_categories().await.unwrap();

        api_mock.assert();
        assert_eq!(categories, vec![Category { id: 1, name: "Cleaning".to_string() }]);
    }

    #[tokio::test]
    async fn test_fetch_services_failure_reports_status() {
        let server = MockServer::start();
        let api_mock = server.mock(|when, then| {
            when.method(GET).path("/services");
            then.status(500);
        });

        let client = ApiClient::new(server.base_url(), 5).unwrap();
        let err = client.fetch_services().await.unwrap_err();

        api_mock.assert();
        assert!(matches!(
            err,
            MarketError::FetchError { ref resource, status: 500 } if resource == "services"
        ));
    }

    #[tokio::test]
    async fn test_fetch_users() {
        let server = MockServer::start();
        let api_mock = server.mock(|when, then| {
            when.method(GET).path("/users");
            then.status(200)
                .json_body(serde_json::json!([user_json(1, "active"), user_json(2, "pending")]));
        });

        let client = ApiClient::new(server.base_url(), 5).unwrap();
        let users = client.fetch_users().await.unwrap();

        api_mock.assert();
        let statuses: Vec<&str> = users.iter().map(|u| u.status.as_str()).collect();
        assert_eq!(statuses, vec!["active", "pending"]);
    }

    #[tokio::test]
    async fn test_fetch_user_by_id() {
        let server = MockServer::start();
        let api_mock = server.mock(|when, then| {
            when.method(GET).path("/users/7");
            then.status(200).json_body(user_json(7, "active"));
        });

        let client = ApiClient::new(server.base_url(), 5).unwrap();
        let user = client.fetch_user_by_id(7).await.unwrap();

        api_mock.assert();
        assert_eq!(user.id, 7);
        assert_eq!(user.status, "active");
    }

    #[tokio::test]
    async fn test_update_user_status_sends_bearer_token() {
        let server = MockServer::start();
        let api_mock = server.mock(|when, then| {
            when.method(PUT)
                .path("/users/7")
                .header("authorization", "Bearer t0ken")
                .json_body(serde_json::json!({"status": "blocked"}));
            then.status(200).json_body(user_json(7, "blocked"));
        });

        let client = ApiClient::new(server.base_url(), 5).unwrap();
        let user = client.update_user_status(7, "blocked", "t0ken").await.unwrap();

        api_mock.assert();
        assert_eq!(user.status, "blocked");
    }

    #[tokio::test]
    async fn test_update_user_status_surfaces_server_message() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(PUT).path("/users/7");
            then.status(403)
                .json_body(serde_json::json!({"message": "Not allowed"}));
        });

        let client = ApiClient::new(server.base_url(), 5).unwrap();
        let err = client.update_user_status(7, "blocked", "t0ken").await.unwrap_err();

        assert!(matches!(
            err,
            MarketError::ApiResponseError { status: 403, ref message } if message == "Not allowed"
        ));
    }

    #[tokio::test]
    async fn test_create_account_posts_snake_case_payload() {
        let server = MockServer::start();
        let api_mock = server.mock(|when, then| {
            when.method(POST).path("/users").json_body_partial(
                r#"{"role": "customer", "first_name": "Lina", "region": "homs", "address": "Building 4"}"#,
            );
            then.status(201);
        });

        let form = RegistrationFormData {
            user_type: Some(UserType::Customer),
            first_name: "Lina".to_string(),
            governorate: "homs".to_string(),
            detailed_address: "Building 4".to_string(),
            ..Default::default()
        };
        let client = ApiClient::new(server.base_url(), 5).unwrap();
        client.create_account(&form).await.unwrap();

        api_mock.assert();
    }

    #[tokio::test]
    async fn test_create_account_rejection_is_submission_error() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(POST).path("/users");
            then.status(422);
        });

        let client = ApiClient::new(server.base_url(), 5).unwrap();
        let err = client
            .create_account(&RegistrationFormData::default())
            .await
            .unwrap_err();

        assert!(matches!(err, MarketError::SubmissionError { ref message } if message == "Error creating account: 422"));
    }
}
