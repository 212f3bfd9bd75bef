use reqwest::{Client, Method, header};
use serde::{Deserialize, de::DeserializeOwned};
use std::time::Duration;

use crate::error::{ApiError, ApiResult};
use crate::models::{Album, Comment, Photo, Post, Todo, User};

/// Таймаут запроса по умолчанию.
pub(crate) const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Deserialize)]
struct ErrorResponseDto {
    message: Option<String>,
}

#[derive(Debug, Clone)]
/// HTTP-транспорт поверх REST API JSONPlaceholder.
pub(crate) struct HttpClient {
    base_url: String,
    client: Client,
}

impl HttpClient {
    /// Создаёт HTTP-клиент с базовым URL и таймаутом на каждый запрос.
    pub(crate) fn new(base_url: impl Into<String>, timeout: Duration) -> ApiResult<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(ApiError::from_reqwest)?;

        Ok(Self {
            base_url: base_url.into(),
            client,
        })
    }

    pub(crate) fn base_url(&self) -> &str {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }

    async fn decode_error(response: reqwest::Response) -> ApiError {
        let status = response.status();

        let message = match response.json::<ErrorResponseDto>().await {
            Ok(body) => body.message.filter(|message| !message.trim().is_empty()),
            Err(_) => None,
        };
        ApiError::from_http_status(status, message)
    }

    /// универсальный helper для GET-запросов с json-ответом
    async fn get_json<TRes>(&self, path: &str, query: &[(&str, i64)]) -> ApiResult<TRes>
    where
        TRes: DeserializeOwned,
    {
        let url = self.endpoint(path);
        tracing::debug!(%url, ?query, "GET");

        let mut request = self
            .client
            .request(Method::GET, url)
            .header(header::ACCEPT, "application/json");
        if !query.is_empty() {
            request = request.query(query);
        }

        let response = request.send().await.map_err(ApiError::from_reqwest)?;
        if !response.status().is_success() {
            return Err(Self::decode_error(response).await);
        }

        response
            .json::<TRes>()
            .await
            .map_err(ApiError::from_reqwest)
    }

    pub(crate) async fn posts(&self) -> ApiResult<Vec<Post>> {
        self.get_json("/posts", &[]).await
    }

    pub(crate) async fn post(&self, id: i64) -> ApiResult<Post> {
        self.get_json(&format!("/posts/{id}"), &[]).await
    }

    pub(crate) async fn posts_by_user(&self, user_id: i64) -> ApiResult<Vec<Post>> {
        self.get_json("/posts", &[("userId", user_id)]).await
    }

    pub(crate) async fn comments(&self) -> ApiResult<Vec<Comment>> {
        self.get_json("/comments", &[]).await
    }

    pub(crate) async fn comments_for_post(&self, post_id: i64) -> ApiResult<Vec<Comment>> {
        self.get_json(&format!("/posts/{post_id}/comments"), &[])
            .await
    }

    pub(crate) async fn users(&self) -> ApiResult<Vec<User>> {
        self.get_json("/users", &[]).await
    }

    pub(crate) async fn user(&self, id: i64) -> ApiResult<User> {
        self.get_json(&format!("/users/{id}"), &[]).await
    }

    pub(crate) async fn albums(&self) -> ApiResult<Vec<Album>> {
        self.get_json("/albums", &[]).await
    }

    pub(crate) async fn albums_by_user(&self, user_id: i64) -> ApiResult<Vec<Album>> {
        self.get_json("/albums", &[("userId", user_id)]).await
    }

    pub(crate) async fn photos(&self) -> ApiResult<Vec<Photo>> {
        self.get_json("/photos", &[]).await
    }

    pub(crate) async fn photos_by_album(&self, album_id: i64) -> ApiResult<Vec<Photo>> {
        self.get_json("/photos", &[("albumId", album_id)]).await
    }

    pub(crate) async fn todos(&self) -> ApiResult<Vec<Todo>> {
        self.get_json("/todos", &[]).await
    }

    pub(crate) async fn todos_by_user(&self, user_id: i64) -> ApiResult<Vec<Todo>> {
        self.get_json("/todos", &[("userId", user_id)]).await
    }
}
