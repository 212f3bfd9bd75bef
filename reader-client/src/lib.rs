//! Клиентская библиотека для чтения блога с демо-API JSONPlaceholder.
//!
//! Предоставляет:
//! - модели сущностей (`Post`, `Comment`, `User`, `Album`, `Photo`, `Todo`);
//! - единый тип ошибки `ApiError` (транспорт / HTTP / not found / decode);
//! - `BlogClient`: HTTP-клиент (`reqwest`) со всеми ресурсами API;
//! - трейт `BlogApi`, шов, через который экраны получают данные;
//! - `search_posts` и помощники деградации `Degrade`.
//!
//! Кэширование и повторы на этом уровне не делаются: клиент каждый раз
//! ходит в сеть и логирует каждую ошибку перед тем как вернуть её.
#![warn(missing_docs)]

mod error;
mod http_client;
mod models;

use std::time::Duration;

use async_trait::async_trait;

pub use error::{ApiError, ApiResult};
pub use models::{Address, Album, Comment, Company, Geo, Photo, Post, Todo, User};

use http_client::{DEFAULT_TIMEOUT, HttpClient};

/// Базовый URL публичного демо-API.
pub const DEFAULT_BASE_URL: &str = "https://jsonplaceholder.typicode.com";

/// Операции API, которые нужны экранам приложения.
///
/// Реализуется `BlogClient`; в тестах экранов подменяется фейком.
#[async_trait]
pub trait BlogApi: Send + Sync {
    /// Все посты в порядке, в котором их вернул сервер.
    async fn posts(&self) -> ApiResult<Vec<Post>>;
    /// Один пост по идентификатору.
    async fn post(&self, id: i64) -> ApiResult<Post>;
    /// Посты конкретного пользователя (`/posts?userId=`).
    async fn posts_by_user(&self, user_id: i64) -> ApiResult<Vec<Post>>;
    /// Комментарии к посту (`/posts/{id}/comments`).
    async fn comments_for_post(&self, post_id: i64) -> ApiResult<Vec<Comment>>;
    /// Пользователь по идентификатору.
    async fn user(&self, id: i64) -> ApiResult<User>;
}

#[derive(Debug, Clone)]
/// HTTP-клиент демо-API блога.
pub struct BlogClient {
    http: HttpClient,
}

fn log_failure<T>(result: ApiResult<T>, context: impl FnOnce() -> String) -> ApiResult<T> {
    if let Err(err) = &result {
        match err.status() {
            Some(status) => tracing::error!(status, error = %err, "[API Error] {}", context()),
            None => tracing::error!(error = %err, "[API Error] {}", context()),
        }
    }
    result
}

impl BlogClient {
    /// Создаёт клиент с базовым URL и таймаутом по умолчанию (10 секунд).
    pub fn new(base_url: impl Into<String>) -> ApiResult<Self> {
        Self::with_timeout(base_url, DEFAULT_TIMEOUT)
    }

    /// Создаёт клиент с явно заданным таймаутом на каждый запрос.
    pub fn with_timeout(base_url: impl Into<String>, timeout: Duration) -> ApiResult<Self> {
        Ok(Self {
            http: HttpClient::new(base_url, timeout)?,
        })
    }

    /// Базовый URL, с которым создан клиент.
    pub fn base_url(&self) -> &str {
        self.http.base_url()
    }

    /// Все комментарии (`/comments`).
    pub async fn comments(&self) -> ApiResult<Vec<Comment>> {
        log_failure(self.http.comments().await, || {
            "Error fetching comments".to_string()
        })
    }

    /// Все пользователи (`/users`).
    pub async fn users(&self) -> ApiResult<Vec<User>> {
        log_failure(self.http.users().await, || "Error fetching users".to_string())
    }

    /// Все альбомы (`/albums`).
    pub async fn albums(&self) -> ApiResult<Vec<Album>> {
        log_failure(self.http.albums().await, || "Error fetching albums".to_string())
    }

    /// Альбомы пользователя (`/albums?userId=`).
    pub async fn albums_by_user(&self, user_id: i64) -> ApiResult<Vec<Album>> {
        log_failure(self.http.albums_by_user(user_id).await, || {
            format!("Error fetching albums by user with ID {user_id}")
        })
    }

    /// Все фотографии (`/photos`).
    pub async fn photos(&self) -> ApiResult<Vec<Photo>> {
        log_failure(self.http.photos().await, || "Error fetching photos".to_string())
    }

    /// Фотографии альбома (`/photos?albumId=`).
    pub async fn photos_by_album(&self, album_id: i64) -> ApiResult<Vec<Photo>> {
        log_failure(self.http.photos_by_album(album_id).await, || {
            format!("Error fetching photos by album with ID {album_id}")
        })
    }

    /// Все задачи (`/todos`).
    pub async fn todos(&self) -> ApiResult<Vec<Todo>> {
        log_failure(self.http.todos().await, || "Error fetching todos".to_string())
    }

    /// Задачи пользователя (`/todos?userId=`).
    pub async fn todos_by_user(&self, user_id: i64) -> ApiResult<Vec<Todo>> {
        log_failure(self.http.todos_by_user(user_id).await, || {
            format!("Error fetching todos by user with ID {user_id}")
        })
    }
}

#[async_trait]
impl BlogApi for BlogClient {
    async fn posts(&self) -> ApiResult<Vec<Post>> {
        log_failure(self.http.posts().await, || "Error fetching posts".to_string())
    }

    async fn post(&self, id: i64) -> ApiResult<Post> {
        log_failure(self.http.post(id).await, || {
            format!("Error fetching post with ID {id}")
        })
    }

    async fn posts_by_user(&self, user_id: i64) -> ApiResult<Vec<Post>> {
        log_failure(self.http.posts_by_user(user_id).await, || {
            format!("Error fetching posts by user with ID {user_id}")
        })
    }

    async fn comments_for_post(&self, post_id: i64) -> ApiResult<Vec<Comment>> {
        log_failure(self.http.comments_for_post(post_id).await, || {
            format!("Error fetching comments for post with ID {post_id}")
        })
    }

    async fn user(&self, id: i64) -> ApiResult<User> {
        log_failure(self.http.user(id).await, || {
            format!("Error fetching user with ID {id}")
        })
    }
}

/// Оставляет посты, у которых заголовок или текст содержит `query`
/// без учёта регистра. Пустой запрос ничего не отфильтровывает.
pub fn filter_posts(posts: Vec<Post>, query: &str) -> Vec<Post> {
    let needle = query.to_lowercase();
    posts
        .into_iter()
        .filter(|post| {
            post.title.to_lowercase().contains(&needle) || post.body.to_lowercase().contains(&needle)
        })
        .collect()
}

/// Загружает все посты и фильтрует их на клиенте.
///
/// В отличие от списочных экранов, ошибка загрузки не проглатывается, а
/// возвращается вызывающему.
pub async fn search_posts<A>(api: &A, query: &str) -> ApiResult<Vec<Post>>
where
    A: BlogApi + ?Sized,
{
    match api.posts().await {
        Ok(posts) => Ok(filter_posts(posts, query)),
        Err(err) => {
            tracing::error!(error = %err, query, "Error searching posts");
            Err(err)
        }
    }
}

/// Помощники для мест, где ошибка API не должна блокировать экран.
pub trait Degrade<T> {
    /// Для детальных запросов: ошибка превращается в `None`.
    fn or_absent(self) -> Option<T>;
}

impl<T> Degrade<T> for ApiResult<T> {
    fn or_absent(self) -> Option<T> {
        match self {
            Ok(value) => Some(value),
            Err(err) => {
                tracing::warn!(error = %err, "falling back to absent value");
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn post(id: i64, title: &str, body: &str) -> Post {
        Post {
            id,
            user_id: 1,
            title: title.to_string(),
            body: body.to_string(),
        }
    }

    struct FixedPosts(ApiResult<Vec<Post>>);

    #[async_trait]
    impl BlogApi for FixedPosts {
        async fn posts(&self) -> ApiResult<Vec<Post>> {
            self.0.clone()
        }

        async fn post(&self, _id: i64) -> ApiResult<Post> {
            Err(ApiError::NotFound)
        }

        async fn posts_by_user(&self, _user_id: i64) -> ApiResult<Vec<Post>> {
            Ok(Vec::new())
        }

        async fn comments_for_post(&self, _post_id: i64) -> ApiResult<Vec<Comment>> {
            Ok(Vec::new())
        }

        async fn user(&self, _id: i64) -> ApiResult<User> {
            Err(ApiError::NotFound)
        }
    }

    #[test]
    fn filter_matches_title_or_body_case_insensitively() {
        let posts = vec![
            post(1, "Rust Ownership", "borrowing"),
            post(2, "cooking", "A RUSTic bread"),
            post(3, "travel", "mountains"),
        ];

        let found = filter_posts(posts, "rust");
        let ids: Vec<i64> = found.iter().map(|p| p.id).collect();
        assert_eq!(ids, vec![1, 2]);
    }

    #[test]
    fn filter_with_empty_query_keeps_everything() {
        let posts = vec![post(1, "a", "b"), post(2, "c", "d")];
        assert_eq!(filter_posts(posts, "").len(), 2);
    }

    #[tokio::test]
    async fn search_propagates_errors() {
        let api = FixedPosts(Err(ApiError::Transport("offline".to_string())));
        let result = search_posts(&api, "x").await;
        assert_eq!(result, Err(ApiError::Transport("offline".to_string())));
    }

    #[tokio::test]
    async fn search_filters_successful_listing() {
        let api = FixedPosts(Ok(vec![post(1, "Hello", "world"), post(2, "bye", "now")]));
        let result = search_posts(&api, "WORLD").await.expect("search should succeed");
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].id, 1);
    }

    #[test]
    fn or_absent_swallows_errors() {
        let detail: ApiResult<Post> = Err(ApiError::NotFound);
        assert!(detail.or_absent().is_none());

        let found: ApiResult<Post> = Ok(post(3, "kept", "body"));
        assert_eq!(found.or_absent().map(|post| post.id), Some(3));
    }
}
