use reader_client::{ApiResult, BlogApi, Post, User};
use tokio::sync::mpsc;

use super::{Remote, ScreenStatus};
use crate::navigator::Route;

pub const ERROR_TEXT: &str = "Failed to load posts. Please try again.";
pub const EMPTY_TEXT: &str = "No posts found for this user";

/// Параметры навигации экрана постов пользователя.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserPostsParams {
    pub user_id: i64,
    pub user_name: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserPostsEvent {
    PostsStarted { refreshing: bool },
    Posts(ApiResult<Vec<Post>>),
    User(ApiResult<User>),
}

/// Посты одного пользователя.
///
/// Если имя пользователя не пришло в параметрах, параллельно с постами
/// запрашивается его запись, только ради имени в заголовке. Запросы здесь
/// однократные, без повторов.
#[derive(Debug, Clone)]
pub struct UserPostsScreen {
    params: UserPostsParams,
    posts: Remote<Vec<Post>>,
    user: Remote<User>,
    refreshing: bool,
}

impl UserPostsScreen {
    pub fn new(params: UserPostsParams) -> Self {
        let user = if params.user_name.is_some() {
            Remote::Idle
        } else {
            Remote::Loading
        };

        Self {
            params,
            posts: Remote::Loading,
            user,
            refreshing: false,
        }
    }

    pub fn params(&self) -> &UserPostsParams {
        &self.params
    }

    pub fn apply(&mut self, event: UserPostsEvent) {
        match event {
            UserPostsEvent::PostsStarted { refreshing } => {
                if refreshing && self.posts.ready().is_some() {
                    self.refreshing = true;
                } else {
                    self.posts = Remote::Loading;
                }
            }
            UserPostsEvent::Posts(result) => {
                if let Err(err) = &result {
                    tracing::debug!(user_id = self.params.user_id, error = %err, "user posts failed");
                }
                self.posts = result.into();
                self.refreshing = false;
            }
            UserPostsEvent::User(result) => self.user = result.into(),
        }
    }

    pub fn status(&self) -> ScreenStatus {
        match &self.posts {
            Remote::Idle | Remote::Loading => ScreenStatus::Loading,
            Remote::Failed(_) => ScreenStatus::Error(ERROR_TEXT.to_string()),
            Remote::Ready(posts) if posts.is_empty() => ScreenStatus::Empty,
            Remote::Ready(_) => ScreenStatus::Loaded,
        }
    }

    /// Как и у главного экрана: выставляется событием
    /// `PostsStarted { refreshing: true }` и снимается событием `Posts`.
    pub fn is_refreshing(&self) -> bool {
        self.refreshing
    }

    pub fn posts(&self) -> &[Post] {
        self.posts.ready().map(Vec::as_slice).unwrap_or_default()
    }

    /// Имя для заголовка: из параметров, из загруженной записи или
    /// заглушка `User #<id>`.
    pub fn display_name(&self) -> String {
        if let Some(name) = &self.params.user_name {
            return name.clone();
        }

        let user_id = self.params.user_id;
        match &self.user {
            Remote::Loading => format!("User #{user_id} (loading...)"),
            Remote::Ready(user) => user.name.clone(),
            Remote::Idle | Remote::Failed(_) => format!("User #{user_id}"),
        }
    }

    pub fn header(&self) -> String {
        format!("Posts by {}", self.display_name())
    }

    pub fn open_post(&self, index: usize) -> Option<Route> {
        self.posts()
            .get(index)
            .map(|post| Route::PostDetails { post_id: post.id })
    }

    pub async fn load<A>(&mut self, api: &A)
    where
        A: BlogApi + ?Sized,
    {
        let fetch_user = self.params.user_name.is_none() && self.user.ready().is_none();
        self.fetch(api, false, fetch_user).await;
    }

    pub async fn refresh<A>(&mut self, api: &A)
    where
        A: BlogApi + ?Sized,
    {
        self.fetch(api, true, false).await;
    }

    pub async fn retry<A>(&mut self, api: &A)
    where
        A: BlogApi + ?Sized,
    {
        self.fetch(api, false, false).await;
    }

    async fn fetch<A>(&mut self, api: &A, refreshing: bool, fetch_user: bool)
    where
        A: BlogApi + ?Sized,
    {
        self.apply(UserPostsEvent::PostsStarted { refreshing });
        if fetch_user {
            self.user = Remote::Loading;
        }

        let user_id = self.params.user_id;
        let (tx, mut rx) = mpsc::unbounded_channel();

        let posts_tx = tx.clone();
        let posts = async move {
            let posts = api.posts_by_user(user_id).await;
            let _ = posts_tx.send(UserPostsEvent::Posts(posts));
        };

        let user_tx = tx;
        let user = async move {
            if fetch_user {
                let user = api.user(user_id).await;
                let _ = user_tx.send(UserPostsEvent::User(user));
            }
        };

        let apply_events = async {
            while let Some(event) = rx.recv().await {
                self.apply(event);
            }
        };

        tokio::join!(posts, user, apply_events);
    }
}
