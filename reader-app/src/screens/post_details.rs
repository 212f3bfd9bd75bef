use reader_client::{ApiResult, BlogApi, Comment, Post, User};
use tokio::sync::mpsc;

use super::{Remote, ScreenStatus};
use crate::navigator::Route;
use crate::query::{QueryOptions, run_query};

pub const LOADING_TEXT: &str = "Loading post details...";
pub const NO_COMMENTS_TEXT: &str = "No comments yet";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PostDetailsEvent {
    Started,
    Post(ApiResult<Post>),
    Comments(ApiResult<Vec<Comment>>),
    Author(ApiResult<User>),
}

/// Пост, его комментарии и автор.
///
/// Пост и комментарии запрашиваются параллельно; запрос автора включается,
/// как только известен `user_id` поста, не дожидаясь комментариев. Ошибка
/// автора не показывается: строка «By: ...» просто не рисуется.
#[derive(Debug, Clone)]
pub struct PostDetailsScreen {
    post_id: i64,
    post: Remote<Post>,
    comments: Remote<Vec<Comment>>,
    author: Remote<User>,
    options: QueryOptions,
}

impl PostDetailsScreen {
    pub fn new(post_id: i64, options: QueryOptions) -> Self {
        Self {
            post_id,
            post: Remote::Loading,
            comments: Remote::Loading,
            author: Remote::Idle,
            options,
        }
    }

    pub fn post_id(&self) -> i64 {
        self.post_id
    }

    pub fn apply(&mut self, event: PostDetailsEvent) {
        match event {
            PostDetailsEvent::Started => {
                self.post = Remote::Loading;
                self.comments = Remote::Loading;
            }
            PostDetailsEvent::Post(result) => {
                if let Ok(post) = &result {
                    let known = self.author.ready().is_some_and(|u| u.id == post.user_id);
                    if !known {
                        self.author = Remote::Loading;
                    }
                }
                self.post = result.into();
            }
            PostDetailsEvent::Comments(result) => self.comments = result.into(),
            PostDetailsEvent::Author(result) => {
                if let Err(err) = &result {
                    tracing::debug!(error = %err, "author lookup failed, byline omitted");
                }
                self.author = result.into();
            }
        }
    }

    /// Загрузка и ошибка объединяют пост и комментарии; автор не влияет.
    pub fn status(&self) -> ScreenStatus {
        if self.post.is_loading() || self.comments.is_loading() {
            return ScreenStatus::Loading;
        }

        let error = self.post.error().or_else(|| self.comments.error());
        if let Some(err) = error {
            return ScreenStatus::Error(format!("Error loading post: {}", err.message()));
        }

        if self.post.ready().is_none() {
            return ScreenStatus::Loading;
        }
        ScreenStatus::Loaded
    }

    pub fn post(&self) -> Option<&Post> {
        self.post.ready()
    }

    pub fn comments(&self) -> &[Comment] {
        self.comments.ready().map(Vec::as_slice).unwrap_or_default()
    }

    pub fn comments_title(&self) -> String {
        format!("Comments ({})", self.comments().len())
    }

    pub fn author(&self) -> Option<&User> {
        self.author.ready()
    }

    pub fn is_author_loading(&self) -> bool {
        self.author.is_loading()
    }

    pub fn byline(&self) -> Option<String> {
        self.author()
            .map(|user| format!("By: {} (@{})", user.name, user.username))
    }

    /// Нажатие на строку автора; имя передаём, раз оно уже загружено.
    pub fn open_author(&self) -> Option<Route> {
        self.author().map(|user| Route::UserPosts {
            user_id: user.id,
            user_name: Some(user.name.clone()),
        })
    }

    pub async fn load<A>(&mut self, api: &A)
    where
        A: BlogApi + ?Sized,
    {
        self.fetch(api).await;
    }

    /// Pull-to-refresh и кнопка Retry перезапрашивают пост и комментарии.
    pub async fn refresh<A>(&mut self, api: &A)
    where
        A: BlogApi + ?Sized,
    {
        self.fetch(api).await;
    }

    pub async fn retry<A>(&mut self, api: &A)
    where
        A: BlogApi + ?Sized,
    {
        self.fetch(api).await;
    }

    async fn fetch<A>(&mut self, api: &A)
    where
        A: BlogApi + ?Sized,
    {
        self.apply(PostDetailsEvent::Started);

        let post_id = self.post_id;
        let options = self.options;
        let known_author = self.author.ready().map(|user| user.id);
        let (tx, mut rx) = mpsc::unbounded_channel();

        let post_tx = tx.clone();
        let post_then_author = async move {
            let post = run_query(&options, "post", move || api.post(post_id)).await;
            let author_id = post
                .as_ref()
                .ok()
                .map(|post| post.user_id)
                .filter(|user_id| Some(*user_id) != known_author);
            let _ = post_tx.send(PostDetailsEvent::Post(post));

            if let Some(author_id) = author_id {
                let author = run_query(&options, "user", move || api.user(author_id)).await;
                let _ = post_tx.send(PostDetailsEvent::Author(author));
            }
        };

        let comments_tx = tx;
        let comments = async move {
            let comments =
                run_query(&options, "comments", move || api.comments_for_post(post_id)).await;
            let _ = comments_tx.send(PostDetailsEvent::Comments(comments));
        };

        let apply_events = async {
            while let Some(event) = rx.recv().await {
                self.apply(event);
            }
        };

        tokio::join!(post_then_author, comments, apply_events);
    }
}
