use std::time::Instant;

use reader_client::{ApiResult, BlogApi, Post};

use super::{Remote, ScreenStatus};
use crate::navigator::Route;
use crate::query::{QueryOptions, run_query};

pub const LOADING_TEXT: &str = "Loading posts...";
pub const ERROR_TITLE: &str = "Something went wrong";
pub const EMPTY_TEXT: &str = "No posts found";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HomeEvent {
    Started { refreshing: bool },
    Finished(ApiResult<Vec<Post>>),
}

/// Лента всех постов.
#[derive(Debug, Clone)]
pub struct HomeScreen {
    posts: Remote<Vec<Post>>,
    fetched_at: Option<Instant>,
    refreshing: bool,
    options: QueryOptions,
}

impl HomeScreen {
    pub fn new(options: QueryOptions) -> Self {
        Self {
            posts: Remote::Loading,
            fetched_at: None,
            refreshing: false,
            options,
        }
    }

    pub fn apply(&mut self, event: HomeEvent) {
        match event {
            // при обновлении уже показанный список остаётся на экране
            HomeEvent::Started { refreshing } => {
                if refreshing && self.posts.ready().is_some() {
                    self.refreshing = true;
                } else {
                    self.posts = Remote::Loading;
                }
            }
            HomeEvent::Finished(result) => {
                if result.is_ok() {
                    self.fetched_at = Some(Instant::now());
                }
                self.posts = result.into();
                self.refreshing = false;
            }
        }
    }

    pub fn status(&self) -> ScreenStatus {
        match &self.posts {
            Remote::Idle | Remote::Loading => ScreenStatus::Loading,
            Remote::Failed(err) => ScreenStatus::Error(err.message()),
            Remote::Ready(posts) if posts.is_empty() => ScreenStatus::Empty,
            Remote::Ready(_) => ScreenStatus::Loaded,
        }
    }

    /// Флаг виден только между `Started { refreshing: true }` и `Finished`,
    /// применёнными через [`HomeScreen::apply`]. `refresh` держит `&mut self`
    /// до конца запроса, поэтому снаружи промежуточное состояние видно лишь
    /// тому, кто сам подаёт события.
    pub fn is_refreshing(&self) -> bool {
        self.refreshing
    }

    pub fn posts(&self) -> &[Post] {
        self.posts.ready().map(Vec::as_slice).unwrap_or_default()
    }

    /// Первый показ: сетевой запрос только если данных нет или они устарели.
    pub async fn load<A>(&mut self, api: &A)
    where
        A: BlogApi + ?Sized,
    {
        let fresh = self
            .fetched_at
            .is_some_and(|fetched_at| self.options.is_fresh(fetched_at));
        if fresh && self.posts.ready().is_some() {
            tracing::debug!("home posts are fresh, skipping fetch");
            return;
        }
        self.fetch(api, false).await;
    }

    /// Pull-to-refresh.
    pub async fn refresh<A>(&mut self, api: &A)
    where
        A: BlogApi + ?Sized,
    {
        self.fetch(api, true).await;
    }

    pub async fn retry<A>(&mut self, api: &A)
    where
        A: BlogApi + ?Sized,
    {
        self.fetch(api, false).await;
    }

    async fn fetch<A>(&mut self, api: &A, refreshing: bool)
    where
        A: BlogApi + ?Sized,
    {
        self.apply(HomeEvent::Started { refreshing });
        let result = run_query(&self.options, "posts", move || api.posts()).await;
        self.apply(HomeEvent::Finished(result));
    }

    /// «Read more» на строке `index`.
    pub fn open_post(&self, index: usize) -> Option<Route> {
        self.posts()
            .get(index)
            .map(|post| Route::PostDetails { post_id: post.id })
    }

    /// «View author posts» на строке `index`; имя автора здесь ещё не известно.
    pub fn open_author(&self, index: usize) -> Option<Route> {
        self.posts().get(index).map(|post| Route::UserPosts {
            user_id: post.user_id,
            user_name: None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::screens::fake::{FakeApi, post};
    use reader_client::ApiError;

    #[tokio::test]
    async fn loads_posts_in_order() {
        let api = FakeApi::new().with_posts(Ok(vec![
            post(1, 1, "first", "a"),
            post(2, 1, "second", "b"),
            post(3, 2, "third", "c"),
        ]));
        let mut screen = HomeScreen::new(QueryOptions::once());
        assert_eq!(screen.status(), ScreenStatus::Loading);

        screen.load(&api).await;
        assert_eq!(screen.status(), ScreenStatus::Loaded);
        let titles: Vec<&str> = screen.posts().iter().map(|p| p.title.as_str()).collect();
        assert_eq!(titles, vec!["first", "second", "third"]);
    }

    #[tokio::test]
    async fn empty_listing_is_empty_state() {
        let api = FakeApi::new().with_posts(Ok(Vec::new()));
        let mut screen = HomeScreen::new(QueryOptions::once());
        screen.load(&api).await;
        assert_eq!(screen.status(), ScreenStatus::Empty);
    }

    #[tokio::test]
    async fn failure_is_error_state_and_retry_refetches() {
        let api = FakeApi::new().with_posts(Err(ApiError::Transport("offline".to_string())));
        let mut screen = HomeScreen::new(QueryOptions::once());

        screen.load(&api).await;
        assert_eq!(screen.status(), ScreenStatus::Error("offline".to_string()));
        assert_eq!(api.count("posts"), 1);

        api.set_posts(Ok(vec![post(1, 1, "back", "online")]));
        screen.retry(&api).await;
        assert_eq!(api.count("posts"), 2);
        assert_eq!(screen.status(), ScreenStatus::Loaded);
    }

    #[tokio::test]
    async fn fresh_data_is_reused_but_refresh_always_refetches() {
        let api = FakeApi::new().with_posts(Ok(vec![post(1, 1, "t", "b")]));
        let mut screen = HomeScreen::new(QueryOptions {
            retry: 0,
            ..QueryOptions::default()
        });

        screen.load(&api).await;
        screen.load(&api).await;
        assert_eq!(api.count("posts"), 1);

        screen.refresh(&api).await;
        assert_eq!(api.count("posts"), 2);
    }

    #[test]
    fn refresh_keeps_current_rows_visible() {
        let mut screen = HomeScreen::new(QueryOptions::once());
        screen.apply(HomeEvent::Finished(Ok(vec![post(1, 1, "t", "b")])));

        screen.apply(HomeEvent::Started { refreshing: true });
        assert!(screen.is_refreshing());
        assert_eq!(screen.status(), ScreenStatus::Loaded);
        assert_eq!(screen.posts().len(), 1);

        screen.apply(HomeEvent::Finished(Ok(Vec::new())));
        assert!(!screen.is_refreshing());
        assert_eq!(screen.status(), ScreenStatus::Empty);
    }

    #[test]
    fn row_actions_navigate_with_ids() {
        let mut screen = HomeScreen::new(QueryOptions::once());
        screen.apply(HomeEvent::Finished(Ok(vec![post(7, 3, "t", "b")])));

        assert_eq!(screen.open_post(0), Some(Route::PostDetails { post_id: 7 }));
        assert_eq!(
            screen.open_author(0),
            Some(Route::UserPosts {
                user_id: 3,
                user_name: None
            })
        );
        assert_eq!(screen.open_post(1), None);
    }
}
