mod browse;
mod logging;
mod settings;

use std::io::IsTerminal;
use std::path::PathBuf;
use std::process;
use std::sync::Arc;

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use reader_app::screens::{
    HomeScreen, PostDetailsScreen, ScreenStatus, UserPostsParams, UserPostsScreen,
};
use reader_app::{
    EffectiveTheme, FileStorage, QueryOptions, Renderer, Route, Tab, ThemePreference, ThemeStore,
};
use reader_client::{
    Album, ApiError, BlogApi, BlogClient, Comment, Degrade, Photo, Post, Todo, User, search_posts,
};
use serde::Serialize;

use crate::browse::Session;
use crate::logging::init_logging;
use crate::settings::Settings;

#[derive(Debug, Parser)]
#[command(name = "reader-cli", version, about = "Terminal reader for the JSONPlaceholder blog API")]
struct Cli {
    /// Базовый URL API (по умолчанию READER_API_BASE_URL или JSONPlaceholder).
    #[arg(long, global = true)]
    base_url: Option<String>,

    /// Файл с сохранённым предпочтением темы.
    #[arg(long, global = true)]
    prefs: Option<PathBuf>,

    /// Схема терминала для темы `system`.
    #[arg(long, global = true)]
    device_theme: Option<EffectiveTheme>,

    /// Без ANSI-цветов.
    #[arg(long, global = true)]
    no_color: bool,

    /// Ресурсные команды печатают сырой JSON.
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Лента всех постов.
    Home,
    /// Пост с комментариями и автором.
    Post {
        #[arg(long)]
        id: i64,
    },
    /// Посты пользователя.
    User {
        #[arg(long)]
        id: i64,
        /// Имя для заголовка; без него имя запрашивается отдельно.
        #[arg(long)]
        name: Option<String>,
    },
    /// Поиск по заголовку и тексту постов.
    Search { query: String },
    About,
    Settings,
    /// Просмотр и смена темы.
    Theme {
        #[command(subcommand)]
        action: ThemeCommand,
    },
    /// Комментарии, все или к одному посту.
    Comments {
        #[arg(long)]
        post: Option<i64>,
    },
    Users,
    Albums {
        #[arg(long)]
        user: Option<i64>,
    },
    Photos {
        #[arg(long)]
        album: Option<i64>,
    },
    Todos {
        #[arg(long)]
        user: Option<i64>,
    },
    /// Интерактивная сессия с навигацией.
    Browse,
}

#[derive(Debug, Subcommand)]
enum ThemeCommand {
    Show,
    Set { preference: ThemePreference },
    Toggle,
}

#[tokio::main]
async fn main() {
    if let Err(err) = run().await {
        eprintln!("Error: {err:#}");
        process::exit(1);
    }
}

async fn run() -> Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    let mut settings = Settings::from_env().context("invalid configuration")?;
    apply_overrides(&mut settings, &cli);
    init_logging(
        &settings.log_level,
        !cli.no_color && std::io::stderr().is_terminal(),
    )?;
    tracing::debug!(
        base_url = %settings.base_url,
        prefs = %settings.prefs_path.display(),
        "starting"
    );

    let client = BlogClient::with_timeout(settings.base_url.as_str(), settings.http_timeout)
        .map_err(map_client_error)?;
    let storage = Arc::new(FileStorage::new(settings.prefs_path.clone()));
    let mut store = ThemeStore::load(storage, settings.device_theme);
    let options = query_options(&settings);
    let color = !cli.no_color && std::io::stdout().is_terminal();
    let renderer = Renderer::for_store(&store, color);
    let today = chrono::Local::now().date_naive();

    match cli.command {
        Command::Home => {
            let mut screen = HomeScreen::new(options);
            screen.load(&client).await;
            print_route(&renderer, &Route::Home, renderer.home(&screen));
            println!("{}", renderer.tab_bar(Tab::Home));
            ensure_shown(screen.status())?;
        }
        Command::Post { id } => {
            let mut screen = PostDetailsScreen::new(id, options);
            screen.load(&client).await;
            let route = Route::PostDetails { post_id: id };
            print_route(&renderer, &route, renderer.post_details(&screen));
            ensure_shown(screen.status())?;
        }
        Command::User { id, name } => {
            let route = Route::UserPosts {
                user_id: id,
                user_name: name.clone(),
            };
            let mut screen = UserPostsScreen::new(UserPostsParams {
                user_id: id,
                user_name: name,
            });
            screen.load(&client).await;
            print_route(&renderer, &route, renderer.user_posts(&screen, today));
            ensure_shown(screen.status())?;
        }
        Command::Search { query } => {
            let posts = search_posts(&client, &query)
                .await
                .map_err(map_client_error)?;
            if cli.json {
                print_json(&posts)?;
            } else {
                print_search(&query, &posts);
            }
        }
        Command::About => print_route(&renderer, &Route::About, renderer.about()),
        Command::Settings => print_route(&renderer, &Route::Settings, renderer.settings(&store)),
        Command::Theme { action } => {
            match action {
                ThemeCommand::Show => {}
                ThemeCommand::Set { preference } => store.set_theme(preference),
                ThemeCommand::Toggle => {
                    store.toggle_theme();
                }
            }
            print_theme(&store);
        }
        Command::Comments { post } => {
            let comments = match post {
                Some(post_id) => client.comments_for_post(post_id).await,
                None => client.comments().await,
            }
            .map_err(map_client_error)?;
            output(cli.json, comments.as_slice(), print_comments)?;
        }
        Command::Users => {
            let users = client.users().await.map_err(map_client_error)?;
            output(cli.json, users.as_slice(), print_users)?;
        }
        Command::Albums { user } => {
            let albums = match user {
                Some(user_id) => {
                    print_owner(&client, user_id, cli.json).await;
                    client.albums_by_user(user_id).await
                }
                None => client.albums().await,
            }
            .map_err(map_client_error)?;
            output(cli.json, albums.as_slice(), print_albums)?;
        }
        Command::Photos { album } => {
            let photos = match album {
                Some(album_id) => client.photos_by_album(album_id).await,
                None => client.photos().await,
            }
            .map_err(map_client_error)?;
            output(cli.json, photos.as_slice(), print_photos)?;
        }
        Command::Todos { user } => {
            let todos = match user {
                Some(user_id) => {
                    print_owner(&client, user_id, cli.json).await;
                    client.todos_by_user(user_id).await
                }
                None => client.todos().await,
            }
            .map_err(map_client_error)?;
            output(cli.json, todos.as_slice(), print_todos)?;
        }
        Command::Browse => {
            let mut session = Session::new(&client, store, options, color);
            browse::run(&mut session).await?;
        }
    }

    Ok(())
}

fn apply_overrides(settings: &mut Settings, cli: &Cli) {
    if let Some(base_url) = &cli.base_url {
        settings.base_url = base_url.clone();
    }
    if let Some(prefs) = &cli.prefs {
        settings.prefs_path = prefs.clone();
    }
    if let Some(device_theme) = cli.device_theme {
        settings.device_theme = Some(device_theme);
    }
}

fn query_options(settings: &Settings) -> QueryOptions {
    QueryOptions {
        retry: settings.query_retries,
        stale_time: settings.stale_time,
        ..QueryOptions::default()
    }
}

/// Экран уже нарисован; ошибку возвращаем только ради кода выхода.
fn ensure_shown(status: ScreenStatus) -> Result<()> {
    if let ScreenStatus::Error(message) = status {
        bail!("screen failed to load: {message}");
    }
    Ok(())
}

fn map_client_error(err: ApiError) -> anyhow::Error {
    let message = match err {
        ApiError::NotFound => "resource not found".to_string(),
        ApiError::Http { status, message } => format!("server responded with {status}: {message}"),
        ApiError::Transport(message) => format!("could not reach the API: {message}"),
        ApiError::Decode(message) => format!("unexpected response from the API: {message}"),
    };
    anyhow::anyhow!(message)
}

/// Имя владельца над списком; если запрос не удался, остаётся номер.
async fn print_owner<A>(api: &A, user_id: i64, json: bool)
where
    A: BlogApi + ?Sized,
{
    if json {
        return;
    }
    let name = api
        .user(user_id)
        .await
        .or_absent()
        .map(|user| user.name)
        .unwrap_or_else(|| format!("User #{user_id}"));
    println!("{name}");
}

fn print_route(renderer: &Renderer, route: &Route, body: Vec<String>) {
    for line in renderer.header(route).into_iter().chain(body) {
        println!("{line}");
    }
}

fn output<T>(json: bool, items: &[T], print: fn(&[T])) -> Result<()>
where
    T: Serialize,
{
    if json {
        print_json(items)
    } else {
        print(items);
        Ok(())
    }
}

fn print_json<T>(value: &T) -> Result<()>
where
    T: Serialize + ?Sized,
{
    let raw = serde_json::to_string_pretty(value).context("failed to encode JSON")?;
    println!("{raw}");
    Ok(())
}

fn print_theme(store: &ThemeStore) {
    println!("preference: {}", store.preference());
    println!("effective: {}", store.effective());
    match store.device_scheme() {
        Some(device) => println!("device: {device}"),
        None => println!("device: unknown"),
    }
}

fn print_search(query: &str, posts: &[Post]) {
    println!("Posts matching {query:?}: {}", posts.len());
    for post in posts {
        println!("- [{}] {} (user #{})", post.id, post.title, post.user_id);
    }
}

fn print_comments(comments: &[Comment]) {
    println!("Comments: {}", comments.len());
    for comment in comments {
        println!(
            "- [{}] {} <{}> on post #{}",
            comment.id, comment.name, comment.email, comment.post_id
        );
    }
}

fn print_users(users: &[User]) {
    println!("Users: {}", users.len());
    for user in users {
        println!(
            "- [{}] {} (@{}) {}, {}",
            user.id, user.name, user.username, user.email, user.address.city
        );
    }
}

fn print_albums(albums: &[Album]) {
    println!("Albums: {}", albums.len());
    for album in albums {
        println!("- [{}] {} (user #{})", album.id, album.title, album.user_id);
    }
}

fn print_photos(photos: &[Photo]) {
    println!("Photos: {}", photos.len());
    for photo in photos {
        println!("- [{}] {} {}", photo.id, photo.title, photo.url);
    }
}

fn print_todos(todos: &[Todo]) {
    let done = todos.iter().filter(|todo| todo.completed).count();
    println!("Todos: {} ({done} done)", todos.len());
    for todo in todos {
        let mark = if todo.completed { "x" } else { " " };
        println!("- [{mark}] {} (#{})", todo.title, todo.id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn base_settings() -> Settings {
        Settings::from_lookup(|_| None).expect("defaults are valid")
    }

    #[test]
    fn cli_flags_override_settings() {
        let cli = Cli::parse_from([
            "reader-cli",
            "--base-url",
            "http://localhost:3000",
            "--prefs",
            "/tmp/prefs.json",
            "--device-theme",
            "dark",
            "home",
        ]);
        let mut settings = base_settings();
        apply_overrides(&mut settings, &cli);

        assert_eq!(settings.base_url, "http://localhost:3000");
        assert_eq!(settings.prefs_path, PathBuf::from("/tmp/prefs.json"));
        assert_eq!(settings.device_theme, Some(EffectiveTheme::Dark));
    }

    #[test]
    fn theme_set_parses_preference() {
        let cli = Cli::parse_from(["reader-cli", "theme", "set", "system"]);
        match cli.command {
            Command::Theme {
                action: ThemeCommand::Set { preference },
            } => assert_eq!(preference, ThemePreference::System),
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn unknown_theme_is_rejected_by_parser() {
        assert!(Cli::try_parse_from(["reader-cli", "theme", "set", "sepia"]).is_err());
    }

    #[test]
    fn query_options_follow_settings() {
        let mut settings = base_settings();
        settings.query_retries = 0;
        settings.stale_time = Duration::from_secs(1);
        let options = query_options(&settings);
        assert_eq!(options.retry, 0);
        assert_eq!(options.stale_time, Duration::from_secs(1));
        assert_eq!(options.retry_delay, QueryOptions::default().retry_delay);
    }

    #[test]
    fn client_errors_read_like_sentences() {
        let err = map_client_error(ApiError::Http {
            status: 503,
            message: "maintenance".to_string(),
        });
        assert_eq!(err.to_string(), "server responded with 503: maintenance");
        assert_eq!(
            map_client_error(ApiError::NotFound).to_string(),
            "resource not found"
        );
    }

    #[test]
    fn error_status_fails_the_command() {
        assert!(ensure_shown(ScreenStatus::Loaded).is_ok());
        assert!(ensure_shown(ScreenStatus::Empty).is_ok());
        assert!(ensure_shown(ScreenStatus::Error("offline".to_string())).is_err());
    }
}
