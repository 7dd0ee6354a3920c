//! LearnHub command-line client.
//!
//! Drives the client core against the configured service: loads the
//! collections, runs the same flows a dashboard would, and prints the result.

use clap::{Parser, Subcommand};

use learnhub::app::App;
use learnhub::managers::delete_flow::DeleteTarget;
use learnhub::services::notifications::{ClientEvent, EventReceiver, Notice, Route};
use learnhub::services::settings_engine::{SettingsEngine, SettingsEngineTrait};
use learnhub::types::bookmark::{Bookmark, BookmarkId, CategoryId};
use learnhub::types::session::AccessToken;

#[derive(Debug, Parser)]
#[command(name = "learnhub", version, about = "Curate your LearnHub bookmarks")]
struct Cli {
    /// Access token from a previous `login`.
    #[arg(long, env = "LEARNHUB_TOKEN", hide_env_values = true)]
    token: Option<String>,

    /// Settings file to use instead of the platform default.
    #[arg(long)]
    config: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Log in and print the access token for `LEARNHUB_TOKEN`.
    Login {
        #[arg(long)]
        email: String,
        #[arg(long, env = "LEARNHUB_PASSWORD", hide_env_values = true)]
        password: String,
    },
    /// List bookmarks, optionally within one category.
    List {
        #[arg(long)]
        category: Option<i64>,
    },
    /// List categories with their bookmark counts.
    Categories,
    /// Search bookmarks on the server.
    Search { keyword: String },
    /// Add a bookmark.
    Add {
        url: String,
        #[arg(long)]
        category: Option<i64>,
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        description: Option<String>,
        /// Comma-separated tag names.
        #[arg(long)]
        tags: Option<String>,
        /// Run URL analysis first; its non-empty suggestions replace the given title, description and tags.
        #[arg(long)]
        analyze: bool,
    },
    /// Edit an existing bookmark.
    Edit {
        id: i64,
        #[arg(long)]
        url: Option<String>,
        #[arg(long)]
        category: Option<i64>,
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        description: Option<String>,
        #[arg(long)]
        tags: Option<String>,
        #[arg(long)]
        analyze: bool,
    },
    /// Create a category.
    AddCategory { name: String },
    /// Rename a category.
    RenameCategory { id: i64, name: String },
    /// Delete a bookmark.
    RmBookmark {
        id: i64,
        /// Confirm the deletion.
        #[arg(long)]
        yes: bool,
    },
    /// Delete a category. Its bookmarks are kept.
    RmCategory {
        id: i64,
        #[arg(long)]
        yes: bool,
    },
    /// List tags.
    Tags {
        #[arg(long)]
        popular: bool,
    },
}

struct FormInput {
    url: Option<String>,
    category: Option<i64>,
    title: Option<String>,
    description: Option<String>,
    tags: Option<String>,
    analyze: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let _ = dotenvy::dotenv();
    let cli = Cli::parse();

    let mut engine = SettingsEngine::new(cli.config.clone());
    engine.load()?;
    engine.apply_env_overrides();
    let settings = engine.get_settings().clone();
    learnhub::telemetry::init(&settings.logging.filter);

    let (mut app, mut events) = App::connect(settings, cli.token.map(AccessToken::new))?;
    let outcome = run(&mut app, cli.command).await;
    report(&mut events);
    outcome
}

async fn run(app: &mut App, command: Command) -> Result<(), Box<dyn std::error::Error>> {
    if let Command::Login { email, password } = &command {
        let token = app.login(email, password).await?;
        println!("{}", token.expose());
        return Ok(());
    }

    app.startup().await?;

    match command {
        Command::Login { .. } => {}
        Command::List { category } => {
            app.store.select_category(category.map(CategoryId));
            print_bookmarks(app, &app.store.visible());
        }
        Command::Categories => {
            for entry in app.store.sidebar() {
                let id = entry.category.map(|c| c.to_string()).unwrap_or_else(|| "-".to_string());
                println!("{:>6}  {:<30} {}", id, entry.label, entry.count);
            }
        }
        Command::Search { keyword } => {
            app.store.search(&keyword).await?;
            print_bookmarks(app, &app.store.visible());
        }
        Command::Add {
            url,
            category,
            title,
            description,
            tags,
            analyze,
        } => {
            app.flows.bookmark_flow_mut().begin_create()?;
            let input = FormInput {
                url: Some(url),
                category,
                title,
                description,
                tags,
                analyze,
            };
            let saved = fill_and_submit(app, input).await?;
            print_bookmarks(app, &[&saved]);
        }
        Command::Edit {
            id,
            url,
            category,
            title,
            description,
            tags,
            analyze,
        } => {
            let target = app
                .store
                .find_bookmark(BookmarkId(id))
                .cloned()
                .ok_or_else(|| format!("no bookmark with id {}", id))?;
            app.flows.bookmark_flow_mut().begin_edit(&target)?;
            let input = FormInput {
                url,
                category,
                title,
                description,
                tags,
                analyze,
            };
            let saved = fill_and_submit(app, input).await?;
            print_bookmarks(app, &[&saved]);
        }
        Command::AddCategory { name } => {
            app.flows.category_flow_mut().begin_create()?;
            app.flows.category_flow_mut().set_name(&name)?;
            let category = app.flows.submit_category(&mut app.store).await?;
            println!("{:>6}  {}", category.id, category.name);
        }
        Command::RenameCategory { id, name } => {
            let category = app
                .store
                .find_category(CategoryId(id))
                .cloned()
                .ok_or_else(|| format!("no category with id {}", id))?;
            app.flows.category_flow_mut().begin_edit(&category)?;
            app.flows.category_flow_mut().set_name(&name)?;
            let category = app.flows.submit_category(&mut app.store).await?;
            println!("{:>6}  {}", category.id, category.name);
        }
        Command::RmBookmark { id, yes } => {
            confirm_delete(app, DeleteTarget::Bookmark(BookmarkId(id)), yes).await?;
        }
        Command::RmCategory { id, yes } => {
            confirm_delete(app, DeleteTarget::Category(CategoryId(id)), yes).await?;
        }
        Command::Tags { popular } => {
            let tags = if popular {
                app.popular_tags().await?
            } else {
                app.tags().await?
            };
            for tag in tags {
                println!("{:>6}  {}", tag.id, tag.name);
            }
        }
    }
    Ok(())
}

async fn fill_and_submit(app: &mut App, input: FormInput) -> Result<Bookmark, Box<dyn std::error::Error>> {
    {
        let form = app.flows.bookmark_flow_mut().form_mut()?;
        if let Some(url) = input.url {
            form.url = url;
        }
        if let Some(category) = input.category {
            form.category_id = category.to_string();
        }
        if let Some(title) = input.title {
            form.title = title;
        }
        if let Some(description) = input.description {
            form.description = description;
        }
        if let Some(tags) = input.tags {
            form.tags = tags;
        }
    }
    if input.analyze {
        if let Err(e) = app.flows.analyze_bookmark_url(&app.store).await {
            eprintln!("warning: {}", e);
        }
    }
    Ok(app.flows.submit_bookmark(&mut app.store).await?)
}

async fn confirm_delete(app: &mut App, target: DeleteTarget, yes: bool) -> Result<(), Box<dyn std::error::Error>> {
    app.flows.request_delete(target)?;
    if !yes {
        println!("{} Re-run with --yes to confirm.", target.confirmation_prompt());
        app.flows.cancel_delete()?;
        return Ok(());
    }
    app.flows.confirm_delete(&mut app.store).await?;
    Ok(())
}

fn print_bookmarks(app: &App, bookmarks: &[&Bookmark]) {
    let display = &app.settings.display;
    if bookmarks.is_empty() {
        println!("No bookmarks yet");
        return;
    }
    for bookmark in bookmarks {
        let category = match bookmark.category_id() {
            Some(id) => app
                .store
                .find_category(id)
                .map(|c| c.name.as_str())
                .unwrap_or("Uncategorized"),
            None => "Uncategorized",
        };
        let (tags, hidden) = bookmark.tag_preview(display.tag_preview_limit);
        let mut tag_line = tags.join(", ");
        if hidden > 0 {
            tag_line.push_str(&format!(" +{}", hidden));
        }
        println!(
            "{:>6}  {}  [{}]\n        {}\n        {}",
            bookmark.id,
            bookmark.display_title(&display.untitled_placeholder),
            category,
            bookmark.url,
            tag_line
        );
    }
}

fn report(events: &mut EventReceiver) {
    for event in events.drain() {
        match event {
            ClientEvent::Notice(Notice::Success(message)) => println!("{}", message),
            ClientEvent::Notice(Notice::Error(message)) => eprintln!("error: {}", message),
            ClientEvent::Navigate(Route::Login) => {
                eprintln!("Not logged in. Run `learnhub login` and set LEARNHUB_TOKEN.")
            }
        }
    }
}
