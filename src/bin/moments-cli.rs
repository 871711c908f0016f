use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use moments::album::store::{MomentStore, StoreError};
use moments::album::view::{AlbumView, Toast, ToastKind};
use moments::config::{ClientConfig, ClientTimeouts, ConfigError, DEFAULT_API_URL, parse_locale};
use moments::image::read_image_file;
use moments::net::api::{ApiError, HttpMomentsApi};

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Api(#[from] ApiError),
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error("failed to read image {path}: {source}")]
    Image { path: PathBuf, source: std::io::Error },
    #[error("moment {0} not found")]
    NotFound(i64),
}

#[derive(Parser, Debug)]
#[command(name = "moments-cli", about = "Browse and edit the moments album")]
struct Cli {
    #[arg(long, env = "MOMENTS_API_URL", default_value = DEFAULT_API_URL)]
    api_url: String,

    #[arg(long, env = "MOMENTS_LOCALE", default_value = "ru")]
    locale: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Show every moment.
    List,
    /// Add a moment.
    Add {
        #[arg(long)]
        title: String,
        #[arg(long, help = "YYYY-MM-DD")]
        date: String,
        #[arg(long)]
        description: String,
        #[command(flatten)]
        image: ImageArgs,
    },
    /// Change a moment. Omitted fields keep their current value.
    Edit {
        id: i64,
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        date: Option<String>,
        #[arg(long)]
        description: Option<String>,
        #[command(flatten)]
        image: ImageArgs,
    },
    /// Delete a moment.
    Delete { id: i64 },
}

#[derive(clap::Args, Debug)]
struct ImageArgs {
    #[arg(long, conflicts_with = "image_url", help = "Local image file, embedded as a data URL")]
    image_file: Option<PathBuf>,
    #[arg(long)]
    image_url: Option<String>,
}

impl ImageArgs {
    async fn resolve(self) -> Result<Option<String>, CliError> {
        match (self.image_file, self.image_url) {
            (Some(path), _) => read_image_file(&path)
                .await
                .map(Some)
                .map_err(|source| CliError::Image { path, source }),
            (None, url) => Ok(url),
        }
    }
}

#[tokio::main]
async fn main() {
    let _ = dotenvy::dotenv();
    tracing_subscriber::fmt().with_writer(std::io::stderr).init();

    if let Err(e) = run(Cli::parse()).await {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), CliError> {
    // URL and locale come from flags (with env fallbacks); timeouts only from env.
    let config = ClientConfig::new(cli.api_url, ClientTimeouts::from_env(), parse_locale(Some(&cli.locale))?);
    let api = HttpMomentsApi::from_config(&config)?;
    let store = MomentStore::new(Arc::new(api));
    let mut view = AlbumView::new(config.locale);
    view.show_moments();

    let result = dispatch(cli.command, &mut view, &store).await;
    print_toasts(view.take_toasts());
    result
}

async fn dispatch(command: Command, view: &mut AlbumView, store: &MomentStore) -> Result<(), CliError> {
    match command {
        Command::List => list(view, store).await,
        Command::Add { title, date, description, image } => {
            let image = image.resolve().await?;
            view.open_create();
            if let Some(form) = view.form_mut() {
                form.title = title;
                form.date = date;
                form.description = description;
                form.image = image;
            }
            view.submit(store).await.map_err(CliError::from)
        }
        Command::Edit { id, title, date, description, image } => {
            let image = image.resolve().await?;
            view.refresh(store).await?;
            let moment = store.get(id).ok_or(CliError::NotFound(id))?;
            view.open_edit(&moment);
            if let Some(form) = view.form_mut() {
                if let Some(title) = title {
                    form.title = title;
                }
                if let Some(date) = date {
                    form.date = date;
                }
                if let Some(description) = description {
                    form.description = description;
                }
                form.image = image;
            }
            view.submit(store).await.map_err(CliError::from)
        }
        Command::Delete { id } => {
            view.refresh(store).await?;
            let moment = store.get(id).ok_or(CliError::NotFound(id))?;
            view.open_delete(&moment);
            view.submit(store).await.map_err(CliError::from)
        }
    }
}

async fn list(view: &mut AlbumView, store: &MomentStore) -> Result<(), CliError> {
    view.refresh(store).await?;
    let cards = view.cards(&store.moments());
    if cards.is_empty() {
        println!("No moments yet.");
    }
    for card in cards {
        println!("#{} {} ({})", card.id, card.title, card.date_label);
        println!("    {}", card.description);
    }
    Ok(())
}

fn print_toasts(toasts: Vec<Toast>) {
    for toast in toasts {
        match toast.kind {
            ToastKind::Success => println!("{}", toast.message),
            ToastKind::Error => eprintln!("{}", toast.message),
        }
    }
}
