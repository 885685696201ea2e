use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use memoarc_client::card::{CardEffects, CardView};
use memoarc_client::config::{BACKEND_URL_ENV, ClientConfig, STORAGE_ENV};
use memoarc_client::dashboard::{self, DEFAULT_SUBMIT_TYPE, EMPTY_MESSAGE, Listing};
use memoarc_client::events::AuthEvents;
use memoarc_client::render::Card;
use memoarc_client::repositories::SqliteStorageRepository;
use memoarc_client::resolver::{
    detect_type_from_link, domain_of, effective_type, favicon_for, normalize_url,
};
use memoarc_client::social::{OEmbedHost, SocialEmbedLoader};
use memoarc_client::{BackendClient, ClientError, ContentItem, ContentType, Operation, SessionContext};
use tracing::debug;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "memoarc")]
#[command(about = "Save tweets, videos, documents and links, and view them as preview cards")]
struct Cli {
    /// Base URL of the notes backend
    #[arg(long, env = BACKEND_URL_ENV)]
    backend_url: Option<String>,

    /// Path of the local session store
    #[arg(long, env = STORAGE_ENV)]
    storage: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create an account
    Signup {
        username: String,
        email: String,
        #[arg(long)]
        password: String,
    },
    /// Sign in and remember the session
    Signin {
        email: String,
        #[arg(long)]
        password: String,
    },
    /// Forget the stored session
    Signout,
    /// Print the welcome line for the current session
    Whoami,
    /// Save a link
    Add {
        link: String,
        /// Content type to file the link under
        #[arg(short, long, default_value_t = DEFAULT_SUBMIT_TYPE)]
        kind: ContentType,
        /// Optional title (not stored by the backend)
        #[arg(short, long)]
        title: Option<String>,
    },
    /// List saved content
    List {
        /// Only show one category (twitter, youtube, document, link)
        #[arg(short, long)]
        kind: Option<ContentType>,
        /// Fetch previews and embeds for every card
        #[arg(long)]
        previews: bool,
        #[arg(long)]
        json: bool,
    },
    /// Render a single link as a card
    Show {
        link: String,
        #[arg(short, long)]
        title: Option<String>,
        /// Type the link was saved as; defaults to the detected type
        #[arg(short, long)]
        kind: Option<ContentType>,
        /// Show the player URL for videos
        #[arg(long)]
        play: bool,
        #[arg(long)]
        json: bool,
    },
    /// Print how a link resolves, without contacting the backend
    Resolve { link: String },
}

impl Commands {
    fn operation(&self) -> Operation {
        match self {
            Commands::Signup { .. } => Operation::SignUp,
            Commands::Signin { .. } => Operation::SignIn,
            Commands::Add { .. } => Operation::CreateContent,
            Commands::List { .. } => Operation::LoadContent,
            Commands::Show { .. } => Operation::Preview,
            Commands::Signout | Commands::Whoami | Commands::Resolve { .. } => Operation::Session,
        }
    }
}

type Session = SessionContext<SqliteStorageRepository>;

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("memoarc_client=warn,memoarc=warn")),
        )
        .init();

    let cli = Cli::parse();
    let operation = cli.command.operation();

    match run(cli).await {
        Ok(code) => code,
        Err(err) => {
            debug!(error = %err, "Command failed");
            eprintln!("{}", err.user_message(operation));
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<ExitCode, ClientError> {
    let mut config = ClientConfig::from_env();
    if let Some(backend_url) = cli.backend_url {
        config.backend_url = backend_url;
    }
    if let Some(storage) = cli.storage {
        config.storage_path = storage;
    }

    if let Commands::Resolve { link } = &cli.command {
        resolve(link);
        return Ok(ExitCode::SUCCESS);
    }

    let client = BackendClient::new(&config.backend_url);
    let storage = SqliteStorageRepository::open(&config.storage_path)?;
    let session = SessionContext::init(storage, AuthEvents::default()).await?;

    match cli.command {
        Commands::Signup {
            username,
            email,
            password,
        } => {
            let message = Session::sign_up(&client, &username, &email, &password).await?;
            println!("{message}");
        }
        Commands::Signin { email, password } => {
            session.sign_in(&client, &email, &password).await?;
            println!("Welcome, {}", email.trim());
        }
        Commands::Signout => {
            session.sign_out().await?;
            println!("Signed out");
        }
        Commands::Whoami => {
            println!("{}", dashboard::welcome_line(&session, &client).await);
        }
        Commands::Add { link, kind, title } => {
            dashboard::submit_content(&session, &client, &link, kind, title.as_deref()).await?;
            println!("Saved {} as {kind}", link.trim());
        }
        Commands::List {
            kind,
            previews,
            json,
        } => return list(&session, &client, kind, previews, json).await,
        Commands::Show {
            link,
            title,
            kind,
            play,
            json,
        } => {
            let item = ContentItem {
                id: None,
                kind: kind.unwrap_or_else(|| effective_type(&normalize_url(&link))),
                title,
                link,
            };
            let mut card = CardView::mount(item, &card_effects(&client));
            if play {
                card.play();
            }
            card.settled().await;
            print_cards(&[card.render()], json);
        }
        Commands::Resolve { .. } => {}
    }

    Ok(ExitCode::SUCCESS)
}

fn card_effects(client: &BackendClient) -> CardEffects<BackendClient, OEmbedHost> {
    CardEffects {
        previews: Arc::new(client.clone()),
        social: Arc::new(SocialEmbedLoader::new(OEmbedHost::new())),
    }
}

async fn list(
    session: &Session,
    client: &BackendClient,
    kind: Option<ContentType>,
    previews: bool,
    json: bool,
) -> Result<ExitCode, ClientError> {
    let board = dashboard::load_dashboard(session, client, kind).await;
    if !json {
        println!("{}", board.welcome);
        println!("{}", kind.map(|k| k.section()).unwrap_or("All Notes"));
        println!();
    }

    let items = match board.listing {
        Listing::Loaded(items) => items,
        Listing::Empty => return Ok(print_empty(EMPTY_MESSAGE, json)),
        Listing::EmptyCategory(kind) => {
            return Ok(print_empty(&dashboard::empty_category_message(kind), json));
        }
        Listing::Failed { message, detail } => {
            debug!(%detail, "Listing failed");
            eprintln!("{message}");
            return Ok(ExitCode::FAILURE);
        }
    };

    let mut cards: Vec<CardView> = if previews {
        let effects = card_effects(client);
        items
            .into_iter()
            .map(|item| CardView::mount(item, &effects))
            .collect()
    } else {
        items.into_iter().map(CardView::new).collect()
    };

    for card in &mut cards {
        card.settled().await;
    }

    let rendered: Vec<Card> = cards.iter().map(CardView::render).collect();
    print_cards(&rendered, json);
    Ok(ExitCode::SUCCESS)
}

fn print_empty(message: &str, json: bool) -> ExitCode {
    if json {
        println!("[]");
    } else {
        println!("{message}");
    }
    ExitCode::SUCCESS
}

fn print_cards(cards: &[Card], json: bool) {
    if json {
        match serde_json::to_string_pretty(cards) {
            Ok(out) => println!("{out}"),
            Err(err) => eprintln!("Could not encode cards: {err}"),
        }
        return;
    }

    for card in cards {
        println!("{card}");
    }
}

fn resolve(link: &str) {
    let normalized = normalize_url(link);
    let detected = detect_type_from_link(&normalized);
    let kind = detected.unwrap_or(ContentType::Link);
    let renderer = memoarc_client::render::renderer_for(kind);

    println!("normalized: {normalized}");
    match detected {
        Some(kind) => println!("type:       {kind}"),
        None => println!("type:       link (default)"),
    }
    println!("domain:     {}", domain_of(&normalized));
    println!("favicon:    {}", favicon_for(&normalized));
    if let Some(embed) = renderer.resolve_embed(&normalized) {
        println!("embed:      {embed}");
    }
    if kind == ContentType::Youtube {
        let thumbnail = memoarc_client::resolver::youtube_thumbnail(&normalized);
        if !thumbnail.is_empty() {
            println!("thumbnail:  {thumbnail}");
        }
    }
}
