mod error;
mod file_store;
mod rest;

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use serde_json::{Value, json};
use storefront_core::{
    AuthBackend, CatalogApi, MemoryLocation, ProductDraft, ProductQuery, Session, SessionStatus, SessionStore,
};

use crate::error::CliError;
use crate::file_store::FileStore;
use crate::rest::RestBackend;

type CliStore = SessionStore<RestBackend, FileStore, MemoryLocation>;

#[derive(Parser, Debug)]
#[command(name = "storefront", about = "Storefront session and catalog CLI")]
struct Cli {
    #[arg(long, env = "STOREFRONT_BASE_URL", default_value = "http://127.0.0.1:8001")]
    base_url: String,

    /// Where the session token and cached user are kept between runs.
    #[arg(long, env = "STOREFRONT_STATE_FILE", default_value = ".storefront-session.json")]
    state_file: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    Ping,
    Auth(AuthCommand),
    Products(ProductsCommand),
    Categories,
    Analytics,
}

#[derive(Args, Debug)]
struct AuthCommand {
    #[command(subcommand)]
    command: AuthSubcommand,
}

#[derive(Subcommand, Debug)]
enum AuthSubcommand {
    /// Validate the saved token and show the session.
    Status,
    /// Exchange a one-time session id.
    Login {
        #[arg(long)]
        session_id: String,
    },
    /// Exchange a Google access token obtained elsewhere.
    Google {
        #[arg(long)]
        access_token: String,
    },
    /// Finish an OAuth redirect by pasting the URL the browser landed on.
    Callback { url: String },
    /// Ask the backend for a provider login URL.
    Url,
    /// Print the OAuth entry point to open in a browser.
    GoogleUrl,
    Logout,
}

#[derive(Args, Debug)]
struct ProductsCommand {
    #[command(subcommand)]
    command: ProductsSubcommand,
}

#[derive(Subcommand, Debug)]
enum ProductsSubcommand {
    List(ListArgs),
    Get {
        id: String,
    },
    Create {
        #[arg(long)]
        data: String,
    },
    Update {
        id: String,
        #[arg(long)]
        data: String,
    },
    Delete {
        id: String,
    },
}

#[derive(Args, Debug, Default)]
struct ListArgs {
    #[arg(long)]
    category: Option<String>,
    #[arg(long)]
    search: Option<String>,
    #[arg(long)]
    min_price: Option<f64>,
    #[arg(long)]
    max_price: Option<f64>,
    #[arg(long)]
    sort_by: Option<String>,
    #[arg(long)]
    limit: Option<usize>,
}

impl From<ListArgs> for ProductQuery {
    fn from(args: ListArgs) -> Self {
        Self {
            category: args.category,
            search: args.search,
            min_price: args.min_price,
            max_price: args.max_price,
            sort_by: args.sort_by,
            limit: args.limit,
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), CliError> {
    tracing_subscriber::fmt().with_writer(std::io::stderr).init();

    let cli = Cli::parse();
    let backend = RestBackend::new(&cli.base_url)?;
    tracing::debug!(api_base = backend.api_base(), state_file = %cli.state_file.display(), "cli configured");

    match cli.command {
        Command::Ping => print_json(&backend.health().await?),
        Command::Auth(auth) => run_auth(backend, cli.state_file, auth.command).await,
        Command::Products(products) => run_products(&open_store(backend, cli.state_file, None), products.command).await,
        Command::Categories => {
            let store = open_store(backend, cli.state_file, None);
            store.initialize().await;
            let categories = store.backend().list_categories(store.token().as_deref()).await?;
            print_json(&json!({ "categories": categories }))
        }
        Command::Analytics => {
            let store = open_store(backend, cli.state_file, None);
            let token = signed_in_token(&store).await?;
            print_json(&serde_json::to_value(store.backend().analytics(Some(&token)).await?)?)
        }
    }
}

fn open_store(backend: RestBackend, state_file: PathBuf, href: Option<String>) -> CliStore {
    let location = href.map_or_else(MemoryLocation::default, MemoryLocation::new);
    let storage = FileStore::open(state_file);
    tracing::debug!(path = %storage.path().display(), "session file opened");
    SessionStore::new(backend, storage, location)
}

async fn signed_in_token(store: &CliStore) -> Result<String, CliError> {
    store.initialize().await;
    store.token().ok_or(CliError::NotSignedIn)
}

async fn run_auth(backend: RestBackend, state_file: PathBuf, command: AuthSubcommand) -> Result<(), CliError> {
    match command {
        AuthSubcommand::Status => {
            let store = open_store(backend, state_file, None);
            print_json(&session_json(&store.initialize().await))
        }
        AuthSubcommand::Login { session_id } => {
            let store = open_store(backend, state_file, None);
            store.initialize().await;
            store.login(&session_id).await?;
            print_json(&session_json(&store.snapshot()))
        }
        AuthSubcommand::Google { access_token } => {
            let store = open_store(backend, state_file, None);
            store.initialize().await;
            store.login_with_google_token(&access_token).await?;
            print_json(&session_json(&store.snapshot()))
        }
        AuthSubcommand::Callback { url } => {
            let store = open_store(backend, state_file, Some(url));
            print_json(&session_json(&store.initialize().await))
        }
        AuthSubcommand::Url => {
            let store = open_store(backend, state_file, None);
            let url = store.login_with_redirect().await?;
            print_json(&json!({ "auth_url": url }))
        }
        AuthSubcommand::GoogleUrl => {
            let url = backend.google_login_url();
            print_json(&json!({ "auth_url": url }))
        }
        AuthSubcommand::Logout => {
            let store = open_store(backend, state_file, None);
            store.logout().await;
            print_json(&session_json(&store.snapshot()))
        }
    }
}

async fn run_products(store: &CliStore, command: ProductsSubcommand) -> Result<(), CliError> {
    let api = store.backend();
    match command {
        ProductsSubcommand::List(args) => {
            store.initialize().await;
            let products = api.list_products(&args.into(), store.token().as_deref()).await?;
            print_json(&serde_json::to_value(products)?)
        }
        ProductsSubcommand::Get { id } => {
            store.initialize().await;
            let product = api.get_product(&id, store.token().as_deref()).await?;
            print_json(&serde_json::to_value(product)?)
        }
        ProductsSubcommand::Create { data } => {
            let draft = parse_draft(&data)?;
            let token = signed_in_token(store).await?;
            print_json(&serde_json::to_value(api.create_product(&draft, Some(&token)).await?)?)
        }
        ProductsSubcommand::Update { id, data } => {
            let draft = parse_draft(&data)?;
            let token = signed_in_token(store).await?;
            print_json(&serde_json::to_value(api.update_product(&id, &draft, Some(&token)).await?)?)
        }
        ProductsSubcommand::Delete { id } => {
            let token = signed_in_token(store).await?;
            api.delete_product(&id, Some(&token)).await?;
            print_json(&json!({ "deleted": id }))
        }
    }
}

fn parse_draft(data: &str) -> Result<ProductDraft, CliError> {
    Ok(serde_json::from_str(data)?)
}

fn status_label(status: SessionStatus) -> &'static str {
    match status {
        SessionStatus::Uninitialized => "uninitialized",
        SessionStatus::Authenticating => "authenticating",
        SessionStatus::Authenticated => "authenticated",
        SessionStatus::Unauthenticated => "unauthenticated",
    }
}

/// Session as printed by `auth` commands. The token itself is never printed.
fn session_json(session: &Session) -> Value {
    json!({
        "status": status_label(session.status()),
        "authenticated": session.is_authenticated(),
        "admin": session.is_admin(),
        "user": session.user,
        "error": session.error,
    })
}

fn print_json(value: &Value) -> Result<(), CliError> {
    let rendered = serde_json::to_string_pretty(value)?;
    println!("{rendered}");
    Ok(())
}
