use anyhow::Context;
use bookshelf_app::books::{Book, BookStore};
use bookshelf_kernel::settings::Settings;
use clap::{Parser, Subcommand};

/// Book inventory service
#[derive(Debug, Parser)]
#[command(name = "bookshelf", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Serve the HTTP API
    Serve,
    /// Print the starting collection as a table
    List {
        /// Only books whose title, author or genre contains this text
        #[arg(short, long)]
        search: Option<String>,
    },
    /// Print one book as JSON
    Show {
        /// Book identifier
        id: String,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let settings = Settings::load().with_context(|| "failed to load bookshelf settings")?;
    bookshelf_telemetry::init(&settings.telemetry);

    tracing::debug!(env = ?settings.environment, command = ?cli.command, "bookshelf cli");

    match cli.command {
        Command::Serve => bookshelf_app::run(settings).await,
        Command::List { search } => {
            let store = BookStore::from_settings(&settings.books);
            let books = match search {
                Some(query) => store.search(&query).await,
                None => store.list_all().await,
            };
            print!("{}", render_table(&books));
            Ok(())
        }
        Command::Show { id } => {
            let store = BookStore::from_settings(&settings.books);
            let book = store
                .get_by_id(&id)
                .await?
                .with_context(|| format!("book {} not found", id))?;
            println!("{}", serde_json::to_string_pretty(&book)?);
            Ok(())
        }
    }
}

fn render_table(books: &[Book]) -> String {
    if books.is_empty() {
        return "no books found\n".to_string();
    }

    let id_width = books
        .iter()
        .map(|book| book.id.chars().count())
        .max()
        .unwrap_or(0)
        .max(2);

    let mut out = format!(
        "{:<id_width$}  {:<32}  {:<24}  {:<22}  {}\n",
        "ID", "TITLE", "AUTHOR", "GENRE", "ISBN"
    );
    for book in books {
        out.push_str(&format!(
            "{:<id_width$}  {:<32}  {:<24}  {:<22}  {}\n",
            book.id,
            truncate(&book.title, 32),
            truncate(&book.author, 24),
            truncate(&book.genre, 22),
            book.isbn
        ));
    }
    out
}

fn truncate(value: &str, width: usize) -> String {
    if value.chars().count() <= width {
        return value.to_string();
    }
    let mut shortened: String = value.chars().take(width.saturating_sub(1)).collect();
    shortened.push('…');
    shortened
}
