use std::collections::HashSet;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use bookshelf_kernel::settings::{BooksSettings, LatencySettings};
use serde::Serialize;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::error::{BookStoreError, BookStoreResult};
use super::models::{Book, BookInput};
use super::seed::seed_books;
use super::validation::validate;

/// Simulated delay applied by each store operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Latency {
    pub list: Duration,
    pub get: Duration,
    pub create: Duration,
    pub update: Duration,
    pub delete: Duration,
}

impl Latency {
    pub const fn none() -> Self {
        Self {
            list: Duration::ZERO,
            get: Duration::ZERO,
            create: Duration::ZERO,
            update: Duration::ZERO,
            delete: Duration::ZERO,
        }
    }
}

impl Default for Latency {
    fn default() -> Self {
        LatencySettings::default().into()
    }
}

impl From<LatencySettings> for Latency {
    fn from(settings: LatencySettings) -> Self {
        Self {
            list: Duration::from_millis(settings.list_ms),
            get: Duration::from_millis(settings.get_ms),
            create: Duration::from_millis(settings.create_ms),
            update: Duration::from_millis(settings.update_ms),
            delete: Duration::from_millis(settings.delete_ms),
        }
    }
}

async fn simulate(delay: Duration) {
    if !delay.is_zero() {
        tokio::time::sleep(delay).await;
    }
}

/// In-memory book collection, the single authority for validation,
/// isbn uniqueness and existence checks.
///
/// Cloning yields another handle to the same collection. Mutations hold the
/// write lock from their first check until the change is applied, so they
/// never interleave; all rejections happen before the simulated delay. Once
/// a mutation holds the lock it runs on its own task and completes even if
/// the caller is dropped.
#[derive(Debug, Clone)]
pub struct BookStore {
    books: Arc<RwLock<Vec<Book>>>,
    latency: Latency,
}

impl BookStore {
    /// An empty store.
    pub fn new(latency: Latency) -> Self {
        Self {
            books: Arc::new(RwLock::new(Vec::new())),
            latency,
        }
    }

    /// A store holding the six seed records.
    pub fn seeded(latency: Latency) -> Self {
        Self {
            books: Arc::new(RwLock::new(seed_books())),
            latency,
        }
    }

    pub fn from_settings(settings: &BooksSettings) -> Self {
        let latency = Latency::from(settings.latency);
        if settings.seed {
            Self::seeded(latency)
        } else {
            Self::new(latency)
        }
    }

    /// A store holding `records` in the given order. Every record must be
    /// valid, with a non-empty id, and ids and isbns must be distinct.
    pub fn with_records(records: Vec<Book>, latency: Latency) -> BookStoreResult<Self> {
        let mut ids = HashSet::new();
        let mut isbns = HashSet::new();

        for record in &records {
            if record.id.is_empty() {
                return Err(BookStoreError::invalid_argument("Book ID is required"));
            }
            if !ids.insert(record.id.as_str()) {
                return Err(BookStoreError::invalid_argument(format!(
                    "Duplicate book ID {}",
                    record.id
                )));
            }
            if !isbns.insert(record.isbn.as_str()) {
                return Err(BookStoreError::conflict(record.isbn.clone()));
            }
            validate(&BookInput::from(record.clone()))?;
        }

        Ok(Self {
            books: Arc::new(RwLock::new(records)),
            latency,
        })
    }

    pub fn latency(&self) -> Latency {
        self.latency
    }

    /// Number of stored records. No simulated delay.
    pub async fn len(&self) -> usize {
        self.books.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.books.read().await.is_empty()
    }

    /// Snapshot of every record in insertion order.
    pub async fn list_all(&self) -> Vec<Book> {
        simulate(self.latency.list).await;
        self.books.read().await.clone()
    }

    /// Records whose title, author or genre contains `query`, ignoring case.
    /// An empty query matches everything.
    pub async fn search(&self, query: &str) -> Vec<Book> {
        simulate(self.latency.list).await;

        let books = self.books.read().await;
        if query.is_empty() {
            return books.clone();
        }

        let needle = query.to_lowercase();
        books
            .iter()
            .filter(|book| book.matches(&needle))
            .cloned()
            .collect()
    }

    /// Totals over the whole collection.
    pub async fn stats(&self) -> BookStats {
        simulate(self.latency.list).await;
        BookStats::from_books(&self.books.read().await)
    }

    /// Look up a record. `Ok(None)` when no record has this id.
    pub async fn get_by_id(&self, id: &str) -> BookStoreResult<Option<Book>> {
        require_id(id)?;

        simulate(self.latency.get).await;

        let found = self
            .books
            .read()
            .await
            .iter()
            .find(|book| book.id == id)
            .cloned();

        if found.is_none() {
            tracing::warn!(book_id = %id, "book not found");
        }
        Ok(found)
    }

    /// Store a new record under a freshly assigned id.
    pub async fn create(&self, input: BookInput) -> BookStoreResult<Book> {
        validate(&input).inspect_err(log_rejection)?;

        let mut books = Arc::clone(&self.books).write_owned().await;
        let delay = self.latency.create;

        run_to_completion(async move {
            if books.iter().any(|book| book.isbn == input.isbn) {
                let error = BookStoreError::conflict(input.isbn);
                log_rejection(&error);
                return Err(error);
            }

            let id = next_id(&books);
            simulate(delay).await;

            let book = Book::from_input(id, input);
            books.push(book.clone());

            tracing::info!(book_id = %book.id, title = %book.title, "book created");
            Ok(book)
        })
        .await
    }

    /// Replace every field of a record except its id. `Ok(None)` when no
    /// record has this id.
    pub async fn update(&self, id: &str, input: BookInput) -> BookStoreResult<Option<Book>> {
        require_id(id)?;
        validate(&input).inspect_err(log_rejection)?;

        let mut books = Arc::clone(&self.books).write_owned().await;
        let delay = self.latency.update;
        let id = id.to_string();

        run_to_completion(async move {
            let Some(index) = books.iter().position(|book| book.id == id) else {
                tracing::warn!(book_id = %id, "attempted to update a book that does not exist");
                return Ok(None);
            };

            if books[index].isbn != input.isbn
                && books
                    .iter()
                    .any(|book| book.id != id && book.isbn == input.isbn)
            {
                let error = BookStoreError::conflict(input.isbn);
                log_rejection(&error);
                return Err(error);
            }

            simulate(delay).await;

            let book = &mut books[index];
            book.apply(input);

            tracing::info!(book_id = %book.id, title = %book.title, "book updated");
            Ok(Some(book.clone()))
        })
        .await
    }

    /// Remove a record. `Ok(false)` when no record has this id.
    pub async fn delete(&self, id: &str) -> BookStoreResult<bool> {
        require_id(id)?;

        let mut books = Arc::clone(&self.books).write_owned().await;
        let delay = self.latency.delete;
        let id = id.to_string();

        run_to_completion(async move {
            let Some(index) = books.iter().position(|book| book.id == id) else {
                tracing::warn!(book_id = %id, "attempted to delete a book that does not exist");
                return Ok(false);
            };

            simulate(delay).await;

            books.remove(index);

            tracing::info!(book_id = %id, "book deleted");
            Ok(true)
        })
        .await
    }
}

/// Aggregate figures shown alongside the collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BookStats {
    pub total_books: usize,
    /// Distinct author names
    pub authors: usize,
    /// Distinct genres
    pub genres: usize,
    pub total_pages: u64,
}

impl BookStats {
    pub fn from_books(books: &[Book]) -> Self {
        let authors: HashSet<&str> = books.iter().map(|book| book.author.as_str()).collect();
        let genres: HashSet<&str> = books.iter().map(|book| book.genre.as_str()).collect();

        Self {
            total_books: books.len(),
            authors: authors.len(),
            genres: genres.len(),
            total_pages: books
                .iter()
                .map(|book| u64::try_from(book.pages).unwrap_or(0))
                .sum(),
        }
    }
}

/// Run a mutation on its own task so that it finishes even when the caller
/// stops waiting for the result.
async fn run_to_completion<T, F>(work: F) -> BookStoreResult<T>
where
    T: Send + 'static,
    F: Future<Output = BookStoreResult<T>> + Send + 'static,
{
    tokio::spawn(work).await.map_err(BookStoreError::internal)?
}

fn require_id(id: &str) -> BookStoreResult<()> {
    if id.is_empty() {
        return Err(BookStoreError::invalid_argument("Book ID is required"));
    }
    Ok(())
}

fn next_id(books: &[Book]) -> String {
    loop {
        let id = Uuid::now_v7().to_string();
        if books.iter().all(|book| book.id != id) {
            return id;
        }
    }
}

fn log_rejection(error: &BookStoreError) {
    match error {
        BookStoreError::Validation { field, message } => {
            tracing::debug!(%field, %message, "book input rejected");
        }
        BookStoreError::Conflict { isbn } => {
            tracing::debug!(%isbn, "duplicate isbn rejected");
        }
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::modules::books::models::BookField;
    use crate::modules::books::seed::sample_input;
    use std::time::Instant;

    fn store() -> BookStore {
        BookStore::seeded(Latency::none())
    }

    #[tokio::test]
    async fn seeded_store_lists_six_records_in_order() {
        let books = store().list_all().await;
        let ids: Vec<_> = books.iter().map(|book| book.id.as_str()).collect();

        assert_eq!(ids, vec!["1", "2", "3", "4", "5", "6"]);
    }

    #[tokio::test]
    async fn list_all_returns_a_snapshot() {
        let store = store();
        let mut snapshot = store.list_all().await;
        snapshot.clear();

        assert_eq!(store.len().await, 6);
    }

    #[tokio::test]
    async fn create_then_get_returns_input_plus_id() {
        let store = store();
        let input = sample_input();

        let created = store.create(input.clone()).await.unwrap();
        let fetched = store.get_by_id(&created.id).await.unwrap().unwrap();

        assert_eq!(fetched, created);
        assert_eq!(BookInput::from(fetched), input);
        assert_eq!(store.len().await, 7);
    }

    #[tokio::test]
    async fn created_records_are_appended() {
        let store = store();
        let created = store.create(sample_input()).await.unwrap();

        let books = store.list_all().await;
        assert_eq!(books.last().unwrap().id, created.id);
    }

    #[tokio::test]
    async fn created_ids_are_fresh() {
        let store = BookStore::new(Latency::none());
        let first = store.create(sample_input()).await.unwrap();
        assert!(store.delete(&first.id).await.unwrap());

        let second = store.create(sample_input()).await.unwrap();
        assert_ne!(first.id, second.id);
    }

    #[tokio::test]
    async fn create_with_duplicate_isbn_conflicts_and_changes_nothing() {
        let store = store();
        let before = store.list_all().await;

        let mut input = sample_input();
        input.isbn = "978-0743273565".to_string();

        let error = store.create(input).await.unwrap_err();
        assert!(matches!(
            error,
            BookStoreError::Conflict { ref isbn } if isbn == "978-0743273565"
        ));
        assert_eq!(store.list_all().await, before);
    }

    #[tokio::test]
    async fn create_with_empty_title_reports_title() {
        let store = store();
        let mut input = sample_input();
        input.title = String::new();
        input.isbn = String::new();

        let error = store.create(input).await.unwrap_err();
        assert!(matches!(
            error,
            BookStoreError::Validation {
                field: BookField::Title,
                ..
            }
        ));
        assert_eq!(store.len().await, 6);
    }

    #[tokio::test]
    async fn validation_runs_before_conflict_check() {
        let store = store();
        let mut input = sample_input();
        input.isbn = "978-0743273565".to_string();
        input.overview = "short".to_string();

        let error = store.create(input).await.unwrap_err();
        assert!(matches!(
            error,
            BookStoreError::Validation {
                field: BookField::Overview,
                ..
            }
        ));
    }

    #[tokio::test]
    async fn short_overview_fails_create_and_update() {
        let store = store();
        let mut input = sample_input();
        input.overview = "  too few ".to_string();

        let create = store.create(input.clone()).await.unwrap_err();
        let update = store.update("1", input).await.unwrap_err();

        for error in [create, update] {
            assert!(matches!(
                error,
                BookStoreError::Validation {
                    field: BookField::Overview,
                    ..
                }
            ));
        }
    }

    #[tokio::test]
    async fn get_by_id_distinguishes_missing_from_invalid() {
        let store = store();

        assert!(store.get_by_id("nonexistent-id").await.unwrap().is_none());
        assert!(matches!(
            store.get_by_id("").await,
            Err(BookStoreError::InvalidArgument { .. })
        ));
    }

    #[tokio::test]
    async fn update_round_trips_and_keeps_id() {
        let store = store();
        let input = sample_input();

        let updated = store.update("3", input.clone()).await.unwrap().unwrap();
        assert_eq!(updated.id, "3");

        let fetched = store.get_by_id("3").await.unwrap().unwrap();
        assert_eq!(fetched.id, "3");
        assert_eq!(BookInput::from(fetched), input);
        assert_eq!(store.len().await, 6);
    }

    #[tokio::test]
    async fn update_keeping_own_isbn_is_allowed() {
        let store = store();
        let mut input: BookInput = store.get_by_id("1").await.unwrap().unwrap().into();
        input.pages = 200;

        let updated = store.update("1", input).await.unwrap().unwrap();
        assert_eq!(updated.pages, 200);
        assert_eq!(updated.isbn, "978-0743273565");
    }

    #[tokio::test]
    async fn update_to_another_records_isbn_conflicts() {
        let store = store();
        let before = store.list_all().await;

        let mut input = sample_input();
        input.isbn = "978-0061120084".to_string();

        let error = store.update("1", input).await.unwrap_err();
        assert!(matches!(error, BookStoreError::Conflict { .. }));
        assert_eq!(store.list_all().await, before);
    }

    #[tokio::test]
    async fn update_of_missing_record_changes_nothing() {
        let store = store();
        let before = store.list_all().await;

        let result = store.update("nonexistent-id", sample_input()).await.unwrap();

        assert!(result.is_none());
        assert_eq!(store.list_all().await, before);
    }

    #[tokio::test]
    async fn update_requires_id() {
        let error = store().update("", sample_input()).await.unwrap_err();
        assert_eq!(error.to_string(), "Book ID is required");
    }

    #[tokio::test]
    async fn delete_twice_returns_true_then_false() {
        let store = store();

        assert!(store.delete("2").await.unwrap());
        assert_eq!(store.len().await, 5);

        assert!(!store.delete("2").await.unwrap());
        assert_eq!(store.len().await, 5);
        assert!(store.get_by_id("2").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn delete_of_unknown_id_is_false() {
        let store = store();

        assert!(!store.delete("nonexistent-id").await.unwrap());
        assert_eq!(store.len().await, 6);
        assert!(matches!(
            store.delete("").await,
            Err(BookStoreError::InvalidArgument { .. })
        ));
    }

    #[tokio::test]
    async fn deleted_isbn_can_be_reused() {
        let store = store();
        assert!(store.delete("1").await.unwrap());

        let mut input = sample_input();
        input.isbn = "978-0743273565".to_string();
        let created = store.create(input).await.unwrap();

        assert_ne!(created.id, "1");
    }

    #[tokio::test]
    async fn search_matches_title_author_and_genre_case_insensitively() {
        let store = store();

        let titles = |books: Vec<Book>| -> Vec<String> {
            books.into_iter().map(|book| book.title).collect()
        };

        assert_eq!(titles(store.search("hobbit").await), vec!["The Hobbit"]);
        assert_eq!(titles(store.search("ORWELL").await), vec!["1984"]);
        assert_eq!(
            titles(store.search("fiction").await),
            vec![
                "The Great Gatsby",
                "1984",
                "The Catcher in the Rye"
            ]
        );
        assert!(store.search("no such book").await.is_empty());
        assert_eq!(store.search("").await.len(), 6);
    }

    #[tokio::test]
    async fn search_does_not_trim_the_query() {
        let store = store();

        assert!(store.search("   ").await.is_empty());
        assert_eq!(store.search("the ").await.len(), 3);
    }

    #[tokio::test]
    async fn stats_summarise_the_collection() {
        let store = store();

        let stats = store.stats().await;
        assert_eq!(
            stats,
            BookStats {
                total_books: 6,
                authors: 6,
                genres: 6,
                total_pages: 1765,
            }
        );

        let mut input = sample_input();
        input.author = "Harper Lee".to_string();
        input.pages = 35;
        store.create(input).await.unwrap();

        let stats = store.stats().await;
        assert_eq!(stats.total_books, 7);
        assert_eq!(stats.authors, 6);
        assert_eq!(stats.genres, 6);
        assert_eq!(stats.total_pages, 1800);
    }

    #[test]
    fn stats_of_empty_collection_are_zero() {
        assert_eq!(
            BookStats::from_books(&[]),
            BookStats {
                total_books: 0,
                authors: 0,
                genres: 0,
                total_pages: 0,
            }
        );
    }

    #[tokio::test]
    async fn abandoned_create_still_completes() {
        let latency = Latency {
            create: Duration::from_millis(200),
            ..Latency::none()
        };
        let store = BookStore::seeded(latency);

        let waited =
            tokio::time::timeout(Duration::from_millis(20), store.create(sample_input())).await;
        assert!(waited.is_err());

        tokio::time::sleep(Duration::from_millis(400)).await;
        assert_eq!(store.len().await, 7);
        assert_eq!(store.search("earthsea").await.len(), 1);
    }

    #[tokio::test]
    async fn abandoned_delete_still_completes() {
        let latency = Latency {
            delete: Duration::from_millis(200),
            ..Latency::none()
        };
        let store = BookStore::seeded(latency);

        let waited = tokio::time::timeout(Duration::from_millis(20), store.delete("1")).await;
        assert!(waited.is_err());

        tokio::time::sleep(Duration::from_millis(400)).await;
        assert_eq!(store.len().await, 5);
        assert!(store.get_by_id("1").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn abandoned_update_still_completes() {
        let latency = Latency {
            update: Duration::from_millis(200),
            ..Latency::none()
        };
        let store = BookStore::seeded(latency);

        let waited =
            tokio::time::timeout(Duration::from_millis(20), store.update("2", sample_input()))
                .await;
        assert!(waited.is_err());

        tokio::time::sleep(Duration::from_millis(400)).await;
        let book = store.get_by_id("2").await.unwrap().unwrap();
        assert_eq!(book.title, "A Wizard of Earthsea");
    }

    #[tokio::test]
    async fn panicking_mutation_is_an_internal_error() {
        let result: BookStoreResult<()> = run_to_completion(async {
            if true {
                panic!("mutation task died");
            }
            Ok(())
        })
        .await;

        let error = result.unwrap_err();
        assert!(matches!(error, BookStoreError::Internal(_)));
        assert_eq!(error.to_string(), "internal book store failure");
    }

    #[tokio::test]
    async fn with_records_rejects_duplicates() {
        let mut books = seed_books();
        let mut copy = books[0].clone();
        copy.id = "99".to_string();
        books.push(copy);

        assert!(matches!(
            BookStore::with_records(books, Latency::none()),
            Err(BookStoreError::Conflict { .. })
        ));

        let mut books = seed_books();
        books[1].id = "1".to_string();
        assert!(matches!(
            BookStore::with_records(books, Latency::none()),
            Err(BookStoreError::InvalidArgument { .. })
        ));
    }

    #[tokio::test]
    async fn from_settings_honours_seed_flag() {
        let mut settings = BooksSettings::default();
        settings.seed = false;
        settings.latency = LatencySettings::none();

        let store = BookStore::from_settings(&settings);
        assert!(store.is_empty().await);
        assert_eq!(store.latency(), Latency::none());
    }

    #[tokio::test]
    async fn rejections_happen_before_the_delay() {
        let latency = Latency {
            create: Duration::from_millis(500),
            ..Latency::none()
        };
        let store = BookStore::seeded(latency);

        let mut input = sample_input();
        input.isbn = "978-0743273565".to_string();

        let started = Instant::now();
        assert!(store.create(input).await.is_err());
        assert!(started.elapsed() < Duration::from_millis(500));

        let started = Instant::now();
        store.create(sample_input()).await.unwrap();
        assert!(started.elapsed() >= Duration::from_millis(500));
    }

    #[tokio::test]
    async fn concurrent_creates_with_same_isbn_admit_one() {
        let latency = Latency {
            create: Duration::from_millis(20),
            ..Latency::none()
        };
        let store = BookStore::seeded(latency);

        let (first, second) = tokio::join!(
            store.create(sample_input()),
            store.create(sample_input())
        );

        let successes = [&first, &second].iter().filter(|r| r.is_ok()).count();
        assert_eq!(successes, 1);
        assert!(matches!(
            first.err().or(second.err()),
            Some(BookStoreError::Conflict { .. })
        ));
        assert_eq!(store.len().await, 7);
    }
}
