use serde::{Deserialize, Serialize};

/// A stored book.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Book {
    /// Store-assigned identifier, immutable once created
    pub id: String,
    pub title: String,
    pub author: String,
    pub author_email: String,
    pub author_age: i32,
    /// Publication date as entered, e.g. `1925-04-10`
    pub published_date: String,
    pub publisher: String,
    pub overview: String,
    pub genre: String,
    /// Unique across the collection
    pub isbn: String,
    pub pages: i32,
}

impl Book {
    /// Combine caller input with an identifier.
    pub fn from_input(id: impl Into<String>, input: BookInput) -> Self {
        Self {
            id: id.into(),
            title: input.title,
            author: input.author,
            author_email: input.author_email,
            author_age: input.author_age,
            published_date: input.published_date,
            publisher: input.publisher,
            overview: input.overview,
            genre: input.genre,
            isbn: input.isbn,
            pages: input.pages,
        }
    }

    /// Replace every field except `id`.
    pub fn apply(&mut self, input: BookInput) {
        let id = std::mem::take(&mut self.id);
        *self = Self::from_input(id, input);
    }

    /// Case-insensitive match on title, author or genre. `needle` must
    /// already be lowercase.
    pub(crate) fn matches(&self, needle: &str) -> bool {
        [&self.title, &self.author, &self.genre]
            .iter()
            .any(|field| field.to_lowercase().contains(needle))
    }
}

/// Caller-supplied fields for creating or replacing a book.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookInput {
    pub title: String,
    pub author: String,
    pub author_email: String,
    pub author_age: i32,
    pub published_date: String,
    pub publisher: String,
    pub overview: String,
    pub genre: String,
    pub isbn: String,
    pub pages: i32,
}

impl From<Book> for BookInput {
    fn from(book: Book) -> Self {
        Self {
            title: book.title,
            author: book.author,
            author_email: book.author_email,
            author_age: book.author_age,
            published_date: book.published_date,
            publisher: book.publisher,
            overview: book.overview,
            genre: book.genre,
            isbn: book.isbn,
            pages: book.pages,
        }
    }
}

/// Names a `BookInput` field in validation failures, using the external
/// (camelCase) spelling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum BookField {
    Title,
    Author,
    AuthorEmail,
    AuthorAge,
    PublishedDate,
    Publisher,
    Overview,
    Genre,
    Isbn,
    Pages,
}

impl BookField {
    pub fn as_str(&self) -> &'static str {
        match self {
            BookField::Title => "title",
            BookField::Author => "author",
            BookField::AuthorEmail => "authorEmail",
            BookField::AuthorAge => "authorAge",
            BookField::PublishedDate => "publishedDate",
            BookField::Publisher => "publisher",
            BookField::Overview => "overview",
            BookField::Genre => "genre",
            BookField::Isbn => "isbn",
            BookField::Pages => "pages",
        }
    }
}

impl std::fmt::Display for BookField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
