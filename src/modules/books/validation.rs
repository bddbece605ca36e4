//! Field rules for `BookInput`.
//!
//! Fields are checked in a fixed order and only the first violation is
//! reported. Text is trimmed before it is measured; lengths count `char`s.

use validator::ValidateEmail;

use super::error::{BookStoreError, BookStoreResult};
use super::models::{BookField, BookInput};

const TITLE_MAX: usize = 200;
const AUTHOR_MAX: usize = 100;
const GENRE_MAX: usize = 50;
const ISBN_MIN: usize = 10;
const ISBN_MAX: usize = 20;
const PAGES_MIN: i32 = 1;
const PAGES_MAX: i32 = 10_000;
const OVERVIEW_MIN: usize = 10;
const OVERVIEW_MAX: usize = 2000;
const EMAIL_MAX: usize = 255;
const AGE_MIN: i32 = 1;
const AGE_MAX: i32 = 150;
const PUBLISHER_MAX: usize = 150;

/// Check `input` against every field constraint.
pub fn validate(input: &BookInput) -> BookStoreResult<()> {
    let title = required(BookField::Title, &input.title, "Book title")?;
    at_most(BookField::Title, title, TITLE_MAX, "Book title")?;

    let author = required(BookField::Author, &input.author, "Book author")?;
    at_most(BookField::Author, author, AUTHOR_MAX, "Book author")?;

    let genre = required(BookField::Genre, &input.genre, "Book genre")?;
    at_most(BookField::Genre, genre, GENRE_MAX, "Book genre")?;

    let isbn = required(BookField::Isbn, &input.isbn, "Book ISBN")?;
    if !(ISBN_MIN..=ISBN_MAX).contains(&char_len(isbn)) {
        return Err(BookStoreError::validation(
            BookField::Isbn,
            format!(
                "Book ISBN must be between {} and {} characters",
                ISBN_MIN, ISBN_MAX
            ),
        ));
    }

    if input.pages < PAGES_MIN {
        return Err(BookStoreError::validation(
            BookField::Pages,
            "Book must have at least 1 page",
        ));
    }
    if input.pages > PAGES_MAX {
        return Err(BookStoreError::validation(
            BookField::Pages,
            format!("Book must have at most {} pages", PAGES_MAX),
        ));
    }

    let overview = required(BookField::Overview, &input.overview, "Book overview")?;
    if char_len(overview) < OVERVIEW_MIN {
        return Err(BookStoreError::validation(
            BookField::Overview,
            format!("Book overview must be at least {} characters", OVERVIEW_MIN),
        ));
    }
    at_most(BookField::Overview, overview, OVERVIEW_MAX, "Book overview")?;

    let email = required(BookField::AuthorEmail, &input.author_email, "Author email")?;
    at_most(BookField::AuthorEmail, email, EMAIL_MAX, "Author email")?;
    if !email.validate_email() {
        return Err(BookStoreError::validation(
            BookField::AuthorEmail,
            "Author email must be a valid email address",
        ));
    }

    if !(AGE_MIN..=AGE_MAX).contains(&input.author_age) {
        return Err(BookStoreError::validation(
            BookField::AuthorAge,
            format!("Author age must be between {} and {}", AGE_MIN, AGE_MAX),
        ));
    }

    required(
        BookField::PublishedDate,
        &input.published_date,
        "Published date",
    )?;

    let publisher = required(BookField::Publisher, &input.publisher, "Publisher")?;
    at_most(BookField::Publisher, publisher, PUBLISHER_MAX, "Publisher")?;

    Ok(())
}

fn required<'a>(field: BookField, value: &'a str, label: &str) -> BookStoreResult<&'a str> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(BookStoreError::validation(
            field,
            format!("{} is required", label),
        ));
    }
    Ok(trimmed)
}

fn at_most(field: BookField, value: &str, max: usize, label: &str) -> BookStoreResult<()> {
    if char_len(value) > max {
        return Err(BookStoreError::validation(
            field,
            format!("{} must be at most {} characters", label, max),
        ));
    }
    Ok(())
}

fn char_len(value: &str) -> usize {
    value.chars().count()
}
