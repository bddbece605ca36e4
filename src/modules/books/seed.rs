//! Records the store starts with.

use super::models::Book;

struct SeedBook {
    id: &'static str,
    title: &'static str,
    author: &'static str,
    author_email: &'static str,
    author_age: i32,
    published_date: &'static str,
    publisher: &'static str,
    overview: &'static str,
    genre: &'static str,
    isbn: &'static str,
    pages: i32,
}

const SEED: &[SeedBook] = &[
    SeedBook {
        id: "1",
        title: "The Great Gatsby",
        author: "F. Scott Fitzgerald",
        author_email: "fitzgerald@literature.com",
        author_age: 44,
        published_date: "1925-04-10",
        publisher: "Charles Scribner's Sons",
        overview: "The Great Gatsby is a 1925 novel by American writer F. Scott Fitzgerald. Set in the Jazz Age on Long Island, the novel depicts narrator Nick Carraway's interactions with mysterious millionaire Jay Gatsby and Gatsby's obsession to reunite with his former lover, Daisy Buchanan.",
        genre: "Literary Fiction",
        isbn: "978-0743273565",
        pages: 180,
    },
    SeedBook {
        id: "2",
        title: "To Kill a Mockingbird",
        author: "Harper Lee",
        author_email: "harper.lee@classics.com",
        author_age: 89,
        published_date: "1960-07-11",
        publisher: "J. B. Lippincott & Co.",
        overview: "To Kill a Mockingbird is a novel by the American author Harper Lee. It was published in 1960 and was instantly successful. In the United States, it is widely read in high schools and middle schools.",
        genre: "Southern Gothic",
        isbn: "978-0061120084",
        pages: 281,
    },
    SeedBook {
        id: "3",
        title: "1984",
        author: "George Orwell",
        author_email: "orwell@dystopia.org",
        author_age: 46,
        published_date: "1949-06-08",
        publisher: "Secker & Warburg",
        overview: "1984 is a dystopian social science fiction novel and cautionary tale by English writer George Orwell. It was published on 8 June 1949 as Orwell's ninth and final book completed in his lifetime.",
        genre: "Dystopian Fiction",
        isbn: "978-0451524935",
        pages: 328,
    },
    SeedBook {
        id: "4",
        title: "Pride and Prejudice",
        author: "Jane Austen",
        author_email: "jane.austen@regency.uk",
        author_age: 41,
        published_date: "1813-01-28",
        publisher: "T. Egerton, Whitehall",
        overview: "Pride and Prejudice is an 1813 novel of manners by Jane Austen. The novel follows the character development of Elizabeth Bennet, the dynamic protagonist of the book who learns about the repercussions of hasty judgments.",
        genre: "Romance",
        isbn: "978-0141439518",
        pages: 432,
    },
    SeedBook {
        id: "5",
        title: "The Catcher in the Rye",
        author: "J.D. Salinger",
        author_email: "salinger@holden.com",
        author_age: 91,
        published_date: "1951-07-16",
        publisher: "Little, Brown and Company",
        overview: "The Catcher in the Rye is a novel by American author J. D. Salinger that was partially published in serial form in 1945\u{2013}46 before being novelized in 1951. Originally published for adults, it has become popular among adolescent readers.",
        genre: "Coming-of-age Fiction",
        isbn: "978-0316769488",
        pages: 234,
    },
    SeedBook {
        id: "6",
        title: "The Hobbit",
        author: "J.R.R. Tolkien",
        author_email: "tolkien@middleearth.org",
        author_age: 81,
        published_date: "1937-09-21",
        publisher: "George Allen & Unwin",
        overview: "The Hobbit, or There and Back Again is a children's fantasy novel by English author J. R. R. Tolkien. It was published in 1937 to wide critical acclaim, being nominated for the Carnegie Medal.",
        genre: "Fantasy",
        isbn: "978-0547928227",
        pages: 310,
    },
];

/// The six catalogue records every seeded store starts with, ids `"1"`..`"6"`.
pub fn seed_books() -> Vec<Book> {
    SEED.iter()
        .map(|seed| Book {
            id: seed.id.to_string(),
            title: seed.title.to_string(),
            author: seed.author.to_string(),
            author_email: seed.author_email.to_string(),
            author_age: seed.author_age,
            published_date: seed.published_date.to_string(),
            publisher: seed.publisher.to_string(),
            overview: seed.overview.to_string(),
            genre: seed.genre.to_string(),
            isbn: seed.isbn.to_string(),
            pages: seed.pages,
        })
        .collect()
}

/// A valid input whose isbn is not in the seed set.
#[cfg(test)]
pub(crate) fn sample_input() -> super::models::BookInput {
    super::models::BookInput {
        title: "A Wizard of Earthsea".to_string(),
        author: "Ursula K. Le Guin".to_string(),
        author_email: "ursula@earthsea.org".to_string(),
        author_age: 88,
        published_date: "1968-09-01".to_string(),
        publisher: "Parnassus Press".to_string(),
        overview: "A young mage named Ged unleashes a shadow and must hunt it across the archipelago."
            .to_string(),
        genre: "Fantasy".to_string(),
        isbn: "978-0547773742".to_string(),
        pages: 183,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::modules::books::validation::validate;
    use std::collections::HashSet;

    #[test]
    fn seed_has_six_valid_records() {
        let books = seed_books();
        assert_eq!(books.len(), 6);

        for book in books {
            let id = book.id.clone();
            assert!(validate(&book.into()).is_ok(), "seed record {} is invalid", id);
        }
    }

    #[test]
    fn seed_ids_and_isbns_are_unique() {
        let books = seed_books();
        let ids: HashSet<_> = books.iter().map(|book| book.id.as_str()).collect();
        let isbns: HashSet<_> = books.iter().map(|book| book.isbn.as_str()).collect();

        assert_eq!(ids.len(), books.len());
        assert_eq!(isbns.len(), books.len());
    }
}
