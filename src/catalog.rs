use std::borrow::Cow;

use crate::model::{AppSettings, Book, Category};

/// Identifies a book by its owning category, since book ids are only
/// unique within one category.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct BookKey {
    pub category_id: String,
    pub book_id: String,
}

/// Narrows the catalog to books whose title or author contains `query`
/// (case-insensitive). An empty query returns the input untouched.
pub fn filter<'a>(categories: &'a [Category], query: &str) -> Cow<'a, [Category]> {
    if query.is_empty() {
        return Cow::Borrowed(categories);
    }

    let needle = query.to_lowercase();
    let filtered = categories
        .iter()
        .filter_map(|category| {
            let books: Vec<Book> = category
                .books
                .iter()
                .filter(|book| {
                    book.title.to_lowercase().contains(&needle)
                        || book.author.to_lowercase().contains(&needle)
                })
                .cloned()
                .collect();
            if books.is_empty() {
                return None;
            }
            Some(Category {
                books,
                ..category.clone()
            })
        })
        .collect::<Vec<_>>();

    Cow::Owned(filtered)
}

pub fn total_books(categories: &[Category]) -> usize {
    categories.iter().map(|category| category.books.len()).sum()
}

/// Finds the first book with `book_id`, optionally restricted to one category.
pub fn locate_book(
    categories: &[Category],
    book_id: &str,
    category_id: Option<&str>,
) -> Option<BookKey> {
    categories
        .iter()
        .filter(|category| category_id.is_none_or(|id| category.id == id))
        .find_map(|category| {
            category
                .books
                .iter()
                .find(|book| book.id == book_id)
                .map(|book| BookKey {
                    category_id: category.id.clone(),
                    book_id: book.id.clone(),
                })
        })
}

pub fn find_book<'a>(categories: &'a [Category], key: &BookKey) -> Option<&'a Book> {
    categories
        .iter()
        .find(|category| category.id == key.category_id)?
        .books
        .iter()
        .find(|book| book.id == key.book_id)
}

/// Returns a copy of `settings` with the selected book's view counter bumped.
pub fn record_selection(settings: &AppSettings, key: &BookKey) -> AppSettings {
    let mut next = settings.clone();
    let book = next
        .categories
        .iter_mut()
        .find(|category| category.id == key.category_id)
        .and_then(|category| category.books.iter_mut().find(|book| book.id == key.book_id));
    match book {
        Some(book) => book.click_count = book.click_count.saturating_add(1),
        None => tracing::warn!(?key, "selected book not found; view count unchanged"),
    }
    next
}
