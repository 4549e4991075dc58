use anyhow::Context as _;

use super::{SettingsEditor, generate_id};
use crate::model::{Book, Category, ContentPart, PromotionalAd};

const DEFAULT_COVER: &str = "bg-slate-100";
const INITIAL_PART_TITLE: &str = "قراءة الكتاب";

#[derive(Debug, Clone, Default)]
pub struct NewBook {
    pub category_id: String,
    pub title: String,
    pub author: String,
    pub content: String,
    pub cover_color: Option<String>,
}

/// Only title, author and cover are editable in place.
#[derive(Debug, Clone, Default)]
pub struct BookEdit {
    pub title: Option<String>,
    pub author: Option<String>,
    pub cover_color: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct NewPromotion {
    pub title: String,
    pub image_url: String,
    pub link_url: String,
    pub description: String,
}

impl SettingsEditor {
    pub fn add_category(&mut self, title: &str, emoji: &str) -> anyhow::Result<String> {
        require("category title", title)?;
        require("category emoji", emoji)?;

        let id = generate_id("c");
        self.pending.categories.push(Category {
            id: id.clone(),
            title: title.trim().to_owned(),
            emoji: emoji.trim().to_owned(),
            books: Vec::new(),
        });
        self.refresh_drafts()?;

        tracing::info!(category = %id, "added category");
        Ok(id)
    }

    /// Removes the category together with all of its books.
    pub fn delete_category(&mut self, category_id: &str, confirmed: bool) -> anyhow::Result<()> {
        if !confirmed {
            anyhow::bail!("deleting category {category_id:?} requires confirmation");
        }
        let before = self.pending.categories.len();
        self.pending
            .categories
            .retain(|category| category.id != category_id);
        if self.pending.categories.len() == before {
            anyhow::bail!("category not found: {category_id}");
        }
        self.refresh_drafts()?;

        tracing::info!(category = %category_id, "deleted category");
        Ok(())
    }

    /// Adds a book with a single initial part. Returns the new book id.
    pub fn add_book(&mut self, new: NewBook) -> anyhow::Result<String> {
        require("book title", &new.title)?;
        require("book author", &new.author)?;
        require("target category", &new.category_id)?;
        require("book content", &new.content)?;

        let category = self.category_mut(&new.category_id)?;
        let book_id = generate_id("b");
        category.books.push(Book {
            id: book_id.clone(),
            title: new.title.trim().to_owned(),
            author: new.author.trim().to_owned(),
            cover_color: new
                .cover_color
                .filter(|cover| !cover.trim().is_empty())
                .unwrap_or_else(|| DEFAULT_COVER.to_owned()),
            click_count: 0,
            parts: vec![ContentPart {
                id: generate_id("p"),
                title: INITIAL_PART_TITLE.to_owned(),
                content: new.content,
                ..ContentPart::default()
            }],
        });
        self.refresh_drafts()?;

        tracing::info!(category = %new.category_id, book = %book_id, "added book");
        Ok(book_id)
    }

    pub fn edit_book(
        &mut self,
        category_id: &str,
        book_id: &str,
        edit: BookEdit,
    ) -> anyhow::Result<()> {
        if let Some(title) = &edit.title {
            require("book title", title)?;
        }
        if let Some(author) = &edit.author {
            require("book author", author)?;
        }

        let book = self
            .category_mut(category_id)?
            .books
            .iter_mut()
            .find(|book| book.id == book_id)
            .with_context(|| format!("book not found: {category_id}/{book_id}"))?;

        if let Some(title) = edit.title {
            book.title = title.trim().to_owned();
        }
        if let Some(author) = edit.author {
            book.author = author.trim().to_owned();
        }
        if let Some(cover_color) = edit.cover_color {
            book.cover_color = cover_color;
        }
        self.refresh_drafts()?;

        tracing::info!(category = %category_id, book = %book_id, "edited book");
        Ok(())
    }

    pub fn delete_book(
        &mut self,
        category_id: &str,
        book_id: &str,
        confirmed: bool,
    ) -> anyhow::Result<()> {
        if !confirmed {
            anyhow::bail!("deleting book {book_id:?} requires confirmation");
        }
        let category = self.category_mut(category_id)?;
        let before = category.books.len();
        category.books.retain(|book| book.id != book_id);
        if category.books.len() == before {
            anyhow::bail!("book not found: {category_id}/{book_id}");
        }
        self.refresh_drafts()?;

        tracing::info!(category = %category_id, book = %book_id, "deleted book");
        Ok(())
    }

    pub fn add_promotion(&mut self, new: NewPromotion) -> anyhow::Result<String> {
        require("promotion title", &new.title)?;
        require("promotion image", &new.image_url)?;
        require("promotion link", &new.link_url)?;

        let id = generate_id("promo");
        self.pending.promotional_ads.push(PromotionalAd {
            id: id.clone(),
            image_url: new.image_url.trim().to_owned(),
            title: new.title.trim().to_owned(),
            description: new.description,
            link_url: new.link_url.trim().to_owned(),
        });
        self.refresh_drafts()?;

        tracing::info!(promotion = %id, "added promotional ad");
        Ok(id)
    }

    pub fn delete_promotion(&mut self, promotion_id: &str) -> anyhow::Result<()> {
        let before = self.pending.promotional_ads.len();
        self.pending
            .promotional_ads
            .retain(|ad| ad.id != promotion_id);
        if self.pending.promotional_ads.len() == before {
            anyhow::bail!("promotional ad not found: {promotion_id}");
        }
        self.refresh_drafts()?;

        tracing::info!(promotion = %promotion_id, "deleted promotional ad");
        Ok(())
    }

    fn category_mut(&mut self, category_id: &str) -> anyhow::Result<&mut Category> {
        self.pending
            .categories
            .iter_mut()
            .find(|category| category.id == category_id)
            .with_context(|| format!("category not found: {category_id}"))
    }
}

fn require(what: &str, value: &str) -> anyhow::Result<()> {
    if value.trim().is_empty() {
        anyhow::bail!("{what} is required");
    }
    Ok(())
}
