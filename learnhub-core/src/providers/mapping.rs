//! Conversion from catalog documents to local content.

use learnhub_model::{
    Category, ContentType, NewContent, Rating, SOURCE_OPENLIBRARY,
};

use super::OpenLibraryBook;

const WORK_URL_BASE: &str = "https://openlibrary.org";
const COVERS_URL_BASE: &str = "https://covers.openlibrary.org/b/id";
const FALLBACK_DESCRIPTION: &str = "A book from OpenLibrary";
const FALLBACK_AUTHOR: &str = "Unknown Author";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CoverSize {
    Small,
    #[default]
    Medium,
    Large,
}

impl CoverSize {
    fn suffix(self) -> char {
        match self {
            CoverSize::Small => 'S',
            CoverSize::Medium => 'M',
            CoverSize::Large => 'L',
        }
    }
}

pub fn cover_url(cover_id: i64, size: CoverSize) -> String {
    format!("{COVERS_URL_BASE}/{cover_id}-{}.jpg", size.suffix())
}

/// Bucket a catalog subject into a local category. Rules are checked in
/// order; anything unmatched lands in `Programming`.
pub fn category_for_subject(subject: Option<&str>) -> Category {
    let Some(subject) = subject else {
        return Category::Programming;
    };
    let lower = subject.to_lowercase();
    let has = |needle: &str| lower.contains(needle);

    if has("programming") || has("javascript") || has("python") {
        Category::Programming
    } else if has("design") || has("ux") || has("ui") {
        Category::Design
    } else if has("business") || has("management") {
        Category::Business
    } else if has("science") || has("data") {
        Category::Science
    } else {
        Category::Programming
    }
}

pub fn map_book_to_content(book: &OpenLibraryBook) -> NewContent {
    let subjects = book.subject.as_deref().unwrap_or_default();

    let description = if subjects.is_empty() {
        FALLBACK_DESCRIPTION.to_string()
    } else {
        subjects.iter().take(3).cloned().collect::<Vec<_>>().join(", ")
    };

    // A zero average means "no ratings yet" in the catalog.
    let rating = book
        .ratings_average
        .filter(|avg| *avg != 0.0)
        .and_then(Rating::from_average);

    let author = book
        .author_name
        .as_ref()
        .and_then(|names| names.first())
        .filter(|name| !name.is_empty())
        .cloned()
        .unwrap_or_else(|| FALLBACK_AUTHOR.to_string());

    NewContent {
        title: book.title.clone(),
        description: Some(description),
        url: Some(format!("{WORK_URL_BASE}{}", book.key)),
        image_url: book.cover_i.map(|id| cover_url(id, CoverSize::Medium)),
        source: SOURCE_OPENLIBRARY.to_string(),
        external_id: Some(book.key.clone()),
        content_type: ContentType::Book,
        category: Some(category_for_subject(
            subjects.first().map(String::as_str),
        )),
        rating,
        author: Some(author),
    }
}
