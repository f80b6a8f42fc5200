use std::sync::Arc;
use std::time::Duration;

use anyhow::Context as _;
use tokio::io::{AsyncBufReadExt as _, BufReader};

use crate::cli::{CatalogCommand, CatalogFilterArgs, CatalogListArgs};
use crate::client::{SearchClient, resolve_base_url};
use crate::debounce::Debouncer;
use crate::formats::Book;

/// How long free-text input must stay quiet before a watch-mode re-filter.
pub const FILTER_QUIET_WINDOW: Duration = Duration::from_millis(300);

/// Derives the filtered view of a catalog. Pure and stable: the catalog is
/// never mutated and matches keep their original order.
///
/// A book matches when the category is empty or equal to the book's, and the
/// query is empty or appears case-insensitively in the title, author, or
/// description.
pub fn filter_books<'a>(catalog: &'a [Book], category: &str, query: &str) -> Vec<&'a Book> {
    let query = query.trim().to_lowercase();

    catalog
        .iter()
        .filter(|book| category.is_empty() || book.category.as_deref() == Some(category))
        .filter(|book| {
            if query.is_empty() {
                return true;
            }
            book.title.to_lowercase().contains(&query)
                || book.author.to_lowercase().contains(&query)
                || book
                    .description
                    .as_ref()
                    .is_some_and(|d| d.to_lowercase().contains(&query))
        })
        .collect()
}

/// Distinct non-empty categories in the catalog, sorted.
pub fn categories(catalog: &[Book]) -> Vec<String> {
    let mut out = catalog
        .iter()
        .filter_map(|book| book.category.clone())
        .filter(|category| !category.is_empty())
        .collect::<Vec<_>>();
    out.sort();
    out.dedup();
    out
}

pub async fn run(command: CatalogCommand) -> anyhow::Result<()> {
    match command {
        CatalogCommand::List(args) => list(args).await,
        CatalogCommand::Filter(args) => filter(args).await,
    }
}

async fn list(args: CatalogListArgs) -> anyhow::Result<()> {
    let base_url = resolve_base_url(args.base_url.as_deref())?;
    let client = SearchClient::new(&base_url)?;

    let catalog = client.fetch_catalog().await.context("fetch catalog")?;
    tracing::debug!(books = catalog.len(), "loaded catalog");

    for book in &catalog {
        println!("{}", book_line(book));
    }
    let categories = categories(&catalog);
    if !categories.is_empty() {
        println!("Categories: {}", categories.join(", "));
    }

    Ok(())
}

async fn filter(args: CatalogFilterArgs) -> anyhow::Result<()> {
    let base_url = resolve_base_url(args.base_url.as_deref())?;
    let client = SearchClient::new(&base_url)?;

    let catalog = client.fetch_catalog().await.context("fetch catalog")?;

    if args.watch {
        return watch(catalog, args.category).await;
    }

    print_matches(&filter_books(&catalog, &args.category, &args.query));
    Ok(())
}

/// Reads query lines from stdin and re-filters after a quiet window, so a
/// burst of edits costs one filter pass instead of one per line.
async fn watch(catalog: Vec<Book>, category: String) -> anyhow::Result<()> {
    let catalog = Arc::new(catalog);

    let debouncer = Debouncer::new(FILTER_QUIET_WINDOW, {
        let catalog = Arc::clone(&catalog);
        move |query: String| {
            print_matches(&filter_books(&catalog, &category, &query));
        }
    });

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines
        .next_line()
        .await
        .context("read query line from stdin")?
    {
        debouncer.submit(line.trim().to_owned());
    }

    Ok(())
}

fn print_matches(matches: &[&Book]) {
    if matches.is_empty() {
        println!("No books found");
        return;
    }
    for book in matches {
        println!("{}", book_line(book));
    }
}

fn book_line(book: &Book) -> String {
    let mut line = format!("{} by {}", book.title, book.author);
    if let Some(category) = book.category.as_deref()
        && !category.is_empty()
    {
        line.push_str(&format!(" [{category}]"));
    }
    line
}

#[cfg(test)]
mod tests {
    use super::*;

    fn book(title: &str, author: &str, category: &str, description: Option<&str>) -> Book {
        Book {
            id: 0,
            title: title.to_owned(),
            author: author.to_owned(),
            category: Some(category.to_owned()),
            description: description.map(str::to_owned),
            image_url: None,
            published_date: None,
            average_rating: None,
            ratings_count: None,
        }
    }

    fn sample_catalog() -> Vec<Book> {
        vec![
            book("Dune", "Herbert", "fiction", None),
            book("Cosmos", "Sagan", "science", Some("A personal voyage")),
        ]
    }

    #[test]
    fn empty_filters_return_the_whole_catalog_in_order() {
        let catalog = sample_catalog();
        let all = filter_books(&catalog, "", "");

        assert_eq!(all.len(), 2);
        assert_eq!(all[0].title, "Dune");
        assert_eq!(all[1].title, "Cosmos");
    }

    #[test]
    fn category_and_query_predicates_combine() {
        let catalog = sample_catalog();

        let fiction = filter_books(&catalog, "fiction", "");
        assert_eq!(fiction.len(), 1);
        assert_eq!(fiction[0].title, "Dune");

        let sagan = filter_books(&catalog, "", "sagan");
        assert_eq!(sagan.len(), 1);
        assert_eq!(sagan[0].title, "Cosmos");

        assert!(filter_books(&catalog, "science", "dune").is_empty());
    }

    #[test]
    fn query_matches_description_case_insensitively() {
        let catalog = sample_catalog();

        let matched = filter_books(&catalog, "", "VOYAGE");
        assert_eq!(matched.len(), 1);
        assert_eq!(matched[0].title, "Cosmos");
    }

    #[test]
    fn filtering_is_idempotent() {
        let catalog = sample_catalog();

        let once = filter_books(&catalog, "fiction", "dune");
        let twice: Vec<&Book> = once
            .iter()
            .copied()
            .filter(|book| book.category.as_deref() == Some("fiction"))
            .filter(|book| book.title.to_lowercase().contains("dune"))
            .collect();

        assert_eq!(once, twice);
    }

    #[test]
    fn categories_are_sorted_and_deduplicated() {
        let mut catalog = sample_catalog();
        catalog.push(book("Hyperion", "Simmons", "fiction", None));
        catalog.push(Book {
            category: None,
            ..book("Untagged", "Anon", "", None)
        });

        assert_eq!(categories(&catalog), vec!["fiction", "science"]);
    }
}
