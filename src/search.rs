use anyhow::Context as _;

use crate::cli::SearchArgs;
use crate::client::{SearchClient, resolve_base_url};
use crate::formats::BookSummary;
use crate::session::{RequestTicket, SearchFilter, SearchPhase, SearchSession};

pub async fn run(args: SearchArgs) -> anyhow::Result<()> {
    let base_url = resolve_base_url(args.base_url.as_deref())?;
    let client = SearchClient::new(&base_url).context("build search client")?;

    let mut session = SearchSession::new();
    session.set_filter(SearchFilter::Category, &args.category);
    session.set_filter(SearchFilter::Language, &args.language);
    session.set_filter(SearchFilter::Sort, &args.sort);
    session.set_filter(SearchFilter::PrintType, &args.print_type);
    session.set_filter(SearchFilter::Query, &args.query);

    let Some(ticket) = session.begin_search() else {
        anyhow::bail!("--query must not be empty");
    };
    fetch_and_apply(&client, &mut session, ticket).await;

    let mut pages_fetched = 1;
    while pages_fetched < args.pages.max(1) && session.has_more() {
        let Some(ticket) = session.load_more() else {
            break;
        };
        fetch_and_apply(&client, &mut session, ticket).await;
        if matches!(session.phase(), SearchPhase::Failed { .. }) {
            break;
        }
        pages_fetched += 1;
    }

    match session.phase() {
        SearchPhase::NoResults => {
            println!("No books found");
        }
        SearchPhase::Failed { message } => {
            // Earlier pages survive a failed fetch; show them before failing.
            for book in session.results() {
                println!("{}", summary_line(book));
            }
            anyhow::bail!("search failed: {message}");
        }
        _ => {
            for book in session.results() {
                println!("{}", summary_line(book));
            }
            println!("{}", session.summary());
        }
    }

    Ok(())
}

async fn fetch_and_apply(client: &SearchClient, session: &mut SearchSession, ticket: RequestTicket) {
    match client.search(&ticket.query).await {
        Ok(page) => {
            session.apply_page(&ticket, page);
        }
        Err(err) => {
            session.apply_error(&ticket, format!("{err:#}"));
        }
    }
}

fn summary_line(book: &BookSummary) -> String {
    let mut line = format!("{} by {}", book.title, book.author);
    if let Some(category) = book.category.as_deref()
        && !category.is_empty()
    {
        line.push_str(&format!(" [{category}]"));
    }
    if let Some(language) = book.language.as_deref()
        && !language.is_empty()
    {
        line.push_str(&format!(" ({language})"));
    }
    line
}
