use report_core::{render_template, FallbackTables, NewsItem, ProviderNews};

/// Provider headlines considered for the feed.
const CANDIDATES: usize = 12;
const FEED_SIZE: usize = 10;
/// With at least this many real headlines no fallback links are added.
const ENOUGH_REAL_ITEMS: usize = 5;
const MIN_TITLE_CHARS: usize = 15;

const PROVIDER_SOURCE: &str = "Yahoo Finance";
const FALLBACK_SOURCE: &str = "Direct Link";

/// Filter provider news and top the list up with fallback links.
///
/// `now` stamps the fallback entries.
pub fn build_news_feed(
    provider_news: Vec<ProviderNews>,
    tables: &FallbackTables,
    symbol: &str,
    company: &str,
    now: i64,
) -> Vec<NewsItem> {
    let mut items: Vec<NewsItem> = provider_news
        .into_iter()
        .take(CANDIDATES)
        .filter(|n| is_specific_headline(&n.title))
        .map(|n| NewsItem {
            title: n.title,
            link: n
                .link
                .filter(|l| !l.is_empty())
                .unwrap_or_else(|| format!("https://finance.yahoo.com/quote/{}/news", symbol)),
            publisher: n
                .publisher
                .filter(|p| !p.is_empty())
                .unwrap_or_else(|| "Financial News".to_string()),
            timestamp: n.published_at.unwrap_or(0),
            source: PROVIDER_SOURCE.to_string(),
        })
        .collect();

    if items.len() >= ENOUGH_REAL_ITEMS {
        items.truncate(FEED_SIZE);
        return items;
    }

    tracing::debug!("Only {} headlines for {}, adding fallback links", items.len(), symbol);
    for template in &tables.news_links {
        if items.len() >= FEED_SIZE {
            break;
        }
        items.push(NewsItem {
            title: render_template(&template.title, company, symbol),
            link: render_template(&template.link, company, symbol),
            publisher: template.publisher.clone(),
            timestamp: now,
            source: FALLBACK_SOURCE.to_string(),
        });
    }

    items
}

/// Drops short and generic "update" headlines.
fn is_specific_headline(title: &str) -> bool {
    title.chars().count() > MIN_TITLE_CHARS && !title.to_lowercase().contains("update")
}
