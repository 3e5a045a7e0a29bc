use std::fmt::Write;

use chrono::{DateTime, FixedOffset, Locale};

use crate::post::{Post, PostDetail};

pub const LOADING: &str = "Carregando...";
pub const LOAD_MORE: &str = "Carregar mais posts";
pub const LOAD_MORE_FAILED: &str = "Não foi possível carregar mais posts";

fn parse_date(date: &str) -> Option<DateTime<FixedOffset>> {
    DateTime::parse_from_rfc3339(date)
        .or_else(|_| DateTime::parse_from_str(date, "%Y-%m-%dT%H:%M:%S%z"))
        .ok()
}

/// `dd MMM yyyy` in Brazilian Portuguese, e.g. `15 mar 2021`.
pub fn format_date(date: &str) -> Option<String> {
    let date = parse_date(date)?;
    Some(date.format_localized("%d %b %Y", Locale::pt_BR).to_string())
}

fn date_or_draft(date: Option<&str>) -> String {
    match date {
        Some(date) => format_date(date).unwrap_or_else(|| date.to_string()),
        None => "rascunho".to_string(),
    }
}

pub fn post_card(post: &Post) -> String {
    let mut card = String::new();
    let _ = writeln!(card, "{}", post.data.title.as_deref().unwrap_or_default());
    if let Some(subtitle) = post.data.subtitle.as_deref() {
        let _ = writeln!(card, "  {}", subtitle);
    }
    let _ = writeln!(
        card,
        "  {} · {}",
        date_or_draft(post.first_publication_date.as_deref()),
        post.data.author.as_deref().unwrap_or_default()
    );
    let _ = write!(card, "  /post/{}", post.uid);
    card
}

pub fn post_list(posts: &[Post]) -> String {
    posts
        .iter()
        .map(post_card)
        .collect::<Vec<_>>()
        .join("\n\n")
}

pub fn post_detail(post: &PostDetail) -> String {
    let data = &post.data;
    let mut page = String::new();

    if let Some(url) = data.banner.as_ref().and_then(|b| b.url.as_deref()) {
        let _ = writeln!(page, "[banner] {}", url);
        let _ = writeln!(page);
    }
    let _ = writeln!(page, "{}", data.title.as_deref().unwrap_or_default());
    let _ = writeln!(
        page,
        "{} · {} · {} min",
        date_or_draft(post.first_publication_date.as_deref()),
        data.author.as_deref().unwrap_or_default(),
        post.reading_time()
    );

    for block in post.content() {
        let _ = writeln!(page);
        if let Some(heading) = block.heading.as_deref() {
            let _ = writeln!(page, "## {}", heading);
        }
        for paragraph in block.paragraphs() {
            if let Some(text) = paragraph.text.as_deref() {
                let _ = writeln!(page);
                let _ = writeln!(page, "{}", text);
            }
        }
    }

    page
}
