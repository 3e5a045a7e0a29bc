use std::{
    error::Error,
    io::{self, Write},
};

use log::{debug, error, info};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader, Lines};

use crate::{
    api::CmsBackend,
    config::Config,
    page::{self, DetailView, PageStore},
    paginate::{ContinuationFetcher, HttpContinuation, Paginator},
    render,
};

/// Blocks until the failure was acknowledged with Enter.
async fn notify_failure<R>(
    input: &mut Lines<R>,
    notices: &mut impl Write,
    message: &str,
) -> io::Result<()>
where
    R: AsyncBufRead + Unpin,
{
    writeln!(notices)?;
    writeln!(notices, "!! {}", message)?;
    writeln!(notices, "!! Pressione Enter para continuar")?;
    notices.flush()?;
    input.next_line().await?;
    Ok(())
}

/// Append pages while the reader asks for them, until the listing is
/// complete, the reader quits or the input ends.
pub async fn browse<R>(
    paginator: &Paginator,
    fetcher: &impl ContinuationFetcher,
    input: &mut Lines<R>,
    out: &mut impl Write,
    notices: &mut impl Write,
) -> io::Result<()>
where
    R: AsyncBufRead + Unpin,
{
    while paginator.can_load_more() {
        writeln!(out)?;
        writeln!(out, "[Enter] {}    [q] Sair", render::LOAD_MORE)?;
        out.flush()?;

        let Some(line) = input.next_line().await? else {
            break;
        };
        if line.trim().eq_ignore_ascii_case("q") {
            break;
        }

        let listed = paginator.count();
        match paginator.load_more(fetcher).await {
            Ok(_) => {
                let posts = paginator.posts();
                writeln!(out)?;
                writeln!(out, "{}", render::post_list(&posts[listed..]))?;
            }
            Err(e) => {
                error!("{}", e);
                notify_failure(input, notices, render::LOAD_MORE_FAILED).await?;
            }
        }
    }
    Ok(())
}

/// Show the listing and load more posts on demand.
pub async fn list<B>(
    config: &Config,
    backend: &B,
    store: &PageStore,
) -> Result<(), Box<dyn Error>>
where
    B: CmsBackend + Clone + Send + 'static,
{
    let (listing, regeneration) = page::request_listing(backend, store).await?;
    let paginator = Paginator::new(listing.props.posts_pagination);
    let fetcher = HttpContinuation::new(config.timeout())?;
    let mut input = BufReader::new(tokio::io::stdin()).lines();

    println!("{}", render::post_list(&paginator.posts()));
    browse(
        &paginator,
        &fetcher,
        &mut input,
        &mut io::stdout(),
        &mut io::stderr(),
    )
    .await?;

    if paginator.is_complete() {
        info!("{} posts, all loaded", paginator.count());
    }

    if let Some(task) = regeneration {
        debug!("Waiting for the listing regeneration");
        match task.await? {
            Ok(()) => info!("Listing regenerated"),
            Err(e) => error!("Listing regeneration failed: {}", e),
        }
    }

    Ok(())
}

/// Show one post. A post not generated yet shows the loading state until
/// its first generation is done.
pub async fn post(
    backend: &impl CmsBackend,
    store: &PageStore,
    uid: &str,
) -> Result<(), Box<dyn Error>> {
    let page = match page::lookup_post(store, uid)? {
        DetailView::Ready(page) => page,
        DetailView::Fallback => {
            println!("{}", render::LOADING);
            page::generate_post(backend, store, uid).await?
        }
    };

    print!("{}", render::post_detail(&page.props.post));
    Ok(())
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::{
        post::{normalize_summary, PostPage},
        test::{cursor, document, FakeContinuation},
    };

    fn paginator() -> Paginator {
        Paginator::new(PostPage {
            next_page: Some(cursor("X")),
            results: vec![
                normalize_summary(document("a")).unwrap(),
                normalize_summary(document("b")).unwrap(),
            ],
        })
    }

    fn fetcher() -> FakeContinuation {
        let c = serde_json::to_value(document("c")).unwrap();
        FakeContinuation::new().page("X", json!({ "results": [c], "next_page": null }))
    }

    fn lines(text: &'static str) -> Lines<&'static [u8]> {
        text.as_bytes().lines()
    }

    #[tokio::test]
    async fn test_failure_notice_then_continue() {
        let paginator = paginator();
        let fetcher = fetcher();
        fetcher.fail_next(1);

        let (mut out, mut notices) = (Vec::new(), Vec::new());
        // load (fails), acknowledge, load again
        let mut input = lines("\n\n\n");
        browse(&paginator, &fetcher, &mut input, &mut out, &mut notices)
            .await
            .unwrap();

        let notices = String::from_utf8(notices).unwrap();
        assert!(notices.contains(render::LOAD_MORE_FAILED));
        assert!(String::from_utf8(out).unwrap().contains("Título c"));

        assert_eq!(fetcher.requested(), vec!["X", "X"]);
        let uids: Vec<_> = paginator.posts().into_iter().map(|p| p.uid).collect();
        assert_eq!(uids, vec!["a", "b", "c"]);
        assert!(paginator.is_complete());
    }

    #[tokio::test]
    async fn test_failure_notice_waits_for_enter() {
        let paginator = paginator();
        let fetcher = fetcher();
        fetcher.fail_next(1);

        let (mut out, mut notices) = (Vec::new(), Vec::new());
        // the second line only acknowledges the notice
        let mut input = lines("\n\n");
        browse(&paginator, &fetcher, &mut input, &mut out, &mut notices)
            .await
            .unwrap();

        assert!(String::from_utf8(notices)
            .unwrap()
            .contains(render::LOAD_MORE_FAILED));
        assert_eq!(fetcher.requested(), vec!["X"]);
        assert_eq!(paginator.count(), 2);
        assert!(paginator.can_load_more());
    }

    #[tokio::test]
    async fn test_quit() {
        let paginator = paginator();
        let fetcher = fetcher();
        let (mut out, mut notices) = (Vec::new(), Vec::new());

        let mut input = lines("q\n");
        browse(&paginator, &fetcher, &mut input, &mut out, &mut notices)
            .await
            .unwrap();

        assert!(fetcher.requested().is_empty());
        assert!(notices.is_empty());
        assert!(String::from_utf8(out).unwrap().contains(render::LOAD_MORE));
    }
}
