//! Drives a [Browser] through its event loop with paused time.

use std::time::Duration;

use dex_browser::{Browser, BrowserConfig, BrowserEvent, BrowserView, SEARCH_FAILED_MESSAGE, SortKey};
use dex_catalog::{Entry, EntryId, MockClient};
use dex_test_utils::{init_test_logger, record, sample_records};
use pretty_assertions::assert_eq;
use tokio::sync::{mpsc, watch};
use tokio::time::sleep;

fn ids(entries: &[Entry]) -> Vec<u32> {
    entries.iter().map(|e| e.id.get()).collect()
}

async fn loaded(client: &MockClient) -> Browser<MockClient> {
    let mut browser = Browser::new(client.clone(), BrowserConfig::default());
    browser.load().await.unwrap();
    browser
}

/// Run `script` against the event loop of `browser` on the current task.
///
/// The loop stops once `script` returns and drops its sender.
async fn drive<F, Fut>(browser: &mut Browser<MockClient>, script: F)
where
    F: FnOnce(mpsc::UnboundedSender<BrowserEvent>, watch::Receiver<BrowserView>) -> Fut,
    Fut: Future<Output = ()>,
{
    let (events, events_rx) = mpsc::unbounded_channel();
    let (view_tx, view) = watch::channel(BrowserView::default());
    tokio::join!(browser.run(events_rx, view_tx), script(events, view));
}

fn query(text: &str) -> BrowserEvent {
    BrowserEvent::Query(text.to_string())
}

#[tokio::test(start_paused = true)]
async fn search_waits_for_quiet_period() {
    init_test_logger();
    let client = MockClient::new(sample_records());
    let mut browser = loaded(&client).await;
    let calls_after_load = client.listing_calls();

    drive(&mut browser, |events, view| {
        let client = client.clone();
        async move {
            events.send(query("c")).unwrap();
            sleep(Duration::from_millis(300)).await;
            events.send(query("ch")).unwrap();
            sleep(Duration::from_millis(300)).await;
            events.send(query("char")).unwrap();

            sleep(Duration::from_millis(499)).await;
            assert_eq!(client.listing_calls(), calls_after_load);
            // local filter in the meantime
            assert_eq!(ids(&view.borrow().entries), vec![4, 5]);

            sleep(Duration::from_millis(2)).await;
            assert_eq!(client.listing_calls(), calls_after_load + 1);
            let current = view.borrow().clone();
            assert_eq!(current.query, "char");
            assert!(!current.searching);
            assert_eq!(ids(&current.entries), vec![4, 5]);
        }
    })
    .await;

    assert!(browser.search().cache().lookup("char").is_some());
    assert!(browser.search().cache().lookup("ch").is_none());
}

#[tokio::test(start_paused = true)]
async fn late_response_for_older_query_is_discarded() {
    let client = MockClient::new(sample_records());
    let mut browser = loaded(&client).await;
    // the listing for "char" takes a second, the one for "charme" is instant
    client.push_listing_delay(Duration::from_secs(1));

    drive(&mut browser, |events, view| async move {
        events.send(query("char")).unwrap();
        sleep(Duration::from_millis(600)).await;
        assert!(view.borrow().searching);
        // nothing to show until the remote results arrive
        assert!(view.borrow().entries.is_empty());

        events.send(query("charme")).unwrap();
        sleep(Duration::from_millis(600)).await;
        assert_eq!(ids(&view.borrow().entries), vec![5]);

        // "char" resolves now, after "charme"
        sleep(Duration::from_secs(1)).await;
        let current = view.borrow().clone();
        assert_eq!(current.query, "charme");
        assert_eq!(ids(&current.entries), vec![5]);
    })
    .await;

    assert_eq!(browser.search().query(), "charme");
    assert_eq!(
        browser.search().cache().lookup("char").map(|hit| ids(&hit)),
        Some(vec![4, 5])
    );
}

#[tokio::test(start_paused = true)]
async fn clearing_the_query_resets_immediately() {
    let client = MockClient::new(sample_records());
    let mut browser = loaded(&client).await;
    let total = browser.store().entries().len();

    drive(&mut browser, |events, view| async move {
        events.send(query("pika")).unwrap();
        sleep(Duration::from_millis(600)).await;
        assert_eq!(ids(&view.borrow().entries), vec![25]);

        events.send(query("")).unwrap();
        sleep(Duration::from_millis(1)).await;
        let current = view.borrow().clone();
        assert_eq!(current.query, "");
        assert_eq!(current.entries.len(), total);
        assert_eq!(current.search_error, None);
    })
    .await;
}

#[tokio::test(start_paused = true)]
async fn repeated_query_is_served_from_cache() {
    let client = MockClient::new(sample_records());
    let mut browser = loaded(&client).await;
    let calls_after_load = client.listing_calls();

    drive(&mut browser, |events, view| {
        let client = client.clone();
        async move {
            events.send(query("char")).unwrap();
            sleep(Duration::from_millis(600)).await;
            events.send(query("")).unwrap();
            sleep(Duration::from_millis(1)).await;
            events.send(query("CHAR")).unwrap();
            sleep(Duration::from_millis(600)).await;

            assert_eq!(client.listing_calls(), calls_after_load + 1);
            assert_eq!(ids(&view.borrow().entries), vec![4, 5]);
        }
    })
    .await;
}

#[tokio::test(start_paused = true)]
async fn failed_search_shows_message() {
    let client = MockClient::new(sample_records());
    let mut browser = loaded(&client).await;
    client.fail_record(EntryId::new(25));

    drive(&mut browser, |events, view| async move {
        events.send(query("pika")).unwrap();
        sleep(Duration::from_millis(600)).await;

        let current = view.borrow().clone();
        assert_eq!(current.search_error.as_deref(), Some(SEARCH_FAILED_MESSAGE));
        // no remote results and nothing in flight, the local filter applies
        assert_eq!(ids(&current.entries), vec![25]);
    })
    .await;
}

#[tokio::test(start_paused = true)]
async fn filter_sort_and_favorites_through_events() {
    let client = MockClient::new([
        record(1, "bulbasaur", &["grass", "poison"]),
        record(4, "charmander", &["fire"]),
    ]);
    let mut browser = loaded(&client).await;

    drive(&mut browser, |events, view| async move {
        events
            .send(BrowserEvent::TypeFilter(Some("fire".to_string())))
            .unwrap();
        sleep(Duration::from_millis(1)).await;
        assert_eq!(ids(&view.borrow().entries), vec![4]);

        events.send(BrowserEvent::TypeFilter(None)).unwrap();
        events.send(BrowserEvent::Sort(SortKey::Name)).unwrap();
        sleep(Duration::from_millis(1)).await;
        assert_eq!(view.borrow().entries[0].name, "bulbasaur");
        assert_eq!(view.borrow().categories, vec!["fire", "grass", "poison"]);

        events.send(BrowserEvent::ToggleFavorite(EntryId::new(1))).unwrap();
        sleep(Duration::from_millis(1)).await;
        assert_eq!(view.borrow().favorites, vec![EntryId::new(1)]);

        events.send(BrowserEvent::ToggleFavorite(EntryId::new(1))).unwrap();
        sleep(Duration::from_millis(1)).await;
        assert!(view.borrow().favorites.is_empty());
    })
    .await;

    assert!(!browser.is_favorite(EntryId::new(1)));
    assert_eq!(browser.sort(), SortKey::Name);
}

#[tokio::test(start_paused = true)]
async fn reload_recovers_from_failed_load() {
    let client = MockClient::new(sample_records());
    client.fail_listing();
    let mut browser = Browser::new(client.clone(), BrowserConfig::default());
    assert!(browser.load().await.is_err());

    drive(&mut browser, |events, view| {
        let client = client.clone();
        async move {
            events.send(BrowserEvent::Reload).unwrap();
            sleep(Duration::from_millis(1)).await;
            assert!(view.borrow().load_error.is_some());
            assert!(!view.borrow().is_loading);
            assert_eq!(view.borrow().total, 0);

            client.clear_failures();
            events.send(BrowserEvent::Reload).unwrap();
            sleep(Duration::from_millis(1)).await;
            assert!(view.borrow().load_error.is_none());
            assert_eq!(view.borrow().total, sample_records().len());
        }
    })
    .await;
}
