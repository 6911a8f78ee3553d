//! Cursor pagination over `GET /bucket`.
//!
//! The service returns at most [`PAGE_SIZE`] objects per call and no
//! has-more flag. A short page is the only end-of-listing signal, so when
//! the bucket holds an exact multiple of [`PAGE_SIZE`] objects the last
//! full page still prompts, and continuing costs one extra round trip
//! that comes back empty.

use std::io;

use crate::{client::PhotoAppClient, transport::Transport, BucketItem, Result};

/// Objects rendered per page.
pub const PAGE_SIZE: usize = 12;

/// Receives pages and decides whether to fetch the next one.
pub trait Pager {
    fn show_page(&mut self, items: &[BucketItem]) -> io::Result<()>;

    /// Called after every full page.
    fn next_page(&mut self) -> io::Result<bool>;
}

/// Summary of a finished listing.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Listing {
    /// Requests sent to the service.
    pub rounds: usize,
    /// Objects handed to the pager.
    pub items: usize,
    /// Cursor after the last rendered full page.
    pub last_key: Option<String>,
}

/// Lists the whole bucket, one page at a time, until a short page arrives
/// or the pager declines to continue.
///
/// A failed page ends the listing with the error; pages already shown
/// stay shown.
pub async fn list_bucket<T, P>(client: &PhotoAppClient<T>, pager: &mut P) -> Result<Listing>
where
    T: Transport,
    P: Pager,
{
    let mut listing = Listing::default();

    loop {
        let items = client.bucket_page(listing.last_key.as_deref()).await?;
        listing.rounds += 1;

        if items.len() < PAGE_SIZE {
            if !items.is_empty() {
                pager.show_page(&items)?;
            }
            listing.items += items.len();
            tracing::debug!(
                rounds = listing.rounds,
                items = listing.items,
                "bucket listing complete"
            );
            return Ok(listing);
        }

        let page = &items[..PAGE_SIZE];
        pager.show_page(page)?;
        listing.items += page.len();
        listing.last_key = Some(page[PAGE_SIZE - 1].key.clone());

        if !pager.next_page()? {
            return Ok(listing);
        }
    }
}

#[cfg(test)]
mod tests {
    use std::{
        io,
        sync::atomic::{AtomicUsize, Ordering},
    };

    use reqwest::Url;
    use serde_json::json;

    use super::{list_bucket, Pager, PAGE_SIZE};
    use crate::{
        transport::{RawResponse, Request, Transport, TransportError},
        BucketItem, ClientOptions, PhotoAppClient, PhotoAppError,
    };

    /// Serves a sorted key set the way the object store does: up to
    /// `page_len` keys strictly after `startafter`.
    struct SimulatedBucket {
        keys: Vec<String>,
        page_len: usize,
        fail_on_round: Option<usize>,
        rounds: AtomicUsize,
    }

    impl SimulatedBucket {
        fn with_objects(count: usize) -> Self {
            Self {
                keys: (0..count).map(|i| format!("user/{i:04}.jpg")).collect(),
                page_len: PAGE_SIZE,
                fail_on_round: None,
                rounds: AtomicUsize::new(0),
            }
        }
    }

    impl Transport for SimulatedBucket {
        async fn send(&self, request: &Request) -> Result<RawResponse, TransportError> {
            let round = self.rounds.fetch_add(1, Ordering::SeqCst) + 1;
            if self.fail_on_round == Some(round) {
                return Ok(RawResponse::new(500, json!({"message": "bucket offline"}).to_string()));
            }

            let url = Url::parse(&request.url).map_err(TransportError::new)?;
            let start_after = url
                .query_pairs()
                .find(|(name, _)| name == "startafter")
                .map(|(_, value)| value.into_owned());
            let data: Vec<_> = self
                .keys
                .iter()
                .filter(|key| start_after.as_deref().map_or(true, |after| key.as_str() > after))
                .take(self.page_len)
                .map(|key| json!({"Key": key, "LastModified": "2024-01-01T00:00:00.000Z", "Size": 10}))
                .collect();
            Ok(RawResponse::new(
                200,
                json!({"message": "success", "data": data}).to_string(),
            ))
        }
    }

    #[derive(Default)]
    struct RecordingPager {
        pages: Vec<Vec<String>>,
        continue_after: Option<usize>,
        prompts: usize,
    }

    impl Pager for RecordingPager {
        fn show_page(&mut self, items: &[BucketItem]) -> io::Result<()> {
            self.pages.push(items.iter().map(|item| item.key.clone()).collect());
            Ok(())
        }

        fn next_page(&mut self) -> io::Result<bool> {
            self.prompts += 1;
            Ok(self.continue_after.map_or(true, |limit| self.prompts < limit))
        }
    }

    fn client(bucket: SimulatedBucket) -> PhotoAppClient<SimulatedBucket> {
        PhotoAppClient::with_transport("http://photoapp.test", bucket, ClientOptions::default())
            .expect("valid url")
    }

    #[tokio::test]
    async fn every_object_is_rendered_exactly_once() {
        for count in [1, 5, 11, 13, 30, 61] {
            let client = client(SimulatedBucket::with_objects(count));
            let mut pager = RecordingPager::default();

            let listing = list_bucket(&client, &mut pager).await.expect("listing");

            let rendered: Vec<String> = pager.pages.concat();
            let expected: Vec<String> = (0..count).map(|i| format!("user/{i:04}.jpg")).collect();
            assert_eq!(rendered, expected, "count {count}");
            assert!(pager.pages.iter().all(|page| page.len() <= PAGE_SIZE));
            assert_eq!(listing.rounds, count.div_ceil(PAGE_SIZE), "count {count}");
            assert_eq!(listing.items, count);
        }
    }

    #[tokio::test]
    async fn exact_multiple_costs_one_empty_round_trip() {
        let client = client(SimulatedBucket::with_objects(PAGE_SIZE));
        let mut pager = RecordingPager::default();

        let listing = list_bucket(&client, &mut pager).await.expect("listing");

        assert_eq!(pager.pages.len(), 1);
        assert_eq!(pager.prompts, 1);
        assert_eq!(listing.rounds, 2);
        assert_eq!(listing.items, PAGE_SIZE);
        assert_eq!(listing.last_key.as_deref(), Some("user/0011.jpg"));
    }

    #[tokio::test]
    async fn empty_bucket_renders_nothing() {
        let client = client(SimulatedBucket::with_objects(0));
        let mut pager = RecordingPager::default();

        let listing = list_bucket(&client, &mut pager).await.expect("listing");

        assert!(pager.pages.is_empty());
        assert_eq!(pager.prompts, 0);
        assert_eq!(listing.rounds, 1);
    }

    #[tokio::test]
    async fn declining_stops_after_the_current_page() {
        let client = client(SimulatedBucket::with_objects(40));
        let mut pager = RecordingPager {
            continue_after: Some(2),
            ..RecordingPager::default()
        };

        let listing = list_bucket(&client, &mut pager).await.expect("listing");

        assert_eq!(pager.pages.len(), 2);
        assert_eq!(listing.rounds, 2);
        assert_eq!(listing.items, 24);
        assert_eq!(listing.last_key.as_deref(), Some("user/0023.jpg"));
    }

    #[tokio::test]
    async fn oversized_page_is_truncated_and_cursor_follows_last_rendered() {
        let mut bucket = SimulatedBucket::with_objects(20);
        bucket.page_len = 15;
        let client = client(bucket);
        let mut pager = RecordingPager::default();

        let listing = list_bucket(&client, &mut pager).await.expect("listing");

        assert_eq!(pager.pages[0].len(), PAGE_SIZE);
        assert_eq!(pager.pages[1].first().map(String::as_str), Some("user/0012.jpg"));
        assert_eq!(listing.items, 20);
    }

    #[tokio::test]
    async fn failed_page_stops_the_listing() {
        let mut bucket = SimulatedBucket::with_objects(30);
        bucket.fail_on_round = Some(2);
        let client = client(bucket);
        let mut pager = RecordingPager::default();

        let err = list_bucket(&client, &mut pager).await.expect_err("must fail");

        assert_eq!(pager.pages.len(), 1);
        match err {
            PhotoAppError::Api { status, message, url } => {
                assert_eq!(status, 500);
                assert_eq!(message, "bucket offline");
                assert!(url.ends_with("/bucket?startafter=user%2F0011.jpg"));
            }
            other => panic!("expected api error, got {other:?}"),
        }
    }
}
