use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Instant;
use tracing::{info, warn};

use crate::client::HttpClient;
use crate::error::{FetchError, SearchError};
use crate::query;
use crate::relay::Relay;
use crate::render::{Card, RenderSink, USER_NOT_FOUND};
use crate::stats::{Difficulty, UserStats};
use crate::username::Username;

/// How a single run ended. Every variant leaves the pipeline idle again.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    Rendered(UserStats),
    NotFound,
    Failed(FetchError),
}

/// Fetches one user's stats and pushes them into a [`RenderSink`].
///
/// At most one run is in flight at a time; a second call made while the
/// first is suspended on the network returns [`SearchError::Busy`] without
/// touching the network or the sink.
pub struct StatsPipeline<C, S> {
    client: C,
    sink: S,
    relay: Relay,
    endpoint: String,
    busy: AtomicBool,
}

impl<C: HttpClient, S: RenderSink> StatsPipeline<C, S> {
    pub fn new(client: C, sink: S, relay: Relay, endpoint: impl Into<String>) -> Self {
        Self {
            client,
            sink,
            relay,
            endpoint: endpoint.into(),
            busy: AtomicBool::new(false),
        }
    }

    pub fn client(&self) -> &C {
        &self.client
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn is_busy(&self) -> bool {
        self.busy.load(Ordering::Acquire)
    }

    pub async fn fetch_and_render(&self, username: &Username) -> Result<Outcome, SearchError> {
        let _guard = BusyGuard::acquire(&self.busy, &self.sink).ok_or(SearchError::Busy)?;

        let start_time = Instant::now();
        info!(
            action = "start",
            component = "stats_fetch",
            username = %username,
            relay = self.relay.name(),
            "Fetching user stats"
        );

        let outcome = match self.fetch(username).await {
            Ok(Some(stats)) => {
                self.render(&stats);
                Outcome::Rendered(stats)
            }
            Ok(None) => {
                self.sink.set_cards(&[Card::message(USER_NOT_FOUND)]);
                Outcome::NotFound
            }
            Err(e) => {
                warn!(action = "fetch", component = "stats_fetch", username = %username, error = %e, "Stats fetch failed");
                self.sink.set_cards(&[Card::message(e.to_string())]);
                Outcome::Failed(e)
            }
        };

        info!(
            action = "complete",
            component = "stats_fetch",
            username = %username,
            outcome = outcome.name(),
            duration_ms = start_time.elapsed().as_millis(),
            "Stats fetch finished"
        );
        Ok(outcome)
    }

    /// `Ok(None)` means the platform has no such user.
    async fn fetch(&self, username: &Username) -> Result<Option<UserStats>, FetchError> {
        let request = query::build_request(&self.relay, &self.endpoint, username)?;
        let response = self.client.send(request).await?;

        if !response.is_success() {
            return Err(FetchError::Status(response.status));
        }

        let parsed = query::decode_response(&response.body)?;
        let data = parsed
            .data
            .ok_or_else(|| FetchError::Decode("response has no data".to_string()))?;

        let Some(user) = data.matched_user else {
            if let Some(error) = parsed.errors.first() {
                info!(action = "lookup", component = "stats_fetch", username = %username, message = %error.message, "Platform reported no matched user");
            }
            return Ok(None);
        };

        UserStats::from_profile(&data.all_questions_count, &user.submit_stats).map(Some)
    }

    fn render(&self, stats: &UserStats) {
        for difficulty in Difficulty::TIERS {
            if let Some(progress) = stats.progress(difficulty) {
                self.sink.set_progress(difficulty, &progress);
            }
        }
        self.sink.set_cards(&stats.cards());
    }
}

impl Outcome {
    pub fn name(&self) -> &'static str {
        match self {
            Outcome::Rendered(_) => "rendered",
            Outcome::NotFound => "not_found",
            Outcome::Failed(_) => "failed",
        }
    }
}

/// Holds the busy flag for one run and restores idle on every exit path.
struct BusyGuard<'a, S: RenderSink> {
    flag: &'a AtomicBool,
    sink: &'a S,
}

impl<'a, S: RenderSink> BusyGuard<'a, S> {
    fn acquire(flag: &'a AtomicBool, sink: &'a S) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()?;
        sink.set_busy(true);
        Some(Self { flag, sink })
    }
}

impl<S: RenderSink> Drop for BusyGuard<'_, S> {
    fn drop(&mut self) {
        self.sink.set_busy(false);
        self.flag.store(false, Ordering::Release);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::{HttpRequest, HttpResponse};
    use crate::render::{RecordingSink, SinkEvent, TRIGGER_IDLE_LABEL};
    use crate::stats::Progress;
    use crate::username::validate;
    use async_trait::async_trait;
    use serde_json::{json, Value};
    use std::sync::atomic::AtomicUsize;
    use std::sync::Mutex;
    use tokio::sync::Notify;

    const ENDPOINT: &str = "https://leetcode.com/graphql/";

    fn found_body() -> Value {
        json!({
            "data": {
                "allQuestionsCount": [
                    { "difficulty": "All", "count": 3000 },
                    { "difficulty": "Easy", "count": 800 },
                    { "difficulty": "Medium", "count": 1500 },
                    { "difficulty": "Hard", "count": 700 }
                ],
                "matchedUser": {
                    "submitStats": {
                        "acSubmissionNum": [
                            { "difficulty": "All", "count": 300, "submissions": 500 },
                            { "difficulty": "Easy", "count": 150, "submissions": 150 },
                            { "difficulty": "Medium", "count": 120, "submissions": 120 },
                            { "difficulty": "Hard", "count": 30, "submissions": 30 }
                        ],
                        "totalSubmissionNum": [
                            { "difficulty": "All", "count": 320, "submissions": 1200 },
                            { "difficulty": "Easy", "count": 160, "submissions": 400 },
                            { "difficulty": "Medium", "count": 125, "submissions": 600 },
                            { "difficulty": "Hard", "count": 35, "submissions": 200 }
                        ]
                    }
                }
            }
        })
    }

    /// Answers every request with the same canned response.
    struct CannedClient {
        response: Result<HttpResponse, FetchError>,
        requests: Mutex<Vec<HttpRequest>>,
    }

    impl CannedClient {
        fn json(status: u16, body: Value) -> Self {
            Self::raw(status, body.to_string().into_bytes())
        }

        fn raw(status: u16, body: Vec<u8>) -> Self {
            Self {
                response: Ok(HttpResponse { status, body }),
                requests: Mutex::new(Vec::new()),
            }
        }

        fn failing(error: FetchError) -> Self {
            Self {
                response: Err(error),
                requests: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl HttpClient for CannedClient {
        async fn send(&self, request: HttpRequest) -> Result<HttpResponse, FetchError> {
            self.requests.lock().unwrap().push(request);
            self.response.clone()
        }
    }

    /// Holds every request until released.
    struct GatedClient {
        calls: AtomicUsize,
        gate: Notify,
    }

    #[async_trait]
    impl HttpClient for GatedClient {
        async fn send(&self, _request: HttpRequest) -> Result<HttpResponse, FetchError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.gate.notified().await;
            Ok(HttpResponse {
                status: 200,
                body: found_body().to_string().into_bytes(),
            })
        }
    }

    fn pipeline<C: HttpClient>(client: C) -> StatsPipeline<C, RecordingSink> {
        StatsPipeline::new(client, RecordingSink::new(), Relay::default(), ENDPOINT)
    }

    fn assert_idle<C: HttpClient>(pipeline: &StatsPipeline<C, RecordingSink>) {
        assert!(!pipeline.is_busy());
        assert!(!pipeline.sink().is_busy());
        assert_eq!(pipeline.sink().trigger_label(), TRIGGER_IDLE_LABEL);
    }

    #[tokio::test]
    async fn renders_progress_and_cards() {
        let pipeline = pipeline(CannedClient::json(200, found_body()));
        let username = validate("octocat").unwrap();

        let outcome = pipeline.fetch_and_render(&username).await.unwrap();
        assert!(matches!(outcome, Outcome::Rendered(_)));

        let sink = pipeline.sink();
        let easy = sink.progress(Difficulty::Easy).unwrap();
        assert_eq!(easy.label(), "150/800");
        assert_eq!(easy.degrees(), 67.5);
        assert_eq!(sink.progress(Difficulty::Medium), Some(Progress::new(120, 1500)));
        assert_eq!(sink.progress(Difficulty::Hard), Some(Progress::new(30, 700)));
        assert_eq!(
            sink.cards(),
            vec![
                Card::stat("Overall Submissions", 1200),
                Card::stat("Overall Easy Submissions", 400),
                Card::stat("Overall Medium Submissions", 600),
                Card::stat("Overall Hard Submissions", 200),
            ]
        );
        assert_idle(&pipeline);
    }

    #[tokio::test]
    async fn busy_brackets_the_run() {
        let pipeline = pipeline(CannedClient::json(200, found_body()));
        let username = validate("octocat").unwrap();
        pipeline.fetch_and_render(&username).await.unwrap();

        let events = pipeline.sink().events();
        assert_eq!(events.first(), Some(&SinkEvent::Busy(true)));
        assert_eq!(events.last(), Some(&SinkEvent::Busy(false)));
        assert_eq!(
            events
                .iter()
                .filter(|e| matches!(e, SinkEvent::Busy(_)))
                .count(),
            2
        );
    }

    #[tokio::test]
    async fn request_goes_through_the_relay() {
        let pipeline = pipeline(CannedClient::json(200, found_body()));
        let username = validate("octocat").unwrap();
        pipeline.fetch_and_render(&username).await.unwrap();

        let requests = pipeline.client().requests.lock().unwrap();
        assert_eq!(requests.len(), 1);
        assert_eq!(
            requests[0].url,
            "https://api.allorigins.win/raw?url=https://leetcode.com/graphql/"
        );
        let body: Value = serde_json::from_slice(&requests[0].body).unwrap();
        assert_eq!(body["variables"]["username"], "octocat");
    }

    #[tokio::test]
    async fn error_status_shows_one_message_card() {
        let pipeline = pipeline(CannedClient::raw(500, b"oops".to_vec()));
        let username = validate("octocat").unwrap();

        let outcome = pipeline.fetch_and_render(&username).await.unwrap();

        assert_eq!(outcome, Outcome::Failed(FetchError::Status(500)));
        assert_eq!(
            pipeline.sink().cards(),
            vec![Card::message("Unable to fetch user details")]
        );
        assert_eq!(pipeline.sink().progress(Difficulty::Easy), None);
        assert_idle(&pipeline);
    }

    #[tokio::test]
    async fn transport_failure_shows_its_message() {
        let pipeline = pipeline(CannedClient::failing(FetchError::Transport(
            "Connection failed: refused".to_string(),
        )));
        let username = validate("octocat").unwrap();

        let outcome = pipeline.fetch_and_render(&username).await.unwrap();

        assert!(matches!(outcome, Outcome::Failed(FetchError::Transport(_))));
        assert_eq!(
            pipeline.sink().cards(),
            vec![Card::message("Connection failed: refused")]
        );
        assert_idle(&pipeline);
    }

    #[tokio::test]
    async fn malformed_body_is_a_failure_not_a_panic() {
        let pipeline = pipeline(CannedClient::raw(200, b"{\"data\":".to_vec()));
        let username = validate("octocat").unwrap();

        let outcome = pipeline.fetch_and_render(&username).await.unwrap();

        assert!(matches!(outcome, Outcome::Failed(FetchError::Decode(_))));
        let cards = pipeline.sink().cards();
        assert_eq!(cards.len(), 1);
        assert!(matches!(&cards[0], Card::Message(text) if text.starts_with("Unexpected response")));
        assert_idle(&pipeline);
    }

    #[tokio::test]
    async fn missing_data_is_a_decode_failure() {
        let pipeline = pipeline(CannedClient::json(200, json!({ "errors": [] })));
        let username = validate("octocat").unwrap();

        let outcome = pipeline.fetch_and_render(&username).await.unwrap();
        assert!(matches!(outcome, Outcome::Failed(FetchError::Decode(_))));
    }

    #[tokio::test]
    async fn unknown_user_leaves_progress_alone() {
        let sink = RecordingSink::new();
        sink.set_progress(Difficulty::Easy, &Progress::new(10, 800));

        let not_found = json!({
            "errors": [{ "message": "That user does not exist." }],
            "data": { "allQuestionsCount": [], "matchedUser": null }
        });
        let pipeline = StatsPipeline::new(
            CannedClient::json(200, not_found),
            &sink,
            Relay::Direct,
            ENDPOINT,
        );
        let username = validate("nobody_here").unwrap();

        let outcome = pipeline.fetch_and_render(&username).await.unwrap();

        assert_eq!(outcome, Outcome::NotFound);
        assert_eq!(sink.cards(), vec![Card::message(USER_NOT_FOUND)]);
        assert_eq!(sink.progress(Difficulty::Easy), Some(Progress::new(10, 800)));
        assert_eq!(sink.progress(Difficulty::Medium), None);
        assert!(!sink.is_busy());
    }

    #[tokio::test]
    async fn second_search_while_in_flight_is_refused() {
        let pipeline = pipeline(GatedClient {
            calls: AtomicUsize::new(0),
            gate: Notify::new(),
        });
        let username = validate("octocat").unwrap();

        let first = pipeline.fetch_and_render(&username);
        let second = async {
            tokio::task::yield_now().await;
            assert!(pipeline.is_busy());
            let refused = pipeline.fetch_and_render(&username).await;
            pipeline.client().gate.notify_one();
            refused
        };
        let (first, second) = tokio::join!(first, second);

        assert!(matches!(first, Ok(Outcome::Rendered(_))));
        assert_eq!(second, Err(SearchError::Busy));
        assert_eq!(pipeline.client().calls.load(Ordering::SeqCst), 1);
        assert_idle(&pipeline);

        // Idle again, so the next search goes through. The stored permit
        // lets the gated request complete straight away.
        pipeline.client().gate.notify_one();
        let again = pipeline.fetch_and_render(&username).await;
        assert!(matches!(again, Ok(Outcome::Rendered(_))));
        assert_eq!(pipeline.client().calls.load(Ordering::SeqCst), 2);
    }
}
