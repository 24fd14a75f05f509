use mood_aggregator::SearchService;
use mood_core::{
    AppConfig, CoreError, CorpusCollector, CorpusLimits, ErrorExt, RedditApiError, SentimentLabel,
};
use reddit_client::RedditCollector;
use sentiment_engine::LexiconAnalyzer;
use serde_json::{json, Value};
use std::time::Duration;
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn config_for(server: &MockServer) -> AppConfig {
    AppConfig {
        reddit_client_id: Some("client-id".to_string()),
        reddit_client_secret: Some("client-secret".to_string()),
        user_agent: "reddit-mood-tests/0.1".to_string(),
        api_base_url: server.uri(),
        auth_base_url: server.uri(),
        http_timeout_secs: 5,
        ..AppConfig::default()
    }
}

async fn mount_token(server: &MockServer, expected_calls: u64) {
    Mock::given(method("POST"))
        .and(path("/api/v1/access_token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "access_token": "test-token",
            "token_type": "bearer",
            "expires_in": 86400,
            "scope": "*"
        })))
        .expect(expected_calls)
        .mount(server)
        .await;
}

fn post(id: &str, title: &str, selftext: &str, score: i64) -> Value {
    json!({
        "kind": "t3",
        "data": {
            "id": id,
            "title": title,
            "selftext": selftext,
            "url": format!("https://example.com/{id}"),
            "subreddit": "rust",
            "permalink": format!("/r/rust/comments/{id}/"),
            "score": score,
            "num_comments": 3
        }
    })
}

fn comment(id: &str, body: &str, author: Option<&str>, score: i64, replies: Value) -> Value {
    json!({
        "kind": "t1",
        "data": { "id": id, "body": body, "author": author, "score": score, "replies": replies }
    })
}

fn listing(children: Vec<Value>) -> Value {
    json!({ "kind": "Listing", "data": { "children": children, "after": null, "before": null } })
}

async fn mount_search(server: &MockServer, query: &str, posts: Vec<Value>) {
    Mock::given(method("GET"))
        .and(path("/r/all/search"))
        .and(query_param("q", query))
        .and(query_param("sort", "relevance"))
        .and(query_param("restrict_sr", "true"))
        .and(header("authorization", "Bearer test-token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(listing(posts)))
        .mount(server)
        .await;
}

async fn mount_comments(server: &MockServer, post_id: &str, comments: Vec<Value>) {
    let body = json!([listing(vec![post(post_id, "", "", 0)]), listing(comments)]);
    Mock::given(method("GET"))
        .and(path(format!("/comments/{post_id}")))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_fetch_corpus_flattens_comments() {
    let server = MockServer::start().await;
    mount_token(&server, 1).await;
    mount_search(
        &server,
        "rust",
        vec![post("p1", "Rust is great", "", 9), post("p2", "Borrow checker", "It is fine", 0)],
    )
    .await;
    mount_comments(
        &server,
        "p1",
        vec![
            comment(
                "c1",
                "top level",
                Some("alice"),
                5,
                listing(vec![comment("c3", "nested reply", None, 2, json!(""))]),
            ),
            comment("c2", "second top", Some("bob"), -2, json!("")),
            json!({ "kind": "more", "data": { "count": 40, "children": ["c9"] } }),
        ],
    )
    .await;
    mount_comments(&server, "p2", Vec::new()).await;

    let collector = RedditCollector::connect(&config_for(&server)).await.unwrap();
    let posts = collector
        .fetch_corpus("rust", CorpusLimits::default())
        .await
        .unwrap();

    assert_eq!(posts.len(), 2);
    assert_eq!(posts[0].title, "Rust is great");
    assert_eq!(posts[0].community_score, 9);
    let bodies: Vec<&str> = posts[0].comments.iter().map(|c| c.body.as_str()).collect();
    assert_eq!(bodies, vec!["top level", "second top", "nested reply"]);
    assert_eq!(posts[0].comments[2].author, "[deleted]");
    assert_eq!(posts[0].comments[1].community_score, -2);
    assert_eq!(posts[1].body, "It is fine");
    assert!(posts[1].comments.is_empty());

    let metrics = collector.api().get_metrics().await;
    assert_eq!(metrics.total_requests, 3);
    assert_eq!(metrics.requests_by_endpoint["/comments"].request_count, 2);
}

#[tokio::test]
async fn test_limits_are_applied() {
    let server = MockServer::start().await;
    mount_token(&server, 1).await;
    mount_search(
        &server,
        "limits",
        vec![post("a", "one", "", 1), post("b", "two", "", 1), post("c", "three", "", 1)],
    )
    .await;
    let many: Vec<Value> = (0..6)
        .map(|i| comment(&format!("c{i}"), "text", Some("user"), 1, json!("")))
        .collect();
    for id in ["a", "b", "c"] {
        mount_comments(&server, id, many.clone()).await;
    }

    let collector = RedditCollector::connect(&config_for(&server)).await.unwrap();
    let limits = CorpusLimits {
        post_limit: 2,
        comment_limit: 4,
    };
    let posts = collector.fetch_corpus("limits", limits).await.unwrap();

    // The mock ignores `limit`, so the collector has to enforce it.
    assert_eq!(posts.len(), 2);
    assert!(posts.iter().all(|post| post.comments.len() == 4));
}

#[tokio::test]
async fn test_token_is_cached_across_searches() {
    let server = MockServer::start().await;
    mount_token(&server, 1).await;
    mount_search(&server, "cache", Vec::new()).await;

    let collector = RedditCollector::connect(&config_for(&server)).await.unwrap();
    for _ in 0..3 {
        let posts = collector
            .fetch_corpus("cache", CorpusLimits::default())
            .await
            .unwrap();
        assert!(posts.is_empty());
    }
}

#[tokio::test]
async fn test_rejected_credentials() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/v1/access_token"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({ "error": "invalid_client" })))
        .mount(&server)
        .await;

    match RedditCollector::connect(&config_for(&server)).await {
        Err(CoreError::RedditApi(RedditApiError::AuthenticationFailed { .. })) => {}
        Err(other) => panic!("Expected AuthenticationFailed, got {:?}", other),
        Ok(_) => panic!("Expected AuthenticationFailed"),
    }
}

#[tokio::test]
async fn test_rate_limited_search() {
    let server = MockServer::start().await;
    mount_token(&server, 1).await;
    Mock::given(method("GET"))
        .and(path("/r/all/search"))
        .respond_with(ResponseTemplate::new(429).insert_header("retry-after", "30"))
        .mount(&server)
        .await;

    let collector = RedditCollector::connect(&config_for(&server)).await.unwrap();
    let error = collector
        .fetch_corpus("busy", CorpusLimits::default())
        .await
        .unwrap_err();

    assert!(matches!(
        error,
        CoreError::RedditApi(RedditApiError::RateLimitExceeded { retry_after: 30 })
    ));
    assert!(error.user_friendly_message().contains("30 seconds"));
    assert_eq!(collector.api().get_metrics().await.rate_limited_requests, 1);
}

#[tokio::test]
async fn test_comment_failure_fails_whole_fetch() {
    let server = MockServer::start().await;
    mount_token(&server, 1).await;
    mount_search(&server, "outage", vec![post("p1", "title", "", 1)]).await;
    Mock::given(method("GET"))
        .and(path("/comments/p1"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let collector = RedditCollector::connect(&config_for(&server)).await.unwrap();
    let error = collector
        .fetch_corpus("outage", CorpusLimits::default())
        .await
        .unwrap_err();

    assert!(error.is_fetch_error());
    assert!(matches!(
        error,
        CoreError::RedditApi(RedditApiError::ServerError { status_code: 503 })
    ));
}

async fn comments_error(status: u16) -> CoreError {
    let server = MockServer::start().await;
    mount_token(&server, 1).await;
    mount_search(&server, "status", vec![post("p1", "title", "", 1)]).await;
    Mock::given(method("GET"))
        .and(path("/comments/p1"))
        .respond_with(ResponseTemplate::new(status))
        .mount(&server)
        .await;

    let collector = RedditCollector::connect(&config_for(&server)).await.unwrap();
    collector
        .fetch_corpus("status", CorpusLimits::default())
        .await
        .unwrap_err()
}

#[tokio::test]
async fn test_forbidden_comments() {
    let error = comments_error(403).await;

    assert!(error.is_fetch_error());
    match &error {
        CoreError::RedditApi(RedditApiError::Forbidden { resource }) => {
            assert_eq!(resource, "/comments/p1");
        }
        other => panic!("Expected Forbidden, got {:?}", other),
    }
    assert!(error.user_friendly_message().contains("/comments/p1"));
}

#[tokio::test]
async fn test_missing_post_is_invalid_response() {
    let error = comments_error(404).await;

    assert!(error.is_fetch_error());
    match &error {
        CoreError::RedditApi(reddit_error @ RedditApiError::InvalidResponse { details }) => {
            assert!(details.contains("/comments/p1"));
            assert_eq!(reddit_error.error_code(), "REDDIT_INVALID_RESPONSE");
        }
        other => panic!("Expected InvalidResponse, got {:?}", other),
    }
}

#[tokio::test]
async fn test_slow_search_times_out() {
    let server = MockServer::start().await;
    mount_token(&server, 1).await;
    Mock::given(method("GET"))
        .and(path("/r/all/search"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(listing(Vec::new()))
                .set_delay(Duration::from_millis(2500)),
        )
        .mount(&server)
        .await;

    let config = AppConfig {
        http_timeout_secs: 1,
        ..config_for(&server)
    };
    let collector = RedditCollector::connect(&config).await.unwrap();
    let error = collector
        .fetch_corpus("slow", CorpusLimits::default())
        .await
        .unwrap_err();

    assert!(error.is_fetch_error());
    assert!(matches!(
        error,
        CoreError::RedditApi(RedditApiError::RequestTimeout)
    ));
    assert_eq!(collector.api().get_metrics().await.failed_requests, 1);
}

#[tokio::test]
async fn test_slow_token_endpoint_times_out() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/v1/access_token"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({
                    "access_token": "test-token",
                    "token_type": "bearer",
                    "expires_in": 86400
                }))
                .set_delay(Duration::from_millis(2500)),
        )
        .mount(&server)
        .await;

    let config = AppConfig {
        http_timeout_secs: 1,
        ..config_for(&server)
    };
    match RedditCollector::connect(&config).await {
        Err(CoreError::RedditApi(RedditApiError::RequestTimeout)) => {}
        Err(other) => panic!("Expected RequestTimeout, got {:?}", other),
        Ok(_) => panic!("Expected RequestTimeout"),
    }
}

#[tokio::test]
async fn test_revoked_token_is_dropped() {
    let server = MockServer::start().await;
    mount_token(&server, 2).await;
    Mock::given(method("GET"))
        .and(path("/r/all/search"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;

    let collector = RedditCollector::connect(&config_for(&server)).await.unwrap();
    let error = collector
        .fetch_corpus("revoked", CorpusLimits::default())
        .await
        .unwrap_err();
    assert!(matches!(error, CoreError::RedditApi(RedditApiError::InvalidToken)));

    // The next call has to authenticate again.
    collector.check_connection().await.unwrap();
}

#[tokio::test]
async fn test_search_pipeline() {
    let server = MockServer::start().await;
    mount_token(&server, 1).await;
    mount_search(&server, "great stuff", vec![post("p1", "great stuff", "", 9)]).await;
    mount_comments(&server, "p1", Vec::new()).await;

    let collector = RedditCollector::connect(&config_for(&server)).await.unwrap();
    let service = SearchService::new(collector, LexiconAnalyzer::new());
    let outcome = service.handle_search("great stuff").await.unwrap();
    let summary = outcome.summary().unwrap();

    assert_eq!(summary.compound_score, 0.62);
    assert_eq!(summary.overall_sentiment, SentimentLabel::Positive);
    assert_eq!(summary.positive_percent, 100.0);
    assert_eq!(summary.post_count, 1);
    assert_eq!(summary.posts[0].url, "https://example.com/p1");
}

#[tokio::test]
async fn test_search_pipeline_no_results() {
    let server = MockServer::start().await;
    mount_token(&server, 1).await;
    mount_search(&server, "zzzz", Vec::new()).await;

    let collector = RedditCollector::connect(&config_for(&server)).await.unwrap();
    let service = SearchService::new(collector, LexiconAnalyzer::new());
    let outcome = service.handle_search("zzzz").await.unwrap();
    assert!(outcome.is_no_results());
}
