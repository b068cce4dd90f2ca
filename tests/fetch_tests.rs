//! Integration tests for fetching, probing and audio URL discovery
//!
//! These tests use wiremock to stand in for the broadcast site.

use chrono::NaiveDate;
use meer_weer::config::{HttpConfig, SiteConfig};
use meer_weer::crawler::{
    build_http_client, build_probe_client, discover_audio_url, fetch_page, probe_url,
};
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Site addresses pointing at the mock server
fn site_for(base_url: &str) -> SiteConfig {
    SiteConfig {
        base_url: base_url.to_string(),
        page_url: format!("{}/home.php", base_url),
        special_page_url: format!("{}/specials.php", base_url),
        image_url: format!("{}/images/emoji.png", base_url),
        dynamic_audio_path: "/alert/Alert.mp3?cachekill=".to_string(),
    }
}

fn test_time() -> chrono::NaiveDateTime {
    NaiveDate::from_ymd_opt(2024, 5, 3)
        .unwrap()
        .and_hms_milli_opt(14, 5, 9, 42)
        .unwrap()
}

const PAGE_WITH_FALLBACK: &str =
    r#"<html><script>var fallback = "/alert/backup.mp3";</script></html>"#;

#[tokio::test]
async fn test_fetch_page_success() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/home.php"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>weer</html>"))
        .mount(&mock_server)
        .await;

    let client = build_http_client(&HttpConfig::default()).unwrap();
    let body = fetch_page(&client, &format!("{}/home.php", mock_server.uri())).await;

    assert_eq!(body.as_deref(), Some("<html>weer</html>"));
}

#[tokio::test]
async fn test_fetch_page_error_status_is_absent() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/home.php"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&mock_server)
        .await;

    let client = build_http_client(&HttpConfig::default()).unwrap();
    let body = fetch_page(&client, &format!("{}/home.php", mock_server.uri())).await;

    assert!(body.is_none());
}

#[tokio::test]
async fn test_fetch_page_unreachable_is_absent() {
    let client = build_http_client(&HttpConfig {
        timeout_secs: 2,
        ..HttpConfig::default()
    })
    .unwrap();

    // Port 9 (discard) is not listening on the test host
    let body = fetch_page(&client, "http://127.0.0.1:9/home.php").await;
    assert!(body.is_none());
    assert!(!probe_url(&client, "http://127.0.0.1:9/a.mp3").await);
}

#[tokio::test]
async fn test_requests_carry_configured_headers() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/home.php"))
        .and(header("user-agent", "TestAgent/1.0"))
        .and(header("accept", "text/html"))
        .respond_with(ResponseTemplate::new(200).set_body_string("ok"))
        .expect(1)
        .mount(&mock_server)
        .await;

    let config = HttpConfig {
        user_agent: "TestAgent/1.0".to_string(),
        accept: "text/html".to_string(),
        timeout_secs: 5,
    };
    let client = build_http_client(&config).unwrap();
    let body = fetch_page(&client, &format!("{}/home.php", mock_server.uri())).await;

    assert_eq!(body.as_deref(), Some("ok"));
}

#[tokio::test]
async fn test_head_check_requires_ok_status() {
    let mock_server = MockServer::start().await;

    Mock::given(method("HEAD"))
        .and(path("/ok.mp3"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&mock_server)
        .await;
    Mock::given(method("HEAD"))
        .and(path("/empty.mp3"))
        .respond_with(ResponseTemplate::new(204))
        .mount(&mock_server)
        .await;

    let client = build_probe_client(&HttpConfig::default()).unwrap();

    assert!(probe_url(&client, &format!("{}/ok.mp3", mock_server.uri())).await);
    assert!(!probe_url(&client, &format!("{}/empty.mp3", mock_server.uri())).await);
    assert!(!probe_url(&client, &format!("{}/missing.mp3", mock_server.uri())).await);
}

#[tokio::test]
async fn test_discovery_prefers_cache_busted_url() {
    let mock_server = MockServer::start().await;
    let site = site_for(&mock_server.uri());

    Mock::given(method("HEAD"))
        .and(path("/alert/Alert.mp3"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&mock_server)
        .await;
    Mock::given(method("HEAD"))
        .and(path("/alert/backup.mp3"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&mock_server)
        .await;

    let client = build_probe_client(&HttpConfig::default()).unwrap();
    let url = discover_audio_url(&client, &site, PAGE_WITH_FALLBACK, &test_time()).await;

    assert_eq!(
        url,
        Some(format!(
            "{}/alert/Alert.mp3?cachekill=3145942",
            mock_server.uri()
        ))
    );
}

#[tokio::test]
async fn test_discovery_falls_back_when_cache_busted_url_fails() {
    let mock_server = MockServer::start().await;
    let site = site_for(&mock_server.uri());

    Mock::given(method("HEAD"))
        .and(path("/alert/Alert.mp3"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&mock_server)
        .await;
    Mock::given(method("HEAD"))
        .and(path("/alert/backup.mp3"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = build_probe_client(&HttpConfig::default()).unwrap();
    let url = discover_audio_url(&client, &site, PAGE_WITH_FALLBACK, &test_time()).await;

    assert_eq!(url, Some(format!("{}/alert/backup.mp3", mock_server.uri())));
}

#[tokio::test]
async fn test_discovery_finds_nothing_when_both_fail() {
    let mock_server = MockServer::start().await;
    let site = site_for(&mock_server.uri());

    Mock::given(method("HEAD"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&mock_server)
        .await;

    let client = build_probe_client(&HttpConfig::default()).unwrap();
    let url = discover_audio_url(&client, &site, PAGE_WITH_FALLBACK, &test_time()).await;

    assert_eq!(url, None);
}

#[tokio::test]
async fn test_discovery_without_fallback_in_page() {
    let mock_server = MockServer::start().await;
    let site = site_for(&mock_server.uri());

    Mock::given(method("HEAD"))
        .and(path("/alert/Alert.mp3"))
        .respond_with(ResponseTemplate::new(404))
        .expect(1)
        .mount(&mock_server)
        .await;
    Mock::given(method("HEAD"))
        .and(path("/alert/backup.mp3"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&mock_server)
        .await;

    let client = build_probe_client(&HttpConfig::default()).unwrap();
    let url = discover_audio_url(&client, &site, "<html>geen script</html>", &test_time()).await;

    assert_eq!(url, None);
}

#[tokio::test]
async fn test_head_check_does_not_follow_redirects() {
    let mock_server = MockServer::start().await;

    Mock::given(method("HEAD"))
        .and(path("/moved.mp3"))
        .respond_with(ResponseTemplate::new(302).insert_header("location", "/elsewhere.mp3"))
        .mount(&mock_server)
        .await;
    Mock::given(method("HEAD"))
        .and(path("/elsewhere.mp3"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&mock_server)
        .await;

    let client = build_probe_client(&HttpConfig::default()).unwrap();

    assert!(!probe_url(&client, &format!("{}/moved.mp3", mock_server.uri())).await);
}

#[tokio::test]
async fn test_discovery_rejects_redirected_candidate() {
    let mock_server = MockServer::start().await;
    let site = site_for(&mock_server.uri());

    Mock::given(method("HEAD"))
        .and(path("/alert/Alert.mp3"))
        .respond_with(ResponseTemplate::new(302).insert_header("location", "/elsewhere.mp3"))
        .mount(&mock_server)
        .await;
    Mock::given(method("HEAD"))
        .and(path("/elsewhere.mp3"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&mock_server)
        .await;

    let client = build_probe_client(&HttpConfig::default()).unwrap();
    let url = discover_audio_url(&client, &site, "<html></html>", &test_time()).await;

    assert_eq!(url, None);
}
