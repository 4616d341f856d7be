use chrono::{Duration, TimeZone, Utc};
use mockito::Matcher;
use smart_scheduler::components::google_calendar::{
    CalendarQuery, CalendarWindowFetcher, Credential, DigestOptions, EventQuery, EventWindow,
    FileTokenStore, GoogleCalendarClient, SessionProvider, TokenManager, TokenStore,
};
use smart_scheduler::config::OAuthClient;
use smart_scheduler::error::Error;
use std::sync::Arc;

fn credential() -> Credential {
    Credential {
        access_token: "test_token".to_string(),
        refresh_token: Some("test_refresh".to_string()),
        expires_at: None,
    }
}

fn window() -> EventWindow {
    let start = Utc.with_ymd_and_hms(2024, 5, 6, 0, 0, 0).unwrap();
    EventWindow::new(start, start + Duration::days(7)).unwrap()
}

fn oauth_client() -> OAuthClient {
    OAuthClient {
        client_id: "test_client_id".to_string(),
        client_secret: "test_client_secret".to_string(),
    }
}

const EVENTS_BODY: &str = r#"{
    "kind": "calendar#events",
    "items": [
        {"id": "a", "summary": "Lecture", "start": {"dateTime": "2024-05-06T09:00:00+03:00"}, "end": {"dateTime": "2024-05-06T10:00:00+03:00"}},
        {"id": "b", "start": {"date": "2024-05-08"}, "end": {"date": "2024-05-09"}}
    ]
}"#;

#[tokio::test]
async fn test_lists_events_with_expected_query() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("GET", "/calendars/primary/events")
        .match_header("authorization", "Bearer test_token")
        .match_query(Matcher::AllOf(vec![
            Matcher::UrlEncoded("timeMin".into(), "2024-05-06T00:00:00Z".into()),
            Matcher::UrlEncoded("timeMax".into(), "2024-05-13T00:00:00Z".into()),
            Matcher::UrlEncoded("singleEvents".into(), "true".into()),
            Matcher::UrlEncoded("orderBy".into(), "startTime".into()),
        ]))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(EVENTS_BODY)
        .create_async()
        .await;

    let client = GoogleCalendarClient::new(&server.url());
    let events = client
        .list_events(&credential(), &EventQuery::new("primary", window()))
        .await
        .unwrap();

    mock.assert_async().await;
    assert_eq!(events.len(), 2);
    assert_eq!(events[0].summary.as_deref(), Some("Lecture"));
    assert_eq!(events[1].start.date.as_deref(), Some("2024-05-08"));
}

#[tokio::test]
async fn test_http_error_is_collaborator_unavailable() {
    let mut server = mockito::Server::new_async().await;
    let _mock = server
        .mock("GET", "/calendars/primary/events")
        .match_query(Matcher::Any)
        .with_status(500)
        .with_body(r#"{"error": {"message": "Backend Error"}}"#)
        .create_async()
        .await;

    let client = GoogleCalendarClient::new(&server.url());
    let result = client
        .list_events(&credential(), &EventQuery::new("primary", window()))
        .await;

    match result {
        Err(Error::CollaboratorUnavailable(message)) => {
            assert!(message.contains("500"));
            assert!(message.contains("Backend Error"));
        }
        other => panic!("expected CollaboratorUnavailable, got {:?}", other),
    }
}

#[tokio::test]
async fn test_garbage_body_is_collaborator_unavailable() {
    let mut server = mockito::Server::new_async().await;
    let _mock = server
        .mock("GET", "/calendars/primary/events")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_body("<html>captive portal</html>")
        .create_async()
        .await;

    let client = GoogleCalendarClient::new(&server.url());
    let result = client
        .list_events(&credential(), &EventQuery::new("primary", window()))
        .await;

    assert!(matches!(result, Err(Error::CollaboratorUnavailable(_))));
}

#[tokio::test]
async fn test_no_stored_token_means_no_request() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("GET", Matcher::Any)
        .expect(0)
        .create_async()
        .await;

    let dir = tempfile::tempdir().unwrap();
    let store = Arc::new(FileTokenStore::new(dir.path().join("token.json")));
    let sessions = Arc::new(TokenManager::new(store, Some(oauth_client()), &server.url()));
    let calendar = Arc::new(GoogleCalendarClient::new(&server.url()));
    let fetcher = CalendarWindowFetcher::new(sessions, calendar, "primary");

    let result = fetcher
        .fetch_window(window(), DigestOptions::weekly())
        .await;

    assert!(matches!(result, Err(Error::AuthenticationRequired)));
    mock.assert_async().await;
}

#[tokio::test]
async fn test_corrupt_token_file_requires_authentication() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("GET", Matcher::Any)
        .expect(0)
        .create_async()
        .await;

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("token.json");
    std::fs::write(&path, "not json").unwrap();
    let store = Arc::new(FileTokenStore::new(path));
    let sessions = Arc::new(TokenManager::new(store, Some(oauth_client()), &server.url()));
    let calendar = Arc::new(GoogleCalendarClient::new(&server.url()));
    let fetcher = CalendarWindowFetcher::new(sessions, calendar, "primary");

    let result = fetcher
        .fetch_window(window(), DigestOptions::weekly())
        .await;

    assert!(matches!(result, Err(Error::AuthenticationRequired)));
    mock.assert_async().await;
}

#[tokio::test]
async fn test_fresh_token_is_used_without_refresh() {
    let mut server = mockito::Server::new_async().await;
    let refresh = server
        .mock("POST", "/token")
        .expect(0)
        .create_async()
        .await;

    let dir = tempfile::tempdir().unwrap();
    let store = Arc::new(FileTokenStore::new(dir.path().join("token.json")));
    let fresh = Credential {
        expires_at: Some(Utc::now().timestamp() + 600),
        ..credential()
    };
    store.save(&fresh).await.unwrap();

    let manager = TokenManager::new(
        store,
        Some(oauth_client()),
        &format!("{}/token", server.url()),
    );
    assert_eq!(manager.current_session().await.unwrap(), Some(fresh));
    refresh.assert_async().await;
}

#[tokio::test]
async fn test_expired_token_is_refreshed_and_saved() {
    let mut server = mockito::Server::new_async().await;
    let refresh = server
        .mock("POST", "/token")
        .match_body(Matcher::AllOf(vec![
            Matcher::UrlEncoded("grant_type".into(), "refresh_token".into()),
            Matcher::UrlEncoded("refresh_token".into(), "test_refresh".into()),
            Matcher::UrlEncoded("client_id".into(), "test_client_id".into()),
        ]))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"access_token": "refreshed_token", "expires_in": 3599, "token_type": "Bearer"}"#)
        .create_async()
        .await;

    let dir = tempfile::tempdir().unwrap();
    let store = Arc::new(FileTokenStore::new(dir.path().join("token.json")));
    let expired = Credential {
        access_token: "old_token".to_string(),
        refresh_token: Some("test_refresh".to_string()),
        expires_at: Some(Utc::now().timestamp() - 60),
    };
    store.save(&expired).await.unwrap();

    let manager = TokenManager::new(
        store.clone(),
        Some(oauth_client()),
        &format!("{}/token", server.url()),
    );
    let session = manager.current_session().await.unwrap().unwrap();

    refresh.assert_async().await;
    assert_eq!(session.access_token, "refreshed_token");
    assert_eq!(session.refresh_token.as_deref(), Some("test_refresh"));
    assert!(session.valid());
    assert_eq!(store.load().await.unwrap(), Some(session));
}

#[tokio::test]
async fn test_failed_refresh_leaves_session_invalid() {
    let mut server = mockito::Server::new_async().await;
    let _refresh = server
        .mock("POST", "/token")
        .with_status(400)
        .with_body(r#"{"error": "invalid_grant"}"#)
        .create_async()
        .await;

    let dir = tempfile::tempdir().unwrap();
    let store = Arc::new(FileTokenStore::new(dir.path().join("token.json")));
    let expired = Credential {
        access_token: "old_token".to_string(),
        refresh_token: Some("revoked".to_string()),
        expires_at: Some(Utc::now().timestamp() - 60),
    };
    store.save(&expired).await.unwrap();

    let manager = TokenManager::new(
        store,
        Some(oauth_client()),
        &format!("{}/token", server.url()),
    );
    let session = manager.current_session().await.unwrap().unwrap();

    assert_eq!(session, expired);
    assert!(!session.valid());
}
