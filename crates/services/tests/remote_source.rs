use std::sync::Arc;

use quiz_services::{HttpSheetFetcher, RemoteSheetSource, SourceError};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const SHEET_URL: &str = "https://docs.google.com/spreadsheets/d/1vocabSheet_42/edit#gid=0";

fn source(server: &MockServer) -> RemoteSheetSource {
    RemoteSheetSource::new(Arc::new(HttpSheetFetcher::new(server.uri())))
}

#[tokio::test]
async fn published_sheet_is_fetched_as_csv() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/spreadsheets/d/1vocabSheet_42/gviz/tq"))
        .and(query_param("tqx", "out:csv"))
        .respond_with(ResponseTemplate::new(200).set_body_string(
            "\"German\",\"Spanish\",\"Audio\",\"Notes\",\"Failed\"\n\
             \"Hallo\",\"Hola\",\"https://cdn.example/a.mp3\",\"\",\"\"\n\
             \"\",\"Vacío\",\"\",\"\",\"\"\n\
             \"Guten Morgen\",\"Buenos días\",\"https://cdn.example/g.mp3\",\"greeting\",\"2\"\n",
        ))
        .expect(1)
        .mount(&server)
        .await;

    let words = source(&server).load_from_remote(SHEET_URL).await.unwrap();

    assert_eq!(words.len(), 2);
    assert_eq!(words[0].source(), "Hallo");
    assert_eq!(words[0].fail_count(), 0);
    assert_eq!(words[1].target(), "Buenos días");
    assert_eq!(words[1].note(), "greeting");
    assert_eq!(words[1].fail_count(), 2);
}

#[tokio::test]
async fn unpublished_sheet_is_unavailable() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(404))
        .expect(1)
        .mount(&server)
        .await;

    let err = source(&server).load_from_remote(SHEET_URL).await.unwrap_err();

    match err {
        SourceError::SourceUnavailable { status } => assert_eq!(status.as_u16(), 404),
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn sheet_with_only_a_header_is_empty() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_string("\"German\",\"Spanish\"\n"))
        .mount(&server)
        .await;

    let err = source(&server).load_from_remote(SHEET_URL).await.unwrap_err();
    assert!(matches!(err, SourceError::EmptySource));
}

#[tokio::test]
async fn blank_url_is_rejected_without_a_request() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let err = source(&server).load_from_remote("   ").await.unwrap_err();
    assert!(matches!(err, SourceError::InvalidSourceReference));
}
