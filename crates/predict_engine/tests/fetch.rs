use std::time::Duration;

use predict_engine::{FailureKind, FetchSettings, ReqwestFetcher, ResultFetcher, ResultSlot};
use pretty_assertions::assert_eq;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[tokio::test]
async fn each_slot_fetches_its_own_endpoint() {
    let server = MockServer::start().await;
    for (endpoint, body) in [
        ("/currentimage", "primary-bytes"),
        ("/outsemseg", "semseg-bytes"),
        ("/outdepth", "depth-bytes"),
    ] {
        Mock::given(method("GET"))
            .and(path(endpoint))
            .respond_with(ResponseTemplate::new(200).set_body_raw(body, "image/png"))
            .expect(1)
            .mount(&server)
            .await;
    }

    let fetcher = ReqwestFetcher::new(server.uri(), FetchSettings::default());

    for (slot, body) in [
        (ResultSlot::Primary, "primary-bytes"),
        (ResultSlot::Segmentation, "semseg-bytes"),
        (ResultSlot::Depth, "depth-bytes"),
    ] {
        let image = fetcher.fetch(1, slot).await.expect("fetch ok");
        assert_eq!(image.bytes, body.as_bytes());
        assert_eq!(image.metadata.endpoint, slot.endpoint_path());
        assert_eq!(image.metadata.redirect_count, 0);
        assert_eq!(image.metadata.byte_len, body.len() as u64);
        assert_eq!(image.metadata.content_type.as_deref(), Some("image/png"));
    }
}

#[tokio::test]
async fn fetch_uses_plain_endpoint_path_without_query() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/outdepth"))
        .respond_with(ResponseTemplate::new(200).set_body_raw("depth", "image/png"))
        .mount(&server)
        .await;

    let fetcher = ReqwestFetcher::new(server.uri(), FetchSettings::default());
    let image = fetcher.fetch(2, ResultSlot::Depth).await.expect("fetch ok");

    assert_eq!(
        image.metadata.final_url,
        format!("{}/outdepth", server.uri())
    );
}

#[tokio::test]
async fn fetch_fails_on_http_status() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/currentimage"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let fetcher = ReqwestFetcher::new(server.uri(), FetchSettings::default());
    let err = fetcher.fetch(3, ResultSlot::Primary).await.unwrap_err();
    assert_eq!(err.kind, FailureKind::HttpStatus(404));
}

#[tokio::test]
async fn fetch_times_out_on_slow_response() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/outsemseg"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_delay(Duration::from_millis(250))
                .set_body_string("slow"),
        )
        .mount(&server)
        .await;

    let settings = FetchSettings {
        request_timeout: Duration::from_millis(50),
        ..FetchSettings::default()
    };
    let fetcher = ReqwestFetcher::new(server.uri(), settings);

    let err = fetcher.fetch(4, ResultSlot::Segmentation).await.unwrap_err();
    assert_eq!(err.kind, FailureKind::Timeout);
}

#[tokio::test]
async fn fetch_rejects_too_large_response() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/outdepth"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("Content-Type", "image/png")
                .insert_header("Content-Length", "11")
                .set_body_string("01234567890"),
        )
        .mount(&server)
        .await;

    let settings = FetchSettings {
        max_bytes: 10,
        ..FetchSettings::default()
    };
    let fetcher = ReqwestFetcher::new(server.uri(), settings);

    let err = fetcher.fetch(5, ResultSlot::Depth).await.unwrap_err();
    assert_eq!(
        err.kind,
        FailureKind::TooLarge {
            max_bytes: 10,
            actual: Some(11)
        }
    );
}
