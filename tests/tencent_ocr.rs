use hnu_clockin::models::{Credentials, LocationProfile, ServiceKeys};
use hnu_clockin::{ClockInError, Config, TencentOcrClient, TextRecognizer};
use serde_json::json;
use wiremock::matchers::{body_partial_json, header, header_exists, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client(server: &MockServer) -> TencentOcrClient {
    let config = Config::new(
        Credentials::new("201900001", "pw"),
        LocationProfile::default(),
        ServiceKeys::new("AKIDtest", "secret"),
    )
    .with_ocr_endpoint(server.uri());
    TencentOcrClient::from_config(&config).unwrap()
}

#[tokio::test]
async fn sends_signed_request_and_returns_detections() {
    let server = MockServer::start().await;
    let image_url = "https://fangkong.hnu.edu.cn/imagevcode?token=abc123";

    Mock::given(method("POST"))
        .and(path("/"))
        .and(header("x-tc-action", "GeneralAccurateOCR"))
        .and(header("x-tc-version", "2018-11-19"))
        .and(header("x-tc-region", "ap-beijing"))
        .and(header_exists("x-tc-timestamp"))
        .and(header_exists("authorization"))
        .and(body_partial_json(json!({ "ImageUrl": image_url })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "Response": {
                "TextDetections": [
                    { "DetectedText": "4821", "Confidence": 99 },
                    { "DetectedText": "noise", "Confidence": 10 }
                ],
                "RequestId": "req-1"
            }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let texts = client(&server).recognize(image_url).await.unwrap();

    assert_eq!(texts, vec!["4821".to_string(), "noise".to_string()]);
}

#[tokio::test]
async fn api_error_becomes_ocr_error() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "Response": {
                "Error": { "Code": "FailedOperation.ImageDownloadError", "Message": "下载失败" },
                "RequestId": "req-2"
            }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let err = client(&server)
        .recognize("https://example.invalid/img")
        .await
        .unwrap_err();

    assert!(matches!(err, ClockInError::Ocr(ref msg) if msg.contains("ImageDownloadError")));
}

#[tokio::test]
async fn http_failure_is_reported() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(500))
        .expect(1)
        .mount(&server)
        .await;

    let err = client(&server)
        .recognize("https://example.invalid/img")
        .await
        .unwrap_err();

    assert!(err.is_transport());
}
