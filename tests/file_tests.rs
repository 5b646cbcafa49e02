use std::io::Write;
use std::time::Duration;

use httpmock::Method::POST;
use httpmock::MockServer;
use hypersender::message::{ContactMessage, FileMessage, LocationMessage, Message, PollMessage};
use hypersender::{ClientConfig, Payload, SendError, WhatsappClient};
use serde_json::json;

fn client_for(server: &MockServer) -> WhatsappClient {
    WhatsappClient::new(
        ClientConfig::new("inst-1")
            .with_api_base_uri(server.base_url())
            .with_token("test-token")
            .with_chunk_delay(Duration::ZERO),
    )
}

#[tokio::test]
async fn remote_file_is_sent_as_json_url() {
    let server = MockServer::start();
    let sent = server.mock(|when, then| {
        when.method(POST)
            .path("/inst-1/sendFileImage")
            .header("authorization", "Bearer test-token")
            .json_body(json!({
                "chatId": "201234567890@c.us",
                "caption": "Look at this",
                "url": "https://cdn.example.com/cat.png"
            }));
        then.status(200).body(r#"{"id":"img-1"}"#);
    });

    let outcome = FileMessage::image()
        .file("https://cdn.example.com/cat.png")
        .caption("Look at this")
        .to("201234567890")
        .send(&client_for(&server))
        .await
        .expect("send succeeds");

    sent.assert_calls(1);
    assert!(outcome.into_response().is_some());
}

#[tokio::test]
async fn local_file_is_uploaded_as_multipart() {
    let mut file = tempfile::Builder::new()
        .suffix(".txt")
        .tempfile()
        .expect("temp file");
    write!(file, "quarterly numbers").expect("write temp file");

    let server = MockServer::start();
    let uploaded = server.mock(|when, then| {
        when.method(POST)
            .path("/inst-1/sendFileDocument")
            .body_includes("name=\"chatId\"")
            .body_includes("201234567890@c.us")
            .body_includes("name=\"file\"; filename=\"report.txt\"")
            .body_includes("text/plain")
            .body_includes("quarterly numbers");
        then.status(200).body(r#"{"id":"doc-1"}"#);
    });

    FileMessage::document()
        .file(file.path().to_string_lossy())
        .file_name("report.txt")
        .to("201234567890")
        .send(&client_for(&server))
        .await
        .expect("send succeeds");

    uploaded.assert_calls(1);
}

#[tokio::test]
async fn in_memory_bytes_are_uploaded_with_their_name() {
    let server = MockServer::start();
    let uploaded = server.mock(|when, then| {
        when.method(POST)
            .path("/inst-1/sendFileAudio")
            .body_includes("filename=\"note.mp3\"")
            .body_includes("audio/mpeg");
        then.status(200).body("{}");
    });

    FileMessage::audio()
        .file_bytes(vec![0x49, 0x44, 0x33], "note.mp3")
        .to("201234567890")
        .send(&client_for(&server))
        .await
        .expect("send succeeds");

    uploaded.assert_calls(1);
}

#[tokio::test]
async fn unreadable_local_file_fails_before_any_request() {
    let dir = tempfile::tempdir().expect("temp dir");
    let missing = dir.path().join("does-not-exist.pdf");

    let server = MockServer::start();
    let any = server.mock(|when, then| {
        when.method(POST);
        then.status(200).body("{}");
    });

    let err = FileMessage::document()
        .file_path(missing.clone())
        .to("201234567890")
        .send(&client_for(&server))
        .await
        .unwrap_err();

    assert!(matches!(err, SendError::FileAccessFailed(_)));
    assert!(err.to_string().starts_with("Failed to open file"));
    any.assert_calls(0);
}

#[tokio::test]
async fn unsupported_scheme_is_an_invalid_identifier() {
    let server = MockServer::start();
    let any = server.mock(|when, then| {
        when.method(POST);
        then.status(200).body("{}");
    });

    let err = FileMessage::video()
        .file("ftp://files.example.com/clip.mp4")
        .to("201234567890")
        .send(&client_for(&server))
        .await
        .unwrap_err();

    assert!(matches!(err, SendError::InvalidFileIdentifier(_)));
    any.assert_calls(0);
}

#[tokio::test]
async fn poll_contact_and_location_hit_their_actions() {
    let server = MockServer::start();
    let poll = server.mock(|when, then| {
        when.method(POST).path("/inst-1/sendPoll").json_body(json!({
            "name": "Lunch?",
            "options": ["Pizza", "Salad"],
            "multipleAnswers": true,
            "chatId": "201234567890@c.us"
        }));
        then.status(200).body("{}");
    });
    let contact = server.mock(|when, then| {
        when.method(POST)
            .path("/inst-1/sendContact")
            .json_body_includes(
                json!({"contact": {"phoneNumber": "15550001111", "name": "Support"}}).to_string(),
            );
        then.status(200).body("{}");
    });
    let location = server.mock(|when, then| {
        when.method(POST)
            .path("/inst-1/sendLocation")
            .json_body_includes(
                json!({"latitude": 30.0444, "longitude": 31.2357, "name": "Cairo"}).to_string(),
            );
        then.status(200).body("{}");
    });

    let client = client_for(&server);
    PollMessage::new("Lunch?")
        .choices(["Pizza", "Salad"])
        .multiple_answers(true)
        .to("201234567890")
        .send(&client)
        .await
        .expect("poll sent");
    ContactMessage::new("15550001111", "Support")
        .to("201234567890")
        .send(&client)
        .await
        .expect("contact sent");
    LocationMessage::new(30.0444, 31.2357)
        .name("Cairo")
        .to("201234567890")
        .send(&client)
        .await
        .expect("location sent");

    poll.assert_calls(1);
    contact.assert_calls(1);
    location.assert_calls(1);
}

#[tokio::test]
async fn get_updates_decodes_the_body() {
    let server = MockServer::start();
    let updates = server.mock(|when, then| {
        when.method(POST)
            .path("/inst-1/getUpdates")
            .json_body(json!({"limit": 5}));
        then.status(200)
            .header("content-type", "application/json")
            .body(r#"{"updates":[{"id":1}]}"#);
    });

    let mut params = Payload::new();
    params.insert("limit".to_string(), json!(5));
    let body = client_for(&server)
        .get_updates(&params, None)
        .await
        .expect("updates fetched");

    updates.assert_calls(1);
    assert_eq!(body["updates"][0]["id"], 1);
}

#[tokio::test]
async fn non_json_success_body_is_an_invalid_response() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(POST).path("/inst-1/getUpdates");
        then.status(200).body("<html>maintenance</html>");
    });

    let err = client_for(&server)
        .get_updates(&Payload::new(), None)
        .await
        .unwrap_err();

    assert!(matches!(err, SendError::InvalidResponse(_)));
}
