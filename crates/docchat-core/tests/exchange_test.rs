use docchat_core::{ApiError, DocChatClient, DocumentRef, Session, SessionGate, UploadFile};
use mockito::Matcher;

fn report_pdf() -> UploadFile {
    UploadFile::new("report.pdf", b"%PDF-1.4 quarterly report".to_vec()).unwrap()
}

#[tokio::test]
async fn upload_sends_multipart_file_and_returns_filename() {
    let mut server = mockito::Server::new_async().await;

    let mock = server
        .mock("POST", "/api/upload")
        .match_header("content-type", Matcher::Regex("^multipart/form-data".to_string()))
        .match_body(Matcher::AllOf(vec![
            Matcher::Regex(r#"name="file"; filename="report.pdf""#.to_string()),
            Matcher::Regex("application/pdf".to_string()),
        ]))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            r#"{"message":"File uploaded and processed successfully.","filename":"report.pdf"}"#,
        )
        .create_async()
        .await;

    let client = DocChatClient::new(&server.url());
    let doc = client.upload(&report_pdf()).await.unwrap();

    mock.assert_async().await;
    assert_eq!(doc, DocumentRef::new("report.pdf"));
}

#[tokio::test]
async fn upload_rejection_surfaces_detail() {
    let mut server = mockito::Server::new_async().await;

    let _mock = server
        .mock("POST", "/api/upload")
        .with_status(400)
        .with_header("content-type", "application/json")
        .with_body(r#"{"detail":"Invalid file type. Only PDFs are allowed."}"#)
        .create_async()
        .await;

    let client = DocChatClient::new(&server.url());
    let err = client.upload(&report_pdf()).await.unwrap_err();

    assert_eq!(
        err,
        ApiError::Rejected {
            status: 400,
            message: "Invalid file type. Only PDFs are allowed.".to_string(),
        }
    );
}

#[tokio::test]
async fn upload_rejection_without_detail_uses_fallback() {
    let mut server = mockito::Server::new_async().await;

    let _mock = server
        .mock("POST", "/api/upload")
        .with_status(502)
        .with_body("Bad Gateway")
        .create_async()
        .await;

    let client = DocChatClient::new(&server.url());
    let err = client.upload(&report_pdf()).await.unwrap_err();

    assert_eq!(err.to_string(), "Upload failed");
    assert_eq!(err.status(), Some(502));
}

#[tokio::test]
async fn upload_success_without_filename_is_malformed() {
    let mut server = mockito::Server::new_async().await;

    let _mock = server
        .mock("POST", "/api/upload")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"message":"File uploaded and processed successfully."}"#)
        .create_async()
        .await;

    let client = DocChatClient::new(&server.url());
    let err = client.upload(&report_pdf()).await.unwrap_err();

    assert_eq!(err, ApiError::MalformedResponse { field: "filename" });
}

#[tokio::test]
async fn chat_posts_question_and_returns_answer() {
    let mut server = mockito::Server::new_async().await;

    let mock = server
        .mock("POST", "/api/chat")
        .match_header("content-type", "application/json")
        .match_body(Matcher::Json(serde_json::json!({
            "question": "What is the total revenue?"
        })))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"answer":"$4.2M"}"#)
        .create_async()
        .await;

    let client = DocChatClient::new(&server.url());
    let answer = client.ask("What is the total revenue?").await.unwrap();

    mock.assert_async().await;
    assert_eq!(answer, "$4.2M");
}

#[tokio::test]
async fn chat_rejection_without_detail_uses_fallback() {
    let mut server = mockito::Server::new_async().await;

    let _mock = server
        .mock("POST", "/api/chat")
        .with_status(500)
        .with_body("{}")
        .create_async()
        .await;

    let client = DocChatClient::new(&server.url());
    let err = client.ask("hello").await.unwrap_err();

    assert_eq!(err.to_string(), "Chat request failed");
}

#[tokio::test]
async fn chat_success_without_answer_is_malformed() {
    let mut server = mockito::Server::new_async().await;

    let _mock = server
        .mock("POST", "/api/chat")
        .with_status(200)
        .with_body("not json at all")
        .create_async()
        .await;

    let client = DocChatClient::new(&server.url());
    let err = client.ask("hello").await.unwrap_err();

    assert_eq!(err, ApiError::MalformedResponse { field: "answer" });
}

#[tokio::test]
async fn unreachable_backend_is_a_transport_error() {
    // Nothing listens on port 1
    let client = DocChatClient::new("http://127.0.0.1:1");
    let err = client.ask("hello").await.unwrap_err();

    assert!(matches!(err, ApiError::Transport(_)));
    assert!(!err.to_string().is_empty());
}

#[tokio::test]
async fn reset_and_health_return_message() {
    let mut server = mockito::Server::new_async().await;

    let reset = server
        .mock("POST", "/api/reset")
        .with_status(200)
        .with_body(r#"{"message":"Vector store has been successfully reset."}"#)
        .create_async()
        .await;
    let health = server
        .mock("GET", "/")
        .with_status(200)
        .with_body(r#"{"message":"API is running. Go to /docs for interactive documentation."}"#)
        .create_async()
        .await;

    let client = DocChatClient::new(&server.url());

    assert_eq!(
        client.reset().await.unwrap(),
        "Vector store has been successfully reset."
    );
    assert_eq!(
        client.health().await.unwrap(),
        "API is running. Go to /docs for interactive documentation."
    );
    reset.assert_async().await;
    health.assert_async().await;
}

#[tokio::test]
async fn session_over_http_upload_then_chat() {
    let mut server = mockito::Server::new_async().await;

    let _upload = server
        .mock("POST", "/api/upload")
        .with_status(200)
        .with_body(r#"{"filename":"report.pdf"}"#)
        .create_async()
        .await;
    let _chat = server
        .mock("POST", "/api/chat")
        .with_status(200)
        .with_body(r#"{"answer":"$4.2M"}"#)
        .create_async()
        .await;

    let client = DocChatClient::new(&server.url());
    let mut session = Session::new();

    session.upload(&client, &report_pdf()).await.unwrap();
    assert_eq!(
        session.gate(),
        &SessionGate::DocumentReady(DocumentRef::new("report.pdf"))
    );
    assert_eq!(
        session.messages()[0].content,
        "Ready! Ask me any questions about report.pdf."
    );

    session
        .ask(&client, "What is the total revenue?")
        .await
        .unwrap();
    let contents: Vec<&str> = session.messages().iter().map(|m| m.content.as_str()).collect();
    assert_eq!(
        contents,
        vec![
            "Ready! Ask me any questions about report.pdf.",
            "What is the total revenue?",
            "$4.2M",
        ]
    );
}

#[tokio::test]
async fn blank_question_never_reaches_backend() {
    let mut server = mockito::Server::new_async().await;

    let _upload = server
        .mock("POST", "/api/upload")
        .with_status(200)
        .with_body(r#"{"filename":"report.pdf"}"#)
        .create_async()
        .await;
    let chat = server
        .mock("POST", "/api/chat")
        .expect(0)
        .create_async()
        .await;

    let client = DocChatClient::new(&server.url());
    let mut session = Session::new();
    session.upload(&client, &report_pdf()).await.unwrap();

    assert!(session.ask(&client, "   ").await.is_err());

    chat.assert_async().await;
    assert_eq!(session.messages().len(), 1);
}

#[tokio::test]
async fn failed_upload_over_http_keeps_upload_mode() {
    let mut server = mockito::Server::new_async().await;

    let _upload = server
        .mock("POST", "/api/upload")
        .with_status(500)
        .with_body(r#"{"detail":"File saved, but error during processing: boom"}"#)
        .create_async()
        .await;

    let client = DocChatClient::new(&server.url());
    let mut session = Session::new();
    session.upload(&client, &report_pdf()).await.unwrap();

    assert_eq!(session.gate(), &SessionGate::NoDocument);
    assert_eq!(
        session.upload_error(),
        Some("File saved, but error during processing: boom")
    );
}
