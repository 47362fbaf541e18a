use homework_bot::infrastructure::practicum::{HomeworkApi, RealHomeworkApi};
use homework_bot::infrastructure::telegram::{Messenger, TelegramMessenger};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

// ─── Helpers ───

/// 요청 한 건을 받아 고정 응답을 돌려주는 로컬 HTTP 스텁.
/// JoinHandle은 받은 요청 원문(헤더 + 본문)을 반환한다.
async fn serve_once(status_line: &str, body: &str) -> (String, JoinHandle<String>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let response = format!(
        "HTTP/1.1 {status_line}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
        body.len()
    );

    let handle = tokio::spawn(async move {
        let (mut socket, _) = listener.accept().await.unwrap();
        let request = read_request(&mut socket).await;
        socket.write_all(response.as_bytes()).await.unwrap();
        socket.shutdown().await.ok();
        request
    });

    (format!("http://{addr}"), handle)
}

async fn read_request(socket: &mut tokio::net::TcpStream) -> String {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 1024];
    loop {
        let n = socket.read(&mut chunk).await.unwrap();
        if n == 0 {
            break;
        }
        buf.extend_from_slice(&chunk[..n]);
        let text = String::from_utf8_lossy(&buf);
        if let Some(header_end) = text.find("\r\n\r\n") {
            let content_length = text[..header_end]
                .lines()
                .find_map(|l| {
                    let lower = l.to_ascii_lowercase();
                    lower
                        .strip_prefix("content-length:")
                        .map(|v| v.trim().parse::<usize>().unwrap_or(0))
                })
                .unwrap_or(0);
            if buf.len() >= header_end + 4 + content_length {
                break;
            }
        }
    }
    String::from_utf8_lossy(&buf).into_owned()
}

// ═══════════════════════════════════════════════
// 1. RealHomeworkApi
// ═══════════════════════════════════════════════

#[tokio::test]
async fn homework_api_sends_oauth_header_and_from_date() {
    let (base, server) = serve_once("200 OK", r#"{"homeworks": [], "current_date": 5}"#).await;
    let api = RealHomeworkApi::new(&format!("{base}/api/user_api/homework_statuses/"), "tok", 5)
        .unwrap();

    let value = api.homework_statuses(1234).await.unwrap();
    let request = server.await.unwrap();

    assert_eq!(value["current_date"], 5);
    assert!(request.starts_with("GET /api/user_api/homework_statuses/?from_date=1234 "));
    assert!(request
        .to_ascii_lowercase()
        .contains("authorization: oauth tok"));
}

#[tokio::test]
async fn homework_api_zero_timeout_still_completes_requests() {
    let (base, server) = serve_once("200 OK", r#"{"homeworks": []}"#).await;
    let api = RealHomeworkApi::new(&base, "tok", 0).unwrap();

    let value = api.homework_statuses(0).await.unwrap();
    server.await.unwrap();

    assert_eq!(value["homeworks"], serde_json::json!([]));
}

#[tokio::test]
async fn homework_api_non_200_is_error() {
    let (base, server) = serve_once("500 Internal Server Error", "{}").await;
    let api = RealHomeworkApi::new(&base, "tok", 5).unwrap();

    let err = api.homework_statuses(0).await.unwrap_err();
    server.await.unwrap();

    assert!(err.to_string().contains("unexpected status 500"));
}

#[tokio::test]
async fn homework_api_invalid_json_is_error() {
    let (base, server) = serve_once("200 OK", "<html>oops</html>").await;
    let api = RealHomeworkApi::new(&base, "tok", 5).unwrap();

    let err = api.homework_statuses(0).await.unwrap_err();
    server.await.unwrap();

    assert!(err.to_string().contains("failed to decode"));
}

#[tokio::test]
async fn homework_api_unreachable_is_error() {
    // 바인딩 후 바로 닫아 아무도 듣지 않는 포트를 얻는다
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let api = RealHomeworkApi::new(&format!("http://{addr}"), "tok", 2).unwrap();
    let err = api.homework_statuses(0).await.unwrap_err();

    assert!(err.to_string().contains("unreachable"));
}

// ═══════════════════════════════════════════════
// 2. TelegramMessenger
// ═══════════════════════════════════════════════

#[tokio::test]
async fn telegram_posts_chat_id_and_text() {
    let (base, server) = serve_once("200 OK", r#"{"ok": true, "result": {}}"#).await;
    let messenger = TelegramMessenger::new(&base, "123:abc").unwrap();

    messenger.send_message("42", "hello").await.unwrap();
    let request = server.await.unwrap();

    assert!(request.starts_with("POST /bot123:abc/sendMessage "));
    assert!(request.contains(r#""chat_id":"42""#));
    assert!(request.contains(r#""text":"hello""#));
}

#[tokio::test]
async fn telegram_error_includes_description() {
    let (base, server) = serve_once(
        "400 Bad Request",
        r#"{"ok": false, "description": "Bad Request: chat not found"}"#,
    )
    .await;
    let messenger = TelegramMessenger::new(&base, "123:abc").unwrap();

    let err = messenger.send_message("42", "hello").await.unwrap_err();
    server.await.unwrap();

    let msg = err.to_string();
    assert!(msg.contains("chat not found"));
    assert!(!msg.contains("123:abc"));
}

#[tokio::test]
async fn telegram_ok_false_with_200_is_error() {
    let (base, server) = serve_once("200 OK", r#"{"ok": false}"#).await;
    let messenger = TelegramMessenger::new(&base, "t").unwrap();

    assert!(messenger.send_message("42", "hello").await.is_err());
    server.await.unwrap();
}
