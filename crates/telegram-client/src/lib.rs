//! Telegram Bot API client.

mod client;
mod error;
mod receiver;
mod types;

pub use client::{TelegramClient, DEFAULT_API_URL};
pub use error::TelegramError;
pub use receiver::UpdateReceiver;
pub use types::*;

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const TOKEN: &str = "123456:TEST";

    fn create_test_client(mock_server: &MockServer) -> TelegramClient {
        TelegramClient::new(mock_server.uri(), TOKEN).unwrap()
    }

    fn ok_body(result: serde_json::Value) -> serde_json::Value {
        serde_json::json!({ "ok": true, "result": result })
    }

    #[tokio::test]
    async fn test_get_me() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path(format!("/bot{}/getMe", TOKEN)))
            .respond_with(ResponseTemplate::new(200).set_body_json(ok_body(
                serde_json::json!({
                    "id": 42,
                    "first_name": "Sound Bot",
                    "username": "soundbot"
                }),
            )))
            .mount(&mock_server)
            .await;

        let client = create_test_client(&mock_server);
        let me = client.get_me().await.unwrap();

        assert_eq!(me.id, 42);
        assert_eq!(me.username.as_deref(), Some("soundbot"));
    }

    #[tokio::test]
    async fn test_send_message() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path(format!("/bot{}/sendMessage", TOKEN)))
            .respond_with(ResponseTemplate::new(200).set_body_json(ok_body(
                serde_json::json!({
                    "message_id": 77,
                    "chat": { "id": 100 },
                    "text": "hello"
                }),
            )))
            .mount(&mock_server)
            .await;

        let client = create_test_client(&mock_server);
        let sent = client.send_message(100, "hello", None).await.unwrap();

        assert_eq!(sent.message_id, 77);
        assert_eq!(sent.chat.id, 100);
    }

    #[tokio::test]
    async fn test_send_message_api_error() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path(format!("/bot{}/sendMessage", TOKEN)))
            .respond_with(ResponseTemplate::new(400).set_body_json(serde_json::json!({
                "ok": false,
                "error_code": 400,
                "description": "Bad Request: chat not found"
            })))
            .mount(&mock_server)
            .await;

        let client = create_test_client(&mock_server);
        let result = client.send_message(100, "hello", None).await;

        match result {
            Err(TelegramError::Api { code, description }) => {
                assert_eq!(code, Some(400));
                assert!(description.contains("chat not found"));
            }
            other => panic!("expected Api error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_delete_message_permission_denied() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path(format!("/bot{}/deleteMessage", TOKEN)))
            .respond_with(ResponseTemplate::new(400).set_body_json(serde_json::json!({
                "ok": false,
                "error_code": 400,
                "description": "Bad Request: message can't be deleted"
            })))
            .mount(&mock_server)
            .await;

        let client = create_test_client(&mock_server);
        let err = client.delete_message(100, 77).await.unwrap_err();

        assert!(err.is_permission_denied());
    }

    #[tokio::test]
    async fn test_delete_message_other_error_not_permission() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path(format!("/bot{}/deleteMessage", TOKEN)))
            .respond_with(ResponseTemplate::new(400).set_body_json(serde_json::json!({
                "ok": false,
                "error_code": 400,
                "description": "Bad Request: message to delete not found"
            })))
            .mount(&mock_server)
            .await;

        let client = create_test_client(&mock_server);
        let err = client.delete_message(100, 77).await.unwrap_err();

        assert!(!err.is_permission_denied());
    }

    #[tokio::test]
    async fn test_send_voice_with_reply_link() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path(format!("/bot{}/sendVoice", TOKEN)))
            .respond_with(ResponseTemplate::new(200).set_body_json(ok_body(
                serde_json::json!({
                    "message_id": 78,
                    "chat": { "id": 100 }
                }),
            )))
            .expect(1)
            .mount(&mock_server)
            .await;

        let client = create_test_client(&mock_server);
        let sent = client
            .send_voice(100, "boom.mp3", vec![1, 2, 3], Some(55))
            .await
            .unwrap();

        assert_eq!(sent.message_id, 78);
    }

    #[tokio::test]
    async fn test_get_updates() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path(format!("/bot{}/getUpdates", TOKEN)))
            .respond_with(ResponseTemplate::new(200).set_body_json(ok_body(
                serde_json::json!([
                    {
                        "update_id": 1000,
                        "message": {
                            "message_id": 5,
                            "from": { "id": 9, "first_name": "Tester" },
                            "chat": { "id": 100 },
                            "text": "/boom"
                        }
                    }
                ]),
            )))
            .mount(&mock_server)
            .await;

        let client = create_test_client(&mock_server);
        let updates = client
            .get_updates(None, std::time::Duration::from_secs(1))
            .await
            .unwrap();

        assert_eq!(updates.len(), 1);
        assert_eq!(updates[0].update_id, 1000);
        let message = updates[0].message.as_ref().unwrap();
        assert_eq!(message.text.as_deref(), Some("/boom"));
        assert_eq!(message.sender_id(), Some(9));
    }

    #[test]
    fn test_reply_target_id() {
        let raw = serde_json::json!({
            "message_id": 6,
            "chat": { "id": 100 },
            "text": "/boom",
            "reply_to_message": {
                "message_id": 3,
                "chat": { "id": 100 },
                "text": "original"
            }
        });

        let message: Message = serde_json::from_value(raw).unwrap();
        assert_eq!(message.reply_target_id(), Some(3));
    }
}
