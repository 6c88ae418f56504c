/// WebSocket Message Protocol
///
/// Module này định nghĩa các message types được trao đổi giữa client và server
/// thông qua WebSocket connection.
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Messages được gửi từ client đến server
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum ClientMessage {
    /// Xác thực WebSocket connection với JWT access token
    #[serde(rename_all = "camelCase")]
    Auth { token: String },

    /// Ping để giữ connection alive
    Ping,
}

/// Public identity của đối phương trong một match notification
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchedUser {
    pub id: Uuid,
    pub display_name: String,
    pub picture_url: Option<String>,
}

/// Messages được gửi từ server đến client
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum ServerMessage {
    /// Xác thực thành công
    #[serde(rename_all = "camelCase")]
    AuthSuccess { user_id: Uuid },

    /// Xác thực thất bại
    #[serde(rename_all = "camelCase")]
    AuthFailed { reason: String },

    /// Hai users vừa match với nhau
    #[serde(rename_all = "camelCase")]
    NewMatch { match_id: Uuid, other_user: MatchedUser, message: String },

    /// Tin nhắn mới trong một match
    #[serde(rename_all = "camelCase")]
    NewMessage {
        message: serde_json::Value, // Full message record, kèm tempId
    },

    /// Danh sách users đang online
    #[serde(rename = "getOnlineUsers", rename_all = "camelCase")]
    OnlineUsers { user_ids: Vec<Uuid> },

    /// Pong response cho Ping
    Pong,

    /// Lỗi xảy ra
    #[serde(rename_all = "camelCase")]
    Error { message: String },
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    // === ClientMessage deserialization ===

    #[test]
    fn test_client_auth_deserialize() {
        let json = r#"{"type":"auth","token":"my-jwt-token"}"#;
        let msg: ClientMessage = serde_json::from_str(json).unwrap();
        assert!(matches!(msg, ClientMessage::Auth { token } if token == "my-jwt-token"));
    }

    #[test]
    fn test_client_ping_deserialize() {
        let json = r#"{"type":"ping"}"#;
        let msg: ClientMessage = serde_json::from_str(json).unwrap();
        assert!(matches!(msg, ClientMessage::Ping));
    }

    #[test]
    fn test_invalid_type_returns_error() {
        let json = r#"{"type":"unknownType"}"#;
        assert!(serde_json::from_str::<ClientMessage>(json).is_err());
    }

    #[test]
    fn test_missing_token_returns_error() {
        let json = r#"{"type":"auth"}"#;
        assert!(serde_json::from_str::<ClientMessage>(json).is_err());
    }

    // === ServerMessage serialization ===

    #[test]
    fn test_server_auth_success_serialize() {
        let uid = Uuid::now_v7();
        let msg = ServerMessage::AuthSuccess { user_id: uid };
        let json = serde_json::to_string(&msg).unwrap();
        assert!(json.contains("\"type\":\"authSuccess\""));
        assert!(json.contains(&uid.to_string()));
    }

    #[test]
    fn test_server_new_match_serialize() {
        let match_id = Uuid::now_v7();
        let other = Uuid::now_v7();
        let msg = ServerMessage::NewMatch {
            match_id,
            other_user: MatchedUser {
                id: other,
                display_name: "Alice".to_string(),
                picture_url: None,
            },
            message: "You have a new match with Alice!".to_string(),
        };
        let json = serde_json::to_string(&msg).unwrap();
        assert!(json.contains("\"type\":\"newMatch\""));
        assert!(json.contains("\"matchId\""));
        assert!(json.contains("\"otherUser\""));
        assert!(json.contains("\"displayName\":\"Alice\""));
    }

    #[test]
    fn test_server_new_message_serialize() {
        let msg = ServerMessage::NewMessage {
            message: serde_json::json!({"content": "Hello", "tempId": "abc-1"}),
        };
        let json = serde_json::to_string(&msg).unwrap();
        assert!(json.contains("\"type\":\"newMessage\""));
        assert!(json.contains("\"content\":\"Hello\""));
        assert!(json.contains("\"tempId\":\"abc-1\""));
    }

    #[test]
    fn test_server_online_users_serialize() {
        let u1 = Uuid::now_v7();
        let u2 = Uuid::now_v7();
        let msg = ServerMessage::OnlineUsers { user_ids: vec![u1, u2] };
        let json = serde_json::to_string(&msg).unwrap();
        assert!(json.contains("\"type\":\"getOnlineUsers\""));
        assert!(json.contains(&u1.to_string()));
        assert!(json.contains(&u2.to_string()));
    }

    #[test]
    fn test_server_pong_serialize() {
        let json = serde_json::to_string(&ServerMessage::Pong).unwrap();
        assert_eq!(json, r#"{"type":"pong"}"#);
    }

    #[test]
    fn test_server_message_roundtrip() {
        let uid = Uuid::now_v7();
        let original = ServerMessage::AuthSuccess { user_id: uid };
        let json = serde_json::to_string(&original).unwrap();
        let deserialized: ServerMessage = serde_json::from_str(&json).unwrap();

        match deserialized {
            ServerMessage::AuthSuccess { user_id } => assert_eq!(user_id, uid),
            _ => panic!("Roundtrip failed"),
        }
    }
}
