/// WebSocket Actor Events
///
/// Module này định nghĩa các messages được trao đổi giữa Session actors
/// và Server actor.
use actix::prelude::*;
use uuid::Uuid;

use super::message::ServerMessage;
use super::session::RealtimeSession;

/// Event: một WebSocket connection mới
#[derive(Message)]
#[rtype(result = "()")]
pub struct Connect {
    /// Unique session ID
    pub id: Uuid,
    /// Address của session actor để có thể gửi messages
    pub addr: Addr<RealtimeSession>,
}

/// Event: connection đã đóng
#[derive(Message)]
#[rtype(result = "()")]
pub struct Disconnect {
    /// Session ID cần disconnect
    pub id: Uuid,
}

/// Event: user đã xác thực, gắn user identity vào session.
/// Nếu user đã có session khác, session mới thay thế (single handle per user).
#[derive(Message)]
#[rtype(result = "()")]
pub struct Register {
    pub session_id: Uuid,
    pub user_id: Uuid,
}

/// Event: transport đã đóng, session actor phải stop (stopped() sẽ gửi
/// Disconnect tới server để dọn presence registry)
#[derive(Message)]
#[rtype(result = "()")]
pub struct CloseSession;

/// Event: gửi message cho một user cụ thể (best-effort, drop nếu offline)
#[derive(Message)]
#[rtype(result = "()")]
pub struct SendToUser {
    pub user_id: Uuid,
    pub message: ServerMessage,
}

/// Event: lấy danh sách users đang online
#[derive(Message)]
#[rtype(result = "Vec<Uuid>")]
pub struct GetOnlineUsers;
