/// Realtime Server Actor
///
/// Server actor sở hữu presence registry: map user identity → session đang
/// active. Actor xử lý messages tuần tự nên mọi mutation của registry là
/// synchronous, không bao giờ giữ state qua một await.
///
/// Known constraint: mỗi user chỉ có MỘT delivery handle. Nếu user mở tab
/// thứ hai, registration mới lặng lẽ thay thế handle cũ.
use actix::prelude::*;
use std::collections::HashMap;
use uuid::Uuid;

use super::events::*;
use super::message::ServerMessage;
use super::session::RealtimeSession;

pub struct RealtimeServer {
    /// Map: session_id -> session actor address (mọi connection, kể cả chưa auth)
    sessions: HashMap<Uuid, Addr<RealtimeSession>>,

    /// Presence registry: user_id -> session_id. Single handle per user.
    online: HashMap<Uuid, Uuid>,
}

impl RealtimeServer {
    pub fn new() -> Self {
        Self { sessions: HashMap::new(), online: HashMap::new() }
    }

    fn snapshot(&self) -> Vec<Uuid> {
        self.online.keys().copied().collect()
    }

    fn send_to_session(&self, session_id: &Uuid, message: ServerMessage) {
        if let Some(session_addr) = self.sessions.get(session_id) {
            session_addr.do_send(message);
        }
    }

    /// Broadcast danh sách online users tới tất cả connections.
    /// Gọi trên mỗi connect/disconnect transition.
    fn broadcast_online_users(&self) {
        let message = ServerMessage::OnlineUsers { user_ids: self.snapshot() };
        for session_addr in self.sessions.values() {
            session_addr.do_send(message.clone());
        }
    }
}

impl Default for RealtimeServer {
    fn default() -> Self {
        Self::new()
    }
}

impl Actor for RealtimeServer {
    type Context = Context<Self>;

    fn started(&mut self, _ctx: &mut Self::Context) {
        tracing::info!("Realtime server started");
    }

    fn stopped(&mut self, _ctx: &mut Self::Context) {
        tracing::info!("Realtime server stopped");
    }
}

impl Handler<Connect> for RealtimeServer {
    type Result = ();

    fn handle(&mut self, msg: Connect, _: &mut Context<Self>) {
        tracing::debug!("New WebSocket session connected: {}", msg.id);
        self.sessions.insert(msg.id, msg.addr);
    }
}

impl Handler<Register> for RealtimeServer {
    type Result = ();

    fn handle(&mut self, msg: Register, _: &mut Context<Self>) {
        // Insert/overwrite: registration mới nhất là delivery target duy nhất
        let previous = self.online.insert(msg.user_id, msg.session_id);

        if let Some(old_session) = previous {
            tracing::info!(
                "User {} re-registered: session {} replaces {}",
                msg.user_id,
                msg.session_id,
                old_session
            );
        } else {
            tracing::info!("User {} online on session {}", msg.user_id, msg.session_id);
        }

        self.broadcast_online_users();
    }
}

impl Handler<Disconnect> for RealtimeServer {
    type Result = ();

    fn handle(&mut self, msg: Disconnect, _: &mut Context<Self>) {
        tracing::debug!("WebSocket session disconnected: {}", msg.id);

        self.sessions.remove(&msg.id);

        // Disconnect được key theo connection chứ không phải user: scan theo
        // value. Nếu user đã reconnect với session khác thì entry không bị xóa.
        let user = self
            .online
            .iter()
            .find(|(_, session_id)| **session_id == msg.id)
            .map(|(user_id, _)| *user_id);

        if let Some(user_id) = user {
            self.online.remove(&user_id);
            tracing::info!("User {} offline", user_id);
            self.broadcast_online_users();
        }
    }
}

impl Handler<SendToUser> for RealtimeServer {
    type Result = ();

    fn handle(&mut self, msg: SendToUser, _: &mut Context<Self>) {
        match self.online.get(&msg.user_id) {
            Some(session_id) => {
                self.send_to_session(&session_id.clone(), msg.message);
            }
            None => {
                // Best-effort: user offline thì drop, không queue, không retry
                tracing::debug!("User {} not online, event dropped", msg.user_id);
            }
        }
    }
}

impl Handler<GetOnlineUsers> for RealtimeServer {
    type Result = Vec<Uuid>;

    fn handle(&mut self, _: GetOnlineUsers, _: &mut Context<Self>) -> Self::Result {
        self.snapshot()
    }
}

/// Implement Message trait cho ServerMessage để có thể send tới sessions
impl actix::Message for ServerMessage {
    type Result = ();
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::sync::mpsc;

    struct Wired {
        session_id: Uuid,
        addr: Addr<RealtimeSession>,
        rx: mpsc::UnboundedReceiver<String>,
    }

    /// Khởi tạo một session actor nối thẳng vào channel, đã Connect với server.
    async fn wire_session(server: &Addr<RealtimeServer>) -> Wired {
        let (tx, rx) = mpsc::unbounded_channel();
        let session = RealtimeSession::new(server.clone(), tx);
        let session_id = session.id;
        let addr = session.start();
        server.send(Connect { id: session_id, addr: addr.clone() }).await.unwrap();
        Wired { session_id, addr, rx }
    }

    async fn flush(server: &Addr<RealtimeServer>, session: &Addr<RealtimeSession>) {
        server.send(GetOnlineUsers).await.unwrap();
        session.send(ServerMessage::Pong).await.unwrap();
    }

    fn drain(rx: &mut mpsc::UnboundedReceiver<String>) -> Vec<String> {
        let mut out = Vec::new();
        while let Ok(json) = rx.try_recv() {
            out.push(json);
        }
        out
    }

    #[actix_web::test]
    async fn test_second_registration_steals_delivery() {
        let server = RealtimeServer::new().start();
        let user = Uuid::now_v7();

        let mut first = wire_session(&server).await;
        let mut second = wire_session(&server).await;

        server.send(Register { session_id: first.session_id, user_id: user }).await.unwrap();
        server.send(Register { session_id: second.session_id, user_id: user }).await.unwrap();

        server
            .send(SendToUser {
                user_id: user,
                message: ServerMessage::Error { message: "ping".to_string() },
            })
            .await
            .unwrap();

        flush(&server, &first.addr).await;
        flush(&server, &second.addr).await;

        let to_first = drain(&mut first.rx);
        let to_second = drain(&mut second.rx);
        assert!(!to_first.iter().any(|j| j.contains("\"type\":\"error\"")));
        assert!(to_second.iter().any(|j| j.contains("\"type\":\"error\"")));
    }

    #[actix_web::test]
    async fn test_disconnect_removes_user_from_snapshot() {
        let server = RealtimeServer::new().start();
        let user = Uuid::now_v7();

        let wired = wire_session(&server).await;
        server.send(Register { session_id: wired.session_id, user_id: user }).await.unwrap();
        assert_eq!(server.send(GetOnlineUsers).await.unwrap(), vec![user]);

        server.send(Disconnect { id: wired.session_id }).await.unwrap();
        assert!(server.send(GetOnlineUsers).await.unwrap().is_empty());
    }

    #[actix_web::test]
    async fn test_stale_disconnect_keeps_new_registration() {
        let server = RealtimeServer::new().start();
        let user = Uuid::now_v7();

        let old = wire_session(&server).await;
        let new = wire_session(&server).await;

        server.send(Register { session_id: old.session_id, user_id: user }).await.unwrap();
        server.send(Register { session_id: new.session_id, user_id: user }).await.unwrap();

        // Disconnect của session cũ không được đá user offline.
        server.send(Disconnect { id: old.session_id }).await.unwrap();
        assert_eq!(server.send(GetOnlineUsers).await.unwrap(), vec![user]);
    }

    #[actix_web::test]
    async fn test_offline_user_event_dropped() {
        let server = RealtimeServer::new().start();

        // Không ai online: không panic, không error.
        server
            .send(SendToUser {
                user_id: Uuid::now_v7(),
                message: ServerMessage::Error { message: "nobody home".to_string() },
            })
            .await
            .unwrap();
    }

    #[actix_web::test]
    async fn test_register_broadcasts_online_users() {
        let server = RealtimeServer::new().start();
        let user = Uuid::now_v7();

        let mut observer = wire_session(&server).await;
        let registered = wire_session(&server).await;

        server.send(Register { session_id: registered.session_id, user_id: user }).await.unwrap();
        flush(&server, &observer.addr).await;

        let events = drain(&mut observer.rx);
        assert!(events.iter().any(|j| {
            j.contains("\"type\":\"getOnlineUsers\"") && j.contains(&user.to_string())
        }));
    }
}
