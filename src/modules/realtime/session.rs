/// Realtime Session Actor
///
/// Mỗi WebSocket connection có một Session actor riêng. Session actor quản lý
/// auth state và gửi messages tới client thông qua mpsc channel được bridge
/// từ handler.rs.
use actix::prelude::*;
use tokio::sync::mpsc;
use uuid::Uuid;

use crate::ENV;
use crate::utils::{Claims, TypeClaims};

use super::events::{CloseSession, Connect, Disconnect, Register};
use super::message::{ClientMessage, ServerMessage};
use super::server::RealtimeServer;

pub struct RealtimeSession {
    /// Unique session ID
    pub id: Uuid,

    /// User ID sau khi authenticate (None nếu chưa auth)
    pub user_id: Option<Uuid>,

    /// Address của server actor
    pub server: Addr<RealtimeServer>,

    /// Channel gửi JSON messages tới client (bridge → handler.rs → WebSocket)
    pub tx: mpsc::UnboundedSender<String>,
}

impl RealtimeSession {
    pub fn new(server: Addr<RealtimeServer>, tx: mpsc::UnboundedSender<String>) -> Self {
        Self { id: Uuid::now_v7(), user_id: None, server, tx }
    }

    fn send_to_client(&self, msg: &ServerMessage) {
        match serde_json::to_string(msg) {
            Ok(json) => {
                if let Err(e) = self.tx.send(json) {
                    tracing::error!(
                        "Không thể gửi message tới client (session {}): {}",
                        self.id,
                        e
                    );
                }
            }
            Err(e) => {
                tracing::error!("Không thể serialize ServerMessage (session {}): {}", self.id, e);
            }
        }
    }

    fn handle_client_message(&mut self, msg: &ClientMessage) {
        match msg {
            ClientMessage::Auth { token } => {
                self.handle_auth(token);
            }

            ClientMessage::Ping => {
                self.send_to_client(&ServerMessage::Pong);
            }
        }
    }

    /// Verify access token và đăng ký user vào presence registry
    fn handle_auth(&mut self, token: &str) {
        if self.user_id.is_some() {
            self.send_to_client(&ServerMessage::Error {
                message: "Session đã được xác thực".to_string(),
            });
            return;
        }

        let claims = match Claims::decode(token, ENV.jwt_secret.as_ref()) {
            Ok(claims) => claims,
            Err(e) => {
                tracing::warn!("JWT verification thất bại (session {}): {}", self.id, e);
                self.send_to_client(&ServerMessage::AuthFailed {
                    reason: "Token không hợp lệ hoặc đã hết hạn".to_string(),
                });
                return;
            }
        };

        if claims._type.as_ref() != Some(&TypeClaims::AccessToken) {
            self.send_to_client(&ServerMessage::AuthFailed {
                reason: "Chỉ chấp nhận access token".to_string(),
            });
            return;
        }

        let user_id = claims.sub;
        self.user_id = Some(user_id);

        self.server.do_send(Register { session_id: self.id, user_id });
        self.send_to_client(&ServerMessage::AuthSuccess { user_id });

        tracing::info!("User {} đã authenticate thành công trên session {}", user_id, self.id);
    }
}

impl Actor for RealtimeSession {
    type Context = Context<Self>;

    fn started(&mut self, ctx: &mut Self::Context) {
        tracing::debug!("WebSocket session started: {}", self.id);
        self.server.do_send(Connect { id: self.id, addr: ctx.address() });
    }

    fn stopped(&mut self, _ctx: &mut Self::Context) {
        tracing::debug!("WebSocket session stopped: {}", self.id);
        self.server.do_send(Disconnect { id: self.id });
    }
}

impl actix::Message for ClientMessage {
    type Result = ();
}

/// Handler: nhận ClientMessage từ handler.rs
impl Handler<ClientMessage> for RealtimeSession {
    type Result = ();

    fn handle(&mut self, msg: ClientMessage, _ctx: &mut Context<Self>) {
        self.handle_client_message(&msg);
    }
}

/// Handler: transport đóng → stop actor. stopped() sẽ báo Disconnect cho server.
impl Handler<CloseSession> for RealtimeSession {
    type Result = ();

    fn handle(&mut self, _: CloseSession, ctx: &mut Context<Self>) {
        ctx.stop();
    }
}

/// Handler: nhận ServerMessage từ server actor → serialize → gửi tới client
impl Handler<ServerMessage> for RealtimeSession {
    type Result = ();

    fn handle(&mut self, msg: ServerMessage, _ctx: &mut Context<Self>) {
        self.send_to_client(&msg);
    }
}
