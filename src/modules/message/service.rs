use actix::Addr;
use std::sync::Arc;
use uuid::Uuid;

use crate::api::error;
use crate::modules::message::model::{MessageWithTemp, NewMessage, SendMessageModel};
use crate::modules::message::repository::MessageRepository;
use crate::modules::message::schema::MessageEntity;
use crate::modules::realtime::events::SendToUser;
use crate::modules::realtime::message::ServerMessage;
use crate::modules::realtime::server::RealtimeServer;
use crate::modules::swipe::repository::MatchRepository;
use crate::modules::swipe::schema::MatchEntity;

#[derive(Clone)]
pub struct MessageService<R, M>
where
    R: MessageRepository + Send + Sync,
    M: MatchRepository + Send + Sync,
{
    message_repo: Arc<R>,
    match_repo: Arc<M>,
    ws_server: Arc<Addr<RealtimeServer>>,
}

impl<R, M> MessageService<R, M>
where
    R: MessageRepository + Send + Sync,
    M: MatchRepository + Send + Sync,
{
    pub fn with_dependencies(
        message_repo: Arc<R>,
        match_repo: Arc<M>,
        ws_server: Arc<Addr<RealtimeServer>>,
    ) -> Self {
        MessageService { message_repo, match_repo, ws_server }
    }

    /// Only participants may touch a conversation; everyone else gets
    /// Forbidden, whether or not they could guess the match id.
    async fn authorized_match(
        &self,
        match_id: &Uuid,
        user_id: &Uuid,
    ) -> Result<MatchEntity, error::SystemError> {
        let record = self
            .match_repo
            .find_by_id(match_id)
            .await?
            .ok_or_else(|| error::SystemError::not_found("Match not found"))?;

        if !record.involves(user_id) {
            return Err(error::SystemError::forbidden("You are not part of this match"));
        }

        Ok(record)
    }

    pub async fn send_message(
        &self,
        sender_id: Uuid,
        match_id: Uuid,
        model: SendMessageModel,
    ) -> Result<MessageWithTemp, error::SystemError> {
        let content = model.content.trim();
        if content.is_empty() {
            return Err(error::SystemError::bad_request("Message content cannot be empty"));
        }

        let record = self.authorized_match(&match_id, &sender_id).await?;

        let message = self
            .message_repo
            .create(&NewMessage { match_id, sender_id, content: content.to_string() })
            .await?;

        let response = MessageWithTemp { message, temp_id: model.temp_id };
        self.notify_recipient(record.other_user(&sender_id), &response);

        Ok(response)
    }

    /// Best-effort push to the other participant, carrying the full stored
    /// record plus the sender's correlation token. The message is already
    /// durable; an offline recipient catches up on their next fetch.
    fn notify_recipient(&self, recipient: Uuid, payload: &MessageWithTemp) {
        match serde_json::to_value(payload) {
            Ok(value) => {
                self.ws_server.do_send(SendToUser {
                    user_id: recipient,
                    message: ServerMessage::NewMessage { message: value },
                });
            }
            Err(e) => {
                log::error!("Failed to serialize message {} for push: {}", payload.message.id, e);
            }
        }
    }

    /// Returns the conversation in creation order, then marks the other
    /// participant's messages as read. The returned payload reflects the
    /// state at fetch time.
    pub async fn list_messages(
        &self,
        viewer_id: Uuid,
        match_id: Uuid,
    ) -> Result<Vec<MessageEntity>, error::SystemError> {
        self.authorized_match(&match_id, &viewer_id).await?;

        let messages = self.message_repo.find_by_match(&match_id).await?;
        self.message_repo.mark_read_from_others(&match_id, &viewer_id).await?;

        Ok(messages)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix::Actor;
    use std::sync::Mutex;
    use tokio::sync::mpsc;

    use crate::api::error::SystemError;
    use crate::modules::realtime::events::{Connect, GetOnlineUsers, Register};
    use crate::modules::realtime::session::RealtimeSession;
    use crate::modules::swipe::model::MatchDetailRow;

    #[derive(Default)]
    struct MemMessageRepo {
        messages: Mutex<Vec<MessageEntity>>,
    }

    #[async_trait::async_trait]
    impl MessageRepository for MemMessageRepo {
        async fn create(&self, message: &NewMessage) -> Result<MessageEntity, SystemError> {
            let entity = MessageEntity {
                id: Uuid::now_v7(),
                match_id: message.match_id,
                sender_id: message.sender_id,
                content: message.content.clone(),
                is_read: false,
                created_at: chrono::Utc::now(),
            };
            self.messages.lock().unwrap().push(entity.clone());
            Ok(entity)
        }

        async fn find_by_match(
            &self,
            match_id: &Uuid,
        ) -> Result<Vec<MessageEntity>, SystemError> {
            let mut messages: Vec<_> = self
                .messages
                .lock()
                .unwrap()
                .iter()
                .filter(|m| m.match_id == *match_id)
                .cloned()
                .collect();
            messages.sort_by(|a, b| (a.created_at, a.id).cmp(&(b.created_at, b.id)));
            Ok(messages)
        }

        async fn mark_read_from_others(
            &self,
            match_id: &Uuid,
            viewer_id: &Uuid,
        ) -> Result<u64, SystemError> {
            let mut flipped = 0;
            for m in self.messages.lock().unwrap().iter_mut() {
                if m.match_id == *match_id && m.sender_id != *viewer_id && !m.is_read {
                    m.is_read = true;
                    flipped += 1;
                }
            }
            Ok(flipped)
        }
    }

    struct OneMatchRepo {
        record: MatchEntity,
    }

    #[async_trait::async_trait]
    impl MatchRepository for OneMatchRepo {
        async fn find_by_id(&self, match_id: &Uuid) -> Result<Option<MatchEntity>, SystemError> {
            Ok((self.record.id == *match_id).then(|| self.record.clone()))
        }

        async fn find_by_pair(
            &self,
            user_a: &Uuid,
            user_b: &Uuid,
        ) -> Result<Option<MatchEntity>, SystemError> {
            Ok((self.record.user_a == *user_a && self.record.user_b == *user_b)
                .then(|| self.record.clone()))
        }

        async fn try_create(
            &self,
            _user_a: &Uuid,
            _user_b: &Uuid,
        ) -> Result<Option<MatchEntity>, SystemError> {
            Ok(None)
        }

        async fn find_matches_for(
            &self,
            _user_id: &Uuid,
        ) -> Result<Vec<MatchDetailRow>, SystemError> {
            Ok(Vec::new())
        }
    }

    struct Fixture {
        svc: MessageService<MemMessageRepo, OneMatchRepo>,
        match_id: Uuid,
        alice: Uuid,
        bob: Uuid,
    }

    fn fixture() -> Fixture {
        let alice = Uuid::now_v7();
        let bob = Uuid::now_v7();
        let (user_a, user_b) = if alice <= bob { (alice, bob) } else { (bob, alice) };
        let record = MatchEntity {
            id: Uuid::now_v7(),
            user_a,
            user_b,
            created_at: chrono::Utc::now(),
        };
        let match_id = record.id;

        let svc = MessageService::with_dependencies(
            Arc::new(MemMessageRepo::default()),
            Arc::new(OneMatchRepo { record }),
            Arc::new(RealtimeServer::new().start()),
        );

        Fixture { svc, match_id, alice, bob }
    }

    fn send(content: &str) -> SendMessageModel {
        SendMessageModel { content: content.to_string(), temp_id: "temp-1".to_string() }
    }

    #[actix_web::test]
    async fn test_send_returns_stored_message_with_temp_id() {
        let f = fixture();

        let result = f.svc.send_message(f.alice, f.match_id, send("hello")).await.unwrap();
        assert_eq!(result.message.content, "hello");
        assert_eq!(result.message.sender_id, f.alice);
        assert_eq!(result.temp_id, "temp-1");
        assert!(!result.message.is_read);
    }

    #[actix_web::test]
    async fn test_send_trims_whitespace() {
        let f = fixture();

        let result = f.svc.send_message(f.alice, f.match_id, send("  hi  ")).await.unwrap();
        assert_eq!(result.message.content, "hi");
    }

    #[actix_web::test]
    async fn test_whitespace_only_content_rejected() {
        let f = fixture();

        let result = f.svc.send_message(f.alice, f.match_id, send("   ")).await;
        assert!(matches!(result, Err(SystemError::BadRequest(_))));
    }

    #[actix_web::test]
    async fn test_non_participant_forbidden() {
        let f = fixture();
        let stranger = Uuid::now_v7();

        let result = f.svc.send_message(stranger, f.match_id, send("let me in")).await;
        assert!(matches!(result, Err(SystemError::Forbidden(_))));

        let result = f.svc.list_messages(stranger, f.match_id).await;
        assert!(matches!(result, Err(SystemError::Forbidden(_))));
    }

    #[actix_web::test]
    async fn test_unknown_match_not_found() {
        let f = fixture();

        let result = f.svc.send_message(f.alice, Uuid::now_v7(), send("hello?")).await;
        assert!(matches!(result, Err(SystemError::NotFound(_))));
    }

    #[actix_web::test]
    async fn test_messages_come_back_in_creation_order() {
        let f = fixture();

        for content in ["one", "two", "three"] {
            f.svc.send_message(f.alice, f.match_id, send(content)).await.unwrap();
        }
        f.svc.send_message(f.bob, f.match_id, send("four")).await.unwrap();

        let messages = f.svc.list_messages(f.alice, f.match_id).await.unwrap();
        let contents: Vec<_> = messages.iter().map(|m| m.content.as_str()).collect();
        assert_eq!(contents, ["one", "two", "three", "four"]);
    }

    #[actix_web::test]
    async fn test_fetch_marks_only_other_sides_messages_read() {
        let f = fixture();

        f.svc.send_message(f.alice, f.match_id, send("from alice")).await.unwrap();
        f.svc.send_message(f.bob, f.match_id, send("from bob")).await.unwrap();

        // Bob's first fetch sees both unread; the flip happens after.
        let first = f.svc.list_messages(f.bob, f.match_id).await.unwrap();
        assert!(first.iter().all(|m| !m.is_read));

        let second = f.svc.list_messages(f.bob, f.match_id).await.unwrap();
        for m in &second {
            if m.sender_id == f.alice {
                assert!(m.is_read, "other side's message should be read");
            } else {
                assert!(!m.is_read, "own message must stay untouched");
            }
        }
    }

    #[actix_web::test]
    async fn test_push_carries_correlation_token() {
        let alice = Uuid::now_v7();
        let bob = Uuid::now_v7();
        let (user_a, user_b) = if alice <= bob { (alice, bob) } else { (bob, alice) };
        let record = MatchEntity {
            id: Uuid::now_v7(),
            user_a,
            user_b,
            created_at: chrono::Utc::now(),
        };
        let match_id = record.id;

        let server = RealtimeServer::new().start();
        let svc = MessageService::with_dependencies(
            Arc::new(MemMessageRepo::default()),
            Arc::new(OneMatchRepo { record }),
            Arc::new(server.clone()),
        );

        // Recipient online on a live session wired straight to a channel.
        let (tx, mut rx) = mpsc::unbounded_channel();
        let session =
            RealtimeSession { id: Uuid::now_v7(), user_id: Some(bob), server: server.clone(), tx };
        let session_id = session.id;
        let addr = session.start();
        server.send(Connect { id: session_id, addr: addr.clone() }).await.unwrap();
        server.send(Register { session_id, user_id: bob }).await.unwrap();

        svc.send_message(alice, match_id, send("hello")).await.unwrap();

        // Flush mailboxes: server first, then the session.
        server.send(GetOnlineUsers).await.unwrap();
        addr.send(ServerMessage::Pong).await.unwrap();

        let mut pushed = None;
        while let Ok(json) = rx.try_recv() {
            if json.contains("\"type\":\"newMessage\"") {
                pushed = Some(json);
            }
        }

        let json = pushed.expect("recipient should receive a newMessage push");
        assert!(json.contains("\"content\":\"hello\""));
        assert!(json.contains("\"tempId\":\"temp-1\""));
    }

    #[actix_web::test]
    async fn test_send_with_offline_recipient_still_succeeds() {
        let f = fixture();

        // Nobody is registered with the realtime server; the push is dropped
        // and the send still succeeds.
        let result = f.svc.send_message(f.alice, f.match_id, send("anyone there?")).await;
        assert!(result.is_ok());
    }
}
