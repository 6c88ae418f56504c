use actix_web::{HttpRequest, get, post, web};
use uuid::Uuid;

use crate::{
    api::{error, success},
    middlewares::get_extensions,
    modules::message::{
        model::{MessageWithTemp, SendMessageModel},
        repository_pg::MessageRepositoryPg,
        schema::MessageEntity,
        service::MessageService,
    },
    modules::swipe::repository_pg::MatchRepositoryPg,
    utils::{Claims, ValidatedJson},
};

pub type MessageSvc = MessageService<MessageRepositoryPg, MatchRepositoryPg>;

#[post("/{match_id}/messages")]
pub async fn send_message(
    message_service: web::Data<MessageSvc>,
    path: web::Path<Uuid>,
    body: ValidatedJson<SendMessageModel>,
    req: HttpRequest,
) -> Result<success::Success<MessageWithTemp>, error::Error> {
    let user_id = get_extensions::<Claims>(&req)?.sub;
    let message = message_service.send_message(user_id, path.into_inner(), body.0).await?;
    Ok(success::Success::created(Some(message)))
}

#[get("/{match_id}/messages")]
pub async fn get_messages(
    message_service: web::Data<MessageSvc>,
    path: web::Path<Uuid>,
    req: HttpRequest,
) -> Result<success::Success<Vec<MessageEntity>>, error::Error> {
    let user_id = get_extensions::<Claims>(&req)?.sub;
    let messages = message_service.list_messages(user_id, path.into_inner()).await?;
    Ok(success::Success::ok(Some(messages)))
}
