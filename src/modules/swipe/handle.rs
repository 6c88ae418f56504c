use actix_web::{HttpRequest, get, post, web};

use crate::{
    api::{error, success},
    middlewares::get_extensions,
    modules::profile::repository_pg::ProfileRepositoryPg,
    modules::swipe::{
        model::{MatchDetailRow, SwipeModel, SwipeResponse},
        repository_pg::{MatchRepositoryPg, SwipeRepositoryPg},
        service::SwipeService,
    },
    utils::{Claims, ValidatedJson},
};

pub type SwipeSvc = SwipeService<SwipeRepositoryPg, MatchRepositoryPg, ProfileRepositoryPg>;

#[post("")]
pub async fn swipe(
    swipe_service: web::Data<SwipeSvc>,
    body: ValidatedJson<SwipeModel>,
    req: HttpRequest,
) -> Result<success::Success<SwipeResponse>, error::Error> {
    let user_id = get_extensions::<Claims>(&req)?.sub;
    let outcome = swipe_service.swipe(user_id, body.0).await?;

    // 201 only when this request created the match; a converging duplicate
    // or a plain swipe is a 200.
    let created = outcome.match_created();
    let response = outcome.into_response();
    let message = if response.matched { "It's a match!" } else { "Swipe recorded" };

    if created {
        Ok(success::Success::created(Some(response)).message(message))
    } else {
        Ok(success::Success::ok(Some(response)).message(message))
    }
}

#[get("")]
pub async fn get_matches(
    swipe_service: web::Data<SwipeSvc>,
    req: HttpRequest,
) -> Result<success::Success<Vec<MatchDetailRow>>, error::Error> {
    let user_id = get_extensions::<Claims>(&req)?.sub;
    let matches = swipe_service.get_matches(user_id).await?;
    Ok(success::Success::ok(Some(matches)))
}
