use actix_web::{HttpRequest, get, put, web};

use crate::{
    api::{error, success},
    middlewares::get_extensions,
    modules::profile::{
        model::{ProfileCard, UpsertProfileModel},
        repository_pg::ProfileRepositoryPg,
        schema::ProfileEntity,
        service::ProfileService,
    },
    utils::{Claims, ValidatedJson},
};

pub type ProfileSvc = ProfileService<ProfileRepositoryPg>;

#[put("/me")]
pub async fn upsert_profile(
    profile_service: web::Data<ProfileSvc>,
    body: ValidatedJson<UpsertProfileModel>,
    req: HttpRequest,
) -> Result<success::Success<ProfileEntity>, error::Error> {
    let user_id = get_extensions::<Claims>(&req)?.sub;
    let profile = profile_service.upsert_profile(user_id, body.0).await?;
    Ok(success::Success::ok(Some(profile)).message("Profile saved successfully"))
}

#[get("/me")]
pub async fn get_own_profile(
    profile_service: web::Data<ProfileSvc>,
    req: HttpRequest,
) -> Result<success::Success<ProfileCard>, error::Error> {
    let user_id = get_extensions::<Claims>(&req)?.sub;
    let profile = profile_service.get_own_profile(user_id).await?;
    Ok(success::Success::ok(Some(profile)))
}

#[get("/discover")]
pub async fn discover(
    profile_service: web::Data<ProfileSvc>,
    req: HttpRequest,
) -> Result<success::Success<Vec<ProfileCard>>, error::Error> {
    let user_id = get_extensions::<Claims>(&req)?.sub;
    let profiles = profile_service.discover(user_id).await?;
    Ok(success::Success::ok(Some(profiles)))
}

#[get("/liked")]
pub async fn liked_profiles(
    profile_service: web::Data<ProfileSvc>,
    req: HttpRequest,
) -> Result<success::Success<Vec<ProfileCard>>, error::Error> {
    let user_id = get_extensions::<Claims>(&req)?.sub;
    let profiles = profile_service.liked_profiles(user_id).await?;
    Ok(success::Success::ok(Some(profiles)))
}

#[get("/liked-me")]
pub async fn profiles_that_liked_me(
    profile_service: web::Data<ProfileSvc>,
    req: HttpRequest,
) -> Result<success::Success<Vec<ProfileCard>>, error::Error> {
    let user_id = get_extensions::<Claims>(&req)?.sub;
    let profiles = profile_service.profiles_that_liked_me(user_id).await?;
    Ok(success::Success::ok(Some(profiles)))
}
