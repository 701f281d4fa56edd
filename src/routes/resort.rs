use std::sync::Arc;

use actix_web::{web, HttpResponse};
use futures::TryStreamExt;
use mongodb::bson::doc;
use mongodb::Client;

use crate::db::collections;
use crate::errors::{parse_object_id, ApiError};
use crate::models::resort::Resort;

/*
    GET /api/resorts (public listing)
*/
pub async fn get_all(data: web::Data<Arc<Client>>) -> Result<HttpResponse, ApiError> {
    let client = data.into_inner();

    let resorts: Vec<Resort> = collections::resorts(&client)
        .find(doc! { "is_active": true })
        .sort(doc! { "created_at": -1 })
        .limit(100)
        .await?
        .try_collect()
        .await?;

    Ok(HttpResponse::Ok().json(resorts))
}

/*
    GET /api/resorts/{id}
*/
pub async fn get_by_id(
    path: web::Path<String>,
    data: web::Data<Arc<Client>>,
) -> Result<HttpResponse, ApiError> {
    let client = data.into_inner();
    let resort_id = parse_object_id(&path.into_inner(), "resort id")?;

    let resort = collections::resorts(&client)
        .find_one(doc! { "_id": resort_id })
        .await?
        .ok_or_else(|| ApiError::not_found("Resort"))?;

    Ok(HttpResponse::Ok().json(resort))
}
