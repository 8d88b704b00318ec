//! Users CRUD handlers and their request/response shapes.
//!
//! Postal fields nest under an `address` object in every response. The list
//! endpoint collapses first/last name into a single `name`; the by-id,
//! create and update responses keep them split. That asymmetry is part of
//! the published API and is kept as-is.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use chrono::{DateTime, FixedOffset, NaiveDate};
use serde::{Deserialize, Serialize};

use models::users;
use service::errors::ServiceError;
use service::pagination::{PageMeta, Pagination};
use service::query::UserFilter;
use service::user_service::{self, UserDraft};

use crate::errors::ApiError;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct AddressBody {
    pub address: String,
    pub city: String,
    pub zip_code: String,
    pub country: String,
}

/// List-endpoint row: combined `name`.
#[derive(Debug, Serialize)]
pub struct UserSummary {
    pub id: i32,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub address: AddressBody,
    pub date_of_birth: NaiveDate,
    pub gender: String,
    pub created_at: DateTime<FixedOffset>,
    pub last_login: Option<DateTime<FixedOffset>>,
    pub is_active: bool,
}

/// By-id/create/update shape: split name fields.
#[derive(Debug, Serialize)]
pub struct UserDetail {
    pub id: i32,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
    pub address: AddressBody,
    pub date_of_birth: NaiveDate,
    pub gender: String,
    pub created_at: DateTime<FixedOffset>,
    pub last_login: Option<DateTime<FixedOffset>>,
    pub is_active: bool,
}

fn address_of(user: &users::Model) -> AddressBody {
    AddressBody {
        address: user.address.clone(),
        city: user.city.clone(),
        zip_code: user.zip_code.clone(),
        country: user.country.clone(),
    }
}

impl From<users::Model> for UserSummary {
    fn from(user: users::Model) -> Self {
        let name = format!("{} {}", user.first_name, user.last_name).trim().to_string();
        Self {
            id: user.id,
            name,
            email: user.email.clone(),
            phone: user.phone.clone(),
            address: address_of(&user),
            date_of_birth: user.date_of_birth,
            gender: user.gender,
            created_at: user.created_at,
            last_login: user.last_login,
            is_active: user.is_active,
        }
    }
}

impl From<users::Model> for UserDetail {
    fn from(user: users::Model) -> Self {
        Self {
            id: user.id,
            address: address_of(&user),
            first_name: user.first_name,
            last_name: user.last_name,
            email: user.email,
            phone: user.phone,
            date_of_birth: user.date_of_birth,
            gender: user.gender,
            created_at: user.created_at,
            last_login: user.last_login,
            is_active: user.is_active,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct UserListResponse {
    pub data: Vec<UserSummary>,
    pub total: u64,
    pub page: u32,
    pub next: Option<u32>,
    pub page_size: u32,
    pub total_pages: u64,
}

#[derive(Debug, Serialize)]
pub struct UserMutationResponse {
    #[serde(flatten)]
    pub user: UserDetail,
    pub message: String,
}

#[derive(Debug, Serialize)]
pub struct UserDeleteResponse {
    pub id: i32,
    pub message: String,
}

#[derive(Debug, Deserialize)]
pub struct ListParams {
    pub page: Option<u32>,
    pub page_size: Option<u32>,
    /// Free-text search over name and email.
    pub filter: Option<String>,
    pub active: Option<String>,
    pub gender: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct CreateUserRequest {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
    pub address: String,
    pub city: String,
    pub zip_code: String,
    pub country: String,
    pub date_of_birth: NaiveDate,
    pub gender: String,
    #[serde(default = "default_active")]
    pub is_active: bool,
}

fn default_active() -> bool {
    true
}

/// Updates resend the full mutable-field set; no field may be omitted.
#[derive(Debug, Deserialize)]
pub struct UpdateUserRequest {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
    pub address: String,
    pub city: String,
    pub zip_code: String,
    pub country: String,
    pub date_of_birth: NaiveDate,
    pub gender: String,
    pub is_active: bool,
}

impl From<CreateUserRequest> for UserDraft {
    fn from(b: CreateUserRequest) -> Self {
        Self {
            first_name: b.first_name,
            last_name: b.last_name,
            email: b.email,
            phone: b.phone,
            address: b.address,
            city: b.city,
            zip_code: b.zip_code,
            country: b.country,
            date_of_birth: b.date_of_birth,
            gender: b.gender,
            is_active: b.is_active,
        }
    }
}

impl From<UpdateUserRequest> for UserDraft {
    fn from(b: UpdateUserRequest) -> Self {
        Self {
            first_name: b.first_name,
            last_name: b.last_name,
            email: b.email,
            phone: b.phone,
            address: b.address,
            city: b.city,
            zip_code: b.zip_code,
            country: b.country,
            date_of_birth: b.date_of_birth,
            gender: b.gender,
            is_active: b.is_active,
        }
    }
}

pub async fn list_users(
    State(state): State<AppState>,
    Query(params): Query<ListParams>,
) -> Result<Json<UserListResponse>, ApiError> {
    let page = params.page.unwrap_or(1);
    if page < 1 {
        return Err(ServiceError::Validation("page must be >= 1".to_string()).into());
    }
    let page_size = params.page_size.unwrap_or(10);
    if !(1..=100).contains(&page_size) {
        return Err(ServiceError::Validation("page_size must be between 1 and 100".to_string()).into());
    }
    let pagination = Pagination { page, page_size };

    let filter = UserFilter {
        active: params.active,
        gender: params.gender,
        search: params.filter,
    };
    let (rows, total) = user_service::list_users(&state.db, &filter, pagination).await?;
    let meta = PageMeta::compute(total, pagination);

    Ok(Json(UserListResponse {
        data: rows.into_iter().map(UserSummary::from).collect(),
        total: meta.total,
        page: meta.page,
        next: meta.next,
        page_size: meta.page_size,
        total_pages: meta.total_pages,
    }))
}

/// Ids are integers, but the path segment arrives as text; anything that is
/// not a valid id can match no row, so it reads as not-found rather than a
/// malformed request.
fn parse_user_id(raw: &str) -> Result<i32, ApiError> {
    raw.parse().map_err(|_| ServiceError::not_found("user").into())
}

pub async fn get_user(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<UserDetail>, ApiError> {
    let id = parse_user_id(&id)?;
    let user = user_service::get_user(&state.db, id).await?;
    Ok(Json(user.into()))
}

pub async fn create_user(
    State(state): State<AppState>,
    Json(body): Json<CreateUserRequest>,
) -> Result<(StatusCode, Json<UserMutationResponse>), ApiError> {
    let created = user_service::create_user(&state.db, body.into()).await?;
    Ok((
        StatusCode::CREATED,
        Json(UserMutationResponse {
            user: created.into(),
            message: "User created successfully".to_string(),
        }),
    ))
}

pub async fn update_user(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(body): Json<UpdateUserRequest>,
) -> Result<Json<UserMutationResponse>, ApiError> {
    let id = parse_user_id(&id)?;
    let updated = user_service::update_user(&state.db, id, body.into()).await?;
    Ok(Json(UserMutationResponse {
        user: updated.into(),
        message: "User updated successfully".to_string(),
    }))
}

pub async fn delete_user(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<UserDeleteResponse>, ApiError> {
    let id = parse_user_id(&id)?;
    let id = user_service::delete_user(&state.db, id).await?;
    Ok(Json(UserDeleteResponse {
        id,
        message: format!("User with ID {id} deleted successfully"),
    }))
}
