//! CRUD operations over the `users` entity.
//!
//! Each operation performs at most one mutating store call; uniqueness is
//! ultimately enforced by the unique index on `email`, with the pre-checks
//! here only providing the friendlier common-case message. A constraint
//! violation that slips past a pre-check still surfaces as a conflict.

use chrono::{NaiveDate, Utc};
use models::users;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, QuerySelect, Set, SqlErr,
};
use tracing::debug;

use crate::errors::ServiceError;
use crate::pagination::Pagination;
use crate::query::{build_filtered_query, normalize_gender, UserFilter};

/// The mutable fields of a user, as submitted on create and update.
/// Updates resend every field; there is no partial-field omission.
#[derive(Clone, Debug)]
pub struct UserDraft {
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

/// List users matching `filter`, bounded by `page`. Returns the page of rows
/// plus the exact total across all pages.
pub async fn list_users(
    db: &DatabaseConnection,
    filter: &UserFilter,
    page: Pagination,
) -> Result<(Vec<users::Model>, u64), ServiceError> {
    // Count-only execution first, then the bounded row fetch; both share the
    // same predicate set. Rows are ordered by id so pages are deterministic.
    let total = build_filtered_query(filter)
        .count(db)
        .await
        .map_err(|e| ServiceError::Db(e.to_string()))?;

    let rows = build_filtered_query(filter)
        .order_by_asc(users::Column::Id)
        .offset(page.offset())
        .limit(page.limit())
        .all(db)
        .await
        .map_err(|e| ServiceError::Db(e.to_string()))?;

    debug!(total, page = page.page, returned = rows.len(), "listed users");
    Ok((rows, total))
}

/// Get a user by id.
pub async fn get_user(db: &DatabaseConnection, id: i32) -> Result<users::Model, ServiceError> {
    users::Entity::find_by_id(id)
        .one(db)
        .await
        .map_err(|e| ServiceError::Db(e.to_string()))?
        .ok_or_else(|| ServiceError::not_found("user"))
}

/// Create a user with a store-assigned id and creation timestamp.
pub async fn create_user(
    db: &DatabaseConnection,
    draft: UserDraft,
) -> Result<users::Model, ServiceError> {
    if find_by_email(db, &draft.email).await?.is_some() {
        return Err(ServiceError::duplicate_email());
    }

    let am = users::ActiveModel {
        first_name: Set(draft.first_name),
        last_name: Set(draft.last_name),
        email: Set(draft.email),
        phone: Set(draft.phone),
        address: Set(draft.address),
        city: Set(draft.city),
        zip_code: Set(draft.zip_code),
        country: Set(draft.country),
        date_of_birth: Set(draft.date_of_birth),
        gender: Set(normalize_gender(&draft.gender)),
        created_at: Set(Utc::now().into()),
        last_login: Set(None),
        is_active: Set(draft.is_active),
        ..Default::default()
    };
    am.insert(db).await.map_err(map_write_err)
}

/// Replace all mutable fields of an existing user.
pub async fn update_user(
    db: &DatabaseConnection,
    id: i32,
    draft: UserDraft,
) -> Result<users::Model, ServiceError> {
    let existing = get_user(db, id).await?;

    // Uniqueness check excludes the row being updated.
    if let Some(other) = find_by_email(db, &draft.email).await? {
        if other.id != id {
            return Err(ServiceError::duplicate_email());
        }
    }

    let mut am: users::ActiveModel = existing.into();
    am.first_name = Set(draft.first_name);
    am.last_name = Set(draft.last_name);
    am.email = Set(draft.email);
    am.phone = Set(draft.phone);
    am.address = Set(draft.address);
    am.city = Set(draft.city);
    am.zip_code = Set(draft.zip_code);
    am.country = Set(draft.country);
    am.date_of_birth = Set(draft.date_of_birth);
    am.gender = Set(normalize_gender(&draft.gender));
    am.is_active = Set(draft.is_active);
    am.update(db).await.map_err(map_write_err)
}

/// Delete a user by id, returning the deleted id.
pub async fn delete_user(db: &DatabaseConnection, id: i32) -> Result<i32, ServiceError> {
    get_user(db, id).await?;

    let res = users::Entity::delete_by_id(id)
        .exec(db)
        .await
        .map_err(|e| ServiceError::Db(e.to_string()))?;
    // A concurrent delete can win between the check and this statement.
    if res.rows_affected == 0 {
        return Err(ServiceError::not_found("user"));
    }
    Ok(id)
}

async fn find_by_email(
    db: &DatabaseConnection,
    email: &str,
) -> Result<Option<users::Model>, ServiceError> {
    users::Entity::find()
        .filter(users::Column::Email.eq(email))
        .one(db)
        .await
        .map_err(|e| ServiceError::Db(e.to_string()))
}

fn map_write_err(e: DbErr) -> ServiceError {
    match e.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(_)) => ServiceError::duplicate_email(),
        _ => ServiceError::Db(e.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::get_db;
    use uuid::Uuid;

    fn draft(marker: &str, n: u32) -> UserDraft {
        UserDraft {
            first_name: "Test".into(),
            last_name: format!("User{marker}"),
            email: format!("user{n}_{marker}@example.com"),
            phone: "+1 555 0100".into(),
            address: "1 Main St".into(),
            city: "Springfield".into(),
            zip_code: "12345".into(),
            country: "USA".into(),
            date_of_birth: NaiveDate::from_ymd_opt(1990, 1, 1).expect("valid date"),
            gender: "male".into(),
            is_active: true,
        }
    }

    #[tokio::test]
    async fn user_crud_round_trip() -> Result<(), anyhow::Error> {
        let Some(db) = get_db().await else { return Ok(()) };
        let marker = Uuid::new_v4().simple().to_string();

        let created = create_user(&db, draft(&marker, 1)).await?;
        assert!(created.id > 0);
        assert_eq!(created.gender, "Male");
        assert!(created.last_login.is_none());

        let fetched = get_user(&db, created.id).await?;
        assert_eq!(fetched, created);

        // Same email again must be a conflict, not an internal error.
        let dup = create_user(&db, draft(&marker, 1)).await;
        assert!(matches!(dup, Err(ServiceError::Conflict(_))), "got {dup:?}");

        // Update keeps its own email without conflicting with itself.
        let mut changed = draft(&marker, 1);
        changed.first_name = "Renamed".into();
        let updated = update_user(&db, created.id, changed).await?;
        assert_eq!(updated.first_name, "Renamed");
        assert_eq!(updated.created_at, created.created_at);

        // But taking another row's email is a conflict.
        let second = create_user(&db, draft(&marker, 2)).await?;
        let mut steal = draft(&marker, 1);
        steal.email = updated.email.clone();
        let res = update_user(&db, second.id, steal).await;
        assert!(matches!(res, Err(ServiceError::Conflict(_))), "got {res:?}");

        assert_eq!(delete_user(&db, created.id).await?, created.id);
        let gone = delete_user(&db, created.id).await;
        assert!(matches!(gone, Err(ServiceError::NotFound(_))), "got {gone:?}");

        delete_user(&db, second.id).await?;
        Ok(())
    }

    #[tokio::test]
    async fn list_filters_and_paginates() -> Result<(), anyhow::Error> {
        let Some(db) = get_db().await else { return Ok(()) };
        let marker = Uuid::new_v4().simple().to_string();

        let mut ids = Vec::new();
        for n in 0..5 {
            let mut d = draft(&marker, n);
            d.is_active = n % 2 == 0;
            ids.push(create_user(&db, d).await?.id);
        }

        let filter = UserFilter { search: Some(marker.clone()), ..Default::default() };
        let (rows, total) = list_users(&db, &filter, Pagination { page: 1, page_size: 2 }).await?;
        assert_eq!(total, 5);
        assert_eq!(rows.len(), 2);

        // Page past the end: empty data, same total.
        let (rows, total) = list_users(&db, &filter, Pagination { page: 9, page_size: 2 }).await?;
        assert_eq!(total, 5);
        assert!(rows.is_empty());

        let active_only = UserFilter {
            search: Some(marker.clone()),
            active: Some("active".into()),
            ..Default::default()
        };
        let (rows, total) = list_users(&db, &active_only, Pagination::default()).await?;
        assert_eq!(total, 3);
        assert!(rows.iter().all(|u| u.is_active));

        // Normalizing policy: a lowercase gender input matches stored "Male".
        let by_gender = UserFilter {
            search: Some(marker.clone()),
            gender: Some("male".into()),
            ..Default::default()
        };
        let (_, total) = list_users(&db, &by_gender, Pagination::default()).await?;
        assert_eq!(total, 5);

        for id in ids {
            delete_user(&db, id).await?;
        }
        Ok(())
    }
}
