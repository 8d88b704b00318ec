//! Filtered-query construction for the `users` table.
//!
//! Raw filter inputs compose into a single `Select` through the store
//! client's expression API, so caller-supplied text always travels the
//! parameter path and never becomes predicate syntax. The search input is
//! split on whitespace; each token must match at least one of first name,
//! last name or email (case-insensitive substring), and tokens combine
//! conjunctively.

use models::users;
use sea_orm::sea_query::extension::postgres::PgExpr;
use sea_orm::sea_query::Expr;
use sea_orm::{ColumnTrait, Condition, EntityTrait, QueryFilter, Select};

/// Raw filter inputs as they arrive from the query string.
#[derive(Clone, Debug, Default)]
pub struct UserFilter {
    /// "active" selects active rows; any other present value selects inactive.
    pub active: Option<String>,
    /// Matched for equality against the normalized stored value.
    pub gender: Option<String>,
    /// Free-text search over first name, last name and email.
    pub search: Option<String>,
}

/// Compose the predicate set for a users query. Absence of all three inputs
/// yields an unfiltered select over the full table. The caller decides the
/// projection: exact count or offset/limit row fetch.
pub fn build_filtered_query(filter: &UserFilter) -> Select<users::Entity> {
    let mut query = users::Entity::find();

    if let Some(active) = filter.active.as_deref() {
        query = query.filter(users::Column::IsActive.eq(active == "active"));
    }

    if let Some(gender) = filter.gender.as_deref().filter(|g| !g.is_empty()) {
        query = query.filter(users::Column::Gender.eq(normalize_gender(gender)));
    }

    if let Some(search) = filter.search.as_deref() {
        for token in search.split_whitespace() {
            let pattern = format!("%{}%", escape_like(token));
            query = query.filter(
                Condition::any()
                    .add(Expr::col((users::Entity, users::Column::FirstName)).ilike(pattern.as_str()))
                    .add(Expr::col((users::Entity, users::Column::LastName)).ilike(pattern.as_str()))
                    .add(Expr::col((users::Entity, users::Column::Email)).ilike(pattern.as_str())),
            );
        }
    }

    query
}

/// Canonical form for stored and filtered gender values: lowercase with
/// hyphens as spaces, `male`/`female` capitalized, anything else title-cased
/// per word. Applied on the write path as well, so the equality filter can
/// never case-miss stored data.
pub fn normalize_gender(input: &str) -> String {
    let normalized = input.replace('-', " ").to_lowercase();
    match normalized.as_str() {
        "male" => "Male".to_string(),
        "female" => "Female".to_string(),
        _ => title_case(&normalized),
    }
}

fn title_case(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut prev_alpha = false;
    for c in s.chars() {
        if prev_alpha {
            out.push(c);
        } else {
            out.extend(c.to_uppercase());
        }
        prev_alpha = c.is_alphabetic();
    }
    out
}

/// Escape LIKE wildcards in a search token so `%`, `_` and the escape
/// character itself match literally.
fn escape_like(token: &str) -> String {
    token
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_")
}

#[cfg(test)]
mod tests {
    use super::*;
    use sea_orm::{DbBackend, QueryTrait};

    fn sql(filter: &UserFilter) -> String {
        build_filtered_query(filter).build(DbBackend::Postgres).to_string()
    }

    #[test]
    fn no_filters_yields_unfiltered_query() {
        let s = sql(&UserFilter::default());
        assert!(!s.contains("WHERE"), "unexpected predicate in: {s}");
    }

    #[test]
    fn active_token_maps_to_boolean_equality() {
        let s = sql(&UserFilter { active: Some("active".into()), ..Default::default() });
        assert!(s.contains(r#""is_active" = TRUE"#), "missing active predicate in: {s}");

        let s = sql(&UserFilter { active: Some("inactive".into()), ..Default::default() });
        assert!(s.contains(r#""is_active" = FALSE"#), "missing inactive predicate in: {s}");
    }

    #[test]
    fn gender_filter_uses_normalized_value() {
        let s = sql(&UserFilter { gender: Some("male".into()), ..Default::default() });
        assert!(s.contains("'Male'"), "gender not normalized in: {s}");
    }

    #[test]
    fn empty_gender_is_ignored() {
        let s = sql(&UserFilter { gender: Some(String::new()), ..Default::default() });
        assert!(!s.contains("WHERE"), "empty gender should add no predicate: {s}");
    }

    #[test]
    fn search_builds_case_insensitive_disjunction_per_token() {
        let s = sql(&UserFilter { search: Some("bob smith".into()), ..Default::default() });
        assert!(s.contains("ILIKE"), "expected ILIKE in: {s}");
        assert!(s.contains("%bob%"), "missing first token in: {s}");
        assert!(s.contains("%smith%"), "missing second token in: {s}");
        assert!(s.contains("OR"), "tokens should expand to disjunctions: {s}");
        assert!(s.contains("AND"), "token groups should combine conjunctively: {s}");
    }

    #[test]
    fn search_tokens_escape_like_wildcards() {
        let s = sql(&UserFilter { search: Some("100%".into()), ..Default::default() });
        assert!(s.contains(r"\%"), "wildcard not escaped in: {s}");
        assert!(!s.contains("%100%%"), "raw wildcard leaked into pattern: {s}");
    }

    #[test]
    fn filters_compose_independently() {
        let s = sql(&UserFilter {
            active: Some("active".into()),
            gender: Some("female".into()),
            search: Some("ann".into()),
        });
        assert!(s.contains(r#""is_active" = TRUE"#));
        assert!(s.contains("'Female'"));
        assert!(s.contains("%ann%"));
    }

    #[test]
    fn normalize_gender_canonical_forms() {
        assert_eq!(normalize_gender("male"), "Male");
        assert_eq!(normalize_gender("MALE"), "Male");
        assert_eq!(normalize_gender("Female"), "Female");
        assert_eq!(normalize_gender("non-binary"), "Non Binary");
        assert_eq!(normalize_gender("prefer not to say"), "Prefer Not To Say");
    }
}
