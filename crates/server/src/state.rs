use sea_orm::DatabaseConnection;

/// Shared handler state. The store handle is constructed once at startup and
/// injected here; handlers never reach for ambient globals.
#[derive(Clone)]
pub struct AppState {
    pub db: DatabaseConnection,
}
