pub mod db;
pub mod users;
