pub mod db;
pub mod migrations;
pub mod models;

pub use db::{get_data_dir, Database};
pub use models::{
    ParseSessionKindError, Profile, ProfileSettings, SessionKind, TimeRecord, TimerSnapshot,
};
