pub mod helpers;
pub mod history;
pub mod profile;
pub mod run;
pub mod settings;
pub mod stats;
