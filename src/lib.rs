pub mod app;
pub mod app_state;
pub mod audio;
pub mod config;
pub mod console;
pub mod context;
pub mod features;
pub mod lifecycle;
pub mod quiz;
pub mod settings;
pub mod signal;
pub mod timer;
pub mod words;

pub use app::App;
pub use app_state::{AppState, AppStateManager};
pub use context::AppContext;
