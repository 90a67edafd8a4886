pub mod animation;
pub mod ar_scan;
pub mod dictionary;
pub mod menu;
pub mod quiz_panel;

pub use ar_scan::{ArScan, ScanView};
pub use dictionary::{Dictionary, DictionaryBack, DictionaryMode};
pub use menu::{Menu, Panel};
pub use quiz_panel::QuizPanel;
