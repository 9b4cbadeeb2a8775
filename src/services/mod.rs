pub mod group_service;
pub mod progress_service;
pub mod spreadsheet_service;
pub mod training_service;

pub use group_service::GroupService;
pub use progress_service::{ProgressReport, ProgressService};
pub use spreadsheet_service::{SheetRow, SheetUpdateSummary, SpreadsheetService};
pub use training_service::TrainingService;
