pub mod report_service;
pub mod session_service;

pub use report_service::ReportService;
pub use session_service::SessionStore;
