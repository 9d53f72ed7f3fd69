mod attendance_repository;
mod curriculum_repository;
mod dashboard_repository;
mod operations_repository;
mod user_repository;

pub use attendance_repository::AttendanceRepository;
pub use curriculum_repository::{CurriculumRepository, SubjectScope};
pub use dashboard_repository::{ChartItem, DashboardCounts, DashboardRepository, StaffCards};
pub use operations_repository::OperationsRepository;
pub use user_repository::UserRepository;
