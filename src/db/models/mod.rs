mod attendance;
mod contact;
mod course;
mod feedback;
mod leave;
mod result;
mod session_year;
mod staff;
mod student;
mod subject;
mod user;

pub use attendance::*;
pub use contact::*;
pub use course::*;
pub use feedback::*;
pub use leave::*;
pub use result::*;
pub use session_year::*;
pub use staff::*;
pub use student::*;
pub use subject::*;
pub use user::*;
