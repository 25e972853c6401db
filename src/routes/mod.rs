pub mod assessments;
pub mod auth;
pub mod certificates;
pub mod courses;
pub mod progress;

pub use assessments::configure_assessment_routes;
pub use auth::configure_auth_routes;
pub use certificates::configure_certificate_routes;
pub use courses::configure_course_routes;
pub use progress::configure_progress_routes;
