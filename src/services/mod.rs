pub mod assessments;
pub mod auth;
pub mod certificates;
pub mod courses;
pub mod progress;

pub use assessments::AssessmentService;
pub use auth::AuthService;
pub use certificates::CertificateService;
pub use courses::CourseService;
pub use progress::ProgressService;
