// Business logic services

pub mod admin_service;
pub mod assessment_service;
pub mod email_service;
pub mod plan_service;
pub mod professional_service;
pub mod progress_service;
pub mod subscription_service;
pub mod trainer_service;
pub mod training_plan_service;
pub mod upload_service;
pub mod user_service;

pub use admin_service::AdminService;
pub use assessment_service::AssessmentService;
pub use email_service::{EmailError, EmailService, OutgoingEmail};
pub use plan_service::PlanService;
pub use professional_service::ProfessionalService;
pub use progress_service::ProgressService;
pub use subscription_service::SubscriptionService;
pub use trainer_service::TrainerService;
pub use training_plan_service::TrainingPlanService;
pub use upload_service::{ImageKind, ImageUpload, UploadError, UploadService};
pub use user_service::UserService;
