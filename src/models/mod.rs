// Persistent records and request payloads

pub mod admin;
pub mod assessment;
pub mod plan;
pub mod professional;
pub mod progress;
pub mod subscription;
pub mod support;
pub mod trainer;
pub mod training_plan;
pub mod user;

pub use admin::*;
pub use assessment::*;
pub use plan::*;
pub use professional::*;
pub use progress::*;
pub use subscription::*;
pub use support::*;
pub use trainer::*;
pub use training_plan::*;
pub use user::*;
