pub mod dashboard;
pub mod domain;
pub mod managers;
pub mod optimistic_list;
pub mod seed;
pub mod skills_manager;

pub use dashboard::DashboardService;
pub use managers::{Manages, PortfolioManagers};
pub use optimistic_list::{ListPhase, ManagerError, OptimisticList};
pub use skills_manager::{CascadePolicy, SkillsManager};
