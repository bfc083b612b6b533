pub mod engagement_planner;

pub use engagement_planner::EngagementPlanner;
