pub mod alert_condition;

pub use alert_condition::AlertConditionResource;
