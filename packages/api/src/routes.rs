pub mod dashboard;
pub mod health;
pub mod index;
pub mod predict;
