pub mod api;
pub mod fitness;
pub mod health;
pub mod journal;
pub mod quick;
