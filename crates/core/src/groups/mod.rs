//! Groups module - account groups that holdings roll up into.

mod groups_model;
mod groups_service;

pub use groups_model::{Group, NewGroup};
pub use groups_service::{GroupService, GroupServiceTrait};
