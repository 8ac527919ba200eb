use super::*;

mod link_maintenance;
mod scheduled_update;
