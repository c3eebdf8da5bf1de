pub mod config_tree;
pub mod remote;
pub mod report;
