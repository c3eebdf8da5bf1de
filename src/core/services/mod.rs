pub mod deploy_service;
pub mod grouping;
pub mod name_validator;
pub mod structure_validator;
pub mod sync_service;
pub mod template_renderer;
pub mod tree_walker;
