mod bootstrap;
mod jewel_field;
mod loop_runner;

pub(crate) use bootstrap::build_config;
pub(crate) use loop_runner::run;
