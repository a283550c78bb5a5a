// Models module for data structures
pub mod bootstrap_config;
pub mod connection_parameters;
pub mod pipeline_report;
pub mod virtual_environment;
