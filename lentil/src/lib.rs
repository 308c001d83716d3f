pub mod agent;
pub mod closed_form;
pub mod config;
pub mod environment;
pub mod errors;
pub mod factor_analysis;
pub mod gradient;
pub mod grid;
pub mod lentil_common;
pub mod linalg;
pub mod linear_gaussian;
pub mod posterior;
pub mod regression;
