pub mod config_ops;
pub mod lm_ops;
pub mod table_ops;
pub mod translate_ops;
