pub mod cmd_fmt;
pub mod cmd_get;
pub mod cmd_set;
pub mod cmd_show;
pub mod cmd_split;
pub mod cmd_validate;
pub mod common;
