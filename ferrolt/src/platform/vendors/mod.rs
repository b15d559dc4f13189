//! Built-in vendor platforms.

pub mod generic;
pub mod huawei;
