pub mod guard;
pub mod interface;
pub mod process;
