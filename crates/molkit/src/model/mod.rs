pub mod atom;
pub mod structure;
pub mod serial;
pub mod lewis;
pub mod complete;
pub mod catalog;
