pub mod moderate;
pub mod status;
