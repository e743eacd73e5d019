pub mod consultation;
pub mod patient;
pub mod reminder;
pub mod treatment;

pub use consultation::*;
pub use patient::*;
pub use reminder::*;
pub use treatment::*;
