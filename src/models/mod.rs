mod common;
mod validate;
mod admission;
mod booklist;
mod jobpost;
mod billing;
mod student;
mod session;

pub use common::*;
pub use validate::Validate;
pub use admission::*;
pub use booklist::*;
pub use jobpost::*;
pub use billing::*;
pub use student::*;
pub use session::*;
