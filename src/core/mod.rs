mod engine;
mod types;
mod validate;

pub use engine::project;
pub use types::{Outcome, Outlook, RetirementParameters};
pub use validate::{RawFields, RawValue, ValidationError, validate};
