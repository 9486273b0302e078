mod ids;
mod persona;
mod question;
mod session;
mod verdict;

pub use ids::{ClusterId, TaskId};
pub use persona::{Persona, resolve_persona};
pub use question::Question;
pub use session::{SessionContext, SessionContextError};
pub use verdict::SubmissionVerdict;
