mod enter_name;
mod state;
mod tutor;

pub use enter_name::EnterNameView;
pub use state::ViewError;
pub use tutor::TutorView;
