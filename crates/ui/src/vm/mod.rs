mod tutor_vm;

pub use tutor_vm::{OutcomeKind, TutorIntent, TutorModal, TutorVm};
