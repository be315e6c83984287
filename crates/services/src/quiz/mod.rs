mod controller;
mod progress;
mod state;
mod view;

// Public API of the quiz session subsystem.
pub use crate::error::QuizError;
pub use controller::{
    ActivationOutcome, ActivationTicket, QuizSessionController, SubmitOutcome, SubmitTicket,
};
pub use progress::QuizProgress;
pub use state::{SessionPhase, SessionState};
pub use view::{OptionView, QuestionView, QuizView, ResultView};
