mod answers;
mod ids;
mod notice;
mod question;
mod topic;
mod verdict;

pub use answers::AnswerMap;
pub use ids::{OptionId, ParseIdError, QuestionId, SessionId};
pub use notice::{Notice, NoticeKind, NoticeSeverity};
pub use question::{AnswerOption, Question, QuestionError, validate_question_set};
pub use topic::{Topic, TopicError};
pub use verdict::{PassPolicy, PassPolicyError, Verdict};
