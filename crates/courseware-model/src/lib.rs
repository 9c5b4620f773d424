//! Shared courseware types: identifiers, quiz definitions, ratings and
//! service context.

pub mod context;
pub mod error;
pub mod ids;
pub mod quiz;
pub mod rating;

pub use context::ServiceContext;
pub use error::{ModelError, Result};
pub use ids::{AnswerId, BlockId, QuestionId, QuizId};
pub use quiz::{AnswerOption, Availability, QuestionSet, QuizMetadata, QuizQuestion};
pub use rating::{Rating, RatingSummary};
