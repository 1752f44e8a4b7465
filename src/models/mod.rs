pub mod chunk;
pub mod document;
pub mod loaders;
pub mod question;
pub mod skill_level;

pub use chunk::{Chunk, RankedResult};
pub use document::DocumentRecord;
pub use loaders::{load_all_toml_files, load_toml_to_document, save_document_to_toml};
pub use question::{AnswerLetter, QuestionRecord};
pub use skill_level::SkillLevel;
