pub mod file_kind;
pub mod input_collector;

pub use file_kind::FileKind;
pub use input_collector::{InputCollector, InputFile, InputSource};
