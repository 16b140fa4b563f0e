pub mod range;
pub mod inline;
pub mod element;
pub mod structure;
pub mod document;
pub mod conf;

pub use range::Range;
pub use inline::{Inline, NoteKind, StyleKind};
pub use element::{Element, KeyValue, Line};
pub use structure::{ElementIndex, Snippet, Structure, StructureContent, StructureScene, StructureSection};
pub use document::Document;
pub use conf::{Conf, HiddenElements};
