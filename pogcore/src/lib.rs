//! Reader and writer for proof obligation (POG) documents.
//!
//! A POG document holds the type table, the shared hypothesis bundles ("defines") and
//! the groups of goals produced for a B model. [`reader::read_path`] turns a document
//! into the [`pog::Pog`] model; [`writer::write_document`] turns it back, emitting the
//! type table last. Other traversals plug into [`visitor::PogVisitor`].

pub mod magic;
pub mod markup;
pub mod pog;
pub mod pred;
pub mod reader;
pub mod types;
pub mod utils;
pub mod visitor;
pub mod writer;

pub use pog::{Define, DefineItem, PO, POGroup, Pog, Set};
pub use pred::Pred;
pub use reader::{read_document, read_path, read_str};
pub use types::{BType, TypedVar};
pub use utils::{
    conf::{CodecConfig, ReaderConfig, WriterConfig},
    error::{ErrorCategory, PogError, PogResult},
};
pub use visitor::{PogStats, PogVisitor, Visitable};
pub use writer::{PogXmlWriter, write_document, write_string};
