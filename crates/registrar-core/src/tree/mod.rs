//! Generic attributed trees and the markup codec that produces them.

pub mod codec;
pub mod path;
pub mod value;

pub use codec::{decode, encode, encode_pretty, CodecError};
pub use path::{FieldPath, PathError, Segment};
pub use value::{Node, TreeValue};
