//! # Semantic Spacetime Model
//!
//! DTOs that cross every boundary: registry ↔ engine ↔ record store ↔ user.
//!
//! Design rule: this module is pure data. No I/O, no state, no async.

pub mod key;
pub mod semantic;
pub mod association;
pub mod node;
pub mod link;
pub mod value;
pub mod property_map;

pub use key::{sanitize, is_sanitized, NodeRef};
pub use semantic::{SemanticType, LinkClass};
pub use association::{Association, default_associations};
pub use node::Node;
pub use link::{Link, link_key};
pub use value::{Value, PayloadComparator, StructuralEq, is_blank};
pub use property_map::DataMap;
