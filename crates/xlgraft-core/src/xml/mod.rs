pub mod arena;
pub mod builder;
pub mod namespaces;
pub mod node;
pub mod parser;

pub use arena::XmlDocument;
pub use node::{XAttribute, XName, XmlNodeData};
pub use namespaces::{A, CT, PR, R, S, XDR, XMLNS};
