mod operation;
mod path;
mod property;
mod response;
mod schema;
mod types;

pub use operation::{HttpVerb, Method, ParamLocation, QueryParam};
pub use path::ApiPath;
pub use property::{Constraints, Property, PropertyRef};
pub use response::{ResponseKind, ResponseSchema};
pub use schema::Schema;
pub use types::{SchemaKind, SemanticType};
