mod auth_type;
mod item;
mod list_key;
mod names;

pub use auth_type::AuthType;
pub use item::{Item, ItemId, SessionToken};
pub use list_key::ListKey;
pub use names::{is_graphql_name, GeneratedNames, ListNaming};
