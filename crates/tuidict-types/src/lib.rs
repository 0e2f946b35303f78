pub mod types;

pub use types::{
    DefinitionList, EmptyDefinitions, Language, Query, ResultCap, SearchId, collapse_whitespace,
};
