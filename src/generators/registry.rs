use hashlink::LinkedHashMap;
use snafu::{OptionExt, Snafu};
use tracing::debug;

use crate::generators::{FileGenerator, Generator, GeneratorTrait, MoveGenerator, RemoveGenerator};

/// Collection holding the generators compiled into the binary.
pub const BUILTIN_COLLECTION: &str = "core";

/// Resolves generator identifiers to generators, grouped by collection.
#[derive(Debug, Clone, Default)]
pub struct GeneratorRegistry {
    collections: LinkedHashMap<String, Vec<Generator>>,
}

impl GeneratorRegistry {
    pub fn builtin() -> Self {
        let mut registry = Self::default();
        registry.register(BUILTIN_COLLECTION, Generator::File(FileGenerator));
        registry.register(BUILTIN_COLLECTION, Generator::Remove(RemoveGenerator));
        registry.register(BUILTIN_COLLECTION, Generator::Move(MoveGenerator));
        registry
    }

    pub fn register(&mut self, collection: &str, generator: Generator) {
        self.collections
            .entry(collection.to_string())
            .or_insert_with(Vec::new)
            .push(generator);
    }

    pub fn collections(&self) -> impl Iterator<Item = (&str, &[Generator])> {
        self.collections
            .iter()
            .map(|(name, generators)| (name.as_str(), generators.as_slice()))
    }

    /// Looks up `identifier`, written as `collection:generator` or just
    /// `generator`. Bare names are searched in `default_collection`, falling
    /// back to the built-in collection.
    pub fn resolve(
        &self,
        identifier: &str,
        default_collection: Option<&str>,
    ) -> Result<&Generator, LoaderError> {
        let (collection, name) = match identifier.split_once(':') {
            Some((collection, name)) => (collection, name),
            None => (default_collection.unwrap_or(BUILTIN_COLLECTION), identifier),
        };
        debug!("Resolving generator '{}' in collection '{}'", name, collection);

        self.collections
            .get(collection)
            .context(UnknownCollectionSnafu { collection })?
            .iter()
            .find(|generator| generator.name() == name)
            .context(UnknownGeneratorSnafu { collection, name })
    }
}

#[derive(Debug, Snafu)]
pub enum LoaderError {
    #[snafu(display("Collection '{}' is not installed", collection))]
    UnknownCollection { collection: String },
    #[snafu(display("Collection '{}' has no generator named '{}'", collection, name))]
    UnknownGenerator { collection: String, name: String },
}
