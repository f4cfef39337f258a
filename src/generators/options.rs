use hashlink::LinkedHashMap;
use snafu::{OptionExt, Snafu};

use crate::generators::GeneratorError;

/// Declaration of a single generator option.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OptionSchema {
    pub name: &'static str,
    pub description: &'static str,
    pub required: bool,
    /// Bare arguments are assigned to positional options in declaration order
    pub positional: bool,
    pub default: Option<&'static str>,
}

/// Option values handed to a generator, keyed by option name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GeneratorOptions {
    values: LinkedHashMap<String, String>,
}

impl GeneratorOptions {
    /// Parses command-line style arguments against `schema`.
    ///
    /// Accepts `--name=value`, `--name value`, bare `--flag` (meaning `true`)
    /// and positional values. Missing options take their declared default.
    pub fn parse(schema: &[OptionSchema], args: &[String]) -> Result<Self, OptionsError> {
        let mut values = LinkedHashMap::new();
        let mut positionals = schema.iter().filter(|option| option.positional);
        let mut args = args.iter().peekable();

        while let Some(arg) = args.next() {
            if let Some(flag) = arg.strip_prefix("--") {
                let (name, inline_value) = match flag.split_once('=') {
                    Some((name, value)) => (name, Some(value.to_string())),
                    None => (flag, None),
                };
                let option = schema
                    .iter()
                    .find(|option| option.name == name)
                    .context(UnknownOptionSnafu { name })?;
                let value = inline_value
                    .or_else(|| args.next_if(|next| !next.starts_with("--")).cloned())
                    .unwrap_or_else(|| "true".to_string());
                values.insert(option.name.to_string(), value);
            } else {
                let option = positionals
                    .find(|option| !values.contains_key(option.name))
                    .context(UnexpectedArgumentSnafu {
                        argument: arg.clone(),
                    })?;
                values.insert(option.name.to_string(), arg.clone());
            }
        }

        for option in schema {
            if values.contains_key(option.name) {
                continue;
            }
            match option.default {
                Some(default) => {
                    values.insert(option.name.to_string(), default.to_string());
                }
                None if option.required => {
                    return MissingOptionSnafu { name: option.name }.fail();
                }
                None => {}
            }
        }

        Ok(Self { values })
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.values.get(name).map(String::as_str)
    }

    /// Returns the value of an option the generator cannot work without.
    pub fn require(&self, name: &str) -> Result<&str, GeneratorError> {
        self.get(name)
            .ok_or_else(|| GeneratorError::MissingOptionError {
                name: name.to_string(),
            })
    }

    /// Interprets an option as a boolean flag; anything but `true` is false.
    pub fn flag(&self, name: &str) -> bool {
        self.get(name).is_some_and(|value| value == "true")
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.values
            .iter()
            .map(|(name, value)| (name.as_str(), value.as_str()))
    }
}

#[derive(Debug, Snafu)]
pub enum OptionsError {
    #[snafu(display("Unknown option '--{}'", name))]
    UnknownOption { name: String },
    #[snafu(display("Unexpected argument '{}'", argument))]
    UnexpectedArgument { argument: String },
    #[snafu(display("Missing required option '{}'", name))]
    MissingOption { name: String },
}
