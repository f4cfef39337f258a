//! Generators and the registry that loads them.
//!
//! A generator receives parsed options and a [`VirtualTree`](crate::filesystem::VirtualTree)
//! and records the files it wants to create, change or remove.

mod file_generator;
mod generator;
mod move_generator;
mod options;
mod registry;
mod remove_generator;

pub use file_generator::FileGenerator;
pub use generator::{Generator, GeneratorError, GeneratorTrait};
pub use move_generator::MoveGenerator;
pub use options::{GeneratorOptions, OptionSchema, OptionsError};
pub use registry::{GeneratorRegistry, LoaderError};
pub use remove_generator::RemoveGenerator;
