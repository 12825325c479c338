//! Field containers
//!
//! A container groups fields under a title and decides, through its condition
//! tree, where it is displayed.

mod instance;
mod kind;
mod repository;

pub use instance::Container;
pub use kind::ContainerKind;
pub use repository::ContainerRepository;
