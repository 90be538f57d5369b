pub mod attributes;
pub mod compile;
pub mod constant;
pub mod graph;
pub mod library;
pub mod libraries;
pub mod ordinal;
pub mod resolver;
#[cfg(feature = "testing")]
pub mod testing;
pub mod typeconv;
pub mod typespace;

pub use compile::compile_library;
pub use constant::ConstantValue;
pub use graph::DeclGraph;
pub use library::{CompiledDecl, CompiledMethod, CompiledOrdinalMember, CompiledStructMember, DeclId, Library, ResolvedUsing};
pub use libraries::Libraries;
pub use resolver::{resolve, ResolvedRef};
pub use typespace::{HandleSubtype, PrimitiveType, Type, TypeId, Typespace};
