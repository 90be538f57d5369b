pub mod attribute;
pub mod constant;
pub mod decl;
pub mod literal;
pub mod name;
pub mod node;
pub mod token;
pub mod type_constructor;

pub use attribute::{Attribute, AttributeList};
pub use constant::Constant;
pub use decl::{
    Decl, LibraryDeclaration, Method, OrdinalMember, OrdinalMemberBody, ResourceProperty,
    ServiceMember, SourceTree, Strictness, StructMember, Using, ValueMember,
};
pub use literal::{Literal, LiteralValue};
pub use name::{CompoundIdentifier, Ident};
pub use node::ast_node::AstNode;
pub use node::dyn_node_ref::DynNodeRef;
pub use token::{Keyword, Punctuation, Token, TokenKind, Trivia, TriviaKind};
pub use type_constructor::TypeConstructor;
