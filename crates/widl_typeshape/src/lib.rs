pub mod constraints;
pub mod engine;
pub mod shape;

pub use engine::Engine;
pub use shape::{align8, FieldShape, TypeShape, WireFormat};

use std::collections::HashMap;
use widl_analysis::{DeclId, Library, Typespace};

/// Every declaration's computed shape under both wire formats, keyed for
/// cheap lookup by the IR emitter and by the attribute-constraint pass.
pub struct LibraryShapes {
    pub static_shapes: HashMap<DeclId, TypeShape>,
    pub envelope_shapes: HashMap<DeclId, TypeShape>,
    pub fields: HashMap<DeclId, Vec<FieldShape>>,
}

/// Runs the shape engine over every declaration of a compiled library, in
/// its own topological order, for both wire formats. This is phase 6 of the
/// pipeline: it must only run once every declaration has a `CompiledDecl`.
pub fn compute_library_shapes(library: &Library, typespace: &Typespace) -> LibraryShapes {
    log::debug!("computing typeshapes for library {}", library.name);
    let mut engine = Engine::new(library, typespace);
    let mut static_shapes = HashMap::new();
    let mut envelope_shapes = HashMap::new();
    let mut fields = HashMap::new();

    for &id in &library.topological_order {
        let envelope = engine.decl_shape(id, WireFormat::Envelope);
        let field_shapes = engine.field_shapes(id, WireFormat::Envelope);
        envelope_shapes.insert(id, envelope);
        if !field_shapes.is_empty() {
            fields.insert(id, field_shapes);
        }
        let static_shape = engine.decl_shape(id, WireFormat::Static);
        static_shapes.insert(id, static_shape);
    }

    LibraryShapes { static_shapes, envelope_shapes, fields }
}
