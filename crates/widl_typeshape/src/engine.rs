use crate::shape::{align8, align_to, saturating_add, saturating_mul, FieldShape, TypeShape, WireFormat};
use std::collections::{HashMap, HashSet};
use widl_analysis::{CompiledDecl, CompiledOrdinalMember, DeclId, Library, PrimitiveType, Type, TypeId, Typespace};
use widl_syntax::Strictness;

/// Computes wire-format shapes for every type and declaration reachable
/// from one library, memoizing by `(key, wire format)` so a type shared by
/// many members is only ever measured once. A declaration whose shape is
/// still being computed (the only way this happens is a self-reference
/// through a nullable field, since the declaration graph already rejects
/// non-nullable cycles) resolves to `TypeShape::PENDING` rather than
/// recursing forever; callers combining it with a real shape stay a safe
/// over-approximation.
pub struct Engine<'a> {
    library: &'a Library,
    typespace: &'a Typespace,
    decl_cache: HashMap<(DeclId, WireFormat), TypeShape>,
    decl_in_progress: HashSet<(DeclId, WireFormat)>,
    field_cache: HashMap<(DeclId, WireFormat), Vec<FieldShape>>,
    type_cache: HashMap<(TypeId, WireFormat), TypeShape>,
}

impl<'a> Engine<'a> {
    pub fn new(library: &'a Library, typespace: &'a Typespace) -> Self {
        Self {
            library,
            typespace,
            decl_cache: HashMap::new(),
            decl_in_progress: HashSet::new(),
            field_cache: HashMap::new(),
            type_cache: HashMap::new(),
        }
    }

    pub fn type_shape(&mut self, id: TypeId, wf: WireFormat) -> TypeShape {
        if let Some(shape) = self.type_cache.get(&(id, wf)) {
            return *shape;
        }
        let ty = self.typespace.get(id).clone();
        let shape = self.shape_of_type(&ty, wf);
        self.type_cache.insert((id, wf), shape);
        shape
    }

    /// Offsets and trailing padding of a struct declaration's members, in
    /// declaration order. Empty for any other declaration kind.
    pub fn field_shapes(&mut self, decl: DeclId, wf: WireFormat) -> Vec<FieldShape> {
        self.decl_shape(decl, wf);
        self.field_cache.get(&(decl, wf)).cloned().unwrap_or_default()
    }

    pub fn decl_shape(&mut self, decl: DeclId, wf: WireFormat) -> TypeShape {
        let key = (decl, wf);
        if let Some(shape) = self.decl_cache.get(&key) {
            return *shape;
        }
        if self.decl_in_progress.contains(&key) {
            return TypeShape::PENDING;
        }
        self.decl_in_progress.insert(key);
        let shape = self.compute_decl_shape(decl, wf);
        self.decl_in_progress.remove(&key);
        self.decl_cache.insert(key, shape);
        shape
    }

    fn shape_of_type(&mut self, ty: &Type, wf: WireFormat) -> TypeShape {
        match ty {
            Type::Primitive(p) => primitive_shape(*p),
            Type::Str { bound, .. } => string_shape(*bound),
            Type::Vector { element, bound, .. } => {
                let elem = self.shape_of_type(element, wf);
                vector_shape(&elem, *bound)
            }
            Type::Array { element, size } => {
                let elem = self.shape_of_type(element, wf);
                array_shape(&elem, *size)
            }
            Type::Handle { .. } => handle_shape(),
            Type::ClientEnd { .. } | Type::ServerEnd { .. } => handle_shape(),
            Type::Identifier { decl, nullable } => {
                let target = self.decl_shape(*decl, wf);
                if *nullable { nullable_wrapper(self.library.compiled(*decl), &target) } else { target }
            }
        }
    }

    fn compute_decl_shape(&mut self, id: DeclId, wf: WireFormat) -> TypeShape {
        let Some(compiled) = self.library.compiled(id) else {
            return TypeShape::PENDING;
        };
        match compiled {
            CompiledDecl::Bits { underlying, resource, .. } | CompiledDecl::Enum { underlying, resource, .. } => {
                let mut shape = self.type_shape(*underlying, wf);
                shape.is_resource = *resource;
                shape
            }
            CompiledDecl::Struct { members, resource } => {
                let member_shapes: Vec<TypeShape> = members.iter().map(|m| self.type_shape(m.ty, wf)).collect();
                let (shape, fields) = struct_shape(&member_shapes, *resource);
                self.field_cache.insert((id, wf), fields);
                shape
            }
            CompiledDecl::Table { members, resource } => {
                let used: Vec<(u64, TypeShape)> = members
                    .iter()
                    .filter_map(|m| match m {
                        CompiledOrdinalMember::Used { ordinal, ty, .. } => Some((*ordinal, self.type_shape(*ty, wf))),
                        CompiledOrdinalMember::Reserved(_) => None,
                    })
                    .collect();
                let max_ordinal = members
                    .iter()
                    .map(|m| match m {
                        CompiledOrdinalMember::Used { ordinal, .. } => *ordinal,
                        CompiledOrdinalMember::Reserved(ordinal) => *ordinal,
                    })
                    .max()
                    .unwrap_or(0);
                table_shape(&used, max_ordinal, *resource)
            }
            CompiledDecl::Union { members, strictness, resource } => {
                let used: Vec<TypeShape> = members
                    .iter()
                    .filter_map(|m| match m {
                        CompiledOrdinalMember::Used { ty, .. } => Some(self.type_shape(*ty, wf)),
                        CompiledOrdinalMember::Reserved(_) => None,
                    })
                    .collect();
                union_shape(&used, *strictness, *resource)
            }
            CompiledDecl::TypeAlias { target } => self.type_shape(*target, wf),
            CompiledDecl::Const { .. }
            | CompiledDecl::Protocol { .. }
            | CompiledDecl::Service { .. }
            | CompiledDecl::ResourceDefinition { .. } => TypeShape::scalar(0),
        }
    }
}

fn primitive_shape(p: PrimitiveType) -> TypeShape {
    TypeShape::scalar(p.byte_width())
}

fn handle_shape() -> TypeShape {
    TypeShape { inline_size: 4, alignment: 4, out_of_line: 0, handles: 1, depth: 0, has_padding: false, has_flexible_envelope: false, is_resource: true }
}

fn string_shape(bound: Option<u32>) -> TypeShape {
    let (out_of_line, has_padding) = match bound {
        Some(n) => (align8(n), n % 8 != 0),
        None => (u32::MAX, true),
    };
    TypeShape { inline_size: 16, alignment: 8, out_of_line, handles: 0, depth: 1, has_padding, has_flexible_envelope: false, is_resource: false }
}

fn vector_shape(elem: &TypeShape, bound: Option<u32>) -> TypeShape {
    let (out_of_line, handles, has_padding) = match bound {
        Some(n) => {
            let raw = saturating_mul(n, elem.inline_size);
            let out = saturating_add(align8(raw), saturating_mul(n, elem.out_of_line));
            (out, saturating_mul(n, elem.handles), raw % 8 != 0)
        }
        None => (u32::MAX, u32::MAX, true),
    };
    TypeShape {
        inline_size: 16,
        alignment: 8,
        out_of_line,
        handles,
        depth: elem.depth.saturating_add(1),
        has_padding,
        has_flexible_envelope: elem.has_flexible_envelope,
        is_resource: elem.is_resource,
    }
}

fn array_shape(elem: &TypeShape, size: u32) -> TypeShape {
    let stride = align_to(elem.inline_size, elem.alignment.max(1));
    TypeShape {
        inline_size: saturating_mul(size, stride),
        alignment: elem.alignment.max(1),
        out_of_line: saturating_mul(size, elem.out_of_line),
        handles: saturating_mul(size, elem.handles),
        depth: elem.depth,
        has_padding: elem.has_padding || stride != elem.inline_size,
        has_flexible_envelope: elem.has_flexible_envelope,
        is_resource: elem.is_resource,
    }
}

/// A nullable reference to a struct is boxed behind an 8-byte pointer; a
/// nullable table or union is already optional at the envelope level and
/// keeps its own shape unchanged.
fn nullable_wrapper(compiled: Option<&CompiledDecl>, target: &TypeShape) -> TypeShape {
    match compiled {
        Some(CompiledDecl::Table { .. }) | Some(CompiledDecl::Union { .. }) => *target,
        _ => TypeShape {
            inline_size: 8,
            alignment: 8,
            out_of_line: saturating_add(align8(target.inline_size), target.out_of_line),
            handles: target.handles,
            depth: target.depth.saturating_add(1),
            has_padding: true,
            has_flexible_envelope: target.has_flexible_envelope,
            is_resource: target.is_resource,
        },
    }
}

fn struct_shape(members: &[TypeShape], resource: bool) -> (TypeShape, Vec<FieldShape>) {
    if members.is_empty() {
        return (
            TypeShape { inline_size: 1, alignment: 1, out_of_line: 0, handles: 0, depth: 0, has_padding: false, has_flexible_envelope: false, is_resource: resource },
            Vec::new(),
        );
    }

    let struct_alignment = members.iter().map(|m| m.alignment.max(1)).max().unwrap_or(1);
    let mut fields = Vec::with_capacity(members.len());
    let mut cursor = 0u32;
    let mut out_of_line = 0u32;
    let mut handles = 0u32;
    let mut depth = 0u32;
    let mut has_padding = false;
    let mut has_flexible_envelope = false;
    let mut is_resource = resource;

    for (i, member) in members.iter().enumerate() {
        let offset = align_to(cursor, member.alignment.max(1));
        let end = saturating_add(offset, member.inline_size);
        let next_alignment = members.get(i + 1).map(|m| m.alignment.max(1)).unwrap_or(struct_alignment);
        let next_offset = align_to(end, next_alignment);
        let padding = next_offset.saturating_sub(end);

        fields.push(FieldShape { offset, padding });
        out_of_line = saturating_add(out_of_line, member.out_of_line);
        handles = saturating_add(handles, member.handles);
        depth = depth.max(member.depth);
        has_padding = has_padding || member.has_padding || padding > 0 || offset != cursor;
        has_flexible_envelope = has_flexible_envelope || member.has_flexible_envelope;
        is_resource = is_resource || member.is_resource;
        cursor = next_offset;
    }

    let shape = TypeShape {
        inline_size: cursor,
        alignment: struct_alignment,
        out_of_line,
        handles,
        depth,
        has_padding,
        has_flexible_envelope,
        is_resource,
    };
    (shape, fields)
}

fn table_shape(used: &[(u64, TypeShape)], max_ordinal: u64, resource: bool) -> TypeShape {
    let envelope_bytes = used.iter().fold(0u32, |acc, (_, m)| saturating_add(acc, saturating_add(align8(m.inline_size), m.out_of_line)));
    let max_ordinal_bytes = (max_ordinal.min(u32::MAX as u64) as u32).saturating_mul(16);
    TypeShape {
        inline_size: 16,
        alignment: 8,
        out_of_line: saturating_add(max_ordinal_bytes, envelope_bytes),
        handles: used.iter().fold(0u32, |acc, (_, m)| saturating_add(acc, m.handles)),
        depth: used.iter().map(|(_, m)| m.depth).max().unwrap_or(0).saturating_add(1),
        has_padding: true,
        has_flexible_envelope: true,
        is_resource: resource || used.iter().any(|(_, m)| m.is_resource),
    }
}

fn union_shape(used: &[TypeShape], strictness: Strictness, resource: bool) -> TypeShape {
    TypeShape {
        inline_size: 24,
        alignment: 8,
        out_of_line: used.iter().map(|m| saturating_add(align8(m.inline_size), m.out_of_line)).max().unwrap_or(0),
        handles: used.iter().map(|m| m.handles).max().unwrap_or(0),
        depth: used.iter().map(|m| m.depth).max().unwrap_or(0).saturating_add(1),
        has_padding: true,
        has_flexible_envelope: matches!(strictness, Strictness::Flexible) || used.iter().any(|m| m.has_flexible_envelope),
        is_resource: resource || used.iter().any(|m| m.is_resource),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use widl_analysis::testing::TestLibrary;

    #[test]
    fn primitive_struct_has_no_padding() {
        let lib = TestLibrary::compile(
            "test.shapes",
            "library test.shapes;\nstruct Point { x int32; y int32; };\n",
        );
        let id = *lib.library.name_to_id.get("Point").unwrap();
        let mut engine = Engine::new(&lib.library, &lib.typespace);
        let shape = engine.decl_shape(id, WireFormat::Envelope);
        assert_eq!(shape.inline_size, 8);
        assert_eq!(shape.alignment, 4);
        assert!(!shape.has_padding);
    }

    #[test]
    fn mixed_width_struct_gets_trailing_padding() {
        let lib = TestLibrary::compile(
            "test.shapes",
            "library test.shapes;\nstruct Mixed { tag uint8; value uint64; };\n",
        );
        let id = *lib.library.name_to_id.get("Mixed").unwrap();
        let mut engine = Engine::new(&lib.library, &lib.typespace);
        let shape = engine.decl_shape(id, WireFormat::Envelope);
        assert_eq!(shape.alignment, 8);
        assert_eq!(shape.inline_size, 16);
        assert!(shape.has_padding);
        let fields = engine.field_shapes(id, WireFormat::Envelope);
        assert_eq!(fields[0].offset, 0);
        assert_eq!(fields[0].padding, 7);
        assert_eq!(fields[1].offset, 8);
    }

    #[test]
    fn nullable_self_reference_saturates_instead_of_looping() {
        let lib = TestLibrary::compile(
            "test.shapes",
            "library test.shapes;\nstruct Node { value uint8; next Node?; };\n",
        );
        let id = *lib.library.name_to_id.get("Node").unwrap();
        let mut engine = Engine::new(&lib.library, &lib.typespace);
        let shape = engine.decl_shape(id, WireFormat::Envelope);
        assert_eq!(shape.out_of_line, u32::MAX);
    }
}
