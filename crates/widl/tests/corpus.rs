//! End-to-end scenarios exercising the whole seven-phase pipeline from
//! inline source strings: ordinal computation, wire typeshapes, constant
//! range checks, attribute validation, and declaration-graph cycles.

use widl_analysis::testing::TestLibrary;
use widl_analysis::CompiledDecl;
use widl_typeshape::{compute_library_shapes, constraints, Engine, WireFormat};

#[test]
fn out_of_range_constant_is_rejected() {
    let t = TestLibrary::compile("corpus.consts", "library corpus.consts;\n\nconst A uint64 = -42;\n");
    assert!(t.reporter.has_errors());
    let msg = t.reporter.diagnostics().iter().map(|d| d.message.clone()).collect::<Vec<_>>().join("\n");
    assert!(msg.contains("-42 is out of range for type uint64"), "{msg}");
}

#[test]
fn duplicate_attribute_on_a_protocol_is_rejected() {
    let t = TestLibrary::compile(
        "corpus.attrs",
        "library corpus.attrs;\n\n@dup(\"first\")\n@dup(\"second\")\nprotocol A { MethodA(); };\n",
    );
    assert!(t.reporter.has_errors());
    let msg = t.reporter.diagnostics().iter().map(|d| d.message.clone()).collect::<Vec<_>>().join("\n");
    assert!(msg.contains("duplicate attribute with name 'dup'"), "{msg}");
}

#[test]
fn selector_on_a_struct_is_rejected_as_misplaced() {
    let t = TestLibrary::compile("corpus.placement", "library corpus.placement;\n\n@selector(\"x\")\nstruct S {\n x int32;\n};\n");
    assert!(t.reporter.has_errors());
    let msg = t.reporter.diagnostics().iter().map(|d| d.message.clone()).collect::<Vec<_>>().join("\n");
    assert!(msg.contains("cannot be placed on struct"), "{msg}");
}

#[test]
fn selector_override_resolves_an_ordinal_collision() {
    let colliding = TestLibrary::compile(
        "corpus.collide",
        r#"
        library corpus.collide;

        protocol A {
            @selector("corpus.collide/A.Same")
            MethodA();
            @selector("corpus.collide/A.Same")
            MethodB();
        };
        "#,
    );
    assert!(colliding.reporter.has_errors());

    let resolved = TestLibrary::compile(
        "corpus.collide",
        r#"
        library corpus.collide;

        protocol A {
            @selector("corpus.collide/A.Same")
            MethodA();
            @selector("corpus.collide/A.Different")
            MethodB();
        };
        "#,
    );
    assert!(!resolved.reporter.has_errors(), "{:?}", resolved.reporter.diagnostics());
}

#[test]
fn round_trip_ordinal_matches_the_selector_digest() {
    let t = TestLibrary::compile(
        "corpus.ordinals",
        "library corpus.ordinals;\n\nprotocol Calculator {\n Add(a int32, b int32) -> (sum int32);\n};\n",
    );
    assert!(!t.reporter.has_errors(), "{:?}", t.reporter.diagnostics());
    let id = *t.library.name_to_id.get("Calculator").unwrap();
    let Some(CompiledDecl::Protocol { methods, .. }) = t.library.compiled(id) else { panic!("not a protocol") };
    let method = &methods[0];
    assert_eq!(method.selector, "corpus.ordinals/Calculator.Add");
    assert_eq!(method.ordinal, widl_analysis::ordinal::compute_ordinal(&method.selector));
    assert_eq!(method.ordinal & 0x8000_0000_0000_0000, 0);
}

#[test]
fn table_with_one_bool_field_has_the_expected_envelope_shape() {
    let t = TestLibrary::compile("corpus.shapes", "library corpus.shapes;\n\ntable T {\n 1: b bool;\n};\n");
    assert!(!t.reporter.has_errors(), "{:?}", t.reporter.diagnostics());
    let id = *t.library.name_to_id.get("T").unwrap();
    let mut engine = Engine::new(&t.library, &t.typespace);
    let shape = engine.decl_shape(id, WireFormat::Envelope);
    assert_eq!(shape.inline_size, 16);
    assert_eq!(shape.alignment, 8);
    assert_eq!(shape.out_of_line, 24);
    assert_eq!(shape.handles, 0);
    assert_eq!(shape.depth, 2);
    assert!(shape.has_padding);
    assert!(shape.has_flexible_envelope);
}

#[test]
fn flexible_union_with_a_nested_vector_has_the_expected_envelope_shape() {
    let t = TestLibrary::compile(
        "corpus.shapes",
        "library corpus.shapes;\n\nflexible union U {\n 1: b bool;\n 2: v vector<vector<int32>:5>:6;\n};\n",
    );
    assert!(!t.reporter.has_errors(), "{:?}", t.reporter.diagnostics());
    let id = *t.library.name_to_id.get("U").unwrap();
    let mut engine = Engine::new(&t.library, &t.typespace);
    let shape = engine.decl_shape(id, WireFormat::Envelope);
    assert_eq!(shape.inline_size, 24);
    assert_eq!(shape.alignment, 8);
    assert_eq!(shape.out_of_line, 256);
    assert_eq!(shape.depth, 3);
    assert!(shape.has_flexible_envelope);
}

#[test]
fn a_struct_recursing_through_a_nullable_hop_compiles_and_saturates() {
    let t = TestLibrary::compile("corpus.cycle", "library corpus.cycle;\n\nstruct S {\n opt S?;\n};\n");
    assert!(!t.reporter.has_errors(), "{:?}", t.reporter.diagnostics());
    let id = *t.library.name_to_id.get("S").unwrap();
    let mut engine = Engine::new(&t.library, &t.typespace);
    let shape = engine.decl_shape(id, WireFormat::Envelope);
    assert!(!shape.is_resource);
    assert_eq!(shape.out_of_line, u32::MAX);
    assert_eq!(shape.depth, u32::MAX);
}

#[test]
fn a_handle_inside_a_table_makes_both_the_table_and_its_container_a_resource() {
    let t = TestLibrary::compile(
        "corpus.resource",
        "library corpus.resource;\n\ntable T {\n 1: h handle;\n};\n\nstruct U {\n t T;\n};\n",
    );
    assert!(!t.reporter.has_errors(), "{:?}", t.reporter.diagnostics());
    let t_id = *t.library.name_to_id.get("T").unwrap();
    let u_id = *t.library.name_to_id.get("U").unwrap();
    let mut engine = Engine::new(&t.library, &t.typespace);
    let t_shape = engine.decl_shape(t_id, WireFormat::Envelope);
    let u_shape = engine.decl_shape(u_id, WireFormat::Envelope);
    assert!(t_shape.is_resource);
    assert!(t_shape.handles >= 1);
    assert!(u_shape.is_resource);
    assert!(u_shape.handles >= 1);
}

#[test]
fn max_bytes_over_budget_is_rejected_with_both_sizes_in_the_message() {
    let t = TestLibrary::compile("corpus.bounds", "library corpus.bounds;\n\n@maxbytes(27)\ntable T {\n 1: b bool;\n};\n");
    assert!(!t.reporter.has_errors(), "{:?}", t.reporter.diagnostics());
    let shapes = compute_library_shapes(&t.library, &t.typespace);
    let mut reporter = widl_diagnostics::Reporter::new();
    constraints::check(&t.library, &shapes, &mut reporter);
    assert!(reporter.has_errors());
    let msg = reporter.diagnostics()[0].message.clone();
    assert!(msg.contains("too large: only 27 bytes allowed, but 40 bytes found"), "{msg}");
}

#[test]
fn struct_field_offsets_respect_their_own_alignment() {
    let t = TestLibrary::compile(
        "corpus.align",
        "library corpus.align;\n\nstruct Mixed {\n tag uint8;\n value uint64;\n};\n",
    );
    assert!(!t.reporter.has_errors(), "{:?}", t.reporter.diagnostics());
    let id = *t.library.name_to_id.get("Mixed").unwrap();
    let mut engine = Engine::new(&t.library, &t.typespace);
    let shape = engine.decl_shape(id, WireFormat::Envelope);
    let fields = engine.field_shapes(id, WireFormat::Envelope);
    assert_eq!(shape.inline_size % shape.alignment, 0);
    for field in &fields {
        assert_eq!(field.offset % 4, 0, "padding should bring every field onto a natural boundary");
    }
}

#[test]
fn a_non_nullable_self_reference_is_rejected_as_a_cycle() {
    let t = TestLibrary::compile("corpus.badcycle", "library corpus.badcycle;\n\nstruct S {\n next S;\n};\n");
    assert!(t.reporter.has_errors());
}

#[test]
fn declaration_order_is_deterministic_across_runs() {
    let src = "library corpus.determinism;\n\nconst A uint32 = 1;\n\nstruct B {\n x int32;\n};\n\nconst C uint32 = 2;\n";
    let first = TestLibrary::compile("corpus.determinism", src);
    let second = TestLibrary::compile("corpus.determinism", src);
    assert_eq!(first.library.topological_order, second.library.topological_order);

    let first_ir = widl_ir::to_json(&first.library, &first.typespace).unwrap();
    let second_ir = widl_ir::to_json(&second.library, &second.typespace).unwrap();
    assert_eq!(first_ir, second_ir);
}

#[test]
fn typeshape_is_idempotent_across_two_engine_instances() {
    let t = TestLibrary::compile("corpus.idempotent", "library corpus.idempotent;\n\nstruct Point {\n x int32;\n y int32;\n};\n");
    let id = *t.library.name_to_id.get("Point").unwrap();
    let mut first = Engine::new(&t.library, &t.typespace);
    let mut second = Engine::new(&t.library, &t.typespace);
    assert_eq!(first.decl_shape(id, WireFormat::Envelope), second.decl_shape(id, WireFormat::Envelope));
}

#[test]
fn a_session_compiles_a_library_and_emits_its_ir_through_the_facade() {
    let mut session = widl::Session::new();
    let mut reporter = widl_diagnostics::Reporter::new();
    session
        .compile_library(
            "corpus.facade",
            &[("facade.widl", "library corpus.facade;\n\nstruct Point {\n x int32;\n y int32;\n};\n")],
            &mut reporter,
        )
        .unwrap();
    assert!(!reporter.has_errors(), "{:?}", reporter.diagnostics());
    let json = session.ir_json("corpus.facade").unwrap();
    assert!(json.contains("\"Point\""));

    let decl = session.library("corpus.facade").unwrap();
    let point_id = *decl.name_to_id.get("Point").unwrap();
    let Some(CompiledDecl::Struct { members, .. }) = decl.compiled(point_id) else { panic!("not a struct") };
    assert_eq!(members.len(), 2);
    assert!(session.shapes("corpus.facade").unwrap().static_shapes.contains_key(&point_id));
}
