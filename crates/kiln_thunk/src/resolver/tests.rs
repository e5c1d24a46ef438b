use super::*;
use crate::CompiledThunk;
use pretty_assertions::assert_eq;

#[derive(Debug, Default, PartialEq)]
struct Point {
    x: i32,
    y: i32,
}

#[derive(Debug, Clone, PartialEq)]
struct Circle {
    radius: i32,
}

#[derive(Debug, PartialEq)]
struct Canvas {
    via: &'static str,
}

fn point_resolver() -> (MetadataResolver, TypeIdentity) {
    let mut registry = TypeRegistry::new();
    let mut table = ConstructorTable::new();
    let point = table
        .define::<Point>(&mut registry)
        .with_default()
        .public(&[TypeIdentity::I32], |args| {
            let v = *args.get::<i32>(0)?;
            Ok(Point { x: v, y: v })
        })
        .public(&[TypeIdentity::I32, TypeIdentity::I32], |args| {
            Ok(Point {
                x: *args.get::<i32>(0)?,
                y: *args.get::<i32>(1)?,
            })
        })
        .finish();
    (MetadataResolver::new(registry, table), point)
}

struct Shapes {
    registry: TypeRegistry,
    table: ConstructorTable,
    circle: TypeIdentity,
    shape: TypeIdentity,
    drawable: TypeIdentity,
    canvas: TypeIdentity,
}

fn shapes() -> Shapes {
    let mut registry = TypeRegistry::new();
    let shape = registry.register_abstract("Shape");
    let drawable = registry.register_abstract("Drawable");
    let circle = registry.register::<Circle>();
    registry.add_supertype(circle, shape);
    registry.add_supertype(circle, drawable);
    let mut table = ConstructorTable::new();
    let canvas = table.define::<Canvas>(&mut registry).identity();
    Shapes {
        registry,
        table,
        circle,
        shape,
        drawable,
        canvas,
    }
}

fn shape_of(params: &[TypeIdentity]) -> ConstructibleShape {
    ConstructibleShape::of(params)
}

#[test]
fn resolves_by_exact_signature() {
    let (resolver, point) = point_resolver();

    let one = resolver.resolve(point, &shape_of(&[TypeIdentity::I32])).unwrap();
    let two = resolver
        .resolve(point, &shape_of(&[TypeIdentity::I32, TypeIdentity::I32]))
        .unwrap();
    let none = resolver.resolve(point, &ConstructibleShape::parameterless()).unwrap();

    let built: Point = CompiledThunk::compile(&one).invoke_with_as(&[&7i32]).unwrap();
    assert_eq!(built, Point { x: 7, y: 7 });
    let built: Point = CompiledThunk::compile(&two).invoke_with_as(&[&1i32, &2i32]).unwrap();
    assert_eq!(built, Point { x: 1, y: 2 });
    let built: Point = CompiledThunk::compile(&none).invoke_as().unwrap();
    assert_eq!(built, Point::default());
}

#[test]
fn unmatched_shape_is_reported() {
    let (resolver, point) = point_resolver();
    let shape = shape_of(&[TypeIdentity::STRING]);

    assert_eq!(
        resolver.resolve(point, &shape).err(),
        Some(ThunkError::NoMatchingConstructor { ty: point, shape })
    );
}

#[test]
fn type_without_constructors_is_unmatched() {
    let (resolver, _) = point_resolver();

    assert!(matches!(
        resolver.resolve(TypeIdentity::BOOL, &ConstructibleShape::parameterless()),
        Err(ThunkError::NoMatchingConstructor { .. })
    ));
}

#[test]
fn private_constructors_never_resolve() {
    let mut registry = TypeRegistry::new();
    let mut table = ConstructorTable::new();
    let point = table
        .define::<Point>(&mut registry)
        .private(&[], |_| Ok(Point::default()))
        .finish();
    let resolver =
        MetadataResolver::new(registry, table).with_policy(MatchPolicy::Assignable);

    assert!(matches!(
        resolver.resolve(point, &ConstructibleShape::parameterless()),
        Err(ThunkError::NoMatchingConstructor { .. })
    ));
}

#[test]
fn duplicate_signatures_are_ambiguous() {
    let mut registry = TypeRegistry::new();
    let mut table = ConstructorTable::new();
    let point = table
        .define::<Point>(&mut registry)
        .with_default()
        .with_default()
        .finish();
    let resolver = MetadataResolver::new(registry, table);

    assert_eq!(
        resolver.resolve(point, &ConstructibleShape::parameterless()).err(),
        Some(ThunkError::AmbiguousConstructor {
            ty: point,
            shape: ConstructibleShape::parameterless(),
            candidates: 2
        })
    );
}

#[test]
fn exact_policy_rejects_supertype_parameters() {
    let mut fx = shapes();
    fx.table
        .define::<Canvas>(&mut fx.registry)
        .public(&[fx.shape], |_| Ok(Canvas { via: "shape" }))
        .finish();
    let resolver = MetadataResolver::new(fx.registry, fx.table);

    assert_eq!(resolver.policy(), MatchPolicy::Exact);
    assert!(matches!(
        resolver.resolve(fx.canvas, &shape_of(&[fx.circle])),
        Err(ThunkError::NoMatchingConstructor { .. })
    ));
}

#[test]
fn assignable_policy_accepts_supertype_parameters() {
    let mut fx = shapes();
    fx.table
        .define::<Canvas>(&mut fx.registry)
        .public(&[fx.shape], |args| {
            args.get::<Circle>(0)?;
            Ok(Canvas { via: "shape" })
        })
        .finish();
    let resolver =
        MetadataResolver::new(fx.registry, fx.table).with_policy(MatchPolicy::Assignable);

    let ctor = resolver.resolve(fx.canvas, &shape_of(&[fx.circle])).unwrap();
    let canvas: Canvas = CompiledThunk::compile(&ctor)
        .invoke_with_as(&[&Circle { radius: 3 }])
        .unwrap();

    assert_eq!(canvas, Canvas { via: "shape" });
}

#[derive(Debug, PartialEq)]
struct Base;

#[derive(Debug, PartialEq)]
struct Holder;

#[test]
fn concrete_supertype_parameters_stay_exact() {
    let mut registry = TypeRegistry::new();
    let base = registry.register::<Base>();
    let circle = registry.register::<Circle>();
    registry.add_supertype(circle, base);
    let mut table = ConstructorTable::new();
    let holder = table
        .define::<Holder>(&mut registry)
        .public(&[base], |args| {
            args.get::<Base>(0)?;
            Ok(Holder)
        })
        .finish();
    let resolver = MetadataResolver::new(registry, table).with_policy(MatchPolicy::Assignable);

    assert!(matches!(
        resolver.resolve(holder, &shape_of(&[circle])),
        Err(ThunkError::NoMatchingConstructor { .. })
    ));
    let ctor = resolver.resolve(holder, &shape_of(&[base])).unwrap();
    let made: Holder = CompiledThunk::compile(&ctor)
        .invoke_with_as(&[&Base])
        .unwrap();
    assert_eq!(made, Holder);
}

#[test]
fn exact_candidate_beats_assignable_ones() {
    let mut fx = shapes();
    fx.table
        .define::<Canvas>(&mut fx.registry)
        .public(&[fx.shape], |_| Ok(Canvas { via: "shape" }))
        .public(&[fx.circle], |_| Ok(Canvas { via: "circle" }))
        .finish();
    let resolver =
        MetadataResolver::new(fx.registry, fx.table).with_policy(MatchPolicy::Assignable);

    let ctor = resolver.resolve(fx.canvas, &shape_of(&[fx.circle])).unwrap();

    assert_eq!(ctor.signature(), shape_of(&[fx.circle]));
}

#[test]
fn two_assignable_candidates_are_ambiguous() {
    let mut fx = shapes();
    fx.table
        .define::<Canvas>(&mut fx.registry)
        .public(&[fx.shape], |_| Ok(Canvas { via: "shape" }))
        .public(&[fx.drawable], |_| Ok(Canvas { via: "drawable" }))
        .finish();
    let resolver =
        MetadataResolver::new(fx.registry, fx.table).with_policy(MatchPolicy::Assignable);

    assert_eq!(
        resolver.resolve(fx.canvas, &shape_of(&[fx.circle])).err(),
        Some(ThunkError::AmbiguousConstructor {
            ty: fx.canvas,
            shape: shape_of(&[fx.circle]),
            candidates: 2
        })
    );
}

fn resolve_parameterless(resolver: impl ConstructorResolver, ty: TypeIdentity) -> bool {
    resolver.resolve(ty, &ConstructibleShape::parameterless()).is_ok()
}

#[test]
fn references_and_arcs_forward() {
    let (resolver, point) = point_resolver();
    let shared = Arc::new(resolver);

    assert!(resolve_parameterless(&*shared, point));
    assert!(resolve_parameterless(Arc::clone(&shared), point));
    assert!(!resolve_parameterless(&*shared, TypeIdentity::CHAR));
}
