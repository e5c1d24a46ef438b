use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use super::*;
use crate::metadata::{ConstructorDescriptor, Instance, Visibility};
use pretty_assertions::assert_eq;

#[derive(Default)]
struct CountingResolver {
    calls: AtomicUsize,
}

impl ConstructorResolver for CountingResolver {
    fn resolve(
        &self,
        ty: TypeIdentity,
        shape: &ConstructibleShape,
    ) -> Result<ConstructorDescriptor, ThunkError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if !shape.is_parameterless() {
            return Err(ThunkError::NoMatchingConstructor {
                ty,
                shape: shape.clone(),
            });
        }
        // Widen the window in which racing threads could double-compile.
        std::thread::yield_now();
        Ok(ConstructorDescriptor::new(
            ty,
            Vec::new(),
            Visibility::Public,
            move |_| Ok(Box::new(ty) as Instance),
        ))
    }
}

fn key(raw: u32) -> TypeIdentity {
    TypeIdentity::from_raw(raw).unwrap()
}

#[test]
fn racing_threads_compile_once() {
    let factory = Arc::new(SharedThunkFactory::new(CountingResolver::default()));
    let shape = ConstructibleShape::parameterless();

    let thunks: Vec<CompiledThunk> = std::thread::scope(|scope| {
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let factory = Arc::clone(&factory);
                let shape = &shape;
                scope.spawn(move || factory.get_thunk(key(99), shape).unwrap())
            })
            .collect();
        handles.into_iter().map(|h| h.join().unwrap()).collect()
    });

    assert_eq!(factory.resolver().calls.load(Ordering::SeqCst), 1);
    assert!(thunks.iter().all(|thunk| thunk.ptr_eq(&thunks[0])));
    assert_eq!(
        factory.stats(),
        FactoryStats {
            compiled: 1,
            hits: 7,
            failures: 0
        }
    );
}

#[test]
fn many_types_from_many_threads() {
    let factory = SharedThunkFactory::new(CountingResolver::default());
    let shape = ConstructibleShape::parameterless();

    std::thread::scope(|scope| {
        for _ in 0..4 {
            scope.spawn(|| {
                for raw in 16..116 {
                    let thunk = factory.get_thunk(key(raw), &shape).unwrap();
                    assert_eq!(thunk.invoke_as::<TypeIdentity>().unwrap(), key(raw));
                }
            });
        }
    });

    assert_eq!(factory.len(), 100);
    assert_eq!(factory.resolver().calls.load(Ordering::SeqCst), 100);
    assert_eq!(factory.cache_stats().len, 100);
}

#[test]
fn failure_is_not_cached() {
    let factory = SharedThunkFactory::new(CountingResolver::default());
    let unary = ConstructibleShape::of(&[TypeIdentity::I32]);

    assert!(factory.get_thunk(key(20), &unary).is_err());
    assert!(factory.try_get(key(20)).is_none());

    let thunk = factory
        .get_thunk(key(20), &ConstructibleShape::parameterless())
        .unwrap();
    assert_eq!(factory.try_get(key(20)).map(|t| t.ptr_eq(&thunk)), Some(true));
    assert_eq!(factory.stats().failures, 1);
}

#[test]
fn shape_conflict_is_reported() {
    let factory = SharedThunkFactory::new(CountingResolver::default());
    factory
        .get_thunk(key(20), &ConstructibleShape::parameterless())
        .unwrap();

    assert!(matches!(
        factory.get_thunk(key(20), &ConstructibleShape::of(&[TypeIdentity::BOOL])),
        Err(ThunkError::ShapeConflict { .. })
    ));
}

#[test]
fn factory_is_send_and_sync() {
    fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<SharedThunkFactory<CountingResolver>>();
}
