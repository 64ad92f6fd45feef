//! Integration tests for the polyvisit crate.
//!
//! ## Covered
//! - Exactly one invocation for a matching handler, none otherwise
//! - Exact-type matching across an open hierarchy of trait objects
//! - Address identity of the object handed to the handler
//! - First-wins on duplicate parameter types
//! - Reusable, erased and runtime-built visitors
//! - The empty handler list

use std::{
    any::Any,
    cell::{Cell, RefCell},
    sync::{Arc, Mutex},
};

use polyvisit::{
    BoxedVisitor, ErasedVisitor, VisitExt, Visitor, dynamic::DynVisitor, handler::by_value,
    overload::compose, visit, visitable_dyn,
};

trait Shape: Any {
    fn name(&self) -> &'static str;
}

visitable_dyn!(dyn Shape, dyn Shape + Send + Sync);

#[derive(Debug, PartialEq, Clone)]
struct Base {
    id: u32,
}

/// Embeds a `Base` after another field, so the embedded value sits at a
/// different address than the value itself.
#[derive(Debug, PartialEq)]
#[repr(C)]
struct Derived {
    extra: u64,
    base: Base,
}

#[derive(Debug, PartialEq)]
struct Unrelated;

impl Shape for Base {
    fn name(&self) -> &'static str {
        "base"
    }
}

impl Shape for Derived {
    fn name(&self) -> &'static str {
        "derived"
    }
}

impl Shape for Unrelated {
    fn name(&self) -> &'static str {
        "unrelated"
    }
}

#[test]
fn test_int_string_float() {
    let log = RefCell::new(Vec::new());
    let values: Vec<Box<dyn Any>> = vec![
        Box::new(42i32),
        Box::new(String::from("x")),
        Box::new(1.5f32),
    ];

    for value in &values {
        visit(
            &**value,
            (
                |n: &i32| log.borrow_mut().push(format!("h_int({n})")),
                |s: &String| log.borrow_mut().push(format!("h_string({s})")),
            ),
        );
    }

    assert_eq!(log.into_inner(), ["h_int(42)", "h_string(x)"]);
}

#[test]
fn test_exactly_one_invocation() {
    let log = RefCell::new(Vec::new());
    let base = Base { id: 1 };

    visit(
        &base as &(dyn Shape + 'static),
        (
            |_: &Unrelated| log.borrow_mut().push(0),
            |b: &Base| log.borrow_mut().push(b.id),
            |_: &Derived| log.borrow_mut().push(2),
        ),
    );

    assert_eq!(log.into_inner(), [1]);
}

#[test]
fn test_base_handler_does_not_fire_for_derived() {
    let calls = Cell::new(0);
    let derived = Derived {
        extra: 7,
        base: Base { id: 2 },
    };

    let shape: &(dyn Shape + 'static) = &derived;
    assert_eq!(shape.name(), "derived");
    visit(shape, (|_: &Base| calls.set(calls.get() + 1),));
    visit(shape, (|_: &Base| calls.set(calls.get() + 1),));

    assert_eq!(calls.get(), 0);
}

#[test]
fn test_derived_handler_receives_complete_object() {
    let derived = Derived {
        extra: 7,
        base: Base { id: 3 },
    };
    let seen = Cell::new(std::ptr::null::<()>());

    let shape: &(dyn Shape + 'static) = &derived;
    visit(
        shape,
        (
            |b: &Base| seen.set(std::ptr::from_ref(b).cast::<()>()),
            |d: &Derived| seen.set(std::ptr::from_ref(d).cast::<()>()),
        ),
    );

    assert_eq!(seen.get(), std::ptr::from_ref(&derived).cast::<()>());
}

#[test]
fn test_embedded_value_is_its_own_type() {
    let derived = Derived {
        extra: 7,
        base: Base { id: 4 },
    };
    let seen = Cell::new(std::ptr::null::<()>());

    let shape: &(dyn Shape + Send + Sync + 'static) = &derived.base;
    visit(
        shape,
        (
            |d: &Derived| seen.set(std::ptr::from_ref(d).cast::<()>()),
            |b: &Base| seen.set(std::ptr::from_ref(b).cast::<()>()),
        ),
    );

    assert_eq!(seen.get(), std::ptr::from_ref(&derived.base).cast::<()>());
    assert_ne!(seen.get(), std::ptr::from_ref(&derived).cast::<()>());
}

#[test]
fn test_order_between_unrelated_types_does_not_matter() {
    let log = RefCell::new(Vec::new());
    let shapes: [&(dyn Shape + 'static); 2] = [&Base { id: 5 }, &Unrelated];

    for shape in shapes {
        visit(
            shape,
            (
                |_: &Unrelated| log.borrow_mut().push("unrelated"),
                |_: &Base| log.borrow_mut().push("base"),
            ),
        );
        visit(
            shape,
            (
                |_: &Base| log.borrow_mut().push("base"),
                |_: &Unrelated| log.borrow_mut().push("unrelated"),
            ),
        );
    }

    assert_eq!(log.into_inner(), ["base", "base", "unrelated", "unrelated"]);
}

#[test]
fn test_duplicate_types_first_declared_wins() {
    let log = RefCell::new(Vec::new());
    visit(
        &Base { id: 6 },
        (
            |_: &Base| log.borrow_mut().push("first"),
            |_: &Unrelated| log.borrow_mut().push("unrelated"),
            |_: &Base| log.borrow_mut().push("second"),
        ),
    );
    assert_eq!(log.into_inner(), ["first"]);

    let overload = compose((|_: &Base| {}, |_: &Unrelated| {}, |_: &Base| {}));
    let shadowed = overload.shadowed();
    assert_eq!(shadowed.len(), 1);
    assert_eq!((shadowed[0].index, shadowed[0].winner), (2, 0));
}

#[test]
fn test_no_match_is_a_repeatable_no_op() {
    let calls = Cell::new(0);
    let handlers = (
        |_: &u8| calls.set(calls.get() + 1),
        |_: &String| calls.set(calls.get() + 1),
    );

    visit(&1.5f32, handlers);
    visit(&1.5f32, handlers);
    visit(&"not a String", handlers);
    visit(&Box::new(String::from("boxed")), handlers);

    assert_eq!(calls.get(), 0);
}

#[test]
fn test_empty_handler_list() {
    visit(&Base { id: 7 }, ());
    polyvisit::visit!(&Base { id: 7 });

    let mut visitor = Visitor::new(());
    assert_eq!(visitor.try_visit(&Base { id: 7 }), None);
    assert!(visitor.candidates().is_empty());
}

#[test]
fn test_by_value_handler() {
    let received = RefCell::new(Vec::new());
    let base = Base { id: 8 };

    visit(
        &base as &(dyn Shape + 'static),
        (by_value(|b: Base| received.borrow_mut().push(b)),),
    );

    assert_eq!(received.into_inner(), [Base { id: 8 }]);
    assert_eq!(base.id, 8);
}

#[test]
fn test_reusable_visitor_fires_per_call() {
    let mut bases = 0;
    let shapes: Vec<Box<dyn Shape>> = vec![
        Box::new(Base { id: 1 }),
        Box::new(Unrelated),
        Box::new(Base { id: 10 }),
        Box::new(Derived {
            extra: 0,
            base: Base { id: 100 },
        }),
    ];
    let hits: Vec<Option<usize>> = {
        let mut visitor = Visitor::new((|b: &Base| bases += b.id,));
        shapes
            .iter()
            .map(|shape| visitor.try_visit(&**shape))
            .collect()
    };

    assert_eq!(hits, [Some(0), None, Some(0), None]);
    assert_eq!(bases, 11);
}

#[test]
fn test_erased_visitors_behave_like_typed_ones() {
    let log = RefCell::new(Vec::new());
    let mut visitors: Vec<BoxedVisitor<'_>> = vec![
        Visitor::new((|_: &Base| log.borrow_mut().push("v0 base"),)).into_boxed(),
        Box::new(compose((
            |_: &Derived| log.borrow_mut().push("v1 derived"),
            |_: &Base| log.borrow_mut().push("v1 base"),
        ))) as BoxedVisitor<'_>,
    ];

    let derived = Derived {
        extra: 1,
        base: Base { id: 9 },
    };
    let shapes: [&(dyn Shape + 'static); 2] = [&derived, &derived.base];

    for visitor in &mut visitors {
        for shape in shapes {
            visitor.dispatch(shape);
        }
    }

    assert_eq!(visitors[1].candidates().len(), 2);
    drop(visitors);
    assert_eq!(log.into_inner(), ["v0 base", "v1 derived", "v1 base"]);
}

#[test]
fn test_dyn_visitor_clones_share_handlers_and_keep_order() {
    let log = Arc::new(Mutex::new(Vec::new()));

    let mut visitor = DynVisitor::new();
    let sink = Arc::clone(&log);
    visitor.push(move |b: &Base| sink.lock().unwrap().push(format!("base {}", b.id)));
    let sink = Arc::clone(&log);
    visitor.push(move |_: &Derived| sink.lock().unwrap().push("derived".to_owned()));
    let sink = Arc::clone(&log);
    visitor.push(move |_: &Base| sink.lock().unwrap().push("shadowed".to_owned()));

    let clone = visitor.clone();
    let shapes: Vec<Box<dyn Shape + Send + Sync>> = vec![
        Box::new(Base { id: 1 }),
        Box::new(Derived {
            extra: 0,
            base: Base { id: 2 },
        }),
        Box::new(Unrelated),
    ];

    std::thread::scope(|scope| {
        scope.spawn(|| {
            for shape in &shapes {
                clone.visit(&**shape);
            }
        });
    });
    for shape in &shapes {
        visitor.visit(&**shape);
    }

    assert_eq!(
        *log.lock().unwrap(),
        ["base 1", "derived", "base 1", "derived"]
    );
    assert_eq!(visitor.shadowed().len(), 1);
    assert_eq!(clone.candidates(), visitor.candidates());
}

#[test]
fn test_dyn_visitor_as_erased_visitor() {
    let hits = Arc::new(Mutex::new(0));
    let sink = Arc::clone(&hits);
    let mut visitor = DynVisitor::new().on(move |_: &Unrelated| *sink.lock().unwrap() += 1);

    let erased: &mut dyn ErasedVisitor = &mut visitor;
    let unrelated: &(dyn Shape + 'static) = &Unrelated;
    let base: &(dyn Shape + 'static) = &Base { id: 0 };
    assert_eq!(erased.dispatch(unrelated), Some(0));
    assert_eq!(erased.dispatch(base), None);
    assert_eq!(*hits.lock().unwrap(), 1);
}
