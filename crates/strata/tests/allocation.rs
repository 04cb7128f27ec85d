use strata::prelude::*;
use strata::types::BASELINE_ALIGN;
use strata_test_utils::fixtures::{person, Person, Physics};
use strata_test_utils::{CountingAllocator, FailingAllocator};

#[test]
fn one_allocation_holds_every_field() {
    let alloc = CountingAllocator::new();
    let mut vec = SoaVec::<Physics, _>::with_capacity_in(10, &alloc);
    assert_eq!(alloc.allocations(), 1);
    assert_eq!(alloc.live_bytes(), vec.allocated_bytes());
    assert_eq!(vec.allocated_bytes(), vec.layout().total_bytes());

    for id in 0..10 {
        vec.push(Physics::at_rest(id));
    }
    assert_eq!(alloc.allocations(), 1);

    vec.push(Physics::at_rest(10));
    assert_eq!(vec.capacity(), 20);
    assert_eq!(alloc.allocations(), 2);
    assert_eq!(alloc.outstanding(), 1);

    drop(vec);
    assert_eq!(alloc.outstanding(), 0);
    assert_eq!(alloc.live_bytes(), 0);
}

#[test]
fn repeated_small_extends_grow_geometrically() {
    let extended = CountingAllocator::new();
    let pushed = CountingAllocator::new();
    let mut a = SoaVec::<Person, _>::new_in(&extended);
    let mut b = SoaVec::<Person, _>::new_in(&pushed);
    for i in 0..1000 {
        a.extend(std::iter::once(person("x", i)));
        b.push(person("x", i));
    }
    assert_eq!(a.capacity(), 1024);
    assert_eq!(extended.allocations(), pushed.allocations());
    assert_eq!(extended.allocations(), 11);
    assert_eq!(a.field::<1>().as_slice(), b.field::<1>().as_slice());
}

#[test]
fn extend_reserves_its_size_hint_once() {
    let alloc = CountingAllocator::new();
    let mut vec = SoaVec::<Person, _>::with_capacity_in(4, &alloc);
    vec.extend((0..3).map(|i| person("a", i)));
    assert_eq!(alloc.allocations(), 1);

    vec.extend((0..100).map(|i| person("b", i)));
    assert_eq!(vec.len(), 103);
    assert_eq!(vec.capacity(), 103);
    assert_eq!(alloc.allocations(), 2);
}

#[test]
fn empty_containers_never_allocate() {
    let alloc = CountingAllocator::new();
    let mut vec = SoaVec::<Person, _>::new_in(&alloc);
    vec.reserve(0);
    vec.shrink_to_fit();
    vec.clear();
    let copy = vec.clone();
    assert_eq!(copy.capacity(), 0);
    assert_eq!(alloc.allocations(), 0);
}

#[test]
fn requests_are_sized_by_the_layout_engine() {
    let alloc = CountingAllocator::new();
    let vec = SoaVec::<Person, _>::with_capacity_in(7, &alloc);
    let expected = Person::schema().layout(7).unwrap().total_bytes();
    assert_eq!(alloc.last_request(), expected);
    assert_eq!(vec.layout(), &Person::schema().layout(7).unwrap());
}

#[test]
fn shrink_and_clear_release_memory() {
    let alloc = CountingAllocator::new();
    let mut vec = SoaVec::<Person, _>::with_capacity_in(32, &alloc);
    vec.push(person("a", 1));
    vec.shrink_to_fit();
    assert_eq!(vec.capacity(), 1);
    assert_eq!(alloc.outstanding(), 1);
    vec.clear();
    vec.shrink_to_fit();
    assert_eq!(alloc.outstanding(), 0);
}

#[test]
fn allocation_failure_is_propagated_verbatim() {
    let alloc = FailingAllocator::new(0);
    let mut vec = SoaVec::<Person, _>::new_in(&alloc);
    let err = vec.try_push(person("a", 1)).unwrap_err();
    let bytes = Person::schema().layout(1).unwrap().total_bytes();
    assert_eq!(
        err,
        SoaError::Alloc(AllocError {
            bytes,
            align: BASELINE_ALIGN,
        })
    );
    assert!(std::error::Error::source(&err).is_some());
    assert_eq!(vec.len(), 0);
    assert_eq!(vec.capacity(), 0);
}

#[test]
fn failed_growth_leaves_the_container_intact() {
    let alloc = FailingAllocator::new(1);
    let mut vec = SoaVec::<Person, _>::new_in(&alloc);
    vec.try_push(person("a", 1)).unwrap();
    assert!(vec.try_push(person("b", 2)).is_err());
    assert!(vec.try_reserve(100).is_err());
    assert!(vec.try_resize_default(5).is_err());
    assert_eq!(vec.len(), 1);
    assert_eq!(vec.capacity(), 1);
    assert_eq!(vec.at(0).unwrap().to_record(), person("a", 1));

    alloc.reset();
    vec.try_push(person("b", 2)).unwrap();
    assert_eq!(vec.capacity(), 2);
    assert_eq!(alloc.calls(), 1);
}

#[test]
fn failed_clone_reports_the_error() {
    let alloc = FailingAllocator::new(1);
    let vec = SoaVec::<Person, _>::try_with_capacity_in(4, &alloc).unwrap();
    assert!(vec.try_clone().unwrap().is_empty());

    let mut vec = vec;
    vec.push(person("a", 1));
    assert!(matches!(vec.try_clone(), Err(SoaError::Alloc(_))));
    drop(vec);
    assert_eq!(alloc.outstanding(), 0);
}

#[test]
fn impossible_capacities_overflow() {
    let mut vec = SoaVec::<Person>::new();
    assert!(matches!(
        vec.try_reserve(usize::MAX),
        Err(SoaError::CapacityOverflow { .. })
    ));
    assert_eq!(vec.capacity(), 0);
}

#[test]
fn containers_cross_threads() {
    let vec: SoaVec<Person> = (0..100).map(|i| person("t", i)).collect();
    let total = std::thread::scope(|s| {
        let handles: Vec<_> = (0..4)
            .map(|k| {
                let vec = &vec;
                s.spawn(move || {
                    vec.field::<1>()
                        .iter()
                        .skip(k * 25)
                        .take(25)
                        .map(|&a| a as u64)
                        .sum::<u64>()
                })
            })
            .collect();
        handles.into_iter().map(|h| h.join().unwrap()).sum::<u64>()
    });
    assert_eq!(total, (0..100).sum::<u64>());

    let moved = std::thread::spawn(move || vec.len()).join().unwrap();
    assert_eq!(moved, 100);
}
