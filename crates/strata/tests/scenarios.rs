use std::mem;

use strata::prelude::*;
use strata_test_utils::fixtures::{person, DropCounter, Movable, Person, Physics, Wide};

fn contents(vec: &SoaVec<Person>) -> Vec<Person> {
    vec.iter().map(|p| p.to_record()).collect()
}

#[test]
fn bob_and_alice() {
    let mut people = SoaVec::<Person>::new();
    people.emplace(("Bob".to_string(), 12));
    people.emplace(("Alice".to_string(), 13));

    assert_eq!(people.len(), 2);
    assert_eq!(people.field::<1>().iter().copied().collect::<Vec<_>>(), [12, 13]);
    assert_eq!(people.columns().age.as_slice(), &[12, 13]);
    assert_eq!(people.at(0).unwrap().to_record(), person("Bob", 12));
    assert_eq!(people.last().unwrap().to_record(), person("Alice", 13));
}

#[test]
fn reserve_resize_push_copy_move_emplace_pop_clear() {
    let mut vec = SoaVec::<Person>::new();
    vec.reserve(4);
    assert_eq!(vec.capacity(), 4);
    assert!(vec.is_empty());

    vec.resize_default(1);
    assert_eq!(vec.len(), 1);
    assert_eq!(vec.first().unwrap().to_record(), Person::default());

    vec.push(person("a", 1));
    assert_eq!(vec.len(), 2);
    assert_eq!(vec.capacity(), 4);

    let copy = vec.clone();
    assert_eq!(copy.len(), 2);
    assert_eq!(copy.capacity(), 2);
    assert_eq!(contents(&copy), contents(&vec));

    let moved = mem::take(&mut vec);
    assert_eq!(vec.len(), 0);
    assert_eq!(vec.capacity(), 0);
    assert_eq!(moved.len(), 2);
    assert_eq!(moved.capacity(), 4);

    let mut vec = moved;
    vec.emplace(("b".to_string(), 2));
    assert_eq!(vec.len(), 3);
    assert_eq!(vec.pop(), Some(person("b", 2)));
    assert_eq!(vec.len(), 2);

    vec.clear();
    assert!(vec.is_empty());
    assert_eq!(vec.capacity(), 4);
}

#[test]
fn move_only_records() {
    let mut vec = SoaVec::<Movable>::new();
    vec.emplace((Box::new(1),));
    assert_eq!(vec.capacity(), 1);
    vec.emplace((Box::new(2),));
    assert!(vec.capacity() > 1);
    assert_eq!(**vec.get(1).unwrap().ptr, 2);

    *vec.get_mut(0).unwrap().ptr = Box::new(10);
    let values: Vec<i32> = vec.into_iter().map(|m| *m.ptr).collect();
    assert_eq!(values, [10, 2]);
}

#[test]
fn resize_after_reserve_keeps_capacity_on_shrink() {
    let mut vec = SoaVec::<Person>::new();
    vec.reserve(2);
    assert_eq!(vec.capacity(), 2);
    vec.resize_default(3);
    assert_eq!(vec.len(), 3);
    assert_eq!(vec.capacity(), 3);
    vec.resize_default(2);
    assert_eq!(vec.len(), 2);
    assert_eq!(vec.capacity(), 3);
}

#[test]
fn resize_from_one_element() {
    let mut vec = SoaVec::<Person>::new();
    vec.push(person("seed", 7));
    vec.resize_default(3);
    assert_eq!(vec.len(), 3);
    assert!(vec.capacity() >= 3);
    assert_eq!(
        contents(&vec),
        [person("seed", 7), Person::default(), Person::default()]
    );
    let capacity = vec.capacity();
    vec.resize_default(2);
    assert_eq!(vec.len(), 2);
    assert_eq!(vec.capacity(), capacity);
}

#[test]
fn emplace_capacities_double() {
    let mut vec = SoaVec::<Physics>::new();
    let mut capacities = Vec::new();
    for id in 0..64 {
        vec.push(Physics::at_rest(id));
        if capacities.last() != Some(&vec.capacity()) {
            capacities.push(vec.capacity());
        }
    }
    assert_eq!(capacities, [1, 2, 4, 8, 16, 32, 64]);
}

#[test]
fn copies_are_independent() {
    let original: SoaVec<Person> = (0..4).map(|i| person("p", i)).collect();
    let mut copy = original.clone();
    for p in copy.iter_mut() {
        *p.age += 100;
        p.name.push('!');
    }
    assert_eq!(original.field::<1>().as_slice(), &[0, 1, 2, 3]);
    assert!(original.iter().all(|p| p.name == "p"));
    assert_eq!(copy.field::<1>().as_slice(), &[100, 101, 102, 103]);

    let mut target = SoaVec::<Person>::with_capacity(16);
    target.clone_from(&copy);
    assert_eq!(target.capacity(), 16);
    assert_eq!(contents(&target), contents(&copy));
}

#[test]
fn checked_access_names_the_failure() {
    let people: SoaVec<Person> = [person("a", 1)].into_iter().collect();
    let err = people.at(1).map(|p| p.to_record()).unwrap_err();
    let message = err.to_string();
    assert!(message.contains("::at(1)"), "{message}");
    assert!(message.contains("len = 1"), "{message}");

    let err = people.field::<0>().at(3).unwrap_err();
    assert_eq!(
        err,
        SoaError::OutOfRange {
            type_name: "Person.name",
            index: 3,
            len: 1,
        }
    );
}

#[test]
fn proxy_round_trip() {
    let mut people: SoaVec<Person> = [person("a", 1), person("b", 2)].into_iter().collect();
    for i in 0..people.len() {
        let record = people.at(i).unwrap().to_record();
        people.at_mut(i).unwrap().assign(record);
    }
    assert_eq!(contents(&people), [person("a", 1), person("b", 2)]);

    let snapshot = people.get(0).unwrap().to_record();
    people.get_mut(0).unwrap().assign(person("tmp", 99));
    people.get_mut(0).unwrap().assign_cloned(&snapshot);
    assert_eq!(people.get(0).unwrap().to_record(), snapshot);
}

#[test]
fn fields_are_dropped_exactly_once() {
    let counter = DropCounter::new();
    {
        let mut vec = SoaVec::new();
        for w in 0..10 {
            vec.push(counter.counted(w));
        }
        assert_eq!(counter.drops(), 0);

        vec.truncate(8);
        assert_eq!(counter.drops(), 2);

        let copy = vec.clone();
        vec.clear();
        assert_eq!(counter.drops(), 10);

        let mut iter = copy.into_iter();
        let first = iter.next().unwrap();
        assert_eq!(first.weight, 0);
        drop(iter);
        assert_eq!(counter.drops(), 17);
        drop(first);
        assert_eq!(counter.drops(), 18);

        vec.push(counter.counted(42));
        vec.shrink_to_fit();
        assert_eq!(counter.drops(), 18);
    }
    assert_eq!(counter.drops(), 19);
}

#[test]
fn ten_field_records() {
    let mut vec = SoaVec::<Wide>::new();
    vec.resize_default(5);
    vec.field_mut::<4>()
        .iter_mut()
        .enumerate()
        .for_each(|(i, e)| *e = i as u128);
    assert_eq!(vec.field::<4>().as_slice(), &[0, 1, 2, 3, 4]);
    assert_eq!(vec.schema().len(), 10);
    for (ty, segment) in vec.schema().iter().map(|(_, ty)| ty).zip(vec.layout().segments()) {
        assert_eq!(segment.start % ty.align(), 0);
    }
}

#[test]
fn schema_reports_declaration_order() {
    let schema = Physics::schema();
    assert_eq!(schema.record_name(), "Physics");
    assert_eq!(schema.names().collect::<Vec<_>>(), ["pos", "speed", "acc", "id"]);
    assert_eq!(schema.position_of("acc"), Some(2));
    assert_eq!(schema.field_type("speed").unwrap().size(), 8);
}
