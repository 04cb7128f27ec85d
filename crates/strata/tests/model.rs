//! Operation sequences checked against a `Vec<Person>` model.

use proptest::prelude::*;
use strata::prelude::*;
use strata_test_utils::fixtures::{person, Person};
use strata_test_utils::CountingAllocator;

#[derive(Clone, Debug)]
enum Op {
    Push(String, u32),
    Emplace(u32),
    Pop,
    Reserve(usize),
    Resize(usize, u32),
    Truncate(usize),
    Clear,
    Shrink,
    SetAge(usize, u32),
    CloneFrom,
}

fn arb_op() -> impl Strategy<Value = Op> {
    prop_oneof![
        4 => ("[a-z]{0,12}", any::<u32>()).prop_map(|(n, a)| Op::Push(n, a)),
        2 => any::<u32>().prop_map(Op::Emplace),
        3 => Just(Op::Pop),
        1 => (0usize..48).prop_map(Op::Reserve),
        1 => (0usize..48, any::<u32>()).prop_map(|(n, a)| Op::Resize(n, a)),
        1 => (0usize..48).prop_map(Op::Truncate),
        1 => Just(Op::Clear),
        1 => Just(Op::Shrink),
        2 => (0usize..48, any::<u32>()).prop_map(|(i, a)| Op::SetAge(i, a)),
        1 => Just(Op::CloneFrom),
    ]
}

fn snapshot<A: ByteAllocator>(vec: &SoaVec<Person, A>) -> Vec<Person> {
    vec.iter().map(|p| p.to_record()).collect()
}

proptest! {
    #[test]
    fn container_matches_model(ops in proptest::collection::vec(arb_op(), 0..96)) {
        let alloc = CountingAllocator::new();
        {
            let mut vec = SoaVec::<Person, _>::new_in(&alloc);
            let mut model: Vec<Person> = Vec::new();
            for op in ops {
                match op {
                    Op::Push(name, age) => {
                        vec.push(person(&name, age));
                        model.push(person(&name, age));
                    }
                    Op::Emplace(age) => {
                        vec.emplace((age.to_string(), age));
                        model.push(person(&age.to_string(), age));
                    }
                    Op::Pop => {
                        prop_assert_eq!(vec.pop(), model.pop());
                    }
                    Op::Reserve(n) => {
                        let before = vec.capacity();
                        vec.reserve(n);
                        prop_assert_eq!(vec.capacity(), before.max(n));
                    }
                    Op::Resize(n, age) => {
                        vec.resize(n, person("r", age));
                        model.resize(n, person("r", age));
                    }
                    Op::Truncate(n) => {
                        vec.truncate(n);
                        model.truncate(n);
                    }
                    Op::Clear => {
                        let before = vec.capacity();
                        vec.clear();
                        model.clear();
                        prop_assert_eq!(vec.capacity(), before);
                    }
                    Op::Shrink => {
                        vec.shrink_to_fit();
                        prop_assert_eq!(vec.capacity(), vec.len());
                    }
                    Op::SetAge(i, age) => {
                        match (vec.get_mut(i), model.get_mut(i)) {
                            (Some(p), Some(m)) => {
                                *p.age = age;
                                m.age = age;
                            }
                            (None, None) => {}
                            _ => {
                                prop_assert!(false, "presence mismatch at {}", i);
                            }
                        }
                    }
                    Op::CloneFrom => {
                        let copy = vec.clone();
                        prop_assert_eq!(copy.capacity(), vec.len());
                        vec.clone_from(&copy);
                    }
                }
                prop_assert_eq!(vec.len(), model.len());
                prop_assert!(vec.len() <= vec.capacity());
                prop_assert_eq!(alloc.outstanding(), usize::from(vec.capacity() > 0));
            }
            prop_assert_eq!(snapshot(&vec), model.clone());
            let ages: Vec<u32> = model.iter().map(|p| p.age).collect();
            prop_assert_eq!(vec.field::<1>().as_slice(), ages.as_slice());
        }
        prop_assert_eq!(alloc.outstanding(), 0);
        prop_assert_eq!(alloc.live_bytes(), 0);
    }

    #[test]
    fn round_trip_through_proxies(ages in proptest::collection::vec(any::<u32>(), 1..32)) {
        let mut vec: SoaVec<Person> = ages.iter().map(|&a| person(&a.to_string(), a)).collect();
        let before = snapshot(&vec);
        for i in 0..vec.len() {
            let record = vec.at(i).unwrap().to_record();
            vec.at_mut(i).unwrap().assign(record);
        }
        prop_assert_eq!(snapshot(&vec), before);
    }

    #[test]
    fn owned_iteration_yields_every_record(ages in proptest::collection::vec(any::<u32>(), 0..32)) {
        let vec: SoaVec<Person> = ages.iter().map(|&a| person("o", a)).collect();
        let forward: Vec<u32> = vec.clone().into_iter().map(|p| p.age).collect();
        let backward: Vec<u32> = vec.into_iter().rev().map(|p| p.age).collect();
        prop_assert_eq!(&forward, &ages);
        prop_assert_eq!(backward.into_iter().rev().collect::<Vec<_>>(), ages);
    }
}
