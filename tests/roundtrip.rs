use canonsexpr::parse::{decode_transport, parse, parse_canonical, parse_exact};
use canonsexpr::read::Reader;
use canonsexpr::settings::{CANONICAL_SETTINGS, DEFAULT_SETTINGS};
use canonsexpr::value::{atom, hinted, Atom, Value};
use proptest::prelude::*;
use std::collections::HashSet;

fn arb_bytes() -> impl Strategy<Value = Vec<u8>> {
    prop_oneof![
        prop::collection::vec(any::<u8>(), 0..20),
        "[a-z][a-z0-9./_:*+=-]{0,8}".prop_map(String::into_bytes),
        "[ -~\t\r\n]{0,12}".prop_map(String::into_bytes),
    ]
}

fn arb_atom() -> impl Strategy<Value = Atom> {
    (prop::option::of(arb_bytes()), arb_bytes())
        .prop_map(|(display_hint, value)| Atom { display_hint, value })
}

fn arb_value() -> impl Strategy<Value = Value> {
    arb_atom().prop_map(Value::Atom).prop_recursive(4, 48, 6, |inner| {
        prop::collection::vec(inner, 0..6).prop_map(Value::List)
    })
}

proptest! {
    #[test]
    fn canonical_roundtrip(v in arb_value()) {
        let bytes = v.to_canonical();
        prop_assert_eq!(&parse_canonical(&bytes).unwrap(), &v);
        let (v2, rest) = parse(&bytes).unwrap();
        prop_assert!(rest.is_empty());
        prop_assert_eq!(v2, v);
    }

    #[test]
    fn transport_roundtrip(v in arb_value()) {
        let t = v.to_transport();
        prop_assert_eq!(decode_transport(t.as_bytes()).unwrap(), v.to_canonical());
        prop_assert_eq!(parse_exact(t.as_bytes(), &DEFAULT_SETTINGS).unwrap(), v);
    }

    #[test]
    fn advanced_roundtrip(v in arb_value()) {
        let s = v.to_advanced();
        prop_assert_eq!(parse_exact(s.as_bytes(), &DEFAULT_SETTINGS).unwrap(), v);
    }

    #[test]
    fn clone_is_equal(v in arb_value()) {
        prop_assert_eq!(v.clone(), v);
    }

    #[test]
    fn equality_is_canonical_equality(a in arb_value(), b in arb_value()) {
        prop_assert_eq!(a == b, a.to_canonical() == b.to_canonical());
        prop_assert_eq!(a == b, b == a);
    }

    #[test]
    fn reader_splits_concatenation(vals in prop::collection::vec(arb_value(), 0..5)) {
        let mut bytes = Vec::new();
        for v in &vals {
            v.write_canonical(&mut bytes);
        }
        let mut reader = Reader::with_settings(&bytes[..], CANONICAL_SETTINGS);
        for v in &vals {
            prop_assert_eq!(&reader.read_value().unwrap().unwrap(), v);
        }
        prop_assert!(reader.read_value().unwrap().is_none());
    }
}

#[test]
fn clones_are_independent() {
    let v = Value::List(vec![hinted("h", "x"), Value::List(vec![atom("y")])]);
    let mut w = v.clone();
    if let Value::List(items) = &mut w {
        items.push(atom("z"));
        if let Value::Atom(a) = &mut items[0] {
            a.value.push(b'!');
        }
    }
    assert_eq!(v, Value::List(vec![hinted("h", "x"), Value::List(vec![atom("y")])]));
    assert_ne!(v, w);
}

#[test]
fn differences() {
    let base = Value::List(vec![atom("a"), hinted("h", "b")]);
    let variants = [
        Value::List(vec![atom("a"), hinted("h", "b"), atom("c")]),
        Value::List(vec![base.clone()]),
        Value::List(vec![atom("a")]),
        Value::List(vec![atom("a"), hinted("i", "b")]),
        Value::List(vec![atom("a"), atom("b")]),
        Value::List(vec![atom("a"), hinted("h", "c")]),
        Value::List(vec![hinted("h", "b"), atom("a")]),
        atom("ab"),
    ];
    for w in &variants {
        assert_ne!(&base, w);
        assert_ne!(base.to_canonical(), w.to_canonical());
    }
    assert_ne!(atom(""), Value::List(vec![]));
}

#[test]
fn absent_hint_is_empty_hint() {
    let plain = atom("x");
    let empty = hinted("", "x");
    assert_eq!(plain, empty);
    assert_eq!(plain.to_canonical(), empty.to_canonical());
    assert_eq!(plain.to_string(), empty.to_string());
    let set: HashSet<Value> = [plain, empty].into_iter().collect();
    assert_eq!(set.len(), 1);
}

#[test]
fn dump() {
    let v = Value::List(vec![atom("a"), hinted("", "b"), hinted("t", "c")]);
    assert_eq!(v.dump().to_string(),
               "(list (atom a) (atom b (hint \"\")) (atom c (hint t)))");
}
