use super::*;

#[test]
fn primitive_handles_are_fixed() {
    assert_eq!(TypeIdentity::UNIT.raw(), 1);
    assert_eq!(TypeIdentity::BOOL.raw(), 2);
    assert_eq!(TypeIdentity::I32.raw(), 3);
    assert_eq!(TypeIdentity::I64.raw(), 4);
    assert_eq!(TypeIdentity::F64.raw(), 5);
    assert_eq!(TypeIdentity::CHAR.raw(), 6);
    assert_eq!(TypeIdentity::U8.raw(), 7);
    assert_eq!(TypeIdentity::STRING.raw(), 8);
}

#[test]
fn zero_is_not_an_identity() {
    assert_eq!(TypeIdentity::from_raw(0), None);
    assert_eq!(TypeIdentity::from_raw(3), Some(TypeIdentity::I32));
}

#[test]
fn primitive_check_works() {
    assert!(TypeIdentity::STRING.is_primitive());
    let dynamic = TypeIdentity::from_raw(TypeIdentity::FIRST_DYNAMIC);
    assert!(dynamic.is_some_and(|ty| !ty.is_primitive()));
}

#[test]
fn display_uses_primitive_names() {
    assert_eq!(TypeIdentity::I32.to_string(), "i32");
    assert_eq!(TypeIdentity::STRING.to_string(), "String");
    let dynamic = TypeIdentity::from_raw(40).map(|ty| ty.to_string());
    assert_eq!(dynamic.as_deref(), Some("type#40"));
}

#[test]
fn identity_equality() {
    assert_eq!(TypeIdentity::I32, TypeIdentity::I32);
    assert_ne!(TypeIdentity::I32, TypeIdentity::I64);
    assert_eq!(TypeIdentity::from_raw(100), TypeIdentity::from_raw(100));
}
