use super::*;

const ADDR_HEX: &str = "2c4a11c062a8a337bfc97e27fd66291caeb2c65865dcb5d3ef3759c4c97efecb";

#[test]
fn uref_key_round_trips_through_its_string_form() {
    let input = format!("uref-{}-007", ADDR_HEX);
    let key = Key::from_formatted_str(&input).unwrap();

    let uref = match key {
        Key::URef(uref) => uref,
        other => panic!("expected a URef key, got {:?}", other),
    };
    assert_eq!(hex::encode(uref.addr()), ADDR_HEX);
    assert_eq!(uref.access_rights().bits(), 7);
    assert_eq!(key.to_formatted_string(), input);
}

#[test]
fn account_and_hash_prefixes_map_to_their_variants() {
    let account = Key::from_formatted_str(&format!("account-hash-{}", ADDR_HEX)).unwrap();
    let hash = Key::from_formatted_str(&format!("hash-{}", ADDR_HEX)).unwrap();
    assert!(matches!(account, Key::Account(_)));
    assert!(matches!(hash, Key::Hash(_)));
    assert_eq!(account.addr(), hash.addr());
    assert_ne!(account, hash);
}

#[test]
fn unknown_prefix_is_an_error() {
    let input = format!("deploy-{}", ADDR_HEX);
    let err = Key::from_formatted_str(&input).unwrap_err();
    assert!(matches!(err, Error::InvalidKeyPrefix(s) if s == input));
}

#[test]
fn short_address_is_rejected() {
    let err = Key::from_formatted_str("hash-0102").unwrap_err();
    assert!(matches!(err, Error::Formatting(_)));
}

#[test]
fn uref_without_rights_is_rejected() {
    assert!(URef::from_formatted_str(&format!("uref-{}", ADDR_HEX)).is_err());
}

#[test]
fn access_rights_above_seven_are_rejected() {
    let input = format!("uref-{}-010", ADDR_HEX);
    assert!(matches!(
        URef::from_formatted_str(&input),
        Err(Error::Formatting(_))
    ));
}

#[test]
fn access_rights_flags() {
    assert!(AccessRights::ReadAdd.is_readable());
    assert!(AccessRights::ReadAdd.is_addable());
    assert!(!AccessRights::ReadAdd.is_writeable());
    assert!(!AccessRights::None.is_readable());
}

#[test]
fn key_bytes_carry_variant_tag() {
    let uref = URef::new([3; KEY_HASH_LENGTH], AccessRights::ReadWrite);
    let bytes = Key::URef(uref).to_bytes();
    assert_eq!(bytes.len(), 1 + KEY_HASH_LENGTH + 1);
    assert_eq!(bytes[0], 2);
    assert_eq!(bytes[KEY_HASH_LENGTH + 1], 3);

    let (decoded, rem) = Key::from_bytes(&bytes).unwrap();
    assert!(rem.is_empty());
    assert_eq!(decoded, Key::URef(uref));
}

#[test]
fn from_str_parses_formatted_keys() {
    let key: Key = format!("hash-{}", ADDR_HEX).parse().unwrap();
    assert_eq!(key.to_string(), format!("hash-{}", ADDR_HEX));
}

#[test]
fn account_hash_requires_its_prefix() {
    let input = format!("account-hash-{}", ADDR_HEX);
    let account_hash = AccountHash::from_formatted_str(&input).unwrap();
    assert_eq!(account_hash.to_string(), input);
    assert_eq!(
        Key::from(account_hash),
        Key::from_formatted_str(&input).unwrap()
    );

    let err = AccountHash::from_formatted_str(&format!("hash-{}", ADDR_HEX)).unwrap_err();
    assert!(matches!(err, Error::InvalidKeyPrefix(_)));
}
