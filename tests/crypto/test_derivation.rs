// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Per-object key derivation tests

use siws_vault::crypto::{derive_key, generate_master_key, CryptoError, DEFAULT_MASTER_KEY_LEN};

#[test]
fn test_derivation_is_deterministic() {
    let master = generate_master_key(DEFAULT_MASTER_KEY_LEN).unwrap();
    let object_id = [0x42u8; 32];

    let a = derive_key(master.as_bytes(), &object_id).unwrap();
    let b = derive_key(master.as_bytes(), &object_id).unwrap();
    assert_eq!(a.as_bytes(), b.as_bytes());
}

#[test]
fn test_one_byte_change_in_master_changes_key() {
    let master = [7u8; 32];
    let object_id = [9u8; 32];
    let base = derive_key(&master, &object_id).unwrap();

    for index in [0, 15, 31] {
        let mut altered = master;
        altered[index] ^= 0x01;
        let key = derive_key(&altered, &object_id).unwrap();
        assert_ne!(key.as_bytes(), base.as_bytes(), "master byte {}", index);
    }
}

#[test]
fn test_one_byte_change_in_object_id_changes_key() {
    let master = [7u8; 32];
    let object_id = [9u8; 32];
    let base = derive_key(&master, &object_id).unwrap();

    for index in [0, 15, 31] {
        let mut altered = object_id;
        altered[index] ^= 0x80;
        let key = derive_key(&master, &altered).unwrap();
        assert_ne!(key.as_bytes(), base.as_bytes(), "object id byte {}", index);
    }
}

#[test]
fn test_object_id_must_be_32_bytes() {
    let master = [1u8; 32];
    for len in [0usize, 16, 31, 33, 64] {
        let err = derive_key(&master, &vec![0u8; len]).unwrap_err();
        assert!(matches!(err, CryptoError::InvalidInput { .. }), "length {}", len);
    }
}

#[test]
fn test_master_key_length_floor() {
    let object_id = [0u8; 32];
    assert!(derive_key(&[1u8; 15], &object_id).is_err());
    assert!(derive_key(&[1u8; 16], &object_id).is_ok());
    assert!(derive_key(&[1u8; 64], &object_id).is_ok());
}

#[test]
fn test_generated_master_keys_differ() {
    let a = generate_master_key(32).unwrap();
    let b = generate_master_key(32).unwrap();
    assert_eq!(a.as_bytes().len(), 32);
    assert_ne!(a.as_bytes(), b.as_bytes());
}
