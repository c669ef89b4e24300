//! Applying a [`FieldPolicy`] to a JSON record.

use std::convert::Infallible;

use serde_json::Value;
use tracing::warn;

use super::policy::FieldPolicy;
use crate::engine::FieldCipher;
use crate::error::CryptoError;

/// Segments of a dot-notation field path.
#[derive(Debug, PartialEq, Eq)]
enum PathSegment {
    /// Navigate into an object property by name.
    Key(String),
    /// Expand into every element of a JSON array.
    ArrayItem,
}

/// Parse a dot-notation path into a list of [`PathSegment`]s.
///
/// Array fields use the `[]` suffix before the dot separator, e.g.
/// `"guardians[].phone"` → `[Key("guardians"), ArrayItem, Key("phone")]`.
fn parse_path(path: &str) -> Vec<PathSegment> {
    let mut segments = Vec::new();
    for part in path.split('.') {
        if let Some(key) = part.strip_suffix("[]") {
            segments.push(PathSegment::Key(key.to_owned()));
            segments.push(PathSegment::ArrayItem);
        } else {
            segments.push(PathSegment::Key(part.to_owned()));
        }
    }
    segments
}

/// Navigate `value` following `segments` and rewrite every leaf at the end
/// of the path with `f`.
///
/// String leaves are passed as `Some`, `null` leaves as `None`. Missing keys
/// and leaves of any other type are left alone.
fn transform_at_path<E, F>(value: &mut Value, segments: &[PathSegment], f: &mut F) -> Result<(), E>
where
    F: FnMut(Option<&str>) -> Result<Option<String>, E>,
{
    let Some((head, rest)) = segments.split_first() else {
        match value {
            Value::String(s) => {
                *value = f(Some(s.as_str()))?.map_or(Value::Null, Value::String);
            }
            Value::Null => {
                if let Some(s) = f(None)? {
                    *value = Value::String(s);
                }
            }
            _ => {}
        }
        return Ok(());
    };

    match head {
        PathSegment::Key(key) => {
            if let Value::Object(map) = value {
                if let Some(child) = map.get_mut(key) {
                    transform_at_path(child, rest, f)?;
                }
            }
        }
        PathSegment::ArrayItem => {
            if let Value::Array(arr) = value {
                for item in arr.iter_mut() {
                    transform_at_path(item, rest, f)?;
                }
            }
        }
    }
    Ok(())
}

/// Return a copy of `record` with every policy field encrypted.
pub fn encrypt_record<C>(cipher: &C, policy: &FieldPolicy, record: &Value) -> Value
where
    C: FieldCipher + ?Sized,
{
    let mut out = record.clone();
    for (path, mode) in policy.iter() {
        let segments = parse_path(path);
        let result = transform_at_path(&mut out, &segments, &mut |v| {
            Ok::<_, Infallible>(cipher.encrypt_field(mode, v))
        });
        match result {
            Ok(()) => {}
            Err(never) => match never {},
        }
    }
    out
}

/// Return a copy of `record` with every policy field decrypted.
///
/// # Errors
///
/// Returns [`CryptoError::DecryptFailed`] if any field fails to decrypt.
/// No partially decrypted record is ever returned.
pub fn decrypt_record<C>(cipher: &C, policy: &FieldPolicy, record: &Value) -> Result<Value, CryptoError>
where
    C: FieldCipher + ?Sized,
{
    let mut out = record.clone();
    for (path, mode) in policy.iter() {
        let segments = parse_path(path);
        transform_at_path(&mut out, &segments, &mut |v| cipher.decrypt_field(mode, v)).map_err(
            |e| {
                warn!(path, %mode, "record field failed to decrypt");
                e
            },
        )?;
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crypto::KEY_LEN;
    use crate::engine::{Engine, MockFieldCipher};
    use common::Mode;
    use serde_json::json;

    fn engine() -> Engine {
        Engine::new(&[0x42u8; KEY_LEN]).unwrap()
    }

    fn policy() -> FieldPolicy {
        FieldPolicy::parse(
            "email:deterministic,phone:deterministic,notes:probabilistic,\
             profile.address.city:probabilistic,guardians[].name:probabilistic",
        )
        .unwrap()
    }

    #[test]
    fn parse_path_flat() {
        assert_eq!(parse_path("email"), vec![PathSegment::Key("email".into())]);
    }

    #[test]
    fn parse_path_nested() {
        assert_eq!(parse_path("profile.address.city").len(), 3);
    }

    #[test]
    fn parse_path_array() {
        let segs = parse_path("guardians[].name");
        assert_eq!(segs.len(), 3);
        assert_eq!(segs[1], PathSegment::ArrayItem);
    }

    #[test]
    fn encrypts_listed_fields_only() {
        let e = engine();
        let record = json!({
            "email": "test@example.com",
            "phone": "+62 812 0000 0000",
            "notes": "prefers morning interviews",
            "status": "submitted",
            "profile": {"address": {"city": "Bandung"}},
            "guardians": [{"name": "Siti"}, {"name": "Agus"}]
        });
        let sealed = encrypt_record(&e, &policy(), &record);

        assert_eq!(sealed["status"], "submitted");
        assert_eq!(
            sealed["email"].as_str().unwrap(),
            e.encrypt_deterministic("test@example.com")
        );
        assert_ne!(sealed["notes"], record["notes"]);
        assert_ne!(sealed["profile"]["address"]["city"], "Bandung");
        for g in sealed["guardians"].as_array().unwrap() {
            assert!(g["name"].as_str().unwrap().len() > 20);
        }

        assert_eq!(decrypt_record(&e, &policy(), &sealed).unwrap(), record);
    }

    #[test]
    fn deterministic_fields_are_searchable() {
        let e = engine();
        let a = encrypt_record(&e, &policy(), &json!({"email": "a@b.c", "notes": "n"}));
        let b = encrypt_record(&e, &policy(), &json!({"email": "a@b.c", "notes": "n"}));
        assert_eq!(a["email"], b["email"]);
        assert_ne!(a["notes"], b["notes"]);
    }

    #[test]
    fn null_and_missing_pass_through() {
        let e = engine();
        let record = json!({"email": null, "notes": 42});
        let sealed = encrypt_record(&e, &policy(), &record);
        assert_eq!(sealed, record);
        assert_eq!(decrypt_record(&e, &policy(), &sealed).unwrap(), record);
    }

    #[test]
    fn empty_string_field_stays_empty() {
        let e = engine();
        let sealed = encrypt_record(&e, &policy(), &json!({"email": ""}));
        assert_eq!(sealed["email"], "");
    }

    #[test]
    fn one_bad_field_fails_whole_record() {
        let e = engine();
        let mut sealed = encrypt_record(
            &e,
            &policy(),
            &json!({"email": "a@b.c", "notes": "fine", "phone": "0812"}),
        );
        sealed["notes"] = json!("bm90IGEgcmVhbCBjaXBoZXJ0ZXh0");
        assert_eq!(
            decrypt_record(&e, &policy(), &sealed).unwrap_err(),
            CryptoError::DecryptFailed
        );
    }

    #[test]
    fn decrypt_stops_at_first_failure() {
        let mut mock = MockFieldCipher::new();
        mock.expect_decrypt_field()
            .times(1)
            .returning(|_, _| Err(CryptoError::DecryptFailed));

        let mut policy = FieldPolicy::new();
        policy
            .insert("a", Mode::Deterministic)
            .insert("b", Mode::Probabilistic);
        let record = json!({"a": "x", "b": "y"});
        assert_eq!(
            decrypt_record(&mock, &policy, &record).unwrap_err(),
            CryptoError::DecryptFailed
        );
    }

    #[test]
    fn encrypt_passes_mode_and_value() {
        let mut mock = MockFieldCipher::new();
        mock.expect_encrypt_field()
            .withf(|mode, value| *mode == Mode::Probabilistic && *value == Some("Siti"))
            .times(2)
            .returning(|_, _| Some("sealed".to_owned()));

        let mut policy = FieldPolicy::new();
        policy.insert("guardians[].name", Mode::Probabilistic);
        let out = encrypt_record(
            &mock,
            &policy,
            &json!({"guardians": [{"name": "Siti"}, {"name": "Siti"}, {"age": 40}]}),
        );
        assert_eq!(out["guardians"][0]["name"], "sealed");
        assert_eq!(out["guardians"][2], json!({"age": 40}));
    }

    #[test]
    fn null_leaf_reaches_cipher_as_absent() {
        let mut mock = MockFieldCipher::new();
        mock.expect_decrypt_field()
            .withf(|_, value| value.is_none())
            .times(1)
            .returning(|_, _| Ok(None));

        let mut policy = FieldPolicy::new();
        policy.insert("email", Mode::Deterministic);
        let out = decrypt_record(&mock, &policy, &json!({"email": null})).unwrap();
        assert_eq!(out, json!({"email": null}));
    }
}
