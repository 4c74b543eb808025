//! JSON status envelope for host-side probing of the runtime.

use std::ffi::CString;

use serde::Serialize;
use serde_json::{json, Map, Value};

use crate::error::{StatusCode, HS_OK};

const RESERVED_FIELDS: &[&str] = &["ok", "code", "msg"];

pub struct Envelope {
    map: Map<String, Value>,
}

impl Envelope {
    fn from_value(value: Value) -> Self {
        match value {
            Value::Object(map) => Self { map },
            _ => panic!("JSON envelope must be an object"),
        }
    }

    pub fn into_string(self) -> String {
        serde_json::to_string(&Value::Object(self.map)).expect("failed to serialize JSON envelope")
    }

    pub fn into_cstring(self) -> CString {
        CString::new(self.into_string()).expect("JSON envelopes must not contain NUL bytes")
    }
}

pub fn ok() -> Envelope {
    Envelope::from_value(json!({
        "ok": true,
        "code": HS_OK,
        "msg": "OK",
    }))
}

pub fn err(code: StatusCode, msg: impl Into<String>) -> Envelope {
    Envelope::from_value(json!({
        "ok": false,
        "code": code.code(),
        "msg": msg.into(),
    }))
}

pub fn with_field<T>(mut envelope: Envelope, key: impl Into<String>, value: T) -> Envelope
where
    T: Serialize,
{
    let key = key.into();
    if RESERVED_FIELDS.contains(&key.as_str()) {
        panic!("field '{key}' is reserved by the FFI envelope");
    }

    let value = serde_json::to_value(value).expect("failed to serialize field value");
    envelope.map.insert(key, value);
    envelope
}

/// The probe envelope: version, native word width, supported kinds.
pub fn status() -> Envelope {
    let env = with_field(ok(), "version", hardstop_corelib::version());
    let env = with_field(env, "word_bits", hardstop_corelib::WORD_BITS);
    with_field(env, "kinds", hardstop_corelib::kind_table())
}
