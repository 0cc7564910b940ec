// Licensed to the Apache Software Foundation (ASF) under one
// or more contributor license agreements.  See the NOTICE file
// distributed with this work for additional information
// regarding copyright ownership.  The ASF licenses this file
// to you under the Apache License, Version 2.0 (the
// "License"); you may not use this file except in compliance
// with the License.  You may obtain a copy of the License at
//
//   http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing,
// software distributed under the License is distributed on an
// "AS IS" BASIS, WITHOUT WARRANTIES OR CONDITIONS OF ANY
// KIND, either express or implied.  See the License for the
// specific language governing permissions and limitations
// under the License.

use std::sync::Arc;

use tests::{fixture, Fixture, Widget, IID_IWIDGET};
use typemarshal_core::buffer::MarshalBuffer;
use typemarshal_core::config::Config;
use typemarshal_core::error::Error;
use typemarshal_core::meta::{RecordLayout, TypeDesc};
use typemarshal_core::object::{InterfaceMarshaler, InterfaceRef, ObjectTable};
use typemarshal_core::resolver::MarshalContext;
use typemarshal_core::serializer;
use typemarshal_core::types::{InterfaceId, IID_IDISPATCH, IID_IUNKNOWN};
use typemarshal_core::value::Value;

struct Harness {
    fx: Fixture,
    table: ObjectTable,
    config: Config,
}

impl Harness {
    fn new() -> Harness {
        Harness {
            fx: fixture(),
            table: ObjectTable::new(),
            config: Config::default(),
        }
    }

    fn context(&self, bytes: Vec<u8>) -> MarshalContext<'_> {
        MarshalContext::new(
            MarshalBuffer::from_bytes(bytes),
            &self.fx.registry,
            &self.table,
            &self.config,
        )
    }

    fn encode(&self, desc: &TypeDesc, value: &Value) -> Result<Vec<u8>, Error> {
        let mut context = self.context(Vec::new());
        serializer::write(desc, value, "value", &mut context)?;
        Ok(context.buffer.into_bytes())
    }

    fn decode(&self, desc: &TypeDesc, bytes: &[u8]) -> Result<Value, Error> {
        let mut context = self.context(bytes.to_vec());
        let value = serializer::read(desc, "value", &mut context)?;
        assert_eq!(context.buffer.remaining(), 0, "trailing bytes after {desc:?}");
        Ok(value)
    }

    fn roundtrip(&self, desc: &TypeDesc, value: Value) -> Vec<u8> {
        let bytes = self.encode(desc, &value).unwrap();
        assert_eq!(self.decode(desc, &bytes).unwrap(), value, "{desc:?}");
        bytes
    }
}

#[test]
fn test_fixed_width_numerics() {
    let h = Harness::new();
    assert_eq!(h.roundtrip(&TypeDesc::I4, Value::I4(-7)), [0xf9, 0xff, 0xff, 0xff]);
    assert_eq!(h.roundtrip(&TypeDesc::Bool, Value::Bool(true)), [0xff, 0xff]);
    assert_eq!(h.roundtrip(&TypeDesc::Bool, Value::Bool(false)), [0, 0]);
    assert_eq!(h.roundtrip(&TypeDesc::U2, Value::U2(0x0102)), [2, 1]);
    assert_eq!(h.roundtrip(&TypeDesc::I1, Value::I1(-1)), [0xff]);
    assert_eq!(h.roundtrip(&TypeDesc::U8, Value::U8(u64::MAX)).len(), 8);
    h.roundtrip(&TypeDesc::U1, Value::U1(200));
    h.roundtrip(&TypeDesc::I2, Value::I2(-300));
    h.roundtrip(&TypeDesc::U4, Value::U4(70_000));
    h.roundtrip(&TypeDesc::I8, Value::I8(i64::MIN));
    h.roundtrip(&TypeDesc::Int, Value::Int(-1));
    h.roundtrip(&TypeDesc::UInt, Value::UInt(1));
    h.roundtrip(&TypeDesc::R4, Value::R4(0.25));
    h.roundtrip(&TypeDesc::R8, Value::R8(-1e300));
    h.roundtrip(&TypeDesc::Currency, Value::Currency(12_3400));
    h.roundtrip(&TypeDesc::Date, Value::Date(45_000.5));
    h.roundtrip(&TypeDesc::HResult, Value::HResult(-2147467259));
    h.roundtrip(&TypeDesc::Error, Value::Error(0x8002_0004_u32 as i32));
}

#[test]
fn test_strings() {
    let h = Harness::new();
    assert_eq!(h.roundtrip(&TypeDesc::Bstr, Value::from("")), [0, 0, 0, 0]);
    let bytes = h.roundtrip(&TypeDesc::Bstr, Value::from("héllo"));
    assert_eq!(&bytes[..4], &[6, 0, 0, 0]);

    let err = h.decode(&TypeDesc::Bstr, &[2, 0, 0, 0, 0xff, 0xfe]).unwrap_err();
    assert!(matches!(err, Error::InvalidData(_)));
}

#[test]
fn test_pointers() {
    let h = Harness::new();
    let int_ptr = TypeDesc::ptr(TypeDesc::I4);
    assert_eq!(h.roundtrip(&int_ptr, Value::null_ptr()), [0, 0, 0, 0]);
    assert_eq!(
        h.roundtrip(&int_ptr, Value::ptr(Value::I4(5))),
        [4, 0, 0, 0, 5, 0, 0, 0]
    );
    let str_ptr_ptr = TypeDesc::ptr(TypeDesc::ptr(TypeDesc::Bstr));
    h.roundtrip(&str_ptr_ptr, Value::ptr(Value::ptr(Value::from("deep"))));
    h.roundtrip(&str_ptr_ptr, Value::ptr(Value::null_ptr()));

    let err = h.decode(&int_ptr, &[2, 0, 0, 0, 5, 0]).unwrap_err();
    assert!(matches!(err, Error::TruncatedBuffer { .. }));
}

#[test]
fn test_records() {
    let mut h = Harness::new();
    let point = TypeDesc::UserDefined(h.fx.point);
    let bytes = h.roundtrip(&point, Value::Record(vec![Value::I4(1), Value::I4(-2)]));
    assert_eq!(bytes, [8, 0, 0, 0, 1, 0, 0, 0, 0xfe, 0xff, 0xff, 0xff]);

    let empty = TypeDesc::UserDefined(h.fx.registry.register_record(RecordLayout::new("EMPTY")));
    assert_eq!(h.roundtrip(&empty, Value::Record(vec![])), [0, 0, 0, 0]);

    let bytes = h.roundtrip(&TypeDesc::guid(), Value::from(IID_IWIDGET));
    assert_eq!(&bytes[..4], &[16, 0, 0, 0]);
    assert_eq!(&bytes[4..], IID_IWIDGET.as_bytes());

    let err = h
        .encode(&point, &Value::Record(vec![Value::I4(1)]))
        .unwrap_err();
    assert!(matches!(err, Error::TypeMismatch { .. }));

    let mut context = h.context(vec![5, 0, 0, 0, 1, 0, 0, 0, 2, 0, 0, 0, 9]);
    let err = serializer::read(&point, "p", &mut context).unwrap_err();
    assert!(matches!(err, Error::InvalidData(_)));
}

#[test]
fn test_variants() {
    let h = Harness::new();
    assert_eq!(
        h.roundtrip(&TypeDesc::Variant, Value::variant(Value::I4(3))),
        [3, 0, 0, 0, 3, 0, 0, 0]
    );
    assert_eq!(
        h.roundtrip(&TypeDesc::Variant, Value::variant(Value::Empty)),
        [0, 0, 0, 0]
    );
    assert_eq!(
        h.roundtrip(&TypeDesc::Variant, Value::variant(Value::Null)),
        [1, 0, 0, 0]
    );
    h.roundtrip(&TypeDesc::Variant, Value::variant(Value::from("text")));
    h.roundtrip(&TypeDesc::Variant, Value::variant(Value::Bool(true)));
    h.roundtrip(&TypeDesc::Variant, Value::variant(Value::Currency(-5)));

    let widget: InterfaceRef = Widget::new("w");
    h.roundtrip(&TypeDesc::Variant, Value::variant(Value::interface(widget)));

    let err = h
        .encode(&TypeDesc::Variant, &Value::variant(Value::null_ptr()))
        .unwrap_err();
    assert!(matches!(err, Error::UnsupportedTypeKind(_)));
    let err = h.encode(&TypeDesc::Variant, &Value::I4(1)).unwrap_err();
    assert!(matches!(err, Error::TypeMismatch { .. }));

    // SAFEARRAY and an unassigned tag
    for tag in [27u32, 0xffff] {
        let err = h.decode(&TypeDesc::Variant, &tag.to_le_bytes()).unwrap_err();
        assert!(matches!(err, Error::UnsupportedTypeKind(_)), "{tag}");
    }
}

#[test]
fn test_alias_and_enum() {
    let mut h = Harness::new();
    let color = h.fx.registry.register_enum();
    let name = h.fx.registry.register_alias(TypeDesc::Bstr);
    let alias_of_alias = h.fx.registry.register_alias(TypeDesc::UserDefined(name));
    assert_eq!(
        h.roundtrip(&TypeDesc::UserDefined(color), Value::I4(2)),
        [2, 0, 0, 0]
    );
    h.roundtrip(&TypeDesc::UserDefined(alias_of_alias), Value::from("aliased"));
}

#[test]
fn test_interface_references() {
    let mut h = Harness::new();
    let widget_ref = h.fx.registry.register_interface_ref(IID_IWIDGET);
    let desc = TypeDesc::UserDefined(widget_ref);
    assert_eq!(h.roundtrip(&desc, Value::Interface(None)), [0, 0, 0, 0]);

    let widget: InterfaceRef = Widget::new("w");
    let bytes = h.roundtrip(&desc, Value::interface(widget.clone()));
    assert_eq!(&bytes[..4], &[24, 0, 0, 0]);
    assert_eq!(&bytes[4..20], IID_IWIDGET.as_bytes());
    assert!(h.table.is_empty());

    let err = h.decode(&desc, &bytes).unwrap_err();
    assert!(matches!(err, Error::InvalidData(_)));
    assert_eq!(Arc::strong_count(&widget), 1);
}

#[test]
fn test_dispatch_variant_goes_back_out_as_unknown() {
    let h = Harness::new();
    let widget: InterfaceRef = Widget::new("w");
    let blob = h.table.marshal_interface(&IID_IDISPATCH, &widget).unwrap();
    let mut bytes = vec![9, 0, 0, 0, blob.len() as u8, 0, 0, 0];
    bytes.extend_from_slice(&blob);

    let value = h.decode(&TypeDesc::Variant, &bytes).unwrap();
    assert_eq!(value, Value::variant(Value::interface(widget.clone())));
    assert!(h.table.is_empty());

    let again = h.encode(&TypeDesc::Variant, &value).unwrap();
    assert_eq!(&again[..4], &[13, 0, 0, 0]);
    assert_eq!(&again[8..24], IID_IUNKNOWN.as_bytes());
    assert_eq!(h.decode(&TypeDesc::Variant, &again).unwrap(), value);
    assert!(h.table.is_empty());
}

#[test]
fn test_unsupported_kinds_are_reported() {
    let h = Harness::new();
    let kinds = [
        TypeDesc::Decimal,
        TypeDesc::LpStr,
        TypeDesc::LpWStr,
        TypeDesc::SafeArray(Box::new(TypeDesc::I4)),
        TypeDesc::CArray(Box::new(TypeDesc::I4), 4),
        TypeDesc::Void,
    ];
    for desc in kinds {
        let err = h.encode(&desc, &Value::I4(0)).unwrap_err();
        assert!(matches!(err, Error::UnsupportedTypeKind(_)), "{desc:?}");
        let err = h.decode(&desc, &[0; 16]).unwrap_err();
        assert!(matches!(err, Error::UnsupportedTypeKind(_)), "{desc:?}");
    }
    let err = h
        .encode(&TypeDesc::UserDefined(typemarshal_core::types::TypeRef(999)), &Value::I4(0))
        .unwrap_err();
    assert!(matches!(err, Error::UnknownType(_)));
}

#[test]
fn test_type_mismatch() {
    let h = Harness::new();
    let err = h.encode(&TypeDesc::I4, &Value::from("seven")).unwrap_err();
    match err {
        Error::TypeMismatch { expected, found } => {
            assert_eq!(expected, "I4");
            assert_eq!(found, "Str");
        }
        other => panic!("unexpected {other:?}"),
    }
    let err = h.encode(&TypeDesc::ptr(TypeDesc::I4), &Value::I4(1)).unwrap_err();
    assert!(matches!(err, Error::TypeMismatch { .. }));
}

#[test]
fn test_truncated_input_never_overreads() {
    let h = Harness::new();
    let cases = vec![
        (TypeDesc::I4, Value::I4(1)),
        (TypeDesc::Bool, Value::Bool(true)),
        (TypeDesc::R8, Value::R8(2.0)),
        (TypeDesc::Bstr, Value::from("abc")),
        (TypeDesc::ptr(TypeDesc::I8), Value::ptr(Value::I8(3))),
        (
            TypeDesc::UserDefined(h.fx.point),
            Value::Record(vec![Value::I4(1), Value::I4(2)]),
        ),
        (TypeDesc::guid(), Value::from(IID_IUNKNOWN)),
        (TypeDesc::Variant, Value::variant(Value::from("v"))),
        (TypeDesc::Unknown, Value::interface(Widget::new("t"))),
    ];
    for (desc, value) in cases {
        let bytes = h.encode(&desc, &value).unwrap();
        for cut in 0..bytes.len() {
            let err = h.decode(&desc, &bytes[..cut]).unwrap_err();
            assert!(
                matches!(err, Error::TruncatedBuffer { .. }),
                "{desc:?} cut at {cut}: {err}"
            );
        }
    }
}

#[test]
fn test_riid_feeds_untyped_reference() {
    let h = Harness::new();
    let widget: InterfaceRef = Widget::new("w");

    let mut context = h.context(Vec::new());
    serializer::write(&TypeDesc::guid(), &Value::from(IID_IWIDGET), "riid", &mut context).unwrap();
    serializer::write(
        &TypeDesc::UntypedInterface,
        &Value::interface(widget.clone()),
        "ppv",
        &mut context,
    )
    .unwrap();
    assert_eq!(context.riid, Some(IID_IWIDGET));
    let bytes = context.buffer.into_bytes();
    assert_eq!(&bytes[24..40], IID_IWIDGET.as_bytes());

    let mut context = h.context(bytes);
    serializer::read(&TypeDesc::guid(), "riid", &mut context).unwrap();
    let value = serializer::read(&TypeDesc::UntypedInterface, "ppv", &mut context).unwrap();
    assert_eq!(value, Value::interface(widget));
}

#[test]
fn test_riid_only_from_the_reserved_name() {
    let h = Harness::new();
    let mut context = h.context(Vec::new());
    serializer::write(&TypeDesc::guid(), &Value::from(IID_IWIDGET), "iid", &mut context).unwrap();
    serializer::write(
        &TypeDesc::UntypedInterface,
        &Value::interface(Widget::new("w")),
        "ppv",
        &mut context,
    )
    .unwrap();
    assert_eq!(context.riid, None);
    let bytes = context.buffer.into_bytes();
    assert_eq!(&bytes[24..40], IID_IUNKNOWN.as_bytes());
}

#[test]
fn test_riid_as_record_field() {
    let mut h = Harness::new();
    let request = h.fx.registry.register_record(
        RecordLayout::new("REQUEST")
            .field("riid", TypeDesc::guid())
            .field("flags", TypeDesc::U4),
    );
    let mut context = h.context(Vec::new());
    let value = Value::Record(vec![Value::from(IID_IWIDGET), Value::U4(1)]);
    serializer::write(&TypeDesc::UserDefined(request), &value, "req", &mut context).unwrap();
    assert_eq!(context.riid, Some(IID_IWIDGET));

    let other = InterfaceId::from_u128(0x42);
    serializer::write(
        &TypeDesc::ptr(TypeDesc::guid()),
        &Value::ptr(Value::from(other)),
        "riid",
        &mut context,
    )
    .unwrap();
    assert_eq!(context.riid, Some(other));
}

#[test]
fn test_depth_limit() {
    let mut h = Harness::new();
    let desc = TypeDesc::ptr(TypeDesc::ptr(TypeDesc::ptr(TypeDesc::I4)));
    let value = Value::ptr(Value::ptr(Value::ptr(Value::I4(1))));
    h.roundtrip(&desc, value.clone());

    h.config = Config {
        max_depth: 2,
        ..Config::default()
    };
    let err = h.encode(&desc, &value).unwrap_err();
    assert!(matches!(err, Error::DepthExceed(_)));
}
