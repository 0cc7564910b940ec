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

use std::sync::atomic::Ordering;
use std::sync::Arc;

use tests::{
    calc, engine, init_tracing, registry, BrokenChannel, Calculator, Widget, IID_ICALC,
    IID_IWIDGET,
};
use typemarshal::{
    ArgFrame, CallConv, Engine, Error, InterfaceDesc, InterfaceId, InterfaceMarshaler,
    InterfaceRef, MethodDesc, ObjectTable, Outcome, ParamDesc, Status, TypeDesc, Unknown, Value,
    IID_IUNKNOWN,
};

const IID_IHOLDER: InterfaceId = InterfaceId::from_u128(0x2d6c8f10_4b1e_4f0a_a3c1_6e8b7d90a1f1);

mod holder {
    pub const HOLD: u32 = 3;
    pub const LEND: u32 = 4;
    pub const KEEP: u32 = 5;
}

/// Takes interface references in and hands them out, the latter with a
/// return value of the wrong type.
struct Holder;

impl Unknown for Holder {
    fn query_interface(self: Arc<Self>, iid: &InterfaceId) -> Option<InterfaceRef> {
        match *iid {
            IID_IUNKNOWN | IID_IHOLDER => Some(self as InterfaceRef),
            _ => None,
        }
    }

    fn invoke(&self, ordinal: u32, _: CallConv, args: &mut [Value]) -> Outcome {
        match (ordinal, args) {
            (holder::LEND, [item]) => {
                *item = Value::ptr(Value::interface(Widget::new("lent") as InterfaceRef));
                Outcome::ok(Value::from("not a count"))
            }
            _ => Outcome::default(),
        }
    }
}

fn holder_engine() -> (Engine, Arc<ObjectTable>) {
    let mut registry = registry();
    registry.register_interface(
        InterfaceDesc::new(IID_IHOLDER, "IHolder")
            .inherits(IID_IUNKNOWN)
            .method(
                MethodDesc::new("Hold", holder::HOLD)
                    .param(ParamDesc::input("item", TypeDesc::Unknown))
                    .param(ParamDesc::input(
                        "values",
                        TypeDesc::SafeArray(Box::new(TypeDesc::I4)),
                    )),
            )
            .method(
                MethodDesc::new("Lend", holder::LEND)
                    .param(ParamDesc::output("item", TypeDesc::ptr(TypeDesc::Unknown)))
                    .returns(TypeDesc::U4),
            )
            .method(
                MethodDesc::new("Keep", holder::KEEP)
                    .param(ParamDesc::input("item", TypeDesc::Unknown)),
            ),
    );
    let table = Arc::new(ObjectTable::new());
    (Engine::new(Arc::new(registry), table.clone()), table)
}

fn keep(widget: &InterfaceRef) -> ArgFrame {
    ArgFrame::new().arg(Value::interface(widget.clone()))
}

#[test]
fn test_object_table_is_single_use() {
    let table = ObjectTable::new();
    let widget: InterfaceRef = Widget::new("pinned");
    let blob = table.marshal_interface(&IID_IWIDGET, &widget).unwrap();
    assert_eq!(blob.len(), 24);
    assert_eq!(&blob[..16], IID_IWIDGET.as_bytes());
    assert_eq!(table.len(), 1);
    assert_eq!(Arc::strong_count(&widget), 2);

    let object = table.unmarshal_interface(&IID_IWIDGET, &blob).unwrap().unwrap();
    assert!(Arc::ptr_eq(&object, &widget));
    assert!(table.is_empty());

    let err = table.unmarshal_interface(&IID_IWIDGET, &blob).err().unwrap();
    assert!(matches!(err, Error::InvalidData(_)));
}

#[test]
fn test_object_table_checks_blob() {
    let table = ObjectTable::new();
    let widget: InterfaceRef = Widget::new("w");
    let blob = table.marshal_interface(&IID_IWIDGET, &widget).unwrap();

    let err = table.unmarshal_interface(&IID_IUNKNOWN, &blob).err().unwrap();
    assert!(matches!(err, Error::InvalidData(_)));
    assert!(table
        .unmarshal_interface(&IID_IWIDGET, &blob[..20])
        .is_err());
    // a rejected unmarshal leaves the reference pinned
    assert_eq!(table.len(), 1);

    assert!(table.revoke(&blob[..3]).is_none());
    assert!(table.revoke(&blob).is_some());
    assert!(table.is_empty());
    assert_eq!(Arc::strong_count(&widget), 1);
}

#[test]
fn test_handles_are_distinct() {
    let table = ObjectTable::new();
    let widget: InterfaceRef = Widget::new("w");
    let first = table.marshal_interface(&IID_IWIDGET, &widget).unwrap();
    let second = table.marshal_interface(&IID_IWIDGET, &widget).unwrap();
    assert_ne!(first, second);
    assert_eq!(table.len(), 2);
}

#[test]
fn test_engine_settings_reach_every_call() {
    init_tracing();
    let table = Arc::new(ObjectTable::new());
    let engine = Engine::new(Arc::new(registry()), table)
        .max_depth(0)
        .initial_capacity(4)
        .dump_buffers(true);
    assert_eq!(engine.config().max_depth(), 0);
    assert_eq!(engine.config().initial_capacity(), 4);
    assert!(engine.config().is_dump_buffers());

    let calculator = Calculator::new();
    let (proxy, _stub) = engine.loopback(IID_ICALC, calculator.clone()).unwrap();
    proxy
        .invoke(calc::SET_VALUE, &mut ArgFrame::new().arg(Value::I4(12)))
        .unwrap();
    assert_eq!(calculator.value(), 12);

    // the reply's pointer needs one level of nesting
    let mut frame = ArgFrame::new()
        .arg(Value::I4(12))
        .arg(Value::I4(4))
        .arg(Value::null_ptr());
    let err = proxy.invoke(calc::DIVIDE, &mut frame).unwrap_err();
    assert!(matches!(err, Error::RemoteFault(Status::E_FAIL)));
    assert_eq!(calculator.calls.load(Ordering::SeqCst), 2);
}

#[test]
fn test_engine_clones_share_library() {
    let (engine, table) = engine();
    let other = engine.clone().max_depth(2);
    assert_eq!(engine.config().max_depth(), 16);
    assert!(Arc::ptr_eq(engine.library(), other.library()));

    let (proxy, _stub) = other.loopback(IID_ICALC, Calculator::new()).unwrap();
    let mut frame = ArgFrame::new()
        .arg(Value::I4(9))
        .arg(Value::I4(3))
        .arg(Value::null_ptr());
    proxy.invoke(calc::DIVIDE, &mut frame).unwrap();
    assert_eq!(frame.nth(2), Some(&Value::ptr(Value::I4(3))));
    assert!(table.is_empty());
}

#[test]
fn test_transport_failure_releases_marshaled_references() {
    let (engine, table) = holder_engine();
    let proxy = engine.create_proxy(IID_IHOLDER).unwrap();
    proxy.connect(Arc::new(BrokenChannel));
    let widget: InterfaceRef = Widget::new("kept");

    for _ in 0..3 {
        let err = proxy.invoke(holder::KEEP, &mut keep(&widget)).unwrap_err();
        assert!(matches!(err, Error::TransportFailure(_)));
    }
    assert!(table.is_empty());
    assert_eq!(Arc::strong_count(&widget), 1);
}

#[test]
fn test_later_parameter_failure_releases_earlier_references() {
    let (engine, table) = holder_engine();
    let (proxy, _stub) = engine.loopback(IID_IHOLDER, Arc::new(Holder)).unwrap();
    let widget: InterfaceRef = Widget::new("held");

    let mut frame = ArgFrame::new()
        .arg(Value::interface(widget.clone()))
        .arg(Value::I4(0));
    let err = proxy.invoke(holder::HOLD, &mut frame).unwrap_err();
    assert!(matches!(err, Error::UnsupportedTypeKind(_)));
    drop(frame);
    assert!(table.is_empty());
    assert_eq!(Arc::strong_count(&widget), 1);
}

#[test]
fn test_remote_fault_releases_request_references() {
    let (engine, table) = holder_engine();
    let (proxy, stub) = engine.loopback(IID_IHOLDER, Arc::new(Holder)).unwrap();
    let widget: InterfaceRef = Widget::new("kept");
    stub.disconnect().unwrap();

    let err = proxy.invoke(holder::KEEP, &mut keep(&widget)).unwrap_err();
    assert!(matches!(err, Error::RemoteFault(Status::RPC_E_DISCONNECTED)));
    assert!(table.is_empty());
    assert_eq!(Arc::strong_count(&widget), 1);
}

#[test]
fn test_failed_reply_releases_out_references() {
    let (engine, table) = holder_engine();
    let (proxy, _stub) = engine.loopback(IID_IHOLDER, Arc::new(Holder)).unwrap();

    let mut frame = ArgFrame::new().arg(Value::null_ptr());
    let err = proxy.invoke(holder::LEND, &mut frame).unwrap_err();
    assert!(matches!(err, Error::RemoteFault(Status::DISP_E_TYPEMISMATCH)));
    assert!(table.is_empty());
}

#[test]
fn test_successful_call_leaves_nothing_pinned() {
    let (engine, table) = holder_engine();
    let (proxy, _stub) = engine.loopback(IID_IHOLDER, Arc::new(Holder)).unwrap();
    let widget: InterfaceRef = Widget::new("kept");

    let outcome = proxy.invoke(holder::KEEP, &mut keep(&widget)).unwrap();
    assert_eq!(outcome.status, Status::S_OK);
    assert!(table.is_empty());
    assert_eq!(Arc::strong_count(&widget), 1);
}

#[test]
fn test_release_of_consumed_blob_is_a_no_op() {
    let table = ObjectTable::new();
    let widget: InterfaceRef = Widget::new("w");
    let blob = table.marshal_interface(&IID_IWIDGET, &widget).unwrap();
    table.unmarshal_interface(&IID_IWIDGET, &blob).unwrap();
    table.release_marshal_data(&IID_IWIDGET, &blob).unwrap();
    assert!(table.is_empty());
    assert!(table.release_marshal_data(&IID_IWIDGET, &blob[..8]).is_err());
}
