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

use tests::{calc, engine, Calculator, Widget, IID_ICALC, IID_IWIDGET};
use typemarshal::{ArgFrame, Error, LoopbackChannel, Reply, RequestHandler, Status, Value};

#[test]
fn test_disconnect_without_connect() {
    let (engine, _) = engine();
    let proxy = engine.create_proxy(IID_ICALC).unwrap();
    assert!(matches!(proxy.disconnect(), Err(Error::NotConnected)));

    let err = proxy
        .invoke(calc::SET_VALUE, &mut ArgFrame::new().arg(Value::I4(1)))
        .unwrap_err();
    assert!(matches!(err, Error::NotConnected));
    assert_eq!(err.status(), Status::RPC_E_DISCONNECTED);
}

#[test]
fn test_disconnect_is_single_shot() {
    let (engine, _) = engine();
    let (proxy, stub) = engine.loopback(IID_ICALC, Calculator::new()).unwrap();
    assert!(proxy.is_connected());
    proxy.disconnect().unwrap();
    assert!(!proxy.is_connected());
    assert!(matches!(proxy.disconnect(), Err(Error::NotConnected)));

    stub.disconnect().unwrap();
    assert!(matches!(stub.disconnect(), Err(Error::NotConnected)));
}

#[test]
fn test_add_ref_and_release_stay_local() {
    let (engine, _) = engine();
    let calculator = Calculator::new();
    let (proxy, _stub) = engine.loopback(IID_ICALC, calculator.clone()).unwrap();

    assert_eq!(proxy.ref_count(), 1);
    let outcome = proxy.call_slot(1, &mut ArgFrame::new());
    assert_eq!(outcome.retval, Value::U4(2));
    let outcome = proxy.call_slot(2, &mut ArgFrame::new());
    assert_eq!(outcome.retval, Value::U4(1));
    assert_eq!(calculator.calls.load(std::sync::atomic::Ordering::SeqCst), 0);
    assert!(proxy.is_connected());
}

#[test]
fn test_final_release_disconnects_proxy() {
    let (engine, _) = engine();
    let calculator = Calculator::new();
    let (proxy, stub) = engine.loopback(IID_ICALC, calculator.clone()).unwrap();
    proxy
        .invoke(calc::SET_VALUE, &mut ArgFrame::new().arg(Value::I4(4)))
        .unwrap();
    assert_eq!(proxy.cached_methods(), 1);

    assert_eq!(proxy.add_ref(), 2);
    assert_eq!(proxy.release(), 1);
    assert!(proxy.is_connected());
    assert_eq!(proxy.release(), 0);
    assert!(!proxy.is_connected());
    assert_eq!(proxy.cached_methods(), 0);
    // the loopback channel held the only other reference to the stub
    assert_eq!(Arc::strong_count(&stub), 1);
    assert_eq!(proxy.release(), 0);
}

#[test]
fn test_final_release_drops_stub_target() {
    let (engine, _) = engine();
    let calculator = Calculator::new();
    let stub = engine.create_stub(IID_ICALC, calculator.clone()).unwrap();
    assert_eq!(Arc::strong_count(&calculator), 2);

    assert_eq!(stub.release(), 0);
    assert!(!stub.is_connected());
    assert_eq!(Arc::strong_count(&calculator), 1);
    assert_eq!(
        stub.handle(calc::GET_VALUE, &[]),
        Reply::Fault(Status::RPC_E_DISCONNECTED)
    );
}

#[test]
fn test_drop_releases_everything() {
    let (engine, _) = engine();
    let calculator = Calculator::new();
    {
        let (proxy, stub) = engine.loopback(IID_ICALC, calculator.clone()).unwrap();
        proxy
            .invoke(calc::SET_VALUE, &mut ArgFrame::new().arg(Value::I4(8)))
            .unwrap();
        drop(proxy);
        assert_eq!(Arc::strong_count(&stub), 1);
    }
    assert_eq!(Arc::strong_count(&calculator), 1);
    assert_eq!(calculator.value(), 8);
}

#[test]
fn test_connect_requires_interface_on_target() {
    let (engine, _) = engine();
    let err = engine.create_stub(IID_ICALC, Widget::new("w")).unwrap_err();
    assert!(matches!(err, Error::TargetInterfaceUnsupported(iid) if iid == IID_ICALC));
    assert_eq!(err.status(), Status::E_NOINTERFACE);

    let stub = engine.create_stub(IID_IWIDGET, Widget::new("w")).unwrap();
    stub.disconnect().unwrap();
    assert!(stub.connect(Calculator::new()).is_err());
    stub.connect(Widget::new("again")).unwrap();
    assert!(stub.is_connected());
}

#[test]
fn test_disconnected_stub_faults() {
    let (engine, _) = engine();
    let (proxy, stub) = engine.loopback(IID_ICALC, Calculator::new()).unwrap();
    stub.disconnect().unwrap();
    let err = proxy
        .invoke(calc::GET_VALUE, &mut ArgFrame::new())
        .unwrap_err();
    assert!(matches!(err, Error::RemoteFault(Status::RPC_E_DISCONNECTED)));

    let calculator = Calculator::new();
    stub.connect(calculator.clone()).unwrap();
    let outcome = proxy.invoke(calc::GET_VALUE, &mut ArgFrame::new()).unwrap();
    assert_eq!(outcome.retval, Value::I4(0));
    assert_eq!(calculator.calls.load(std::sync::atomic::Ordering::SeqCst), 1);

    // reconnecting the proxy to a fresh channel works too
    proxy.connect(Arc::new(LoopbackChannel::new(stub.clone())));
    assert!(proxy.invoke(calc::GET_VALUE, &mut ArgFrame::new()).is_ok());
}
