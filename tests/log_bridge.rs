// Copyright 2024 FastLabs Developers
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use std::sync::Arc;

use perceptor::target::Capture;
use perceptor::LoggerId;
use perceptor::Registry;
use perceptor::Severity;

// The bridge becomes the process-wide `log` logger, so everything driving
// it lives in this one test.
#[test]
fn test_log_macros_route_by_target() {
    let net = LoggerId::new("net");
    let registry = Arc::new(Registry::builder().build());

    let capture = Capture::new();
    let handle = capture.handle();
    assert!(registry.append_target(&net, Arc::new(capture)));
    registry.initialize();

    perceptor::bridge::try_install(registry.clone()).unwrap();

    log::info!(target: "net", "connection from {}", "10.0.0.7");
    log::warn!(target: "net", ratio = 0.97; "buffer nearly full");
    log::debug!("module-target lines land on the default logger");
    log::logger().flush();

    let entries = handle.collect();
    assert_eq!(entries.len(), 2);
    assert_eq!(entries[0].severity(), Severity::Info);
    assert_eq!(entries[0].line(), "connection from 10.0.0.7");
    assert_eq!(entries[1].severity(), Severity::Warn);
    assert_eq!(entries[1].line(), "buffer nearly full ratio=0.97");
}
