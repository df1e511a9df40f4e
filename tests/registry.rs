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

use perceptor::layout::RawTextLayout;
use perceptor::layout::SeverityTagLayout;
use perceptor::target::Capture;
use perceptor::target::Pipe;
use perceptor::Layout;
use perceptor::LoggerId;
use perceptor::LoggerSettings;
use perceptor::MemoryStore;
use perceptor::Registry;
use perceptor::Severity;
use perceptor::TargetDescriptor;

#[test]
fn test_precache_replays_into_staged_targets() {
    let boot = LoggerId::new("boot");
    let registry = Registry::builder().build();

    let capture = Capture::new();
    let handle = capture.handle();
    assert!(registry.append_target(&boot, Arc::new(capture)));

    registry.info(&boot, "first");
    registry.warn(&boot, "second");
    assert!(!registry.is_initialized());
    assert!(handle.is_empty());

    registry.initialize();
    assert_eq!(handle.lines(), vec!["first", "second"]);

    registry.info(&boot, "third");
    assert_eq!(handle.lines(), vec!["first", "second", "third"]);
}

#[test]
fn test_discarded_precache_is_not_replayed() {
    let boot = LoggerId::new("boot");
    let registry = Registry::builder().discard_precache().build();

    let capture = Capture::new();
    let handle = capture.handle();
    assert!(registry.append_target(&boot, Arc::new(capture)));

    registry.info(&boot, "lost");
    registry.initialize();
    assert!(handle.is_empty());

    registry.info(&boot, "kept");
    assert_eq!(handle.lines(), vec!["kept"]);
}

#[test]
fn test_pipe_descriptor_fans_into_destination() {
    let engine = LoggerId::new("engine");
    let relay = LoggerId::new("relay");
    let registry = Registry::builder()
        .targets(relay.clone(), [TargetDescriptor::Pipe(engine.clone())])
        .build();

    let capture = Capture::new();
    let handle = capture.handle();
    assert!(registry.append_target(&engine, Arc::new(capture)));

    registry.initialize();
    registry.warn(&relay, "pump primed");

    let entries = handle.collect();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].severity(), Severity::Warn);
    assert_eq!(entries[0].line(), "pump primed");
}

#[test]
fn test_reverse_pipe_is_rejected() {
    let engine = LoggerId::new("engine");
    let relay = LoggerId::new("relay");
    let registry = Registry::builder()
        .logger(engine.clone())
        .targets(relay.clone(), [TargetDescriptor::Pipe(engine.clone())])
        .build();
    registry.initialize();

    let back = Pipe::new(registry.resolve(&relay).unwrap());
    assert!(!registry.append_target(&engine, Arc::new(back)));

    let engine_logger = registry.resolve(&engine).unwrap();
    assert_eq!(engine_logger.target_count(), 1);
}

#[test]
fn test_settings_records_are_per_identity() {
    let noisy = LoggerId::new("noisy");
    let calm = LoggerId::new("calm");
    let registry = Registry::builder().build();

    let noisy_capture = Capture::new();
    let noisy_handle = noisy_capture.handle();
    let calm_capture = Capture::new();
    let calm_handle = calm_capture.handle();
    assert!(registry.append_target(&noisy, Arc::new(noisy_capture)));
    assert!(registry.append_target(&calm, Arc::new(calm_capture)));

    registry.set_level(&noisy, Severity::Error, false);
    registry.initialize();

    registry.info(&noisy, "muffled");
    registry.info(&calm, "heard");
    assert!(noisy_handle.is_empty());
    assert_eq!(calm_handle.lines(), vec!["heard"]);

    registry.error(&noisy, "loud enough");
    assert_eq!(noisy_handle.lines(), vec!["loud enough"]);
}

#[test]
fn test_set_level_after_initialize_reaches_targets() {
    let app = LoggerId::new("app");
    let registry = Registry::builder().build();

    let capture = Capture::new();
    let handle = capture.handle();
    assert!(registry.append_target(&app, Arc::new(capture)));
    registry.initialize();

    registry.debug(&app, "chatty");
    assert_eq!(handle.len(), 1);

    registry.set_level(&app, Severity::Warn, false);
    registry.debug(&app, "filtered now");
    assert_eq!(handle.len(), 1);

    registry.warn(&app, "still audible");
    assert_eq!(handle.lines(), vec!["chatty", "still audible"]);
}

#[test]
fn test_store_settings_apply_on_initialize() {
    let uplink = LoggerId::new("uplink");
    let registry = Registry::builder()
        .settings_store(
            MemoryStore::new()
                .with(LoggerSettings::create_default(uplink.clone()).with_level(Severity::Error)),
        )
        .build();

    let capture = Capture::new();
    let handle = capture.handle();
    assert!(registry.append_target(&uplink, Arc::new(capture)));
    registry.initialize();

    let logger = registry.resolve(&uplink).unwrap();
    assert_eq!(logger.level(), Severity::Error);

    registry.info(&uplink, "routine");
    assert!(handle.is_empty());

    registry.error(&uplink, "breaker tripped");
    assert_eq!(handle.lines(), vec!["breaker tripped"]);
}

#[test]
fn test_trace_detailed_prefixes_caller_location() {
    let kernel = LoggerId::new("kernel");
    let registry = Registry::builder().build();

    let capture = Capture::new();
    let handle = capture.handle();
    assert!(registry.append_target(&kernel, Arc::new(capture)));
    registry.set_level(&kernel, Severity::Trace, false);
    registry.initialize();

    registry.trace(&kernel, "stepping the scheduler");
    let expected = format!("[{}:{}] stepping the scheduler", file!(), line!() + 1);
    registry.trace_detailed(&kernel, "stepping the scheduler");

    assert_eq!(handle.lines(), vec!["stepping the scheduler".to_string(), expected]);
}

#[test]
fn test_default_layout_skips_targets_with_override() {
    let fmt = LoggerId::new("fmt");
    let registry = Registry::builder()
        .default_layout(Layout::from(SeverityTagLayout::new()).append(RawTextLayout, "> "))
        .build();

    let plain = Capture::new();
    let plain_handle = plain.handle();
    let overridden = Capture::new().with_layout(RawTextLayout);
    let overridden_handle = overridden.handle();
    assert!(registry.append_target(&fmt, Arc::new(plain)));
    assert!(registry.append_target(&fmt, Arc::new(overridden)));

    registry.initialize();
    registry.info(&fmt, "hello");

    assert_eq!(plain_handle.lines(), vec!["INFO> hello"]);
    assert_eq!(overridden_handle.lines(), vec!["hello"]);
}

#[test]
fn test_discovery_registers_identities() {
    let registry = Registry::builder()
        .discovery(|| vec![LoggerId::new("found")])
        .build();
    registry.initialize();

    let logger = registry.resolve(&LoggerId::new("found")).unwrap();
    assert_eq!(logger.identity(), &LoggerId::new("found"));
}

#[test]
fn test_file_descriptor_writes_prefixed_lines() {
    let tmp = tempfile::tempdir().unwrap();
    let path = tmp.path().join("disk.log");
    let disk = LoggerId::new("disk");
    let registry = Registry::builder()
        .targets(disk.clone(), [TargetDescriptor::FilePath(path.clone())])
        .build();
    registry.initialize();

    registry.info(&disk, "spun up");
    registry.log(&disk, Severity::None, "session note", None);
    registry.flush();

    let content = std::fs::read_to_string(&path).unwrap();
    let lines = content.lines().collect::<Vec<_>>();
    assert_eq!(lines.len(), 4);
    assert!(lines[1].starts_with("Log opened at "));
    assert_eq!(lines[2], "INFO> spun up");
    assert_eq!(lines[3], "session note");
}

#[test]
fn test_unknown_identity_logs_through_default() {
    let registry = Registry::builder().build();

    let capture = Capture::new();
    let handle = capture.handle();
    let default = LoggerId::DEFAULT;
    assert!(registry.append_target(&default, Arc::new(capture)));
    registry.initialize();

    registry.info(&LoggerId::new("stranger"), "routed to default");
    registry.info(None, "also default");

    assert_eq!(handle.lines(), vec!["routed to default", "also default"]);
}
