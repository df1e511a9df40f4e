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

use perceptor::LoggerId;
use perceptor::Registry;
use perceptor::Severity;
use perceptor::TargetDescriptor;

#[test]
#[should_panic(expected = "containment breached")]
fn test_fail_fast_escalates_console_errors() {
    let core = LoggerId::new("core");
    let registry = Registry::builder()
        .targets(core.clone(), [TargetDescriptor::Console])
        .build();
    registry.set_level(&core, Severity::Debug, true);
    registry.initialize();

    registry.error(&core, "containment breached");
}
