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
use perceptor::target::Pipe;
use perceptor::Layout;
use perceptor::LoggerId;
use perceptor::Registry;
use perceptor::TargetDescriptor;

static AUDIT: LoggerId = LoggerId::from_static("audit");
static MAIN: LoggerId = LoggerId::from_static("main");

fn main() {
    // The empty target list keeps audit from writing anywhere on its own.
    let registry = Registry::builder()
        .targets(MAIN.clone(), [TargetDescriptor::Console])
        .targets(AUDIT.clone(), [])
        .build();
    registry.initialize();

    // Audit lines are stamped once, then handed to the main logger, which
    // fans them out to its own targets.
    let stamp = Layout::from(SeverityTagLayout::new()).append(RawTextLayout, " audit: ");
    let pipe = Pipe::new(registry.resolve(&MAIN).unwrap()).with_layout(stamp);
    registry.append_target(&AUDIT, Arc::new(pipe));

    registry.info(&MAIN, "service ready");
    registry.warn(&AUDIT, "operator override accepted");
    registry.error(&AUDIT, "credential rejected twice");

    registry.flush();
}
