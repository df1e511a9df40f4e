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

use perceptor::layout::RawTextLayout;
use perceptor::layout::SeverityTagLayout;
use perceptor::layout::TimestampLayout;
use perceptor::Layout;
use perceptor::LoggerId;
use perceptor::Registry;
use perceptor::Severity;
use perceptor::TargetDescriptor;

static SERVER: LoggerId = LoggerId::from_static("server");

fn main() {
    let layout = Layout::from(TimestampLayout::new())
        .append(SeverityTagLayout::new(), " ")
        .append(RawTextLayout, " ");

    let registry = Registry::builder()
        .targets(SERVER.clone(), [
            TargetDescriptor::Console,
            TargetDescriptor::FileName("server".to_string()),
        ])
        .default_layout(layout)
        .build();

    // Buffered until initialize, then replayed into the file.
    registry.info(&SERVER, "warming up");

    registry.initialize();

    registry.trace(&SERVER, "listener bound");
    registry.debug(&SERVER, "worker pool sized to 8");
    registry.info(&SERVER, "accepting connections");
    registry.warn(&SERVER, "slow response from upstream");
    registry.error(&SERVER, "dropped a connection");

    registry.set_level(&SERVER, Severity::Warn, false);
    registry.info(&SERVER, "filtered out now");
    registry.warn(&SERVER, "still visible");

    registry.flush();
}
