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
use perceptor::layout::TimestampLayout;
use perceptor::Layout;
use perceptor::LoggerId;
use perceptor::Registry;
use perceptor::TargetDescriptor;

fn main() {
    let network = LoggerId::new("network");
    let registry = Arc::new(
        Registry::builder()
            .targets(network, [
                TargetDescriptor::Console,
                TargetDescriptor::FileName("network".to_string()),
            ])
            .default_layout(
                Layout::from(TimestampLayout::new())
                    .append(SeverityTagLayout::new(), " ")
                    .append(RawTextLayout, " "),
            )
            .build(),
    );
    registry.initialize();
    perceptor::bridge::install(registry);

    // The record target picks the logger; key-value pairs ride along.
    log::info!(target: "network", "listening on {}", "0.0.0.0:8080");
    log::warn!(target: "network", peer = "10.0.0.7"; "handshake retried");
    log::error!("an unrouted line lands on the default logger");

    log::logger().flush();
}
