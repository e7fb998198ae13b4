// Hotschema - Conditional Schema Compile-Cost Analysis
//
// Copyright (c) 2025 Dweve IP B.V. and individual contributors.
//
// SPDX-License-Identifier: Apache-2.0
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License in the LICENSE file at the
// root of this repository or at: http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Rules command - lists the ablation registry.

use crate::error::CliError;
use hotschema_core::AblationRule;

/// Print every rule with its description, in registry order.
pub fn rules() -> Result<(), CliError> {
    let width = AblationRule::ALL
        .iter()
        .map(|r| r.name().len())
        .max()
        .unwrap_or(0);
    for rule in AblationRule::ALL {
        println!("{:<width$}  {}", rule.name(), rule.description(), width = width);
    }
    Ok(())
}
