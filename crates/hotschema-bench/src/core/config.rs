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

//! Centralized run configuration.
//!
//! Defaults follow the `jsonschema` command-line tool. Environment overrides
//! are layered on top of the defaults, and command-line flags on top of those.

use crate::error::{BenchError, Result};
use hotschema_core::AblationRule;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

/// Default compiler program, resolved on `PATH`.
pub const DEFAULT_COMPILER: &str = "jsonschema";

/// Default instrumentation program for the `gnu-time` probe.
pub const DEFAULT_TIME_BINARY: &str = "/usr/bin/time";

/// Environment variable overriding the compiler program.
pub const ENV_COMPILER: &str = "HOTSCHEMA_COMPILER";

/// Environment variable overriding the time program.
pub const ENV_TIME: &str = "HOTSCHEMA_TIME";

/// Default report title.
pub const DEFAULT_TITLE: &str = "Conditional schema compile-cost ablation";

/// How the compiler is invoked for one measurement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InvocationMode {
    /// Plain `compile`.
    Normal,
    /// `compile --fast`.
    Fast,
}

impl InvocationMode {
    /// All modes in default measurement order.
    pub const ALL: [InvocationMode; 2] = [InvocationMode::Normal, InvocationMode::Fast];

    /// Returns the mode name.
    pub fn as_str(&self) -> &'static str {
        match self {
            InvocationMode::Normal => "normal",
            InvocationMode::Fast => "fast",
        }
    }

    /// Extra compiler flag for this mode, if any.
    pub fn flag(&self) -> Option<&'static str> {
        match self {
            InvocationMode::Normal => None,
            InvocationMode::Fast => Some("--fast"),
        }
    }
}

impl fmt::Display for InvocationMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for InvocationMode {
    type Err = BenchError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "normal" => Ok(InvocationMode::Normal),
            "fast" => Ok(InvocationMode::Fast),
            other => Err(BenchError::invalid_config(
                "mode",
                format!("unknown mode '{}', expected normal or fast", other),
            )),
        }
    }
}

/// Source of resource-usage data for each compiler invocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ProbeKind {
    /// `wait4` accounting of the child process.
    Rusage,
    /// An external `time` program and its report file.
    GnuTime,
}

impl ProbeKind {
    /// Returns the probe name.
    pub fn as_str(&self) -> &'static str {
        match self {
            ProbeKind::Rusage => "rusage",
            ProbeKind::GnuTime => "gnu-time",
        }
    }
}

impl Default for ProbeKind {
    fn default() -> Self {
        if cfg!(unix) {
            ProbeKind::Rusage
        } else {
            ProbeKind::GnuTime
        }
    }
}

impl fmt::Display for ProbeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ProbeKind {
    type Err = BenchError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "rusage" => Ok(ProbeKind::Rusage),
            "gnu-time" | "time" => Ok(ProbeKind::GnuTime),
            other => Err(BenchError::invalid_config(
                "probe",
                format!("unknown probe '{}', expected rusage or gnu-time", other),
            )),
        }
    }
}

/// Report layout written by the `time` program.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimeFlavor {
    /// GNU time, `-v`.
    Gnu,
    /// BSD/macOS time, `-l`.
    Bsd,
}

impl TimeFlavor {
    /// Returns the flavor name.
    pub fn as_str(&self) -> &'static str {
        match self {
            TimeFlavor::Gnu => "gnu",
            TimeFlavor::Bsd => "bsd",
        }
    }

    /// Flag asking this flavor for its detailed report.
    pub fn verbose_flag(&self) -> &'static str {
        match self {
            TimeFlavor::Gnu => "-v",
            TimeFlavor::Bsd => "-l",
        }
    }
}

impl Default for TimeFlavor {
    fn default() -> Self {
        if cfg!(any(target_os = "macos", target_os = "freebsd")) {
            TimeFlavor::Bsd
        } else {
            TimeFlavor::Gnu
        }
    }
}

impl fmt::Display for TimeFlavor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TimeFlavor {
    type Err = BenchError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "gnu" => Ok(TimeFlavor::Gnu),
            "bsd" | "macos" => Ok(TimeFlavor::Bsd),
            other => Err(BenchError::invalid_config(
                "time-flavor",
                format!("unknown time flavor '{}', expected gnu or bsd", other),
            )),
        }
    }
}

/// Configuration for one ablation run.
///
/// # Example
///
/// ```no_run
/// use hotschema_bench::core::config::{BenchConfig, InvocationMode, ProbeKind};
///
/// let config = BenchConfig::from_env()
///     .with_out_dir("target/hotschema")
///     .with_probe(ProbeKind::GnuTime)
///     .with_modes(vec![InvocationMode::Fast]);
/// config.validate().unwrap();
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct BenchConfig {
    /// Compiler program (also used as bundler and metaschema checker).
    pub compiler: PathBuf,
    /// `time` program used by the `gnu-time` probe.
    pub time_binary: PathBuf,
    /// Report layout of the `time` program.
    pub time_flavor: TimeFlavor,
    /// Resource probe.
    pub probe: ProbeKind,
    /// Modes measured for every variant, in order.
    pub modes: Vec<InvocationMode>,
    /// Rules applied to the bundled baseline, in order.
    pub rules: Vec<AblationRule>,
    /// Whether to run the metaschema checker on the source.
    pub check_metaschema: bool,
    /// Report title.
    pub title: String,
    /// Output directory.
    pub out_dir: PathBuf,
}

impl BenchConfig {
    /// Creates a configuration with defaults and no environment overrides.
    pub fn new() -> Self {
        Self {
            compiler: PathBuf::from(DEFAULT_COMPILER),
            time_binary: PathBuf::from(DEFAULT_TIME_BINARY),
            time_flavor: TimeFlavor::default(),
            probe: ProbeKind::default(),
            modes: InvocationMode::ALL.to_vec(),
            rules: AblationRule::ALL.to_vec(),
            check_metaschema: true,
            title: DEFAULT_TITLE.to_string(),
            out_dir: PathBuf::from("hotschema-out"),
        }
    }

    /// Creates a configuration with defaults, then applies
    /// `HOTSCHEMA_COMPILER` and `HOTSCHEMA_TIME`.
    pub fn from_env() -> Self {
        Self::new().with_env_overrides(|key| std::env::var(key).ok())
    }

    /// Applies environment overrides read through `lookup`. Empty values are ignored.
    pub fn with_env_overrides<F>(mut self, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(compiler) = lookup(ENV_COMPILER).filter(|v| !v.trim().is_empty()) {
            self.compiler = PathBuf::from(compiler);
        }
        if let Some(time) = lookup(ENV_TIME).filter(|v| !v.trim().is_empty()) {
            self.time_binary = PathBuf::from(time);
        }
        self
    }

    /// Sets the compiler program.
    pub fn with_compiler(mut self, compiler: impl Into<PathBuf>) -> Self {
        self.compiler = compiler.into();
        self
    }

    /// Sets the `time` program.
    pub fn with_time_binary(mut self, time_binary: impl Into<PathBuf>) -> Self {
        self.time_binary = time_binary.into();
        self
    }

    /// Sets the report layout of the `time` program.
    pub fn with_time_flavor(mut self, flavor: TimeFlavor) -> Self {
        self.time_flavor = flavor;
        self
    }

    /// Sets the resource probe.
    pub fn with_probe(mut self, probe: ProbeKind) -> Self {
        self.probe = probe;
        self
    }

    /// Sets the measured modes.
    pub fn with_modes(mut self, modes: Vec<InvocationMode>) -> Self {
        self.modes = modes;
        self
    }

    /// Sets the ablation rules.
    pub fn with_rules(mut self, rules: Vec<AblationRule>) -> Self {
        self.rules = rules;
        self
    }

    /// Enables or disables the metaschema check.
    pub fn with_metaschema_check(mut self, enabled: bool) -> Self {
        self.check_metaschema = enabled;
        self
    }

    /// Sets the report title.
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    /// Sets the output directory.
    pub fn with_out_dir(mut self, out_dir: impl Into<PathBuf>) -> Self {
        self.out_dir = out_dir.into();
        self
    }

    /// Checks that the configuration can drive a run.
    pub fn validate(&self) -> Result<()> {
        if self.modes.is_empty() {
            return Err(BenchError::invalid_config(
                "modes",
                "at least one mode is required",
            ));
        }
        if has_duplicates(&self.modes) {
            return Err(BenchError::invalid_config("modes", "modes must be distinct"));
        }
        if self.rules.is_empty() {
            return Err(BenchError::invalid_config(
                "rules",
                "at least one rule is required",
            ));
        }
        if has_duplicates(&self.rules) {
            return Err(BenchError::invalid_config("rules", "rules must be distinct"));
        }
        if self.compiler.as_os_str().is_empty() {
            return Err(BenchError::invalid_config("compiler", "must not be empty"));
        }
        if self.probe == ProbeKind::GnuTime && self.time_binary.as_os_str().is_empty() {
            return Err(BenchError::invalid_config("time", "must not be empty"));
        }
        Ok(())
    }
}

impl Default for BenchConfig {
    fn default() -> Self {
        Self::new()
    }
}

fn has_duplicates<T: PartialEq>(items: &[T]) -> bool {
    items
        .iter()
        .enumerate()
        .any(|(i, item)| items[..i].contains(item))
}

/// Parses a comma-separated list, e.g. `normal,fast` or `no-allof,refs-only`.
pub fn parse_list<T>(input: &str) -> std::result::Result<Vec<T>, T::Err>
where
    T: FromStr,
{
    input
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(T::from_str)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_time_flavor_parsing() {
        assert_eq!("gnu".parse::<TimeFlavor>().unwrap(), TimeFlavor::Gnu);
        assert_eq!(" BSD ".parse::<TimeFlavor>().unwrap(), TimeFlavor::Bsd);
        assert_eq!(TimeFlavor::Bsd.verbose_flag(), "-l");
        assert!("busybox".parse::<TimeFlavor>().is_err());
        let config = BenchConfig::new().with_time_flavor(TimeFlavor::Bsd);
        assert_eq!(config.time_flavor, TimeFlavor::Bsd);
    }

    #[test]
    fn test_default_config() {
        let config = BenchConfig::default();
        assert_eq!(config.compiler, PathBuf::from("jsonschema"));
        assert_eq!(config.modes, vec![InvocationMode::Normal, InvocationMode::Fast]);
        assert_eq!(config.rules.len(), AblationRule::ALL.len());
        assert!(config.check_metaschema);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_env_overrides() {
        let env: HashMap<&str, &str> = [
            ("HOTSCHEMA_COMPILER", "/opt/bin/jsonschema"),
            ("HOTSCHEMA_TIME", "gtime"),
        ]
        .into_iter()
        .collect();
        let config =
            BenchConfig::new().with_env_overrides(|k| env.get(k).map(|v| v.to_string()));
        assert_eq!(config.compiler, PathBuf::from("/opt/bin/jsonschema"));
        assert_eq!(config.time_binary, PathBuf::from("gtime"));
    }

    #[test]
    fn test_empty_env_value_ignored() {
        let config = BenchConfig::new().with_env_overrides(|_| Some("  ".to_string()));
        assert_eq!(config.compiler, PathBuf::from(DEFAULT_COMPILER));
        assert_eq!(config.time_binary, PathBuf::from(DEFAULT_TIME_BINARY));
    }

    #[test]
    fn test_builder_chain() {
        let config = BenchConfig::new()
            .with_compiler("fake")
            .with_probe(ProbeKind::GnuTime)
            .with_modes(vec![InvocationMode::Fast])
            .with_rules(vec![AblationRule::NoAllOf])
            .with_metaschema_check(false)
            .with_title("T")
            .with_out_dir("out");
        assert_eq!(config.compiler, PathBuf::from("fake"));
        assert_eq!(config.probe, ProbeKind::GnuTime);
        assert_eq!(config.modes, vec![InvocationMode::Fast]);
        assert_eq!(config.rules, vec![AblationRule::NoAllOf]);
        assert!(!config.check_metaschema);
        assert_eq!(config.title, "T");
        assert_eq!(config.out_dir, PathBuf::from("out"));
    }

    #[test]
    fn test_validate_rejects_empty_lists() {
        let err = BenchConfig::new().with_modes(vec![]).validate().unwrap_err();
        assert!(matches!(err, BenchError::InvalidConfig { ref parameter, .. } if parameter == "modes"));

        let err = BenchConfig::new().with_rules(vec![]).validate().unwrap_err();
        assert!(matches!(err, BenchError::InvalidConfig { ref parameter, .. } if parameter == "rules"));
    }

    #[test]
    fn test_validate_rejects_duplicates() {
        let config = BenchConfig::new().with_modes(vec![InvocationMode::Fast, InvocationMode::Fast]);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_mode_flags() {
        assert_eq!(InvocationMode::Normal.flag(), None);
        assert_eq!(InvocationMode::Fast.flag(), Some("--fast"));
        assert_eq!("FAST".parse::<InvocationMode>().unwrap(), InvocationMode::Fast);
        assert!("turbo".parse::<InvocationMode>().is_err());
    }

    #[test]
    fn test_measurement_kind_parse() {
        assert_eq!("rusage".parse::<ProbeKind>().unwrap(), ProbeKind::Rusage);
        assert_eq!("gnu-time".parse::<ProbeKind>().unwrap(), ProbeKind::GnuTime);
        assert!("perf".parse::<ProbeKind>().is_err());
    }

    #[test]
    fn test_parse_list() {
        let modes: Vec<InvocationMode> = parse_list("normal, fast,").unwrap();
        assert_eq!(modes, InvocationMode::ALL.to_vec());

        let rules: Vec<AblationRule> = parse_list("no-allof,refs-only").unwrap();
        assert_eq!(rules, vec![AblationRule::NoAllOf, AblationRule::RefsOnly]);

        assert!(parse_list::<AblationRule>("no-such-rule").is_err());
    }
}
