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

//! Resource probes.
//!
//! A probe launches one process and reports its wall time, CPU time and peak
//! resident memory. Fields a probe cannot obtain stay `None`.

use crate::core::config::{BenchConfig, ProbeKind, TimeFlavor};
use crate::core::measurement::ResourceUsage;
use crate::error::{BenchError, Result};
use crate::harness::toolchain::Toolchain;
use once_cell::sync::Lazy;
use regex::Regex;
use std::ffi::OsString;
use std::fs::{self, OpenOptions};
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use tracing::warn;

/// A program invocation: stdout is discarded, stderr optionally appended to a log.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    /// Program to run.
    pub program: PathBuf,
    /// Arguments.
    pub args: Vec<OsString>,
    /// File the child's stderr is appended to.
    pub log: Option<PathBuf>,
}

impl Invocation {
    /// Creates an invocation without a log file.
    pub fn new(program: impl Into<PathBuf>, args: Vec<OsString>) -> Self {
        Self {
            program: program.into(),
            args,
            log: None,
        }
    }

    /// Appends stderr to `log`.
    pub fn with_log(mut self, log: impl Into<PathBuf>) -> Self {
        self.log = Some(log.into());
        self
    }

    /// Builds the command, optionally running `program` behind a wrapper.
    fn command(&self, wrapper: Option<(&Path, Vec<OsString>)>) -> Result<Command> {
        let mut cmd = match wrapper {
            Some((wrapper, wrapper_args)) => {
                let mut cmd = Command::new(wrapper);
                cmd.args(wrapper_args).arg(&self.program);
                cmd
            }
            None => Command::new(&self.program),
        };
        cmd.args(&self.args)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(self.stderr_target()?);
        Ok(cmd)
    }

    fn stderr_target(&self) -> Result<Stdio> {
        match &self.log {
            Some(path) => {
                let file = OpenOptions::new()
                    .create(true)
                    .append(true)
                    .open(path)
                    .map_err(|e| BenchError::io_error(path, e))?;
                Ok(Stdio::from(file))
            }
            None => Ok(Stdio::null()),
        }
    }
}

/// What a probe observed for one process.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProbeOutcome {
    /// Resource usage.
    pub usage: ResourceUsage,
    /// Exit status; `None` when the process was killed by a signal.
    pub exit_code: Option<i32>,
}

/// Source of resource-usage data for a process.
pub trait ResourceProbe {
    /// Short probe name for logs and reports.
    fn name(&self) -> &'static str;

    /// Runs `invocation` to completion and reports its cost.
    ///
    /// Errors only when the process cannot be launched or waited on.
    fn measure(&self, invocation: &Invocation) -> Result<ProbeOutcome>;
}

/// Builds the probe selected by `config`, preferring the `time` program
/// resolved at preflight.
pub fn build_probe(
    config: &BenchConfig,
    toolchain: &Toolchain,
) -> Result<Box<dyn ResourceProbe>> {
    match config.probe {
        ProbeKind::GnuTime => {
            let binary = toolchain.time_binary().unwrap_or(config.time_binary.as_path());
            Ok(Box::new(GnuTime::new(binary).with_flavor(config.time_flavor)))
        }
        #[cfg(unix)]
        ProbeKind::Rusage => Ok(Box::new(Rusage)),
        #[cfg(not(unix))]
        ProbeKind::Rusage => Err(BenchError::MissingDependency {
            name: "rusage".to_string(),
            detail: "wait4 accounting is only available on unix".to_string(),
        }),
    }
}

// =============================================================================
// External time program
// =============================================================================

/// Probe wrapping the compiler as `<time> -v -o <report> <compiler> ...`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GnuTime {
    binary: PathBuf,
    flavor: TimeFlavor,
}

impl GnuTime {
    /// Creates a probe using `binary` with the platform's report flavor.
    pub fn new(binary: impl Into<PathBuf>) -> Self {
        Self {
            binary: binary.into(),
            flavor: TimeFlavor::default(),
        }
    }

    /// Overrides the report flavor.
    pub fn with_flavor(mut self, flavor: TimeFlavor) -> Self {
        self.flavor = flavor;
        self
    }
}

impl ResourceProbe for GnuTime {
    fn name(&self) -> &'static str {
        "gnu-time"
    }

    fn measure(&self, invocation: &Invocation) -> Result<ProbeOutcome> {
        let report = tempfile::Builder::new()
            .prefix("hotschema-time")
            .suffix(".txt")
            .tempfile()
            .map_err(|e| BenchError::io_error(std::env::temp_dir(), e))?;
        let wrapper_args = vec![
            OsString::from(self.flavor.verbose_flag()),
            OsString::from("-o"),
            report.path().as_os_str().to_owned(),
        ];

        let status = invocation
            .command(Some((self.binary.as_path(), wrapper_args)))?
            .status()
            .map_err(|e| BenchError::spawn(&self.binary, e))?;

        let text = match fs::read_to_string(report.path()) {
            Ok(text) => text,
            Err(e) => {
                warn!(path = %report.path().display(), error = %e, "time report unreadable");
                String::new()
            }
        };
        let parsed = parse_time_report(&text);

        if let Some(signal) = parsed.terminating_signal {
            warn!(signal, "compiler terminated by signal");
        }

        Ok(ProbeOutcome {
            usage: parsed.usage,
            exit_code: resolve_exit_code(&parsed, status.code()),
        })
    }
}

/// Combines the wrapper's own exit status with what its report states.
///
/// A child killed by a signal has no exit code, even though GNU time still
/// writes `Exit status: 0` for it. A nonzero wrapper status always wins over
/// the report; a wrapper that was itself killed yields `None`.
fn resolve_exit_code(report: &TimeReport, wrapper: Option<i32>) -> Option<i32> {
    if report.terminating_signal.is_some() {
        return None;
    }
    match wrapper? {
        0 => report.exit_status.or(Some(0)),
        code => Some(code),
    }
}

/// Fields extracted from a `time` report.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct TimeReport {
    /// Resource usage; missing lines leave fields `None`.
    pub usage: ResourceUsage,
    /// Child exit status, when the report states it (GNU only).
    pub exit_status: Option<i32>,
    /// Signal that terminated the child, when the report states it (GNU only).
    pub terminating_signal: Option<i32>,
}

static GNU_WALL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"Elapsed \(wall clock\) time \([^)]*\):\s*([0-9:.]+)").expect("valid regex")
});
static GNU_USER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"User time \(seconds\):\s*([0-9.]+)").expect("valid regex"));
static GNU_SYS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"System time \(seconds\):\s*([0-9.]+)").expect("valid regex"));
static GNU_RSS: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"Maximum resident set size \(kbytes\):\s*([0-9]+)").expect("valid regex")
});
static GNU_EXIT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"Exit status:\s*(-?[0-9]+)").expect("valid regex"));
static GNU_SIGNAL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"Command terminated by signal\s+([0-9]+)").expect("valid regex"));
static BSD_TIMES: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"([0-9.]+)\s+real\s+([0-9.]+)\s+user\s+([0-9.]+)\s+sys").expect("valid regex")
});
static BSD_RSS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"([0-9]+)\s+maximum resident set size").expect("valid regex"));

/// Extracts resource fields from GNU (`-v`) or BSD (`-l`) `time` output.
///
/// Lines that are absent or malformed leave their field `None`.
///
/// ```
/// use hotschema_bench::harness::probe::parse_time_report;
///
/// let report = parse_time_report("Elapsed (wall clock) time (h:mm:ss or m:ss): 0:01.50\n");
/// assert_eq!(report.usage.wall_seconds, Some(1.5));
/// assert_eq!(report.usage.max_rss_kb, None);
/// ```
pub fn parse_time_report(text: &str) -> TimeReport {
    let mut usage = ResourceUsage::unavailable();

    usage.wall_seconds = capture(&GNU_WALL, text, 1).and_then(parse_clock);
    usage.user_seconds = capture(&GNU_USER, text, 1).and_then(|s| s.parse().ok());
    usage.sys_seconds = capture(&GNU_SYS, text, 1).and_then(|s| s.parse().ok());
    usage.max_rss_kb = capture(&GNU_RSS, text, 1).and_then(|s| s.parse().ok());

    if let Some(caps) = BSD_TIMES.captures(text) {
        usage.wall_seconds = usage.wall_seconds.or_else(|| caps[1].parse().ok());
        usage.user_seconds = usage.user_seconds.or_else(|| caps[2].parse().ok());
        usage.sys_seconds = usage.sys_seconds.or_else(|| caps[3].parse().ok());
    }
    if usage.max_rss_kb.is_none() {
        // BSD reports bytes.
        usage.max_rss_kb = capture(&BSD_RSS, text, 1)
            .and_then(|s| s.parse::<u64>().ok())
            .map(|bytes| bytes / 1024);
    }

    TimeReport {
        usage,
        exit_status: capture(&GNU_EXIT, text, 1).and_then(|s| s.parse().ok()),
        terminating_signal: capture(&GNU_SIGNAL, text, 1).and_then(|s| s.parse().ok()),
    }
}

fn capture<'t>(re: &Regex, text: &'t str, group: usize) -> Option<&'t str> {
    re.captures(text)
        .and_then(|caps| caps.get(group))
        .map(|m| m.as_str())
}

/// Parses `h:mm:ss`, `m:ss.ss` or plain seconds.
fn parse_clock(value: &str) -> Option<f64> {
    let mut total = 0.0;
    for part in value.split(':') {
        let n: f64 = part.parse().ok()?;
        total = total * 60.0 + n;
    }
    Some(total)
}

// =============================================================================
// wait4 accounting
// =============================================================================

/// Probe reading `wait4` resource accounting for the exact child process.
#[cfg(unix)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Rusage;

#[cfg(unix)]
impl ResourceProbe for Rusage {
    fn name(&self) -> &'static str {
        "rusage"
    }

    fn measure(&self, invocation: &Invocation) -> Result<ProbeOutcome> {
        use std::os::unix::process::ExitStatusExt;
        use std::process::ExitStatus;
        use std::time::Instant;

        let mut cmd = invocation.command(None)?;
        let start = Instant::now();
        let child = cmd
            .spawn()
            .map_err(|e| BenchError::spawn(&invocation.program, e))?;
        // The child is reaped here; `Child::wait` must not be called afterwards.
        let (status, rusage) = wait4(child.id() as libc::pid_t)
            .map_err(|e| BenchError::io_error(&invocation.program, e))?;
        let wall = start.elapsed();

        let usage = ResourceUsage {
            wall_seconds: Some(wall.as_secs_f64()),
            user_seconds: Some(timeval_seconds(&rusage.ru_utime)),
            sys_seconds: Some(timeval_seconds(&rusage.ru_stime)),
            max_rss_kb: max_rss_kb(rusage.ru_maxrss as i64),
        };
        Ok(ProbeOutcome {
            usage,
            exit_code: ExitStatus::from_raw(status).code(),
        })
    }
}

#[cfg(unix)]
fn wait4(pid: libc::pid_t) -> std::io::Result<(libc::c_int, libc::rusage)> {
    let mut status: libc::c_int = 0;
    // SAFETY: rusage is plain old data; all-zero is a valid value.
    let mut rusage: libc::rusage = unsafe { std::mem::zeroed() };
    loop {
        // SAFETY: both out-pointers refer to live, writable locals.
        let rc = unsafe { libc::wait4(pid, &mut status, 0, &mut rusage) };
        if rc == pid {
            return Ok((status, rusage));
        }
        let err = std::io::Error::last_os_error();
        if err.kind() != std::io::ErrorKind::Interrupted {
            return Err(err);
        }
    }
}

#[cfg(unix)]
fn timeval_seconds(tv: &libc::timeval) -> f64 {
    tv.tv_sec as f64 + tv.tv_usec as f64 / 1_000_000.0
}

/// `ru_maxrss` is kilobytes on Linux and bytes on macOS; zero means not reported.
#[cfg(unix)]
fn max_rss_kb(raw: i64) -> Option<u64> {
    if raw <= 0 {
        return None;
    }
    let raw = raw as u64;
    if cfg!(target_os = "macos") {
        Some(raw / 1024)
    } else {
        Some(raw)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const GNU_REPORT: &str = "\tCommand being timed: \"jsonschema compile bundle.json\"
\tUser time (seconds): 12.34
\tSystem time (seconds): 0.56
\tPercent of CPU this job got: 99%
\tElapsed (wall clock) time (h:mm:ss or m:ss): 0:13.02
\tMaximum resident set size (kbytes): 812345
\tExit status: 0
";

    const BSD_REPORT: &str = "        4.20 real         3.90 user         0.25 sys
  104857600  maximum resident set size
         0  average shared memory size
";

    #[test]
    fn test_parse_gnu_report() {
        let report = parse_time_report(GNU_REPORT);
        assert_eq!(report.usage.wall_seconds, Some(13.02));
        assert_eq!(report.usage.user_seconds, Some(12.34));
        assert_eq!(report.usage.sys_seconds, Some(0.56));
        assert_eq!(report.usage.max_rss_kb, Some(812_345));
        assert_eq!(report.exit_status, Some(0));
    }

    #[test]
    fn test_parse_bsd_report() {
        let report = parse_time_report(BSD_REPORT);
        assert_eq!(report.usage.wall_seconds, Some(4.20));
        assert_eq!(report.usage.user_seconds, Some(3.90));
        assert_eq!(report.usage.sys_seconds, Some(0.25));
        assert_eq!(report.usage.max_rss_kb, Some(102_400));
        assert_eq!(report.exit_status, None);
    }

    #[test]
    fn test_wall_time_without_memory() {
        let report = parse_time_report(
            "\tElapsed (wall clock) time (h:mm:ss or m:ss): 1:02:03\n\tUser time (seconds): 1.00\n",
        );
        assert_eq!(report.usage.wall_seconds, Some(3723.0));
        assert_eq!(report.usage.user_seconds, Some(1.0));
        assert_eq!(report.usage.sys_seconds, None);
        assert_eq!(report.usage.max_rss_kb, None);
    }

    #[test]
    fn test_empty_report_is_unavailable() {
        let report = parse_time_report("");
        assert_eq!(report.usage, ResourceUsage::unavailable());
        assert_eq!(report.exit_status, None);
    }

    #[test]
    fn test_parse_signal_termination() {
        let report = parse_time_report(
            "\tCommand terminated by signal 9\n\tMaximum resident set size (kbytes): 2048\n\tExit status: 0\n",
        );
        assert_eq!(report.terminating_signal, Some(9));
        assert_eq!(report.exit_status, Some(0));
        assert_eq!(report.usage.max_rss_kb, Some(2048));
        assert_eq!(parse_time_report(GNU_REPORT).terminating_signal, None);
    }

    #[test]
    fn test_resolve_exit_code() {
        let clean = parse_time_report(GNU_REPORT);
        assert_eq!(resolve_exit_code(&clean, Some(0)), Some(0));
        assert_eq!(resolve_exit_code(&clean, Some(2)), Some(2));
        assert_eq!(resolve_exit_code(&clean, None), None);

        let bsd = parse_time_report(BSD_REPORT);
        assert_eq!(resolve_exit_code(&bsd, Some(0)), Some(0));

        let killed = parse_time_report("\tCommand terminated by signal 9\n\tExit status: 0\n");
        assert_eq!(resolve_exit_code(&killed, Some(137)), None);
        assert_eq!(resolve_exit_code(&killed, Some(0)), None);
    }

    #[test]
    fn test_parse_clock_forms() {
        assert_eq!(parse_clock("0:01.25"), Some(1.25));
        assert_eq!(parse_clock("2:00.50"), Some(120.5));
        assert_eq!(parse_clock("1:00:00"), Some(3600.0));
        assert_eq!(parse_clock("7.5"), Some(7.5));
        assert_eq!(parse_clock("x:01"), None);
    }

    #[cfg(unix)]
    #[test]
    fn test_rusage_records_exit_code() {
        let invocation = Invocation::new(
            "/bin/sh",
            vec![OsString::from("-c"), OsString::from("exit 3")],
        );
        let outcome = Rusage.measure(&invocation).unwrap();
        assert_eq!(outcome.exit_code, Some(3));
        assert!(outcome.usage.wall_seconds.unwrap() >= 0.0);
        assert!(outcome.usage.user_seconds.is_some());
    }

    #[cfg(unix)]
    #[test]
    fn test_rusage_missing_program_is_spawn_error() {
        let invocation = Invocation::new("/nonexistent/hotschema-compiler", vec![]);
        let err = Rusage.measure(&invocation).unwrap_err();
        assert!(matches!(err, BenchError::Spawn { .. }));
    }

    #[cfg(unix)]
    #[test]
    fn test_stderr_appended_to_log() {
        let dir = tempfile::tempdir().unwrap();
        let log = dir.path().join("run.log");
        fs::write(&log, "previous\n").unwrap();
        let invocation = Invocation::new(
            "/bin/sh",
            vec![OsString::from("-c"), OsString::from("echo oops >&2; echo ignored")],
        )
        .with_log(&log);
        Rusage.measure(&invocation).unwrap();
        assert_eq!(fs::read_to_string(&log).unwrap(), "previous\noops\n");
    }

    #[cfg(unix)]
    #[test]
    fn test_rusage_signal_has_no_exit_code() {
        let invocation = Invocation::new(
            "/bin/sh",
            vec![OsString::from("-c"), OsString::from("kill -9 $$")],
        );
        let outcome = Rusage.measure(&invocation).unwrap();
        assert_eq!(outcome.exit_code, None);
        assert!(outcome.usage.wall_seconds.is_some());
    }

    #[cfg(unix)]
    fn fake_time(dir: &Path, body: &str) -> PathBuf {
        use std::os::unix::fs::PermissionsExt;

        let path = dir.join("fake-time");
        fs::write(&path, body).unwrap();
        fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).unwrap();
        path
    }

    #[cfg(unix)]
    #[test]
    fn test_time_signal_termination_is_not_success() {
        let dir = tempfile::tempdir().unwrap();
        let time = fake_time(
            dir.path(),
            "#!/bin/sh\nshift\nshift\nout=\"$1\"\nshift\n\"$@\"\n\
             printf '\\tCommand terminated by signal 9\\n\\tElapsed (wall clock) time (h:mm:ss or m:ss): 0:00.10\\n\\tExit status: 0\\n' > \"$out\"\n\
             exit 137\n",
        );
        let invocation = Invocation::new("/bin/sh", vec![OsString::from("-c"), OsString::from("exit 0")]);
        let outcome = GnuTime::new(&time)
            .with_flavor(TimeFlavor::Gnu)
            .measure(&invocation)
            .unwrap();
        assert_eq!(outcome.exit_code, None);
        assert_eq!(outcome.usage.wall_seconds, Some(0.1));
    }

    #[cfg(unix)]
    #[test]
    fn test_time_flavor_selects_flag() {
        let dir = tempfile::tempdir().unwrap();
        let time = fake_time(
            dir.path(),
            "#!/bin/sh\n[ \"$1\" = \"-l\" ] || exit 99\nshift\nshift\nout=\"$1\"\nshift\n\"$@\"\n\
             echo '  1.50 real  1.00 user  0.20 sys' > \"$out\"\n",
        );
        let invocation = Invocation::new("/bin/sh", vec![OsString::from("-c"), OsString::from("exit 0")]);

        let bsd = GnuTime::new(&time).with_flavor(TimeFlavor::Bsd);
        let outcome = bsd.measure(&invocation).unwrap();
        assert_eq!(outcome.exit_code, Some(0));
        assert_eq!(outcome.usage.wall_seconds, Some(1.5));

        let gnu = GnuTime::new(&time).with_flavor(TimeFlavor::Gnu);
        assert_eq!(gnu.measure(&invocation).unwrap().exit_code, Some(99));
    }

    #[cfg(unix)]
    #[test]
    fn test_max_rss_zero_is_unavailable() {
        assert_eq!(max_rss_kb(0), None);
        assert!(max_rss_kb(4096).is_some());
    }
}
