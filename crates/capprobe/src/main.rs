// Copyright (c) 2025-2026 Federico Hoerth <memparanoid@gmail.com>
// SPDX-License-Identifier: GPL-3.0-only
// See LICENSE in the repository root for full license text.

//! `capprobe` - allocate and fill the largest list the heap allows.
//!
//! Takes no arguments. Diagnostics go to stderr and are filtered through
//! the `CAPPROBE_LOG` environment variable (default `warn`).

use std::process::ExitCode;

use capprobe::{FreeHeapLine, ProbeConfig, RetryRecord, Session, SessionObserver};
use capprobe_os::MemorySnapshot;
use tracing::error;
use tracing_subscriber::EnvFilter;

const LOG_ENV: &str = "CAPPROBE_LOG";

struct Console;

impl SessionObserver for Console {
    fn before(&mut self, snapshot: Option<MemorySnapshot>) {
        println!("{}", FreeHeapLine::before(snapshot));
        println!();
    }

    fn retry(&mut self, record: RetryRecord) {
        println!("{record}");
        println!();
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

fn main() -> ExitCode {
    init_tracing();

    let mut session = Session::new(ProbeConfig::default());

    let result = session.run(&mut Console);

    match &result {
        Ok(report) => println!("{report}"),
        Err(err) => {
            error!(%err, "capacity probe aborted");
            eprintln!("[!] {err}");
        }
    }

    ExitCode::from(capprobe::exit_code(&result))
}
