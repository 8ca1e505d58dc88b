//! Hook entrypoint for the Patroni Raft controller charm.

use std::io::{self, Write};
use std::process::ExitCode;

fn main() -> ExitCode {
    match raft_charm::run_charm() {
        Ok(_) => ExitCode::SUCCESS,
        Err(error) => {
            writeln!(
                io::stderr().lock(),
                "patroni-raft-controller-charm: {error}"
            )
            .ok();
            ExitCode::FAILURE
        }
    }
}
