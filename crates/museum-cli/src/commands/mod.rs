//! Demonstration scripts

use museum_core::errors::ExError;
use museum_core::model::EntityKey;
use museum_core::{log_op_end, log_op_error, log_op_start};
use museum_store::{EntityManagerFactory, Result};
use std::io::{BufRead, Write};
use std::time::Instant;

pub mod associations;
pub mod basic;
pub mod equality;
pub mod seed;

/// Write one line of demo output
macro_rules! say {
    ($out:expr) => {
        writeln!($out).map_err(|e| museum_store::errors::io_error("write_output", e))
    };
    ($out:expr, $($arg:tt)*) => {
        writeln!($out, $($arg)*).map_err(|e| museum_store::errors::io_error("write_output", e))
    };
}
pub(crate) use say;

/// Which optional parts of the script to run
#[derive(Debug, Clone, Copy, Default)]
pub struct RunOptions {
    pub seed: bool,
    pub associations: bool,
    pub equality: bool,
}

/// Run the whole script in order
pub fn run<R: BufRead, W: Write>(
    emf: &EntityManagerFactory,
    options: &RunOptions,
    input: &mut R,
    out: &mut W,
) -> Result<()> {
    if options.seed {
        logged("seed", || seed::execute(emf, out))?;
    }
    logged("basic_demos", || basic::execute(emf, input, out))?;
    if options.associations {
        logged("association_demos", || associations::execute(emf, out))?;
    }
    if options.equality {
        logged("equality_demos", || equality::execute(emf, out))?;
    }
    Ok(())
}

/// Wrap an operation in start/end log events
pub(crate) fn logged<T>(op: &'static str, f: impl FnOnce() -> Result<T>) -> Result<T> {
    let start = Instant::now();
    log_op_start!(op);
    match f() {
        Ok(value) => {
            log_op_end!(op, duration_ms = elapsed_ms(start));
            Ok(value)
        }
        Err(err) => {
            log_op_error!(op, ExError::clone(&err), duration_ms = elapsed_ms(start));
            Err(err)
        }
    }
}

/// Wrap an operation on a single entity, naming it on the log events
pub(crate) fn logged_entity<T>(
    op: &'static str,
    key: EntityKey,
    f: impl FnOnce() -> Result<T>,
) -> Result<T> {
    let start = Instant::now();
    log_op_start!(op, key = key);
    match f() {
        Ok(value) => {
            log_op_end!(op, key = key, duration_ms = elapsed_ms(start));
            Ok(value)
        }
        Err(err) => {
            log_op_error!(
                op,
                ExError::clone(&err),
                duration_ms = elapsed_ms(start),
                target_kind = key.kind.name(),
                target_id = key.id,
            );
            Err(err)
        }
    }
}

fn elapsed_ms(start: Instant) -> u64 {
    u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX)
}
