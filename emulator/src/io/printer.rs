use std::io::{stdout, Write};
use std::sync::Mutex;
use std::collections::VecDeque;

use log::error;

// Output sink for PRN and PRA.
pub trait Printer: Send + Sync {
    fn write(&self, bytes: &[u8]);
}

#[derive(Default, Clone, Copy)]
pub struct StdoutPrinter();

impl Printer for StdoutPrinter {
    fn write(&self, bytes: &[u8]) {
        let mut out = stdout().lock();
        if let Err(e) = out.write_all(bytes).and_then(|()| out.flush()) {
            error!("Printer: failed to write to stdout: {e}");
        }
    }
}


// Collects everything printed, for tests and embedding hosts.
#[derive(Default)]
pub struct PipePrinter {
    buf: Mutex<VecDeque<u8>>,
}

impl Printer for PipePrinter {
    fn write(&self, bytes: &[u8]) {
        self.lock().extend(bytes);
    }
}

impl PipePrinter {
    fn lock(&self) -> std::sync::MutexGuard<'_, VecDeque<u8>> {
        self.buf.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn take(&self) -> VecDeque<u8> {
        std::mem::take(&mut *self.lock())
    }

    pub fn take_string(&self) -> String {
        let buf: Vec<u8> = self.take().into();
        String::from_utf8_lossy(&buf).into_owned()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }
}
