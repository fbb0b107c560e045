//! Interactive console source with echo.
//!
//! The console variant reads one key at a time from a device and writes
//! each consumed character back to the paired output (echo). The caller
//! owns a persistent [`Console`] wrapper; its push-back slot carries a
//! terminating character over to the next call. Console scanning is
//! narrow-only.

use std::io::{self, Read, Write};

use super::{Fetch, Source};

/// A raw interactive device: keys in, echo out.
pub trait ConsoleDevice {
    /// Reads the next key, or `None` at end of input.
    fn read_key(&mut self) -> io::Result<Option<u8>>;

    /// Writes one consumed character back to the device.
    fn echo(&mut self, key: u8) -> io::Result<()>;
}

/// The process stdin/stdout pair as a console device.
#[derive(Debug, Default)]
pub struct StdinConsole {
    _private: (),
}

impl StdinConsole {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl ConsoleDevice for StdinConsole {
    fn read_key(&mut self) -> io::Result<Option<u8>> {
        let mut buf = [0u8; 1];
        loop {
            match io::stdin().lock().read(&mut buf) {
                Ok(0) => return Ok(None),
                Ok(_) => return Ok(Some(buf[0])),
                Err(e) if e.kind() == io::ErrorKind::Interrupted => {}
                Err(e) => return Err(e),
            }
        }
    }

    fn echo(&mut self, key: u8) -> io::Result<()> {
        let mut out = io::stdout().lock();
        out.write_all(&[key])?;
        out.flush()
    }
}

/// Persistent console wrapper with a push-back slot.
#[derive(Debug)]
pub struct Console<D: ConsoleDevice> {
    device: D,
    pushback: Vec<u8>,
}

impl<D: ConsoleDevice> Console<D> {
    #[must_use]
    pub fn new(device: D) -> Self {
        Self {
            device,
            pushback: Vec::new(),
        }
    }

    /// Unwraps the device. Pushed-back keys are discarded.
    #[must_use]
    pub fn into_inner(self) -> D {
        self.device
    }
}

/// Per-call source over a borrowed [`Console`].
pub(crate) struct ConsoleSource<'a, D: ConsoleDevice> {
    console: &'a mut Console<D>,
    consumed: usize,
    failed: bool,
}

impl<'a, D: ConsoleDevice> ConsoleSource<'a, D> {
    pub(crate) fn new(console: &'a mut Console<D>) -> Self {
        Self {
            console,
            consumed: 0,
            failed: false,
        }
    }
}

impl<D: ConsoleDevice> Source<u8> for ConsoleSource<'_, D> {
    fn next(&mut self) -> Fetch<u8> {
        // Replayed characters were echoed when first consumed.
        if let Some(key) = self.console.pushback.pop() {
            self.consumed += 1;
            return Fetch::Char(key);
        }
        if self.failed {
            return Fetch::Error;
        }
        match self.console.device.read_key() {
            Ok(Some(key)) => {
                // Echo failures never abort the scan.
                let _ = self.console.device.echo(key);
                self.consumed += 1;
                Fetch::Char(key)
            }
            Ok(None) => Fetch::End,
            Err(_) => {
                self.failed = true;
                Fetch::Error
            }
        }
    }

    fn unget(&mut self, c: u8) {
        debug_assert!(self.consumed > 0, "unget before any consume");
        self.console.pushback.push(c);
        self.consumed -= 1;
    }

    fn consumed(&self) -> usize {
        self.consumed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Scripted {
        keys: Vec<u8>,
        next: usize,
        echoed: Vec<u8>,
    }

    impl Scripted {
        fn new(keys: &[u8]) -> Self {
            Self {
                keys: keys.to_vec(),
                next: 0,
                echoed: Vec::new(),
            }
        }
    }

    impl ConsoleDevice for Scripted {
        fn read_key(&mut self) -> io::Result<Option<u8>> {
            match self.keys.get(self.next) {
                Some(&k) => {
                    self.next += 1;
                    Ok(Some(k))
                }
                None => Ok(None),
            }
        }

        fn echo(&mut self, key: u8) -> io::Result<()> {
            self.echoed.push(key);
            Ok(())
        }
    }

    #[test]
    fn test_consumed_keys_are_echoed() {
        let mut console = Console::new(Scripted::new(b"hi"));
        {
            let mut src = ConsoleSource::new(&mut console);
            assert_eq!(src.next(), Fetch::Char(b'h'));
            assert_eq!(src.next(), Fetch::Char(b'i'));
            assert_eq!(src.next(), Fetch::End);
        }
        assert_eq!(console.into_inner().echoed, b"hi");
    }

    #[test]
    fn test_replayed_pushback_not_echoed_twice() {
        let mut console = Console::new(Scripted::new(b"x"));
        {
            let mut src = ConsoleSource::new(&mut console);
            assert_eq!(src.next(), Fetch::Char(b'x'));
            src.unget(b'x');
            assert_eq!(src.next(), Fetch::Char(b'x'));
        }
        assert_eq!(console.into_inner().echoed, b"x");
    }

    #[test]
    fn test_pushback_carries_to_next_call() {
        let mut console = Console::new(Scripted::new(b"ab"));
        {
            let mut src = ConsoleSource::new(&mut console);
            assert_eq!(src.next(), Fetch::Char(b'a'));
            src.unget(b'a');
        }
        let mut src = ConsoleSource::new(&mut console);
        assert_eq!(src.next(), Fetch::Char(b'a'));
        assert_eq!(src.next(), Fetch::Char(b'b'));
    }
}
