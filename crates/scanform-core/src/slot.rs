//! Typed destination slots and the binder that fills them.
//!
//! The caller builds an ordered slot list standing in for the classic
//! variadic destination pointers; fields consume slots strictly in template
//! order. A slot's variant must agree with the conversion's signedness and
//! the length modifier's storage width, so the whole sequence is validated
//! as it is used. Slices carry their capacity, which replaces the
//! bounds-checked variant's separate capacity argument.

use crate::chars::WideChar;

/// One destination for a converted field.
#[derive(Debug)]
pub enum Slot<'a> {
    I8(&'a mut i8),
    I16(&'a mut i16),
    I32(&'a mut i32),
    I64(&'a mut i64),
    U8(&'a mut u8),
    U16(&'a mut u16),
    U32(&'a mut u32),
    U64(&'a mut u64),
    F32(&'a mut f32),
    F64(&'a mut f64),
    /// Narrow string/character storage.
    Bytes(&'a mut [u8]),
    /// Wide string/character storage.
    Wide(&'a mut [WideChar]),
}

/// Storage width for string and character conversions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum RunStorage {
    Narrow,
    Wide,
}

/// Destination-bounds policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum BindMode {
    /// Trust the caller-declared field widths; a run that outgrows its slice
    /// is an error when it happens.
    Classic,
    /// Bounds-checked: runs are capped at capacity up front and capacity
    /// errors are fatal to the whole call.
    Checked,
}

/// Why a bind failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum BindFault {
    /// The slot list ran out.
    Missing,
    /// The next slot does not match the conversion's storage type.
    TypeMismatch,
    /// The destination slice cannot hold the result.
    Capacity,
}

/// Pulls slots in template order and performs width-exact writes.
#[derive(Debug)]
pub(crate) struct Binder<'s, 'a> {
    slots: &'s mut [Slot<'a>],
    next: usize,
    mode: BindMode,
}

impl<'s, 'a> Binder<'s, 'a> {
    pub(crate) fn new(slots: &'s mut [Slot<'a>], mode: BindMode) -> Self {
        Self {
            slots,
            next: 0,
            mode,
        }
    }

    pub(crate) fn mode(&self) -> BindMode {
        self.mode
    }

    fn take(&mut self) -> Result<&mut Slot<'a>, BindFault> {
        let slot = self.slots.get_mut(self.next).ok_or(BindFault::Missing)?;
        self.next += 1;
        Ok(slot)
    }

    /// Capacity of the upcoming run destination without consuming it.
    /// Checked before a string/scanset run starts so consumption can stop
    /// at the destination bound.
    pub(crate) fn peek_run_capacity(&self, storage: RunStorage) -> Result<usize, BindFault> {
        match (storage, self.slots.get(self.next)) {
            (RunStorage::Narrow, Some(Slot::Bytes(buf))) => Ok(buf.len()),
            (RunStorage::Wide, Some(Slot::Wide(buf))) => Ok(buf.len()),
            (_, Some(_)) => Err(BindFault::TypeMismatch),
            (_, None) => Err(BindFault::Missing),
        }
    }

    /// Stores a signed integer result at the given width.
    pub(crate) fn bind_signed(&mut self, bits: u32, value: i64) -> Result<(), BindFault> {
        match (bits, self.take()?) {
            (8, Slot::I8(dest)) => **dest = value as i8,
            (16, Slot::I16(dest)) => **dest = value as i16,
            (32, Slot::I32(dest)) => **dest = value as i32,
            (64, Slot::I64(dest)) => **dest = value,
            _ => return Err(BindFault::TypeMismatch),
        }
        Ok(())
    }

    /// Stores an unsigned integer result at the given width.
    pub(crate) fn bind_unsigned(&mut self, bits: u32, value: u64) -> Result<(), BindFault> {
        match (bits, self.take()?) {
            (8, Slot::U8(dest)) => **dest = value as u8,
            (16, Slot::U16(dest)) => **dest = value as u16,
            (32, Slot::U32(dest)) => **dest = value as u32,
            (64, Slot::U64(dest)) => **dest = value,
            _ => return Err(BindFault::TypeMismatch),
        }
        Ok(())
    }

    /// Stores a float result at the given width.
    pub(crate) fn bind_float(&mut self, bits: u32, value: f64) -> Result<(), BindFault> {
        match (bits, self.take()?) {
            (32, Slot::F32(dest)) => **dest = value as f32,
            (64, Slot::F64(dest)) => **dest = value,
            _ => return Err(BindFault::TypeMismatch),
        }
        Ok(())
    }

    /// Copies a staged run into the next slice slot, converting between
    /// character widths, optionally appending a NUL terminator. The run is
    /// written only here, after the field fully converted.
    pub(crate) fn bind_run(
        &mut self,
        storage: RunStorage,
        run: &[u32],
        terminate: bool,
    ) -> Result<(), BindFault> {
        let needed = run.len() + usize::from(terminate);
        match (storage, self.take()?) {
            (RunStorage::Narrow, Slot::Bytes(dest)) => {
                if dest.len() < needed {
                    return Err(BindFault::Capacity);
                }
                for (d, &c) in dest.iter_mut().zip(run) {
                    *d = c as u8;
                }
                if terminate {
                    dest[run.len()] = 0;
                }
            }
            (RunStorage::Wide, Slot::Wide(dest)) => {
                if dest.len() < needed {
                    return Err(BindFault::Capacity);
                }
                dest[..run.len()].copy_from_slice(run);
                if terminate {
                    dest[run.len()] = 0;
                }
            }
            _ => return Err(BindFault::TypeMismatch),
        }
        Ok(())
    }
}
