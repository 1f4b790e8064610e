//! Flash storage driver with shared mutex access
//!
//! The settings record and the pattern slots live in separate partitions but
//! go through the same [`FlashStorage`], so access is serialized by one
//! critical-section mutex. Every operation is synchronous and short.

use core::{cell::RefCell, marker::PhantomData, mem::size_of};

use bytemuck::Pod;
use embassy_sync::blocking_mutex::{Mutex, raw::CriticalSectionRawMutex};
use embedded_storage::nor_flash::{NorFlash, ReadNorFlash};
use esp_hal::peripherals::FLASH;
#[cfg(feature = "log")]
use esp_println::println;
use esp_storage::FlashStorage;
use knitled_core::StorageError;
use static_cell::StaticCell;

pub(crate) const BLOCK_SIZE: u32 = 4096;
const MAGIC_HEADER: u16 = 0xBEEF;
const MAGIC_HEADER_SIZE: usize = MAGIC_HEADER.to_le_bytes().len();

/// Largest encoded record (header included).
const MAX_RECORD_SIZE: usize = 256;

/// Flash reads and writes go in 4 byte words.
const WORD_SIZE: usize = 4;

pub type FlashStorageMutex = Mutex<CriticalSectionRawMutex, RefCell<FlashStorage<'static>>>;

static FLASH_STORAGE_CELL: StaticCell<FlashStorageMutex> = StaticCell::new();

/// Wrap the FLASH peripheral in the shared mutex.
///
/// # Panics
/// Panics if called more than once.
pub fn init_flash_storage(flash: FLASH<'static>) -> &'static FlashStorageMutex {
    FLASH_STORAGE_CELL.init(Mutex::new(RefCell::new(FlashStorage::new(flash))))
}

/// One `#[repr(C)]` record stored at the start of a flash sector, prefixed
/// with a magic header.
pub(crate) struct FlashRecord<T: Pod> {
    storage: &'static FlashStorageMutex,
    addr: u32,
    _record: PhantomData<T>,
}

impl<T: Pod> Clone for FlashRecord<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T: Pod> Copy for FlashRecord<T> {}

impl<T: Pod> FlashRecord<T> {
    const ENCODED_LEN: usize = (MAGIC_HEADER_SIZE + size_of::<T>()).next_multiple_of(WORD_SIZE);

    pub(crate) const fn new(storage: &'static FlashStorageMutex, addr: u32) -> Self {
        const {
            assert!(Self::ENCODED_LEN <= MAX_RECORD_SIZE);
        }
        Self {
            storage,
            addr,
            _record: PhantomData,
        }
    }

    /// Read the record. An erased or foreign sector reads as
    /// [`StorageError::NotFound`].
    pub(crate) fn load(&self) -> Result<T, StorageError> {
        let mut buffer = [0u8; MAX_RECORD_SIZE];
        let buffer = &mut buffer[..Self::ENCODED_LEN];
        self.storage.lock(|cell| {
            cell.borrow_mut()
                .read(self.addr, buffer)
                .map_err(|_| StorageError::Driver)
        })?;

        if u16::from_le_bytes([buffer[0], buffer[1]]) != MAGIC_HEADER {
            return Err(StorageError::NotFound);
        }
        bytemuck::try_pod_read_unaligned(&buffer[MAGIC_HEADER_SIZE..MAGIC_HEADER_SIZE + size_of::<T>()])
            .map_err(|_| StorageError::Malformed)
    }

    /// Erase the sector and write the record.
    pub(crate) fn save(&self, record: &T) -> Result<(), StorageError> {
        let mut buffer = [0u8; MAX_RECORD_SIZE];
        let buffer = &mut buffer[..Self::ENCODED_LEN];
        buffer[..MAGIC_HEADER_SIZE].copy_from_slice(&MAGIC_HEADER.to_le_bytes());
        buffer[MAGIC_HEADER_SIZE..MAGIC_HEADER_SIZE + size_of::<T>()]
            .copy_from_slice(bytemuck::bytes_of(record));

        self.storage.lock(|cell| {
            let mut flash = cell.borrow_mut();
            flash.erase(self.addr, self.addr + BLOCK_SIZE).map_err(|_e| {
                #[cfg(feature = "log")]
                println!("flash_storage: erase at {:#x} failed: {:?}", self.addr, _e);
                StorageError::Driver
            })?;
            NorFlash::write(&mut *flash, self.addr, buffer).map_err(|_e| {
                #[cfg(feature = "log")]
                println!("flash_storage: write at {:#x} failed: {:?}", self.addr, _e);
                StorageError::Driver
            })
        })
    }

    /// Erase the sector, leaving no record behind.
    pub(crate) fn erase(&self) -> Result<(), StorageError> {
        self.storage.lock(|cell| {
            cell.borrow_mut()
                .erase(self.addr, self.addr + BLOCK_SIZE)
                .map_err(|_| StorageError::Driver)
        })
    }
}
