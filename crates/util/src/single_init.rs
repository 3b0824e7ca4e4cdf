use std::{ptr, sync::atomic::{AtomicPtr, Ordering}};

/// Structure holding possibly uninitialized data.
///
/// Unlike similar cells found on crates.io this one doesn't lock: it assumes
/// initializing the value more than once is safe, and keeps whichever result
/// landed first.
#[derive(Debug)]
pub struct SingleInit<T> {
    cell: AtomicPtr<T>,
}

impl<T> SingleInit<T> {
    /// Create a new uninitialized atomic cell.
    pub const fn uninit() -> Self {
        SingleInit {
            cell: AtomicPtr::new(ptr::null_mut()),
        }
    }
}

impl<T> SingleInit<T>
where
    T: Sync,
    Self: 'static,
{
    /// Get stored value, or `None` if it hasn't been initialized yet.
    pub fn get(&self) -> Option<&'static T> {
        let ptr = self.cell.load(Ordering::Acquire);

        if ptr.is_null() {
            None
        } else {
            Some(unsafe { &*ptr })
        }
    }

    /// Get stored value, initializing it if necessary.
    pub fn get_or_init<F>(&self, init: F) -> &'static T
    where
        F: FnOnce() -> T,
    {
        self.get_or_try_init::<(), _>(|| Ok(init())).unwrap()
    }

    /// Same as [`SingleInit::get_or_init`] except that the initialisation
    /// function can fail.
    ///
    /// If initialisation fails the cell is left unchanged and another thread
    /// (or the same thread) can safely attempt to initialise it again.
    pub fn get_or_try_init<E, F>(&self, init: F) -> Result<&'static T, E>
    where
        F: FnOnce() -> Result<T, E>,
    {
        if let Some(value) = self.get() {
            return Ok(value);
        }

        // Put the candidate on the heap, forgoing its destructor. If another
        // thread won the race in the meantime, take its value back off the
        // heap and drop it.
        let value = Box::into_raw(Box::new(init()?));

        match self.cell.compare_exchange(
            ptr::null_mut(), value, Ordering::AcqRel, Ordering::Acquire)
        {
            Ok(_) => Ok(unsafe { &*value }),
            Err(winner) => {
                drop(unsafe { Box::from_raw(value) });
                Ok(unsafe { &*winner })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    static CELL: SingleInit<u32> = SingleInit::uninit();

    #[test]
    fn first_initialisation_wins() {
        assert_eq!(CELL.get(), None);
        assert_eq!(*CELL.get_or_init(|| 7), 7);
        assert_eq!(*CELL.get_or_init(|| 13), 7);
        assert_eq!(CELL.get(), Some(&7));
    }

    #[test]
    fn failed_initialisation_leaves_cell_empty() {
        static FALLIBLE: SingleInit<u32> = SingleInit::uninit();

        assert!(FALLIBLE.get_or_try_init(|| Err(())).is_err());
        assert_eq!(FALLIBLE.get_or_try_init::<(), _>(|| Ok(3)), Ok(&3));
    }
}
