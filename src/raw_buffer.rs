use ::core::{mem::MaybeUninit, ptr, slice};

/// A fixed capacity array of possibly-uninitialised slots, stored on the heap.
/// Which slots are initialised must be externally managed.
///
/// The allocation holds exactly `capacity` slots, so the capacity reported by
/// a `Vector` is never rounded up by the allocator.
pub(crate) struct RawBuffer<E> {
  data: Box<[MaybeUninit<E>]>,
}

impl<E> RawBuffer<E> {
  pub(crate) fn new(capacity: usize) -> Self {
    // todo: replace with Box<[T]>::new_uninit_slice once the MSRV allows it
    let mut data: Vec<MaybeUninit<E>> = Vec::with_capacity(capacity);
    // safety:
    // - new len is not greater than capacity
    // - the elements are MaybeUninit, so they need not be initialised
    unsafe { data.set_len(capacity) };

    RawBuffer {
      data: data.into_boxed_slice(),
    }
  }

  #[inline]
  pub(crate) fn capacity(&self) -> usize {
    self.data.len()
  }

  /// Write a value into the slot at `index`
  ///
  /// Drop is not called for any existing value.
  ///
  /// # Safety
  ///
  /// - `index` must be less than the capacity.
  #[inline]
  pub(crate) unsafe fn write(&mut self, index: usize, value: E) {
    unsafe { self.data.get_unchecked_mut(index).write(value) };
  }

  /// Read the element out of the slot at `index`
  ///
  /// # Safety
  ///
  /// - `index` must be less than the capacity.
  /// - the slot at `index` must be initialised.
  /// - after this call the slot must be treated as uninitialised, otherwise
  ///   the element is duplicated.
  #[inline]
  pub(crate) unsafe fn read(&self, index: usize) -> E {
    unsafe { self.data.get_unchecked(index).assume_init_read() }
  }

  /// Get the initialised prefix `0..len` as a slice
  ///
  /// # Safety
  ///
  /// - `len` must not exceed the capacity.
  /// - slots `0..len` must be initialised.
  #[inline]
  pub(crate) unsafe fn as_slice(&self, len: usize) -> &[E] {
    unsafe { slice::from_raw_parts(self.data.as_ptr().cast::<E>(), len) }
  }

  /// Get the initialised prefix `0..len` as a mutable slice
  ///
  /// # Safety
  ///
  /// - `len` must not exceed the capacity.
  /// - slots `0..len` must be initialised.
  #[inline]
  pub(crate) unsafe fn as_mut_slice(&mut self, len: usize) -> &mut [E] {
    unsafe {
      slice::from_raw_parts_mut(self.data.as_mut_ptr().cast::<E>(), len)
    }
  }

  /// Drop in place the elements in slots `0..len`
  ///
  /// # Safety
  ///
  /// - `len` must not exceed the capacity.
  /// - slots `0..len` must be initialised.
  /// - after calling this, slots `0..len` are uninitialised.
  #[inline]
  pub(crate) unsafe fn drop_prefix(&mut self, len: usize) {
    unsafe { ptr::drop_in_place(self.as_mut_slice(len)) };
  }

  /// Move `count` elements, starting at `src_start` in `src`, into this buffer
  /// starting at `dst_start`
  ///
  /// The moved slots in `src` are left logically uninitialised; freeing `src`
  /// afterwards does not drop them.
  ///
  /// # Safety
  ///
  /// - `src_start + count` must not exceed the capacity of `src`, and those
  ///   slots must be initialised.
  /// - `dst_start + count` must not exceed the capacity of `self`. Any values
  ///   already in those slots are overwritten without being dropped.
  #[inline]
  pub(crate) unsafe fn move_from(
    &mut self,
    src: &RawBuffer<E>,
    src_start: usize,
    dst_start: usize,
    count: usize,
  ) {
    // safety: two distinct boxes never overlap.
    unsafe {
      ptr::copy_nonoverlapping(
        src.data.as_ptr().add(src_start),
        self.data.as_mut_ptr().add(dst_start),
        count,
      )
    }
  }
}
