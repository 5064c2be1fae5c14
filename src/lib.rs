#![doc = include_str!("../README.md")]

mod error;
mod raw_buffer;

pub use self::error::VectorError;

use {
  self::raw_buffer::RawBuffer,
  ::core::{
    fmt, mem,
    ops::{Index, IndexMut},
  },
  ::tracing::{debug, trace},
};

/// A growable, contiguous, heap allocated array with exactly tracked capacity
///
/// Vectors built with [`new`](Vector::new) or
/// [`with_capacity`](Vector::with_capacity) always have backing storage, even
/// if it holds zero slots. Only the zero value, [`Vector::default`], has none;
/// it gets storage on the first [`append`](Vector::append),
/// [`add_capacity`](Vector::add_capacity) or [`clear`](Vector::clear).
pub struct Vector<E> {
  /// `None` only for the zero value. Every reallocation replaces the buffer
  /// wholesale.
  backing: Option<RawBuffer<E>>,
  /// Slots from 0..len are initialised, slots from len.. are uninit.
  len: usize,
}

// Unsafe code below relies on two invariants:
//
// - `len` delimits the number of initialised slots at the front of the
//   buffer, and never exceeds the buffer's capacity.
//
// - `len` is zero whenever `backing` is `None`.

/// `capacity + extra`, panicking when it cannot be represented
#[inline]
fn checked_capacity(capacity: usize, extra: usize) -> usize {
  match capacity.checked_add(extra) {
    Some(new_capacity) => new_capacity,
    None => panic!(
      "capacity overflow, capacity: {capacity}, extra: {extra}, max: {max}",
      max = usize::MAX
    ),
  }
}

impl<E> Vector<E> {
  /// The capacity allocated when appending to a vector with no spare room and
  /// fewer than this many slots
  pub const MIN_NON_ZERO_CAPACITY: usize = 4;

  /// Constructs a new, empty `Vector<E>`
  ///
  /// The backing storage holds zero slots, so this does not allocate.
  pub fn new() -> Self {
    Vector::with_capacity(0)
  }

  /// Constructs a new, empty `Vector<E>` with storage for exactly `capacity`
  /// elements
  ///
  /// The vector has backing storage afterwards, even when `capacity` is zero.
  pub fn with_capacity(capacity: usize) -> Self {
    Vector {
      backing: Some(RawBuffer::new(capacity)),
      len: 0,
    }
  }

  /// Returns the number of elements in the `Vector`
  pub fn len(&self) -> usize {
    self.len
  }

  /// Returns `true` if the `Vector` contains no elements
  pub fn is_empty(&self) -> bool {
    self.len == 0
  }

  /// Returns the number of elements the `Vector` can hold without
  /// reallocating, or zero if it has no backing storage
  pub fn capacity(&self) -> usize {
    self.backing.as_ref().map_or(0, RawBuffer::capacity)
  }

  /// Returns `true` if backing storage has been allocated
  pub fn has_storage(&self) -> bool {
    self.backing.is_some()
  }

  /// Adds room for `extra` more elements, preserving the existing elements
  ///
  /// If there is no backing storage yet, storage for exactly `extra` elements
  /// is allocated. Otherwise the capacity afterwards is `capacity + extra`.
  ///
  /// # Panics
  ///
  /// Panics if the new capacity would overflow `usize`.
  pub fn add_capacity(&mut self, extra: usize) -> Result<(), VectorError> {
    if self.backing.is_none() {
      trace!(new_capacity = extra, "allocating backing storage");
      self.backing = Some(RawBuffer::new(extra));
      return Ok(());
    }

    let new_capacity = checked_capacity(self.capacity(), extra);
    self.reallocate(new_capacity);
    Ok(())
  }

  /// Appends an element after the last element
  ///
  /// Allocates backing storage if there is none. When full, the capacity is
  /// doubled (to at least [`Self::MIN_NON_ZERO_CAPACITY`]).
  ///
  /// # Panics
  ///
  /// Panics if the new capacity would overflow `usize`.
  pub fn append(&mut self, element: E) -> Result<(), VectorError> {
    self.push(element);
    Ok(())
  }

  /// Removes and returns the element at `index`, shifting all following
  /// elements to the left
  ///
  /// The remaining elements are moved into a fresh buffer with one slot less
  /// than the old one.
  ///
  /// Returns [`VectorError::NilAccess`] if there is no backing storage, or
  /// [`VectorError::IndexOutOfBounds`] if `index` is not less than the length.
  /// Nothing is changed on error.
  pub fn pop(&mut self, index: usize) -> Result<E, VectorError> {
    let len = self.len;
    let Some(old_backing) = self.backing.as_ref() else {
      return Err(VectorError::NilAccess);
    };
    if index >= len {
      return Err(VectorError::IndexOutOfBounds { index, len });
    }

    // `index < len <= capacity`, so the old capacity is at least 1
    let old_capacity = old_backing.capacity();
    let new_capacity = old_capacity - 1;
    trace!(old_capacity, new_capacity, index, len, "popping element");
    let mut new_backing = RawBuffer::new(new_capacity);

    // safety:
    // - `len` promises slots 0..len of the old buffer are initialised, and
    //   `index` is within that range.
    // - the new buffer has `len - 1` or more slots, which is exactly how many
    //   elements are moved into it.
    // - the old buffer is freed below without dropping any slots, so every
    //   element ends up owned exactly once.
    let element = unsafe {
      let element = old_backing.read(index);
      new_backing.move_from(old_backing, 0, 0, index);
      new_backing.move_from(old_backing, index + 1, index, len - index - 1);
      element
    };

    self.backing = Some(new_backing);
    self.len = len - 1;
    Ok(element)
  }

  /// Removes the element at `index`, shifting all following elements to the
  /// left
  ///
  /// Like [`pop`](Vector::pop) but the element is dropped, and if `index` is
  /// invalid (or there is no backing storage) nothing happens.
  pub fn remove(&mut self, index: usize) {
    if let Err(error) = self.pop(index) {
      debug!(%error, "ignoring failed remove");
    }
  }

  /// Drops every element and swaps the backing storage for an empty one
  ///
  /// The `Vector` is equivalent to [`Vector::new`] afterwards, so clearing the
  /// zero value gives it storage.
  pub fn clear(&mut self) {
    self.release();
    self.backing = Some(RawBuffer::new(0));
  }

  /// Shrinks the capacity to exactly the length
  ///
  /// Does nothing if there is no backing storage, or if there is no unused
  /// capacity.
  pub fn strip(&mut self) {
    if self.backing.is_none() || self.capacity() == self.len {
      return;
    }
    self.reallocate(self.len);
  }

  /// Reverses the order of the elements in place
  ///
  /// Returns [`VectorError::NilAccess`] if there is no backing storage.
  pub fn reverse(&mut self) -> Result<(), VectorError> {
    if self.backing.is_none() {
      return Err(VectorError::NilAccess);
    }
    self.as_mut_slice().reverse();
    Ok(())
  }

  /// Get the element at the index
  pub fn get(&self, index: usize) -> Option<&E> {
    self.as_slice().get(index)
  }

  /// Mutably get the element at the index
  pub fn get_mut(&mut self, index: usize) -> Option<&mut E> {
    self.as_mut_slice().get_mut(index)
  }

  /// Get the first element, or `None` if empty
  pub fn first(&self) -> Option<&E> {
    self.as_slice().first()
  }

  /// Get the last element, or `None` if empty
  pub fn last(&self) -> Option<&E> {
    self.as_slice().last()
  }

  /// Borrow the elements as a slice
  pub fn as_slice(&self) -> &[E] {
    match &self.backing {
      // safety: `len` promises slots 0..len are initialised.
      Some(backing) => unsafe { backing.as_slice(self.len) },
      None => &[],
    }
  }

  /// Mutably borrow the elements as a slice
  pub fn as_mut_slice(&mut self) -> &mut [E] {
    match &mut self.backing {
      // safety: `len` promises slots 0..len are initialised.
      Some(backing) => unsafe { backing.as_mut_slice(self.len) },
      None => &mut [],
    }
  }

  /// Drop every element and free the backing storage, leaving no storage
  /// behind
  fn release(&mut self) {
    let Some(mut backing) = self.backing.take() else {
      return;
    };

    // Similarly to `Vec::clear`, resetting `self.len` before calling
    // `drop_in_place` leaks the elements if a `Drop` impl panics, rather than
    // calling the destructor for some elements twice.
    let len = mem::replace(&mut self.len, 0);
    trace!(len, capacity = backing.capacity(), "releasing backing storage");

    // safety: `len` promises slots 0..len are initialised.
    unsafe { backing.drop_prefix(len) };
  }

  /// Append, growing the backing storage first if it is full
  fn push(&mut self, element: E) {
    let capacity = self.capacity();
    if self.len == capacity {
      let new_capacity =
        checked_capacity(capacity, capacity).max(Self::MIN_NON_ZERO_CAPACITY);
      self.reallocate(new_capacity);
    }

    // safety: the buffer exists and has a free slot, ensured just above.
    unsafe { self.write_next(element) };
  }

  /// Write `element` into the slot at `len` and bump the length
  ///
  /// # Safety
  ///
  /// - backing storage must exist, with `len < capacity`.
  #[inline]
  unsafe fn write_next(&mut self, element: E) {
    unsafe {
      let backing = self.backing.as_mut().unwrap_unchecked();
      backing.write(self.len, element);
    }
    self.len += 1;
  }

  /// Move the elements into fresh storage of exactly `new_capacity` slots,
  /// allocating storage if there is none
  ///
  /// `new_capacity` must be at least `len`.
  fn reallocate(&mut self, new_capacity: usize) {
    debug_assert!(new_capacity >= self.len);

    let mut new_backing = RawBuffer::new(new_capacity);
    match &self.backing {
      Some(old_backing) => {
        trace!(
          old_capacity = old_backing.capacity(),
          new_capacity,
          len = self.len,
          "reallocating backing storage"
        );
        // safety:
        // - `len` promises slots 0..len of the old buffer are initialised.
        // - the new buffer holds at least `len` slots.
        // - the old buffer is dropped below without dropping its slots.
        unsafe { new_backing.move_from(old_backing, 0, 0, self.len) };
      }
      None => trace!(new_capacity, "allocating backing storage"),
    }
    self.backing = Some(new_backing);
  }
}

impl<E> Default for Vector<E> {
  /// The zero value: an empty `Vector` with no backing storage
  ///
  /// [`pop`](Vector::pop) and [`reverse`](Vector::reverse) report
  /// [`VectorError::NilAccess`] until storage is allocated.
  fn default() -> Self {
    Vector {
      backing: None,
      len: 0,
    }
  }
}

impl<E> Index<usize> for Vector<E> {
  type Output = E;

  fn index(&self, index: usize) -> &Self::Output {
    match self.get(index) {
      Some(element) => element,
      None => panic!(
        "index is out of bounds, index: {index}, len: {len}",
        len = self.len
      ),
    }
  }
}

impl<E> IndexMut<usize> for Vector<E> {
  fn index_mut(&mut self, index: usize) -> &mut Self::Output {
    let len = self.len;
    match self.get_mut(index) {
      Some(element) => element,
      None => panic!("index is out of bounds, index: {index}, len: {len}"),
    }
  }
}

impl<E> Extend<E> for Vector<E> {
  fn extend<I: IntoIterator<Item = E>>(&mut self, iter: I) {
    for element in iter {
      self.push(element)
    }
  }
}

impl<E> FromIterator<E> for Vector<E> {
  fn from_iter<I: IntoIterator<Item = E>>(iter: I) -> Self {
    let mut vector = Vector::new();
    vector.extend(iter);
    vector
  }
}

impl<E> From<Vec<E>> for Vector<E> {
  /// Moves the elements into a `Vector` whose capacity equals their count
  fn from(elements: Vec<E>) -> Self {
    let mut vector = Vector::with_capacity(elements.len());
    for element in elements {
      // safety: capacity was allocated for every element.
      unsafe { vector.write_next(element) };
    }
    vector
  }
}

impl<E> Clone for Vector<E>
where
  E: Clone,
{
  /// Returns a copy of the `Vector`
  ///
  /// The copy has the same capacity as the source, and has backing storage
  /// only if the source does.
  fn clone(&self) -> Self {
    let Some(backing) = &self.backing else {
      return Vector::default();
    };

    // `len` is bumped per element, so if a `Clone` impl panics the partially
    // built copy only drops what it has actually written.
    let mut dest = Vector::with_capacity(backing.capacity());
    for element in self.as_slice() {
      // safety: `dest` has the same capacity as `self`, which is at least
      // `self.len`.
      unsafe { dest.write_next(element.clone()) };
    }
    dest
  }
}

impl<E> fmt::Debug for Vector<E>
where
  E: fmt::Debug,
{
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_list().entries(self.as_slice()).finish()
  }
}

impl<E> PartialEq for Vector<E>
where
  E: PartialEq,
{
  /// Compares elements only; capacity and storage state are ignored
  fn eq(&self, other: &Self) -> bool {
    self.as_slice() == other.as_slice()
  }
}

impl<E> Eq for Vector<E> where E: Eq {}

impl<E> Drop for Vector<E> {
  fn drop(&mut self) {
    // drop the elements and free the allocation
    self.release();
  }
}
