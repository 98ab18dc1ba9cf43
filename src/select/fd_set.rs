//! Owned descriptor sets for `select(2)`.

use std::fmt;
use std::mem::MaybeUninit;
use std::os::unix::io::RawFd;

/// Exclusive upper bound for descriptors stored in an [`FdSet`].
pub const FD_LIMIT: usize = libc::FD_SETSIZE as usize;

/// Owned descriptor set for `select(2)`.
///
/// `max` is an upper bound on the members, -1 for a set that never held one.
/// `select(2)` only ever clears bits, so the bound survives a call.
#[derive(Clone, Copy)]
pub struct FdSet {
    raw: libc::fd_set,
    max: RawFd,
}

impl FdSet {
    /// An empty set.
    pub fn new() -> Self {
        let mut raw = MaybeUninit::<libc::fd_set>::uninit();

        unsafe {
            libc::FD_ZERO(raw.as_mut_ptr());
            Self {
                raw: raw.assume_init(),
                max: -1,
            }
        }
    }

    /// A set holding only `fd`.
    ///
    /// # Panics
    /// Panics if `fd` is outside `0..FD_LIMIT`.
    pub fn with(fd: RawFd) -> Self {
        let mut set = Self::new();
        set.insert(fd);
        set
    }

    /// Adds `fd` to the set.
    ///
    /// # Panics
    /// Panics if `fd` is outside `0..FD_LIMIT`; `FD_SET` is undefined there.
    pub fn insert(&mut self, fd: RawFd) {
        assert!(in_range(fd), "descriptor {fd} does not fit into an fd_set");

        unsafe { libc::FD_SET(fd, &mut self.raw) };
        self.max = self.max.max(fd);
    }

    /// Removes `fd`; descriptors outside `0..FD_LIMIT` are never members.
    pub fn remove(&mut self, fd: RawFd) {
        if in_range(fd) {
            unsafe { libc::FD_CLR(fd, &mut self.raw) };
        }
    }

    /// Returns true if `fd` is a member.
    pub fn contains(&self, fd: RawFd) -> bool {
        in_range(fd) && unsafe { libc::FD_ISSET(fd, &self.raw) }
    }

    /// Removes every member.
    pub fn clear(&mut self) {
        unsafe { libc::FD_ZERO(&mut self.raw) };
        self.max = -1;
    }

    /// Iterates over the members, lowest first.
    ///
    /// Only descriptors up to the highest one ever inserted are scanned.
    pub fn iter(&self) -> impl Iterator<Item = RawFd> + '_ {
        (0..=self.max).filter(|fd| self.contains(*fd))
    }

    /// Returns true if the set has no members.
    pub fn is_empty(&self) -> bool {
        self.iter().next().is_none()
    }

    pub(crate) fn as_raw_mut(&mut self) -> *mut libc::fd_set {
        &mut self.raw
    }
}

pub(crate) fn in_range(fd: RawFd) -> bool {
    fd >= 0 && (fd as usize) < FD_LIMIT
}

impl Default for FdSet {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for FdSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}

impl PartialEq for FdSet {
    fn eq(&self, other: &Self) -> bool {
        self.iter().eq(other.iter())
    }
}

impl Eq for FdSet {}
