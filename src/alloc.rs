//! Allocator plumbing.
//!
//! Every string payload and every tokenizer scratch buffer is obtained from
//! an [`Alloc`] context: either a user-supplied pair of aligned-alloc/free
//! functions with an opaque userdata pointer, or the platform default. The
//! context is an immutable copyable triple; a [`Value`](crate::Value)
//! carries the context it was built under and hands it down to children.
//!
//! The default path sits on `std::alloc`. Since the C-style free function
//! receives only the pointer, the default allocator prefixes each block
//! with its size and alignment so the layout can be recovered on release.

use std::alloc::{self, Layout};
use std::ffi::c_void;
use std::fmt;
use std::ptr::{self, NonNull};

/// Aligned allocation function.
///
/// Returns a `size`-byte block aligned to `align`, or null on failure.
/// A `size` of zero must return null without allocating.
///
/// # Safety
///
/// The function must return either null or a valid, writable block of at
/// least `size` bytes aligned to `align`. If the context is shared between
/// threads, the function must be reentrant.
pub type AllocFn =
    unsafe extern "C" fn(size: usize, align: usize, userdata: *mut c_void) -> *mut c_void;

/// Release function for blocks produced by the paired [`AllocFn`].
///
/// A null pointer is a no-op.
///
/// # Safety
///
/// The function must accept any pointer previously returned by the paired
/// [`AllocFn`] and not yet released. If the context is shared between
/// threads, the function must be reentrant.
pub type FreeFn = unsafe extern "C" fn(ptr: *mut c_void, userdata: *mut c_void);

/// An allocator context: user-supplied aligned-alloc/free functions with an
/// opaque userdata pointer, or the platform default when both are unset.
///
/// Two contexts are considered identical when both function pointers and
/// the userdata pointer compare equal; identity decides whether a move
/// between trees may transfer buffer ownership or has to copy-then-free.
#[derive(Clone, Copy, Debug)]
pub struct Alloc {
    alloc: Option<AllocFn>,
    free: Option<FreeFn>,
    userdata: *mut c_void,
}

// An Alloc is read-only after construction; the reentrancy requirement on
// AllocFn/FreeFn makes sharing it between threads sound.
unsafe impl Send for Alloc {}
unsafe impl Sync for Alloc {}

impl Default for Alloc {
    fn default() -> Self {
        Alloc {
            alloc: None,
            free: None,
            userdata: ptr::null_mut(),
        }
    }
}

impl PartialEq for Alloc {
    #[allow(unknown_lints, unpredictable_function_pointer_comparisons)]
    fn eq(&self, other: &Alloc) -> bool {
        // Context identity is function-pointer and userdata equality.
        self.alloc == other.alloc && self.free == other.free && self.userdata == other.userdata
    }
}

impl Eq for Alloc {}

// Layout header the default allocator hides in front of each block.
const HEADER: usize = 2 * std::mem::size_of::<usize>();

fn header_pad(align: usize) -> usize {
    align.max(HEADER)
}

fn default_alloc(size: usize, align: usize) -> *mut u8 {
    if size == 0 {
        return ptr::null_mut();
    }
    // Keep the header slot aligned for usize stores.
    let align = align.max(std::mem::size_of::<usize>());
    let pad = header_pad(align);
    let total = match pad.checked_add(size) {
        Some(total) => total,
        None => return ptr::null_mut(),
    };
    let layout = match Layout::from_size_align(total, align) {
        Ok(layout) => layout,
        Err(_) => return ptr::null_mut(),
    };
    // SAFETY: layout has non-zero size.
    let base = unsafe { alloc::alloc(layout) };
    if base.is_null() {
        return ptr::null_mut();
    }
    // SAFETY: pad >= HEADER, so the two header words sit inside the block,
    // and pad is a multiple of the usize-aligned `align`.
    unsafe {
        let header = base.add(pad - HEADER).cast::<usize>();
        ptr::write(header, total);
        ptr::write(header.add(1), align);
        base.add(pad)
    }
}

/// # Safety
///
/// `ptr` must come from [`default_alloc`] and not have been released.
unsafe fn default_free(ptr: *mut u8) {
    if ptr.is_null() {
        return;
    }
    // SAFETY: the header written by default_alloc sits right below `ptr`.
    unsafe {
        let header = ptr.sub(HEADER).cast::<usize>();
        let total = ptr::read(header);
        let align = ptr::read(header.add(1));
        let base = ptr.sub(header_pad(align));
        alloc::dealloc(base, Layout::from_size_align_unchecked(total, align));
    }
}

impl Alloc {
    /// Create a context that routes all requests through the given pair.
    pub fn new(alloc: AllocFn, free: FreeFn, userdata: *mut c_void) -> Self {
        Alloc {
            alloc: Some(alloc),
            free: Some(free),
            userdata,
        }
    }

    /// Request a `size`-byte block aligned to `align`; null on failure and
    /// for zero-sized requests.
    pub(crate) fn alloc(&self, size: usize, align: usize) -> *mut u8 {
        match (self.alloc, self.free) {
            // SAFETY: the AllocFn contract.
            (Some(alloc), Some(_)) => unsafe { alloc(size, align, self.userdata).cast() },
            _ => default_alloc(size, align),
        }
    }

    /// Release a block previously returned by [`Alloc::alloc`] on this
    /// context; null is a no-op.
    ///
    /// # Safety
    ///
    /// `ptr` must be null or a live block from this context.
    pub(crate) unsafe fn free(&self, ptr: *mut u8) {
        match (self.alloc, self.free) {
            // SAFETY: the FreeFn contract; null is a no-op on both paths.
            (Some(_), Some(free)) => unsafe { free(ptr.cast(), self.userdata) },
            // SAFETY: ptr came from default_alloc per this function's contract.
            _ => unsafe { default_free(ptr) },
        }
    }
}

/// Growable byte buffer backed by an [`Alloc`] context.
///
/// Used for string payloads under construction and frozen into [`Str`] once
/// the tokenizer has validated the contents.
pub(crate) struct Buf {
    ptr: NonNull<u8>,
    len: usize,
    cap: usize,
    ctx: Alloc,
}

// The storage is uniquely owned; see the reentrancy note on Alloc.
unsafe impl Send for Buf {}
unsafe impl Sync for Buf {}

impl Buf {
    pub(crate) fn new_in(ctx: Alloc) -> Buf {
        Buf {
            ptr: NonNull::dangling(),
            len: 0,
            cap: 0,
            ctx,
        }
    }

    pub(crate) fn as_slice(&self) -> &[u8] {
        // SAFETY: the first `len` bytes are initialized; a dangling pointer
        // is valid for a zero-length slice.
        unsafe { std::slice::from_raw_parts(self.ptr.as_ptr(), self.len) }
    }

    pub(crate) fn push(&mut self, byte: u8) {
        self.reserve(1);
        // SAFETY: reserve guarantees room for one more byte.
        unsafe {
            ptr::write(self.ptr.as_ptr().add(self.len), byte);
        }
        self.len += 1;
    }

    pub(crate) fn extend(&mut self, bytes: &[u8]) {
        self.reserve(bytes.len());
        // SAFETY: reserve guarantees room for `bytes.len()` more bytes, and
        // `bytes` cannot overlap our freshly grown storage.
        unsafe {
            ptr::copy_nonoverlapping(bytes.as_ptr(), self.ptr.as_ptr().add(self.len), bytes.len());
        }
        self.len += bytes.len();
    }

    fn reserve(&mut self, extra: usize) {
        let need = match self.len.checked_add(extra) {
            Some(need) => need,
            None => alloc::handle_alloc_error(Layout::new::<u8>()),
        };
        if need <= self.cap {
            return;
        }
        let mut cap = self.cap.max(16);
        while cap < need {
            cap = match cap.checked_mul(2) {
                Some(cap) => cap,
                None => need,
            };
        }
        let fresh = self.ctx.alloc(cap, 1);
        let Some(fresh) = NonNull::new(fresh) else {
            // Allocation failure aborts; nothing already attached to the
            // tree is leaked because ownership never changed hands.
            alloc::handle_alloc_error(Layout::from_size_align(cap, 1).unwrap_or(Layout::new::<u8>()))
        };
        if self.cap > 0 {
            // SAFETY: both blocks are live and at least `len` bytes long.
            unsafe {
                ptr::copy_nonoverlapping(self.ptr.as_ptr(), fresh.as_ptr(), self.len);
                self.ctx.free(self.ptr.as_ptr());
            }
        }
        self.ptr = fresh;
        self.cap = cap;
    }
}

impl Drop for Buf {
    fn drop(&mut self) {
        if self.cap > 0 {
            // SAFETY: the block is live and came from self.ctx.
            unsafe {
                self.ctx.free(self.ptr.as_ptr());
            }
        }
    }
}

impl fmt::Debug for Buf {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Buf").field("len", &self.len).finish()
    }
}

/// An owned UTF-8 string allocated through an [`Alloc`] context.
pub(crate) struct Str {
    buf: Buf,
}

impl Str {
    /// Freeze a buffer whose contents the caller has validated as UTF-8.
    pub(crate) fn from_buf(buf: Buf) -> Str {
        debug_assert!(std::str::from_utf8(buf.as_slice()).is_ok());
        Str { buf }
    }

    pub(crate) fn new_in(ctx: Alloc, s: &str) -> Str {
        let mut buf = Buf::new_in(ctx);
        buf.extend(s.as_bytes());
        Str { buf }
    }

    pub(crate) fn as_str(&self) -> &str {
        // SAFETY: every construction path validates or produces UTF-8.
        unsafe { std::str::from_utf8_unchecked(self.buf.as_slice()) }
    }

    pub(crate) fn clone_in(&self, ctx: Alloc) -> Str {
        Str::new_in(ctx, self.as_str())
    }
}

impl PartialEq for Str {
    fn eq(&self, other: &Str) -> bool {
        self.as_str() == other.as_str()
    }
}

impl Eq for Str {}

impl fmt::Debug for Str {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self.as_str(), f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn test_default_alloc_roundtrip() {
        let ctx = Alloc::default();
        for align in [1usize, 2, 8, 64] {
            let p = ctx.alloc(100, align);
            assert!(!p.is_null());
            assert_eq!(p as usize % align, 0, "block must honor alignment");
            unsafe {
                ptr::write_bytes(p, 0xAB, 100);
                ctx.free(p);
            }
        }
    }

    #[test]
    fn test_zero_size_returns_null() {
        let ctx = Alloc::default();
        assert!(ctx.alloc(0, 1).is_null());
    }

    #[test]
    fn test_free_null_is_noop() {
        let ctx = Alloc::default();
        unsafe {
            ctx.free(ptr::null_mut());
        }
    }

    #[test]
    fn test_buf_growth() {
        let mut buf = Buf::new_in(Alloc::default());
        for i in 0..100u8 {
            buf.push(i);
        }
        buf.extend(b"tail");
        assert_eq!(buf.as_slice().len(), 104);
        assert_eq!(&buf.as_slice()[..3], &[0, 1, 2]);
        assert_eq!(&buf.as_slice()[100..], b"tail");
    }

    #[test]
    fn test_str_clone_in() {
        let ctx = Alloc::default();
        let s = Str::new_in(ctx, "hello");
        let t = s.clone_in(ctx);
        assert_eq!(s, t);
        assert_eq!(t.as_str(), "hello");
    }

    unsafe extern "C" fn counting_alloc(
        size: usize,
        align: usize,
        userdata: *mut c_void,
    ) -> *mut c_void {
        let counter = unsafe { &*userdata.cast::<AtomicUsize>() };
        counter.fetch_add(1, Ordering::Relaxed);
        default_alloc(size, align).cast()
    }

    unsafe extern "C" fn counting_free(ptr: *mut c_void, userdata: *mut c_void) {
        let counter = unsafe { &*userdata.cast::<AtomicUsize>() };
        counter.fetch_sub(1, Ordering::Relaxed);
        unsafe { default_free(ptr.cast()) }
    }

    #[test]
    fn test_custom_allocator_is_used() {
        let live = AtomicUsize::new(0);
        let ctx = Alloc::new(
            counting_alloc,
            counting_free,
            &live as *const AtomicUsize as *mut c_void,
        );
        {
            let s = Str::new_in(ctx, "routed through the context");
            assert_eq!(s.as_str(), "routed through the context");
            assert!(live.load(Ordering::Relaxed) > 0);
            drop(s);
        }
        assert_eq!(live.load(Ordering::Relaxed), 0, "every block released");
    }

    #[test]
    fn test_context_identity() {
        let live = AtomicUsize::new(0);
        let userdata = &live as *const AtomicUsize as *mut c_void;
        let a = Alloc::new(counting_alloc, counting_free, userdata);
        let b = Alloc::new(counting_alloc, counting_free, userdata);
        let c = Alloc::default();
        assert_eq!(a, b);
        assert_ne!(a, c);
        assert_eq!(c, Alloc::default());
    }
}
