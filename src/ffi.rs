// src/ffi.rs
//! C ABI for hosts that load the cdylib directly (ctypes, cffi, dlopen).

use std::slice;

use crate::levenshtein;

/// Borrows a caller-owned buffer for the duration of one call. A null pointer
/// or a non-positive length reads as an empty sequence.
///
/// # Safety
/// When `ptr` is non-null and `len > 0`, `ptr` must point to `len` readable,
/// initialized `u64` values that stay valid and unmodified until the call
/// returns.
unsafe fn tokens<'a>(ptr: *const u64, len: i32) -> &'a [u64] {
    if ptr.is_null() || len <= 0 {
        return &[];
    }
    slice::from_raw_parts(ptr, len as usize)
}

/// Normalized edit distance between two token buffers.
///
/// Neither buffer is retained or written. A zero `norm` is not an error: the
/// result is `inf`, or `NaN` for identical inputs.
///
/// # Safety
/// `hyp` and `reference` must each satisfy the contract of a buffer of
/// `len_h` and `len_r` tokens respectively (see [`tokens`]).
#[no_mangle]
pub unsafe extern "C" fn ed_wrapper(
    hyp: *const u64,
    reference: *const u64,
    len_h: i32,
    len_r: i32,
    norm: i32,
) -> f32 {
    let hyp = tokens(hyp, len_h);
    let reference = tokens(reference, len_r);
    levenshtein::distance(hyp, reference, norm)
}
